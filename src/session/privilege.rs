//! Elevation probes and interactive elevation
//!
//! Wraps the system elevation tool (sudo unless configured otherwise). The
//! probe side never prompts: `-n` keeps every check and refresh
//! non-interactive, and any outcome other than a clean success reads as
//! "no grant". Only `request_interactive` is allowed to reach the terminal.

use nix::unistd::Uid;
use std::process::{Command, Stdio};

use crate::constants::DEFAULT_ELEVATION_COMMAND;

/// Non-interactive view of the elevation grant
pub trait PrivilegeProbe: Send + Sync {
    /// Whether an elevation grant is currently active. Never prompts;
    /// ambiguous outcomes (tool missing, spawn failure) read as false.
    fn has_active_grant(&self) -> bool;

    /// Extend an existing grant without prompting. False when there is no
    /// grant left to extend or the tool cannot be reached.
    fn refresh(&self) -> bool;
}

/// Interactive elevation request
pub trait Elevator: Send {
    /// Ask the user for elevation, surfacing `reason` in the prompt.
    /// True only on an explicit grant; an unavailable tool reads as denial.
    fn request_interactive(&self, reason: &str) -> bool;
}

/// sudo-backed implementation of both traits
#[derive(Debug, Clone)]
pub struct Sudo {
    command: String,
}

impl Sudo {
    pub fn new() -> Self {
        Self {
            command: DEFAULT_ELEVATION_COMMAND.to_string(),
        }
    }

    /// Use an alternate elevation tool (e.g. doas)
    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Run the elevation tool with all standard streams detached.
    /// Anything but a clean zero exit is false.
    fn run_quiet(&self, args: &[&str]) -> bool {
        Command::new(&self.command)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

impl Default for Sudo {
    fn default() -> Self {
        Self::new()
    }
}

impl PrivilegeProbe for Sudo {
    fn has_active_grant(&self) -> bool {
        // root needs no grant
        if Uid::effective().is_root() {
            return true;
        }
        // `-n true` succeeds only with a live cached credential
        self.run_quiet(&["-n", "true"])
    }

    fn refresh(&self) -> bool {
        if Uid::effective().is_root() {
            return true;
        }
        // `-n -v` extends the credential timestamp without ever prompting
        self.run_quiet(&["-n", "-v"])
    }
}

impl Elevator for Sudo {
    fn request_interactive(&self, reason: &str) -> bool {
        if Uid::effective().is_root() {
            return true;
        }

        let prompt = if reason.trim().is_empty() {
            "Administrator access required. Password: ".to_string()
        } else {
            format!("Administrator access required ({}). Password: ", reason.trim())
        };

        // stdin and the tty stay connected so the tool can prompt
        Command::new(&self.command)
            .args(["-p", &prompt, "-v"])
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }
}
