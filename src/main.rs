#![forbid(unsafe_code)]

mod cli;

use anyhow::{Context, Result};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use mopup::config::Configuration;
use mopup::models::RunOptions;
use mopup::session::{SessionManager, Sudo};
use mopup::{engine, logging, output};

fn main() -> Result<()> {
    let args = cli::parse_args()?;

    // Unified Logging is best-effort; the tool stays usable without it
    let _ = logging::init();

    // Set up interrupt handling
    let interrupted = Arc::new(AtomicBool::new(false));
    let _ = signal_hook::flag::register(signal_hook::consts::SIGINT, interrupted.clone());
    let _ = signal_hook::flag::register(signal_hook::consts::SIGTERM, interrupted.clone());

    if args.list {
        return output::print_rule_list(args.json_output);
    }

    let config = match &args.config_path {
        Some(path) => Configuration::load(path)?,
        None => Configuration::load_default()?,
    };

    if args.status {
        let probe = Sudo::with_command(&config.elevation.command);
        return output::print_session_status(&probe, args.json_output);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;

    let mut options = RunOptions::new(home.clone());
    options.dry_run = args.dry_run;
    options.json_output = args.json_output;
    options.quiet_mode = args.quiet_mode;
    options.rule_patterns = args.rule_patterns;
    options.no_elevation = args.no_elevation;
    options.min_age = Duration::from_secs(config.cleanup.min_age_days * 24 * 60 * 60);
    options.disabled_rules = config.rules.disabled.clone();
    options.exclude_patterns = config.exclude_patterns(&home);
    options.elevation_command = config.elevation.command.clone();

    if !options.json_output && !options.quiet_mode {
        if options.dry_run {
            println!("mopup v{} - dry run\n", env!("MOPUP_VERSION"));
        } else {
            println!("mopup v{} - cleaning\n", env!("MOPUP_VERSION"));
        }
    }

    let mut session = SessionManager::new(&options.elevation_command);
    let report = engine::run(&options, &mut session, &interrupted);
    session.release();

    if options.json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::format_human(&report, options.quiet_mode)?;
    }

    Ok(())
}
