//! mopup - macOS Disk Cleanup Library
//!
//! This library exposes the cleanup rule catalogue, the cleanup engine, and
//! the elevated-session management used by the mopup command-line tool.

pub mod config;
pub mod constants;
pub mod engine;
pub mod logging;
pub mod models;
pub mod output;
pub mod rules;
pub mod session;
