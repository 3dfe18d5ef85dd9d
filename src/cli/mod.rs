//! CLI module for notely.
//!
//! This module provides the terminal front end:
//! - Argument parsing
//! - Version display
//! - Command handlers for sign-in, sign-up and notes
//!
//! # Usage
//!
//! ```ignore
//! use notely::cli::{parse_args, run_command};
//!
//! let command = parse_args(std::env::args());
//! let stdin = std::io::stdin();
//! run_command(&app, command, &mut stdin.lock(), &mut std::io::stdout()).await?;
//! ```

pub mod args;
pub mod commands;
pub mod version;

pub use args::{parse_args, CliCommand, USAGE};
pub use commands::run_command;
pub use version::{version_line, VERSION};
