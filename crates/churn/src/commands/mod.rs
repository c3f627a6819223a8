//! Command implementations for the churn CLI.
//!
//! Each submodule implements the logic for one subcommand.

pub mod init;
pub mod run;
pub mod status;
