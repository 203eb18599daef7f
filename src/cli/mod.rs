//! CLI layer: argument parsing, the shell session and command dispatch

pub mod args;
pub mod commands;
pub mod error;
pub mod output;
pub mod render;
pub mod session;

pub use args::{Cli, Commands};
pub use commands::execute_command;
pub use error::{CliError, CliResult};
pub use session::{Reply, Session};
