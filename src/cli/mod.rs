//! Command-line interface

pub mod args;
pub mod commands;

pub use args::{Args, CliCommand};
pub use commands::Command;
