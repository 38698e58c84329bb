//! Error handling for the Ripple engine
//!
//! This module provides the error handling system for Ripple,
//! including error types, result aliases, and error context utilities.

pub mod context;
pub mod types;

pub use context::{handle_error, OptionExt, ResultExt};
pub use types::{ErrorSeverity, Result, RippleError};
