//! Shared utilities

pub mod path_resolver;

pub use path_resolver::{specifier_for, PathResolver};
