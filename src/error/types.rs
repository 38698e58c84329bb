//! Error types and definitions for Ripple
//!
//! This module provides the error handling system for the Ripple engine,
//! including error types, result aliases, and severity classification.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Error severity levels for different error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Warning level errors - operation can continue
    Warning,
    /// Error level - current operation fails but overall process can continue
    Error,
    /// Critical level - process should terminate
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "WARNING"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Main error type for Ripple operations
#[derive(Debug, Error)]
pub enum RippleError {
    /// Standard IO errors
    #[error("IO error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Reading a single source file failed
    #[error("Error reading {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Source file could not be parsed
    #[error("Parse error in {path}: {detail}")]
    Parse {
        path: PathBuf,
        detail: String,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Project root missing or unreadable - the graph cannot be built
    #[error("Invalid project root: {path}")]
    InvalidPath {
        path: PathBuf,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Permission denied errors
    #[error("Permission denied accessing {path}")]
    PermissionDenied {
        path: PathBuf,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Glob pattern errors
    #[error("Glob pattern error: {source}")]
    GlobPattern {
        #[source]
        source: glob::PatternError,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Directory traversal errors
    #[error("Directory traversal error for {path}: {message}")]
    DirectoryTraversal {
        path: PathBuf,
        message: String,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// The operation names a module not present in the graph
    #[error("Module not found: {name}")]
    ModuleNotFound {
        name: String,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// The operation names a symbol the target module does not define
    #[error("Symbol '{symbol}' not found in module '{module}'")]
    SymbolNotFound {
        module: String,
        symbol: String,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// A rename collides with a symbol already visible in scope.
    /// Surfaced to the caller; never resolved heuristically.
    #[error("Ambiguous rewrite in {file}: '{symbol}' {detail}")]
    AmbiguousRewrite {
        file: PathBuf,
        symbol: String,
        detail: String,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// A split partition leaves symbols without a destination module
    #[error("Split of '{module}' leaves symbols unassigned: {symbols:?}")]
    UnassignedSymbols {
        module: String,
        symbols: Vec<String>,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Configuration file not found
    #[error("Configuration file not found at {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Configuration file read errors
    #[error("Error reading configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Configuration file parse errors
    #[error("Error parsing configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// TOML parsing errors
    #[error("TOML parsing error: {source}")]
    TomlParse {
        #[source]
        source: toml::de::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Invalid output format
    #[error("Invalid output format: {format}")]
    InvalidOutputFormat {
        format: String,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Output file write errors
    #[error("Error writing to output file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Stdout write errors
    #[error("Error writing to stdout: {source}")]
    StdoutWrite {
        #[source]
        source: std::io::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// CSV handling errors
    #[error("CSV error: {source}")]
    Csv {
        #[source]
        source: csv::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// JSON serialization error
    #[error("JSON serialization error: {source}")]
    JsonSerialize {
        #[source]
        source: serde_json::Error,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },

    /// Analysis was cancelled via the cancel token
    #[error("Operation interrupted")]
    Interrupted {
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace,
    },
}

impl RippleError {
    /// Get the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Warning level errors - operation can continue
            RippleError::Parse { .. } => ErrorSeverity::Warning,
            RippleError::PermissionDenied { .. } => ErrorSeverity::Warning,
            RippleError::FileRead { .. } => ErrorSeverity::Warning,

            // Critical errors - process should terminate
            RippleError::InvalidPath { .. } => ErrorSeverity::Critical,
            RippleError::GlobPattern { .. } => ErrorSeverity::Critical,
            RippleError::Config { .. } => ErrorSeverity::Critical,
            RippleError::ConfigNotFound { .. } => ErrorSeverity::Critical,
            RippleError::ConfigRead { .. } => ErrorSeverity::Critical,
            RippleError::ConfigParse { .. } => ErrorSeverity::Critical,
            RippleError::InvalidOutputFormat { .. } => ErrorSeverity::Critical,
            RippleError::StdoutWrite { .. } => ErrorSeverity::Critical,

            // Regular errors - current operation fails but overall process can continue
            _ => ErrorSeverity::Error,
        }
    }

    /// Check if this is a critical error that should terminate the process
    pub fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    /// Check if this error is one of the recoverable preview failures.
    /// The orchestrator captures these in the report instead of propagating.
    pub fn is_preview_error(&self) -> bool {
        matches!(
            self,
            RippleError::ModuleNotFound { .. }
                | RippleError::SymbolNotFound { .. }
                | RippleError::AmbiguousRewrite { .. }
                | RippleError::UnassignedSymbols { .. }
        )
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            RippleError::InvalidPath { path, .. } => {
                format!("Invalid project root: '{}'. Please provide a valid directory path.", path.display())
            }
            RippleError::PermissionDenied { path, .. } => {
                format!("Cannot access '{}' due to permission denied. Check file permissions.", path.display())
            }
            RippleError::Parse { path, detail, .. } => {
                format!("Could not parse '{}': {}. The file was skipped.", path.display(), detail)
            }
            RippleError::ModuleNotFound { name, .. } => {
                format!("Module '{}' was not found in the project. Module names are project-relative paths without the extension (e.g. src/utils/helpers).", name)
            }
            RippleError::SymbolNotFound { module, symbol, .. } => {
                format!("Module '{}' does not define a top-level symbol named '{}'.", module, symbol)
            }
            RippleError::AmbiguousRewrite { file, symbol, detail, .. } => {
                format!("Renaming to '{}' is ambiguous in '{}': {}. Resolve the collision manually.", symbol, file.display(), detail)
            }
            RippleError::UnassignedSymbols { module, symbols, .. } => {
                format!("The split of '{}' does not assign these symbols to any destination: {}. Assign every symbol explicitly.", module, symbols.join(", "))
            }
            RippleError::ConfigNotFound { path, .. } => {
                format!("Configuration file not found at '{}'. Create a config file or use command line options.", path.display())
            }
            RippleError::Io { source, .. } => {
                format!("File system error: {}. Check disk space and permissions.", source)
            }
            // For other errors, use the standard Display implementation
            _ => self.to_string(),
        }
    }

    /// Get the captured backtrace, if any
    #[cfg(not(tarpaulin_include))]
    pub fn backtrace(&self) -> Option<&std::backtrace::Backtrace> {
        match self {
            RippleError::Io { backtrace, .. }
            | RippleError::FileRead { backtrace, .. }
            | RippleError::Parse { backtrace, .. }
            | RippleError::InvalidPath { backtrace, .. }
            | RippleError::PermissionDenied { backtrace, .. }
            | RippleError::GlobPattern { backtrace, .. }
            | RippleError::DirectoryTraversal { backtrace, .. }
            | RippleError::ModuleNotFound { backtrace, .. }
            | RippleError::SymbolNotFound { backtrace, .. }
            | RippleError::AmbiguousRewrite { backtrace, .. }
            | RippleError::UnassignedSymbols { backtrace, .. }
            | RippleError::Config { backtrace, .. }
            | RippleError::ConfigNotFound { backtrace, .. }
            | RippleError::ConfigRead { backtrace, .. }
            | RippleError::ConfigParse { backtrace, .. }
            | RippleError::TomlParse { backtrace, .. }
            | RippleError::InvalidOutputFormat { backtrace, .. }
            | RippleError::OutputWrite { backtrace, .. }
            | RippleError::StdoutWrite { backtrace, .. }
            | RippleError::Csv { backtrace, .. }
            | RippleError::JsonSerialize { backtrace, .. }
            | RippleError::Interrupted { backtrace, .. } => Some(backtrace),
        }
    }

    /// Create an IO error with context
    pub fn io_error(source: std::io::Error) -> Self {
        RippleError::Io {
            source,
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create a file read error for a specific path
    pub fn file_read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RippleError::FileRead {
            path: path.into(),
            source,
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create a parse error with file context
    pub fn parse_error(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        RippleError::Parse {
            path: path.into(),
            detail: detail.into(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create an invalid project root error
    pub fn invalid_path(path: impl Into<PathBuf>) -> Self {
        RippleError::InvalidPath {
            path: path.into(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        RippleError::PermissionDenied {
            path: path.into(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        RippleError::Config {
            message: message.into(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create a directory traversal error
    pub fn directory_traversal_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        RippleError::DirectoryTraversal {
            path: path.into(),
            message: message.into(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create a module not found error
    pub fn module_not_found(name: impl Into<String>) -> Self {
        RippleError::ModuleNotFound {
            name: name.into(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create a symbol not found error
    pub fn symbol_not_found(module: impl Into<String>, symbol: impl Into<String>) -> Self {
        RippleError::SymbolNotFound {
            module: module.into(),
            symbol: symbol.into(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create an ambiguous rewrite error
    pub fn ambiguous_rewrite(
        file: impl Into<PathBuf>,
        symbol: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        RippleError::AmbiguousRewrite {
            file: file.into(),
            symbol: symbol.into(),
            detail: detail.into(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create an unassigned symbols error
    pub fn unassigned_symbols(module: impl Into<String>, symbols: Vec<String>) -> Self {
        RippleError::UnassignedSymbols {
            module: module.into(),
            symbols,
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    /// Create an interrupted error
    pub fn interrupted() -> Self {
        RippleError::Interrupted {
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }
}

// Implement From for common error types
impl From<std::io::Error> for RippleError {
    fn from(err: std::io::Error) -> Self {
        RippleError::io_error(err)
    }
}

impl From<toml::de::Error> for RippleError {
    fn from(err: toml::de::Error) -> Self {
        RippleError::TomlParse {
            source: err,
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }
}

impl From<glob::PatternError> for RippleError {
    fn from(err: glob::PatternError) -> Self {
        RippleError::GlobPattern {
            source: err,
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }
}

impl From<csv::Error> for RippleError {
    fn from(err: csv::Error) -> Self {
        RippleError::Csv {
            source: err,
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }
}

impl From<serde_json::Error> for RippleError {
    fn from(err: serde_json::Error) -> Self {
        RippleError::JsonSerialize {
            source: err,
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }
}

/// Result type alias for Ripple operations
pub type Result<T> = std::result::Result<T, RippleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ladder() {
        assert_eq!(
            RippleError::parse_error("a.js", "unexpected token").severity(),
            ErrorSeverity::Warning
        );
        assert_eq!(
            RippleError::module_not_found("src/missing").severity(),
            ErrorSeverity::Error
        );
        assert_eq!(
            RippleError::invalid_path("/does/not/exist").severity(),
            ErrorSeverity::Critical
        );
        assert!(RippleError::invalid_path("/does/not/exist").is_critical());
    }

    #[test]
    fn test_preview_error_classification() {
        assert!(RippleError::module_not_found("x").is_preview_error());
        assert!(RippleError::symbol_not_found("m", "s").is_preview_error());
        assert!(RippleError::ambiguous_rewrite("b.js", "bar", "already imported").is_preview_error());
        assert!(RippleError::unassigned_symbols("m", vec!["f".to_string()]).is_preview_error());
        assert!(!RippleError::interrupted().is_preview_error());
        assert!(!RippleError::invalid_path("/x").is_preview_error());
    }

    #[test]
    fn test_user_messages() {
        let err = RippleError::symbol_not_found("src/utils", "parse");
        assert!(err.user_message().contains("src/utils"));
        assert!(err.user_message().contains("parse"));

        let err = RippleError::unassigned_symbols(
            "src/utils",
            vec!["fmt".to_string(), "dump".to_string()],
        );
        assert!(err.user_message().contains("fmt, dump"));
    }
}
