use ripple::{
    cli::{Args, Command},
    error::{ErrorSeverity, RippleError},
};
use std::process;

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Resolve configuration and build the command
    let exit_code = match Command::from_args(args) {
        Ok(command) => run_command(command),
        Err(err) => report_error(&err),
    };

    process::exit(exit_code);
}

/// Run the command with proper error handling
fn run_command(command: Command) -> i32 {
    match command.execute() {
        Ok(_) => 0,
        Err(err) => report_error(&err),
    }
}

/// Print a failure and map it to an exit code
fn report_error(err: &RippleError) -> i32 {
    eprintln!("\nError: {}", err.user_message());

    // Provide default suggestions based on error type
    match err {
        RippleError::InvalidPath { .. } => {
            eprintln!("Suggestion: Check that the path exists and is a directory");
        }
        RippleError::ConfigNotFound { .. } => {
            eprintln!("Suggestion: Create a .ripple.toml file with `ripple init` or specify a config file with --config");
        }
        RippleError::PermissionDenied { .. } => {
            eprintln!("Suggestion: Try running with elevated permissions or check file permissions");
        }
        RippleError::ModuleNotFound { .. } => {
            eprintln!("Suggestion: Run `ripple graph` to list the modules the scanner discovered");
        }
        _ => {} // No default suggestion for other error types
    }

    // Print backtrace when asked for
    if std::env::var("RIPPLE_VERBOSE").is_ok() || std::env::var("RUST_BACKTRACE").is_ok() {
        if let Some(backtrace) = err.backtrace() {
            eprintln!("\nBacktrace:\n{}", backtrace);
        }
    }

    let exit_code = match err.severity() {
        ErrorSeverity::Warning => 0, // Warnings don't cause failure
        ErrorSeverity::Error => 1,   // Regular errors
        ErrorSeverity::Critical => 2, // Critical errors
    };

    if exit_code > 0 {
        eprintln!("\nExiting with code {} due to {}", exit_code, err.severity());
    }

    exit_code
}
