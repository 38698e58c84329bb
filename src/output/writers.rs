//! Output writing

use crate::error::{Result, RippleError};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Write formatted output to a file, or stdout when no path is given
pub fn write_output(content: &str, output_file: Option<&Path>) -> Result<()> {
    match output_file {
        Some(path) => fs::write(path, content).map_err(|e| RippleError::OutputWrite {
            path: path.to_path_buf(),
            source: e,
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        }),
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(content.as_bytes())
                .and_then(|_| handle.flush())
                .map_err(|e| RippleError::StdoutWrite {
                    source: e,
                    #[cfg(not(tarpaulin_include))]
                    backtrace: std::backtrace::Backtrace::capture(),
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");

        write_output("hello\n", Some(&path)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let result = write_output("x", Some(Path::new("/no/such/dir/out.txt")));
        assert!(matches!(result, Err(RippleError::OutputWrite { .. })));
    }
}
