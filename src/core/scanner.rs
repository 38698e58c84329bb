//! Source file discovery
//!
//! Walks the project root and collects the source files the graph
//! builder will parse, honoring the include/exclude glob set, the
//! optional depth limit, and the symlink policy. Traversal problems
//! degrade to diagnostics; only a missing or unreadable root is fatal.

use crate::error::{Result, RippleError};
use crate::models::config::Settings;
use crate::models::report::{Diagnostic, DiagnosticKind};
use glob::Pattern;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Result of a project scan
#[derive(Debug)]
pub struct ScanOutcome {
    /// Discovered source files, sorted by path
    pub files: Vec<PathBuf>,
    /// Non-fatal traversal problems
    pub diagnostics: Vec<Diagnostic>,
}

/// Walks a project root and discovers analyzable source files
pub struct Scanner<'a> {
    settings: &'a Settings,
}

impl<'a> Scanner<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Discover all source files under the project root.
    ///
    /// Returned files are sorted by path so everything downstream is
    /// deterministic for a fixed file-system snapshot.
    pub fn scan(&self) -> Result<ScanOutcome> {
        let root = &self.settings.project_root;
        if !root.is_dir() {
            return Err(RippleError::invalid_path(root.clone()));
        }

        let include = compile_patterns(&self.settings.include_patterns)?;
        let exclude = compile_patterns(&self.settings.exclude_patterns)?;

        let mut walker = WalkDir::new(root).follow_links(self.settings.follow_links);
        if let Some(max_depth) = self.settings.max_depth {
            walker = walker.max_depth(max_depth);
        }

        let mut files = Vec::new();
        let mut diagnostics = Vec::new();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err
                        .path()
                        .map(|p| p.to_path_buf())
                        .unwrap_or_else(|| root.clone());
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::ScanError,
                        path,
                        err.to_string(),
                    ));
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative = path.strip_prefix(root).unwrap_or(path);
            let relative_str = relative.to_string_lossy();

            if exclude.iter().any(|p| p.matches(&relative_str)) {
                continue;
            }
            if include.iter().any(|p| p.matches(&relative_str)) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();

        Ok(ScanOutcome { files, diagnostics })
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).map_err(RippleError::from))
        .collect()
}
