//! Module path resolution utilities

use dashmap::DashMap;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Extensions probed when a relative specifier omits one, in priority order
const EXTENSIONS: [&str; 6] = ["ts", "tsx", "js", "jsx", "mjs", "cjs"];

/// Index file names probed when a specifier points at a directory
const INDEX_FILES: [&str; 6] = [
    "index.ts",
    "index.tsx",
    "index.js",
    "index.jsx",
    "index.mjs",
    "index.cjs",
];

/// Resolves import specifiers against the set of discovered project files.
///
/// Resolution is deliberately closed over the scanned file set rather
/// than the live filesystem: a file excluded by the include/exclude
/// globs must not resolve, and resolution stays reproducible for a
/// fixed scan. Bare package specifiers (`lodash`, `node:fs`) never
/// resolve; they become unresolved edges upstream.
pub struct PathResolver {
    project_root: PathBuf,
    known_files: HashSet<PathBuf>,
    cache: Arc<DashMap<(PathBuf, String), Option<PathBuf>>>,
}

impl PathResolver {
    /// Create a resolver over the scanned file set
    pub fn new(project_root: &Path, files: &[PathBuf]) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            known_files: files.iter().cloned().collect(),
            cache: Arc::new(DashMap::new()),
        }
    }

    /// Resolve a module specifier to a project file.
    ///
    /// `from` is the absolute path of the importing file. Returns
    /// `None` for anything that is not a relative project import.
    pub fn resolve(&self, specifier: &str, from: &Path) -> Option<PathBuf> {
        if !specifier.starts_with('.') {
            return None;
        }

        let from_dir = from.parent().unwrap_or(from).to_path_buf();
        let key = (from_dir.clone(), specifier.to_string());
        if let Some(cached) = self.cache.get(&key) {
            return cached.clone();
        }

        let resolved = self.resolve_relative(specifier, &from_dir);
        self.cache.insert(key, resolved.clone());
        resolved
    }

    fn resolve_relative(&self, specifier: &str, from_dir: &Path) -> Option<PathBuf> {
        let candidate = normalize(&from_dir.join(specifier));

        // Exact path first
        if self.known_files.contains(&candidate) {
            return Some(candidate);
        }

        // Try adding extensions
        if candidate.extension().is_none() {
            for ext in &EXTENSIONS {
                let with_ext = candidate.with_extension(ext);
                if self.known_files.contains(&with_ext) {
                    return Some(with_ext);
                }
            }
        }

        // Try as directory with index files
        for index_file in &INDEX_FILES {
            let index_path = candidate.join(index_file);
            if self.known_files.contains(&index_path) {
                return Some(index_path);
            }
        }

        None
    }

    /// The project root this resolver was built for
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }
}

/// Compute the relative specifier to import `target` from `from`.
///
/// The inverse of `resolve`: used by the preview engine to rewrite
/// import statements after a move or split. The extension is dropped
/// and the result always starts with `./` or `../`.
pub fn specifier_for(from: &Path, target: &Path) -> String {
    let from_dir = from.parent().unwrap_or(from);
    let relative = relative_path(from_dir, target);
    let without_ext = relative.with_extension("");
    let joined = without_ext
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/");
    if joined.starts_with("../") || joined == ".." {
        joined
    } else {
        format!("./{}", joined)
    }
}

/// Collapse `.` and `..` components without touching the filesystem.
///
/// `Path::canonicalize` requires the path to exist; resolution probes
/// candidates that usually do not.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Relative path from `base` (a directory) to `target`
fn relative_path(base: &Path, target: &Path) -> PathBuf {
    let base_components: Vec<_> = base.components().collect();
    let target_components: Vec<_> = target.components().collect();

    let common = base_components
        .iter()
        .zip(target_components.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = PathBuf::new();
    for _ in common..base_components.len() {
        out.push("..");
    }
    for component in &target_components[common..] {
        out.push(component.as_os_str());
    }
    out
}
