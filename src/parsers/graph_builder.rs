//! Dependency graph construction from parsed sources
//!
//! Parsing fans out across a worker pool; assembly is a
//! single-threaded reduce that consumes parse results in file-path
//! order, so edge ordering inside a module is reproducible across runs
//! for identical input no matter how threads are scheduled.

use crate::core::cancel::CancelToken;
use crate::core::parallel::{process_batched, ProgressUpdate};
use crate::error::{Result, RippleError};
use crate::models::config::Settings;
use crate::models::graph::{DependencyGraph, ImportEdge};
use crate::models::module::module_name_from_relative_path;
use crate::models::report::{Diagnostic, DiagnosticKind};
use crate::parsers::source_parser::{ParsedFile, RawImport, SourceParser};
use crate::utils::path_resolver::PathResolver;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// A built graph plus everything that went wrong building it
#[derive(Debug)]
pub struct BuildOutcome {
    pub graph: DependencyGraph,
    pub diagnostics: Vec<Diagnostic>,
}

/// Builds a `DependencyGraph` from a list of discovered source files
pub struct GraphBuilder<'a> {
    settings: &'a Settings,
    cancel: CancelToken,
    parser: Arc<SourceParser>,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(settings: &'a Settings, cancel: CancelToken) -> Self {
        Self {
            settings,
            cancel,
            parser: Arc::new(SourceParser::new()),
        }
    }

    /// Build the graph from discovered files
    pub fn build(&self, files: Vec<PathBuf>) -> Result<BuildOutcome> {
        self.build_with_progress(files, None::<fn(ProgressUpdate)>)
    }

    /// Build the graph, reporting parse progress between batches
    pub fn build_with_progress<P>(
        &self,
        mut files: Vec<PathBuf>,
        progress: Option<P>,
    ) -> Result<BuildOutcome>
    where
        P: Fn(ProgressUpdate),
    {
        // Stable input order is the root of the determinism guarantee
        files.sort();

        let parser = Arc::clone(&self.parser);
        let parse_results = process_batched(
            files,
            self.settings.parse_batch_size,
            self.settings.parallel,
            self.settings.threads,
            &self.cancel,
            move |path: &PathBuf| {
                let result = fs::read_to_string(path)
                    .map_err(|e| RippleError::file_read_error(path.clone(), e))
                    .and_then(|source| parser.parse(&source, path));
                (path.clone(), result)
            },
            progress,
        )?;

        let mut diagnostics = Vec::new();
        let mut parsed_files: Vec<ParsedFile> = Vec::new();

        // One unparsable file degrades to a diagnostic, never a failed run
        for (path, result) in parse_results {
            match result {
                Ok(parsed) => parsed_files.push(parsed),
                Err(err) => {
                    let kind = match &err {
                        RippleError::Parse { .. } => DiagnosticKind::ParseFailure,
                        _ => DiagnosticKind::ScanError,
                    };
                    diagnostics.push(Diagnostic::new(kind, path, err.to_string()));
                }
            }
        }

        self.cancel.check()?;

        let root = &self.settings.project_root;
        let parsed_paths: Vec<PathBuf> = parsed_files.iter().map(|p| p.path.clone()).collect();
        let resolver = PathResolver::new(root, &parsed_paths);

        let mut graph = DependencyGraph::new(root.clone());
        let mut pending_edges: Vec<(usize, PathBuf, Vec<RawImport>)> = Vec::new();

        for parsed in parsed_files {
            let relative = parsed
                .path
                .strip_prefix(root)
                .unwrap_or(&parsed.path)
                .to_path_buf();
            let name = module_name_from_relative_path(&relative);

            if graph.module_id(&name).is_some() {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::ScanError,
                    parsed.path.clone(),
                    format!("duplicate module name '{}', file skipped", name),
                ));
                continue;
            }

            let id = graph.add_module(name, parsed.path.clone(), relative, parsed.symbols);
            pending_edges.push((id, parsed.path, parsed.imports));
        }

        self.cancel.check()?;

        for (source, source_path, imports) in pending_edges {
            for raw in imports {
                let target = resolver
                    .resolve(&raw.specifier, &source_path)
                    .and_then(|resolved| graph.module_id_by_path(&resolved));

                if target.is_none() {
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::UnresolvedImport,
                        source_path.clone(),
                        format!("cannot resolve '{}' (line {})", raw.specifier, raw.line),
                    ));
                }

                graph.add_edge(ImportEdge {
                    source,
                    target,
                    specifier: raw.specifier,
                    imported_names: raw.names,
                    line: raw.line,
                    resolved: target.is_some(),
                    dynamic: raw.dynamic,
                    reexport: raw.reexport,
                    stmt_span: raw.stmt_span,
                    specifier_span: raw.specifier_span,
                });
            }
        }

        Ok(BuildOutcome { graph, diagnostics })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn settings_for(root: &std::path::Path) -> Settings {
        Settings {
            project_root: root.to_path_buf(),
            ..Settings::default()
        }
    }

    fn build_project(dir: &TempDir) -> BuildOutcome {
        let settings = settings_for(dir.path());
        let scanner = crate::core::scanner::Scanner::new(&settings);
        let files = scanner.scan().unwrap().files;
        GraphBuilder::new(&settings, CancelToken::new())
            .build(files)
            .unwrap()
    }

    #[test]
    fn test_build_simple_graph() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("a.js"),
            "export function helper() { return 1; }\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("b.js"),
            "import { helper } from './a';\nhelper();\n",
        )
        .unwrap();

        let outcome = build_project(&dir);
        let graph = &outcome.graph;

        assert_eq!(graph.module_count(), 2);
        let a = graph.module_id("a").unwrap();
        let b = graph.module_id("b").unwrap();

        let edges: Vec<_> = graph.module(b).imports.iter().collect();
        assert_eq!(edges.len(), 1);
        assert!(edges[0].resolved);
        assert_eq!(edges[0].target, Some(a));
        assert_eq!(graph.incoming(a).len(), 1);
    }

    #[test]
    fn test_unresolvable_import_reported_not_traversed() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("a.js"),
            "import _ from 'lodash';\nexport const x = 1;\n",
        )
        .unwrap();

        let outcome = build_project(&dir);
        let graph = &outcome.graph;

        let a = graph.module_id("a").unwrap();
        assert_eq!(graph.module(a).imports.len(), 1);
        assert!(!graph.module(a).imports[0].resolved);
        assert!(outcome
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::UnresolvedImport
                && d.message.contains("lodash")));
    }

    #[test]
    fn test_parse_failure_skips_file_and_continues() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("good.js"), "export const ok = 1;\n").unwrap();
        fs::write(dir.path().join("bad.js"), "import { from ';;;\n").unwrap();

        let outcome = build_project(&dir);

        assert_eq!(outcome.graph.module_count(), 1);
        assert!(outcome.graph.module_id("good").is_some());
        assert!(outcome
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::ParseFailure));
    }

    #[test]
    fn test_deterministic_edge_ordering() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.js"), "export const a = 1;\n").unwrap();
        fs::write(dir.path().join("b.js"), "export const b = 1;\n").unwrap();
        fs::write(
            dir.path().join("main.js"),
            "import { b } from './b';\nimport { a } from './a';\n",
        )
        .unwrap();

        let first = build_project(&dir);
        let second = build_project(&dir);

        let edges = |outcome: &BuildOutcome| -> Vec<(String, String)> {
            outcome
                .graph
                .edges()
                .map(|e| {
                    (
                        outcome.graph.module(e.source).name.clone(),
                        e.specifier.clone(),
                    )
                })
                .collect()
        };

        assert_eq!(edges(&first), edges(&second));
        // Source order inside a module is preserved: ./b before ./a
        let main = first.graph.module_by_name("main").unwrap();
        assert_eq!(main.imports[0].specifier, "./b");
        assert_eq!(main.imports[1].specifier, "./a");
    }

    #[test]
    fn test_cancelled_build_interrupts() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.js"), "export const a = 1;\n").unwrap();

        let settings = settings_for(dir.path());
        let cancel = CancelToken::new();
        cancel.cancel();

        let result = GraphBuilder::new(&settings, cancel)
            .build(vec![dir.path().join("a.js")]);
        assert!(matches!(result, Err(RippleError::Interrupted { .. })));
    }
}
