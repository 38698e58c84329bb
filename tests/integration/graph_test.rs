use std::fs;
use std::path::Path;
use tempfile::TempDir;

use ripple::core::cancel::CancelToken;
use ripple::core::dependents::{dependents, dependents_of_name};
use ripple::core::scanner::Scanner;
use ripple::models::config::Settings;
use ripple::models::report::DiagnosticKind;
use ripple::parsers::graph_builder::{BuildOutcome, GraphBuilder};

fn settings_for(root: &Path) -> Settings {
    Settings {
        project_root: root.to_path_buf(),
        ..Settings::default()
    }
}

fn build(root: &Path) -> BuildOutcome {
    let settings = settings_for(root);
    let files = Scanner::new(&settings).scan().unwrap().files;
    GraphBuilder::new(&settings, CancelToken::new())
        .build(files)
        .unwrap()
}

fn write_project(dir: &TempDir, files: &[(&str, &str)]) {
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
}

#[test]
fn test_build_twice_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    write_project(
        &dir,
        &[
            ("src/a.js", "export const a = 1;\n"),
            (
                "src/b.js",
                "import { a } from './a';\nimport { c } from './nested/c';\nexport const b = a;\n",
            ),
            ("src/nested/c.js", "export const c = 3;\n"),
        ],
    );

    let first = build(dir.path());
    let second = build(dir.path());

    let fingerprint = |outcome: &BuildOutcome| -> String {
        let mut out = String::new();
        for module in outcome.graph.modules() {
            out.push_str(&module.name);
            out.push('\n');
            for edge in &module.imports {
                out.push_str(&format!(
                    "  {} -> {} line {} resolved {}\n",
                    module.name, edge.specifier, edge.line, edge.resolved
                ));
            }
        }
        out
    };

    assert_eq!(fingerprint(&first), fingerprint(&second));
}

#[test]
fn test_reverse_dependency_soundness() {
    let dir = TempDir::new().unwrap();
    write_project(
        &dir,
        &[
            ("a.js", "export const a = 1;\n"),
            ("b.js", "import { a } from './a';\nexport const b = a;\n"),
            ("c.js", "import { b } from './b';\nconsole.log(b);\n"),
        ],
    );

    let outcome = build(dir.path());
    let graph = &outcome.graph;

    // For every resolved edge A -> B, A is a direct dependent of B
    for module in graph.modules() {
        for edge in &module.imports {
            if let Some(target) = edge.target {
                let direct = dependents(graph, target, false);
                assert!(
                    direct.contains(&module.id),
                    "{} should be a direct dependent",
                    module.name
                );
            }
        }
    }

    // Transitive closure over the chain c -> b -> a
    let a = graph.module_id("a").unwrap();
    let all = dependents(graph, a, true);
    let names: Vec<&str> = all.iter().map(|&id| graph.module(id).name.as_str()).collect();
    assert_eq!(names, vec!["b", "c"]);
}

#[test]
fn test_unresolvable_import_excluded_from_dependents() {
    let dir = TempDir::new().unwrap();
    write_project(
        &dir,
        &[
            ("app.js", "import _ from 'lodash';\nimport { h } from './helpers';\nh();\n"),
            ("helpers.js", "export function h() {}\n"),
        ],
    );

    let outcome = build(dir.path());
    let graph = &outcome.graph;

    // The lodash edge exists, unresolved, and appears in diagnostics
    let app = graph.module_by_name("app").unwrap();
    assert_eq!(app.imports.len(), 2);
    let lodash_edge = app.imports.iter().find(|e| e.specifier == "lodash").unwrap();
    assert!(!lodash_edge.resolved);
    assert!(lodash_edge.target.is_none());
    assert!(outcome
        .diagnostics
        .iter()
        .any(|d| d.kind == DiagnosticKind::UnresolvedImport && d.message.contains("lodash")));

    // And it never participates in traversal
    assert!(dependents_of_name(graph, "lodash", true).is_empty());
}

#[test]
fn test_index_file_resolution() {
    let dir = TempDir::new().unwrap();
    write_project(
        &dir,
        &[
            ("utils/index.js", "export const u = 1;\n"),
            ("main.js", "import { u } from './utils';\nconsole.log(u);\n"),
        ],
    );

    let outcome = build(dir.path());
    let graph = &outcome.graph;

    let main = graph.module_by_name("main").unwrap();
    let utils = graph.module_id("utils/index").unwrap();
    assert_eq!(main.imports[0].target, Some(utils));
}

#[test]
fn test_mirror_invariant() {
    let dir = TempDir::new().unwrap();
    write_project(
        &dir,
        &[
            ("a.js", "export const a = 1;\n"),
            ("b.js", "import { a } from './a';\nimport x from 'external';\nconsole.log(a, x);\n"),
        ],
    );

    let outcome = build(dir.path());
    let graph = &outcome.graph;

    // Every resolved forward edge has a mirrored reverse entry; no
    // unresolved edge does
    let mut mirrored = 0;
    for module in graph.modules() {
        for (index, edge) in module.imports.iter().enumerate() {
            match edge.target {
                Some(target) => {
                    assert!(graph
                        .incoming(target)
                        .iter()
                        .any(|r| r.source == module.id && r.edge_index == index));
                    mirrored += 1;
                }
                None => assert!(!edge.resolved),
            }
        }
    }
    let total_reverse: usize = graph
        .modules()
        .map(|m| graph.incoming(m.id).len())
        .sum();
    assert_eq!(mirrored, total_reverse);
}
