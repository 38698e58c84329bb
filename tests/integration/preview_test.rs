use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use ripple::core::cancel::CancelToken;
use ripple::core::preview::PreviewEngine;
use ripple::core::scanner::Scanner;
use ripple::error::RippleError;
use ripple::models::config::Settings;
use ripple::models::graph::DependencyGraph;
use ripple::models::operation::RefactorOperation;
use ripple::parsers::graph_builder::GraphBuilder;

fn build_graph(root: &Path) -> DependencyGraph {
    let settings = Settings {
        project_root: root.to_path_buf(),
        ..Settings::default()
    };
    let files = Scanner::new(&settings).scan().unwrap().files;
    GraphBuilder::new(&settings, CancelToken::new())
        .build(files)
        .unwrap()
        .graph
}

fn snapshot(root: &Path) -> Vec<(std::path::PathBuf, Vec<u8>)> {
    let mut entries: Vec<_> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| (e.path().to_path_buf(), fs::read(e.path()).unwrap()))
        .collect();
    entries.sort();
    entries
}

#[test]
fn test_rename_with_scope_shadowing_scenario() {
    // Module b imports foo from a but also defines a local foo inside a
    // function: the import line is rewritten, the shadowed local is not
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("a.js"),
        "export function foo() { return 1; }\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("b.js"),
        "import { foo } from './a';\n\
         export function useIt() {\n\
           return foo();\n\
         }\n\
         export function shadowed() {\n\
           const foo = () => 2;\n\
           return foo();\n\
         }\n",
    )
    .unwrap();

    let graph = build_graph(dir.path());
    let engine = PreviewEngine::new(&graph);
    let changes = engine
        .preview(&RefactorOperation::Rename {
            module: "a".to_string(),
            old_symbol: "foo".to_string(),
            new_symbol: "bar".to_string(),
        })
        .unwrap();

    let b_path = dir.path().join("b.js");
    let b_edits = changes.edits_for(&b_path);

    // Import line and the real reference change
    assert!(b_edits
        .iter()
        .any(|e| e.new_text == "import { bar } from './a';"));
    assert!(b_edits.iter().any(|e| e.new_text.contains("return bar();")));

    // The shadowed function body is untouched
    for edit in b_edits {
        assert!(
            !edit.old_text.contains("const foo"),
            "shadowed declaration must not be edited: {:?}",
            edit
        );
    }
}

#[test]
fn test_preview_leaves_disk_byte_identical() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("core.js"),
        "export function parse(s) { return s; }\nexport function fmt(s) { return s; }\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("app.js"),
        "import { parse, fmt } from './core';\nparse(fmt('x'));\n",
    )
    .unwrap();

    let before = snapshot(dir.path());

    let graph = build_graph(dir.path());
    let engine = PreviewEngine::new(&graph);

    // Run all three operation shapes against the same tree
    engine
        .preview(&RefactorOperation::Rename {
            module: "core".to_string(),
            old_symbol: "parse".to_string(),
            new_symbol: "parseInput".to_string(),
        })
        .unwrap();
    engine
        .preview(&RefactorOperation::Move {
            module: "core".to_string(),
            new_location: "lib/core".to_string(),
        })
        .unwrap();
    let mut partition = BTreeMap::new();
    partition.insert("parse".to_string(), "parsing".to_string());
    partition.insert("fmt".to_string(), "formatting".to_string());
    engine
        .preview(&RefactorOperation::Split {
            module: "core".to_string(),
            partition,
        })
        .unwrap();

    assert_eq!(snapshot(dir.path()), before);
}

#[test]
fn test_move_updates_every_dependent() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("src/deep")).unwrap();
    fs::write(dir.path().join("src/target.js"), "export const t = 1;\n").unwrap();
    fs::write(
        dir.path().join("src/one.js"),
        "import { t } from './target';\nconsole.log(t);\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("src/deep/two.js"),
        "import { t } from '../target';\nconsole.log(t);\n",
    )
    .unwrap();

    let graph = build_graph(dir.path());
    let engine = PreviewEngine::new(&graph);
    let changes = engine
        .preview(&RefactorOperation::Move {
            module: "src/target".to_string(),
            new_location: "shared/target".to_string(),
        })
        .unwrap();

    assert_eq!(changes.file_count(), 2);

    let one = changes.edits_for(&dir.path().join("src/one.js"));
    assert_eq!(one[0].new_text, "import { t } from '../shared/target';");

    let two = changes.edits_for(&dir.path().join("src/deep/two.js"));
    assert_eq!(two[0].new_text, "import { t } from '../../shared/target';");
}

#[test]
fn test_rename_collision_reported_not_resolved() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.js"), "export const foo = 1;\n").unwrap();
    fs::write(
        dir.path().join("b.js"),
        "import { foo } from './a';\nimport { bar } from './c';\nconsole.log(foo, bar);\n",
    )
    .unwrap();
    fs::write(dir.path().join("c.js"), "export const bar = 2;\n").unwrap();

    let graph = build_graph(dir.path());
    let engine = PreviewEngine::new(&graph);

    // b already imports a different `bar`; renaming a::foo -> bar must fail
    let result = engine.preview(&RefactorOperation::Rename {
        module: "a".to_string(),
        old_symbol: "foo".to_string(),
        new_symbol: "bar".to_string(),
    });

    match result {
        Err(RippleError::AmbiguousRewrite { file, symbol, .. }) => {
            assert!(file.ends_with("b.js"));
            assert_eq!(symbol, "bar");
        }
        other => panic!("expected AmbiguousRewrite, got {:?}", other),
    }
}

#[test]
fn test_split_groups_names_per_destination() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("big.js"),
        "export function alpha() {}\nexport function beta() {}\nexport function gamma() {}\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("user.js"),
        "import { alpha, beta, gamma } from './big';\nalpha(); beta(); gamma();\n",
    )
    .unwrap();

    let graph = build_graph(dir.path());
    let engine = PreviewEngine::new(&graph);

    // alpha and beta travel together; gamma goes elsewhere
    let mut partition = BTreeMap::new();
    partition.insert("alpha".to_string(), "ab".to_string());
    partition.insert("beta".to_string(), "ab".to_string());
    partition.insert("gamma".to_string(), "g".to_string());

    let changes = engine
        .preview(&RefactorOperation::Split {
            module: "big".to_string(),
            partition,
        })
        .unwrap();

    let edits = changes.edits_for(&dir.path().join("user.js"));
    assert_eq!(edits.len(), 1);
    assert_eq!(
        edits[0].new_text,
        "import { alpha, beta } from './ab';\nimport { gamma } from './g';"
    );
}
