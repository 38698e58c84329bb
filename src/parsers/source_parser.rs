//! Source file parsing using OXC

use crate::error::{Result, RippleError};
use crate::models::module::{SourceSpan, SymbolDef};
use crate::models::ImportedName;
use oxc_allocator::Allocator;
use oxc_diagnostics::OxcDiagnostic;
use oxc_parser::{ParseOptions, Parser};
use oxc_span::SourceType;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Maps byte offsets to 1-based line numbers
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i as u32 + 1);
            }
        }
        Self { line_starts }
    }

    /// 1-based line containing a byte offset
    pub fn line_of(&self, offset: u32) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }

    /// Byte offset at which a 1-based line begins
    pub fn line_start(&self, line: usize) -> u32 {
        self.line_starts[line - 1]
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// One import statement as extracted from a file, before resolution
#[derive(Debug, Clone)]
pub struct RawImport {
    /// Module specifier as written (`./utils`, `lodash`, `<dynamic>`)
    pub specifier: String,
    /// Names this statement brings in, in source order
    pub names: Vec<ImportedName>,
    /// 1-based line of the statement
    pub line: usize,
    /// Whether this came from a dynamic `import()` or `require`
    pub dynamic: bool,
    /// Whether this is a re-export (`export ... from`) rather than an import
    pub reexport: bool,
    /// Span of the whole statement
    pub stmt_span: SourceSpan,
    /// Span of the specifier string's contents (inside the quotes)
    pub specifier_span: SourceSpan,
}

/// Everything the graph builder needs from one parsed file
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub imports: Vec<RawImport>,
    pub symbols: Vec<SymbolDef>,
}

/// Thread-safe allocator pool for reuse across parses.
///
/// A `Mutex` rather than an `RwLock`: `Allocator` is `Send` but not
/// `Sync`, and both take and return are writes anyway.
pub struct AllocatorPool {
    allocators: Arc<Mutex<Vec<Allocator>>>,
}

impl AllocatorPool {
    /// Create a new allocator pool
    pub fn new(size: usize) -> Self {
        let mut allocators = Vec::with_capacity(size);
        for _ in 0..size {
            allocators.push(Allocator::default());
        }
        Self {
            allocators: Arc::new(Mutex::new(allocators)),
        }
    }

    /// Take an allocator from the pool
    pub fn take(&self) -> Option<Allocator> {
        self.allocators.lock().pop()
    }

    /// Return an allocator to the pool
    pub fn return_allocator(&self, allocator: Allocator) {
        self.allocators.lock().push(allocator);
    }
}

/// Stateless parser: content in, import records and symbol definitions
/// out. It never reads from disk itself, which keeps it unit-testable
/// against in-memory strings.
pub struct SourceParser {
    parse_options: ParseOptions,
    allocator_pool: AllocatorPool,
}

impl SourceParser {
    /// Create a new source parser
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions {
                parse_regular_expression: true,
                ..ParseOptions::default()
            },
            allocator_pool: AllocatorPool::new(num_cpus::get()),
        }
    }

    /// Parse one file's content and extract imports and top-level symbols.
    ///
    /// The AST is processed while the allocator is alive and only
    /// lifetime-free data leaves this function.
    pub fn parse(&self, source: &str, path: &Path) -> Result<ParsedFile> {
        let source_type = SourceType::from_path(path).unwrap_or_default();

        let allocator = self
            .allocator_pool
            .take()
            .unwrap_or_else(Allocator::default);

        let ret = Parser::new(&allocator, source, source_type)
            .with_options(self.parse_options.clone())
            .parse();

        if !ret.errors.is_empty() {
            let detail = render_diagnostics(&ret.errors);
            self.allocator_pool.return_allocator(allocator);
            return Err(RippleError::parse_error(path, detail));
        }

        let lines = LineIndex::new(source);
        let (imports, symbols) = super::extractor::extract(&ret.program, &lines);

        self.allocator_pool.return_allocator(allocator);

        Ok(ParsedFile {
            path: path.to_path_buf(),
            imports,
            symbols,
        })
    }
}

impl Default for SourceParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Flatten parser diagnostics into one error detail string
fn render_diagnostics(errors: &[OxcDiagnostic]) -> String {
    errors
        .iter()
        .map(|e| format!("{}", e))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::module::SymbolKind;

    #[test]
    fn test_line_index() {
        let index = LineIndex::new("a\nbb\nccc\n");
        assert_eq!(index.line_of(0), 1);
        assert_eq!(index.line_of(1), 1);
        assert_eq!(index.line_of(2), 2);
        assert_eq!(index.line_of(5), 3);
        assert_eq!(index.line_start(2), 2);
        assert_eq!(index.line_count(), 4);
    }

    #[test]
    fn test_parse_named_imports() {
        let parser = SourceParser::new();
        let source = "import { foo, bar as b } from './utils';\n";
        let parsed = parser.parse(source, Path::new("a.js")).unwrap();

        assert_eq!(parsed.imports.len(), 1);
        let import = &parsed.imports[0];
        assert_eq!(import.specifier, "./utils");
        assert_eq!(import.line, 1);
        assert!(!import.dynamic);
        assert_eq!(import.names.len(), 2);
        assert_eq!(import.names[0].imported, "foo");
        assert_eq!(import.names[0].local, "foo");
        assert_eq!(import.names[1].imported, "bar");
        assert_eq!(import.names[1].local, "b");
    }

    #[test]
    fn test_parse_default_and_namespace_imports() {
        let parser = SourceParser::new();
        let source = "import dflt from './a';\nimport * as ns from './b';\n";
        let parsed = parser.parse(source, Path::new("x.js")).unwrap();

        assert_eq!(parsed.imports.len(), 2);
        assert_eq!(parsed.imports[0].names[0].imported, "default");
        assert_eq!(parsed.imports[0].names[0].local, "dflt");
        assert_eq!(parsed.imports[1].names[0].imported, "*");
        assert_eq!(parsed.imports[1].names[0].local, "ns");
        assert_eq!(parsed.imports[1].line, 2);
    }

    #[test]
    fn test_parse_top_level_symbols() {
        let parser = SourceParser::new();
        let source = "export function parse(input) { return input; }\n\
                      class Lexer {}\n\
                      const VERSION = '1.0';\n";
        let parsed = parser.parse(source, Path::new("m.js")).unwrap();

        assert_eq!(parsed.symbols.len(), 3);
        assert_eq!(parsed.symbols[0].name, "parse");
        assert_eq!(parsed.symbols[0].kind, SymbolKind::Function);
        assert!(parsed.symbols[0].exported);
        assert_eq!(parsed.symbols[1].name, "Lexer");
        assert_eq!(parsed.symbols[1].kind, SymbolKind::Class);
        assert!(!parsed.symbols[1].exported);
        assert_eq!(parsed.symbols[2].name, "VERSION");
        assert_eq!(parsed.symbols[2].kind, SymbolKind::Constant);
        assert_eq!(parsed.symbols[2].line, 3);
    }

    #[test]
    fn test_parse_dynamic_import() {
        let parser = SourceParser::new();
        let source = "const mod = import('./lazy');\nconst other = import(pathVar);\n";
        let parsed = parser.parse(source, Path::new("d.js")).unwrap();

        assert_eq!(parsed.imports.len(), 2);
        assert_eq!(parsed.imports[0].specifier, "./lazy");
        assert!(parsed.imports[0].dynamic);
        assert_eq!(parsed.imports[1].specifier, "<dynamic>");
        assert!(parsed.imports[1].dynamic);
    }

    #[test]
    fn test_parse_require() {
        let parser = SourceParser::new();
        let source = "const utils = require('./utils');\n";
        let parsed = parser.parse(source, Path::new("c.cjs")).unwrap();

        assert_eq!(parsed.imports.len(), 1);
        assert_eq!(parsed.imports[0].specifier, "./utils");
        assert_eq!(parsed.imports[0].names[0].imported, "*");
    }

    #[test]
    fn test_parse_error_on_malformed_source() {
        let parser = SourceParser::new();
        let source = "import { from ';;;\n";
        let result = parser.parse(source, Path::new("bad.js"));

        assert!(result.is_err());
        if let Err(RippleError::Parse { path, .. }) = result {
            assert_eq!(path, PathBuf::from("bad.js"));
        } else {
            panic!("Expected Parse error");
        }
    }

    #[test]
    fn test_reexport_creates_import() {
        let parser = SourceParser::new();
        let source = "export { helper } from './impl';\n";
        let parsed = parser.parse(source, Path::new("barrel.js")).unwrap();

        assert_eq!(parsed.imports.len(), 1);
        assert_eq!(parsed.imports[0].specifier, "./impl");
        assert_eq!(parsed.imports[0].names[0].imported, "helper");
    }
}
