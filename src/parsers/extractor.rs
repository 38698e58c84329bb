//! Import and symbol extraction using an AST visitor

use crate::models::module::{SourceSpan, SymbolDef, SymbolKind};
use crate::models::ImportedName;
use oxc_ast::ast::*;
use oxc_span::GetSpan;

use super::source_parser::{LineIndex, RawImport};

/// Walk a program and pull out its import statements and top-level
/// symbol definitions, in source order.
pub fn extract<'a>(program: &Program<'a>, lines: &LineIndex) -> (Vec<RawImport>, Vec<SymbolDef>) {
    let mut extractor = Extractor {
        lines,
        imports: Vec::new(),
        symbols: Vec::new(),
    };
    extractor.visit_program(program);
    (extractor.imports, extractor.symbols)
}

struct Extractor<'i> {
    lines: &'i LineIndex,
    imports: Vec<RawImport>,
    symbols: Vec<SymbolDef>,
}

fn to_span(span: oxc_span::Span) -> SourceSpan {
    SourceSpan::new(span.start, span.end)
}

/// Span of a string literal's contents, without the quotes
fn literal_inner_span(span: oxc_span::Span) -> SourceSpan {
    SourceSpan::new(span.start + 1, span.end.saturating_sub(1))
}

impl<'i> Extractor<'i> {
    fn visit_program<'a>(&mut self, program: &Program<'a>) {
        for stmt in &program.body {
            self.visit_statement(stmt);
        }
    }

    fn visit_statement<'a>(&mut self, stmt: &Statement<'a>) {
        match stmt {
            Statement::ImportDeclaration(decl) => self.visit_import_declaration(decl),
            Statement::ExportNamedDeclaration(decl) => self.visit_export_named_declaration(decl),
            Statement::ExportDefaultDeclaration(decl) => {
                self.visit_export_default_declaration(decl)
            }
            Statement::ExportAllDeclaration(decl) => self.visit_export_all_declaration(decl),
            Statement::FunctionDeclaration(func) => self.record_function(func, false),
            Statement::ClassDeclaration(class) => self.record_class(class, false),
            Statement::VariableDeclaration(var_decl) => {
                self.record_variable_declaration(var_decl, false);
                for declarator in &var_decl.declarations {
                    if let Some(init) = &declarator.init {
                        self.visit_expression(init, binding_name(&declarator.id));
                    }
                }
            }
            Statement::ExpressionStatement(expr_stmt) => {
                self.visit_expression(&expr_stmt.expression, None);
            }
            _ => {}
        }
    }

    /// Scan an expression for `require()` and dynamic `import()` uses.
    /// Only top-level expression positions are walked; imports buried
    /// in function bodies are runtime-conditional and out of scope for
    /// the static graph.
    fn visit_expression<'a>(&mut self, expr: &Expression<'a>, local: Option<String>) {
        match expr {
            Expression::CallExpression(call_expr) => self.visit_call_expression(call_expr, local),
            Expression::ImportExpression(import_expr) => {
                // Dynamic import(): a string literal argument still
                // names a module, anything else is unresolvable
                let (specifier, specifier_span) =
                    if let Expression::StringLiteral(lit) = &import_expr.source {
                        (lit.value.as_str().to_string(), literal_inner_span(lit.span))
                    } else {
                        ("<dynamic>".to_string(), to_span(import_expr.span))
                    };

                self.imports.push(RawImport {
                    specifier,
                    names: Vec::new(),
                    line: self.lines.line_of(import_expr.span.start),
                    dynamic: true,
                    reexport: false,
                    stmt_span: to_span(import_expr.span),
                    specifier_span,
                });
            }
            Expression::AwaitExpression(await_expr) => {
                self.visit_expression(&await_expr.argument, local);
            }
            _ => {}
        }
    }

    fn visit_call_expression<'a>(&mut self, expr: &CallExpression<'a>, local: Option<String>) {
        // require() calls
        if let Expression::Identifier(ident) = &expr.callee {
            if ident.name == "require" && !expr.arguments.is_empty() {
                if let Some(Argument::StringLiteral(lit)) = expr.arguments.first() {
                    let local = local.unwrap_or_else(|| "*".to_string());
                    self.imports.push(RawImport {
                        specifier: lit.value.as_str().to_string(),
                        names: vec![ImportedName {
                            imported: "*".to_string(),
                            local,
                            span: to_span(lit.span),
                        }],
                        line: self.lines.line_of(expr.span.start),
                        dynamic: false,
                        reexport: false,
                        stmt_span: to_span(expr.span),
                        specifier_span: literal_inner_span(lit.span),
                    });
                }
            }
        }
    }

    fn visit_import_declaration<'a>(&mut self, decl: &ImportDeclaration<'a>) {
        let mut names = Vec::new();

        if let Some(specifiers) = &decl.specifiers {
            for specifier in specifiers {
                match specifier {
                    ImportDeclarationSpecifier::ImportSpecifier(spec) => {
                        names.push(ImportedName {
                            imported: spec.imported.name().to_string(),
                            local: spec.local.name.to_string(),
                            span: to_span(spec.span),
                        });
                    }
                    ImportDeclarationSpecifier::ImportDefaultSpecifier(spec) => {
                        names.push(ImportedName {
                            imported: "default".to_string(),
                            local: spec.local.name.to_string(),
                            span: to_span(spec.span),
                        });
                    }
                    ImportDeclarationSpecifier::ImportNamespaceSpecifier(spec) => {
                        names.push(ImportedName {
                            imported: "*".to_string(),
                            local: spec.local.name.to_string(),
                            span: to_span(spec.span),
                        });
                    }
                }
            }
        }

        self.imports.push(RawImport {
            specifier: decl.source.value.as_str().to_string(),
            names,
            line: self.lines.line_of(decl.span.start),
            dynamic: false,
            reexport: false,
            stmt_span: to_span(decl.span),
            specifier_span: literal_inner_span(decl.source.span),
        });
    }

    fn visit_export_named_declaration<'a>(&mut self, decl: &ExportNamedDeclaration<'a>) {
        // `export { a as b } from './x'` imports `a` from x and
        // re-exposes it; that is an import edge like any other
        if let Some(source) = &decl.source {
            let names = decl
                .specifiers
                .iter()
                .map(|spec| ImportedName {
                    imported: spec.local.name().to_string(),
                    local: spec.exported.name().to_string(),
                    span: to_span(spec.span),
                })
                .collect();

            self.imports.push(RawImport {
                specifier: source.value.as_str().to_string(),
                names,
                line: self.lines.line_of(decl.span.start),
                dynamic: false,
                reexport: true,
                stmt_span: to_span(decl.span),
                specifier_span: literal_inner_span(source.span),
            });
            return;
        }

        // `export const x = ...` / `export function f() {}` definitions
        if let Some(declaration) = &decl.declaration {
            match declaration {
                Declaration::VariableDeclaration(var_decl) => {
                    self.record_variable_declaration(var_decl, true);
                }
                Declaration::FunctionDeclaration(func) => self.record_function(func, true),
                Declaration::ClassDeclaration(class) => self.record_class(class, true),
                _ => {}
            }
        }
    }

    fn visit_export_default_declaration<'a>(&mut self, decl: &ExportDefaultDeclaration<'a>) {
        match &decl.declaration {
            ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
                self.record_function(func, true)
            }
            ExportDefaultDeclarationKind::ClassDeclaration(class) => self.record_class(class, true),
            _ => {}
        }
    }

    fn visit_export_all_declaration<'a>(&mut self, decl: &ExportAllDeclaration<'a>) {
        self.imports.push(RawImport {
            specifier: decl.source.value.as_str().to_string(),
            names: vec![ImportedName {
                imported: "*".to_string(),
                local: "*".to_string(),
                span: to_span(decl.span),
            }],
            line: self.lines.line_of(decl.span.start),
            dynamic: false,
            reexport: true,
            stmt_span: to_span(decl.span),
            specifier_span: literal_inner_span(decl.source.span),
        });
    }

    fn record_function<'a>(&mut self, func: &Function<'a>, exported: bool) {
        if let Some(id) = &func.id {
            self.symbols.push(SymbolDef {
                name: id.name.to_string(),
                kind: SymbolKind::Function,
                line: self.lines.line_of(func.span.start),
                name_span: to_span(id.span),
                decl_span: to_span(func.span),
                exported,
            });
        }
    }

    fn record_class<'a>(&mut self, class: &Class<'a>, exported: bool) {
        if let Some(id) = &class.id {
            self.symbols.push(SymbolDef {
                name: id.name.to_string(),
                kind: SymbolKind::Class,
                line: self.lines.line_of(class.span.start),
                name_span: to_span(id.span),
                decl_span: to_span(class.span),
                exported,
            });
        }
    }

    fn record_variable_declaration<'a>(&mut self, var_decl: &VariableDeclaration<'a>, exported: bool) {
        for declarator in &var_decl.declarations {
            if let BindingPatternKind::BindingIdentifier(id) = &declarator.id.kind {
                // Skip bindings that are just require() aliases; those
                // become import edges instead
                if is_require_call(declarator.init.as_ref()) {
                    continue;
                }
                self.symbols.push(SymbolDef {
                    name: id.name.to_string(),
                    kind: SymbolKind::Constant,
                    line: self.lines.line_of(var_decl.span.start),
                    name_span: to_span(id.span),
                    decl_span: to_span(var_decl.span),
                    exported,
                });
            }
        }
    }
}

/// Name bound by a simple `const x = ...` declarator, if any
fn binding_name(pattern: &BindingPattern) -> Option<String> {
    if let BindingPatternKind::BindingIdentifier(id) = &pattern.kind {
        Some(id.name.to_string())
    } else {
        None
    }
}

fn is_require_call(init: Option<&Expression>) -> bool {
    if let Some(Expression::CallExpression(call)) = init {
        if let Expression::Identifier(ident) = &call.callee {
            return ident.name == "require";
        }
    }
    false
}
