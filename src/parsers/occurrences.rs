//! Scope-aware identifier occurrence collection
//!
//! Rename previews must rewrite references to an imported binding and
//! nothing else: a local variable that happens to share the name is a
//! different binding. This walker keeps a stack of lexical scopes with
//! their declared names; an identifier only counts as an occurrence of
//! the module-level binding when no enclosing scope re-declares it.
//!
//! This is a lexical-scope model, not a type checker. Declarations in a
//! function body are pre-collected before the body is walked so that
//! hoisted `var`/`function` declarations shadow from the first
//! statement, matching how the binding would actually resolve.

use crate::models::module::SourceSpan;
use oxc_ast::ast::*;
use oxc_span::GetSpan;
use std::collections::HashSet;

/// Collect spans of references to `name` that resolve to the
/// module-level binding of that name.
pub fn find_occurrences<'a>(program: &Program<'a>, name: &str) -> Vec<SourceSpan> {
    let mut finder = OccurrenceFinder {
        name,
        scopes: Vec::new(),
        occurrences: Vec::new(),
    };
    for stmt in &program.body {
        finder.visit_statement(stmt);
    }
    finder.occurrences
}

struct OccurrenceFinder<'n> {
    name: &'n str,
    /// Names declared by each enclosing scope, innermost last
    scopes: Vec<HashSet<String>>,
    occurrences: Vec<SourceSpan>,
}

fn to_span(span: oxc_span::Span) -> SourceSpan {
    SourceSpan::new(span.start, span.end)
}

impl<'n> OccurrenceFinder<'n> {
    fn shadowed(&self) -> bool {
        self.scopes.iter().any(|scope| scope.contains(self.name))
    }

    fn record(&mut self, span: oxc_span::Span) {
        if !self.shadowed() {
            self.occurrences.push(to_span(span));
        }
    }

    fn visit_statement<'a>(&mut self, stmt: &Statement<'a>) {
        match stmt {
            // Import specifiers bind names, they do not reference them
            Statement::ImportDeclaration(_) => {}

            Statement::ExportNamedDeclaration(decl) => {
                if let Some(declaration) = &decl.declaration {
                    self.visit_declaration(declaration);
                } else if decl.source.is_none() {
                    // `export { foo }` references the local binding
                    for spec in &decl.specifiers {
                        if spec.local.name().as_str() == self.name {
                            self.record(spec.local.span());
                        }
                    }
                }
            }
            Statement::ExportDefaultDeclaration(decl) => match &decl.declaration {
                ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
                    self.visit_function(func)
                }
                ExportDefaultDeclarationKind::ClassDeclaration(class) => self.visit_class(class),
                _ => {
                    if let Some(expr) = decl.declaration.as_expression() {
                        self.visit_expression(expr);
                    }
                }
            },
            Statement::ExportAllDeclaration(_) => {}

            Statement::FunctionDeclaration(func) => self.visit_function(func),
            Statement::ClassDeclaration(class) => self.visit_class(class),
            Statement::VariableDeclaration(var_decl) => self.visit_variable_declaration(var_decl),

            Statement::ExpressionStatement(expr_stmt) => {
                self.visit_expression(&expr_stmt.expression)
            }
            Statement::BlockStatement(block) => {
                self.scopes.push(declared_in_statements(&block.body));
                for stmt in &block.body {
                    self.visit_statement(stmt);
                }
                self.scopes.pop();
            }
            Statement::IfStatement(if_stmt) => {
                self.visit_expression(&if_stmt.test);
                self.visit_statement(&if_stmt.consequent);
                if let Some(alternate) = &if_stmt.alternate {
                    self.visit_statement(alternate);
                }
            }
            Statement::ReturnStatement(ret) => {
                if let Some(argument) = &ret.argument {
                    self.visit_expression(argument);
                }
            }
            Statement::ThrowStatement(throw) => self.visit_expression(&throw.argument),
            Statement::WhileStatement(while_stmt) => {
                self.visit_expression(&while_stmt.test);
                self.visit_statement(&while_stmt.body);
            }
            Statement::DoWhileStatement(do_while) => {
                self.visit_statement(&do_while.body);
                self.visit_expression(&do_while.test);
            }
            Statement::ForStatement(for_stmt) => {
                let mut scope = HashSet::new();
                if let Some(init) = &for_stmt.init {
                    match init {
                        ForStatementInit::VariableDeclaration(var_decl) => {
                            for declarator in &var_decl.declarations {
                                collect_binding_names(&declarator.id, &mut scope);
                            }
                            self.scopes.push(scope);
                            for declarator in &var_decl.declarations {
                                if let Some(init_expr) = &declarator.init {
                                    self.visit_expression(init_expr);
                                }
                            }
                        }
                        _ => {
                            self.scopes.push(scope);
                            if let Some(expr) = init.as_expression() {
                                self.visit_expression(expr);
                            }
                        }
                    }
                } else {
                    self.scopes.push(scope);
                }
                if let Some(test) = &for_stmt.test {
                    self.visit_expression(test);
                }
                if let Some(update) = &for_stmt.update {
                    self.visit_expression(update);
                }
                self.visit_statement(&for_stmt.body);
                self.scopes.pop();
            }
            Statement::ForInStatement(for_in) => {
                self.visit_for_in_of(&for_in.left, &for_in.right, &for_in.body)
            }
            Statement::ForOfStatement(for_of) => {
                self.visit_for_in_of(&for_of.left, &for_of.right, &for_of.body)
            }
            Statement::TryStatement(try_stmt) => {
                self.visit_statement_as_block(&try_stmt.block);
                if let Some(handler) = &try_stmt.handler {
                    let mut scope = HashSet::new();
                    if let Some(param) = &handler.param {
                        collect_binding_names(&param.pattern, &mut scope);
                    }
                    self.scopes.push(scope);
                    self.visit_statement_as_block(&handler.body);
                    self.scopes.pop();
                }
                if let Some(finalizer) = &try_stmt.finalizer {
                    self.visit_statement_as_block(finalizer);
                }
            }
            Statement::SwitchStatement(switch) => {
                self.visit_expression(&switch.discriminant);
                self.scopes.push(HashSet::new());
                for case in &switch.cases {
                    if let Some(test) = &case.test {
                        self.visit_expression(test);
                    }
                    for stmt in &case.consequent {
                        self.visit_statement(stmt);
                    }
                }
                self.scopes.pop();
            }
            Statement::LabeledStatement(labeled) => self.visit_statement(&labeled.body),
            _ => {}
        }
    }

    fn visit_declaration<'a>(&mut self, declaration: &Declaration<'a>) {
        match declaration {
            Declaration::VariableDeclaration(var_decl) => {
                self.visit_variable_declaration(var_decl)
            }
            Declaration::FunctionDeclaration(func) => self.visit_function(func),
            Declaration::ClassDeclaration(class) => self.visit_class(class),
            _ => {}
        }
    }

    fn visit_variable_declaration<'a>(&mut self, var_decl: &VariableDeclaration<'a>) {
        for declarator in &var_decl.declarations {
            if let Some(init) = &declarator.init {
                self.visit_expression(init);
            }
        }
    }

    fn visit_for_in_of<'a>(
        &mut self,
        left: &ForStatementLeft<'a>,
        right: &Expression<'a>,
        body: &Statement<'a>,
    ) {
        self.visit_expression(right);
        let mut scope = HashSet::new();
        if let ForStatementLeft::VariableDeclaration(var_decl) = left {
            for declarator in &var_decl.declarations {
                collect_binding_names(&declarator.id, &mut scope);
            }
        }
        self.scopes.push(scope);
        self.visit_statement(body);
        self.scopes.pop();
    }

    fn visit_statement_as_block<'a>(&mut self, block: &BlockStatement<'a>) {
        self.scopes.push(declared_in_statements(&block.body));
        for stmt in &block.body {
            self.visit_statement(stmt);
        }
        self.scopes.pop();
    }

    /// Enter a function: parameters and body-level declarations shadow
    /// for the whole body (hoisting)
    fn visit_function<'a>(&mut self, func: &Function<'a>) {
        let mut scope = HashSet::new();
        for param in &func.params.items {
            collect_binding_names(&param.pattern, &mut scope);
        }
        if let Some(rest) = &func.params.rest {
            collect_binding_names(&rest.argument, &mut scope);
        }
        if let Some(body) = &func.body {
            scope.extend(declared_in_statements(&body.statements));
            self.scopes.push(scope);
            for stmt in &body.statements {
                self.visit_statement(stmt);
            }
            self.scopes.pop();
        }
    }

    fn visit_arrow<'a>(&mut self, arrow: &ArrowFunctionExpression<'a>) {
        let mut scope = HashSet::new();
        for param in &arrow.params.items {
            collect_binding_names(&param.pattern, &mut scope);
        }
        if let Some(rest) = &arrow.params.rest {
            collect_binding_names(&rest.argument, &mut scope);
        }
        scope.extend(declared_in_statements(&arrow.body.statements));
        self.scopes.push(scope);
        for stmt in &arrow.body.statements {
            self.visit_statement(stmt);
        }
        self.scopes.pop();
    }

    fn visit_class<'a>(&mut self, class: &Class<'a>) {
        if let Some(super_class) = &class.super_class {
            self.visit_expression(super_class);
        }
        for element in &class.body.body {
            match element {
                ClassElement::MethodDefinition(method) => self.visit_function(&method.value),
                ClassElement::PropertyDefinition(prop) => {
                    if let Some(value) = &prop.value {
                        self.visit_expression(value);
                    }
                }
                ClassElement::StaticBlock(block) => {
                    self.scopes.push(declared_in_statements(&block.body));
                    for stmt in &block.body {
                        self.visit_statement(stmt);
                    }
                    self.scopes.pop();
                }
                _ => {}
            }
        }
    }

    fn visit_expression<'a>(&mut self, expr: &Expression<'a>) {
        match expr {
            Expression::Identifier(ident) => {
                if ident.name == self.name {
                    self.record(ident.span);
                }
            }
            Expression::CallExpression(call) => {
                self.visit_expression(&call.callee);
                self.visit_arguments(&call.arguments);
            }
            Expression::NewExpression(new_expr) => {
                self.visit_expression(&new_expr.callee);
                self.visit_arguments(&new_expr.arguments);
            }
            Expression::AssignmentExpression(assign) => {
                self.visit_assignment_target(&assign.left);
                self.visit_expression(&assign.right);
            }
            Expression::BinaryExpression(binary) => {
                self.visit_expression(&binary.left);
                self.visit_expression(&binary.right);
            }
            Expression::LogicalExpression(logical) => {
                self.visit_expression(&logical.left);
                self.visit_expression(&logical.right);
            }
            Expression::UnaryExpression(unary) => self.visit_expression(&unary.argument),
            Expression::ConditionalExpression(cond) => {
                self.visit_expression(&cond.test);
                self.visit_expression(&cond.consequent);
                self.visit_expression(&cond.alternate);
            }
            Expression::ParenthesizedExpression(paren) => {
                self.visit_expression(&paren.expression)
            }
            Expression::SequenceExpression(seq) => {
                for expr in &seq.expressions {
                    self.visit_expression(expr);
                }
            }
            Expression::ArrayExpression(array) => {
                for element in &array.elements {
                    match element {
                        ArrayExpressionElement::SpreadElement(spread) => {
                            self.visit_expression(&spread.argument)
                        }
                        ArrayExpressionElement::Elision(_) => {}
                        _ => {
                            if let Some(expr) = element.as_expression() {
                                self.visit_expression(expr);
                            }
                        }
                    }
                }
            }
            Expression::ObjectExpression(object) => {
                for property in &object.properties {
                    match property {
                        ObjectPropertyKind::ObjectProperty(prop) => {
                            if prop.computed {
                                if let Some(key) = prop.key.as_expression() {
                                    self.visit_expression(key);
                                }
                            }
                            self.visit_expression(&prop.value);
                        }
                        ObjectPropertyKind::SpreadProperty(spread) => {
                            self.visit_expression(&spread.argument)
                        }
                    }
                }
            }
            Expression::ArrowFunctionExpression(arrow) => self.visit_arrow(arrow),
            Expression::FunctionExpression(func) => {
                // A named function expression's own name shadows inside it
                let mut outer = HashSet::new();
                if let Some(id) = &func.id {
                    outer.insert(id.name.to_string());
                }
                self.scopes.push(outer);
                self.visit_function(func);
                self.scopes.pop();
            }
            Expression::ClassExpression(class) => self.visit_class(class),
            Expression::TemplateLiteral(template) => {
                for expr in &template.expressions {
                    self.visit_expression(expr);
                }
            }
            Expression::TaggedTemplateExpression(tagged) => {
                self.visit_expression(&tagged.tag);
                for expr in &tagged.quasi.expressions {
                    self.visit_expression(expr);
                }
            }
            Expression::AwaitExpression(await_expr) => {
                self.visit_expression(&await_expr.argument)
            }
            Expression::YieldExpression(yield_expr) => {
                if let Some(argument) = &yield_expr.argument {
                    self.visit_expression(argument);
                }
            }
            Expression::ImportExpression(import_expr) => {
                self.visit_expression(&import_expr.source)
            }
            Expression::ChainExpression(chain) => match &chain.expression {
                ChainElement::CallExpression(call) => {
                    self.visit_expression(&call.callee);
                    self.visit_arguments(&call.arguments);
                }
                ChainElement::StaticMemberExpression(member) => {
                    self.visit_expression(&member.object)
                }
                ChainElement::ComputedMemberExpression(member) => {
                    self.visit_expression(&member.object);
                    self.visit_expression(&member.expression);
                }
                ChainElement::PrivateFieldExpression(member) => {
                    self.visit_expression(&member.object)
                }
                _ => {}
            },
            _ => {
                // Member expressions: only the object side can
                // reference the binding, a property name never does
                if let Some(member) = expr.as_member_expression() {
                    match member {
                        MemberExpression::StaticMemberExpression(static_member) => {
                            self.visit_expression(&static_member.object)
                        }
                        MemberExpression::ComputedMemberExpression(computed) => {
                            self.visit_expression(&computed.object);
                            self.visit_expression(&computed.expression);
                        }
                        MemberExpression::PrivateFieldExpression(private) => {
                            self.visit_expression(&private.object)
                        }
                    }
                }
            }
        }
    }

    fn visit_arguments<'a>(&mut self, arguments: &oxc_allocator::Vec<'a, Argument<'a>>) {
        for argument in arguments {
            match argument {
                Argument::SpreadElement(spread) => self.visit_expression(&spread.argument),
                _ => {
                    if let Some(expr) = argument.as_expression() {
                        self.visit_expression(expr);
                    }
                }
            }
        }
    }

    fn visit_assignment_target<'a>(&mut self, target: &AssignmentTarget<'a>) {
        match target {
            AssignmentTarget::AssignmentTargetIdentifier(ident) => {
                if ident.name == self.name {
                    self.record(ident.span);
                }
            }
            AssignmentTarget::StaticMemberExpression(member) => {
                self.visit_expression(&member.object)
            }
            AssignmentTarget::ComputedMemberExpression(member) => {
                self.visit_expression(&member.object);
                self.visit_expression(&member.expression);
            }
            _ => {}
        }
    }
}

/// Names declared directly by a statement list (hoist approximation:
/// `var`, `let`, `const`, `function`, and `class` all shadow for the
/// whole containing scope)
fn declared_in_statements<'a>(statements: &[Statement<'a>]) -> HashSet<String> {
    let mut names = HashSet::new();
    for stmt in statements {
        match stmt {
            Statement::VariableDeclaration(var_decl) => {
                for declarator in &var_decl.declarations {
                    collect_binding_names(&declarator.id, &mut names);
                }
            }
            Statement::FunctionDeclaration(func) => {
                if let Some(id) = &func.id {
                    names.insert(id.name.to_string());
                }
            }
            Statement::ClassDeclaration(class) => {
                if let Some(id) = &class.id {
                    names.insert(id.name.to_string());
                }
            }
            _ => {}
        }
    }
    names
}

/// Collect every name bound by a pattern (identifiers, object/array
/// destructuring, defaults)
fn collect_binding_names(pattern: &BindingPattern, out: &mut HashSet<String>) {
    match &pattern.kind {
        BindingPatternKind::BindingIdentifier(id) => {
            out.insert(id.name.to_string());
        }
        BindingPatternKind::ObjectPattern(object) => {
            for property in &object.properties {
                collect_binding_names(&property.value, out);
            }
            if let Some(rest) = &object.rest {
                collect_binding_names(&rest.argument, out);
            }
        }
        BindingPatternKind::ArrayPattern(array) => {
            for element in array.elements.iter().flatten() {
                collect_binding_names(element, out);
            }
        }
        BindingPatternKind::AssignmentPattern(assignment) => {
            collect_binding_names(&assignment.left, out);
        }
    }
}
