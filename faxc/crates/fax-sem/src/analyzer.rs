//! Semantic analysis: scope construction, declaration/use checking, and the terminal
//! unused/uninitialized sweep.

use crate::scope::SymbolTable;
use crate::symbol::{DataType, SymbolKind};
use fax_par::{Ast, AstKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticError {
    pub message: String,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticWarning {
    pub message: String,
    pub line: u32,
}

/// Result of analyzing a program: the populated scope tree plus every error/warning produced.
pub struct AnalysisResult {
    pub symbol_table: SymbolTable,
    pub errors: Vec<SemanticError>,
    pub warnings: Vec<SemanticWarning>,
}

/// Walks a `Program` node, building the scope tree and validating declarations and references.
pub fn analyze(program: &Ast) -> AnalysisResult {
    let mut analyzer = Analyzer {
        table: SymbolTable::new(),
        errors: Vec::new(),
        warnings: Vec::new(),
    };
    analyzer.visit_program(program);
    analyzer.terminal_pass();
    AnalysisResult {
        symbol_table: analyzer.table,
        errors: analyzer.errors,
        warnings: analyzer.warnings,
    }
}

struct Analyzer {
    table: SymbolTable,
    errors: Vec<SemanticError>,
    warnings: Vec<SemanticWarning>,
}

impl Analyzer {
    fn visit_program(&mut self, program: &Ast) {
        for function in &program.children {
            self.visit_function(function);
        }
    }

    fn visit_function(&mut self, function: &Ast) {
        let name = match &function.kind {
            AstKind::FunctionDeclaration { name } => name.clone(),
            _ => return,
        };
        if self.table.declare_function(&name, function.line).is_err() {
            self.errors.push(SemanticError {
                message: format!("function '{}' already declared", name),
                line: function.line,
            });
        }
        self.table.push_scope(name);
        if let Some(body) = function.children.first() {
            self.visit_statements(&body.children);
        }
        self.table.pop_scope();
    }

    fn visit_statements(&mut self, statements: &[Box<Ast>]) {
        for stmt in statements {
            self.visit_statement(stmt);
        }
    }

    fn visit_statement(&mut self, stmt: &Ast) {
        match &stmt.kind {
            AstKind::VariableDeclaration { data_type } => self.visit_var_decl(stmt, data_type),
            AstKind::Assignment => self.visit_assignment(stmt),
            AstKind::ExpressionStatement => self.visit_expr(&stmt.children[0]),
            AstKind::IfStatement => self.visit_if(stmt),
            AstKind::WhileStatement => self.visit_while(stmt),
            AstKind::ReturnStatement => {
                if let Some(expr) = stmt.children.first() {
                    self.visit_expr(expr);
                }
            }
            AstKind::PrintStatement => self.visit_expr(&stmt.children[0]),
            _ => {}
        }
    }

    fn visit_var_decl(&mut self, stmt: &Ast, data_type: &str) {
        let name = match &stmt.children[0].kind {
            AstKind::Identifier { name } => name.clone(),
            _ => return,
        };
        let initializer = stmt.children.get(1);
        if let Some(init) = initializer {
            self.visit_expr(init);
        }
        let ty = DataType::from_type_keyword(data_type).unwrap_or(DataType::Void);
        let result = self.table.declare(
            &name,
            SymbolKind::Variable,
            ty,
            stmt.line,
            initializer.is_some(),
        );
        if let Err(err) = result {
            self.errors.push(SemanticError {
                message: format!(
                    "variable '{}' already declared in scope '{}'",
                    err.name, err.scope_name
                ),
                line: stmt.line,
            });
        }
    }

    fn visit_assignment(&mut self, stmt: &Ast) {
        let name = match &stmt.children[0].kind {
            AstKind::Identifier { name } => name.clone(),
            _ => return,
        };
        self.visit_expr(&stmt.children[1]);
        match self.table.resolve_mut(&name) {
            Some(symbol) => {
                symbol.initialized = true;
                symbol.used = true;
            }
            None => self.errors.push(SemanticError {
                message: format!("variable '{}' not declared", name),
                line: stmt.line,
            }),
        }
    }

    fn visit_if(&mut self, stmt: &Ast) {
        self.visit_expr(&stmt.children[0]);
        self.table.push_scope(format!("if_block_{}", stmt.line));
        self.visit_statements(&stmt.children[1].children);
        self.table.pop_scope();
        if let Some(else_block) = stmt.children.get(2) {
            self.table.push_scope(format!("else_block_{}", stmt.line));
            self.visit_statements(&else_block.children);
            self.table.pop_scope();
        }
    }

    fn visit_while(&mut self, stmt: &Ast) {
        self.visit_expr(&stmt.children[0]);
        self.table
            .push_scope(format!("while_block_{}", stmt.line));
        self.visit_statements(&stmt.children[1].children);
        self.table.pop_scope();
    }

    fn visit_expr(&mut self, expr: &Ast) {
        match &expr.kind {
            AstKind::Identifier { name } => self.visit_identifier_use(name, expr.line),
            AstKind::BinaryExpression { .. } => {
                self.visit_expr(&expr.children[0]);
                self.visit_expr(&expr.children[1]);
            }
            AstKind::Literal { .. }
            | AstKind::StringLiteral { .. }
            | AstKind::BooleanLiteral { .. } => {}
            _ => {}
        }
    }

    /// References a name. Flags an undeclared identifier as an error; flags a use of a
    /// not-yet-initialized variable as a warning. Marking `initialized = true` once warned is
    /// deliberate: it is what keeps the terminal pass's "used but not initialized" check (§4.3)
    /// from re-reporting the same symbol — that check is a safety net for paths that reach the
    /// terminal pass without ever going through a use-site check, not a second independent report
    /// for every uninitialized use.
    fn visit_identifier_use(&mut self, name: &str, line: u32) {
        match self.table.resolve_mut(name) {
            Some(symbol) => {
                if !symbol.initialized {
                    self.warnings.push(SemanticWarning {
                        message: format!("variable '{}' used but may not be initialized", name),
                        line,
                    });
                    symbol.initialized = true;
                }
                symbol.used = true;
            }
            None => self.errors.push(SemanticError {
                message: format!("variable '{}' not declared", name),
                line,
            }),
        }
    }

    fn terminal_pass(&mut self) {
        let mut unused = Vec::new();
        let mut uninitialized = Vec::new();
        for (_, symbol) in self.table.walk_symbols() {
            if !matches!(symbol.symbol_kind, SymbolKind::Variable | SymbolKind::Parameter) {
                continue;
            }
            if !symbol.used {
                unused.push((symbol.name.clone(), symbol.declaration_line));
            }
            if symbol.used && !symbol.initialized {
                uninitialized.push((symbol.name.clone(), symbol.declaration_line));
            }
        }
        for (name, line) in unused {
            self.warnings.push(SemanticWarning {
                message: format!("variable '{}' declared but not used", name),
                line,
            });
        }
        for (name, line) in uninitialized {
            self.warnings.push(SemanticWarning {
                message: format!("variable '{}' used but not initialized", name),
                line,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fax_lex::tokenize;
    use fax_par::parse;

    fn analyze_source(src: &str) -> AnalysisResult {
        let (tokens, _) = tokenize(src);
        let (ast, parse_errors) = parse(&tokens);
        assert!(parse_errors.is_empty(), "{:?}", parse_errors);
        analyze(&ast.unwrap())
    }

    #[test]
    fn declared_and_used_variable_has_no_diagnostics() {
        let result = analyze_source("function main() { int x = 1; print(x); }");
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn used_but_uninitialized_variable_warns_exactly_once() {
        let result = analyze_source("function main() { int x; print(x); }");
        assert!(result.errors.is_empty());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(
            result.warnings[0].message,
            "variable 'x' used but may not be initialized"
        );
    }

    #[test]
    fn redeclaration_in_same_scope_is_an_error() {
        let result = analyze_source("function main() { int x = 1; int x = 2; }");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[0].message,
            "variable 'x' already declared in scope 'main'"
        );
    }

    #[test]
    fn undeclared_variable_use_is_an_error() {
        let result = analyze_source("function main() { print(y); }");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].message, "variable 'y' not declared");
    }

    #[test]
    fn unused_variable_warns_in_terminal_pass() {
        let result = analyze_source("function main() { int x = 1; }");
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].message, "variable 'x' declared but not used");
    }

    #[test]
    fn if_and_else_branches_get_their_own_scopes() {
        let result = analyze_source(
            "function main() { if (1 < 2) { int x = 1; } else { int x = 2; } }",
        );
        assert!(result.errors.is_empty());
        let names: Vec<_> = result
            .symbol_table
            .scopes()
            .iter()
            .map(|s| s.name.clone())
            .collect();
        assert!(names.iter().any(|n| n.starts_with("if_block_")));
        assert!(names.iter().any(|n| n.starts_with("else_block_")));
    }

    #[test]
    fn redeclared_function_is_an_error() {
        let result = analyze_source("function main() { } function main() { }");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].message, "function 'main' already declared");
    }
}
