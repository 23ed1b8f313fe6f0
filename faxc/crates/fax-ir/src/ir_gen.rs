//! Lowers a syntax tree to quadruple-form intermediate code.

use crate::quadruple::{IntermediateCode, QuadKind, Quadruple};
use fax_par::{Ast, AstKind};

/// An IR generator owns its own temporary/label counters — never a global — since a fresh
/// generator is constructed per compilation (see the crate-level concurrency note) and counters
/// from one compilation must never leak into another.
pub struct IrGenerator {
    quadruples: Vec<Quadruple>,
    temp_counter: usize,
    label_counter: usize,
}

impl IrGenerator {
    pub fn new() -> Self {
        IrGenerator {
            quadruples: Vec::new(),
            temp_counter: 0,
            label_counter: 0,
        }
    }

    pub fn generate(mut self, program: &Ast) -> IntermediateCode {
        for function in &program.children {
            self.lower_function(function);
        }
        let mut code = IntermediateCode {
            quadruples: self.quadruples,
            temporal_counter: self.temp_counter,
            label_counter: self.label_counter,
        };
        code.reindex();
        code
    }

    fn fresh_temp(&mut self) -> String {
        let name = format!("t{}", self.temp_counter);
        self.temp_counter += 1;
        name
    }

    fn fresh_label(&mut self, prefix: &str) -> String {
        let name = format!("{}_{}", prefix, self.label_counter);
        self.label_counter += 1;
        name
    }

    fn emit(&mut self, quad: Quadruple) {
        self.quadruples.push(quad);
    }

    fn lower_function(&mut self, function: &Ast) {
        let name = match &function.kind {
            AstKind::FunctionDeclaration { name } => name.clone(),
            _ => return,
        };
        self.emit(
            Quadruple::new(QuadKind::Label)
                .result(format!("func_{}", name))
                .line(function.line),
        );
        if let Some(body) = function.children.first() {
            for stmt in &body.children {
                self.lower_statement(stmt);
            }
        }
        if name == "main" {
            self.emit(
                Quadruple::new(QuadKind::Return)
                    .arg1("0")
                    .line(function.line),
            );
        }
    }

    fn lower_statement(&mut self, stmt: &Ast) {
        match &stmt.kind {
            AstKind::VariableDeclaration { .. } => {
                if let Some(init) = stmt.children.get(1) {
                    let name = match &stmt.children[0].kind {
                        AstKind::Identifier { name } => name.clone(),
                        _ => return,
                    };
                    let value = self.lower_expr(init);
                    self.emit(
                        Quadruple::new(QuadKind::Assignment)
                            .arg1(value)
                            .result(name)
                            .line(stmt.line),
                    );
                }
            }
            AstKind::Assignment => {
                let name = match &stmt.children[0].kind {
                    AstKind::Identifier { name } => name.clone(),
                    _ => return,
                };
                let value = self.lower_expr(&stmt.children[1]);
                self.emit(
                    Quadruple::new(QuadKind::Assignment)
                        .arg1(value)
                        .result(name)
                        .line(stmt.line),
                );
            }
            AstKind::ExpressionStatement => {
                self.lower_expr(&stmt.children[0]);
            }
            AstKind::IfStatement => self.lower_if(stmt),
            AstKind::WhileStatement => self.lower_while(stmt),
            AstKind::ReturnStatement => {
                let value = match stmt.children.first() {
                    Some(expr) => self.lower_expr(expr),
                    None => "0".to_string(),
                };
                self.emit(
                    Quadruple::new(QuadKind::Return)
                        .arg1(value)
                        .line(stmt.line),
                );
            }
            AstKind::PrintStatement => {
                let value = self.lower_expr(&stmt.children[0]);
                self.emit(
                    Quadruple::new(QuadKind::Write)
                        .arg1(value)
                        .line(stmt.line),
                );
            }
            _ => {}
        }
    }

    fn lower_if(&mut self, stmt: &Ast) {
        let cond = self.lower_expr(&stmt.children[0]);
        let else_label = self.fresh_label("else");
        self.emit(
            Quadruple::new(QuadKind::Jump)
                .op("if_false")
                .arg1(cond)
                .result(else_label.clone())
                .line(stmt.line),
        );
        for s in &stmt.children[1].children {
            self.lower_statement(s);
        }
        if let Some(else_block) = stmt.children.get(2) {
            let end_label = self.fresh_label("end");
            self.emit(
                Quadruple::new(QuadKind::Jump)
                    .result(end_label.clone())
                    .line(stmt.line),
            );
            self.emit(
                Quadruple::new(QuadKind::Label)
                    .result(else_label)
                    .line(stmt.line),
            );
            for s in &else_block.children {
                self.lower_statement(s);
            }
            self.emit(
                Quadruple::new(QuadKind::Label)
                    .result(end_label)
                    .line(stmt.line),
            );
        } else {
            self.emit(
                Quadruple::new(QuadKind::Label)
                    .result(else_label)
                    .line(stmt.line),
            );
        }
    }

    fn lower_while(&mut self, stmt: &Ast) {
        let start_label = self.fresh_label("while_start");
        self.emit(
            Quadruple::new(QuadKind::Label)
                .result(start_label.clone())
                .line(stmt.line),
        );
        let cond = self.lower_expr(&stmt.children[0]);
        let end_label = self.fresh_label("while_end");
        self.emit(
            Quadruple::new(QuadKind::Jump)
                .op("if_false")
                .arg1(cond)
                .result(end_label.clone())
                .line(stmt.line),
        );
        for s in &stmt.children[1].children {
            self.lower_statement(s);
        }
        self.emit(
            Quadruple::new(QuadKind::Jump)
                .result(start_label)
                .line(stmt.line),
        );
        self.emit(
            Quadruple::new(QuadKind::Label)
                .result(end_label)
                .line(stmt.line),
        );
    }

    /// Lowers an expression tree to a single operand name, emitting whatever quadruples are
    /// needed to compute it (identifiers and literals need none; a `BinaryExpression` needs one).
    fn lower_expr(&mut self, expr: &Ast) -> String {
        match &expr.kind {
            AstKind::Identifier { name } => name.clone(),
            AstKind::Literal { lexeme } => lexeme.clone(),
            AstKind::StringLiteral { text } => format!("\"{}\"", text),
            AstKind::BooleanLiteral { text } => text.clone(),
            AstKind::BinaryExpression { op } => {
                let lhs = self.lower_expr(&expr.children[0]);
                let rhs = self.lower_expr(&expr.children[1]);
                let temp = self.fresh_temp();
                let kind = if is_comparison(op) {
                    QuadKind::Comparison
                } else {
                    QuadKind::Arithmetic
                };
                self.emit(
                    Quadruple::new(kind)
                        .op(op.clone())
                        .arg1(lhs)
                        .arg2(rhs)
                        .result(temp.clone())
                        .line(expr.line),
                );
                temp
            }
            _ => String::new(),
        }
    }
}

impl Default for IrGenerator {
    fn default() -> Self {
        IrGenerator::new()
    }
}

fn is_comparison(op: &str) -> bool {
    matches!(op, ">" | "<" | "==" | "!=")
}

#[cfg(test)]
mod tests {
    use super::*;
    use fax_lex::tokenize;
    use fax_par::parse;

    fn generate(src: &str) -> IntermediateCode {
        let (tokens, _) = tokenize(src);
        let (ast, errors) = parse(&tokens);
        assert!(errors.is_empty(), "{:?}", errors);
        IrGenerator::new().generate(&ast.unwrap())
    }

    #[test]
    fn main_gets_an_implicit_return_zero() {
        let code = generate("function main() { }");
        assert_eq!(code.quadruples.len(), 2);
        assert_eq!(code.quadruples[0].kind, QuadKind::Label);
        assert_eq!(code.quadruples[0].result.as_deref(), Some("func_main"));
        assert_eq!(code.quadruples[1].kind, QuadKind::Return);
        assert_eq!(code.quadruples[1].arg1.as_deref(), Some("0"));
    }

    #[test]
    fn non_main_function_has_no_implicit_return() {
        let code = generate("function helper() { }");
        assert_eq!(code.quadruples.len(), 1);
    }

    #[test]
    fn binary_expression_allocates_one_temporary() {
        let code = generate("function main() { int x = 2 + 3; }");
        let arithmetic = code
            .quadruples
            .iter()
            .find(|q| q.kind == QuadKind::Arithmetic)
            .unwrap();
        assert_eq!(arithmetic.arg1.as_deref(), Some("2"));
        assert_eq!(arithmetic.arg2.as_deref(), Some("3"));
        assert_eq!(arithmetic.result.as_deref(), Some("t0"));
        assert_eq!(code.temporal_counter, 1);
    }

    #[test]
    fn if_without_else_emits_one_jump_and_one_label() {
        let code = generate("function main() { if (1 < 2) { print(1); } }");
        let jumps = code.quadruples.iter().filter(|q| q.kind == QuadKind::Jump).count();
        let labels = code.quadruples.iter().filter(|q| q.kind == QuadKind::Label).count();
        assert_eq!(jumps, 1);
        // func_main + else_N
        assert_eq!(labels, 2);
    }

    #[test]
    fn if_with_else_emits_two_jumps_and_three_labels() {
        let code =
            generate("function main() { if (1 < 2) { print(1); } else { print(2); } }");
        let jumps = code.quadruples.iter().filter(|q| q.kind == QuadKind::Jump).count();
        let labels = code.quadruples.iter().filter(|q| q.kind == QuadKind::Label).count();
        assert_eq!(jumps, 2);
        assert_eq!(labels, 3);
    }

    #[test]
    fn while_loop_has_matching_start_and_end_labels() {
        let code = generate("function main() { while (0) { print(1); } }");
        let label_names: Vec<_> = code
            .quadruples
            .iter()
            .filter(|q| q.kind == QuadKind::Label)
            .filter_map(|q| q.result.clone())
            .collect();
        assert!(label_names.iter().any(|n| n.starts_with("while_start_")));
        assert!(label_names.iter().any(|n| n.starts_with("while_end_")));
    }

    #[test]
    fn quadruple_indices_match_position_after_generation() {
        let code = generate("function main() { int x = 1 + 2; print(x); }");
        for (i, q) in code.quadruples.iter().enumerate() {
            assert_eq!(q.index, i);
        }
    }
}
