//! Recursive-descent parser.
//!
//! The grammar is a fixed four-level expression hierarchy (relational → additive →
//! multiplicative → primary) plus a small set of statement forms — deliberately not a
//! precedence-climbing or Pratt parser, since the source language's operator set never grows.

use crate::ast::{Ast, AstKind};
use fax_lex::{Token, TokenKind};

const TYPE_KEYWORDS: &[&str] = &["int", "float", "bool", "string"];
const RELATIONAL_OPS: &[&str] = &[">", "<", "==", "!="];
const ADDITIVE_OPS: &[&str] = &["+", "-"];
const MULTIPLICATIVE_OPS: &[&str] = &["*", "/"];
/// Operators the scanner can produce that no expression-grammar level recognizes. Encountering one
/// where an operator is expected is a syntax error at the point of use, not a silent no-op.
const RECOGNIZED_OPERATORS: &[&str] = &["+", "-", "*", "/", ">", "<", "==", "!="];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub line: u32,
}

impl ParseError {
    fn new(message: impl Into<String>, line: u32) -> Self {
        ParseError {
            message: message.into(),
            line,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (line {})", self.message, self.line)
    }
}

/// Parses `tokens` into a `Program` node plus any syntax errors encountered along the way.
///
/// Always returns `Some` tree (possibly with fewer functions than the input implied) unless the
/// token stream is such that even top-level recovery cannot proceed — in practice this function
/// never returns `None`, but the signature allows for it to stay honest about failed productions
/// bubbling up from deeply nested calls.
pub fn parse(tokens: &[Token]) -> (Option<Ast>, Vec<ParseError>) {
    let mut parser = Parser::new(tokens);
    let program = parser.parse_program();
    (program, parser.errors)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Parser {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn current_line(&self) -> u32 {
        self.current().map(|t| t.line).unwrap_or_else(|| {
            self.tokens.last().map(|t| t.line).unwrap_or(1)
        })
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn advance(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn check_keyword(&self, text: &str) -> bool {
        self.current().map(|t| t.is_keyword(text)).unwrap_or(false)
    }

    fn check_delimiter(&self, text: &str) -> bool {
        self.current()
            .map(|t| t.is_delimiter(text))
            .unwrap_or(false)
    }

    fn check_operator(&self, text: &str) -> bool {
        self.current().map(|t| t.is_operator(text)).unwrap_or(false)
    }

    fn match_operator(&mut self, text: &str) -> bool {
        if self.check_operator(text) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_delimiter(&mut self, text: &str) -> bool {
        if self.check_delimiter(text) {
            self.advance();
            true
        } else {
            let line = self.current_line();
            self.errors
                .push(ParseError::new(format!("expected '{}'", text), line));
            false
        }
    }

    fn expect_keyword(&mut self, text: &str) -> bool {
        if self.check_keyword(text) {
            self.advance();
            true
        } else {
            let line = self.current_line();
            self.errors
                .push(ParseError::new(format!("expected '{}'", text), line));
            false
        }
    }

    // ---- grammar entry points ----

    fn parse_program(&mut self) -> Option<Ast> {
        let mut functions = Vec::new();
        let mut saw_trailing_tokens = false;
        while !self.is_at_end() {
            if self.check_keyword("function") {
                if let Some(func) = self.parse_function_decl() {
                    functions.push(func);
                    continue;
                }
            }
            saw_trailing_tokens = true;
            self.advance();
        }
        if saw_trailing_tokens {
            self.errors
                .push(ParseError::new("unexpected tokens after program", 1));
        }
        Some(Ast::new(AstKind::Program, 1, functions))
    }

    fn parse_function_decl(&mut self) -> Option<Ast> {
        let line = self.current_line();
        self.expect_keyword("function");
        let name = self.expect_identifier()?;
        self.expect_delimiter("(");
        self.expect_delimiter(")");
        let block = self.parse_block()?;
        Some(Ast::new(
            AstKind::FunctionDeclaration { name },
            line,
            vec![block],
        ))
    }

    fn parse_block(&mut self) -> Option<Ast> {
        let line = self.current_line();
        self.expect_delimiter("{");
        let mut statements = Vec::new();
        while !self.is_at_end() && !self.check_delimiter("}") {
            match self.parse_statement() {
                Some(stmt) => statements.push(stmt),
                None => {
                    let err_line = self.current_line();
                    let lexeme = self
                        .current()
                        .map(|t| t.lexeme.clone())
                        .unwrap_or_default();
                    self.errors.push(ParseError::new(
                        format!("unexpected token '{}' in statement", lexeme),
                        err_line,
                    ));
                    self.advance();
                }
            }
        }
        self.expect_delimiter("}");
        Some(Ast::new(AstKind::Block, line, statements))
    }

    fn parse_statement(&mut self) -> Option<Ast> {
        if TYPE_KEYWORDS
            .iter()
            .any(|kw| self.check_keyword(kw))
        {
            return self.parse_var_decl();
        }
        if self.check_keyword("if") {
            return self.parse_if();
        }
        if self.check_keyword("while") {
            return self.parse_while();
        }
        if self.check_keyword("return") {
            return self.parse_return();
        }
        if self.check_keyword("print") {
            return self.parse_print();
        }
        if matches!(self.current(), Some(t) if t.kind == TokenKind::Identifier) {
            return self.parse_assignment_or_expr_stmt();
        }
        self.parse_expr_stmt()
    }

    fn parse_var_decl(&mut self) -> Option<Ast> {
        let line = self.current_line();
        let data_type = self.advance()?.lexeme.clone();
        let name = self.expect_identifier()?;
        let name_node = Ast::leaf(AstKind::Identifier { name }, line);
        let mut children = vec![name_node];
        if self.match_operator("=") {
            let init = self.parse_expression()?;
            children.push(init);
        }
        self.expect_delimiter(";");
        Some(Ast::new(
            AstKind::VariableDeclaration { data_type },
            line,
            children,
        ))
    }

    /// Disambiguates `IDENT '=' Expression ';'` from a bare expression statement starting with an
    /// identifier by saving the cursor, peeking past the identifier, then restoring if it turns
    /// out not to be an assignment.
    fn parse_assignment_or_expr_stmt(&mut self) -> Option<Ast> {
        let saved = self.pos;
        let line = self.current_line();
        let name = self.advance().map(|t| t.lexeme.clone())?;
        if self.check_operator("=") {
            self.advance();
            let value = self.parse_expression()?;
            self.expect_delimiter(";");
            let target = Ast::leaf(AstKind::Identifier { name }, line);
            return Some(Ast::new(AstKind::Assignment, line, vec![target, value]));
        }
        self.pos = saved;
        self.parse_expr_stmt()
    }

    fn parse_expr_stmt(&mut self) -> Option<Ast> {
        let line = self.current_line();
        let expr = self.parse_expression()?;
        self.expect_delimiter(";");
        Some(Ast::new(AstKind::ExpressionStatement, line, vec![expr]))
    }

    fn parse_if(&mut self) -> Option<Ast> {
        let line = self.current_line();
        self.advance(); // 'if'
        self.expect_delimiter("(");
        let condition = self.parse_expression()?;
        self.expect_delimiter(")");
        let then_block = self.parse_block()?;
        let mut children = vec![condition, then_block];
        if self.check_keyword("else") {
            self.advance();
            let else_block = self.parse_block()?;
            children.push(else_block);
        }
        Some(Ast::new(AstKind::IfStatement, line, children))
    }

    fn parse_while(&mut self) -> Option<Ast> {
        let line = self.current_line();
        self.advance(); // 'while'
        self.expect_delimiter("(");
        let condition = self.parse_expression()?;
        self.expect_delimiter(")");
        let body = self.parse_block()?;
        Some(Ast::new(
            AstKind::WhileStatement,
            line,
            vec![condition, body],
        ))
    }

    fn parse_return(&mut self) -> Option<Ast> {
        let line = self.current_line();
        self.advance(); // 'return'
        let mut children = Vec::new();
        if !self.check_delimiter(";") {
            children.push(self.parse_expression()?);
        }
        self.expect_delimiter(";");
        Some(Ast::new(AstKind::ReturnStatement, line, children))
    }

    fn parse_print(&mut self) -> Option<Ast> {
        let line = self.current_line();
        self.advance(); // 'print'
        self.expect_delimiter("(");
        let expr = self.parse_expression()?;
        self.expect_delimiter(")");
        self.expect_delimiter(";");
        Some(Ast::new(AstKind::PrintStatement, line, vec![expr]))
    }

    // ---- expression grammar ----

    fn parse_expression(&mut self) -> Option<Ast> {
        self.parse_relational()
    }

    fn parse_relational(&mut self) -> Option<Ast> {
        self.parse_binary_level(RELATIONAL_OPS, Self::parse_additive)
    }

    fn parse_additive(&mut self) -> Option<Ast> {
        self.parse_binary_level(ADDITIVE_OPS, Self::parse_multiplicative)
    }

    fn parse_multiplicative(&mut self) -> Option<Ast> {
        self.parse_binary_level(MULTIPLICATIVE_OPS, Self::parse_primary)
    }

    fn parse_binary_level(
        &mut self,
        ops: &[&str],
        mut operand: impl FnMut(&mut Self) -> Option<Ast>,
    ) -> Option<Ast> {
        let mut left = operand(self)?;
        loop {
            let op = match self.current() {
                Some(t) if t.kind == TokenKind::Operator && ops.contains(&t.lexeme.as_str()) => {
                    t.lexeme.clone()
                }
                _ => break,
            };
            let line = self.current_line();
            self.advance();
            let right = operand(self)?;
            left = Ast::new(AstKind::BinaryExpression { op }, line, vec![left, right]);
        }
        Some(left)
    }

    fn parse_primary(&mut self) -> Option<Ast> {
        let line = self.current_line();
        match self.current()?.kind {
            TokenKind::Identifier => {
                let name = self.advance().unwrap().lexeme.clone();
                Some(Ast::leaf(AstKind::Identifier { name }, line))
            }
            TokenKind::Integer | TokenKind::Float => {
                let lexeme = self.advance().unwrap().lexeme.clone();
                Some(Ast::leaf(AstKind::Literal { lexeme }, line))
            }
            TokenKind::String => {
                let text = self.advance().unwrap().lexeme.clone();
                Some(Ast::leaf(AstKind::StringLiteral { text }, line))
            }
            TokenKind::Keyword if self.check_keyword("true") || self.check_keyword("false") => {
                let text = self.advance().unwrap().lexeme.clone();
                Some(Ast::leaf(AstKind::BooleanLiteral { text }, line))
            }
            TokenKind::Delimiter if self.check_delimiter("(") => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_delimiter(")");
                Some(expr)
            }
            TokenKind::Operator => {
                let lexeme = self.current().unwrap().lexeme.clone();
                if RECOGNIZED_OPERATORS.contains(&lexeme.as_str()) {
                    // A recognized binary operator appearing where an operand was expected is
                    // still a syntax error, just not the "unused operator" case.
                    self.errors.push(ParseError::new(
                        format!("unexpected token '{}'", lexeme),
                        line,
                    ));
                } else {
                    self.errors.push(ParseError::new(
                        format!("unexpected operator '{}'", lexeme),
                        line,
                    ));
                }
                None
            }
            _ => {
                let lexeme = self.current().map(|t| t.lexeme.clone()).unwrap_or_default();
                self.errors.push(ParseError::new(
                    format!("unexpected token '{}'", lexeme),
                    line,
                ));
                None
            }
        }
    }

    fn expect_identifier(&mut self) -> Option<String> {
        if matches!(self.current(), Some(t) if t.kind == TokenKind::Identifier) {
            Some(self.advance().unwrap().lexeme.clone())
        } else {
            let line = self.current_line();
            self.errors
                .push(ParseError::new("expected identifier", line));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fax_lex::tokenize;

    fn parse_source(src: &str) -> (Option<Ast>, Vec<ParseError>) {
        let (tokens, lex_errors) = tokenize(src);
        assert!(lex_errors.is_empty(), "unexpected lex errors: {:?}", lex_errors);
        parse(&tokens)
    }

    #[test]
    fn parses_minimal_function() {
        let (ast, errors) = parse_source("function main() { }");
        assert!(errors.is_empty());
        let program = ast.unwrap();
        assert_eq!(program.children.len(), 1);
        assert!(matches!(
            program.children[0].kind,
            AstKind::FunctionDeclaration { ref name } if name == "main"
        ));
    }

    #[test]
    fn parses_variable_declaration_with_initializer() {
        let (ast, errors) = parse_source("function main() { int x = 2 + 3; }");
        assert!(errors.is_empty());
        let block = &ast.unwrap().children[0].children[0];
        let decl = &block.children[0];
        assert!(matches!(decl.kind, AstKind::VariableDeclaration { ref data_type } if data_type == "int"));
        assert_eq!(decl.children.len(), 2);
    }

    #[test]
    fn disambiguates_assignment_from_expression_statement() {
        let (ast, errors) = parse_source("function main() { x = 1; x + 1; }");
        assert!(errors.is_empty());
        let block = &ast.unwrap().children[0].children[0];
        assert!(matches!(block.children[0].kind, AstKind::Assignment));
        assert!(matches!(
            block.children[1].kind,
            AstKind::ExpressionStatement
        ));
    }

    #[test]
    fn if_without_else_has_two_children() {
        let (ast, errors) = parse_source("function main() { if (1 < 2) { print(1); } }");
        assert!(errors.is_empty());
        let stmt = &ast.unwrap().children[0].children[0].children[0];
        assert!(matches!(stmt.kind, AstKind::IfStatement));
        assert_eq!(stmt.children.len(), 2);
    }

    #[test]
    fn if_with_else_has_three_children() {
        let (ast, errors) =
            parse_source("function main() { if (1 < 2) { print(1); } else { print(2); } }");
        assert!(errors.is_empty());
        let stmt = &ast.unwrap().children[0].children[0].children[0];
        assert_eq!(stmt.children.len(), 3);
    }

    #[test]
    fn precedence_binds_multiplicative_tighter_than_additive() {
        let (ast, errors) = parse_source("function main() { int x = 2 + 3 * 4; }");
        assert!(errors.is_empty());
        let decl = &ast.unwrap().children[0].children[0].children[0];
        let init = &decl.children[1];
        assert!(matches!(init.kind, AstKind::BinaryExpression { ref op } if op == "+"));
        assert!(matches!(
            init.children[1].kind,
            AstKind::BinaryExpression { ref op } if op == "*"
        ));
    }

    #[test]
    fn unused_operator_is_a_syntax_error_at_use_site() {
        let (_, errors) = parse_source("function main() { int x = ! 1; }");
        assert!(errors
            .iter()
            .any(|e| e.message.contains("unexpected operator '!'")));
    }

    #[test]
    fn missing_semicolon_is_recorded_and_parsing_continues() {
        let (ast, errors) =
            parse_source("function main() { int x = 1 print(x); }");
        assert!(!errors.is_empty());
        // recovery still yields a tree with the print statement present afterward.
        let block = &ast.unwrap().children[0].children[0];
        assert!(block
            .children
            .iter()
            .any(|c| matches!(c.kind, AstKind::PrintStatement)));
    }

    #[test]
    fn trailing_tokens_after_program_are_reported() {
        let (ast, errors) = parse_source("function main() { } garbage");
        assert!(errors
            .iter()
            .any(|e| e.message == "unexpected tokens after program"));
        // recovery still yields the partial tree with the function that did parse.
        assert_eq!(ast.unwrap().children.len(), 1);
    }

    #[test]
    fn trailing_tokens_produce_exactly_one_error_regardless_of_count() {
        let (_, errors) = parse_source("function main() { } garbage more junk");
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.message == "unexpected tokens after program")
                .count(),
            1
        );
    }

    #[test]
    fn boolean_literal_comes_from_keyword_tokens() {
        let (ast, errors) = parse_source("function main() { bool b = true; }");
        assert!(errors.is_empty());
        let decl = &ast.unwrap().children[0].children[0].children[0];
        assert!(matches!(decl.children[1].kind, AstKind::BooleanLiteral { ref text } if text == "true"));
    }
}
