//! The syntax tree produced by the parser.

/// Tag distinguishing what a node represents. Payload that belongs to the node itself (a
/// function's name, a variable's declared type, a binary operator) lives on the variant; anything
/// that is itself a subtree (an expression, a block of statements) is a child instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstKind {
    /// Children: zero or more `FunctionDeclaration`s.
    Program,
    /// Children: exactly one `Block` (the function body).
    FunctionDeclaration { name: String },
    /// Children: zero or more statements.
    Block,
    /// Children: one (`Identifier` target, no initializer) or two (target, initializer
    /// expression).
    VariableDeclaration { data_type: String },
    /// Children: exactly two — an `Identifier` (the target) and the value expression.
    Assignment,
    /// Children: exactly one — the wrapped expression.
    ExpressionStatement,
    /// Children: two (condition, then-`Block`) or three (condition, then-`Block`, else-`Block`).
    IfStatement,
    /// Children: exactly two — condition, body `Block`.
    WhileStatement,
    /// Children: zero (bare `return;`) or one (the returned expression).
    ReturnStatement,
    /// Children: exactly one — the printed expression.
    PrintStatement,
    /// Children: exactly two — left and right operands.
    BinaryExpression { op: String },
    /// Children: none.
    Identifier { name: String },
    /// Children: none. Covers integer and float literals; `lexeme` carries the original text.
    Literal { lexeme: String },
    /// Children: none.
    StringLiteral { text: String },
    /// Children: none.
    BooleanLiteral { text: String },
}

/// A node in the syntax tree: its kind, the line it started on, and its ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ast {
    pub kind: AstKind,
    pub line: u32,
    pub children: Vec<Box<Ast>>,
}

impl Ast {
    pub fn new(kind: AstKind, line: u32, children: Vec<Ast>) -> Self {
        Ast {
            kind,
            line,
            children: children.into_iter().map(Box::new).collect(),
        }
    }

    pub fn leaf(kind: AstKind, line: u32) -> Self {
        Ast::new(kind, line, Vec::new())
    }

    /// Counts this node and every node reachable from it — the `ast_nodes_count` metric.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.node_count()).sum::<usize>()
    }
}
