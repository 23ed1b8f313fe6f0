//! Scope construction and declaration/use validation over a parsed syntax tree.

pub mod analyzer;
pub mod scope;
pub mod symbol;

pub use analyzer::{analyze, AnalysisResult, SemanticError, SemanticWarning};
pub use scope::{RedeclarationError, Scope, ScopeId, SymbolTable};
pub use symbol::{DataType, Symbol, SymbolKind};
