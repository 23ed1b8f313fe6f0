//! Quadruple-form intermediate code: generation from a syntax tree, and the fixed-order optimizer
//! passes that run over it.

mod ir_gen;
mod optimizer;
mod quadruple;

pub use ir_gen::IrGenerator;
pub use optimizer::optimize;
pub use quadruple::{IntermediateCode, QuadKind, Quadruple};
