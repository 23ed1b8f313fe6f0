//! Target-code generation: reconstructs structured target-language source text from a linear
//! quadruple sequence plus the symbol table that describes its variables.

mod codegen;

pub use codegen::{generate, CodeGenerator, GenError};
