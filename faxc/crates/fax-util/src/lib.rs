//! Shared primitives used by every stage of the compiler: source locations and the typed
//! index-vector used for arena-style owned trees (the scope tree's non-owning parent links, per
//! the redesign flag against parent-owning back-references).

pub mod error;
pub mod index_vec;
pub mod span;

pub use index_vec::{new_index_type, Idx, IndexVec};
pub use span::{FileId, Span};
