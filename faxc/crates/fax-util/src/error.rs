//! Error types shared by the driver and every pipeline stage.
//!
//! These are *compiler defects*, not diagnostics about the program being compiled: an I/O failure
//! reading the input file, a stage returning a malformed artifact. Diagnostics about the source
//! program (undeclared variable, syntax error) are plain strings carried directly on
//! `CompileReport`, and never reach these types.

use thiserror::Error;

/// Errors a pipeline stage itself can fail with, independent of which stage it is.
///
/// Each stage crate (`fax-lex`, `fax-par`, ...) wraps its own stage-specific detail in its own
/// error enum; `fax-drv` rolls all of them up into its own top-level error. This shared variant
/// exists for the one failure mode common to every stage: being asked to run after the fail-fast
/// gate should have skipped it.
#[derive(Error, Debug)]
pub enum StageError {
    #[error("stage invoked after a prior stage reported errors")]
    SkippedByGate,
}
