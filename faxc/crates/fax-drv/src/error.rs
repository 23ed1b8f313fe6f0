//! Error handling for the compiler driver.
//!
//! This carries only Rust-level failures — the driver itself misbehaving, or the outside world
//! (files, configuration) not cooperating. A program that fails to compile is not an error here:
//! [`crate::CompileReport`] always comes back `Ok`, with the failure recorded as diagnostics.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong running the driver itself.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to read source file {path}: {source}")]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write output file {path}: {source}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("target generation failed: {0}")]
    Generation(#[from] fax_gen::GenError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, CompileError>;
