// src/error.rs
// Pipeline error taxonomy. Block-level failures are never downgraded: a
// single unrecoverable block fails the whole file, partial files are not a
// valid output.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or missing input, or an output collision detected before
    /// any filesystem mutation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// File-level metadata absent or unreadable on the receive path.
    #[error("metadata missing or unreadable: {path}")]
    MissingMeta { path: PathBuf },

    /// The erasure coder failed for one block; fatal for the file.
    #[error("coder failed for block {block_id}: {source}")]
    Coder {
        block_id: String,
        source: CoderError,
    },

    /// Reassembly attempted with a block not in the Reconstructed state.
    #[error("file incomplete: block {block_id} was not reconstructed")]
    IncompleteFile { block_id: String },

    /// External transport failure. Not retried here; retry policy belongs to
    /// the transport or the operator.
    #[error("transport failure: {0}")]
    Transport(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by a [`crate::coder::Coder`] implementation.
#[derive(Debug, Error)]
pub enum CoderError {
    #[error("insufficient shards: {available} available, {needed} needed")]
    InsufficientShards { available: usize, needed: usize },

    #[error("{0}")]
    Backend(String),
}
