// src/config.rs
use std::path::PathBuf;

use crate::{DATA_LEN, NUM_CODE_SHARDS, NUM_DATA_SHARDS};

/// Immutable parameters for one pipeline instance.
///
/// Everything that used to be a process-wide constant lives here, so several
/// pipelines (or tests) can run with different geometries concurrently.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Payload bytes per shard.
    pub data_len: usize,
    /// Data shards per block (K).
    pub data_shards: usize,
    /// Coding shards per block (M).
    pub coding_shards: usize,
    /// Transient home of raw block slices on the sending side.
    pub splits_dir: PathBuf,
    /// Root of per-file shard trees on the sending side.
    pub encoded_dir: PathBuf,
    /// Root of received shard trees and the final output on the receiving side.
    pub decoded_dir: PathBuf,
}

impl PipelineConfig {
    /// One block holds exactly K data shards worth of payload.
    pub fn block_len(&self) -> usize {
        self.data_shards * self.data_len
    }

    pub fn total_shards(&self) -> usize {
        self.data_shards + self.coding_shards
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_len: DATA_LEN,
            data_shards: NUM_DATA_SHARDS,
            coding_shards: NUM_CODE_SHARDS,
            splits_dir: PathBuf::from("splits"),
            encoded_dir: PathBuf::from("encoded"),
            decoded_dir: PathBuf::from("decoded"),
        }
    }
}
