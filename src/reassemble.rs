// src/reassemble.rs
// FileReassembler: the single cross-block synchronization point. Blocks are
// concatenated by numeric index, never by completion time.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::meta::FileMeta;
use crate::padding::strip_padding;
use crate::split::{block_id, digit_width};

pub struct FileReassembler<'a> {
    config: &'a PipelineConfig,
}

impl<'a> FileReassembler<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    /// Concatenates reconstructed blocks in ascending index order, strips the
    /// recorded padding, and replaces the working shard directory with the
    /// final file at `<decoded>/<name>`.
    ///
    /// Every index in `0..num_blocks` must be present, otherwise the first
    /// missing block is reported and nothing is written.
    pub fn reassemble(&self, meta: &FileMeta, blocks: &BTreeMap<usize, Vec<u8>>) -> Result<PathBuf> {
        let width = digit_width(meta.num_blocks);
        for index in 0..meta.num_blocks {
            if !blocks.contains_key(&index) {
                return Err(Error::IncompleteFile {
                    block_id: block_id(index, width),
                });
            }
        }

        let mut bytes = Vec::with_capacity(meta.num_blocks * self.config.block_len());
        for index in 0..meta.num_blocks {
            bytes.extend_from_slice(&blocks[&index]);
        }
        strip_padding(&mut bytes, meta.padding_bytes as usize);

        let final_path = self.config.decoded_dir.join(&meta.original_name);
        let staging = self
            .config
            .decoded_dir
            .join(format!("{}.part", meta.original_name));
        fs::write(&staging, &bytes)?;

        // The shard working directory makes way for the final file, so
        // storage stays proportional to one in-flight file.
        if final_path.is_dir() {
            fs::remove_dir_all(&final_path)?;
        }
        fs::rename(&staging, &final_path)?;
        Ok(final_path)
    }
}
