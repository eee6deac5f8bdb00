// src/split.rs
// BlockSplitter: partitions a file into fixed-length blocks on disk.
// The source file is never mutated; the tail of the final block is
// zero-filled in memory instead.

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::padding::compute_padding;

/// Field width that makes block identifiers sort lexicographically in the
/// same order as their numeric indices: the decimal width of the largest
/// index.
pub fn digit_width(num_blocks: usize) -> usize {
    num_blocks.saturating_sub(1).to_string().len()
}

pub fn block_id(index: usize, width: usize) -> String {
    format!("b{index:0width$}")
}

pub fn parse_block_id(id: &str) -> Option<usize> {
    id.strip_prefix('b')?.parse().ok()
}

/// Outcome of a split: how the file was divided, in identifier order.
#[derive(Debug, Clone)]
pub struct SplitReport {
    pub block_ids: Vec<String>,
    pub num_blocks: usize,
    pub padding_bytes: u64,
    pub size_bytes: u64,
}

pub struct BlockSplitter<'a> {
    config: &'a PipelineConfig,
}

impl<'a> BlockSplitter<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    /// Writes `<splits>/<file>/b<id>` slices of exactly `block_len` bytes
    /// each. Concatenating them in identifier order reproduces the padded
    /// file.
    pub fn split(&self, source: &Path) -> Result<SplitReport> {
        let block_len = self.config.block_len();
        if block_len == 0 {
            return Err(Error::InvalidInput("block length must be positive".into()));
        }

        let file_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::InvalidInput(format!("no usable file name in {}", source.display())))?;

        let size_bytes = fs::metadata(source)
            .map_err(|e| Error::InvalidInput(format!("cannot stat {}: {e}", source.display())))?
            .len();
        if size_bytes == 0 {
            return Err(Error::InvalidInput(format!("{} is empty", source.display())));
        }

        let out_dir = self.config.splits_dir.join(file_name);
        if out_dir.exists() {
            return Err(Error::InvalidInput(format!(
                "splits for {file_name} already exist; remove {} and retry",
                out_dir.display()
            )));
        }

        let num_blocks = size_bytes.div_ceil(block_len as u64) as usize;
        let padding_bytes = compute_padding(size_bytes, block_len as u64);
        let width = digit_width(num_blocks);

        fs::create_dir_all(&out_dir)?;
        let mut reader = BufReader::new(File::open(source)?);
        let mut block_ids = Vec::with_capacity(num_blocks);

        for index in 0..num_blocks {
            let mut block = vec![0u8; block_len];
            let mut filled = 0;
            while filled < block_len {
                let n = reader.read(&mut block[filled..])?;
                if n == 0 {
                    break;
                }
                filled += n;
            }
            // Only the final block may come up short; its tail is the padding.
            let id = block_id(index, width);
            fs::write(out_dir.join(&id), &block)?;
            block_ids.push(id);
        }

        Ok(SplitReport {
            block_ids,
            num_blocks,
            padding_bytes,
            size_bytes,
        })
    }
}
