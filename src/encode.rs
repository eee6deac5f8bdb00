// src/encode.rs
// ShardEncoder: runs every block through the coder and persists the shard
// set under a per-block directory. Blocks are independent, so they encode on
// the rayon pool; the file-level meta record is written only after the last
// block succeeds, so a half-encoded tree is never mistaken for a complete one.

use std::fs;

use rayon::prelude::*;

use crate::coder::Coder;
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::meta;
use crate::shard::{shard_file_name, ShardKind};
use crate::split::SplitReport;

pub struct ShardEncoder<'a> {
    config: &'a PipelineConfig,
    coder: &'a dyn Coder,
}

impl<'a> ShardEncoder<'a> {
    pub fn new(config: &'a PipelineConfig, coder: &'a dyn Coder) -> Self {
        Self { config, coder }
    }

    /// Encodes every split block of `file_name` into
    /// `<encoded>/<file>/b<id>/{k<seq>,m<seq>}` and finishes with the
    /// `meta.txt` record. Any block's coder error aborts the whole file.
    pub fn encode_file(&self, file_name: &str, report: &SplitReport) -> Result<()> {
        let split_dir = self.config.splits_dir.join(file_name);
        let out_root = self.config.encoded_dir.join(file_name);
        fs::create_dir_all(&out_root)?;

        let k = self.coder.data_shards();
        report.block_ids.par_iter().try_for_each(|id| -> Result<()> {
            let block = fs::read(split_dir.join(id))?;
            let shards = self.coder.encode(&block).map_err(|source| Error::Coder {
                block_id: id.clone(),
                source,
            })?;

            let block_dir = out_root.join(id);
            fs::create_dir_all(&block_dir)?;
            for (i, shard) in shards.iter().enumerate() {
                let (kind, seq) = if i < k {
                    (ShardKind::Data, i)
                } else {
                    (ShardKind::Coding, i - k)
                };
                fs::write(block_dir.join(shard_file_name(kind, seq)), shard)?;
            }
            Ok(())
        })?;

        meta::write_num_blocks(&out_root, report.num_blocks)
    }
}
