// src/reconstruct.rs
// BlockReconstructor: turns a classified block back into its original bytes.
// Complete blocks are a pure byte-copy; only degraded blocks pay for the
// coder's matrix arithmetic.

use std::fs;

use crate::coder::Coder;
use crate::error::{Error, Result};
use crate::inventory::BlockState;
use crate::shard::ShardKind;

pub struct BlockReconstructor<'a> {
    coder: &'a dyn Coder,
}

impl<'a> BlockReconstructor<'a> {
    pub fn new(coder: &'a dyn Coder) -> Self {
        Self { coder }
    }

    /// `Complete` blocks concatenate their data shards in sequence order.
    /// `Degraded` blocks go through the coder's decode path; a coder error
    /// is fatal for the block, and therefore for the file.
    pub fn reconstruct(&self, block_id: &str, state: &BlockState) -> Result<Vec<u8>> {
        match state {
            BlockState::Complete(ordered) => {
                let mut block = Vec::new();
                for entry in ordered {
                    block.extend_from_slice(&fs::read(&entry.path)?);
                }
                Ok(block)
            }
            BlockState::Degraded(available) => {
                let k = self.coder.data_shards();
                let total = k + self.coder.coding_shards();
                let mut shards: Vec<Option<Vec<u8>>> = vec![None; total];
                for entry in available {
                    let slot = match entry.kind {
                        ShardKind::Data => entry.seq,
                        ShardKind::Coding => k + entry.seq,
                    };
                    shards[slot] = Some(fs::read(&entry.path)?);
                }
                self.coder.decode(shards).map_err(|source| Error::Coder {
                    block_id: block_id.to_string(),
                    source,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coder::ReedSolomonCoder;
    use crate::inventory::ShardInventory;
    use crate::shard::{shard_file_name, ShardEntry};
    use std::path::Path;
    use tempfile::tempdir;

    // Writes an encoded block dir, keeping only the selected shards, and
    // returns the inventory over it.
    fn stage_block(
        dir: &Path,
        coder: &ReedSolomonCoder,
        block: &[u8],
        keep_data: &[usize],
        keep_coding: &[usize],
    ) -> ShardInventory {
        let shards = coder.encode(block).expect("encode");
        let block_dir = dir.join("b0");
        fs::create_dir_all(&block_dir).expect("mkdir");
        let mut inv = ShardInventory::new(10, 10);
        for &i in keep_data {
            let name = shard_file_name(ShardKind::Data, i);
            let path = block_dir.join(&name);
            fs::write(&path, &shards[i]).expect("write shard");
            inv.insert("b0", ShardEntry { kind: ShardKind::Data, seq: i, path });
        }
        for &j in keep_coding {
            let name = shard_file_name(ShardKind::Coding, j);
            let path = block_dir.join(&name);
            fs::write(&path, &shards[10 + j]).expect("write shard");
            inv.insert("b0", ShardEntry { kind: ShardKind::Coding, seq: j, path });
        }
        inv
    }

    fn sample_block() -> Vec<u8> {
        (0..3840u32).map(|i| (i * 17 % 256) as u8).collect()
    }

    #[test]
    fn complete_path_is_byte_exact_without_decoding() {
        let dir = tempdir().expect("tempdir");
        let coder = ReedSolomonCoder::new(10, 10).expect("coder");
        let block = sample_block();
        let all_data: Vec<usize> = (0..10).collect();
        // Coding shards present alongside must not change the result.
        let inv = stage_block(dir.path(), &coder, &block, &all_data, &[0, 5]);

        let state = inv.classify("b0");
        assert!(matches!(state, BlockState::Complete(_)));
        let rebuilt = BlockReconstructor::new(&coder)
            .reconstruct("b0", &state)
            .expect("reconstruct");
        assert_eq!(rebuilt, block);
    }

    #[test]
    fn degraded_path_recovers_through_the_coder() {
        let dir = tempdir().expect("tempdir");
        let coder = ReedSolomonCoder::new(10, 10).expect("coder");
        let block = sample_block();
        // 9 data shards plus one coding shard: exactly enough.
        let inv = stage_block(dir.path(), &coder, &block, &[0, 1, 2, 3, 4, 5, 6, 7, 8], &[3]);

        let state = inv.classify("b0");
        assert!(matches!(state, BlockState::Degraded(_)));
        let rebuilt = BlockReconstructor::new(&coder)
            .reconstruct("b0", &state)
            .expect("reconstruct");
        assert_eq!(rebuilt, block);
    }

    #[test]
    fn degraded_below_threshold_fails_naming_the_block() {
        let dir = tempdir().expect("tempdir");
        let coder = ReedSolomonCoder::new(10, 10).expect("coder");
        let block = sample_block();
        // 9 data shards, no coding shards: one short of the threshold.
        let inv = stage_block(dir.path(), &coder, &block, &[0, 1, 2, 3, 4, 5, 6, 7, 8], &[]);

        let state = inv.classify("b0");
        let err = BlockReconstructor::new(&coder)
            .reconstruct("b0", &state)
            .unwrap_err();
        match err {
            Error::Coder { block_id, .. } => assert_eq!(block_id, "b0"),
            other => panic!("expected Coder error, got {other:?}"),
        }
    }
}
