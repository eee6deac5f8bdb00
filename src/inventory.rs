// src/inventory.rs
// ShardInventory: what actually arrived for each block, and whether that is
// enough for the fast path. Classification is a pure function over the
// in-memory inventory, so tests can build one without touching a filesystem.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::shard::{parse_shard_name, ShardEntry, ShardKind};

/// Per-block classification.
#[derive(Debug, Clone)]
pub enum BlockState {
    /// All K data shards arrived; entries are in sequence order 0..K-1.
    /// Reconstruction is a pure concatenation.
    Complete(Vec<ShardEntry>),
    /// Fewer than K data shards; everything available (data and coding) is
    /// handed to the coder, which decides whether recovery is possible.
    Degraded(Vec<ShardEntry>),
}

pub struct ShardInventory {
    data_shards: usize,
    coding_shards: usize,
    blocks: BTreeMap<String, Vec<ShardEntry>>,
}

impl ShardInventory {
    pub fn new(data_shards: usize, coding_shards: usize) -> Self {
        Self {
            data_shards,
            coding_shards,
            blocks: BTreeMap::new(),
        }
    }

    /// Scans `<dir>/b*/` for `k<seq>` / `m<seq>` shard files. A shard whose
    /// name does not parse, whose sequence is out of range, or whose size is
    /// not `shard_len` is treated as absent.
    pub fn scan(dir: &Path, data_shards: usize, coding_shards: usize, shard_len: u64) -> std::io::Result<Self> {
        let mut inventory = Self::new(data_shards, coding_shards);
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let block_name = entry.file_name();
            let Some(block_id) = block_name.to_str() else { continue };
            if !block_id.starts_with('b') {
                continue;
            }
            for shard_file in fs::read_dir(entry.path())? {
                let shard_file = shard_file?;
                let name = shard_file.file_name();
                let Some(name) = name.to_str() else { continue };
                let Some((kind, seq)) = parse_shard_name(name) else { continue };
                if shard_file.metadata()?.len() != shard_len {
                    continue;
                }
                inventory.insert(
                    block_id,
                    ShardEntry {
                        kind,
                        seq,
                        path: shard_file.path(),
                    },
                );
            }
        }
        Ok(inventory)
    }

    /// Records one received shard. Out-of-range sequence numbers and
    /// duplicates are dropped rather than trusted.
    pub fn insert(&mut self, block_id: &str, entry: ShardEntry) {
        let limit = match entry.kind {
            ShardKind::Data => self.data_shards,
            ShardKind::Coding => self.coding_shards,
        };
        if entry.seq >= limit {
            return;
        }
        let entries = self.blocks.entry(block_id.to_string()).or_default();
        if entries.iter().any(|e| e.kind == entry.kind && e.seq == entry.seq) {
            return;
        }
        entries.push(entry);
    }

    /// Block ids with at least one shard, in identifier order.
    pub fn block_ids(&self) -> impl Iterator<Item = &str> {
        self.blocks.keys().map(String::as_str)
    }

    /// Decides the reconstruction path for one block. Sequence numbers are
    /// validated here; arrival order is never trusted.
    pub fn classify(&self, block_id: &str) -> BlockState {
        let entries = match self.blocks.get(block_id) {
            Some(entries) => entries.as_slice(),
            None => &[],
        };

        let mut data: Vec<Option<&ShardEntry>> = vec![None; self.data_shards];
        for entry in entries {
            if entry.kind == ShardKind::Data {
                data[entry.seq] = Some(entry);
            }
        }

        if data.iter().all(Option::is_some) {
            BlockState::Complete(data.into_iter().flatten().cloned().collect())
        } else {
            BlockState::Degraded(entries.to_vec())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn entry(kind: ShardKind, seq: usize) -> ShardEntry {
        ShardEntry {
            kind,
            seq,
            path: PathBuf::from(format!("/mem/{}{}", kind.prefix(), seq)),
        }
    }

    fn inventory_with(block_id: &str, entries: Vec<ShardEntry>) -> ShardInventory {
        let mut inv = ShardInventory::new(10, 10);
        for e in entries {
            inv.insert(block_id, e);
        }
        inv
    }

    #[test]
    fn all_data_shards_classify_complete_in_sequence_order() {
        // Insert out of arrival order; classification must re-order by seq.
        let mut entries: Vec<ShardEntry> = (0..10).rev().map(|i| entry(ShardKind::Data, i)).collect();
        entries.push(entry(ShardKind::Coding, 2));
        let inv = inventory_with("b0", entries);

        match inv.classify("b0") {
            BlockState::Complete(ordered) => {
                let seqs: Vec<usize> = ordered.iter().map(|e| e.seq).collect();
                assert_eq!(seqs, (0..10).collect::<Vec<_>>());
                assert!(ordered.iter().all(|e| e.kind == ShardKind::Data));
            }
            other => panic!("expected Complete, got {other:?}"),
        }
    }

    #[test]
    fn missing_data_shard_classifies_degraded_with_everything() {
        let mut entries: Vec<ShardEntry> = (0..9).map(|i| entry(ShardKind::Data, i)).collect();
        entries.push(entry(ShardKind::Coding, 0));
        entries.push(entry(ShardKind::Coding, 7));
        let inv = inventory_with("b1", entries);

        match inv.classify("b1") {
            BlockState::Degraded(available) => assert_eq!(available.len(), 11),
            other => panic!("expected Degraded, got {other:?}"),
        }
    }

    #[test]
    fn unknown_block_is_degraded_and_empty() {
        let inv = ShardInventory::new(10, 10);
        match inv.classify("b9") {
            BlockState::Degraded(available) => assert!(available.is_empty()),
            other => panic!("expected Degraded, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_and_duplicate_shards_are_dropped() {
        let mut inv = ShardInventory::new(10, 10);
        inv.insert("b0", entry(ShardKind::Data, 10));
        inv.insert("b0", entry(ShardKind::Data, 3));
        inv.insert("b0", entry(ShardKind::Data, 3));
        match inv.classify("b0") {
            BlockState::Degraded(available) => assert_eq!(available.len(), 1),
            other => panic!("expected Degraded, got {other:?}"),
        }
    }
}
