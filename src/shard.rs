// src/shard.rs
// Shard naming shared by the encoder (which writes shard files) and the
// inventory (which parses them back).

use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShardKind {
    /// Directly concatenable fragment of the block (`k<seq>` on disk).
    Data,
    /// Redundant fragment usable only through the decoder (`m<seq>` on disk).
    Coding,
}

impl ShardKind {
    pub fn prefix(self) -> char {
        match self {
            ShardKind::Data => 'k',
            ShardKind::Coding => 'm',
        }
    }
}

/// One shard file discovered on (or destined for) disk.
#[derive(Debug, Clone)]
pub struct ShardEntry {
    pub kind: ShardKind,
    /// 0-based sequence within its kind.
    pub seq: usize,
    pub path: PathBuf,
}

pub fn shard_file_name(kind: ShardKind, seq: usize) -> String {
    format!("{}{}", kind.prefix(), seq)
}

/// Parses `k<seq>` / `m<seq>`. Anything else is not a shard file.
pub fn parse_shard_name(name: &str) -> Option<(ShardKind, usize)> {
    let kind = match name.chars().next()? {
        'k' => ShardKind::Data,
        'm' => ShardKind::Coding,
        _ => return None,
    };
    let seq = name[1..].parse().ok()?;
    Some((kind, seq))
}
