// src/lib.rs
pub mod coder;
pub mod config;
pub mod encode;
pub mod error;
pub mod inventory;
pub mod meta;
pub mod padding;
pub mod pipeline;
pub mod reassemble;
pub mod reconstruct;
pub mod shard;
pub mod split;
pub mod transport;

/// Shard payload length in bytes. Sized so one shard plus addressing fits a
/// single 512-byte frame on the wire.
pub const DATA_LEN: usize = 384;
pub const NUM_DATA_SHARDS: usize = 10;
pub const NUM_CODE_SHARDS: usize = 10;
