// src/cli.rs
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "shardcast", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set the number of threads for parallel block processing.
    ///
    /// - 0: Auto-detect (Use all available cores).
    /// - 1: Sequential (Single-threaded, good for debugging).
    /// - >1: Force specific thread count.
    #[arg(short = 'j', long, global = true, default_value_t = 0, value_name = "THREADS")]
    pub jobs: usize,
}

/// Erasure-coding geometry shared by every subcommand.
#[derive(Args)]
pub struct CodingOpts {
    /// Number of data shards per block (K)
    #[arg(long, default_value_t = 10, value_name = "K")]
    pub data: usize,

    /// Number of coding shards per block (M)
    #[arg(long, default_value_t = 10, value_name = "M")]
    pub coding: usize,

    /// Payload bytes per shard
    #[arg(long, default_value_t = 384, value_name = "BYTES")]
    pub data_len: usize,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split a file into blocks and erasure-encode each block into shards.
    Encode {
        /// Input file to split and encode
        #[arg(value_name = "INPUT_FILE")]
        input: String,

        /// Root directory for the per-file shard trees
        #[arg(long, default_value = "encoded", value_name = "DIR")]
        encoded_dir: String,

        /// Scratch directory for raw block slices (removed after encoding)
        #[arg(long, default_value = "splits", value_name = "DIR")]
        splits_dir: String,

        #[command(flatten)]
        coding: CodingOpts,
    },

    /// Encode a file and deliver its shard tree to a receiving root.
    Send {
        /// Input file to encode and send
        #[arg(value_name = "INPUT_FILE")]
        input: String,

        /// Receiving `decoded/` root to deliver into
        #[arg(value_name = "DEST_DIR")]
        dest: String,

        /// Root directory for the per-file shard trees
        #[arg(long, default_value = "encoded", value_name = "DIR")]
        encoded_dir: String,

        /// Scratch directory for raw block slices (removed after encoding)
        #[arg(long, default_value = "splits", value_name = "DIR")]
        splits_dir: String,

        #[command(flatten)]
        coding: CodingOpts,
    },

    /// Reconstruct the original file from received shards.
    Decode {
        /// Root directory holding received shard trees
        #[arg(long, default_value = "decoded", value_name = "DIR")]
        decoded_dir: String,

        /// File to reconstruct (defaults to the received name marker)
        #[arg(long, value_name = "NAME")]
        name: Option<String>,

        #[command(flatten)]
        coding: CodingOpts,
    },

    /// Randomly delete received shards to emulate lossy delivery.
    Damage {
        /// File whose received shards should decay
        #[arg(value_name = "NAME")]
        name: String,

        /// Root directory holding received shard trees
        #[arg(long, default_value = "decoded", value_name = "DIR")]
        decoded_dir: String,

        /// Percentage of shards to drop (0-100)
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u8).range(0..=100))]
        dropout: u8,
    },
}
