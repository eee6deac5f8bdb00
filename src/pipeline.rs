// src/pipeline.rs
// End-to-end orchestration of the two sides. Collision checks run before any
// filesystem mutation, so a failed run never leaves a half-initialized
// working directory behind.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::coder::Coder;
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::inventory::ShardInventory;
use crate::meta::{self, FileMeta};
use crate::reassemble::FileReassembler;
use crate::reconstruct::BlockReconstructor;
use crate::encode::ShardEncoder;
use crate::split::{block_id, digit_width, BlockSplitter};
use crate::transport::Transport;

/// What the send side did, for operator reporting.
#[derive(Debug, Clone)]
pub struct SendReport {
    pub file_name: String,
    pub size_bytes: u64,
    pub num_blocks: usize,
    pub padding_bytes: u64,
}

/// What the receive side produced.
#[derive(Debug, Clone)]
pub struct ReceiveReport {
    pub file_name: String,
    pub output_path: PathBuf,
    pub num_blocks: usize,
    pub size_bytes: u64,
}

/// Sender: split, encode every block, record the meta, drop the transient
/// splits. The encoded tree is the unit the transport ships.
pub fn encode_file(config: &PipelineConfig, coder: &dyn Coder, source: &Path) -> Result<FileMeta> {
    let file_name = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::InvalidInput(format!("no usable file name in {}", source.display())))?
        .to_string();

    // Eager collision checks, before anything is written.
    let encoded_dir = config.encoded_dir.join(&file_name);
    if encoded_dir.exists() {
        return Err(Error::InvalidInput(format!(
            "encoded output for {file_name} already exists; remove {} and retry",
            encoded_dir.display()
        )));
    }

    let report = BlockSplitter::new(config).split(source)?;
    ShardEncoder::new(config, coder).encode_file(&file_name, &report)?;

    // Raw splits are transient; only the shard tree leaves this host.
    fs::remove_dir_all(config.splits_dir.join(&file_name))?;

    Ok(FileMeta {
        num_blocks: report.num_blocks,
        padding_bytes: report.padding_bytes,
        original_name: file_name,
    })
}

/// Sender: encode and hand the shard tree to the transport.
pub fn send_file(
    config: &PipelineConfig,
    coder: &dyn Coder,
    transport: &dyn Transport,
    source: &Path,
) -> Result<SendReport> {
    let size_bytes = fs::metadata(source)
        .map_err(|e| Error::InvalidInput(format!("cannot stat {}: {e}", source.display())))?
        .len();
    let meta = encode_file(config, coder, source)?;
    transport.send(&meta)?;
    Ok(SendReport {
        file_name: meta.original_name,
        size_bytes,
        num_blocks: meta.num_blocks,
        padding_bytes: meta.padding_bytes,
    })
}

/// Receiver: reconstruct a delivered file by name. Blocks are classified and
/// reconstructed independently on the rayon pool; ordering is restored at
/// the reassembly barrier.
pub fn reconstruct_file(
    config: &PipelineConfig,
    coder: &dyn Coder,
    file_name: &str,
) -> Result<ReceiveReport> {
    let file_dir = config.decoded_dir.join(file_name);
    let num_blocks = meta::read_num_blocks(&file_dir)?;
    let padding_bytes = meta::read_padding(&file_dir)?;
    let file_meta = FileMeta {
        num_blocks,
        padding_bytes,
        original_name: file_name.to_string(),
    };

    let inventory = ShardInventory::scan(
        &file_dir,
        coder.data_shards(),
        coder.coding_shards(),
        config.data_len as u64,
    )?;

    let width = digit_width(num_blocks);
    let reconstructor = BlockReconstructor::new(coder);
    let blocks: BTreeMap<usize, Vec<u8>> = (0..num_blocks)
        .into_par_iter()
        .map(|index| {
            let id = block_id(index, width);
            let state = inventory.classify(&id);
            reconstructor.reconstruct(&id, &state).map(|bytes| (index, bytes))
        })
        .collect::<Result<_>>()?;

    let output_path = FileReassembler::new(config).reassemble(&file_meta, &blocks)?;
    let size_bytes = fs::metadata(&output_path)?.len();
    Ok(ReceiveReport {
        file_name: file_name.to_string(),
        output_path,
        num_blocks,
        size_bytes,
    })
}

/// Receiver: consume the transport's name marker, then reconstruct.
pub fn receive_file(
    config: &PipelineConfig,
    coder: &dyn Coder,
    transport: &dyn Transport,
) -> Result<ReceiveReport> {
    let file_name = transport.receive()?;
    reconstruct_file(config, coder, &file_name)
}

/// Emulates lossy delivery: deletes each received shard of `file_name` with
/// probability `dropout_rate`. Returns (shards seen, shards dropped).
pub fn damage_file(
    config: &PipelineConfig,
    file_name: &str,
    dropout_rate: f64,
) -> Result<(usize, usize)> {
    use rand::Rng;

    let file_dir = config.decoded_dir.join(file_name);
    if !file_dir.is_dir() {
        return Err(Error::InvalidInput(format!(
            "no received shards for {file_name} under {}",
            config.decoded_dir.display()
        )));
    }

    let mut rng = rand::thread_rng();
    let mut total = 0;
    let mut dropped = 0;
    for entry in fs::read_dir(&file_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        for shard in fs::read_dir(entry.path())? {
            let shard = shard?;
            total += 1;
            if rng.gen_bool(dropout_rate) {
                fs::remove_file(shard.path())?;
                dropped += 1;
            }
        }
    }
    Ok((total, dropped))
}

/// Aborts an in-flight file on either side, releasing its working storage
/// without touching any other file.
pub fn abort_file(config: &PipelineConfig, file_name: &str) -> Result<()> {
    for dir in [
        config.splits_dir.join(file_name),
        config.encoded_dir.join(file_name),
        config.decoded_dir.join(file_name),
    ] {
        if dir.is_dir() {
            fs::remove_dir_all(&dir)?;
        }
    }
    Ok(())
}
