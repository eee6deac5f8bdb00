// src/meta.rs
// File-level bookkeeping records. Written once by the sender after all
// blocks encode, read once by the receiver before reconstruction begins.
// All three are single-line text files, per the wire contract.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

pub const META_FILE: &str = "meta.txt";
pub const PADDING_FILE: &str = "padding.txt";
pub const NAME_FILE: &str = "name.txt";

/// Everything a receiver needs to plan reconstruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub num_blocks: usize,
    pub padding_bytes: u64,
    pub original_name: String,
}

/// `<dir>/meta.txt`: the block count for one encoded file.
pub fn write_num_blocks(dir: &Path, num_blocks: usize) -> Result<()> {
    fs::write(dir.join(META_FILE), format!("{num_blocks}\n"))?;
    Ok(())
}

pub fn read_num_blocks(dir: &Path) -> Result<usize> {
    read_line_as(dir.join(META_FILE).as_path())
}

/// `<dir>/padding.txt`: trailing zero bytes to strip after reassembly.
pub fn write_padding(dir: &Path, padding_bytes: u64) -> Result<()> {
    fs::write(dir.join(PADDING_FILE), format!("{padding_bytes}\n"))?;
    Ok(())
}

pub fn read_padding(dir: &Path) -> Result<u64> {
    read_line_as(dir.join(PADDING_FILE).as_path())
}

/// `<root>/name.txt`: the original filename marker left by the transport.
pub fn write_name(root: &Path, name: &str) -> Result<()> {
    fs::write(root.join(NAME_FILE), format!("{name}\n"))?;
    Ok(())
}

/// Consumes the name marker: reads it, then deletes it.
pub fn take_name(root: &Path) -> Result<String> {
    let path = root.join(NAME_FILE);
    let name = fs::read_to_string(&path)
        .map_err(|_| Error::MissingMeta { path: path.clone() })?
        .trim()
        .to_string();
    if name.is_empty() {
        return Err(Error::MissingMeta { path });
    }
    fs::remove_file(&path)?;
    Ok(name)
}

fn read_line_as<T: std::str::FromStr>(path: &Path) -> Result<T> {
    fs::read_to_string(path)
        .map_err(|_| Error::MissingMeta { path: path.to_path_buf() })?
        .trim()
        .parse()
        .map_err(|_| Error::MissingMeta { path: path.to_path_buf() })
}
