// src/transport.rs
// Transport collaborator boundary. The pipeline hands a finished shard tree
// and its meta to `send` and never retries on failure; delivery policy lives
// on the other side of this trait.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::meta::{self, FileMeta};

pub trait Transport {
    /// Ships the encoded shard tree for `meta.original_name`, together with
    /// the padding value and the name marker the receiver needs.
    fn send(&self, meta: &FileMeta) -> Result<()>;

    /// Receiver side: waits for a delivery and returns the received file
    /// name, consuming the name marker.
    fn receive(&self) -> Result<String>;
}

/// Delivers shards between two directory roots on the same host. Stands in
/// for the network sprayer in local runs and tests.
pub struct LocalTransport {
    source_encoded: PathBuf,
    dest_decoded: PathBuf,
}

impl LocalTransport {
    pub fn new(source_encoded: impl Into<PathBuf>, dest_decoded: impl Into<PathBuf>) -> Self {
        Self {
            source_encoded: source_encoded.into(),
            dest_decoded: dest_decoded.into(),
        }
    }
}

impl Transport for LocalTransport {
    fn send(&self, meta: &FileMeta) -> Result<()> {
        let src = self.source_encoded.join(&meta.original_name);
        let dst = self.dest_decoded.join(&meta.original_name);
        if dst.exists() {
            return Err(Error::InvalidInput(format!(
                "destination already holds {}; remove {} and retry",
                meta.original_name,
                dst.display()
            )));
        }

        copy_tree(&src, &dst)
            .map_err(|e| Error::Transport(format!("copying {} to {}: {e}", src.display(), dst.display())))?;
        meta::write_padding(&dst, meta.padding_bytes)?;
        meta::write_name(&self.dest_decoded, &meta.original_name)?;
        Ok(())
    }

    fn receive(&self) -> Result<String> {
        meta::take_name(&self.dest_decoded)
    }
}

fn copy_tree(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_meta() -> FileMeta {
        FileMeta {
            num_blocks: 1,
            padding_bytes: 40,
            original_name: "payload.bin".to_string(),
        }
    }

    #[test]
    fn delivers_tree_with_padding_and_name_markers() {
        let dir = tempdir().expect("tempdir");
        let encoded = dir.path().join("encoded");
        let decoded = dir.path().join("decoded");
        fs::create_dir_all(encoded.join("payload.bin").join("b0")).expect("mkdir");
        fs::write(encoded.join("payload.bin").join("b0").join("k0"), b"shard").expect("write");
        fs::write(encoded.join("payload.bin").join("meta.txt"), "1\n").expect("write");
        fs::create_dir_all(&decoded).expect("mkdir");

        let transport = LocalTransport::new(&encoded, &decoded);
        transport.send(&sample_meta()).expect("send");

        let dst = decoded.join("payload.bin");
        assert_eq!(fs::read(dst.join("b0").join("k0")).expect("shard"), b"shard");
        assert_eq!(meta::read_num_blocks(&dst).expect("meta"), 1);
        assert_eq!(meta::read_padding(&dst).expect("padding"), 40);
        assert_eq!(transport.receive().expect("receive"), "payload.bin");
    }

    #[test]
    fn occupied_destination_is_a_collision() {
        let dir = tempdir().expect("tempdir");
        let encoded = dir.path().join("encoded");
        let decoded = dir.path().join("decoded");
        fs::create_dir_all(encoded.join("payload.bin")).expect("mkdir");
        fs::create_dir_all(decoded.join("payload.bin")).expect("mkdir");

        let err = LocalTransport::new(&encoded, &decoded)
            .send(&sample_meta())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)), "got {err:?}");
    }

    #[test]
    fn receive_without_delivery_reports_missing_marker() {
        let dir = tempdir().expect("tempdir");
        let transport = LocalTransport::new(dir.path().join("encoded"), dir.path().to_path_buf());
        assert!(matches!(
            transport.receive(),
            Err(Error::MissingMeta { .. })
        ));
    }
}
