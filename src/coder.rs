// src/coder.rs
// Boundary to the erasure-coding mathematics. The pipeline never touches the
// Galois-field arithmetic itself; it only hands blocks and shard sets across
// this trait.

use reed_solomon_erasure::galois_8::ReedSolomon;

use crate::error::CoderError;

pub type CoderResult<T> = std::result::Result<T, CoderError>;

/// Erasure coder collaborator.
///
/// `encode` turns one block into K data shards followed by M coding shards.
/// `decode` rebuilds the block from whatever survived, indexed data-first:
/// slot `i < K` is data shard `i`, slot `K + j` is coding shard `j`.
pub trait Coder: Send + Sync {
    fn encode(&self, block: &[u8]) -> CoderResult<Vec<Vec<u8>>>;
    fn decode(&self, shards: Vec<Option<Vec<u8>>>) -> CoderResult<Vec<u8>>;
    fn data_shards(&self) -> usize;
    fn coding_shards(&self) -> usize;
}

/// Reed-Solomon coder over GF(2^8).
pub struct ReedSolomonCoder {
    data_shards: usize,
    coding_shards: usize,
    engine: ReedSolomon,
}

impl ReedSolomonCoder {
    pub fn new(data_shards: usize, coding_shards: usize) -> CoderResult<Self> {
        let engine = ReedSolomon::new(data_shards, coding_shards)
            .map_err(|e| CoderError::Backend(e.to_string()))?;
        Ok(Self {
            data_shards,
            coding_shards,
            engine,
        })
    }
}

impl Coder for ReedSolomonCoder {
    fn encode(&self, block: &[u8]) -> CoderResult<Vec<Vec<u8>>> {
        // Equal-sized shards; the block is zero-extended to fit the matrix.
        let shard_size = block.len().div_ceil(self.data_shards).max(1);
        let mut master = vec![0u8; shard_size * self.data_shards];
        master[..block.len()].copy_from_slice(block);

        let mut shards: Vec<Vec<u8>> = master
            .chunks_exact(shard_size)
            .map(|chunk| chunk.to_vec())
            .collect();
        for _ in 0..self.coding_shards {
            shards.push(vec![0u8; shard_size]);
        }

        self.engine
            .encode(&mut shards)
            .map_err(|e| CoderError::Backend(e.to_string()))?;
        Ok(shards)
    }

    fn decode(&self, mut shards: Vec<Option<Vec<u8>>>) -> CoderResult<Vec<u8>> {
        let available = shards.iter().filter(|s| s.is_some()).count();
        if available < self.data_shards {
            return Err(CoderError::InsufficientShards {
                available,
                needed: self.data_shards,
            });
        }

        self.engine
            .reconstruct(&mut shards)
            .map_err(|e| CoderError::Backend(e.to_string()))?;

        let shard_len = shards
            .iter()
            .find_map(|s| s.as_ref().map(|v| v.len()))
            .unwrap_or(0);
        let mut block = Vec::with_capacity(shard_len * self.data_shards);
        for (i, shard) in shards.into_iter().take(self.data_shards).enumerate() {
            match shard {
                Some(s) => block.extend_from_slice(&s),
                None => {
                    return Err(CoderError::Backend(format!(
                        "engine reported success but data shard {i} is still missing"
                    )))
                }
            }
        }
        Ok(block)
    }

    fn data_shards(&self) -> usize {
        self.data_shards
    }

    fn coding_shards(&self) -> usize {
        self.coding_shards
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_produces_full_shard_set() {
        let coder = ReedSolomonCoder::new(10, 10).expect("coder");
        let block = vec![0xABu8; 3840];
        let shards = coder.encode(&block).expect("encode");
        assert_eq!(shards.len(), 20);
        assert!(shards.iter().all(|s| s.len() == 384));
        let flat: Vec<u8> = shards[..10].concat();
        assert_eq!(flat, block);
    }

    #[test]
    fn decode_survives_data_shard_loss() {
        let coder = ReedSolomonCoder::new(10, 10).expect("coder");
        let block: Vec<u8> = (0..3840u32).map(|i| (i * 31 % 256) as u8).collect();
        let shards = coder.encode(&block).expect("encode");

        let mut holes: Vec<Option<Vec<u8>>> = shards.into_iter().map(Some).collect();
        for i in [0, 4, 9, 12] {
            holes[i] = None;
        }
        let recovered = coder.decode(holes).expect("decode");
        assert_eq!(recovered, block);
    }

    #[test]
    fn decode_refuses_too_few_shards() {
        let coder = ReedSolomonCoder::new(10, 10).expect("coder");
        let block = vec![5u8; 3840];
        let shards = coder.encode(&block).expect("encode");

        let holes: Vec<Option<Vec<u8>>> = shards
            .into_iter()
            .enumerate()
            .map(|(i, s)| if i < 9 { Some(s) } else { None })
            .collect();
        let err = coder.decode(holes).unwrap_err();
        assert!(
            matches!(err, CoderError::InsufficientShards { available: 9, needed: 10 }),
            "got {err:?}"
        );
    }
}
