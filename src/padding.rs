// src/padding.rs
// Zero-padding arithmetic that aligns a file to a whole number of blocks.
// Padding is always the literal number of trailing bytes to strip; 0 means
// none. There is no "full block" sentinel.

/// Zero bytes needed to round `size_bytes` up to a multiple of `block_len`.
/// An exact multiple needs no padding.
pub fn compute_padding(size_bytes: u64, block_len: u64) -> u64 {
    (block_len - size_bytes % block_len) % block_len
}

/// Appends `padding` zero bytes. Leaves the buffer untouched at 0.
pub fn apply_padding(bytes: &mut Vec<u8>, padding: usize) {
    if padding > 0 {
        bytes.resize(bytes.len() + padding, 0);
    }
}

/// Removes exactly the last `padding` bytes. Leaves the buffer untouched at 0.
pub fn strip_padding(bytes: &mut Vec<u8>, padding: usize) {
    if padding > 0 {
        bytes.truncate(bytes.len().saturating_sub(padding));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: u64 = 3840;

    #[test]
    fn round_trip_restores_original_bytes() {
        for n in [1usize, 7, 383, 384, 3839, 3840, 3841, 4000] {
            let original: Vec<u8> = (0..n).map(|i| (i % 251) as u8).collect();
            let padding = compute_padding(n as u64, BLOCK) as usize;

            let mut padded = original.clone();
            apply_padding(&mut padded, padding);
            assert_eq!(padded.len() as u64 % BLOCK, 0, "n = {n}");

            strip_padding(&mut padded, padding);
            assert_eq!(padded, original, "n = {n}");
        }
    }

    #[test]
    fn exact_multiple_needs_zero_padding() {
        for k in 1..=5u64 {
            assert_eq!(compute_padding(k * BLOCK, BLOCK), 0);
        }
    }

    #[test]
    fn partial_block_padding_fills_to_boundary() {
        assert_eq!(compute_padding(4000, BLOCK), 2 * BLOCK - 4000);
        assert_eq!(compute_padding(1, BLOCK), BLOCK - 1);
    }

    #[test]
    fn zero_padding_is_a_no_op() {
        let mut bytes = vec![1u8, 2, 3];
        apply_padding(&mut bytes, 0);
        assert_eq!(bytes, [1, 2, 3]);
        strip_padding(&mut bytes, 0);
        assert_eq!(bytes, [1, 2, 3]);
    }
}
