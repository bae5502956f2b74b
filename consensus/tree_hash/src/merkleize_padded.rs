use crate::BYTES_PER_CHUNK;
use eth2_hashing::{hash32_concat, ZERO_HASHES};

/// Merkleizes bytes and returns the root, using a minimum number of leaves to virtually pad the
/// tree as required by SSZ (e.g. for lists, where `min_leaves` comes from the list's maximum
/// length rather than its current length).
///
/// The input `bytes` must be a multiple of `BYTES_PER_CHUNK`, or this function will panic.
pub fn merkleize_padded(bytes: &[u8], min_leaves: usize) -> Vec<u8> {
    assert_eq!(
        bytes.len() % BYTES_PER_CHUNK,
        0,
        "bytes should be a multiple of BYTES_PER_CHUNK"
    );

    let leaves = std::cmp::max(1, bytes.len() / BYTES_PER_CHUNK);
    let num_leaves = leaves.max(min_leaves).next_power_of_two();
    let height = num_leaves.trailing_zeros() as usize;

    if height == 0 {
        return if bytes.is_empty() {
            ZERO_HASHES[0].clone()
        } else {
            let mut chunk = bytes.to_vec();
            chunk.resize(BYTES_PER_CHUNK, 0);
            chunk
        };
    }

    // `layer` holds the hashes at the current height, left-to-right. Any chunks beyond the
    // supplied bytes, up to `num_leaves`, are implicitly zero and are only materialised lazily
    // via `ZERO_HASHES`.
    let non_zero_leaves = (bytes.len() + BYTES_PER_CHUNK - 1) / BYTES_PER_CHUNK;
    let mut layer: Vec<Vec<u8>> = (0..non_zero_leaves)
        .map(|i| {
            let start = i * BYTES_PER_CHUNK;
            let end = std::cmp::min(start + BYTES_PER_CHUNK, bytes.len());
            let mut chunk = bytes[start..end].to_vec();
            chunk.resize(BYTES_PER_CHUNK, 0);
            chunk
        })
        .collect();

    for depth in 0..height {
        let width_at_depth = num_leaves >> depth;
        let mut next = Vec::with_capacity((width_at_depth + 1) / 2);

        for i in (0..width_at_depth).step_by(2) {
            let left = layer
                .get(i)
                .cloned()
                .unwrap_or_else(|| ZERO_HASHES[depth].clone());
            let right = layer
                .get(i + 1)
                .cloned()
                .unwrap_or_else(|| ZERO_HASHES[depth].clone());
            next.push(hash32_concat(&left, &right));
        }

        layer = next;
    }

    layer
        .into_iter()
        .next()
        .unwrap_or_else(|| ZERO_HASHES[height].clone())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_is_zero_hash() {
        assert_eq!(merkleize_padded(&[], 0), ZERO_HASHES[0]);
    }

    #[test]
    fn single_chunk_passthrough() {
        let chunk = vec![42; BYTES_PER_CHUNK];
        assert_eq!(merkleize_padded(&chunk, 1), chunk);
    }

    #[test]
    fn two_chunks_hash_together() {
        let a = vec![1; BYTES_PER_CHUNK];
        let b = vec![2; BYTES_PER_CHUNK];
        let mut bytes = a.clone();
        bytes.extend_from_slice(&b);

        let expected = hash32_concat(&a, &b);
        assert_eq!(merkleize_padded(&bytes, 0), expected);
    }

    #[test]
    fn min_leaves_forces_padding() {
        let chunk = vec![9; BYTES_PER_CHUNK];
        let expected = hash32_concat(&chunk, &ZERO_HASHES[0]);
        assert_eq!(merkleize_padded(&chunk, 2), expected);
    }
}
