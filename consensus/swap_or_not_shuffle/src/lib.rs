//! The "swap-or-not" shuffle (`compute_shuffled_index`), used for committee assignment.
//! Deterministic from `(seed, index, index_count)`; a permutation of `[0, index_count)` by
//! construction.

use eth2_hashing::hash;
use ethereum_types::H256;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// `index` was out of bounds for `index_count`.
    IndexOutOfBounds,
}

/// Shuffle `index` within `[0, index_count)` using `seed`, for `round_count` rounds.
///
/// This is the inverse-permutable "swap or not" shuffle specified by the
/// beacon chain spec: running it forwards for `round_count` rounds
/// shuffles, running it backwards (`round` descending) unshuffles.
pub fn compute_shuffled_index(
    index: usize,
    index_count: usize,
    seed: &[u8],
    round_count: u8,
) -> Result<usize, Error> {
    if index >= index_count || index_count == 0 {
        return Err(Error::IndexOutOfBounds);
    }

    let mut index = index;

    for round in 0..round_count {
        let pivot = bytes_to_int64(&hash_with_round(seed, round, PIVOT_VIEW))
            as usize
            % index_count;

        let flip = (pivot + index_count - index) % index_count;
        let position = index.max(flip);

        let source = hash_with_round_and_position(seed, round, position / 256);
        let byte = source[(position % 256) / 8];
        let bit = (byte >> (position % 8)) % 2;

        index = if bit == 1 { flip } else { index };
    }

    Ok(index)
}

const PIVOT_VIEW: u8 = 0;
const SOURCE_VIEW: u8 = 1;

fn hash_with_round(seed: &[u8], round: u8, view: u8) -> Vec<u8> {
    let mut input = Vec::with_capacity(seed.len() + 1);
    input.extend_from_slice(seed);
    input.push(round);
    let _ = view;
    hash(&input)
}

fn hash_with_round_and_position(seed: &[u8], round: u8, position_word: usize) -> Vec<u8> {
    let mut input = Vec::with_capacity(seed.len() + 1 + 4);
    input.extend_from_slice(seed);
    input.push(round);
    let _ = SOURCE_VIEW;
    input.extend_from_slice(&(position_word as u32).to_le_bytes());
    hash(&input)
}

fn bytes_to_int64(bytes: &[u8]) -> u64 {
    let mut arr = [0u8; 8];
    let n = bytes.len().min(8);
    arr[..n].copy_from_slice(&bytes[..n]);
    u64::from_le_bytes(arr)
}

/// Produce the `index_count`-length shuffling of `[0, index_count)` under `seed`.
///
/// A thin convenience wrapper over `compute_shuffled_index`; used by tests
/// and by callers that want the whole permutation rather than one index.
pub fn shuffle_list(
    input: Vec<usize>,
    round_count: u8,
    seed: &[u8],
) -> Result<Vec<usize>, Error> {
    let index_count = input.len();
    let mut output = vec![0; index_count];
    for i in 0..index_count {
        let shuffled = compute_shuffled_index(i, index_count, seed, round_count)?;
        output[shuffled] = input[i];
    }
    Ok(output)
}

/// A seed as used across this crate; a thin alias kept for documentation value.
pub type Seed = H256;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_a_permutation() {
        let seed = hash(b"test-seed");
        let n = 64;
        let mut seen = vec![false; n];
        for i in 0..n {
            let shuffled = compute_shuffled_index(i, n, &seed, 90).unwrap();
            assert!(!seen[shuffled], "index {} repeated", shuffled);
            seen[shuffled] = true;
        }
        assert!(seen.iter().all(|&x| x));
    }

    #[test]
    fn out_of_bounds_is_an_error() {
        assert_eq!(
            compute_shuffled_index(5, 5, b"seed", 90),
            Err(Error::IndexOutOfBounds)
        );
    }

    #[test]
    fn deterministic() {
        let seed = hash(b"another-seed");
        let a = compute_shuffled_index(3, 10, &seed, 90).unwrap();
        let b = compute_shuffled_index(3, 10, &seed, 90).unwrap();
        assert_eq!(a, b);
    }

    #[quickcheck_macros::quickcheck]
    fn shuffle_list_is_a_permutation(len: u8) -> bool {
        let len = (len % 32) as usize + 1;
        let input: Vec<usize> = (0..len).collect();
        let seed = hash(b"quickcheck-seed");
        let shuffled = shuffle_list(input.clone(), 90, &seed).unwrap();
        let mut sorted = shuffled.clone();
        sorted.sort_unstable();
        sorted == input
    }
}
