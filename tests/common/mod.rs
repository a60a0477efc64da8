#![allow(dead_code)]

use blockdelta::{Blake3Digest, Delta, DeltaOp, Signature};
use std::num::NonZeroUsize;

pub fn chunk_size(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

pub fn sign(original: &[u8], chunk_size: NonZeroUsize) -> Signature {
    blockdelta::signature(original, chunk_size, Blake3Digest::new()).unwrap()
}

pub fn diff(signature: &Signature, modified: &[u8]) -> Delta {
    blockdelta::delta(modified, signature, Blake3Digest::new()).unwrap()
}

/// Reference applier: replays `delta` against the blocks of `original`.
pub fn reconstruct(original: &[u8], chunk_size: NonZeroUsize, delta: &Delta) -> Vec<u8> {
    let blocks: Vec<&[u8]> = original.chunks(chunk_size.get()).collect();
    let mut out = Vec::with_capacity(original.len() + delta.literal_len());
    let mut cursor = 0;

    for op in delta {
        match op {
            DeltaOp::Addition { chunk_index, data } => {
                while cursor < *chunk_index {
                    out.extend_from_slice(blocks[cursor]);
                    cursor += 1;
                }
                out.extend_from_slice(data);
            }
            DeltaOp::Deletion { chunk_index } => {
                while cursor < *chunk_index {
                    out.extend_from_slice(blocks[cursor]);
                    cursor += 1;
                }
                cursor = chunk_index + 1;
            }
        }
    }
    for block in &blocks[cursor.min(blocks.len())..] {
        out.extend_from_slice(block);
    }
    out
}

pub fn deletion_indices(delta: &Delta) -> Vec<usize> {
    delta
        .iter()
        .filter_map(|op| match op {
            DeltaOp::Deletion { chunk_index } => Some(*chunk_index),
            DeltaOp::Addition { .. } => None,
        })
        .collect()
}

pub fn pseudo_random(len: usize, mut seed: u64) -> Vec<u8> {
    (0..len)
        .map(|_| {
            seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            (seed >> 56) as u8
        })
        .collect()
}
