//! Block deltas of a new byte stream against an existing [`Signature`].
//!
//! Matching is greedy: each completed block of the new stream is compared
//! against the not-yet-matched blocks of the signature in order and the first
//! equal digest wins. This is not an edit-distance-optimal diff. When the
//! original contains repeated blocks the scan may latch onto an earlier copy
//! than intended, which costs extra operations but never correctness.
//!
//! Block boundaries in the new stream are fixed multiples of the chunk size;
//! there is no byte-level resynchronization, so an insertion that is not a
//! multiple of the chunk size turns every following block into literal data.

use crate::block::BlockCursor;
use crate::digest::DigestProvider;
use crate::error::{Error, Result};
use crate::signature::Signature;
use std::io;
use std::mem;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeltaOp {
    /// Insert `data` immediately before original block `chunk_index`, or at
    /// the end when `chunk_index` equals the original block count.
    Addition { chunk_index: usize, data: Vec<u8> },
    /// Original block `chunk_index` is absent from the new data.
    Deletion { chunk_index: usize },
}

impl DeltaOp {
    #[must_use]
    pub fn chunk_index(&self) -> usize {
        match self {
            Self::Addition { chunk_index, .. } | Self::Deletion { chunk_index } => *chunk_index,
        }
    }
}

/// Ordered edit script turning the original blocks into the new data.
///
/// Replaying the operations in order against the original blocks, skipping
/// each deleted block and splicing each addition in before its block, yields
/// the new data exactly. An empty delta means the data is unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Delta {
    ops: Vec<DeltaOp>,
}

impl Delta {
    #[must_use]
    pub fn operations(&self) -> &[DeltaOp] {
        &self.ops
    }

    #[must_use]
    pub fn into_operations(self) -> Vec<DeltaOp> {
        self.ops
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DeltaOp> {
        self.ops.iter()
    }

    /// Total number of literal bytes carried by additions.
    #[must_use]
    pub fn literal_len(&self) -> usize {
        self.ops
            .iter()
            .map(|op| match op {
                DeltaOp::Addition { data, .. } => data.len(),
                DeltaOp::Deletion { .. } => 0,
            })
            .sum()
    }
}

impl<'a> IntoIterator for &'a Delta {
    type Item = &'a DeltaOp;
    type IntoIter = std::slice::Iter<'a, DeltaOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

/// Streams new data against a borrowed [`Signature`] and builds a [`Delta`].
///
/// While unmatched original blocks remain, every full block of input is
/// hashed and resolved. Once the last original block has been matched the
/// builder stops hashing and buffers all further input as a trailing addition.
pub struct DeltaBuilder<'s, D> {
    signature: &'s Signature,
    provider: D,
    cursor: BlockCursor,
    block: Vec<u8>,
    pending: Vec<u8>,
    // One past the last matched original block.
    next_unmatched: usize,
    ops: Vec<DeltaOp>,
}

impl<'s, D: DigestProvider> DeltaBuilder<'s, D> {
    /// `provider` must be the same algorithm that produced `signature`.
    #[must_use]
    pub fn new(signature: &'s Signature, provider: D) -> Self {
        let chunk_size = signature.chunk_size();
        Self {
            signature,
            provider,
            cursor: BlockCursor::new(chunk_size),
            block: Vec::new(),
            pending: Vec::new(),
            next_unmatched: 0,
            ops: Vec::new(),
        }
    }

    /// Feeds `data`, resolving every block it completes.
    ///
    /// # Errors
    /// Returns [`Error::Provider`] if the digest provider rejects input. The
    /// builder must not be used after an error.
    pub fn write(&mut self, mut data: &[u8]) -> Result<()> {
        while !data.is_empty() {
            if self.all_blocks_matched() {
                self.pending.extend_from_slice(data);
                return Ok(());
            }

            let (piece, rest) = self.cursor.take(data);
            self.provider
                .feed(piece)
                .map_err(|source| Error::provider("delta", source))?;
            self.block.extend_from_slice(piece);

            if self.cursor.is_full() {
                self.resolve_block();
            }
            data = rest;
        }
        Ok(())
    }

    /// Resolves a trailing short block, deletes every unmatched original
    /// block and flushes the remaining literal bytes.
    #[must_use]
    pub fn finalize(mut self) -> Delta {
        if self.cursor.is_partial() {
            self.resolve_block();
        }

        let block_count = self.signature.block_count();
        self.push_deletions(block_count);
        self.flush_pending();

        tracing::debug!(
            operations = self.ops.len(),
            matched_through = self.next_unmatched,
            original_blocks = block_count,
            "delta finalized"
        );
        Delta { ops: self.ops }
    }

    fn all_blocks_matched(&self) -> bool {
        self.next_unmatched >= self.signature.block_count()
    }

    fn resolve_block(&mut self) {
        let digest = self.provider.digest();
        self.provider.reset();
        self.cursor.clear();

        match self.signature.find_from(self.next_unmatched, &digest) {
            Some(index) => {
                tracing::trace!(index, "block matched");
                self.push_deletions(index);
                self.flush_pending();
                self.next_unmatched = index + 1;

                if self.all_blocks_matched() {
                    tracing::debug!(
                        index,
                        "all original blocks matched, buffering remaining input"
                    );
                }
            }
            None => {
                tracing::trace!(len = self.block.len(), "block unmatched");
                self.pending.extend_from_slice(&self.block);
            }
        }
        self.block.clear();
    }

    fn push_deletions(&mut self, until: usize) {
        self.ops.extend(
            (self.next_unmatched..until).map(|chunk_index| DeltaOp::Deletion { chunk_index }),
        );
    }

    fn flush_pending(&mut self) {
        if !self.pending.is_empty() {
            self.ops.push(DeltaOp::Addition {
                chunk_index: self.next_unmatched,
                data: mem::take(&mut self.pending),
            });
        }
    }
}

impl<D: DigestProvider> io::Write for DeltaBuilder<'_, D> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        DeltaBuilder::write(self, buf).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
