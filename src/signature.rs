//! Fixed-block signatures of an original byte stream.

use crate::block::BlockCursor;
use crate::digest::{Digest, DigestProvider};
use crate::error::{Error, MIN_SIGNATURE_BLOCKS, Result};
use std::io;
use std::num::NonZeroUsize;

/// Ordered per-block digests of an original stream.
///
/// Block `i` covers bytes `i * chunk_size .. (i + 1) * chunk_size`; only the
/// last block may be shorter. A signature always has at least
/// [`MIN_SIGNATURE_BLOCKS`] blocks.
///
/// The signature does not record which [`DigestProvider`] produced it. Callers
/// persisting signatures must track that themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "SignatureParts"))]
pub struct Signature {
    chunk_size: NonZeroUsize,
    chunk_digests: Vec<Digest>,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct SignatureParts {
    chunk_size: NonZeroUsize,
    chunk_digests: Vec<Digest>,
}

#[cfg(feature = "serde")]
impl TryFrom<SignatureParts> for Signature {
    type Error = Error;

    fn try_from(parts: SignatureParts) -> Result<Self> {
        Self::from_parts(parts.chunk_size, parts.chunk_digests)
    }
}

impl Signature {
    /// Rebuilds a signature from previously stored parts.
    ///
    /// # Errors
    /// Returns [`Error::InsufficientData`] if fewer than two digests are given.
    pub fn from_parts(chunk_size: NonZeroUsize, chunk_digests: Vec<Digest>) -> Result<Self> {
        if chunk_digests.len() < MIN_SIGNATURE_BLOCKS {
            return Err(Error::InsufficientData {
                blocks: chunk_digests.len(),
            });
        }
        Ok(Self {
            chunk_size,
            chunk_digests,
        })
    }

    #[must_use]
    pub fn chunk_size(&self) -> NonZeroUsize {
        self.chunk_size
    }

    #[must_use]
    pub fn chunk_digests(&self) -> &[Digest] {
        &self.chunk_digests
    }

    #[must_use]
    pub fn block_count(&self) -> usize {
        self.chunk_digests.len()
    }

    #[must_use]
    pub fn into_parts(self) -> (NonZeroUsize, Vec<Digest>) {
        (self.chunk_size, self.chunk_digests)
    }

    /// Index of the first block at or after `start` whose digest equals `digest`.
    pub(crate) fn find_from(&self, start: usize, digest: &Digest) -> Option<usize> {
        self.chunk_digests
            .get(start..)?
            .iter()
            .position(|candidate| candidate == digest)
            .map(|offset| start + offset)
    }
}

/// Streams an original byte sequence into a [`Signature`].
///
/// Bytes may arrive in writes of any size; block boundaries always fall on
/// multiples of the chunk size regardless of how the input is split.
pub struct SignatureBuilder<D> {
    provider: D,
    cursor: BlockCursor,
    chunk_size: NonZeroUsize,
    chunk_digests: Vec<Digest>,
}

impl<D: DigestProvider> SignatureBuilder<D> {
    #[must_use]
    pub fn new(chunk_size: NonZeroUsize, provider: D) -> Self {
        Self {
            provider,
            cursor: BlockCursor::new(chunk_size),
            chunk_size,
            chunk_digests: Vec::new(),
        }
    }

    /// Feeds `data` into the current block, sealing every block it completes.
    ///
    /// # Errors
    /// Returns [`Error::Provider`] if the digest provider rejects input. The
    /// builder must not be used after an error.
    pub fn write(&mut self, mut data: &[u8]) -> Result<()> {
        while !data.is_empty() {
            let (piece, rest) = self.cursor.take(data);
            self.provider
                .feed(piece)
                .map_err(|source| Error::provider("signature", source))?;

            if self.cursor.is_full() {
                self.seal_block();
            }
            data = rest;
        }
        Ok(())
    }

    /// Flushes a trailing short block and returns the finished signature.
    ///
    /// # Errors
    /// Returns [`Error::InsufficientData`] if the stream produced fewer than
    /// two blocks.
    pub fn finalize(mut self) -> Result<Signature> {
        if self.cursor.is_partial() {
            self.seal_block();
        }

        let signature = Signature::from_parts(self.chunk_size, self.chunk_digests)?;
        tracing::debug!(
            chunk_size = signature.chunk_size.get(),
            blocks = signature.block_count(),
            "signature finalized"
        );
        Ok(signature)
    }

    fn seal_block(&mut self) {
        self.chunk_digests.push(self.provider.digest());
        self.provider.reset();
        self.cursor.clear();
    }
}

impl<D: DigestProvider> io::Write for SignatureBuilder<D> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        SignatureBuilder::write(self, buf).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
