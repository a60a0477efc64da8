//! Streaming fixed-block signatures and block deltas.
//!
//! A [`SignatureBuilder`] reduces an original stream to one digest per
//! fixed-size block. A [`DeltaBuilder`] matches a new stream's blocks against
//! that [`Signature`] and produces a [`Delta`]: the deletions and additions
//! that turn the original blocks into the new data.
//!
//! Both builders accept writes of any size and give the same result however
//! the input is split. The digest algorithm is injected through
//! [`DigestProvider`]; [`Blake3Digest`] is the recommended choice.
//!
//! ```
//! use blockdelta::{Blake3Digest, DeltaBuilder, SignatureBuilder};
//! use std::num::NonZeroUsize;
//!
//! let chunk_size = NonZeroUsize::new(4).unwrap();
//! let mut sig = SignatureBuilder::new(chunk_size, Blake3Digest::new());
//! sig.write(b"aaaabbbbcccc")?;
//! let sig = sig.finalize()?;
//!
//! let mut delta = DeltaBuilder::new(&sig, Blake3Digest::new());
//! delta.write(b"aaaacccc")?;
//! let delta = delta.finalize();
//! assert_eq!(delta.len(), 1);
//! # Ok::<(), blockdelta::Error>(())
//! ```

mod block;
#[cfg(feature = "buzhash")]
pub mod buzhash;
pub mod delta;
pub mod digest;
pub mod error;
pub mod signature;

#[cfg(feature = "buzhash")]
pub use buzhash::BuzHashDigest;
pub use delta::{Delta, DeltaBuilder, DeltaOp};
pub use digest::{Blake3Digest, Digest, DigestProvider};
pub use error::{Error, MIN_SIGNATURE_BLOCKS, Result};
pub use signature::{Signature, SignatureBuilder};

use std::io::Read;
use std::num::NonZeroUsize;

pub const DEFAULT_CHUNK_SIZE: NonZeroUsize = NonZeroUsize::new(4096).unwrap();

const TARGET_BATCH_SIZE: usize = 64 * 1024;

/// Reads exactly `buf.len()` bytes or until EOF, returning the number of bytes read.
fn read_exact_or_eof<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

/// Read buffer length: the largest multiple of `chunk_size` within the target
/// batch. Chunks larger than the batch span several reads.
fn batch_size(chunk_size: NonZeroUsize) -> usize {
    let chunk_size = chunk_size.get();
    if chunk_size >= TARGET_BATCH_SIZE {
        TARGET_BATCH_SIZE
    } else {
        TARGET_BATCH_SIZE / chunk_size * chunk_size
    }
}

/// Pumps `reader` until EOF, handing each batch to `sink`.
fn drain<R: Read>(
    mut reader: R,
    chunk_size: NonZeroUsize,
    mut sink: impl FnMut(&[u8]) -> Result<()>,
) -> Result<()> {
    let mut buffer = vec![0u8; batch_size(chunk_size)];
    loop {
        let bytes_read = read_exact_or_eof(&mut reader, &mut buffer)?;
        if bytes_read == 0 {
            return Ok(());
        }
        sink(&buffer[..bytes_read])?;
    }
}

/// Builds the signature of everything `reader` yields.
///
/// # Errors
/// Returns [`Error::Io`] if reading fails, [`Error::Provider`] if the digest
/// provider fails, or [`Error::InsufficientData`] if the input spans fewer
/// than two blocks.
pub fn signature<R: Read, D: DigestProvider>(
    reader: R,
    chunk_size: NonZeroUsize,
    provider: D,
) -> Result<Signature> {
    let mut builder = SignatureBuilder::new(chunk_size, provider);
    drain(reader, chunk_size, |batch| builder.write(batch))?;
    builder.finalize()
}

/// Builds the delta of everything `reader` yields against `signature`.
///
/// # Errors
/// Returns [`Error::Io`] if reading fails or [`Error::Provider`] if the digest
/// provider fails.
pub fn delta<R: Read, D: DigestProvider>(
    reader: R,
    signature: &Signature,
    provider: D,
) -> Result<Delta> {
    let mut builder = DeltaBuilder::new(signature, provider);
    drain(reader, signature.chunk_size(), |batch| builder.write(batch))?;
    Ok(builder.finalize())
}
