//! Block digests and the pluggable provider that computes them.

use std::fmt;
use std::io;

/// Opaque digest of exactly one block. Equality is byte equality.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Digest(Vec<u8>);

impl Digest {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Digest {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Digest {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for Digest {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes.to_vec())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Digest(")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        f.write_str(")")
    }
}

/// Incremental digest accumulator used by both builders.
///
/// The builders call [`feed`](Self::feed) for every byte of the current block,
/// possibly across several calls, then [`digest`](Self::digest) exactly once
/// per completed block, then [`reset`](Self::reset) before the next block.
pub trait DigestProvider {
    /// Appends `bytes` to the running accumulator.
    ///
    /// # Errors
    /// Returns an error if the accumulator cannot take more input. Builders
    /// that observe an error must be discarded.
    fn feed(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Digest of everything fed since the last reset. Does not clear state.
    fn digest(&self) -> Digest;

    /// Clears the accumulator to start a new block.
    fn reset(&mut self);
}

impl<D: DigestProvider + ?Sized> DigestProvider for Box<D> {
    fn feed(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).feed(bytes)
    }

    fn digest(&self) -> Digest {
        (**self).digest()
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}

/// BLAKE3 provider producing 32-byte digests.
#[derive(Clone, Default)]
pub struct Blake3Digest {
    hasher: blake3::Hasher,
}

impl Blake3Digest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl DigestProvider for Blake3Digest {
    fn feed(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.hasher.update(bytes);
        Ok(())
    }

    fn digest(&self) -> Digest {
        Digest::from(*self.hasher.finalize().as_bytes())
    }

    fn reset(&mut self) {
        self.hasher.reset();
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{Digest, DigestProvider};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::io;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Feed(Vec<u8>),
        Digest,
        Reset,
    }

    /// Provider that records every call and hands out scripted digests in order.
    #[derive(Clone, Default)]
    pub struct RecordingDigest {
        calls: Rc<RefCell<Vec<Call>>>,
        script: Rc<RefCell<VecDeque<Digest>>>,
    }

    impl RecordingDigest {
        pub fn scripted<I, T>(digests: I) -> Self
        where
            I: IntoIterator<Item = T>,
            T: Into<Digest>,
        {
            let recorder = Self::default();
            recorder
                .script
                .borrow_mut()
                .extend(digests.into_iter().map(Into::into));
            recorder
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }

        pub fn script_exhausted(&self) -> bool {
            self.script.borrow().is_empty()
        }
    }

    impl DigestProvider for RecordingDigest {
        fn feed(&mut self, bytes: &[u8]) -> io::Result<()> {
            self.calls.borrow_mut().push(Call::Feed(bytes.to_vec()));
            Ok(())
        }

        fn digest(&self) -> Digest {
            self.calls.borrow_mut().push(Call::Digest);
            self.script
                .borrow_mut()
                .pop_front()
                .expect("digest requested with no scripted value left")
        }

        fn reset(&mut self) {
            self.calls.borrow_mut().push(Call::Reset);
        }
    }

    /// Provider whose `feed` always fails.
    pub struct FailingDigest;

    impl DigestProvider for FailingDigest {
        fn feed(&mut self, _bytes: &[u8]) -> io::Result<()> {
            Err(io::Error::other("accumulator full"))
        }

        fn digest(&self) -> Digest {
            Digest::from(Vec::new())
        }

        fn reset(&mut self) {}
    }

    pub fn feed(bytes: &[u8]) -> Call {
        Call::Feed(bytes.to_vec())
    }
}
