use std::io;
use thiserror::Error;

/// Smallest number of blocks a [`Signature`](crate::Signature) may hold.
///
/// Carried over as a precondition; its origin is undocumented and it may be
/// arbitrary.
pub const MIN_SIGNATURE_BLOCKS: usize = 2;

#[derive(Error, Debug)]
pub enum Error {
    #[error(
        "Insufficient data for a signature: got {blocks} block(s), need at least {min}",
        min = MIN_SIGNATURE_BLOCKS
    )]
    InsufficientData { blocks: usize },

    #[error("Digest provider failed while hashing {context} block: {source}")]
    Provider {
        context: &'static str,
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn provider(context: &'static str, source: io::Error) -> Self {
        Self::Provider { context, source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
