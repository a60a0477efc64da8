use std::num::NonZeroUsize;

/// Tracks how far the current fixed-size block has been filled, so that
/// writes of any size can be split on block boundaries.
#[derive(Debug, Clone)]
pub(crate) struct BlockCursor {
    chunk_size: NonZeroUsize,
    filled: usize,
}

impl BlockCursor {
    pub(crate) fn new(chunk_size: NonZeroUsize) -> Self {
        Self {
            chunk_size,
            filled: 0,
        }
    }

    /// Splits `input` into the piece that fits in the current block and the
    /// remainder, counting the piece as filled.
    pub(crate) fn take<'a>(&mut self, input: &'a [u8]) -> (&'a [u8], &'a [u8]) {
        let room = self.chunk_size.get() - self.filled;
        let (piece, rest) = input.split_at(room.min(input.len()));
        self.filled += piece.len();
        (piece, rest)
    }

    pub(crate) fn is_full(&self) -> bool {
        self.filled == self.chunk_size.get()
    }

    pub(crate) fn is_partial(&self) -> bool {
        self.filled > 0
    }

    pub(crate) fn clear(&mut self) {
        self.filled = 0;
    }
}
