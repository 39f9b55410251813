use std::collections::VecDeque;

use crate::{
    Bit,
    error::{ModemError, ModemResult},
};

/// Widest word a single read can return.
pub const MAX_WIDTH: usize = u64::BITS as usize;

/// FIFO buffer of bits used to re-chunk words between bit widths.
///
/// Words go in and come out least-significant bit first: bit `i` of a
/// written word lands `i` positions after the word's insertion point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitStream {
    buf: VecDeque<Bit>,
}

impl BitStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of buffered bits.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Append the `width` low bits of `value` to the tail.
    ///
    /// Bits of `value` above `width` are discarded. Positions past the top of
    /// the `u64` are written as zeros.
    pub fn write(&mut self, value: u64, width: usize) {
        self.buf
            .extend((0..width).map(|i| i < MAX_WIDTH && (value >> i) & 1 == 1));
    }

    /// Write every value in order, each `width` bits wide.
    pub fn writeall<I: IntoIterator<Item = u64>>(&mut self, values: I, width: usize) {
        for value in values {
            self.write(value, width);
        }
    }

    /// Consume up to `width` bits from the head.
    ///
    /// Returns `None` when the buffer is empty. If fewer than `width` bits
    /// remain, all of them are read and the word is correspondingly narrower.
    /// Fails only when the word actually read would not fit a `u64`.
    pub fn read(&mut self, width: usize) -> ModemResult<Option<u64>> {
        if self.buf.is_empty() {
            return Ok(None);
        }
        let width = width.min(self.buf.len());
        if width > MAX_WIDTH {
            return Err(ModemError::InvalidWidth { width });
        }
        Ok(Some(self.take(width)))
    }

    /// Read every whole `width`-bit chunk currently buffered.
    ///
    /// The chunk count is fixed when this is called. A trailing partial chunk
    /// is not read and stays in the buffer. A zero width, or a width wider
    /// than a `u64` with at least one whole chunk buffered, is rejected.
    pub fn readall(&mut self, width: usize) -> ModemResult<ReadAll<'_>> {
        if width == 0 {
            return Err(ModemError::InvalidWidth { width });
        }
        let remaining = self.buf.len() / width;
        if remaining > 0 && width > MAX_WIDTH {
            return Err(ModemError::InvalidWidth { width });
        }
        Ok(ReadAll {
            stream: self,
            width,
            remaining,
        })
    }

    fn take(&mut self, width: usize) -> u64 {
        self.buf
            .drain(..width)
            .enumerate()
            .fold(0u64, |acc, (i, bit)| acc | (u64::from(bit) << i))
    }
}

/// Iterator over the whole chunks counted by [`BitStream::readall`].
pub struct ReadAll<'a> {
    stream: &'a mut BitStream,
    width: usize,
    remaining: usize,
}

impl Iterator for ReadAll<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.stream.take(self.width))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ReadAll<'_> {}
