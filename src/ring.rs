// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Circular byte buffer behind a pipe channel.
//
// The backing store is allocated lazily and can be released and
// re-allocated over the channel's lifetime. Not synchronised: the owning
// channel keeps a Ring inside its mutex.
//
// A transfer of `n` bytes starting at offset `pos` touches at most two
// contiguous segments: the "top" half `[pos, min(pos + n, size))` and, if
// the transfer crosses the end of the buffer, the "bottom" half
// `[0, n - top)`. Offsets and the byte count only move after every
// segment has been copied, so a failed copy leaves the ring untouched.

use std::ops::Range;

use crate::copy::{CopyFrom, CopyTo};
use crate::error::{PipeError, Result};

/// Split a transfer of `n` bytes at `pos` into top and bottom segments.
#[inline]
fn segments(pos: usize, n: usize, size: usize) -> (Range<usize>, Range<usize>) {
    let top = n.min(size - pos);
    (pos..pos + top, 0..n - top)
}

pub(crate) struct Ring {
    buf: Option<Box<[u8]>>,
    size: usize,
    read_pos: usize,
    write_pos: usize,
    count: usize,
}

impl Ring {
    /// An unallocated ring of capacity `size` (must be non-zero).
    pub(crate) const fn new(size: usize) -> Self {
        Self {
            buf: None,
            size,
            read_pos: 0,
            write_pos: 0,
            count: 0,
        }
    }

    /// Allocate the zero-filled backing store if it does not exist yet.
    /// Returns `true` if an allocation happened.
    pub(crate) fn allocate(&mut self) -> Result<bool> {
        if self.buf.is_some() {
            return Ok(false);
        }
        let mut v: Vec<u8> = Vec::new();
        v.try_reserve_exact(self.size)
            .map_err(|_| PipeError::OutOfMemory(self.size))?;
        v.resize(self.size, 0);
        self.buf = Some(v.into_boxed_slice());
        self.reset();
        Ok(true)
    }

    /// Drop the backing store. The next `allocate` starts from scratch.
    pub(crate) fn release(&mut self) {
        self.buf = None;
        self.reset();
    }

    /// Discard buffered data and rewind both offsets.
    pub(crate) fn reset(&mut self) {
        self.read_pos = 0;
        self.write_pos = 0;
        self.count = 0;
    }

    pub(crate) fn is_allocated(&self) -> bool {
        self.buf.is_some()
    }

    pub(crate) fn size(&self) -> usize {
        self.size
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }

    pub(crate) fn free(&self) -> usize {
        self.size - self.count
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub(crate) fn is_full(&self) -> bool {
        self.count == self.size
    }

    pub(crate) fn read_pos(&self) -> usize {
        self.read_pos
    }

    pub(crate) fn write_pos(&self) -> usize {
        self.write_pos
    }

    /// Move up to `want` buffered bytes into `dst`, oldest first.
    /// Never returns more than is currently buffered. A `dst` too small for
    /// the clamped transfer faults before anything is copied.
    pub(crate) fn read_into<D>(&mut self, dst: &mut D, want: usize) -> Result<usize>
    where
        D: CopyTo + ?Sized,
    {
        let n = want.min(self.count);
        if n == 0 {
            return Ok(0);
        }
        if dst.capacity() < n {
            return Err(PipeError::CopyFault);
        }
        let buf = match self.buf.as_deref() {
            Some(b) => b,
            None => return Ok(0),
        };

        let (top, bottom) = segments(self.read_pos, n, self.size);
        let top_len = top.len();
        dst.copy_to(0, &buf[top])?;
        if !bottom.is_empty() {
            dst.copy_to(top_len, &buf[bottom])?;
        }

        self.read_pos = (self.read_pos + n) % self.size;
        self.count -= n;
        Ok(n)
    }

    /// Move up to `want` bytes from `src` into free space.
    /// Never accepts more than the free space. A `src` shorter than the
    /// clamped transfer faults before anything is copied.
    pub(crate) fn write_from<S>(&mut self, src: &S, want: usize) -> Result<usize>
    where
        S: CopyFrom + ?Sized,
    {
        let n = want.min(self.free());
        if n == 0 {
            return Ok(0);
        }
        if src.available() < n {
            return Err(PipeError::CopyFault);
        }
        let buf = match self.buf.as_deref_mut() {
            Some(b) => b,
            None => return Ok(0),
        };

        let (top, bottom) = segments(self.write_pos, n, self.size);
        let top_len = top.len();
        src.copy_from(0, &mut buf[top])?;
        if !bottom.is_empty() {
            src.copy_from(top_len, &mut buf[bottom])?;
        }

        self.write_pos = (self.write_pos + n) % self.size;
        self.count += n;
        Ok(n)
    }
}
