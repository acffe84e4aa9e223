// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Pluggable transfer between the pipe's ring buffer and caller memory.
// A transfer may fail part-way (bad caller address, unmapped page, ...);
// the channel turns any failure into PipeError::CopyFault and aborts the
// whole read or write.

use crate::error::{PipeError, Result};

/// Destination of a read: caller memory the channel copies *into*.
pub trait CopyTo {
    /// Number of bytes the caller can accept.
    fn capacity(&self) -> usize;

    /// Copy `src` into caller memory starting at byte `offset`.
    fn copy_to(&mut self, offset: usize, src: &[u8]) -> Result<()>;
}

/// Source of a write: caller memory the channel copies *from*.
pub trait CopyFrom {
    /// Number of bytes the caller offers.
    fn available(&self) -> usize;

    /// Fill `dst` from caller memory starting at byte `offset`.
    fn copy_from(&self, offset: usize, dst: &mut [u8]) -> Result<()>;
}

impl CopyTo for [u8] {
    fn capacity(&self) -> usize {
        self.len()
    }

    fn copy_to(&mut self, offset: usize, src: &[u8]) -> Result<()> {
        let end = offset.checked_add(src.len()).ok_or(PipeError::CopyFault)?;
        let dst = self.get_mut(offset..end).ok_or(PipeError::CopyFault)?;
        dst.copy_from_slice(src);
        Ok(())
    }
}

impl CopyFrom for [u8] {
    fn available(&self) -> usize {
        self.len()
    }

    fn copy_from(&self, offset: usize, dst: &mut [u8]) -> Result<()> {
        let end = offset.checked_add(dst.len()).ok_or(PipeError::CopyFault)?;
        let src = self.get(offset..end).ok_or(PipeError::CopyFault)?;
        dst.copy_from_slice(src);
        Ok(())
    }
}

impl CopyTo for Vec<u8> {
    fn capacity(&self) -> usize {
        self.len()
    }

    fn copy_to(&mut self, offset: usize, src: &[u8]) -> Result<()> {
        self.as_mut_slice().copy_to(offset, src)
    }
}

impl CopyFrom for Vec<u8> {
    fn available(&self) -> usize {
        self.len()
    }

    fn copy_from(&self, offset: usize, dst: &mut [u8]) -> Result<()> {
        self.as_slice().copy_from(offset, dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_copy_in_bounds() {
        let mut out = [0u8; 6];
        out[..].copy_to(2, &[9, 8, 7]).expect("copy");
        assert_eq!(out, [0, 0, 9, 8, 7, 0]);

        let src = [1u8, 2, 3, 4];
        let mut dst = [0u8; 2];
        src[..].copy_from(1, &mut dst).expect("copy");
        assert_eq!(dst, [2, 3]);
    }

    #[test]
    fn slice_copy_out_of_bounds_faults() {
        let mut out = [0u8; 4];
        assert_eq!(out[..].copy_to(3, &[1, 2]), Err(PipeError::CopyFault));
        assert_eq!(out, [0; 4]);

        let src = [1u8, 2];
        let mut dst = [0u8; 3];
        assert_eq!(src[..].copy_from(0, &mut dst), Err(PipeError::CopyFault));
    }
}
