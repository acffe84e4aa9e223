// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Condition signal paired with a PipeMutex.
// Waits are bounded to one poll slice so the caller can check its
// Interrupt between slices; callers must always re-check their predicate.

use parking_lot::Condvar;

use crate::error::Result;
use crate::interrupt::{Interrupt, POLL_SLICE};
use crate::mutex::PipeGuard;

/// A condition variable for threads sleeping on pipe state.
#[derive(Default)]
pub struct PipeCondition {
    cv: Condvar,
}

impl PipeCondition {
    pub const fn new() -> Self {
        Self { cv: Condvar::new() }
    }

    /// Wait for a signal. The caller must hold `guard`; the lock is
    /// atomically released for the duration of the wait and re-acquired
    /// before returning.
    ///
    /// Returns after a signal, a spurious wake-up, or one poll slice,
    /// whichever comes first. Returns `Err(Interrupted)` without waiting
    /// if `intr` is already raised.
    pub fn wait_interruptible<T>(
        &self,
        guard: &mut PipeGuard<'_, T>,
        intr: &Interrupt,
    ) -> Result<()> {
        intr.check()?;
        let _ = self.cv.wait_for(guard, POLL_SLICE);
        Ok(())
    }

    /// Wake all waiters. Returns how many were woken.
    pub fn broadcast(&self) -> usize {
        self.cv.notify_all()
    }
}
