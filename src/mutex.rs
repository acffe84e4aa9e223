// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Per-channel lock with interruptible acquisition.
// Wraps parking_lot::Mutex; contended acquisition waits in short timed
// slices so an Interrupt can abandon the wait.

use parking_lot::{Mutex, MutexGuard};

use crate::error::Result;
use crate::interrupt::{Interrupt, POLL_SLICE};

/// Guard returned by [`PipeMutex`]; unlocks on drop.
pub type PipeGuard<'a, T> = MutexGuard<'a, T>;

/// A mutex whose contended acquisition can be interrupted.
///
/// Uncontended acquisition always succeeds, even when the token is already
/// raised: only time spent *waiting* for the lock is interruptible.
pub struct PipeMutex<T> {
    inner: Mutex<T>,
}

impl<T> PipeMutex<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(value),
        }
    }

    /// Lock the mutex (blocking, not interruptible).
    pub fn lock(&self) -> PipeGuard<'_, T> {
        self.inner.lock()
    }

    /// Lock the mutex, giving up with `Interrupted` if `intr` is raised
    /// while the lock is held by someone else.
    pub fn lock_interruptible(&self, intr: &Interrupt) -> Result<PipeGuard<'_, T>> {
        if let Some(guard) = self.inner.try_lock() {
            return Ok(guard);
        }
        loop {
            intr.check()?;
            if let Some(guard) = self.inner.try_lock_for(POLL_SLICE) {
                return Ok(guard);
            }
        }
    }
}

impl<T: Default> Default for PipeMutex<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::PipeError;

    #[test]
    fn uncontended_lock_ignores_raised_token() {
        let m = PipeMutex::new(7u32);
        let intr = Interrupt::new();
        intr.raise();
        let g = m.lock_interruptible(&intr).expect("uncontended lock");
        assert_eq!(*g, 7);
    }

    #[test]
    fn contended_lock_is_interruptible() {
        let m = Arc::new(PipeMutex::new(()));
        let held = m.lock();

        let intr = Interrupt::new();
        let m2 = Arc::clone(&m);
        let i2 = intr.clone();
        let t = thread::spawn(move || m2.lock_interruptible(&i2).map(|_| ()));

        thread::sleep(Duration::from_millis(30));
        intr.raise();
        assert_eq!(t.join().unwrap(), Err(PipeError::Interrupted));
        drop(held);
    }
}
