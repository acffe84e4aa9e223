// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Block-while-predicate helper used by the channel to put readers to sleep
// on an empty pipe and writers to sleep on a full one.

use crate::condition::PipeCondition;
use crate::error::{PipeError, Result};
use crate::interrupt::Interrupt;
use crate::mutex::PipeGuard;

/// A named wait queue: one condition plus the re-check loop around it.
pub struct Waiter {
    name: &'static str,
    cond: PipeCondition,
}

impl Waiter {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            cond: PipeCondition::new(),
        }
    }

    /// Sleep while `blocked` returns `true` for the guarded state.
    ///
    /// The predicate is re-evaluated after every wake-up, since another
    /// thread may have consumed the condition between the signal and our
    /// resumption. A `nonblocking` caller never sleeps: it gets `WouldBlock`
    /// as soon as the predicate holds.
    pub fn wait_while<T, F>(
        &self,
        guard: &mut PipeGuard<'_, T>,
        intr: &Interrupt,
        nonblocking: bool,
        mut blocked: F,
    ) -> Result<()>
    where
        F: FnMut(&T) -> bool,
    {
        while blocked(&**guard) {
            if nonblocking {
                return Err(PipeError::WouldBlock);
            }
            log::trace!("sleeping on {}", self.name);
            self.cond.wait_interruptible(guard, intr)?;
        }
        Ok(())
    }

    /// Wake every sleeper; each re-checks its own predicate.
    pub fn broadcast(&self) -> usize {
        self.cond.broadcast()
    }
}
