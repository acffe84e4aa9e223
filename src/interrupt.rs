// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Cooperative cancellation token for blocking pipe operations.
// Plays the role a pending signal plays for a sleeping task: every blocking
// point (lock acquisition, data wait, space wait) checks it and gives up.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{PipeError, Result};

/// How long a blocked caller sleeps between checks of its token.
pub(crate) const POLL_SLICE: Duration = Duration::from_millis(5);

/// A shareable interrupt flag.
///
/// Clones share the same flag: raising any clone interrupts every call that
/// is blocked on any other clone. A raised token stays raised until
/// [`clear`](Self::clear) is called, so calls made after the raise fail
/// immediately instead of blocking.
#[derive(Clone, Default, Debug)]
pub struct Interrupt {
    raised: Arc<AtomicBool>,
}

impl Interrupt {
    /// Create a new, un-raised token.
    pub fn new() -> Self {
        Self::default()
    }

    /// A token with no other holders, so it can never be raised.
    pub fn never() -> Self {
        Self::default()
    }

    /// Interrupt every blocked call that observes this token.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Re-arm the token after an interruption has been handled.
    pub fn clear(&self) {
        self.raised.store(false, Ordering::Release);
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    /// `Err(Interrupted)` if the token has been raised.
    #[inline]
    pub(crate) fn check(&self) -> Result<()> {
        if self.is_raised() {
            Err(PipeError::Interrupted)
        } else {
            Ok(())
        }
    }
}
