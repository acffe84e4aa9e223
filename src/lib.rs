// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// In-process byte pipes: fixed-capacity ring buffers shared by any number
// of concurrent reader and writer sessions, with blocking, non-blocking and
// interruptible reads and writes.

mod error;
pub use error::{ConfigError, PipeError, Result};

mod interrupt;
pub use interrupt::Interrupt;

mod mutex;
pub use mutex::{PipeGuard, PipeMutex};

mod condition;
pub use condition::PipeCondition;

mod waiter;
pub use waiter::Waiter;

pub mod copy;
pub use copy::{CopyFrom, CopyTo};

mod ring;

pub mod channel;
pub use channel::{Channel, ChannelStats, OpenMode, OpenOptions, Session, DEFAULT_PIPE_SIZE};

mod config;
pub use config::PipeConfig;

mod registry;
pub use registry::PipeRegistry;
