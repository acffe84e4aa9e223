// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Error taxonomy for pipe channels and their configuration.

use std::io;

use thiserror::Error;

/// Errors returned by channel and session operations.
///
/// Every variant leaves the channel consistent: no bytes are transferred and
/// no offsets or counters move when an operation fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipeError {
    /// A blocking wait (for data, space, or the lock) was cancelled.
    #[error("interrupted while waiting")]
    Interrupted,
    /// The session is non-blocking and the operation would have suspended.
    #[error("operation would block")]
    WouldBlock,
    /// The ring buffer could not be allocated at open time.
    #[error("out of memory allocating {0}-byte pipe buffer")]
    OutOfMemory(usize),
    /// The copy to or from caller memory failed.
    #[error("bad address in caller buffer")]
    CopyFault,
    /// Seeking, or another unsupported request.
    #[error("operation not supported on a pipe")]
    NotSupported,
    /// Read on a write-only session, or write on a read-only one.
    #[error("session was not opened for this operation")]
    BadMode,
    /// An open request asked for neither read nor write access.
    #[error("open mode must request read, write, or both")]
    InvalidMode,
    /// A channel was constructed with a zero capacity.
    #[error("pipe buffer size must be positive")]
    InvalidSize,
    /// No channel is registered under the requested name or index.
    #[error("no such pipe: {0}")]
    NoSuchChannel(String),
}

impl PipeError {
    /// Whether retrying the same call later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Interrupted | Self::WouldBlock)
    }

    /// POSIX errno equivalent, as a character-device driver would report it.
    #[cfg(unix)]
    pub fn errno(&self) -> i32 {
        match self {
            Self::Interrupted => libc::EINTR,
            Self::WouldBlock => libc::EAGAIN,
            Self::OutOfMemory(_) => libc::ENOMEM,
            Self::CopyFault => libc::EFAULT,
            Self::NotSupported => libc::ESPIPE,
            Self::BadMode => libc::EBADF,
            Self::InvalidMode | Self::InvalidSize => libc::EINVAL,
            Self::NoSuchChannel(_) => libc::ENODEV,
        }
    }
}

impl From<PipeError> for io::Error {
    fn from(e: PipeError) -> Self {
        let kind = match e {
            PipeError::Interrupted => io::ErrorKind::Interrupted,
            PipeError::WouldBlock => io::ErrorKind::WouldBlock,
            PipeError::OutOfMemory(_) => io::ErrorKind::OutOfMemory,
            PipeError::CopyFault => io::ErrorKind::InvalidData,
            PipeError::NotSupported => io::ErrorKind::Unsupported,
            PipeError::BadMode => io::ErrorKind::PermissionDenied,
            PipeError::InvalidMode | PipeError::InvalidSize => io::ErrorKind::InvalidInput,
            PipeError::NoSuchChannel(_) => io::ErrorKind::NotFound,
        };
        io::Error::new(kind, e)
    }
}

/// Errors raised while loading or validating a [`PipeConfig`](crate::PipeConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

pub type Result<T, E = PipeError> = std::result::Result<T, E>;
