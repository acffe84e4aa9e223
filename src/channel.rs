// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// The pipe channel: a fixed-capacity ring buffer shared by any number of
// reader and writer sessions.
//
// - Readers sleep while the pipe is empty; writers sleep while it is full.
// - Every read/write moves as many bytes as it can right now (at least one)
//   and returns the count; callers loop for more.
// - The ring buffer is allocated by the first open and freed by the close
//   that drops the last session.
// - Every open rewinds the ring: a fresh session always sees an empty pipe.

use std::fmt;
use std::io;
use std::sync::Arc;

use crate::copy::{CopyFrom, CopyTo};
use crate::error::{PipeError, Result};
use crate::interrupt::Interrupt;
use crate::mutex::PipeMutex;
use crate::ring::Ring;
use crate::waiter::Waiter;

/// Default ring capacity in bytes.
pub const DEFAULT_PIPE_SIZE: usize = 4096;

// ---------------------------------------------------------------------------
// Open mode / options
// ---------------------------------------------------------------------------

/// Which directions a session is opened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    Write,
    ReadWrite,
}

impl OpenMode {
    pub fn readable(self) -> bool {
        matches!(self, Self::Read | Self::ReadWrite)
    }

    pub fn writable(self) -> bool {
        matches!(self, Self::Write | Self::ReadWrite)
    }

    /// Build a mode from read/write flags. `None` if neither is set.
    pub fn from_flags(read: bool, write: bool) -> Option<Self> {
        match (read, write) {
            (true, true) => Some(Self::ReadWrite),
            (true, false) => Some(Self::Read),
            (false, true) => Some(Self::Write),
            (false, false) => None,
        }
    }
}

/// Options for [`Channel::open`], in the style of `std::fs::OpenOptions`.
#[derive(Debug, Clone, Default)]
pub struct OpenOptions {
    read: bool,
    write: bool,
    nonblocking: bool,
    interrupt: Option<Interrupt>,
}

impl OpenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&mut self, read: bool) -> &mut Self {
        self.read = read;
        self
    }

    pub fn write(&mut self, write: bool) -> &mut Self {
        self.write = write;
        self
    }

    /// Return `WouldBlock` instead of sleeping on an empty/full pipe.
    pub fn nonblocking(&mut self, nonblocking: bool) -> &mut Self {
        self.nonblocking = nonblocking;
        self
    }

    /// Token that interrupts this session's blocking calls, including the
    /// lock wait inside `open` itself.
    pub fn interrupt(&mut self, intr: Interrupt) -> &mut Self {
        self.interrupt = Some(intr);
        self
    }

    pub fn mode(&mut self, mode: OpenMode) -> &mut Self {
        self.read = mode.readable();
        self.write = mode.writable();
        self
    }
}

// ---------------------------------------------------------------------------
// Channel
// ---------------------------------------------------------------------------

/// Point-in-time view of a channel's state, taken under its lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelStats {
    pub size: usize,
    pub count: usize,
    pub read_pos: usize,
    pub write_pos: usize,
    pub readers: usize,
    pub writers: usize,
    pub allocated: bool,
}

struct ChannelState {
    ring: Ring,
    readers: usize,
    writers: usize,
}

impl ChannelState {
    fn sessions(&self) -> usize {
        self.readers + self.writers
    }
}

/// A named byte pipe.
///
/// Shared as `Arc<Channel>`; every [`Session`] keeps its channel alive.
/// All state lives behind one lock. Two wait queues sit next to it:
/// `not_empty` for readers and `not_full` for writers.
pub struct Channel {
    name: String,
    size: usize,
    state: PipeMutex<ChannelState>,
    not_empty: Waiter,
    not_full: Waiter,
}

impl Channel {
    /// Create an idle channel with a `size`-byte ring. Nothing is allocated
    /// until the first open.
    pub fn new(size: usize) -> Result<Arc<Self>> {
        Self::with_name("pipe", size)
    }

    pub fn with_name(name: impl Into<String>, size: usize) -> Result<Arc<Self>> {
        if size == 0 {
            return Err(PipeError::InvalidSize);
        }
        Ok(Arc::new(Self {
            name: name.into(),
            size,
            state: PipeMutex::new(ChannelState {
                ring: Ring::new(size),
                readers: 0,
                writers: 0,
            }),
            not_empty: Waiter::new("not_empty"),
            not_full: Waiter::new("not_full"),
        }))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ring capacity in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Open a session on this channel.
    ///
    /// Allocates the ring if no session currently holds it, rewinds the
    /// ring, and bumps the reader and/or writer count.
    ///
    /// # Errors
    /// - `InvalidMode` if `opts` requests neither read nor write.
    /// - `Interrupted` if the options' token fires while waiting for the lock.
    /// - `OutOfMemory` if the ring cannot be allocated. Nothing is changed.
    pub fn open(self: &Arc<Self>, opts: &OpenOptions) -> Result<Session> {
        let mode = OpenMode::from_flags(opts.read, opts.write).ok_or(PipeError::InvalidMode)?;
        let intr = opts.interrupt.clone().unwrap_or_else(Interrupt::never);

        let mut st = self.state.lock_interruptible(&intr)?;
        if st.ring.allocate()? {
            log::debug!("{}: allocated {}-byte ring", self.name, self.size);
        }
        let discarded = st.ring.count();
        st.ring.reset();
        if mode.readable() {
            st.readers += 1;
        }
        if mode.writable() {
            st.writers += 1;
        }
        log::trace!(
            "{}: open {:?} (readers={}, writers={})",
            self.name,
            mode,
            st.readers,
            st.writers
        );
        drop(st);

        // Writers that were waiting on a full ring now have room.
        if discarded > 0 {
            self.not_full.broadcast();
        }

        Ok(Session {
            channel: Arc::clone(self),
            mode,
            nonblocking: opts.nonblocking,
            intr,
        })
    }

    /// Read up to `count` bytes into `dst`.
    ///
    /// Sleeps while the pipe is empty (unless the session is non-blocking),
    /// then returns between 1 and `min(count, buffered)` bytes. A zero
    /// `count` returns `Ok(0)` without waiting.
    ///
    /// # Errors
    /// `BadMode`, `WouldBlock`, `Interrupted`, or `CopyFault`. On any error
    /// no bytes are consumed from the pipe.
    pub fn read<D>(&self, session: &Session, dst: &mut D, count: usize) -> Result<usize>
    where
        D: CopyTo + ?Sized,
    {
        self.check_session(session)?;
        if !session.mode.readable() {
            return Err(PipeError::BadMode);
        }
        if count == 0 {
            return Ok(0);
        }

        let mut st = self.state.lock_interruptible(&session.intr)?;
        self.not_empty
            .wait_while(&mut st, &session.intr, session.nonblocking, |s| s.ring.is_empty())?;

        let n = st.ring.read_into(dst, count)?;
        log::trace!("{}: read {n}/{count} bytes, {} left", self.name, st.ring.count());
        drop(st);

        self.not_full.broadcast();
        Ok(n)
    }

    /// Write up to `count` bytes from `src`.
    ///
    /// Sleeps while the pipe is full (unless the session is non-blocking),
    /// then accepts between 1 and `min(count, free space)` bytes. A zero
    /// `count` returns `Ok(0)` without waiting.
    ///
    /// # Errors
    /// `BadMode`, `WouldBlock`, `Interrupted`, or `CopyFault`. On any error
    /// nothing is added to the pipe.
    pub fn write<S>(&self, session: &Session, src: &S, count: usize) -> Result<usize>
    where
        S: CopyFrom + ?Sized,
    {
        self.check_session(session)?;
        if !session.mode.writable() {
            return Err(PipeError::BadMode);
        }
        if count == 0 {
            return Ok(0);
        }

        let mut st = self.state.lock_interruptible(&session.intr)?;
        self.not_full
            .wait_while(&mut st, &session.intr, session.nonblocking, |s| s.ring.is_full())?;

        let n = st.ring.write_from(src, count)?;
        log::trace!("{}: wrote {n}/{count} bytes, {} buffered", self.name, st.ring.count());
        drop(st);

        self.not_empty.broadcast();
        Ok(n)
    }

    /// Close a session. Equivalent to dropping it.
    ///
    /// The session is consumed and always released on the channel that
    /// opened it. If that is not `self`, the release still happens there and
    /// the call reports `BadMode`.
    pub fn close(&self, session: Session) -> Result<()> {
        self.check_session(&session)?;
        drop(session);
        Ok(())
    }

    /// Snapshot the channel's counters and offsets.
    pub fn snapshot(&self) -> ChannelStats {
        let st = self.state.lock();
        ChannelStats {
            size: st.ring.size(),
            count: st.ring.count(),
            read_pos: st.ring.read_pos(),
            write_pos: st.ring.write_pos(),
            readers: st.readers,
            writers: st.writers,
            allocated: st.ring.is_allocated(),
        }
    }

    fn check_session(&self, session: &Session) -> Result<()> {
        if std::ptr::eq(Arc::as_ptr(&session.channel), self) {
            Ok(())
        } else {
            Err(PipeError::BadMode)
        }
    }

    /// Drop one session's reference counts; free the ring with the last one.
    /// Not interruptible: a close always completes.
    fn release(&self, mode: OpenMode) {
        let mut st = self.state.lock();
        if mode.readable() {
            st.readers = st.readers.saturating_sub(1);
        }
        if mode.writable() {
            st.writers = st.writers.saturating_sub(1);
        }
        if st.sessions() == 0 {
            st.ring.release();
            log::debug!("{}: last session closed, ring freed", self.name);
        }
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("size", &self.size)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// An open handle on a [`Channel`]. Closing (or dropping) it releases its
/// reader/writer reference.
pub struct Session {
    channel: Arc<Channel>,
    mode: OpenMode,
    nonblocking: bool,
    intr: Interrupt,
}

impl Session {
    pub fn channel(&self) -> &Arc<Channel> {
        &self.channel
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    pub fn is_nonblocking(&self) -> bool {
        self.nonblocking
    }

    /// Switch between blocking and non-blocking mode after open.
    pub fn set_nonblocking(&mut self, nonblocking: bool) {
        self.nonblocking = nonblocking;
    }

    /// The token that interrupts this session's blocking calls.
    pub fn interrupt(&self) -> &Interrupt {
        &self.intr
    }

    /// Read into `buf`, returning how many bytes were received.
    pub fn read(&self, buf: &mut [u8]) -> Result<usize> {
        let n = buf.len();
        self.channel.read(self, buf, n)
    }

    /// Read up to `count` bytes through a caller-supplied copy primitive.
    pub fn read_to<D>(&self, dst: &mut D, count: usize) -> Result<usize>
    where
        D: CopyTo + ?Sized,
    {
        self.channel.read(self, dst, count)
    }

    /// Write from `buf`, returning how many bytes were accepted.
    pub fn write(&self, buf: &[u8]) -> Result<usize> {
        self.channel.write(self, buf, buf.len())
    }

    /// Write up to `count` bytes through a caller-supplied copy primitive.
    pub fn write_from<S>(&self, src: &S, count: usize) -> Result<usize>
    where
        S: CopyFrom + ?Sized,
    {
        self.channel.write(self, src, count)
    }

    /// Pipes are not seekable.
    pub fn seek(&self, _pos: io::SeekFrom) -> Result<u64> {
        Err(PipeError::NotSupported)
    }

    pub fn close(self) {
        drop(self);
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.channel.release(self.mode);
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("channel", &self.channel.name)
            .field("mode", &self.mode)
            .field("nonblocking", &self.nonblocking)
            .finish()
    }
}

impl io::Read for Session {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Session::read(self, buf).map_err(io::Error::from)
    }
}

impl io::Write for Session {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Session::write(self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Seek for Session {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        Session::seek(self, pos).map_err(io::Error::from)
    }
}
