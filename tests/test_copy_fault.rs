// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// A failing copy primitive must abort the whole read or write and leave
// the pipe exactly as it was, whether the fault hits the first or the
// second segment of a wrapped transfer.

use std::cell::Cell;

use libpipe::{Channel, CopyFrom, CopyTo, OpenMode, OpenOptions, PipeError};

/// Caller memory that faults on the `fail_on`-th copy call (0-based).
struct FaultySink {
    buf: Vec<u8>,
    calls: usize,
    fail_on: usize,
}

impl CopyTo for FaultySink {
    fn capacity(&self) -> usize {
        self.buf.len()
    }

    fn copy_to(&mut self, offset: usize, src: &[u8]) -> libpipe::Result<()> {
        let call = self.calls;
        self.calls += 1;
        if call == self.fail_on {
            return Err(PipeError::CopyFault);
        }
        self.buf.copy_to(offset, src)
    }
}

struct FaultySource {
    data: Vec<u8>,
    calls: Cell<usize>,
    fail_on: usize,
}

impl CopyFrom for FaultySource {
    fn available(&self) -> usize {
        self.data.len()
    }

    fn copy_from(&self, offset: usize, dst: &mut [u8]) -> libpipe::Result<()> {
        let call = self.calls.get();
        self.calls.set(call + 1);
        if call == self.fail_on {
            return Err(PipeError::CopyFault);
        }
        self.data.copy_from(offset, dst)
    }
}

/// An 8-byte pipe with read_pos = 6, write_pos = 2 and bytes 10..=13 buffered.
fn wrapped_pipe() -> (std::sync::Arc<Channel>, libpipe::Session) {
    let ch = Channel::new(8).unwrap();
    let s = ch
        .open(OpenOptions::new().mode(OpenMode::ReadWrite).nonblocking(true))
        .unwrap();
    let mut sink = [0u8; 6];
    s.write(&[0u8; 6]).unwrap();
    s.read(&mut sink).unwrap();
    s.write(&[10, 11, 12, 13]).unwrap();
    let st = ch.snapshot();
    assert_eq!((st.read_pos, st.write_pos, st.count), (6, 2, 4));
    (ch, s)
}

#[test]
fn read_fault_on_first_segment() {
    let (ch, s) = wrapped_pipe();
    let before = ch.snapshot();
    let mut sink = FaultySink {
        buf: vec![0; 4],
        calls: 0,
        fail_on: 0,
    };
    assert_eq!(s.read_to(&mut sink, 4), Err(PipeError::CopyFault));
    assert_eq!(ch.snapshot(), before);
}

#[test]
fn read_fault_on_second_segment_aborts_whole_read() {
    let (ch, s) = wrapped_pipe();
    let before = ch.snapshot();
    let mut sink = FaultySink {
        buf: vec![0; 4],
        calls: 0,
        fail_on: 1,
    };
    assert_eq!(s.read_to(&mut sink, 4), Err(PipeError::CopyFault));
    assert_eq!(sink.calls, 2);
    assert_eq!(ch.snapshot(), before);

    // Nothing was consumed: a clean read still sees every byte.
    let mut out = [0u8; 4];
    assert_eq!(s.read(&mut out).unwrap(), 4);
    assert_eq!(out, [10, 11, 12, 13]);
}

#[test]
fn write_fault_on_second_segment_aborts_whole_write() {
    let ch = Channel::new(8).unwrap();
    let s = ch
        .open(OpenOptions::new().mode(OpenMode::ReadWrite).nonblocking(true))
        .unwrap();
    let mut sink = [0u8; 6];
    s.write(&[0u8; 6]).unwrap();
    s.read(&mut sink).unwrap();
    let before = ch.snapshot();
    assert_eq!((before.write_pos, before.count), (6, 0));

    let src = FaultySource {
        data: vec![1, 2, 3, 4],
        calls: Cell::new(0),
        fail_on: 1,
    };
    assert_eq!(s.write_from(&src, 4), Err(PipeError::CopyFault));
    assert_eq!(src.calls.get(), 2);
    assert_eq!(ch.snapshot(), before);
    assert_eq!(s.read(&mut sink), Err(PipeError::WouldBlock));
}

#[test]
fn write_fault_on_first_segment() {
    let (ch, s) = wrapped_pipe();
    let before = ch.snapshot();
    let src = FaultySource {
        data: vec![1, 2, 3],
        calls: Cell::new(0),
        fail_on: 0,
    };
    assert_eq!(s.write_from(&src, 3), Err(PipeError::CopyFault));
    assert_eq!(src.calls.get(), 1);
    assert_eq!(ch.snapshot(), before);

    let mut out = [0u8; 8];
    assert_eq!(s.read(&mut out).unwrap(), 4);
    assert_eq!(&out[..4], &[10, 11, 12, 13]);
}

#[test]
fn caller_buffer_too_small_is_a_copy_fault() {
    let (ch, s) = wrapped_pipe();
    let before = ch.snapshot();
    let mut small = [0u8; 1];
    assert_eq!(s.read_to(&mut small[..], 4), Err(PipeError::CopyFault));
    assert_eq!(ch.snapshot(), before);
    assert_eq!(s.write_from(&[1u8][..], 3), Err(PipeError::CopyFault));
    assert_eq!(ch.snapshot(), before);
}
