// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Model-based checks: random sequences of non-blocking reads and writes
// against a VecDeque of the same capacity.

use std::collections::VecDeque;

use proptest::prelude::*;

use libpipe::{Channel, OpenMode, OpenOptions, PipeError};

#[derive(Debug, Clone)]
enum Op {
    Write(Vec<u8>),
    Read(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 0..24).prop_map(Op::Write),
        (0usize..24).prop_map(Op::Read),
    ]
}

proptest! {
    #[test]
    fn behaves_like_a_bounded_fifo(size in 1usize..20, ops in prop::collection::vec(op(), 1..64)) {
        let ch = Channel::new(size).unwrap();
        let s = ch
            .open(OpenOptions::new().mode(OpenMode::ReadWrite).nonblocking(true))
            .unwrap();
        let mut model: VecDeque<u8> = VecDeque::new();

        for op in ops {
            match op {
                Op::Write(data) => {
                    let res = s.write(&data);
                    if data.is_empty() {
                        prop_assert_eq!(res, Ok(0));
                    } else if model.len() == size {
                        prop_assert_eq!(res, Err(PipeError::WouldBlock));
                    } else {
                        let n = data.len().min(size - model.len());
                        prop_assert_eq!(res, Ok(n));
                        model.extend(&data[..n]);
                    }
                }
                Op::Read(want) => {
                    let mut buf = vec![0u8; want];
                    let res = s.read(&mut buf);
                    if want == 0 {
                        prop_assert_eq!(res, Ok(0));
                    } else if model.is_empty() {
                        prop_assert_eq!(res, Err(PipeError::WouldBlock));
                    } else {
                        let n = want.min(model.len());
                        prop_assert_eq!(res, Ok(n));
                        let expected: Vec<u8> = model.drain(..n).collect();
                        prop_assert_eq!(&buf[..n], &expected[..]);
                    }
                }
            }

            let st = ch.snapshot();
            prop_assert!(st.count <= st.size);
            prop_assert_eq!(st.count, model.len());
            prop_assert!(st.read_pos < size && st.write_pos < size);
            prop_assert_eq!((st.read_pos + st.count) % size, st.write_pos);
        }
    }
}
