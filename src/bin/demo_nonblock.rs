// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Walks through the non-blocking and interrupt paths of a small pipe.
//
// Usage:
//   demo_nonblock [config.toml]
//
// Without a config file an 8-byte pipe is used.

use std::thread;
use std::time::Duration;

use libpipe::{Interrupt, OpenMode, OpenOptions, PipeConfig, PipeRegistry};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let cfg = match std::env::args().nth(1) {
        Some(path) => PipeConfig::load(&path).unwrap_or_else(|e| {
            eprintln!("demo_nonblock: {path}: {e}");
            std::process::exit(1);
        }),
        None => PipeConfig {
            buffer_size: 8,
            ..PipeConfig::default()
        },
    };
    let reg = PipeRegistry::new(&cfg).expect("registry");
    let ch = reg.get(0).expect("first pipe");

    let s = ch
        .open(OpenOptions::new().mode(OpenMode::ReadWrite).nonblocking(true))
        .expect("open");

    let mut buf = vec![0u8; cfg.buffer_size];
    println!("read on empty pipe   -> {:?}", s.read(&mut buf));

    let fill = vec![0xEEu8; cfg.buffer_size + 3];
    println!("write {} bytes       -> {:?}", fill.len(), s.write(&fill));
    println!("write on full pipe   -> {:?}", s.write(&[1]));
    println!("pipe state           -> {:?}", ch.snapshot());
    println!("seek                 -> {:?}", s.seek(std::io::SeekFrom::Start(0)));
    println!("read                 -> {:?}", s.read(&mut buf));
    drop(s);

    let intr = Interrupt::new();
    let r = ch
        .open(OpenOptions::new().read(true).interrupt(intr.clone()))
        .expect("open blocking reader");
    let blocked = thread::spawn(move || {
        let mut one = [0u8; 1];
        r.read(&mut one)
    });
    thread::sleep(Duration::from_millis(100));
    intr.raise();
    println!("blocked read + raise -> {:?}", blocked.join().expect("reader thread"));
    println!("after last close     -> {:?}", ch.snapshot());
}
