// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Producer/consumer throughput demo over one registry pipe.
//
// Usage:
//   demo_pipe [buffer_size] [total_bytes]
//
// A writer thread pushes `total_bytes` through a pipe of `buffer_size`
// bytes while the main thread drains it, printing throughput every
// second. Ctrl-C interrupts both sides. Set RUST_LOG=debug (or trace)
// to watch buffer allocation and individual transfers.

use std::thread;
use std::time::{Duration, Instant};

use libpipe::{Interrupt, OpenOptions, PipeConfig, PipeError, PipeRegistry};

fn str_of_size(sz: usize) -> String {
    if sz > 1024 * 1024 {
        format!("{} MB", sz / (1024 * 1024))
    } else if sz > 1024 {
        format!("{} KB", sz / 1024)
    } else {
        format!("{sz} bytes")
    }
}

fn arg_or(args: &[String], i: usize, default: usize) -> usize {
    match args.get(i) {
        Some(s) => s.parse().unwrap_or_else(|_| {
            eprintln!("invalid number: {s}");
            std::process::exit(1);
        }),
        None => default,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let buffer_size = arg_or(&args, 1, 4096);
    let total = arg_or(&args, 2, 64 * 1024 * 1024);

    let cfg = PipeConfig {
        buffer_size,
        ..PipeConfig::default()
    };
    let reg = match PipeRegistry::new(&cfg) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("demo_pipe: {e}");
            std::process::exit(1);
        }
    };

    let quit = Interrupt::new();
    {
        let q = quit.clone();
        ctrlc_or_sigterm(move || q.raise());
    }

    let name = cfg.channel_name(0);
    let reader = reg
        .open(&name, OpenOptions::new().read(true).interrupt(quit.clone()))
        .expect("open reader");
    let writer = reg
        .open(&name, OpenOptions::new().write(true).interrupt(quit.clone()))
        .expect("open writer");

    println!(
        "demo_pipe: {} through a {} pipe...",
        str_of_size(total),
        str_of_size(buffer_size)
    );

    let producer = thread::spawn(move || {
        let chunk = vec![0x5Au8; 64 * 1024];
        let mut sent = 0usize;
        while sent < total {
            let want = (total - sent).min(chunk.len());
            match writer.write(&chunk[..want]) {
                Ok(n) => sent += n,
                Err(PipeError::Interrupted) => break,
                Err(e) => {
                    eprintln!("writer: {e}");
                    break;
                }
            }
        }
        sent
    });

    let start = Instant::now();
    let mut tick = Instant::now();
    let mut window = 0usize;
    let mut received = 0usize;
    let mut buf = vec![0u8; 64 * 1024];
    while received < total {
        match reader.read(&mut buf) {
            Ok(n) => {
                received += n;
                window += n;
            }
            Err(PipeError::Interrupted) => {
                println!("demo_pipe: interrupted");
                break;
            }
            Err(e) => {
                eprintln!("reader: {e}");
                break;
            }
        }
        if tick.elapsed() >= Duration::from_secs(1) {
            println!("{}/s", str_of_size(window));
            window = 0;
            tick = Instant::now();
        }
    }

    let sent = producer.join().unwrap_or(0);
    let secs = start.elapsed().as_secs_f64();
    println!(
        "demo_pipe: sent {}, received {} in {:.2}s ({:.1} MB/s)",
        str_of_size(sent),
        str_of_size(received),
        secs,
        received as f64 / secs / 1e6
    );
}

fn ctrlc_or_sigterm(f: impl Fn() + Send + 'static) {
    #[cfg(unix)]
    {
        use std::sync::Mutex;
        static CB: std::sync::OnceLock<Mutex<Box<dyn Fn() + Send>>> = std::sync::OnceLock::new();
        CB.get_or_init(|| Mutex::new(Box::new(f)));
        extern "C" fn handler(_: libc::c_int) {
            if let Some(cb) = CB.get() {
                if let Ok(g) = cb.lock() {
                    g();
                }
            }
        }
        unsafe {
            libc::signal(libc::SIGINT, handler as *const () as libc::sighandler_t);
            libc::signal(libc::SIGTERM, handler as *const () as libc::sighandler_t);
        }
    }
    #[cfg(not(unix))]
    {
        let _ = f;
    }
}
