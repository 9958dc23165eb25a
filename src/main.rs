//! Iris - Lock-Free SPSC Ring Buffer
//!
//! Demo + self-benchmark:
//! - Hand-off dua thread dengan yield-loop retry
//! - Latency push/pop single-threaded
//! - Throughput 5 juta elemen lintas thread
//! - Bulk transfer (satu publish per batch)

use iris::core::RingBuffer;
use std::thread;
use std::time::Instant;

fn main() {
    println!("🚀 Iris SPSC Ring Buffer - v0.1");
    println!("================================\n");

    demo_handoff();
    benchmark_latency();
    benchmark_throughput();
    benchmark_bulk();

    println!("\n✅ All demos complete!");
}

/// Hand-off sederhana: 10.000 value lewat buffer kecil
fn demo_handoff() {
    println!("📨 Two-Thread Hand-Off Demo");
    println!("---------------------------");

    const COUNT: u64 = 10_000;
    let (mut tx, mut rx) = RingBuffer::<u64, 1024>::new().split();

    let producer = thread::spawn(move || {
        for i in 0..COUNT {
            let mut v = i;
            while let Err(back) = tx.push(v) {
                v = back;
                thread::yield_now();
            }
        }
    });

    let consumer = thread::spawn(move || {
        let mut count = 0u64;
        while count < COUNT {
            if let Some(v) = rx.pop() {
                if v % 2500 == 0 {
                    println!("  got {}", v);
                }
                count += 1;
            } else {
                thread::yield_now();
            }
        }
        count
    });

    producer.join().unwrap();
    let received = consumer.join().unwrap();
    println!("  done - {} values transferred\n", received);
}

/// Latency push/pop single-threaded (tanpa contention)
fn benchmark_latency() {
    println!("📊 Latency Benchmark (single-threaded)");
    println!("--------------------------------------");

    const ITERATIONS: usize = 1_000_000;
    let (mut tx, mut rx) = RingBuffer::<u64, 65536>::new().split();

    // Warm up
    for i in 0..1000 {
        tx.push(i).ok();
    }
    while rx.pop().is_some() {}

    // Benchmark push
    let start = Instant::now();
    for i in 0..ITERATIONS {
        if tx.push(i as u64).is_err() {
            rx.pop();
            tx.push(i as u64).ok();
        }
    }
    let push_duration = start.elapsed();

    // Drain
    while rx.pop().is_some() {}

    // Benchmark pop
    for i in 0..ITERATIONS.min(65535) {
        tx.push(i as u64).ok();
    }
    let filled = rx.len();

    let start = Instant::now();
    for _ in 0..filled {
        rx.pop();
    }
    let pop_duration = start.elapsed();

    let push_ns = push_duration.as_nanos() as f64 / ITERATIONS as f64;
    let pop_ns = pop_duration.as_nanos() as f64 / filled as f64;

    println!("  Push latency: {:.2} ns/op", push_ns);
    println!("  Pop latency:  {:.2} ns/op", pop_ns);
    println!(
        "  Throughput:   {:.2} M ops/sec\n",
        ITERATIONS as f64 / push_duration.as_secs_f64() / 1_000_000.0
    );
}

/// Throughput lintas thread: 5 juta elemen
fn benchmark_throughput() {
    println!("📊 Cross-Thread Throughput (5M elements)");
    println!("----------------------------------------");

    const COUNT: u64 = 5_000_000;
    let (mut tx, mut rx) = RingBuffer::<u64, 16384>::new().split();

    let start = Instant::now();

    let producer = thread::spawn(move || {
        for i in 0..COUNT {
            let mut v = i;
            while let Err(back) = tx.push(v) {
                v = back;
                thread::yield_now();
            }
        }
    });

    let consumer = thread::spawn(move || {
        let mut seen = 0u64;
        while seen < COUNT {
            if rx.pop().is_some() {
                seen += 1;
            }
        }
        seen
    });

    producer.join().unwrap();
    let seen = consumer.join().unwrap();
    let elapsed = start.elapsed();

    let mops = seen as f64 / elapsed.as_secs_f64() / 1_000_000.0;
    println!(
        "  Transferred {} items in {} ms ({:.2} Mops)\n",
        seen,
        elapsed.as_millis(),
        mops
    );
}

/// Bulk transfer: bandingkan per-element vs batch publish
fn benchmark_bulk() {
    println!("📊 Bulk Transfer Benchmark");
    println!("--------------------------");

    const ITERATIONS: usize = 1000;
    const BATCH: usize = 1024;

    let (mut tx, mut rx) = RingBuffer::<u64, 65536>::new().split();
    let values: Vec<u64> = (0..BATCH as u64).collect();
    let mut out = vec![0u64; BATCH];

    let start = Instant::now();
    for _ in 0..ITERATIONS {
        let pushed = tx.push_bulk(&values);
        let popped = rx.pop_bulk(&mut out);
        assert_eq!(pushed, popped);
    }
    let bulk_duration = start.elapsed();

    let total = (ITERATIONS * BATCH) as f64;
    let per_op = bulk_duration.as_nanos() as f64 / total;

    println!("  Batch size:   {} elements", BATCH);
    println!("  Per element:  {:.2} ns (single cursor publish per batch)", per_op);
    println!(
        "  Throughput:   {:.2} M ops/sec",
        total / bulk_duration.as_secs_f64() / 1_000_000.0
    );
}
