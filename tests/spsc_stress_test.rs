//! SPSC Stress Test - Sustained Concurrent Round Trip
//!
//! Dua thread, jutaan elemen, verifikasi hukum FIFO dan konservasi:
//! setiap value yang berhasil di-enqueue keluar tepat sekali, dalam urutan.
//!
//! Usage:
//!   cargo test --release --test spsc_stress_test -- --nocapture

use iris::core::RingBuffer;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Statistics collector
struct StressStats {
    pushed: AtomicU64,
    popped: AtomicU64,
    push_retries: AtomicU64,
    pop_retries: AtomicU64,
}

impl StressStats {
    fn new() -> Self {
        Self {
            pushed: AtomicU64::new(0),
            popped: AtomicU64::new(0),
            push_retries: AtomicU64::new(0),
            pop_retries: AtomicU64::new(0),
        }
    }

    fn print_report(&self, label: &str, duration: Duration) {
        let pushed = self.pushed.load(Ordering::Relaxed);
        let popped = self.popped.load(Ordering::Relaxed);
        let push_retries = self.push_retries.load(Ordering::Relaxed);
        let pop_retries = self.pop_retries.load(Ordering::Relaxed);
        let mops = popped as f64 / duration.as_secs_f64() / 1_000_000.0;

        println!("\n📊 STRESS TEST RESULTS - {}", label);
        println!("==============================");
        println!("  Duration:      {:.2}s", duration.as_secs_f64());
        println!("  Pushed:        {}", pushed);
        println!("  Popped:        {}", popped);
        println!("  Push retries:  {}", push_retries);
        println!("  Pop retries:   {}", pop_retries);
        println!("  Throughput:    {:.2} M elems/sec", mops);

        if pushed == popped {
            println!("\n✅ CONSERVATION HOLDS - no loss, no duplication");
        }
    }
}

#[test]
fn test_round_trip_5m_fifo() {
    const COUNT: u64 = 5_000_000;

    let (mut tx, mut rx) = RingBuffer::<u64, 16384>::new().split();
    let stats = Arc::new(StressStats::new());
    let start = Instant::now();

    let producer = {
        let stats = Arc::clone(&stats);
        thread::spawn(move || {
            for i in 0..COUNT {
                let mut v = i;
                while let Err(back) = tx.push(v) {
                    v = back;
                    stats.push_retries.fetch_add(1, Ordering::Relaxed);
                    thread::yield_now();
                }
                stats.pushed.fetch_add(1, Ordering::Relaxed);
            }
        })
    };

    let consumer = {
        let stats = Arc::clone(&stats);
        thread::spawn(move || {
            let mut expected = 0u64;
            while expected < COUNT {
                match rx.pop() {
                    Some(v) => {
                        // Hukum FIFO: urutan keluar == urutan masuk
                        assert_eq!(v, expected, "FIFO order violated");
                        expected += 1;
                        stats.popped.fetch_add(1, Ordering::Relaxed);
                    }
                    None => {
                        stats.pop_retries.fetch_add(1, Ordering::Relaxed);
                        thread::yield_now();
                    }
                }
            }
            expected
        })
    };

    producer.join().unwrap();
    let seen = consumer.join().unwrap();
    let duration = start.elapsed();

    stats.print_report("5M single-element", duration);

    assert_eq!(seen, COUNT);
    assert_eq!(stats.pushed.load(Ordering::Relaxed), COUNT);
    assert_eq!(stats.popped.load(Ordering::Relaxed), COUNT);
}

#[test]
fn test_round_trip_bulk_consumer() {
    const COUNT: u64 = 1_000_000;
    const CHUNK: usize = 256;

    let (mut tx, mut rx) = RingBuffer::<u64, 4096>::new().split();
    let stats = Arc::new(StressStats::new());
    let start = Instant::now();

    let producer = {
        let stats = Arc::clone(&stats);
        thread::spawn(move || {
            for i in 0..COUNT {
                let mut v = i;
                while let Err(back) = tx.push(v) {
                    v = back;
                    stats.push_retries.fetch_add(1, Ordering::Relaxed);
                    thread::yield_now();
                }
                stats.pushed.fetch_add(1, Ordering::Relaxed);
            }
        })
    };

    let consumer = {
        let stats = Arc::clone(&stats);
        thread::spawn(move || {
            let mut out = [0u64; CHUNK];
            let mut expected = 0u64;
            while expected < COUNT {
                let n = rx.pop_bulk(&mut out);
                if n == 0 {
                    stats.pop_retries.fetch_add(1, Ordering::Relaxed);
                    thread::yield_now();
                    continue;
                }
                for &v in &out[..n] {
                    assert_eq!(v, expected, "FIFO order violated in bulk transfer");
                    expected += 1;
                }
                stats.popped.fetch_add(n as u64, Ordering::Relaxed);
            }
            expected
        })
    };

    producer.join().unwrap();
    let seen = consumer.join().unwrap();
    let duration = start.elapsed();

    stats.print_report("1M bulk consumer", duration);

    assert_eq!(seen, COUNT);
    assert_eq!(stats.popped.load(Ordering::Relaxed), COUNT);
}

#[test]
fn test_round_trip_bulk_both_sides() {
    const COUNT: u64 = 1_000_000;
    const CHUNK: usize = 128;

    let (mut tx, mut rx) = RingBuffer::<u64, 2048>::new().split();
    let start = Instant::now();

    let producer = thread::spawn(move || {
        let mut next = 0u64;
        let mut batch = [0u64; CHUNK];
        while next < COUNT {
            let want = CHUNK.min((COUNT - next) as usize);
            for (i, slot) in batch[..want].iter_mut().enumerate() {
                *slot = next + i as u64;
            }
            let mut offset = 0;
            while offset < want {
                let pushed = tx.push_bulk(&batch[offset..want]);
                if pushed == 0 {
                    thread::yield_now();
                }
                offset += pushed;
            }
            next += want as u64;
        }
    });

    let consumer = thread::spawn(move || {
        let mut out = [0u64; CHUNK];
        let mut expected = 0u64;
        while expected < COUNT {
            let n = rx.pop_bulk(&mut out);
            if n == 0 {
                thread::yield_now();
                continue;
            }
            for &v in &out[..n] {
                assert_eq!(v, expected, "FIFO order violated");
                expected += 1;
            }
        }
        expected
    });

    producer.join().unwrap();
    let seen = consumer.join().unwrap();
    let duration = start.elapsed();

    println!(
        "\n📊 bulk-both-sides: {} elems in {:.2}s ({:.2} M elems/sec)",
        seen,
        duration.as_secs_f64(),
        seen as f64 / duration.as_secs_f64() / 1_000_000.0
    );

    assert_eq!(seen, COUNT);
}
