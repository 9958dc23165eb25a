//! Iris - Lock-Free SPSC Ring Buffer
//!
//! Fixed-capacity queue untuk hand-off antara TEPAT SATU producer thread
//! dan TEPAT SATU consumer thread:
//! - Lock-Free: Atomic-only cursors, acquire/release pairing
//! - No-Allocation: Storage pre-allocated, hot path bebas alokasi
//! - Non-Blocking: Semua operasi langsung return, retry milik caller
//! - SPSC by Construction: pasangan handle unik dari `split()`
//!
//! # Example
//!
//! ```
//! use iris::core::RingBuffer;
//!
//! let (mut tx, mut rx) = RingBuffer::<u64, 1024>::new().split();
//!
//! assert!(tx.push(7).is_ok());
//! assert_eq!(rx.pop(), Some(7));
//! assert_eq!(rx.pop(), None);
//! ```

pub mod core;

pub use crate::core::{Consumer, Producer, RingBuffer};
