//! Core module: Lock-Free SPSC Ring Buffer
//!
//! Prinsip desain:
//! - Lock-Free: Hanya atomic operations, tidak ada Mutex/RwLock
//! - No-Allocation: Semua slot pre-allocated saat init
//! - SPSC by Construction: satu pasang handle dari split(), dijaga type system

mod handle;
mod ring_buffer;

pub use handle::{Consumer, Producer};
pub use ring_buffer::RingBuffer;
