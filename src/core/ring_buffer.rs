//! Lock-Free Single-Producer Single-Consumer (SPSC) Ring Buffer
//!
//! Implementasi menggunakan Lamport Queue dengan memory ordering yang tepat.
//! Tidak ada Mutex, tidak ada alokasi setelah inisialisasi.
//!
//! Satu slot direservasi sebagai pembeda full/empty, jadi kapasitas
//! efektif adalah N - 1 elemen.

use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Slot dalam ring buffer - storage mentah untuk satu elemen
///
/// Slot dalam keadaan uninitialized kecuali berada di range `tail..head`.
#[repr(C, align(64))] // Cache line alignment untuk menghindari false sharing
struct Slot<T> {
    data: UnsafeCell<MaybeUninit<T>>,
}

impl<T> Slot<T> {
    const fn new() -> Self {
        Self {
            data: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }
}

/// Lock-Free SPSC Ring Buffer
///
/// Menggunakan separate cache lines untuk head dan tail
/// untuk menghindari false sharing antara producer dan consumer.
///
/// `head` hanya ditulis oleh producer, `tail` hanya ditulis oleh consumer.
/// Jumlah elemen = `head - tail` (wrapping arithmetic, selalu di `[0, N-1]`).
///
/// Operasi mutasi sengaja `pub(crate)`: API publik adalah pasangan handle
/// dari [`split`](RingBuffer::split), supaya producer/consumer kedua tidak
/// bisa dibuat dari safe code.
#[repr(C)]
pub struct RingBuffer<T, const N: usize> {
    // Producer side - cache line aligned
    head: CacheLinePadded<AtomicUsize>,
    // Consumer side - cache line aligned
    tail: CacheLinePadded<AtomicUsize>,
    // Pre-allocated buffer di heap - tidak ada alokasi setelah init
    buffer: Box<[Slot<T>]>,
    // Mask untuk operasi modulo yang cepat (N harus power of 2)
    mask: usize,
}

/// Padding untuk cache line isolation (64 bytes pada x86-64)
#[repr(C, align(64))]
struct CacheLinePadded<T> {
    value: T,
}

impl<T> CacheLinePadded<T> {
    const fn new(value: T) -> Self {
        Self { value }
    }
}

// SAFETY: RingBuffer aman untuk Send/Sync karena:
// - Hanya satu producer (menulis head) - dijamin oleh handle split
// - Hanya satu consumer (menulis tail) - dijamin oleh handle split
// - Atomic operations menjamin visibility
unsafe impl<T: Send, const N: usize> Send for RingBuffer<T, N> {}
unsafe impl<T: Send, const N: usize> Sync for RingBuffer<T, N> {}

impl<T, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> RingBuffer<T, N> {
    /// Membuat ring buffer baru. N HARUS power of 2 dan >= 2.
    ///
    /// Alokasi hanya terjadi sekali saat inisialisasi.
    /// Setelah itu, tidak ada alokasi di hot path.
    ///
    /// # Panics
    /// Panic jika N bukan power of 2 atau N < 2
    pub fn new() -> Self {
        assert!(N >= 2 && N.is_power_of_two(), "N must be power of 2, >= 2");

        // Alokasi buffer di heap untuk menghindari stack overflow
        let mut buffer = Vec::with_capacity(N);
        for _ in 0..N {
            buffer.push(Slot::new());
        }

        Self {
            head: CacheLinePadded::new(AtomicUsize::new(0)),
            tail: CacheLinePadded::new(AtomicUsize::new(0)),
            buffer: buffer.into_boxed_slice(),
            mask: N - 1,
        }
    }

    /// Push value ke buffer (Producer side)
    ///
    /// Returns `Ok(())` jika berhasil. Jika buffer penuh, value dikembalikan
    /// lewat `Err` - tidak ada yang di-drop, tidak ada yang ditulis.
    /// Zero-allocation, lock-free.
    #[inline(always)]
    pub(crate) fn push(&self, value: T) -> Result<(), T> {
        let head = self.head.value.load(Ordering::Relaxed);
        let tail = self.tail.value.load(Ordering::Acquire);

        // Cek ruang SEBELUM menulis slot (satu slot direservasi)
        if head.wrapping_sub(tail) >= N - 1 {
            return Err(value);
        }

        let slot = &self.buffer[head & self.mask];

        // SAFETY: slot di luar range tail..head, tidak sedang dibaca consumer
        unsafe {
            (*slot.data.get()).write(value);
        }

        // Release: pastikan write di atas visible sebelum head di-update
        self.head
            .value
            .store(head.wrapping_add(1), Ordering::Release);

        Ok(())
    }

    /// Emplace: konstruksi elemen langsung di slot (Producer side)
    ///
    /// Closure hanya dipanggil SETELAH cek ruang berhasil, jadi tidak ada
    /// konstruksi yang sia-sia saat buffer penuh - closure dikembalikan
    /// lewat `Err` tanpa dijalankan.
    #[inline(always)]
    pub(crate) fn push_with<F>(&self, f: F) -> Result<(), F>
    where
        F: FnOnce() -> T,
    {
        let head = self.head.value.load(Ordering::Relaxed);
        let tail = self.tail.value.load(Ordering::Acquire);

        if head.wrapping_sub(tail) >= N - 1 {
            return Err(f);
        }

        let slot = &self.buffer[head & self.mask];

        // SAFETY: slot di luar range tail..head, tidak sedang dibaca consumer
        unsafe {
            (*slot.data.get()).write(f());
        }

        self.head
            .value
            .store(head.wrapping_add(1), Ordering::Release);

        Ok(())
    }

    /// Bulk push dari slice (Producer side)
    ///
    /// Copy `min(ruang_kosong, values.len())` elemen dalam urutan slice,
    /// lalu publish head SEKALI dengan satu release store. Wraparound
    /// ditangani dengan dua segment copy (sampai ujung array fisik, lalu
    /// lanjut dari index 0).
    ///
    /// Returns jumlah elemen yang diterima (0 jika penuh).
    pub(crate) fn push_bulk(&self, values: &[T]) -> usize
    where
        T: Copy,
    {
        let head = self.head.value.load(Ordering::Relaxed);
        let tail = self.tail.value.load(Ordering::Acquire);

        let free = (N - 1) - head.wrapping_sub(tail);
        let to_push = free.min(values.len());
        if to_push == 0 {
            return 0;
        }

        let idx = head & self.mask;
        let first = (N - idx).min(to_push);

        for i in 0..first {
            let slot = &self.buffer[idx + i];
            // SAFETY: slot kosong, belum visible ke consumer sebelum publish
            unsafe {
                (*slot.data.get()).write(values[i]);
            }
        }
        for i in 0..(to_push - first) {
            let slot = &self.buffer[i];
            // SAFETY: idem, segment kedua setelah wraparound
            unsafe {
                (*slot.data.get()).write(values[first + i]);
            }
        }

        // Satu publish untuk seluruh batch - ini inti optimasi bulk
        self.head
            .value
            .store(head.wrapping_add(to_push), Ordering::Release);

        to_push
    }

    /// Pop value dari buffer (Consumer side)
    ///
    /// Returns `Some(T)` jika ada data, `None` jika buffer kosong.
    /// Slot kembali ke keadaan uninitialized.
    #[inline(always)]
    pub(crate) fn pop(&self) -> Option<T> {
        let tail = self.tail.value.load(Ordering::Relaxed);
        let head = self.head.value.load(Ordering::Acquire);

        // Cek apakah buffer kosong
        if tail == head {
            return None;
        }

        let slot = &self.buffer[tail & self.mask];

        // SAFETY: slot di range tail..head, sudah ditulis dan di-publish
        let value = unsafe { (*slot.data.get()).assume_init_read() };

        // Release: pastikan read di atas selesai sebelum tail di-update
        self.tail
            .value
            .store(tail.wrapping_add(1), Ordering::Release);

        Some(value)
    }

    /// Pop lewat out-parameter (Consumer side)
    ///
    /// Returns `true` dan menulis value ke `out` jika ada data.
    /// Jika kosong returns `false` dan `out` tidak disentuh.
    #[inline(always)]
    pub(crate) fn pop_into(&self, out: &mut T) -> bool {
        match self.pop() {
            Some(value) => {
                *out = value;
                true
            }
            None => false,
        }
    }

    /// Lihat elemen paling depan tanpa mengkonsumsi (Consumer side)
    ///
    /// Tidak ada destroy, tidak ada update tail. Aman karena producer
    /// tidak pernah menulis ulang slot yang masih occupied.
    #[inline(always)]
    pub(crate) fn peek(&self) -> Option<&T> {
        let tail = self.tail.value.load(Ordering::Relaxed);
        let head = self.head.value.load(Ordering::Acquire);

        if tail == head {
            return None;
        }

        let slot = &self.buffer[tail & self.mask];

        // SAFETY: slot di range tail..head, sudah ditulis dan di-publish;
        // reference hanya hidup selama borrow &self
        Some(unsafe { (*slot.data.get()).assume_init_ref() })
    }

    /// Bulk pop ke slice output (Consumer side)
    ///
    /// Snapshot konsisten sekali (tail relaxed, head acquire), transfer
    /// `min(available, out.len())` elemen dalam urutan FIFO, lalu publish
    /// tail SEKALI di akhir. Wraparound ditangani dengan dua segment.
    ///
    /// Returns jumlah elemen yang ditransfer.
    pub(crate) fn pop_bulk(&self, out: &mut [T]) -> usize {
        let tail = self.tail.value.load(Ordering::Relaxed);
        let head = self.head.value.load(Ordering::Acquire);

        let available = head.wrapping_sub(tail);
        let to_pop = available.min(out.len());
        if to_pop == 0 {
            return 0;
        }

        let idx = tail & self.mask;
        let first = (N - idx).min(to_pop);

        for i in 0..first {
            let slot = &self.buffer[idx + i];
            // SAFETY: slot di range tail..head; setelah read slot dianggap
            // uninitialized lagi
            out[i] = unsafe { (*slot.data.get()).assume_init_read() };
        }
        for i in 0..(to_pop - first) {
            let slot = &self.buffer[i];
            // SAFETY: idem, segment kedua setelah wraparound
            out[first + i] = unsafe { (*slot.data.get()).assume_init_read() };
        }

        // Satu publish untuk seluruh batch
        self.tail
            .value
            .store(tail.wrapping_add(to_pop), Ordering::Release);

        to_pop
    }

    /// Drain buffer sampai kosong (Consumer side)
    ///
    /// Setiap elemen di-pop lewat jalur biasa, jadi semua Drop berjalan.
    pub(crate) fn clear(&self) {
        while self.pop().is_some() {}
    }

    /// Cek apakah buffer kosong
    ///
    /// Snapshot best-effort: bisa langsung basi kalau sisi lain sedang
    /// aktif. Hint, bukan garansi.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        let tail = self.tail.value.load(Ordering::Acquire);
        let head = self.head.value.load(Ordering::Acquire);
        tail == head
    }

    /// Cek apakah buffer penuh (N - 1 elemen)
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        let head = self.head.value.load(Ordering::Acquire);
        let tail = self.tail.value.load(Ordering::Acquire);
        head.wrapping_sub(tail) >= N - 1
    }

    /// Jumlah elemen dalam buffer (snapshot best-effort)
    #[inline(always)]
    pub fn len(&self) -> usize {
        let head = self.head.value.load(Ordering::Acquire);
        let tail = self.tail.value.load(Ordering::Acquire);
        head.wrapping_sub(tail)
    }

    /// Kapasitas efektif: N - 1 (satu slot reserved untuk full/empty)
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        N - 1
    }
}

impl<T, const N: usize> Drop for RingBuffer<T, N> {
    fn drop(&mut self) {
        // Lepas semua elemen yang belum dikonsumsi
        if std::mem::needs_drop::<T>() {
            self.clear();
        }
    }
}
