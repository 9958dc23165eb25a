//! Producer/Consumer Handle Pair
//!
//! Disiplin SPSC tidak bisa dicek dari dalam struktur, jadi kita
//! ekspresikan lewat type system: [`RingBuffer::split`] mengembalikan
//! TEPAT SATU [`Producer`] dan TEPAT SATU [`Consumer`]. Keduanya tidak
//! bisa di-clone, dan semua operasi mutasi butuh `&mut self` - producer
//! atau consumer kedua tidak bisa dibuat dari safe code.
//!
//! Kedua handle `Send` (untuk `T: Send`), masing-masing bisa pindah ke
//! thread-nya sendiri. Tidak ada operasi yang blocking: retry policy
//! (spin, yield, sleep) sepenuhnya urusan caller.

use std::sync::Arc;

use super::ring_buffer::RingBuffer;

/// Sisi tulis dari ring buffer - hanya ada satu per buffer
pub struct Producer<T, const N: usize> {
    rb: Arc<RingBuffer<T, N>>,
}

/// Sisi baca dari ring buffer - hanya ada satu per buffer
pub struct Consumer<T, const N: usize> {
    rb: Arc<RingBuffer<T, N>>,
}

impl<T, const N: usize> RingBuffer<T, N> {
    /// Split buffer menjadi pasangan handle producer/consumer
    ///
    /// Buffer di-share lewat `Arc` dan dibebaskan saat kedua handle drop.
    pub fn split(self) -> (Producer<T, N>, Consumer<T, N>) {
        let rb = Arc::new(self);
        (Producer { rb: Arc::clone(&rb) }, Consumer { rb })
    }
}

impl<T, const N: usize> Producer<T, N> {
    /// Enqueue satu value
    ///
    /// `Err(value)` jika buffer penuh - tidak ada yang hilang, caller
    /// bebas retry, drop, atau back off.
    #[inline(always)]
    pub fn push(&mut self, value: T) -> Result<(), T> {
        self.rb.push(value)
    }

    /// Enqueue dengan konstruksi in-place
    ///
    /// Closure baru dijalankan setelah cek ruang; jika penuh, closure
    /// dikembalikan tanpa dipanggil.
    #[inline(always)]
    pub fn push_with<F>(&mut self, f: F) -> Result<(), F>
    where
        F: FnOnce() -> T,
    {
        self.rb.push_with(f)
    }

    /// Bulk enqueue dari slice, satu publish head untuk seluruh batch
    ///
    /// Returns jumlah elemen yang diterima (prefix dari `values`).
    #[inline(always)]
    pub fn push_bulk(&mut self, values: &[T]) -> usize
    where
        T: Copy,
    {
        self.rb.push_bulk(values)
    }

    /// Cek apakah buffer penuh (snapshot best-effort)
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.rb.is_full()
    }

    /// Cek apakah buffer kosong (snapshot best-effort)
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.rb.is_empty()
    }

    /// Jumlah elemen saat ini (snapshot best-effort)
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.rb.len()
    }

    /// Kapasitas efektif (N - 1)
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.rb.capacity()
    }
}

impl<T, const N: usize> Consumer<T, N> {
    /// Dequeue satu value, `None` jika kosong
    #[inline(always)]
    pub fn pop(&mut self) -> Option<T> {
        self.rb.pop()
    }

    /// Dequeue lewat out-parameter
    ///
    /// `false` jika kosong, `out` tidak disentuh.
    #[inline(always)]
    pub fn pop_into(&mut self, out: &mut T) -> bool {
        self.rb.pop_into(out)
    }

    /// Lihat elemen paling depan tanpa mengkonsumsi
    ///
    /// Borrow `&self` menahan consumer: reference tidak bisa hidup
    /// melewati pop berikutnya.
    #[inline(always)]
    pub fn peek(&self) -> Option<&T> {
        self.rb.peek()
    }

    /// Bulk dequeue ke slice output, satu publish tail untuk seluruh batch
    ///
    /// Returns jumlah elemen yang ditransfer, urutan FIFO.
    #[inline(always)]
    pub fn pop_bulk(&mut self, out: &mut [T]) -> usize {
        self.rb.pop_bulk(out)
    }

    /// Drain buffer sampai kosong, semua elemen di-drop dengan benar
    pub fn clear(&mut self) {
        self.rb.clear();
    }

    /// Cek apakah buffer kosong (snapshot best-effort)
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.rb.is_empty()
    }

    /// Cek apakah buffer penuh (snapshot best-effort)
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.rb.is_full()
    }

    /// Jumlah elemen saat ini (snapshot best-effort)
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.rb.len()
    }

    /// Kapasitas efektif (N - 1)
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.rb.capacity()
    }
}
