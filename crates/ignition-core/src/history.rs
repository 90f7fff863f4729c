//! Lock-free envelope history ring.
//!
//! A fixed-capacity, single-producer/single-consumer trace of decimated
//! envelope values. The audio thread owns the [`HistoryWriter`]; any other
//! thread can hold a [`HistoryReader`] and take consistent copies of the most
//! recent entries without blocking the writer.
//!
//! # Publication protocol
//!
//! Each slot is an `AtomicU32` holding `f32` bits. The writer stores the slot
//! first and then publishes the new total write count with release ordering.
//! The reader loads the count, copies the window ending at that count, then
//! reloads the count. Entries the writer may have overwritten between the two
//! loads are dropped from the front of the copy, so a reader never returns a
//! torn window. The ring keeps one spare slot so the write in flight never
//! lands inside the readable window.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering, fence};

/// Number of entries readable from a history ring.
pub const HISTORY_CAPACITY: usize = 512;

/// Physical slot count: one spare so the write in progress never aliases a readable entry.
const SLOTS: usize = HISTORY_CAPACITY + 1;

/// Shared storage behind a [`HistoryWriter`] / [`HistoryReader`] pair.
///
/// Not constructed directly; use [`HistoryRing::split`].
#[derive(Debug)]
pub struct HistoryRing {
    slots: [AtomicU32; SLOTS],
    written: AtomicUsize,
}

impl HistoryRing {
    fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| AtomicU32::new(0)),
            written: AtomicUsize::new(0),
        }
    }

    /// Allocate a ring and return its single writer and a reader.
    ///
    /// Allocates; call at configuration time only.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ignition_core::HistoryRing;
    ///
    /// let (mut writer, reader) = HistoryRing::split();
    /// writer.push(0.25);
    /// writer.push(0.5);
    /// assert_eq!(reader.to_vec(), vec![0.25, 0.5]);
    /// ```
    #[must_use]
    pub fn split() -> (HistoryWriter, HistoryReader) {
        let ring = Arc::new(Self::new());
        (
            HistoryWriter {
                ring: Arc::clone(&ring),
            },
            HistoryReader { ring },
        )
    }
}

/// Producing half of a history ring. Owned by the audio thread.
///
/// Deliberately not `Clone`: there is exactly one writer per ring.
#[derive(Debug)]
pub struct HistoryWriter {
    ring: Arc<HistoryRing>,
}

impl HistoryWriter {
    /// Append a value, evicting the oldest entry once the ring is full.
    ///
    /// O(1), wait-free, never allocates.
    #[inline]
    pub fn push(&mut self, value: f32) {
        // Only this writer mutates `written`.
        let n = self.ring.written.load(Ordering::Relaxed);
        self.ring.slots[n % SLOTS].store(value.to_bits(), Ordering::Release);
        self.ring
            .written
            .store(n.wrapping_add(1), Ordering::Release);
    }

    /// A new reader attached to this writer's ring.
    #[must_use]
    pub fn reader(&self) -> HistoryReader {
        HistoryReader {
            ring: Arc::clone(&self.ring),
        }
    }
}

/// Consuming half of a history ring. Cheap to clone and `Send + Sync`.
#[derive(Debug, Clone)]
pub struct HistoryReader {
    ring: Arc<HistoryRing>,
}

impl HistoryReader {
    /// Number of entries currently readable (at most [`HISTORY_CAPACITY`]).
    #[must_use]
    pub fn len(&self) -> usize {
        self.ring
            .written
            .load(Ordering::Acquire)
            .min(HISTORY_CAPACITY)
    }

    /// True until the first value has been pushed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ring.written.load(Ordering::Acquire) == 0
    }

    /// Total number of values ever pushed.
    #[must_use]
    pub fn total_written(&self) -> usize {
        self.ring.written.load(Ordering::Acquire)
    }

    /// Most recently pushed value, if any.
    #[must_use]
    pub fn latest(&self) -> Option<f32> {
        let n = self.ring.written.load(Ordering::Acquire);
        if n == 0 {
            return None;
        }
        let bits = self.ring.slots[(n - 1) % SLOTS].load(Ordering::Acquire);
        Some(f32::from_bits(bits))
    }

    /// Copy the most recent entries, oldest first, into `out`.
    ///
    /// Copies at most `min(out.len(), HISTORY_CAPACITY)` entries and returns
    /// how many were written to the front of `out`. Never blocks or
    /// allocates, so it is also safe to call from a real-time thread.
    pub fn copy_into(&self, out: &mut [f32]) -> usize {
        let before = self.ring.written.load(Ordering::Acquire);
        let len = before.min(HISTORY_CAPACITY).min(out.len());
        let start = before - len;

        for (i, dst) in out[..len].iter_mut().enumerate() {
            let bits = self.ring.slots[(start + i) % SLOTS].load(Ordering::Relaxed);
            *dst = f32::from_bits(bits);
        }

        fence(Ordering::Acquire);
        let after = self.ring.written.load(Ordering::Relaxed);

        // Absolute indices <= after - SLOTS may have been overwritten mid-copy.
        let stale = (after + 1)
            .saturating_sub(SLOTS)
            .saturating_sub(start)
            .min(len);
        if stale > 0 {
            out.copy_within(stale..len, 0);
        }
        len - stale
    }

    /// Owned copy of the readable window, oldest first.
    ///
    /// Allocates; intended for the visualization side.
    #[must_use]
    pub fn to_vec(&self) -> Vec<f32> {
        let mut buf = alloc::vec![0.0; HISTORY_CAPACITY];
        let n = self.copy_into(&mut buf);
        buf.truncate(n);
        buf
    }
}
