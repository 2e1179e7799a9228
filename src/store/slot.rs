#![allow(unsafe_code)]

use core::{
    cell::UnsafeCell,
    mem::MaybeUninit,
    ptr,
    sync::atomic::{AtomicU64, Ordering, fence},
};

use crossbeam_utils::Backoff;

use crate::store::gate::GateGuard;

/// One copy of the record guarded by a generation counter.
///
/// The generation is even while the data is quiescent and odd while a
/// writer is copying a new record in.
pub(crate) struct RecordSlot<T> {
    generation: AtomicU64,
    data: UnsafeCell<T>,
}

// SAFETY: readers only copy `data` out through `try_read`, which discards any
// copy taken while the generation moved. Mutation requires a `GateGuard`, so
// at most one thread writes a slot at a time.
unsafe impl<T: Copy + Send> Sync for RecordSlot<T> {}

impl<T: Copy> RecordSlot<T> {
    pub(crate) const fn new(record: T) -> Self {
        Self {
            generation: AtomicU64::new(0),
            data: UnsafeCell::new(record),
        }
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Single read attempt.
    ///
    /// Returns `None` if a writer was active on this slot before or during
    /// the copy.
    pub(crate) fn try_read(&self) -> Option<T> {
        let start = self.generation.load(Ordering::Acquire);
        if start & 1 != 0 {
            return None;
        }

        // SAFETY: the pointer is valid for the slot's lifetime. The copy may be
        // torn by a concurrent writer, so it stays uninitialised until the
        // generation check below proves no write overlapped it.
        let copy = unsafe { ptr::read_volatile(self.data.get() as *const MaybeUninit<T>) };

        fence(Ordering::Acquire);
        let end = self.generation.load(Ordering::Acquire);

        if start == end {
            // SAFETY: generation unchanged and even, so no write overlapped the copy.
            Some(unsafe { copy.assume_init() })
        } else {
            None
        }
    }

    /// Reads until a consistent copy is obtained.
    pub(crate) fn read(&self) -> T {
        let backoff = Backoff::new();
        loop {
            if let Some(record) = self.try_read() {
                return record;
            }
            backoff.spin();
        }
    }

    /// Copies `record` into the slot, bracketed by two generation increments.
    ///
    /// The caller must not pass a slot that is currently published to readers;
    /// readers would still reject the torn copy, but retry needlessly.
    pub(crate) fn write(&self, _gate: &GateGuard<'_>, record: T) {
        let start = self.generation.fetch_add(1, Ordering::Relaxed);
        debug_assert!(start & 1 == 0, "slot already mid-write");
        fence(Ordering::Release);

        // SAFETY: the gate guard proves this is the only writer, and readers
        // never form references into `data`.
        unsafe { ptr::write_volatile(self.data.get(), record) };

        self.generation.fetch_add(1, Ordering::Release);
    }

    /// Overwrites the slot and zeroes its generation.
    pub(crate) fn reset(&mut self, record: T) {
        *self.data.get_mut() = record;
        *self.generation.get_mut() = 0;
    }
}
