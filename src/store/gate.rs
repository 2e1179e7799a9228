use core::sync::atomic::{AtomicBool, Ordering};

use crossbeam_utils::Backoff;

/// Test-and-set lock that serializes writers.
///
/// Readers never touch the gate.
pub(crate) struct WriteGate {
    locked: AtomicBool,
}

impl WriteGate {
    pub(crate) const fn new() -> Self {
        Self {
            locked: AtomicBool::new(false),
        }
    }

    /// Spins until the gate is acquired.
    pub(crate) fn lock(&self) -> GateGuard<'_> {
        let backoff = Backoff::new();
        loop {
            if let Some(guard) = self.try_lock() {
                return guard;
            }
            while self.locked.load(Ordering::Relaxed) {
                backoff.snooze();
            }
        }
    }

    /// Acquires the gate only if it is free right now.
    pub(crate) fn try_lock(&self) -> Option<GateGuard<'_>> {
        if self.locked.swap(true, Ordering::Acquire) {
            None
        } else {
            Some(GateGuard { gate: self })
        }
    }

    pub(crate) fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }
}

/// Proof of exclusive write access. Releases the gate on drop.
pub(crate) struct GateGuard<'a> {
    gate: &'a WriteGate,
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        self.gate.locked.store(false, Ordering::Release);
    }
}
