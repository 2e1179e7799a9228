use core::{
    cell::RefCell,
    sync::atomic::{AtomicUsize, Ordering},
};

use critical_section::Mutex;
use crossbeam_utils::{Backoff, CachePadded};
use zerocopy::{Immutable, IntoBytes};

use crate::store::{
    StoreError,
    field::Field,
    gate::{GateGuard, WriteGate},
    persist::{LoadFn, SaveFn},
    registry::ListenerRegistry,
    slot::RecordSlot,
};

/// Double-buffered configuration store.
///
/// Readers copy the record out of whichever slot is currently published and
/// retry if a writer touched that slot during the copy. They never block
/// and never allocate. Writers are serialized by a spin gate, fill the
/// unpublished slot, publish it, and then notify change listeners on their
/// own thread.
///
/// # Type Parameters
/// - `T`: the record; any `Copy` type with a fixed layout
/// - `N`: maximum number of fields that may carry a change listener
///
/// # Reentrancy
/// Listener callbacks run inside a critical section after the write is
/// published. They must not write to the store or (un)register listeners.
///
/// Change detection compares the field's bytes, so a NaN rewritten with the
/// same bits stays silent while `-0.0` to `0.0` fires.
pub struct ConfigStore<T, const N: usize = 16> {
    slots: [CachePadded<RecordSlot<T>>; 2],
    active: CachePadded<AtomicUsize>,
    gate: WriteGate,
    defaults: T,
    listeners: Mutex<RefCell<ListenerRegistry<T, N>>>,
    pub(crate) save_hook: Option<SaveFn<T>>,
    pub(crate) load_hook: Option<LoadFn<T>>,
}

impl<T: Copy + 'static, const N: usize> ConfigStore<T, N> {
    /// Creates a store whose live record and baseline are both `defaults`.
    pub const fn new(defaults: T) -> Self {
        Self {
            slots: [
                CachePadded::new(RecordSlot::new(defaults)),
                CachePadded::new(RecordSlot::new(defaults)),
            ],
            active: CachePadded::new(AtomicUsize::new(0)),
            gate: WriteGate::new(),
            defaults,
            listeners: Mutex::new(RefCell::new(ListenerRegistry::new())),
            save_hook: None,
            load_hook: None,
        }
    }

    /// Replaces the baseline and resets the live record to it.
    ///
    /// Both slots become identical and quiescent. No listeners fire.
    pub fn set_default(&mut self, defaults: T) {
        self.defaults = defaults;
        for slot in self.slots.iter_mut() {
            slot.reset(defaults);
        }
        *self.active.get_mut() = 0;
        log::debug!("config store reset to new defaults");
    }

    /// Returns the baseline passed to [`Self::new`] or [`Self::set_default`].
    pub fn get_default(&self) -> T {
        self.defaults
    }

    /// Returns a consistent snapshot of the whole record.
    ///
    /// Retries while writers race the copy; never blocks.
    pub fn get_all(&self) -> T {
        let backoff = Backoff::new();
        loop {
            if let Some(record) = self.try_get_all() {
                return record;
            }
            backoff.spin();
        }
    }

    /// Single snapshot attempt. Returns `None` if a write raced the copy.
    pub fn try_get_all(&self) -> Option<T> {
        let idx = self.active.load(Ordering::Acquire);
        self.slots[idx].try_read()
    }

    /// Returns one field of a consistent snapshot.
    pub fn get<F: Copy>(&self, field: Field<T, F>) -> F {
        *field.get(&self.get_all())
    }

    /// Sets one field, firing its listener if the field's bytes changed.
    pub fn set<F>(&self, field: Field<T, F>, value: F)
    where
        F: IntoBytes + Immutable + Copy,
    {
        let guard = self.gate.lock();
        self.commit_field(guard, field, value);
    }

    /// Like [`Self::set`], but fails instead of spinning if another writer
    /// holds the gate.
    pub fn try_set<F>(&self, field: Field<T, F>, value: F) -> Result<(), StoreError>
    where
        F: IntoBytes + Immutable + Copy,
    {
        let guard = self.gate.try_lock().ok_or(StoreError::Contended)?;
        self.commit_field(guard, field, value);
        Ok(())
    }

    /// Stores `value` in a byte-array field as a NUL-terminated string.
    ///
    /// Copying stops at the first `'\0'` in `value` or after `L - 1` bytes;
    /// the rest of the array is zeroed.
    pub fn set_str<const L: usize>(&self, field: Field<T, [u8; L]>, value: &str) {
        let bytes = value.as_bytes();
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        let len = end.min(L.saturating_sub(1));
        let mut buf = [0u8; L];
        buf[..len].copy_from_slice(&bytes[..len]);
        self.set(field, buf);
    }

    /// Replaces the whole record, firing listeners for every changed field.
    pub fn update_all(&self, record: T) {
        let guard = self.gate.lock();
        self.commit_all(guard, |live| *live = record);
    }

    /// Like [`Self::update_all`], but fails instead of spinning if another
    /// writer holds the gate.
    pub fn try_update_all(&self, record: T) -> Result<(), StoreError> {
        let guard = self.gate.try_lock().ok_or(StoreError::Contended)?;
        self.commit_all(guard, |live| *live = record);
        Ok(())
    }

    /// Read-modify-write of the whole record under the write gate.
    ///
    /// `f` must not touch the store.
    pub fn modify(&self, f: impl FnOnce(&mut T)) {
        let guard = self.gate.lock();
        self.commit_all(guard, f);
    }

    /// Sets one field back to its baseline value.
    pub fn restore_default<F>(&self, field: Field<T, F>)
    where
        F: IntoBytes + Immutable + Copy,
    {
        self.set(field, *field.get(&self.defaults));
    }

    /// Sets the whole record back to the baseline.
    pub fn restore_all_defaults(&self) {
        self.update_all(self.defaults);
    }

    /// Registers `callback` to run with the new value whenever `field`
    /// changes. Replaces any callback already registered for `field`.
    ///
    /// The callback runs on the writer's thread inside
    /// [`critical_section::with`]. With the `std` implementation that is one
    /// process-wide lock shared by every store; on bare metal interrupts stay
    /// masked for the duration. Callbacks must be short and must not block.
    ///
    /// # Panics
    /// Panics if `field` is new and `N` fields already have listeners.
    pub fn on_change<F, C>(&self, field: Field<T, F>, callback: fn(&F, &C), context: C) -> &Self
    where
        F: IntoBytes + Immutable + 'static,
        C: Send + Sync + 'static,
    {
        critical_section::with(|cs| {
            self.listeners
                .borrow_ref_mut(cs)
                .register(field, callback, context)
        });
        log::debug!("registered listener for field at offset {}", field.offset());
        self
    }

    /// Disables the listener on `field`. Returns true if one was active.
    pub fn remove_callback<F>(&self, field: Field<T, F>) -> bool {
        let removed =
            critical_section::with(|cs| self.listeners.borrow_ref_mut(cs).unregister(field.offset()));
        if removed {
            log::debug!("removed listener for field at offset {}", field.offset());
        }
        removed
    }

    /// Returns true if `field` has an active listener.
    pub fn has_callback<F>(&self, field: Field<T, F>) -> bool {
        critical_section::with(|cs| self.listeners.borrow_ref(cs).is_registered(field.offset()))
    }

    /// Number of registry entries in use, disabled ones included. Never
    /// exceeds `N`.
    pub fn listener_count(&self) -> usize {
        critical_section::with(|cs| self.listeners.borrow_ref(cs).len())
    }

    /// Installs the hook used by [`Self::save`].
    pub fn set_save_hook(&mut self, hook: SaveFn<T>) {
        self.save_hook = Some(hook);
    }

    /// Installs the hook used by [`Self::load`].
    pub fn set_load_hook(&mut self, hook: LoadFn<T>) {
        self.load_hook = Some(hook);
    }

    /// Passes a consistent snapshot to the save hook.
    pub fn save(&self) -> Result<(), StoreError> {
        let Some(hook) = self.save_hook else {
            log::warn!("save requested but no save hook is installed");
            return Err(StoreError::NoSaveHook);
        };
        if hook(&self.get_all()) {
            Ok(())
        } else {
            log::warn!("save hook reported failure");
            Err(StoreError::SaveFailed)
        }
    }

    /// Runs the load hook and applies its record through [`Self::update_all`].
    ///
    /// On any failure the live record is left untouched.
    pub fn load(&self) -> Result<(), StoreError> {
        let Some(hook) = self.load_hook else {
            log::warn!("load requested but no load hook is installed");
            return Err(StoreError::NoLoadHook);
        };
        let Some(record) = hook() else {
            log::warn!("load hook produced no record");
            return Err(StoreError::LoadFailed);
        };
        self.update_all(record);
        Ok(())
    }

    /// Number of writes published since construction or the last
    /// [`Self::set_default`].
    pub fn generation(&self) -> u64 {
        (self.slots[0].generation() + self.slots[1].generation()) / 2
    }

    /// Copies the published record into the other slot, applies `mutate`
    /// there, and publishes it. Returns `(old, new)`.
    fn publish(&self, guard: &GateGuard<'_>, mutate: impl FnOnce(&mut T)) -> (T, T) {
        let active = self.active.load(Ordering::Relaxed);
        let inactive = active ^ 1;

        let old = self.slots[active].read();
        let mut new = old;
        mutate(&mut new);

        self.slots[inactive].write(guard, new);
        self.active.store(inactive, Ordering::Release);

        (old, new)
    }

    fn commit_field<F>(&self, guard: GateGuard<'_>, field: Field<T, F>, value: F)
    where
        F: IntoBytes + Immutable + Copy,
    {
        let (old, new) = self.publish(&guard, |record| *field.get_mut(record) = value);
        drop(guard);

        if field.get(&old).as_bytes() != field.get(&new).as_bytes() {
            critical_section::with(|cs| {
                self.listeners
                    .borrow_ref(cs)
                    .notify_field(field.offset(), &old, &new)
            });
        }
    }

    fn commit_all(&self, guard: GateGuard<'_>, mutate: impl FnOnce(&mut T)) {
        let (old, new) = self.publish(&guard, mutate);
        drop(guard);

        critical_section::with(|cs| self.listeners.borrow_ref(cs).notify_changes(&old, &new));
    }
}

impl<T, const N: usize> core::fmt::Debug for ConfigStore<T, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("active", &self.active.load(Ordering::Relaxed))
            .field("writing", &self.gate.is_locked())
            .field("capacity", &N)
            .finish_non_exhaustive()
    }
}
