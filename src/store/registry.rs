use alloc::boxed::Box;
use heapless::Vec;
use zerocopy::{Immutable, IntoBytes};

use crate::store::field::Field;

/// Compares one field's bytes between two records and fires its callback if
/// they differ. Returns whether the callback fired.
type Thunk<T> = Box<dyn Fn(&T, &T) -> bool + Send + Sync>;

struct Listener<T> {
    offset: usize,
    size: usize,
    /// `None` once unregistered; the slot is kept so the offset stays put.
    thunk: Option<Thunk<T>>,
}

/// Fixed-capacity table of per-field change listeners, keyed by field offset.
///
/// `N` is the maximum number of distinct fields that can ever be registered.
pub(crate) struct ListenerRegistry<T, const N: usize> {
    listeners: Vec<Listener<T>, N>,
}

impl<T: 'static, const N: usize> ListenerRegistry<T, N> {
    pub(crate) const fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Registers `callback` for `field`, replacing any existing listener on
    /// the same field.
    ///
    /// # Panics
    /// Panics if `field` is new and all `N` entries are taken.
    pub(crate) fn register<F, C>(&mut self, field: Field<T, F>, callback: fn(&F, &C), context: C)
    where
        F: IntoBytes + Immutable + 'static,
        C: Send + Sync + 'static,
    {
        let thunk: Thunk<T> = Box::new(move |old: &T, new: &T| {
            let value = field.get(new);
            if field.get(old).as_bytes() == value.as_bytes() {
                return false;
            }
            callback(value, &context);
            true
        });

        let offset = field.offset();
        if let Some(listener) = self.listeners.iter_mut().find(|l| l.offset == offset) {
            listener.size = field.size();
            listener.thunk = Some(thunk);
            return;
        }

        let listener = Listener {
            offset,
            size: field.size(),
            thunk: Some(thunk),
        };
        if self.listeners.push(listener).is_err() {
            panic!("listener registry full: capacity is {N}");
        }
    }

    /// Disables the listener at `offset`. Returns true if one was live.
    pub(crate) fn unregister(&mut self, offset: usize) -> bool {
        self.listeners
            .iter_mut()
            .find(|l| l.offset == offset)
            .is_some_and(|l| l.thunk.take().is_some())
    }

    pub(crate) fn is_registered(&self, offset: usize) -> bool {
        self.listeners
            .iter()
            .any(|l| l.offset == offset && l.thunk.is_some())
    }

    /// Number of table entries in use, including disabled ones.
    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Fires the listener for the field at `offset` if its value changed.
    pub(crate) fn notify_field(&self, offset: usize, old: &T, new: &T) {
        if let Some(listener) = self.listeners.iter().find(|l| l.offset == offset) {
            listener.fire(old, new);
        }
    }

    /// Fires every live listener whose field differs between `old` and `new`.
    pub(crate) fn notify_changes(&self, old: &T, new: &T) {
        for listener in self.listeners.iter() {
            listener.fire(old, new);
        }
    }
}

impl<T> Listener<T> {
    fn fire(&self, old: &T, new: &T) {
        let Some(thunk) = &self.thunk else {
            return;
        };
        if thunk(old, new) {
            log::trace!(
                "notified listener for field at offset {} ({} bytes)",
                self.offset,
                self.size
            );
        }
    }
}
