/// Hook that writes a record snapshot to durable storage.
///
/// Returns true on success.
pub type SaveFn<T> = fn(&T) -> bool;

/// Hook that reads a record from durable storage.
///
/// Returns `None` if nothing could be loaded; the live record is then left
/// untouched.
pub type LoadFn<T> = fn() -> Option<T>;
