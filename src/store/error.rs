/// Errors reported by fallible store operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// Another writer holds the write gate.
    Contended,
    /// `save()` called with no save hook installed.
    NoSaveHook,
    /// `load()` called with no load hook installed.
    NoLoadHook,
    /// The save hook reported failure.
    SaveFailed,
    /// The load hook produced no record.
    LoadFailed,
}

impl core::fmt::Display for StoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StoreError::Contended => write!(f, "write gate held by another writer"),
            StoreError::NoSaveHook => write!(f, "no save hook installed"),
            StoreError::NoLoadHook => write!(f, "no load hook installed"),
            StoreError::SaveFailed => write!(f, "save hook reported failure"),
            StoreError::LoadFailed => write!(f, "load hook produced no record"),
        }
    }
}

impl core::error::Error for StoreError {}
