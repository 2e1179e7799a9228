//! Test support utilities - only compiled in test builds.

use core::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use alloc::sync::Arc;

use crate::store::storage::ConfigStore;

crate::config_fields! {
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct TestConfig {
        pub a: u32,
        pub b: i32,
        pub c: bool,
        pub name: [u8; 8],
    }
}

pub const TEST_DEFAULTS: TestConfig = TestConfig {
    a: 10,
    b: -20,
    c: false,
    name: *b"default\0",
};

/// Standard test configuration: room for every `TestConfig` field.
pub type TestStore = ConfigStore<TestConfig, 4>;

/// Helper to create a default test store
pub fn test_store() -> TestStore {
    ConfigStore::new(TEST_DEFAULTS)
}

/// Callback context counting invocations and keeping the last value seen.
#[derive(Debug, Default)]
pub struct Recorder {
    hits: AtomicUsize,
    last: AtomicI64,
}

impl Recorder {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last(&self) -> i64 {
        self.last.load(Ordering::SeqCst)
    }

    fn record(&self, value: i64) {
        self.last.store(value, Ordering::SeqCst);
        self.hits.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn record_u32(value: &u32, recorder: &Arc<Recorder>) {
    recorder.record(i64::from(*value));
}

pub fn record_i32(value: &i32, recorder: &Arc<Recorder>) {
    recorder.record(i64::from(*value));
}

pub fn record_bool(value: &bool, recorder: &Arc<Recorder>) {
    recorder.record(i64::from(*value));
}
