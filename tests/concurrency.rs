use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
};
use std::thread;

use seqlock_config::prelude::*;

config_fields! {
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Triple {
        pub val1: u64,
        pub val2: u64,
        pub val3: u64,
    }
}

const WRITES: u64 = 200_000;
const READERS: usize = 4;

#[test]
fn readers_never_observe_torn_records() {
    let store: ConfigStore<Triple, 3> = ConfigStore::new(Triple {
        val1: 0,
        val2: 0,
        val3: 0,
    });
    let stop = AtomicBool::new(false);
    let torn = AtomicUsize::new(0);
    let reads = AtomicUsize::new(0);

    thread::scope(|s| {
        for _ in 0..READERS {
            s.spawn(|| {
                let mut last_seen = 0;
                while !stop.load(Ordering::Relaxed) {
                    let current = store.get_all();
                    if current.val1 != current.val2 || current.val1 != current.val3 {
                        torn.fetch_add(1, Ordering::Relaxed);
                    }
                    // Published values only ever grow.
                    assert!(current.val1 >= last_seen);
                    last_seen = current.val1;
                    reads.fetch_add(1, Ordering::Relaxed);
                }
            });
        }

        s.spawn(|| {
            for i in 1..=WRITES {
                store.update_all(Triple {
                    val1: i,
                    val2: i,
                    val3: i,
                });
            }
            stop.store(true, Ordering::Relaxed);
        });
    });

    assert_eq!(torn.load(Ordering::Relaxed), 0);
    assert!(reads.load(Ordering::Relaxed) > 0);
    assert_eq!(store.get(Triple::VAL3), WRITES);
    assert_eq!(store.generation(), WRITES);
}

#[test]
fn concurrent_field_writers_are_serialized() {
    const PER_WRITER: u64 = 10_000;

    let store: ConfigStore<Triple, 3> = ConfigStore::new(Triple {
        val1: 0,
        val2: 0,
        val3: 0,
    });

    thread::scope(|s| {
        for _ in 0..3 {
            s.spawn(|| {
                for _ in 0..PER_WRITER {
                    store.modify(|t| t.val1 += 1);
                }
            });
        }
    });

    assert_eq!(store.get(Triple::VAL1), 3 * PER_WRITER);
    assert_eq!(store.generation(), 3 * PER_WRITER);
}

fn track(value: &u64, latest: &Arc<AtomicU64>) {
    latest.fetch_max(*value, Ordering::SeqCst);
}

#[test]
fn callbacks_run_on_writer_thread_under_contention() {
    let store: ConfigStore<Triple, 3> = ConfigStore::new(Triple {
        val1: 0,
        val2: 0,
        val3: 0,
    });
    let latest = Arc::new(AtomicU64::new(0));
    store.on_change(Triple::VAL2, track, latest.clone());

    thread::scope(|s| {
        s.spawn(|| {
            for i in 1..=1_000 {
                store.set(Triple::VAL2, i);
            }
        });
        s.spawn(|| {
            for _ in 0..1_000 {
                let _ = store.get(Triple::VAL2);
            }
        });
    });

    assert_eq!(latest.load(Ordering::SeqCst), 1_000);
}
