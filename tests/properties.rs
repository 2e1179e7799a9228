use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use proptest::prelude::*;
use seqlock_config::prelude::*;

config_fields! {
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Device {
        pub gain: u16,
        pub offset: i32,
        pub enabled: bool,
        pub label: [u8; 6],
    }
}

const DEFAULTS: Device = Device {
    gain: 100,
    offset: 0,
    enabled: true,
    label: *b"dev0\0\0",
};

#[derive(Debug, Clone)]
enum Op {
    Gain(u16),
    Offset(i32),
    Enabled(bool),
    Label(String),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u16>().prop_map(Op::Gain),
        any::<i32>().prop_map(Op::Offset),
        any::<bool>().prop_map(Op::Enabled),
        "[a-z]{0,8}".prop_map(Op::Label),
    ]
}

fn apply(store: &ConfigStore<Device, 4>, op: &Op) {
    match op {
        Op::Gain(v) => store.set(Device::GAIN, *v),
        Op::Offset(v) => store.set(Device::OFFSET, *v),
        Op::Enabled(v) => store.set(Device::ENABLED, *v),
        Op::Label(s) => store.set_str(Device::LABEL, s),
    }
}

fn count(_: &i32, hits: &Arc<AtomicUsize>) {
    hits.fetch_add(1, Ordering::SeqCst);
}

proptest! {
    #[test]
    fn set_then_get_round_trips(gain in any::<u16>(), offset in any::<i32>()) {
        let store: ConfigStore<Device, 4> = ConfigStore::new(DEFAULTS);
        store.set(Device::GAIN, gain);
        store.set(Device::OFFSET, offset);
        prop_assert_eq!(store.get(Device::GAIN), gain);
        prop_assert_eq!(store.get(Device::OFFSET), offset);
        prop_assert_eq!(store.get(Device::ENABLED), DEFAULTS.enabled);
    }

    #[test]
    fn restore_all_defaults_after_any_sets(ops in prop::collection::vec(op(), 0..32)) {
        let store: ConfigStore<Device, 4> = ConfigStore::new(DEFAULTS);
        for op in &ops {
            apply(&store, op);
        }
        store.restore_all_defaults();
        prop_assert_eq!(store.get_all(), DEFAULTS);
    }

    #[test]
    fn callback_count_matches_actual_changes(values in prop::collection::vec(-3i32..3, 0..32)) {
        let store: ConfigStore<Device, 4> = ConfigStore::new(DEFAULTS);
        let hits = Arc::new(AtomicUsize::new(0));
        store.on_change(Device::OFFSET, count, hits.clone());

        let mut expected = 0;
        let mut current = DEFAULTS.offset;
        for v in values {
            if v != current {
                expected += 1;
                current = v;
            }
            store.set(Device::OFFSET, v);
        }
        prop_assert_eq!(hits.load(Ordering::SeqCst), expected);
    }

    #[test]
    fn update_all_fires_per_changed_field(offset in any::<i32>(), gain in any::<u16>()) {
        let store: ConfigStore<Device, 4> = ConfigStore::new(DEFAULTS);
        let hits = Arc::new(AtomicUsize::new(0));
        store.on_change(Device::OFFSET, count, hits.clone());

        store.update_all(Device { gain, offset, ..DEFAULTS });

        let expected = usize::from(offset != DEFAULTS.offset);
        prop_assert_eq!(hits.load(Ordering::SeqCst), expected);
        prop_assert_eq!(store.get(Device::GAIN), gain);
    }
}
