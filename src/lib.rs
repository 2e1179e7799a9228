//! A `no_std` configuration store with wait-free reads and per-field change
//! callbacks.
//!
//! The store holds one fixed-layout record, supplied by the caller, and lets
//! any number of threads read consistent snapshots of it while occasional
//! writers replace the whole record or single fields.
//!
//! # Features
//!
//! - **Wait-free reads** - Readers never lock, block or allocate
//! - **No torn reads** - Every snapshot is a record some writer published in full
//! - **Per-field callbacks** - Fire only when a field's value actually changes
//! - **Typed field selectors** - Generated by [`config_fields!`], keyed by byte offset
//! - **Persistence hooks** - Caller-supplied save/load functions
//!
//! # Architecture
//!
//! The record is double-buffered. Each buffer carries a seqlock generation
//! counter that is odd while a writer is filling it:
//!
//! ```text
//!              active index
//!                   │
//!        ┌──────────┴──────────┐
//!        ▼                     ▼
//! ┌──────────────┐      ┌──────────────┐
//! │ slot 0       │      │ slot 1       │
//! │ gen: even    │      │ gen: odd     │◀── writer (holds the gate)
//! │ record       │      │ record       │
//! └──────────────┘      └──────────────┘
//!        ▲
//!   readers copy, then re-check gen
//! ```
//!
//! - **Writers** take the gate, copy the published record into the other slot,
//!   apply their change, publish that slot, release the gate, then notify
//!   listeners for the fields that changed
//! - **Readers** load the active index, copy the slot, and retry if the
//!   slot's generation was odd or moved during the copy
//!
//! # Example
//!
//! ```
//! use seqlock_config::prelude::*;
//!
//! config_fields! {
//!     #[derive(Debug, Clone, Copy, PartialEq)]
//!     pub struct Config {
//!         pub volume: i32,
//!         pub brightness: f32,
//!     }
//! }
//!
//! fn on_volume(volume: &i32, label: &&'static str) {
//!     let _ = (volume, label);
//! }
//!
//! let store: ConfigStore<Config> = ConfigStore::new(Config { volume: 50, brightness: 0.75 });
//! store.on_change(Config::VOLUME, on_volume, "speaker");
//!
//! store.set(Config::VOLUME, 80); // fires on_volume(&80, &"speaker")
//! assert_eq!(store.get(Config::VOLUME), 80);
//!
//! store.restore_all_defaults(); // fires on_volume(&50, &"speaker")
//! assert_eq!(store.get_all(), store.get_default());
//! ```

#![deny(unsafe_code)]
#![no_std]

extern crate alloc;

pub mod store;

pub mod prelude {
    pub use crate::store::prelude::*;
}

#[doc(hidden)]
pub use paste::paste as __paste;
