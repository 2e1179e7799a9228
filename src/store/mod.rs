pub mod builder;
pub mod error;
pub mod field;
pub(crate) mod gate;
pub mod persist;
pub(crate) mod registry;
pub(crate) mod slot;
pub mod storage;

#[cfg(test)]
mod test_support;

pub use builder::ConfigStoreBuilder;
pub use error::StoreError;
pub use field::Field;
pub use persist::{LoadFn, SaveFn};
pub use storage::ConfigStore;

pub mod prelude {
    pub use super::{ConfigStore, ConfigStoreBuilder, Field, LoadFn, SaveFn, StoreError};
    pub use crate::config_fields;
}
