use crate::store::{
    persist::{LoadFn, SaveFn},
    storage::ConfigStore,
};

/// Const-capable builder for [`ConfigStore`].
///
/// Every method is a `const fn`, so a process-wide store can be declared as a
/// `static` and is fully wired before first use:
///
/// ```
/// use seqlock_config::prelude::*;
///
/// config_fields! {
///     #[derive(Clone, Copy, PartialEq)]
///     pub struct Settings {
///         pub volume: i32,
///     }
/// }
///
/// fn persist(_settings: &Settings) -> bool {
///     true
/// }
///
/// static SETTINGS: ConfigStore<Settings, 4> =
///     ConfigStoreBuilder::new(Settings { volume: 50 })
///         .save_hook(persist)
///         .build();
///
/// SETTINGS.set(Settings::VOLUME, 80);
/// assert!(SETTINGS.save().is_ok());
/// ```
pub struct ConfigStoreBuilder<T, const N: usize = 16> {
    defaults: T,
    save_hook: Option<SaveFn<T>>,
    load_hook: Option<LoadFn<T>>,
}

impl<T: Copy + 'static, const N: usize> ConfigStoreBuilder<T, N> {
    /// Starts a builder whose store will hold `defaults`.
    pub const fn new(defaults: T) -> Self {
        Self {
            defaults,
            save_hook: None,
            load_hook: None,
        }
    }

    /// Sets the hook used by [`ConfigStore::save`].
    pub const fn save_hook(self, hook: SaveFn<T>) -> Self {
        Self {
            defaults: self.defaults,
            save_hook: Some(hook),
            load_hook: self.load_hook,
        }
    }

    /// Sets the hook used by [`ConfigStore::load`].
    pub const fn load_hook(self, hook: LoadFn<T>) -> Self {
        Self {
            defaults: self.defaults,
            save_hook: self.save_hook,
            load_hook: Some(hook),
        }
    }

    /// Builds the store with the configured defaults and hooks.
    pub const fn build(self) -> ConfigStore<T, N> {
        let mut store = ConfigStore::new(self.defaults);
        store.save_hook = self.save_hook;
        store.load_hook = self.load_hook;
        store
    }
}
