//! Named, append-or-overwrite storage shared by the identity and address
//! registries.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::addresses::AddressRegistry;
use crate::error::NetworkingError;
use crate::identities::IdentityRegistry;
use crate::options::OptionConverter;
use crate::settings::Settings;

/// Map from caller-chosen names to values.
///
/// Entries are never removed. Writes go through [`NamedStore::update`], which
/// inserts a default value on a miss. Reads go through [`NamedStore::read`],
/// which does the same only when `insert_on_read` is set; otherwise a miss is
/// answered from a default value without touching the map.
#[derive(Debug)]
pub(crate) struct NamedStore<T> {
    label: &'static str,
    insert_on_read: bool,
    entries: RwLock<HashMap<String, T>>,
}

impl<T: Clone + Default> NamedStore<T> {
    pub(crate) fn new(label: &'static str, insert_on_read: bool) -> Self {
        Self {
            label,
            insert_on_read,
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn read_lock(&self) -> RwLockReadGuard<'_, HashMap<String, T>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, HashMap<String, T>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts a default entry if `name` is absent.
    pub(crate) fn ensure(&self, name: &str) {
        let mut map = self.write_lock();
        if !map.contains_key(name) {
            debug!(registry = self.label, name = %name, "added entry");
            map.insert(name.to_string(), T::default());
        }
    }

    /// Copy of the entry, without inserting on a miss.
    pub(crate) fn get(&self, name: &str) -> Option<T> {
        self.read_lock().get(name).cloned()
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.read_lock().contains_key(name)
    }

    pub(crate) fn read<R>(&self, name: &str, f: impl FnOnce(&T) -> R) -> R {
        {
            let map = self.read_lock();
            if let Some(value) = map.get(name) {
                return f(value);
            }
        }

        if self.insert_on_read {
            let mut map = self.write_lock();
            debug!(registry = self.label, name = %name, "read created missing entry");
            let value = map.entry(name.to_string()).or_default();
            f(value)
        } else {
            f(&T::default())
        }
    }

    pub(crate) fn update<R>(&self, name: &str, f: impl FnOnce(&mut T) -> R) -> R {
        let mut map = self.write_lock();
        let value = map.entry(name.to_string()).or_default();
        f(value)
    }

    pub(crate) fn replace(&self, name: &str, value: T) {
        self.write_lock().insert(name.to_string(), value);
    }

    /// Maps every entry, in map order.
    pub(crate) fn snapshot<R>(&self, mut f: impl FnMut(&str, &T) -> R) -> Vec<R> {
        self.read_lock()
            .iter()
            .map(|(name, value)| f(name, value))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.read_lock().len()
    }
}

/// Cuts `text` so it fits a NUL-terminated buffer of `buffer_len` bytes.
pub(crate) fn truncate_to_buffer(mut text: String, buffer_len: usize) -> String {
    let max = buffer_len.saturating_sub(1);
    if text.len() > max {
        let mut cut = max;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
    }
    text
}

/// Both registries plus the settings they were built with.
///
/// Pass this to whatever needs to resolve names; there is no global instance.
#[derive(Debug)]
pub struct NetworkingRegistries {
    settings: Settings,
    pub identities: IdentityRegistry,
    pub addresses: AddressRegistry,
}

impl NetworkingRegistries {
    pub fn new(settings: Settings) -> Self {
        Self {
            identities: IdentityRegistry::new(&settings),
            addresses: AddressRegistry::new(&settings),
            settings,
        }
    }

    /// Builds registries from a settings file; a missing file means defaults.
    pub fn from_settings_file(path: &Path) -> Result<Self, NetworkingError> {
        let settings = Settings::load(path)?;
        Ok(Self::new(settings))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Option converter bounded by these settings.
    pub fn option_converter(&self) -> OptionConverter {
        OptionConverter::new(&self.settings)
    }

    /// Copies the named address into the named identity.
    ///
    /// Returns `false` without touching the identity when the address name
    /// was never stored.
    pub fn set_identity_ip_addr(&self, identity_name: &str, address_name: &str) -> bool {
        self.identities
            .set_ip_addr(identity_name, &self.addresses, address_name)
    }
}

impl Default for NetworkingRegistries {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
