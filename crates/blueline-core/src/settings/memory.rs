use std::sync::{Mutex, PoisonError};

use super::{Settings, SettingsError, SettingsStore};

/// Settings kept in process memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    inner: Mutex<Settings>,
}

impl MemorySettingsStore {
    pub fn new(initial: Settings) -> Self {
        Self {
            inner: Mutex::new(initial),
        }
    }

    /// Copy of what was last saved.
    pub fn snapshot(&self) -> Settings {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Settings, SettingsError> {
        Ok(self.snapshot())
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = settings.clone();
        Ok(())
    }
}
