//! TOML-file settings store.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Settings, SettingsError, SettingsStore};

/// Settings persisted as a TOML document at a fixed path.
///
/// The file holds an API key, so it is written with mode 0600 on Unix.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SettingsError {
        SettingsError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Result<Settings, SettingsError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no settings file, using defaults");
                return Ok(Settings::default());
            }
            Err(e) => return Err(self.io_error(e)),
        };
        Ok(toml::from_str(&contents)?)
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }

        let contents = toml::to_string_pretty(settings)?;
        std::fs::write(&self.path, contents).map_err(|e| self.io_error(e))?;

        // Owner read/write only.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, perms).map_err(|e| self.io_error(e))?;
        }

        debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}
