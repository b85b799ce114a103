//! Configuration for the blueline CLI.
//!
//! Settings (API key, recent searches) live in a TOML file at
//! `~/.config/blueline/settings.toml`. Runtime knobs resolve through the
//! chain: CLI flag > env var > settings file > default.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use blueline_core::analysis::MockAnalyzer;
use blueline_core::lookup::MockLookup;
use blueline_core::session::{Session, SessionOptions};
use blueline_core::settings::{FileSettingsStore, SettingsStore};

pub const API_KEY_ENV: &str = "BLUELINE_API_KEY";
pub const LOOKUP_LATENCY_ENV: &str = "BLUELINE_LOOKUP_LATENCY_MS";
pub const ANALYSIS_LATENCY_ENV: &str = "BLUELINE_ANALYSIS_LATENCY_MS";
pub const REQUEST_TIMEOUT_ENV: &str = "BLUELINE_REQUEST_TIMEOUT_SECS";

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the blueline config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/blueline` or
/// `~/.config/blueline`, also on macOS.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("blueline");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("blueline")
}

/// Return the path to the settings file.
pub fn settings_path() -> PathBuf {
    config_dir().join("settings.toml")
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub settings_path: PathBuf,
    /// Credential from the CLI flag or env var. `None` means "use whatever
    /// the settings file holds".
    pub api_key_override: Option<String>,
    pub lookup_latency: Duration,
    pub analysis_latency: Duration,
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Resolve configuration using the chain: CLI flag > env var > settings
    /// file > default.
    ///
    /// - API key: `cli_api_key` > `BLUELINE_API_KEY` > settings file
    /// - Latencies: `BLUELINE_LOOKUP_LATENCY_MS`, `BLUELINE_ANALYSIS_LATENCY_MS`
    /// - Timeout: `BLUELINE_REQUEST_TIMEOUT_SECS`
    pub fn resolve(cli_api_key: Option<&str>) -> Result<Self> {
        let api_key_override = cli_api_key
            .map(str::to_owned)
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .map(|k| k.trim().to_owned())
            .filter(|k| !k.is_empty());

        let lookup_latency = env_u64(LOOKUP_LATENCY_ENV)?
            .map(Duration::from_millis)
            .unwrap_or(MockLookup::DEFAULT_LATENCY);
        let analysis_latency = env_u64(ANALYSIS_LATENCY_ENV)?
            .map(Duration::from_millis)
            .unwrap_or(MockAnalyzer::DEFAULT_LATENCY);
        let request_timeout = env_u64(REQUEST_TIMEOUT_ENV)?
            .map(Duration::from_secs)
            .unwrap_or(SessionOptions::DEFAULT_REQUEST_TIMEOUT);

        Ok(Self {
            settings_path: settings_path(),
            api_key_override,
            lookup_latency,
            analysis_latency,
            request_timeout,
        })
    }

    pub fn settings_store(&self) -> FileSettingsStore {
        FileSettingsStore::new(&self.settings_path)
    }

    /// Open a session over the mock backends and the settings file.
    pub fn open_session(&self) -> Result<Session> {
        self.open_session_with(Box::new(self.settings_store()))
    }

    /// Open a session over the mock backends and an explicit store.
    pub fn open_session_with(&self, store: Box<dyn SettingsStore>) -> Result<Session> {
        let session = Session::open(
            Arc::new(MockLookup::new().latency(self.lookup_latency)),
            Arc::new(MockAnalyzer::new().latency(self.analysis_latency)),
            store,
            SessionOptions {
                request_timeout: self.request_timeout,
            },
        )
        .with_context(|| {
            format!(
                "failed to load settings from {}",
                self.settings_path.display()
            )
        })?;
        Ok(session.with_credential_override(self.api_key_override.clone()))
    }
}

fn env_u64(name: &str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .with_context(|| format!("{name} must be a non-negative integer, got {raw:?}")),
        Err(_) => Ok(None),
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        crate::test_util::lock_env()
    }

    fn clear_env() {
        for name in [
            API_KEY_ENV,
            LOOKUP_LATENCY_ENV,
            ANALYSIS_LATENCY_ENV,
            REQUEST_TIMEOUT_ENV,
        ] {
            unsafe { std::env::remove_var(name) };
        }
    }

    #[test]
    fn resolve_defaults_when_nothing_set() {
        let _lock = lock_env();
        clear_env();

        let config = AppConfig::resolve(None).unwrap();
        assert_eq!(config.api_key_override, None);
        assert_eq!(config.lookup_latency, MockLookup::DEFAULT_LATENCY);
        assert_eq!(config.analysis_latency, MockAnalyzer::DEFAULT_LATENCY);
        assert_eq!(
            config.request_timeout,
            SessionOptions::DEFAULT_REQUEST_TIMEOUT
        );
    }

    #[test]
    fn resolve_with_cli_flag_overrides_env() {
        let _lock = lock_env();
        clear_env();
        unsafe { std::env::set_var(API_KEY_ENV, "from-env") };

        let config = AppConfig::resolve(Some("from-cli")).unwrap();
        assert_eq!(config.api_key_override.as_deref(), Some("from-cli"));

        clear_env();
    }

    #[test]
    fn resolve_with_env_var_when_no_flag() {
        let _lock = lock_env();
        clear_env();
        unsafe { std::env::set_var(API_KEY_ENV, "  from-env  ") };

        let config = AppConfig::resolve(None).unwrap();
        assert_eq!(config.api_key_override.as_deref(), Some("from-env"));

        clear_env();
    }

    #[test]
    fn resolve_blank_flag_means_no_override() {
        let _lock = lock_env();
        clear_env();

        let config = AppConfig::resolve(Some("   ")).unwrap();
        assert_eq!(config.api_key_override, None);
    }

    #[test]
    fn resolve_reads_latency_and_timeout() {
        let _lock = lock_env();
        clear_env();
        unsafe { std::env::set_var(LOOKUP_LATENCY_ENV, "0") };
        unsafe { std::env::set_var(ANALYSIS_LATENCY_ENV, "250") };
        unsafe { std::env::set_var(REQUEST_TIMEOUT_ENV, "5") };

        let config = AppConfig::resolve(None).unwrap();
        assert_eq!(config.lookup_latency, Duration::ZERO);
        assert_eq!(config.analysis_latency, Duration::from_millis(250));
        assert_eq!(config.request_timeout, Duration::from_secs(5));

        clear_env();
    }

    #[test]
    fn resolve_errors_on_bad_number() {
        let _lock = lock_env();
        clear_env();
        unsafe { std::env::set_var(REQUEST_TIMEOUT_ENV, "soon") };

        let result = AppConfig::resolve(None);
        clear_env();

        let msg = result.unwrap_err().to_string();
        assert!(msg.contains(REQUEST_TIMEOUT_ENV), "unexpected error: {msg}");
    }

    #[test]
    fn settings_path_ends_with_expected_filename() {
        let _lock = lock_env();
        let path = settings_path();
        assert!(
            path.ends_with("blueline/settings.toml"),
            "unexpected settings path: {}",
            path.display()
        );
    }

    #[test]
    fn config_dir_honours_xdg() {
        let _lock = lock_env();
        let orig = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe { std::env::set_var("XDG_CONFIG_HOME", "/tmp/xdg-test") };

        let dir = config_dir();

        match orig {
            Some(v) => unsafe { std::env::set_var("XDG_CONFIG_HOME", v) },
            None => unsafe { std::env::remove_var("XDG_CONFIG_HOME") },
        }
        assert_eq!(dir, PathBuf::from("/tmp/xdg-test/blueline"));
    }

    #[test]
    fn open_session_uses_override() {
        let _lock = lock_env();
        clear_env();
        let tmp = tempfile::TempDir::new().unwrap();

        let mut config = AppConfig::resolve(Some("cli-key")).unwrap();
        config.settings_path = tmp.path().join("settings.toml");
        config.request_timeout = Duration::from_secs(7);

        let session = config.open_session().unwrap();
        assert_eq!(session.credential(), Some("cli-key"));
        assert_eq!(session.settings().api_key, None);
        assert_eq!(session.options().request_timeout, Duration::from_secs(7));
    }
}
