//! Runtime configuration.
//!
//! Settings come from an optional TOML file; `PROMPY_API_URL` and
//! `PROMPY_DATA_DIR` override the file. Every field has a default, so an
//! empty file (or no file) is valid.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use tracing::{debug, info};

use crate::analyzer::{
    default_rules, load_rules, AnalysisBackend, AnalysisRules, FillerStrategy, PromptAnalyzer,
    RemoteAnalyzer,
};
use crate::error::{PromptyError, Result};
use crate::history::{JsonFileStore, KeyValueStore, PromptHistory, SqliteStore, DEFAULT_CAPACITY};
use crate::workspace::PromptWorkspace;

pub const API_URL_ENV: &str = "PROMPY_API_URL";
pub const DATA_DIR_ENV: &str = "PROMPY_DATA_DIR";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Local,
    Remote,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Json,
    Sqlite,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub backend: BackendKind,
    /// Base URL of the remote analysis service
    pub api_url: String,
    pub request_timeout_secs: u64,
    /// Delay before local analysis resolves, modelling a service round trip
    pub simulated_latency_ms: u64,
    pub storage: StorageKind,
    /// Defaults to the platform data directory plus `prompy`
    pub data_dir: Option<PathBuf>,
    pub history_capacity: usize,
    pub filler: FillerStrategy,
    /// Custom analysis rules; the embedded rules are used when unset
    pub rules_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: BackendKind::Local,
            api_url: "http://localhost:8080".to_string(),
            request_timeout_secs: 60,
            simulated_latency_ms: 2000,
            storage: StorageKind::Json,
            data_dir: None,
            history_capacity: DEFAULT_CAPACITY,
            filler: FillerStrategy::Ordered,
            rules_path: None,
        }
    }
}

impl Settings {
    /// Read settings from a TOML file, then apply environment overrides.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {:?}", path))?;
        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Invalid settings file {:?}", path))?;
        info!("Loaded settings from {:?}", path);
        Ok(settings.apply_env())
    }

    /// Defaults plus environment overrides.
    pub fn from_env() -> Self {
        Self::default().apply_env()
    }

    pub fn apply_env(self) -> Self {
        self.apply_overrides(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(DATA_DIR_ENV).ok(),
        )
    }

    fn apply_overrides(mut self, api_url: Option<String>, data_dir: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            debug!("Using API URL from {}", API_URL_ENV);
            self.api_url = url;
        }
        if let Some(dir) = data_dir.filter(|d| !d.trim().is_empty()) {
            debug!("Using data dir from {}", DATA_DIR_ENV);
            self.data_dir = Some(PathBuf::from(dir));
        }
        self
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|d| d.join("prompy"))
            .ok_or_else(|| PromptyError::Config("No platform data directory available".to_string()))
    }

    pub fn rules(&self) -> Result<AnalysisRules> {
        match self.rules_path {
            Some(ref path) => load_rules(path)
                .map_err(|e| PromptyError::Config(format!("Failed to load rules {:?}: {:#}", path, e))),
            None => Ok(default_rules()),
        }
    }

    pub fn analysis_backend(&self) -> Result<AnalysisBackend> {
        let rules = self.rules()?;
        match self.backend {
            BackendKind::Local => {
                let analyzer = PromptAnalyzer::new(rules).with_filler(self.filler);
                Ok(AnalysisBackend::local_with_latency(
                    analyzer,
                    Duration::from_millis(self.simulated_latency_ms),
                ))
            }
            BackendKind::Remote => {
                let remote = RemoteAnalyzer::new(
                    &self.api_url,
                    Duration::from_secs(self.request_timeout_secs),
                    rules,
                )?;
                Ok(AnalysisBackend::Remote(remote))
            }
        }
    }

    pub fn open_store(&self) -> Result<Box<dyn KeyValueStore>> {
        let dir = self.data_dir()?;
        let store: Box<dyn KeyValueStore> = match self.storage {
            StorageKind::Json => Box::new(JsonFileStore::new(&dir.join("prompy-store.json"))),
            StorageKind::Sqlite => Box::new(SqliteStore::new(&dir.join("prompy.db"))?),
        };
        Ok(store)
    }

    pub fn open_history(&self) -> Result<PromptHistory<Box<dyn KeyValueStore>>> {
        Ok(PromptHistory::with_capacity(
            self.open_store()?,
            self.history_capacity,
        ))
    }

    pub fn open_workspace(&self) -> Result<PromptWorkspace<Box<dyn KeyValueStore>>> {
        Ok(PromptWorkspace::new(
            self.analysis_backend()?,
            self.open_history()?,
        ))
    }
}
