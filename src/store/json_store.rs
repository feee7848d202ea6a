use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::config::Settings;

const SETTINGS_FILE: &str = "go-dayleft.json";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("settings file does not exist: {}", .0.display())]
    Missing(PathBuf),
    #[error("cannot open settings file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot decode settings JSON: {0}")]
    Decode(#[from] serde_json::Error),
    /// The file decoded but failed validation. The decoded settings are kept
    /// for diagnostics only and must not be used.
    #[error("{message}")]
    Invalid { message: String, settings: Settings },
}

pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// Store rooted at `<home>/go-dayleft.json`.
    pub fn new() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            path: home.join(SETTINGS_FILE),
        }
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load(&self) -> Result<Settings, LoadError> {
        if !self.path.exists() {
            return Err(LoadError::Missing(self.path.clone()));
        }
        let content = fs::read_to_string(&self.path).map_err(|source| LoadError::Open {
            path: self.path.clone(),
            source,
        })?;
        let settings: Settings = serde_json::from_str(&content)?;
        if let Some(message) = settings.validate() {
            return Err(LoadError::Invalid { message, settings });
        }
        Ok(settings)
    }

    /// Write the settings, replacing any existing file.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let tmp_path = self.path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(settings).context("encoding settings")?;
        let written = (|| -> Result<()> {
            let mut file = fs::File::create(&tmp_path)
                .with_context(|| format!("creating {}", tmp_path.display()))?;
            file.write_all(json.as_bytes())?;
            file.write_all(b"\n")?;
            file.sync_all()?;
            fs::rename(&tmp_path, &self.path)
                .with_context(|| format!("replacing {}", self.path.display()))?;
            Ok(())
        })();

        if written.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        written
    }
}

impl Default for JsonStore {
    fn default() -> Self {
        Self::new()
    }
}
