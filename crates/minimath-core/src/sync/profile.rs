//! Saved player profile
//!
//! Remembers the last active player name between sessions so the client can
//! pull that player's progress at startup. Stored as a single line of text.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::Config;

/// Persisted "last active player" name
#[derive(Debug, Clone)]
pub struct LocalProfile {
    path: Option<PathBuf>,
}

impl LocalProfile {
    /// Profile stored at the configured location
    pub fn new(config: &Config) -> Self {
        Self::with_path(config.profile_path())
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// A profile that never persists anything
    pub fn in_memory() -> Self {
        Self { path: None }
    }

    /// Load the saved name, if any
    ///
    /// A missing or blank file means no saved profile.
    pub fn load(&self) -> Result<Option<String>> {
        let Some(ref path) = self.path else {
            return Ok(None);
        };

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read saved profile {:?}", path))?;
        let name = content.trim();
        Ok((!name.is_empty()).then(|| name.to_string()))
    }

    /// Save `name` as the active profile
    pub fn save(&self, name: &str) -> Result<()> {
        let Some(ref path) = self.path else {
            return Ok(());
        };

        atomic_write(path, name.as_bytes())
            .with_context(|| format!("Failed to save profile to {:?}", path))
    }
}

/// Write via a temp file and rename so a crash never leaves a partial name
fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }

    let temp_path = path.with_extension("tmp");

    let mut file = File::create(&temp_path)
        .with_context(|| format!("Failed to create temp file {:?}", temp_path))?;
    file.write_all(data)
        .with_context(|| format!("Failed to write to temp file {:?}", temp_path))?;
    file.sync_all()
        .with_context(|| format!("Failed to sync temp file {:?}", temp_path))?;

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename {:?} to {:?}", temp_path, path))?;

    Ok(())
}
