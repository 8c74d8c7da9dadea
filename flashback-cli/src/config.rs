use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Chrome's user data directory relative to the platform base directory.
#[cfg(target_os = "macos")]
const CHROME_DATA_DIR: &str = "Google/Chrome";
#[cfg(target_os = "windows")]
const CHROME_DATA_DIR: &str = "Google/Chrome/User Data";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const CHROME_DATA_DIR: &str = "google-chrome";

pub struct Config {
    pub profile_path: PathBuf,
    pub theme_path: PathBuf,
}

impl Config {
    /// Resolve `profile` under `data_dir` (or the platform default).
    pub fn new(profile: &str, data_dir: Option<PathBuf>, theme_path: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };

        if !data_dir.exists() {
            bail!("browser data directory not found at {}", data_dir.display());
        }

        let profile_path = data_dir.join(profile);
        if !profile_path.exists() {
            let available = list_profiles(&data_dir)?;
            bail!(
                "profile '{}' not found (available: {})",
                profile,
                available.join(", ")
            );
        }

        let theme_path = match theme_path {
            Some(path) => path,
            None => flashback_rs::JsonThemeStore::default_path()
                .context("could not determine the user config directory")?,
        };

        tracing::debug!(profile = %profile_path.display(), theme = %theme_path.display(), "resolved config");
        Ok(Self {
            profile_path,
            theme_path,
        })
    }

    pub fn history_path(&self) -> PathBuf {
        self.profile_path.join("History")
    }

    pub fn bookmarks_path(&self) -> PathBuf {
        self.profile_path.join("Bookmarks")
    }

    pub fn sessions_dir(&self) -> PathBuf {
        self.profile_path.join("Sessions")
    }
}

fn default_data_dir() -> Result<PathBuf> {
    #[cfg(target_os = "macos")]
    let base = dirs::data_dir();
    #[cfg(target_os = "windows")]
    let base = dirs::data_local_dir();
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let base = dirs::config_dir();

    base.map(|b| b.join(CHROME_DATA_DIR))
        .context("could not determine the browser data directory")
}

fn list_profiles(data_dir: &Path) -> Result<Vec<String>> {
    let mut profiles = Vec::new();
    for entry in std::fs::read_dir(data_dir)? {
        let entry = entry?;
        if entry.path().is_dir() {
            let name = entry.file_name().to_string_lossy().to_string();
            if !name.starts_with('.') {
                profiles.push(name);
            }
        }
    }
    profiles.sort();
    Ok(profiles)
}
