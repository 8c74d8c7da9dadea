//! Palette themes and the persisted theme preference.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::{Action, Candidate};

/// Theme used when nothing (or something unknown) is stored.
pub const DEFAULT_THEME: &str = "glass";

pub const THEMES: &[&str] = &[DEFAULT_THEME, "retro", "catppuccin", "dracula", "alienblood"];

pub fn is_known(name: &str) -> bool {
    THEMES.contains(&name)
}

/// Persisted key-value theme preference.
pub trait ThemeStore {
    fn get(&self) -> Result<Option<String>>;
    fn set(&self, name: &str) -> Result<()>;
}

/// Resolve the stored preference, falling back to [`DEFAULT_THEME`].
pub fn current_theme(store: &dyn ThemeStore) -> String {
    match store.get() {
        Ok(Some(name)) if is_known(&name) => name,
        Ok(_) => DEFAULT_THEME.to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read theme preference");
            DEFAULT_THEME.to_string()
        }
    }
}

/// Store `name` if it is a known theme, otherwise store the default.
/// Returns the theme actually stored.
pub fn apply_theme(store: &dyn ThemeStore, name: &str) -> Result<String> {
    let name = if is_known(name) { name } else { DEFAULT_THEME };
    store.set(name)?;
    Ok(name.to_string())
}

/// Rows for a `/theme` query: one row for a known name, else all themes.
pub fn theme_rows(text: &str) -> Vec<Candidate> {
    if is_known(text) {
        return vec![theme_row(text)];
    }
    THEMES.iter().map(|name| theme_row(name)).collect()
}

fn theme_row(name: &str) -> Candidate {
    Candidate::new_command(
        format!("Theme: {}", name),
        format!("Switch to the {} theme", name),
        Action::ApplyTheme {
            name: name.to_string(),
        },
    )
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ThemeFile {
    theme: Option<String>,
}

/// Theme preference stored as a small JSON file.
pub struct JsonThemeStore {
    path: PathBuf,
}

impl JsonThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("flashback").join("theme.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ThemeStore for JsonThemeStore {
    fn get(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        let file: ThemeFile = serde_json::from_str(&contents)?;
        Ok(file.theme)
    }

    fn set(&self, name: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = ThemeFile {
            theme: Some(name.to_string()),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&file)?)?;
        tracing::debug!(theme = name, path = %self.path.display(), "theme saved");
        Ok(())
    }
}
