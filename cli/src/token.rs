//! Saved session token at `~/.uniways/token`.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use uniways_business::AuthContext;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSession {
    pub token: String,
    pub login: String,
}

impl SavedSession {
    pub fn auth(&self) -> AuthContext {
        AuthContext::with_token(self.token.as_str())
    }
}

/// JSON token file. Tests point it at a temporary directory.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.uniways/token`
    pub fn default_location() -> Result<Self> {
        let home = home_dir().context("Could not find home directory")?;
        Ok(Self::at(home.join(".uniways").join("token")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, login: &str, token: &str) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }

        let store = SavedSession {
            token: token.to_owned(),
            login: login.to_owned(),
        };
        let json = serde_json::to_string(&store)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }

    pub fn load(&self) -> Result<Option<SavedSession>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let store: SavedSession = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;
        Ok(Some(store))
    }

    /// Remove the token file. Returns whether there was one.
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&self.path)
            .with_context(|| format!("Failed to remove {}", self.path.display()))?;
        Ok(true)
    }
}
