use std::fs;
use std::path::{Path, PathBuf};

use crate::client::error::ClientError;
use crate::client::state::Session;

const SESSION_FILE: &str = "session.json";

/// Client config directory: `BLOG_CLI_CONFIG_DIR`, else
/// `$HOME/.config/blog/cli`.
pub fn config_dir() -> Result<PathBuf, ClientError> {
    if let Ok(custom_dir) = std::env::var("BLOG_CLI_CONFIG_DIR") {
        return Ok(PathBuf::from(custom_dir));
    }
    let home = std::env::var("HOME")
        .map_err(|_| ClientError::Config("HOME environment variable not set".to_string()))?;
    Ok(PathBuf::from(home).join(".config").join("blog").join("cli"))
}

/// JSON file that keeps the session across runs
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(SESSION_FILE))
    }

    pub fn default_location() -> Result<Self, ClientError> {
        Ok(Self::in_dir(&config_dir()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<Session>, ClientError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub fn save(&self, session: &Session) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), ClientError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
