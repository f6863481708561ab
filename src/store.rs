use serde::{de::DeserializeOwned, Serialize};
use std::path::PathBuf;

/// A directory of small JSON documents, one file per key.
#[derive(Debug, Clone)]
pub struct StateDir {
    root: PathBuf,
}

impl StateDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// XDG-compatible data directory: ~/.local/share/marquee/ (Linux) or
    /// ~/Library/Application Support/marquee/ (macOS)
    pub fn default_location() -> Option<Self> {
        Some(Self::new(dirs::data_dir()?.join("marquee")))
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_key(key)))
    }

    /// Read a stored value. Returns None if missing or corrupt.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let data = std::fs::read_to_string(self.path(key)).ok()?;
        serde_json::from_str(&data).ok()
    }

    pub fn write<T: Serialize>(&self, key: &str, value: &T) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        let data = serde_json::to_string_pretty(value)?;
        std::fs::write(self.path(key), data)
    }
}

/// Keep keys to a single safe path segment
fn sanitize_key(key: &str) -> String {
    key.replace(['/', '\\'], "_")
}
