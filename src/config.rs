use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Pages requested together in one batch
    pub batch_size: u32,
    /// How close to the end of the list the selection gets before prefetching
    pub lookahead: usize,
    pub search_debounce_ms: u64,
    pub min_search_len: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            batch_size: 2,
            lookahead: 5,
            search_debounce_ms: 500,
            min_search_len: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub token_env: Option<String>,
    pub token_command: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            token_env: Some("TMDB_TOKEN".to_string()),
            token_command: None,
            timeout_secs: 20,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

/// ~/.config/marquee/config.toml (Linux) or the platform equivalent
pub fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("marquee").join("config.toml"))
}

impl Config {
    /// Load from `path`, or the default location. Missing or unparsable
    /// files fall back to defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match config_path() {
                Some(p) => p,
                None => return Config::default(),
            },
        };

        let Ok(content) = std::fs::read_to_string(&path) else {
            return Config::default();
        };

        match toml::from_str::<Config>(&content) {
            Ok(config) => config.sanitized(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                Config::default()
            }
        }
    }

    fn sanitized(mut self) -> Self {
        if self.general.batch_size == 0 {
            self.general.batch_size = GeneralConfig::default().batch_size;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_config() {
        let toml_str = r#"
[general]
batch_size = 3
lookahead = 8

[api]
base_url = "http://localhost:8080/3"
token_env = "MY_TMDB"
token_command = "pass show tmdb"
timeout_secs = 5
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.batch_size, 3);
        assert_eq!(config.general.lookahead, 8);
        assert_eq!(config.general.search_debounce_ms, 500);
        assert_eq!(config.api.base_url, "http://localhost:8080/3");
        assert_eq!(config.api.token_env.as_deref(), Some("MY_TMDB"));
        assert_eq!(config.api.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn parse_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.general.batch_size, 2);
        assert_eq!(config.general.lookahead, 5);
        assert_eq!(config.general.min_search_len, 3);
        assert_eq!(config.api.token_env.as_deref(), Some("TMDB_TOKEN"));
        assert_eq!(config.api.timeout(), Duration::from_secs(20));
    }

    #[test]
    fn load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("nope.toml")));
        assert_eq!(config.general.batch_size, 2);
    }

    #[test]
    fn load_invalid_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[general\nbatch_size = ").unwrap();
        let config = Config::load(Some(&path));
        assert_eq!(config.general.lookahead, 5);
    }

    #[test]
    fn zero_batch_size_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[general]\nbatch_size = 0\n").unwrap();
        let config = Config::load(Some(&path));
        assert_eq!(config.general.batch_size, 2);
    }
}
