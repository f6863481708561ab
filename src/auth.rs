use std::path::PathBuf;

use crate::config::ApiConfig;
use crate::error::{MarqueeError, Result};

/// Try to run a CLI command and capture stdout as a token
fn try_cli_token(command: &str) -> Option<String> {
    let output = std::process::Command::new("sh")
        .args(["-c", command])
        .output()
        .ok()?;

    if output.status.success() {
        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !token.is_empty() {
            return Some(token);
        }
    }
    None
}

/// ~/.config/marquee/token
fn token_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("marquee").join("token"))
}

fn load_stored_token() -> Option<String> {
    let path = token_path()?;
    let token = std::fs::read_to_string(path).ok()?;
    non_empty(token)
}

fn non_empty(token: String) -> Option<String> {
    let token = token.trim().to_string();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Resolve the TMDB read access token, trying in order:
/// 1. The env var named by `api.token_env`
/// 2. Stored token in ~/.config/marquee/token
/// 3. `api.token_command`
pub fn load_token(api: &ApiConfig) -> Result<String> {
    if let Some(env_var) = &api.token_env {
        if let Some(token) = std::env::var(env_var).ok().and_then(non_empty) {
            return Ok(token);
        }
    }

    if let Some(token) = load_stored_token() {
        return Ok(token);
    }

    if let Some(cmd) = &api.token_command {
        if let Some(token) = try_cli_token(cmd) {
            return Ok(token);
        }
        tracing::warn!(command = %cmd, "token command produced no token");
    }

    Err(MarqueeError::Auth(format!(
        "No TMDB token found. Set {} or configure api.token_command.",
        api.token_env.as_deref().unwrap_or("a token env var")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_token_is_trimmed() {
        assert_eq!(try_cli_token("echo '  abc123  '"), Some("abc123".to_string()));
    }

    #[test]
    fn failing_or_silent_command_yields_none() {
        assert_eq!(try_cli_token("exit 1"), None);
        assert_eq!(try_cli_token("true"), None);
    }

    #[test]
    fn env_var_wins() {
        std::env::set_var("MARQUEE_TEST_TOKEN_ENV", "from-env");
        let api = ApiConfig {
            token_env: Some("MARQUEE_TEST_TOKEN_ENV".to_string()),
            token_command: Some("echo from-command".to_string()),
            ..ApiConfig::default()
        };
        assert_eq!(load_token(&api).unwrap(), "from-env");
        std::env::remove_var("MARQUEE_TEST_TOKEN_ENV");
    }
}
