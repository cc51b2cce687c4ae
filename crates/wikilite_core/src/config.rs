use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_USER_AGENT: &str = "wikilite/0.1 (reading proxy for low-power clients)";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct ProxyConfig {
    #[serde(default)]
    pub proxy: ProxySection,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct ProxySection {
    pub bind_addr: Option<String>,
    pub user_agent: Option<String>,
    pub timeout_ms: Option<u64>,
}

impl ProxyConfig {
    /// Resolve the listen address: env WIKILITE_BIND > config > default.
    pub fn bind_addr(&self) -> String {
        env_string("WIKILITE_BIND")
            .or_else(|| self.proxy.bind_addr.clone())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
    }

    /// Resolve the outbound User-Agent: env WIKILITE_USER_AGENT > config >
    /// default.
    pub fn user_agent(&self) -> String {
        env_string("WIKILITE_USER_AGENT")
            .or_else(|| self.proxy.user_agent.clone())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string())
    }

    /// Resolve the outbound request timeout: env WIKILITE_TIMEOUT_MS >
    /// config > default.
    pub fn timeout_ms(&self) -> u64 {
        env_string("WIKILITE_TIMEOUT_MS")
            .and_then(|value| value.parse::<u64>().ok())
            .or(self.proxy.timeout_ms)
            .unwrap_or(DEFAULT_TIMEOUT_MS)
    }
}

fn env_string(key: &str) -> Option<String> {
    let value = env::var(key).ok()?;
    let trimmed = value.trim().to_string();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

/// Load a ProxyConfig from a TOML file. Returns the default if the file
/// doesn't exist.
pub fn load_config(config_path: &Path) -> Result<ProxyConfig> {
    if !config_path.exists() {
        return Ok(ProxyConfig::default());
    }
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("failed to read {}", config_path.display()))?;
    let parsed: ProxyConfig = toml::from_str(&content)
        .with_context(|| format!("failed to parse {}", config_path.display()))?;
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_config_resolves_to_defaults() {
        let config = ProxyConfig::default();
        assert_eq!(config.bind_addr(), DEFAULT_BIND_ADDR);
        assert_eq!(config.user_agent(), DEFAULT_USER_AGENT);
        assert_eq!(config.timeout_ms(), DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn load_config_returns_default_for_missing_file() {
        let config = load_config(Path::new("/nonexistent/wikilite.toml")).expect("load config");
        assert!(config.proxy.bind_addr.is_none());
    }

    #[test]
    fn load_config_parses_proxy_section() {
        let temp = tempdir().expect("tempdir");
        let config_path = temp.path().join("wikilite.toml");
        fs::write(
            &config_path,
            r#"
[proxy]
bind_addr = "0.0.0.0:3000"
user_agent = "test-agent/1.0"
timeout_ms = 5000
"#,
        )
        .expect("write config");

        let config = load_config(&config_path).expect("load config");
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
        assert_eq!(config.user_agent(), "test-agent/1.0");
        assert_eq!(config.timeout_ms(), 5000);
    }

    #[test]
    fn load_config_tolerates_partial_toml() {
        let temp = tempdir().expect("tempdir");
        let config_path = temp.path().join("wikilite.toml");
        fs::write(&config_path, "[proxy]\nbind_addr = \"127.0.0.1:9999\"\n").expect("write config");

        let config = load_config(&config_path).expect("load config");
        assert_eq!(config.bind_addr(), "127.0.0.1:9999");
        assert_eq!(config.user_agent(), DEFAULT_USER_AGENT);
    }

    #[test]
    fn load_config_returns_error_for_invalid_toml() {
        let temp = tempdir().expect("tempdir");
        let config_path = temp.path().join("wikilite.toml");
        fs::write(&config_path, "[proxy\nbind_addr = \"oops\"").expect("write config");
        let error = load_config(&config_path).expect_err("must fail");
        assert!(error.to_string().contains("failed to parse"));
    }
}
