use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

const DEFAULT_API_URL: &str = "https://closet-recruiting-api.azurewebsites.net/api/data";

/// Client configuration: optional TOML file, then `VITRINE_*` environment
/// overrides on top.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VitrineConfig {
    pub api_url: String,
    pub page_size: u32,
    pub scroll_threshold: f64,
    pub scroll_cooldown_ms: u64,
    pub debounce_ms: u64,
}

impl Default for VitrineConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            page_size: 20,
            scroll_threshold: crate::scroll::DEFAULT_THRESHOLD,
            scroll_cooldown_ms: 1000,
            debounce_ms: 300,
        }
    }
}

impl VitrineConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => {
                let text = std::fs::read_to_string(p)
                    .with_context(|| format!("reading config file {}", p.display()))?;
                toml::from_str(&text)
                    .with_context(|| format!("parsing config file {}", p.display()))?
            }
            None => Self::default(),
        };
        cfg.override_from(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    /// Apply overrides from a key lookup; unparseable values are ignored.
    fn override_from<F>(&mut self, get: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(u) = get("VITRINE_API_URL").filter(|u| !u.trim().is_empty()) {
            self.api_url = u;
        }
        if let Some(n) = get("VITRINE_PAGE_SIZE").and_then(|s| s.parse().ok()) {
            self.page_size = n;
        }
        if let Some(t) = get("VITRINE_SCROLL_THRESHOLD").and_then(|s| s.parse().ok()) {
            self.scroll_threshold = t;
        }
        if let Some(ms) = get("VITRINE_SCROLL_COOLDOWN_MS").and_then(|s| s.parse().ok()) {
            self.scroll_cooldown_ms = ms;
        }
        if let Some(ms) = get("VITRINE_DEBOUNCE_MS").and_then(|s| s.parse().ok()) {
            self.debounce_ms = ms;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_remote_contract() {
        let cfg = VitrineConfig::default();
        assert_eq!(cfg.page_size, 20);
        assert_eq!(cfg.scroll_cooldown_ms, 1000);
        assert_eq!(cfg.debounce_ms, 300);
        assert!(cfg.api_url.starts_with("https://"));
    }

    #[test]
    fn partial_toml_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_url = \"https://example.test/api\"").unwrap();
        writeln!(file, "page_size = 8").unwrap();

        let cfg = VitrineConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.api_url, "https://example.test/api");
        assert_eq!(cfg.page_size, 8);
        assert_eq!(cfg.debounce_ms, 300);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        assert!(VitrineConfig::load(Some(Path::new("/nonexistent/vitrine.toml"))).is_err());
    }

    #[test]
    fn env_overrides_win_and_ignore_garbage() {
        let mut cfg = VitrineConfig::default();
        cfg.override_from(|key| match key {
            "VITRINE_API_URL" => Some("https://override.test".to_string()),
            "VITRINE_PAGE_SIZE" => Some("not-a-number".to_string()),
            "VITRINE_DEBOUNCE_MS" => Some("150".to_string()),
            _ => None,
        });
        assert_eq!(cfg.api_url, "https://override.test");
        assert_eq!(cfg.page_size, 20);
        assert_eq!(cfg.debounce_ms, 150);
    }
}
