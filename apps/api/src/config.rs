use std::fmt;

use anyhow::{Context, Result};

/// Upload cap for the export endpoint: 25 MiB.
pub const DEFAULT_MAX_SURFACE_BYTES: usize = 25 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Nothing is strictly required: a missing provider key only disables generation.
#[derive(Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub max_surface_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            // API_KEY is the legacy variable name.
            gemini_api_key: non_blank("GEMINI_API_KEY").or_else(|| non_blank("API_KEY")),
            port: non_blank("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .trim()
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: non_blank("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            max_surface_bytes: match non_blank("MAX_SURFACE_BYTES") {
                Some(raw) => raw
                    .trim()
                    .parse::<usize>()
                    .context("MAX_SURFACE_BYTES must be a byte count")?,
                None => DEFAULT_MAX_SURFACE_BYTES,
            },
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .field("max_surface_bytes", &self.max_surface_bytes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.gemini_api_key, None);
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.max_surface_bytes, 26_214_400);
    }

    #[test]
    fn test_gemini_key_wins_over_legacy_name() {
        let config = config_from(&[("GEMINI_API_KEY", "g-key"), ("API_KEY", "legacy")]).unwrap();
        assert_eq!(config.gemini_api_key.as_deref(), Some("g-key"));

        let config = config_from(&[("API_KEY", "legacy")]).unwrap();
        assert_eq!(config.gemini_api_key.as_deref(), Some("legacy"));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let config = config_from(&[("GEMINI_API_KEY", "   ")]).unwrap();
        assert_eq!(config.gemini_api_key, None);
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
        assert!(config_from(&[("PORT", "70000")]).is_err());
        assert_eq!(config_from(&[("PORT", "3000")]).unwrap().port, 3000);
    }

    #[test]
    fn test_invalid_surface_limit_is_an_error() {
        assert!(config_from(&[("MAX_SURFACE_BYTES", "-1")]).is_err());
        assert_eq!(
            config_from(&[("MAX_SURFACE_BYTES", "1024")])
                .unwrap()
                .max_surface_bytes,
            1024
        );
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = config_from(&[("GEMINI_API_KEY", "super-secret")]).unwrap();
        let printed = format!("{config:?}");
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("<redacted>"));
    }
}
