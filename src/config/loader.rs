//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RelayConfig;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Load configuration from an optional TOML file, then apply environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => RelayConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Overlay process environment values onto `config`.
///
/// Unset variables leave the current value in place; set-but-empty variables
/// clear it.
pub fn apply_env_overrides<F>(config: &mut RelayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let targets: [(&str, &mut String); 8] = [
        ("CLEARTRIP_BASE_URL", &mut config.hotel.base_url),
        ("CLEARTRIP_API_KEY", &mut config.hotel.api_key),
        ("FLIGHT_BASE_URL", &mut config.flight.base_url),
        ("FLIGHT_USERNAME", &mut config.flight.username),
        ("FLIGHT_PASSWORD", &mut config.flight.password),
        ("FLIGHT_TENANT_ID", &mut config.flight.tenant_id),
        ("DATABASE_URL", &mut config.catalog.database_url),
        ("BIND_ADDRESS", &mut config.listener.bind_address),
    ];

    for (key, slot) in targets {
        if let Some(value) = lookup(key) {
            *slot = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = RelayConfig::default();
        config.hotel.api_key = "from-file".into();

        let env: HashMap<&str, &str> = [
            ("CLEARTRIP_API_KEY", "from-env"),
            ("FLIGHT_TENANT_ID", "tenant-9"),
        ]
        .into_iter()
        .collect();
        apply_env_overrides(&mut config, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.hotel.api_key, "from-env");
        assert_eq!(config.flight.tenant_id, "tenant-9");
        assert_eq!(config.hotel.base_url, "https://api.cleartrip.com");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = load_config(Some(Path::new("definitely-missing-relay.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("cleartrip_relay_loader_test.toml");
        fs::write(
            &path,
            "[timeouts]\nrequest_secs = 45\n\n[flight]\nbase_url = \"https://f.example\"\n",
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.timeouts.request_secs, 45);
        assert_eq!(config.timeouts.content_secs, 60);

        std::fs::remove_file(&path).unwrap_or_default();
    }
}
