//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check partner URLs parse
//! - Flag missing keys and credentials
//! - Validate value ranges (timeouts > 0)
//!
//! # Design Decisions
//! - Returns all findings, not just first
//! - Findings are warnings: the relay starts regardless and calls fail
//!   naturally when the partner rejects an empty key or credential

use url::Url;

use crate::config::schema::RelayConfig;

/// A single configuration finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a loaded configuration and return every finding.
pub fn validate_config(config: &RelayConfig) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    check_url(&mut warnings, "hotel.base_url", &config.hotel.base_url);
    check_url(&mut warnings, "flight.base_url", &config.flight.base_url);

    if !config.hotel.api_key_configured() {
        warnings.push(ValidationWarning {
            field: "hotel.api_key",
            message: "not set; hotel partner calls will be rejected".to_string(),
        });
    }

    if !config.flight.credentials_configured() {
        warnings.push(ValidationWarning {
            field: "flight",
            message: "username, password or tenant_id missing; flight login will fail".to_string(),
        });
    }

    let timeouts = [
        ("timeouts.connect_secs", config.timeouts.connect_secs),
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("timeouts.content_secs", config.timeouts.content_secs),
        ("timeouts.auth_secs", config.timeouts.auth_secs),
    ];
    for (field, value) in timeouts {
        if value == 0 {
            warnings.push(ValidationWarning {
                field,
                message: "must be greater than zero".to_string(),
            });
        }
    }

    warnings
}

fn check_url(warnings: &mut Vec<ValidationWarning>, field: &'static str, value: &str) {
    if value.is_empty() {
        warnings.push(ValidationWarning {
            field,
            message: "not set".to_string(),
        });
        return;
    }
    if let Err(e) = Url::parse(value) {
        warnings.push(ValidationWarning {
            field,
            message: format!("invalid URL '{}': {}", value, e),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_config() -> RelayConfig {
        let mut config = RelayConfig::default();
        config.hotel.api_key = "key".into();
        config.flight.base_url = "https://flights.example.com".into();
        config.flight.username = "agent".into();
        config.flight.password = "secret".into();
        config.flight.tenant_id = "tenant".into();
        config
    }

    #[test]
    fn test_complete_config_is_clean() {
        assert!(validate_config(&complete_config()).is_empty());
    }

    #[test]
    fn test_collects_all_findings() {
        let mut config = complete_config();
        config.hotel.api_key.clear();
        config.flight.base_url = "not a url".into();
        config.timeouts.request_secs = 0;

        let fields: Vec<_> = validate_config(&config).into_iter().map(|w| w.field).collect();
        assert_eq!(
            fields,
            vec!["flight.base_url", "hotel.api_key", "timeouts.request_secs"]
        );
    }
}
