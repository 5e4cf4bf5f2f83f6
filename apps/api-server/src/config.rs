//! Application configuration loaded from environment variables.

use std::env;

use newsroom_core::services::LifecyclePolicy;
use newsroom_infra::{DatabaseConfig, JwtConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub policy: LifecyclePolicy,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = LifecyclePolicy::default();

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env(),
            policy: LifecyclePolicy {
                clear_rejection_on_submit: env_flag(
                    "CLEAR_REJECTION_ON_SUBMIT",
                    defaults.clear_rejection_on_submit,
                ),
                restrict_detail_reads: env_flag(
                    "RESTRICT_DETAIL_READS",
                    defaults.restrict_detail_reads,
                ),
            },
        }
    }
}

/// Boolean switch: "false" and "0" disable, any other value enables.
fn env_flag(key: &str, default: bool) -> bool {
    parse_flag(env::var(key).ok().as_deref(), default)
}

fn parse_flag(value: Option<&str>, default: bool) -> bool {
    match value.map(|v| v.trim().to_lowercase()) {
        Some(v) if v.is_empty() => default,
        Some(v) => v != "false" && v != "0",
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag(None, true));
        assert!(!parse_flag(None, false));
        assert!(!parse_flag(Some("false"), true));
        assert!(!parse_flag(Some("0"), true));
        assert!(parse_flag(Some("TRUE"), false));
        assert!(parse_flag(Some(" "), true));
    }
}
