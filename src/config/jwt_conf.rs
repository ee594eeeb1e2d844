use std::env;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;

/// Bearer-token validation configuration. Token issuance happens at the
/// identity provider; this backend only verifies signatures and reads claims.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared secret used to verify HS256 token signatures
    pub jwt_secret: String,
    /// Accepted clock skew in seconds when checking expiry
    pub leeway_secs: u64,
    /// Expected issuer (optional)
    pub jwt_issuer: Option<String>,
    /// Expected audience (optional)
    pub jwt_audience: Option<String>,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables
    ///
    /// Expected environment variables:
    /// - JWT_SECRET: Secret key for verifying tokens (required, min 32 chars)
    /// - JWT_LEEWAY_SECS: Accepted clock skew in seconds (defaults to 30)
    /// - JWT_ISSUER: Expected issuer (optional)
    /// - JWT_AUDIENCE: Expected audience (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading JWT configuration from environment variables");

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| {
            error!("JWT_SECRET environment variable not found");
            ConfigError::EnvVarNotFound("JWT_SECRET".to_string())
        })?;

        if jwt_secret.len() < 32 {
            error!("JWT_SECRET is too short (minimum 32 characters required)");
            return Err(ConfigError::InvalidValue(
                "JWT_SECRET must be at least 32 characters long".to_string(),
            ));
        }
        debug!("JWT secret loaded (length: {} chars)", jwt_secret.len());

        let leeway_secs = env::var("JWT_LEEWAY_SECS")
            .unwrap_or_else(|_| {
                warn!("JWT_LEEWAY_SECS not set, using default: 30");
                "30".to_string()
            })
            .parse::<u64>()
            .map_err(|e| {
                error!("Invalid JWT_LEEWAY_SECS value: {}", e);
                ConfigError::InvalidValue(format!("JWT_LEEWAY_SECS: {}", e))
            })?;

        let jwt_issuer = env::var("JWT_ISSUER").ok();
        let jwt_audience = env::var("JWT_AUDIENCE").ok();

        let config = JwtConfig {
            jwt_secret,
            leeway_secs,
            jwt_issuer,
            jwt_audience,
        };

        info!("JWT configuration loaded successfully");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.len() < 32 {
            return Err(ConfigError::ValidationError(
                "JWT secret must be at least 32 characters long".to_string(),
            ));
        }
        Ok(())
    }
}

/// Test-friendly defaults; the secret is only suitable for test tokens.
impl Default for JwtConfig {
    fn default() -> Self {
        JwtConfig {
            jwt_secret: "test_secret_key_for_jwt_testing_should_be_long_enough".to_string(),
            leeway_secs: 30,
            jwt_issuer: None,
            jwt_audience: None,
        }
    }
}
