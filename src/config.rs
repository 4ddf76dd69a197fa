//! Configuration for Grove
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;
use uuid::Uuid;

/// Grove - service of record for the eco-living platform
#[derive(Parser, Debug, Clone)]
#[command(name = "grove")]
#[command(about = "HTTP service of record for the Grove eco-living platform")]
pub struct Args {
    /// Unique node identifier for this instance
    #[arg(long, env = "NODE_ID", default_value_t = Uuid::new_v4())]
    pub node_id: Uuid,

    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "grove")]
    pub mongodb_db: String,

    /// JWT secret for token signing (required in production)
    #[arg(long, env = "JWT_SECRET")]
    pub jwt_secret: Option<String>,

    /// JWT token expiry in seconds
    #[arg(long, env = "JWT_EXPIRY_SECONDS", default_value = "3600")]
    pub jwt_expiry_seconds: u64,

    /// Comma-separated list of emails granted the admin permission level
    #[arg(long, env = "ADMIN_EMAILS", default_value = "")]
    pub admin_emails: String,

    /// API key for the hosted generative model backend
    #[arg(long, env = "MODEL_API_KEY")]
    pub model_api_key: Option<String>,

    /// Base URL of the hosted model backend
    #[arg(
        long,
        env = "MODEL_API_BASE",
        default_value = "https://generativelanguage.googleapis.com"
    )]
    pub model_api_base: String,

    /// Model used for chat replies
    #[arg(long, env = "MODEL_CHAT", default_value = "gemini-2.0-flash")]
    pub model_chat: String,

    /// Model used for trash image classification
    #[arg(long, env = "MODEL_CLASSIFY", default_value = "gemini-2.5-flash")]
    pub model_classify: String,

    /// Timeout for model backend requests in milliseconds
    #[arg(long, env = "REQUEST_TIMEOUT_MS", default_value = "30000")]
    pub request_timeout_ms: u64,

    /// Enable development mode (MongoDB and model backend become optional)
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Get effective JWT secret (uses default in dev mode)
    pub fn jwt_secret(&self) -> String {
        if self.dev_mode {
            self.jwt_secret
                .clone()
                .unwrap_or_else(|| "dev-mode-secret-not-for-production-use-123456".to_string())
        } else {
            self.jwt_secret
                .clone()
                .expect("JWT_SECRET is required in production mode")
        }
    }

    /// Parse the admin email allow-list
    pub fn admin_email_list(&self) -> Vec<String> {
        self.admin_emails
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.dev_mode {
            match &self.jwt_secret {
                None => return Err("JWT_SECRET is required in production mode".to_string()),
                Some(s) if s.len() < 32 => {
                    return Err("JWT_SECRET must be at least 32 characters".to_string())
                }
                Some(_) => {}
            }
        }

        if self.request_timeout_ms == 0 {
            return Err("REQUEST_TIMEOUT_MS must be greater than zero".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args::parse_from(["grove", "--dev-mode"])
    }

    #[test]
    fn test_admin_email_list_parsing() {
        let mut args = base_args();
        args.admin_emails = "Admin@Example.com, ops@grove.io ,,".into();
        assert_eq!(
            args.admin_email_list(),
            vec!["admin@example.com".to_string(), "ops@grove.io".to_string()]
        );
    }

    #[test]
    fn test_empty_admin_list() {
        let args = base_args();
        assert!(args.admin_email_list().is_empty());
    }

    #[test]
    fn test_validate_requires_jwt_secret_in_production() {
        let mut args = base_args();
        args.dev_mode = false;
        assert!(args.validate().is_err());

        args.jwt_secret = Some("short".into());
        assert!(args.validate().is_err());

        args.jwt_secret = Some("a-secret-that-is-at-least-32-characters".into());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_dev_mode_defaults_jwt_secret() {
        let args = base_args();
        assert!(args.validate().is_ok());
        assert!(!args.jwt_secret().is_empty());
    }
}
