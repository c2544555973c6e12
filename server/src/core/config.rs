//! Server configuration
//!
//! All settings come from the environment, with development defaults.
//!
//! # Environment variables
//!
//! | Variable | Default | Purpose |
//! |----------|---------|---------|
//! | HTTP_PORT | 4000 | HTTP API port |
//! | ENVIRONMENT | development | development \| staging \| production |
//! | MONGODB_URI | mongodb://localhost:27017 | document store connection string |
//! | MONGODB_DB | donmaris | database name |
//! | JWT_SECRET | (generated in dev) | token signing secret |
//! | JWT_EXPIRATION_MINUTES | 1440 | session token lifetime |
//! | SMTP_HOST / SMTP_PORT | localhost / 587 | mail relay |
//! | SMTP_USERNAME / SMTP_PASSWORD | (empty) | mail credentials |
//! | MAIL_FROM | no-reply@donmaris.com | sender address |
//! | PAYSTACK_SECRET_KEY | (empty) | payment provider key |
//! | WHATSAPP_TOKEN / WHATSAPP_PHONE_ID | (empty) | messaging provider |
//! | LOG_DIR | (unset) | daily-rolling log file directory |

use crate::auth::JwtConfig;

/// Document store settings
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Connection string
    pub uri: String,
    /// Database name
    pub database: String,
}

/// SMTP mail settings
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_address: String,
}

/// Paystack payment gateway settings
#[derive(Debug, Clone)]
pub struct PaystackConfig {
    pub secret_key: String,
    pub base_url: String,
}

/// WhatsApp messaging provider settings
#[derive(Debug, Clone)]
pub struct WhatsappConfig {
    pub token: String,
    pub phone_id: String,
    pub base_url: String,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Document store settings
    pub db: DbConfig,
    /// JWT session settings
    pub jwt: JwtConfig,
    /// Mail settings
    pub mail: MailConfig,
    /// Payment gateway settings
    pub paystack: PaystackConfig,
    /// Messaging provider settings
    pub whatsapp: WhatsappConfig,
    /// Optional log file directory
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(4000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            db: DbConfig {
                uri: std::env::var("MONGODB_URI")
                    .unwrap_or_else(|_| "mongodb://localhost:27017".into()),
                database: std::env::var("MONGODB_DB").unwrap_or_else(|_| "donmaris".into()),
            },
            jwt: JwtConfig::default(),
            mail: MailConfig {
                smtp_host: std::env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".into()),
                smtp_port: std::env::var("SMTP_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(587),
                smtp_username: std::env::var("SMTP_USERNAME").unwrap_or_default(),
                smtp_password: std::env::var("SMTP_PASSWORD").unwrap_or_default(),
                from_address: std::env::var("MAIL_FROM")
                    .unwrap_or_else(|_| "no-reply@donmaris.com".into()),
            },
            paystack: PaystackConfig {
                secret_key: std::env::var("PAYSTACK_SECRET_KEY").unwrap_or_default(),
                base_url: std::env::var("PAYSTACK_BASE_URL")
                    .unwrap_or_else(|_| "https://api.paystack.co".into()),
            },
            whatsapp: WhatsappConfig {
                token: std::env::var("WHATSAPP_TOKEN").unwrap_or_default(),
                phone_id: std::env::var("WHATSAPP_PHONE_ID").unwrap_or_default(),
                base_url: std::env::var("WHATSAPP_BASE_URL")
                    .unwrap_or_else(|_| "https://graph.facebook.com/v19.0".into()),
            },
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    /// Whether we run in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Whether we run in development
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
