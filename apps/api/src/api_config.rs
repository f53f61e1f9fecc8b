use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use tabula_core::AppError;
use tabula_domain::Language;
use tracing_subscriber::EnvFilter;

const DEFAULT_AUDIT_LOG_LIMIT: usize = 50;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub frontend_url: String,
    pub bootstrap_token: String,
    pub api_host: String,
    pub api_port: u16,
    pub cookie_secure: bool,
    pub bootstrap_admin_email: Option<String>,
    pub default_language: Language,
    pub audit_log_default_limit: usize,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");
        Self::from_lookup(migrate_only, |name| env::var(name).ok())
    }

    pub(crate) fn from_lookup(
        migrate_only: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let required = |name: &str| {
            lookup(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))
        };

        let database_url = required("DATABASE_URL")?;
        let frontend_url =
            lookup("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_owned());
        let bootstrap_token = required("AUTH_BOOTSTRAP_TOKEN")?;
        if bootstrap_token.trim().is_empty() {
            return Err(AppError::Validation(
                "AUTH_BOOTSTRAP_TOKEN must not be empty".to_owned(),
            ));
        }
        let session_secret = required("SESSION_SECRET")?;
        if session_secret.len() < 32 {
            return Err(AppError::Validation(
                "SESSION_SECRET must be at least 32 characters".to_owned(),
            ));
        }

        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = lookup("API_PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);
        let cookie_secure = lookup("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|| "false".to_owned())
            .eq_ignore_ascii_case("true");

        let bootstrap_admin_email = lookup("BOOTSTRAP_ADMIN_EMAIL")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let default_language = lookup("DEFAULT_LANGUAGE")
            .filter(|value| !value.trim().is_empty())
            .map(|value| {
                Language::from_str(value.as_str()).map_err(|error| {
                    AppError::Validation(format!("invalid DEFAULT_LANGUAGE: {error}"))
                })
            })
            .transpose()?
            .unwrap_or_default();

        let audit_log_default_limit = lookup("AUDIT_LOG_DEFAULT_LIMIT")
            .map(|value| {
                value
                    .parse::<usize>()
                    .ok()
                    .filter(|limit| *limit > 0)
                    .ok_or_else(|| {
                        AppError::Validation(format!(
                            "AUDIT_LOG_DEFAULT_LIMIT must be a positive integer, got '{value}'"
                        ))
                    })
            })
            .transpose()?
            .unwrap_or(DEFAULT_AUDIT_LOG_LIMIT);

        Ok(Self {
            migrate_only,
            database_url,
            frontend_url,
            bootstrap_token,
            api_host,
            api_port,
            cookie_secure,
            bootstrap_admin_email,
            default_language,
            audit_log_default_limit,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
