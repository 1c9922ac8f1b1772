/// Configuration management for Blog Service
///
/// Everything is read from environment variables (a `.env` file is loaded
/// first by `main`). Database pool settings live in the `db-pool` crate and
/// JWT keys in `crypto-core`; this module covers the rest.
use serde::{Deserialize, Serialize};

/// One year
const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Token and listing settings
    pub api: ApiConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
    /// Number of actix workers
    pub workers: usize,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Lifetime of tokens issued by `api-token-auth`
    pub token_ttl_hours: i64,
    /// Upper bound for the `limit` query parameter on post listings
    pub max_page_size: i64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("BLOG_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or_default("BLOG_SERVICE_PORT", 8000)?,
                workers: parse_env_or_default("BLOG_SERVICE_WORKERS", 4)?,
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if app_env.eq_ignore_ascii_case("production") => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:3000".to_string(),
                };

                if app_env.eq_ignore_ascii_case("production") && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            api: {
                let token_ttl_hours = parse_env_or_default("JWT_ACCESS_TOKEN_TTL_HOURS", 24)?;
                let max_page_size = parse_env_or_default("POSTS_MAX_PAGE_SIZE", 100)?;

                if !(1..=MAX_TOKEN_TTL_HOURS).contains(&token_ttl_hours) {
                    return Err(format!(
                        "JWT_ACCESS_TOKEN_TTL_HOURS must be between 1 and {}",
                        MAX_TOKEN_TTL_HOURS
                    ));
                }
                if max_page_size <= 0 {
                    return Err("POSTS_MAX_PAGE_SIZE must be positive".to_string());
                }

                ApiConfig {
                    token_ttl_hours,
                    max_page_size,
                }
            },
        })
    }

    /// Trimmed, non-empty origins from `CORS_ALLOWED_ORIGINS`
    pub fn cors_origins(&self) -> Vec<String> {
        self.cors
            .allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }
}

fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 7] = [
        "APP_ENV",
        "BLOG_SERVICE_HOST",
        "BLOG_SERVICE_PORT",
        "BLOG_SERVICE_WORKERS",
        "CORS_ALLOWED_ORIGINS",
        "JWT_ACCESS_TOKEN_TTL_HOURS",
        "POSTS_MAX_PAGE_SIZE",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env().unwrap();

        assert_eq!(config.app.env, "development");
        assert_eq!(config.app.port, 8000);
        assert_eq!(config.app.workers, 4);
        assert_eq!(config.api.token_ttl_hours, 24);
        assert_eq!(config.api.max_page_size, 100);
        assert_eq!(config.cors_origins(), vec!["http://localhost:3000"]);
    }

    #[test]
    #[serial]
    fn test_invalid_port_rejected() {
        clear_env();
        std::env::set_var("BLOG_SERVICE_PORT", "eighty");
        let err = Config::from_env().unwrap_err();
        clear_env();

        assert!(err.contains("BLOG_SERVICE_PORT"));
    }

    #[test]
    #[serial]
    fn test_production_requires_explicit_cors() {
        clear_env();
        std::env::set_var("APP_ENV", "production");
        assert!(Config::from_env().is_err());

        std::env::set_var("CORS_ALLOWED_ORIGINS", "*");
        assert!(Config::from_env().is_err());

        std::env::set_var("CORS_ALLOWED_ORIGINS", "https://blog.dev, https://www.blog.dev");
        let config = Config::from_env().unwrap();
        clear_env();

        assert_eq!(config.app.env, "production");
        assert_eq!(config.cors_origins().len(), 2);
    }

    #[test]
    #[serial]
    fn test_non_positive_page_size_rejected() {
        clear_env();
        std::env::set_var("POSTS_MAX_PAGE_SIZE", "0");
        let result = Config::from_env();
        clear_env();

        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_token_ttl_bounds() {
        clear_env();
        std::env::set_var("JWT_ACCESS_TOKEN_TTL_HOURS", "9223372036854775807");
        let err = Config::from_env().unwrap_err();
        assert!(err.contains("JWT_ACCESS_TOKEN_TTL_HOURS"));

        std::env::set_var("JWT_ACCESS_TOKEN_TTL_HOURS", "0");
        assert!(Config::from_env().is_err());

        std::env::set_var("JWT_ACCESS_TOKEN_TTL_HOURS", "8760");
        let config = Config::from_env().unwrap();
        clear_env();

        assert_eq!(config.api.token_ttl_hours, MAX_TOKEN_TTL_HOURS);
        let settings = crate::ApiSettings::from(&config.api);
        assert_eq!(settings.token_ttl, chrono::Duration::hours(8760));
    }
}
