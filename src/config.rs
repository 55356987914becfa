use rust_decimal::Decimal;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    pub test_before_acquire: bool,
}

/// Settings for the Instagram feed proxy
#[derive(Debug, Clone)]
pub struct InstagramConfig {
    pub username: String,
    pub api_url: String,
    pub cache_ttl_secs: u64,
    pub timeout_secs: u64,
    pub post_limit: usize,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub instagram: InstagramConfig,
    pub log_level: String,
    pub http_port: u16,
    pub environment: String,
    pub uploads_dir: PathBuf,
    pub migrations_dir: String,
    pub ticket_price: Decimal,
    pub token_ttl_days: i64,
}

/// Read an environment variable and parse it, falling back to `default`
/// when the variable is unset or unparsable.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse::<T>().ok())
        .unwrap_or(default)
}

impl DatabaseConfig {
    /// Create database config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL environment variable is required")?;

        let config = Self {
            url,
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", 10),
            acquire_timeout_secs: env_or("DATABASE_ACQUIRE_TIMEOUT_SECS", 30),
            idle_timeout_secs: env_or("DATABASE_IDLE_TIMEOUT_SECS", 600), // 10 minutes
            max_lifetime_secs: env_or("DATABASE_MAX_LIFETIME_SECS", 1800), // 30 minutes
            test_before_acquire: env_or("DATABASE_TEST_BEFORE_ACQUIRE", true),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pool cannot work with
    pub fn validate(&self) -> Result<(), String> {
        if self.max_connections == 0 {
            return Err("DATABASE_MAX_CONNECTIONS must be greater than 0".to_string());
        }

        if self.acquire_timeout_secs == 0 {
            return Err("DATABASE_ACQUIRE_TIMEOUT_SECS must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get acquire timeout as Duration
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Get idle timeout as Duration
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Get max lifetime as Duration
    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_secs)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/mydi".to_string(),
            max_connections: 10,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
            test_before_acquire: true,
        }
    }
}

impl InstagramConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();
        let config = Self {
            username: env::var("INSTAGRAM_USERNAME").unwrap_or(defaults.username),
            api_url: env::var("INSTAGRAM_API_URL").unwrap_or(defaults.api_url),
            cache_ttl_secs: env_or("INSTAGRAM_CACHE_TTL_SECS", defaults.cache_ttl_secs),
            timeout_secs: env_or("INSTAGRAM_TIMEOUT_SECS", defaults.timeout_secs),
            post_limit: env_or("INSTAGRAM_POST_LIMIT", defaults.post_limit),
        };

        if config.username.trim().is_empty() {
            return Err("INSTAGRAM_USERNAME must not be empty".to_string());
        }
        if config.timeout_secs == 0 {
            return Err("INSTAGRAM_TIMEOUT_SECS must be greater than 0".to_string());
        }

        Ok(config)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for InstagramConfig {
    fn default() -> Self {
        Self {
            username: "hypefamousclub".to_string(),
            api_url: "https://i.instagram.com/api/v1/users/web_profile_info/".to_string(),
            cache_ttl_secs: 300,
            timeout_secs: 8,
            post_limit: 10,
        }
    }
}

impl AppConfig {
    /// Create application config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let database = DatabaseConfig::from_env()?;
        let instagram = InstagramConfig::from_env()?;

        let log_level = env::var("LOG_LEVEL")
            .unwrap_or_else(|_| "info".to_string());

        let http_port = env_or("HTTP_PORT", 3333u16);

        let environment = env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string());

        let uploads_dir = env::var("UPLOADS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./public/uploads"));

        let migrations_dir = env::var("MIGRATIONS_DIR")
            .unwrap_or_else(|_| "./migrations".to_string());

        let ticket_price = match env::var("TICKET_PRICE") {
            Ok(raw) => Decimal::from_str(raw.trim())
                .map_err(|e| format!("Invalid TICKET_PRICE: {}: {}", raw, e))?,
            Err(_) => Decimal::new(15, 0),
        };
        if ticket_price.is_sign_negative() {
            return Err("TICKET_PRICE must not be negative".to_string());
        }

        let token_ttl_days = env_or("TOKEN_TTL_DAYS", 30i64);
        if token_ttl_days < 0 {
            return Err("TOKEN_TTL_DAYS must not be negative".to_string());
        }

        // Validate log level
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid LOG_LEVEL: {}. Must be one of: {:?}",
                log_level, valid_log_levels
            ));
        }

        // Validate environment
        let valid_environments = ["development", "staging", "production"];
        if !valid_environments.contains(&environment.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid ENVIRONMENT: {}. Must be one of: {:?}",
                environment, valid_environments
            ));
        }

        Ok(Self {
            database,
            instagram,
            log_level: log_level.to_lowercase(),
            http_port,
            environment: environment.to_lowercase(),
            uploads_dir,
            migrations_dir,
            ticket_price,
            token_ttl_days,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Lifetime of newly issued access tokens; `None` when tokens never expire
    pub fn token_ttl(&self) -> Option<chrono::Duration> {
        if self.token_ttl_days == 0 {
            None
        } else {
            Some(chrono::Duration::days(self.token_ttl_days))
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            instagram: InstagramConfig::default(),
            log_level: "info".to_string(),
            http_port: 3333,
            environment: "development".to_string(),
            uploads_dir: PathBuf::from("./public/uploads"),
            migrations_dir: "./migrations".to_string(),
            ticket_price: Decimal::new(15, 0),
            token_ttl_days: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.acquire_timeout_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_database_config_rejects_empty_pool() {
        let config = DatabaseConfig {
            max_connections: 0,
            ..DatabaseConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.http_port, 3333);
        assert_eq!(config.ticket_price, Decimal::new(15, 0));
        assert!(!config.is_production());
    }

    #[test]
    fn test_token_ttl_zero_disables_expiry() {
        let mut config = AppConfig::default();
        assert_eq!(config.token_ttl(), Some(chrono::Duration::days(30)));

        config.token_ttl_days = 0;
        assert_eq!(config.token_ttl(), None);
    }

    #[test]
    fn test_instagram_defaults() {
        let config = InstagramConfig::default();
        assert_eq!(config.username, "hypefamousclub");
        assert_eq!(config.timeout(), Duration::from_secs(8));
        assert_eq!(config.post_limit, 10);
    }
}
