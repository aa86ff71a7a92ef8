use secrecy::{ExposeSecret, SecretString};
use std::env;
use std::fmt;

const DEV_SECRET_KEY: &str = "catalog-session-dev-secret";
const DEV_CSRF_SECRET_KEY: &str = "catalog-csrf-dev-secret";

/// One year
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 366;

#[derive(Debug)]
pub enum ConfigError {
    /// A secret that has no safe default outside debug builds
    MissingSecret(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingSecret(key) => {
                write!(f, "{} environment variable must be set in production", key)
            }
            ConfigError::Invalid { key, value } => {
                write!(f, "Invalid value for {}: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// The single account allowed into the mutation tier
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::new(password.into()),
        }
    }

    pub fn matches(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password.expose_secret().as_str()
    }
}

pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub credentials: Credentials,
    /// Signs the session cookie
    pub secret_key: SecretString,
    /// Keys the anti-forgery form tokens
    pub csrf_secret_key: SecretString,
    pub session_ttl_hours: i64,
    /// Log every SQL statement
    pub sql_echo: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup, `from_env` uses the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value,
            })?,
            None => 5000,
        };

        let session_ttl_hours = match lookup("SESSION_TTL_HOURS") {
            Some(value) => match value.parse::<i64>() {
                Ok(hours) if (1..=MAX_SESSION_TTL_HOURS).contains(&hours) => hours,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "SESSION_TTL_HOURS",
                        value,
                    });
                }
            },
            None => 24,
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://library.db?mode=rwc".to_string()),
            port,
            credentials: Credentials::new(
                lookup("CATALOG_USERNAME").unwrap_or_else(|| "user".to_string()),
                lookup("CATALOG_PASSWORD").unwrap_or_else(|| "pass".to_string()),
            ),
            secret_key: secret(&lookup, "SECRET_KEY", DEV_SECRET_KEY)?,
            csrf_secret_key: secret(&lookup, "CSRF_SECRET_KEY", DEV_CSRF_SECRET_KEY)?,
            session_ttl_hours,
            sql_echo: lookup("SQL_ECHO")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }
}

fn secret<F>(lookup: &F, key: &'static str, dev_default: &str) -> Result<SecretString, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.is_empty() => Ok(SecretString::new(value)),
        _ if cfg!(debug_assertions) => {
            tracing::warn!("{} not set, using development default", key);
            Ok(SecretString::new(dev_default.to_string()))
        }
        _ => Err(ConfigError::MissingSecret(key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn explicit_values_win() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("PORT", "8080"),
            ("CATALOG_USERNAME", "admin"),
            ("CATALOG_PASSWORD", "hunter2"),
            ("SECRET_KEY", "s1"),
            ("CSRF_SECRET_KEY", "s2"),
            ("SESSION_TTL_HOURS", "2"),
            ("SQL_ECHO", "true"),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.port, 8080);
        assert!(config.credentials.matches("admin", "hunter2"));
        assert!(!config.credentials.matches("admin", "pass"));
        assert_eq!(config.secret_key.expose_secret(), "s1");
        assert_eq!(config.csrf_secret_key.expose_secret(), "s2");
        assert_eq!(config.session_ttl_hours, 2);
        assert!(config.sql_echo);
    }

    #[test]
    #[cfg(debug_assertions)]
    fn defaults_apply_in_debug_builds() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.database_url, "sqlite://library.db?mode=rwc");
        assert!(config.credentials.matches("user", "pass"));
        assert_eq!(config.session_ttl_hours, 24);
        assert!(!config.sql_echo);
    }

    #[test]
    fn rejects_bad_numbers() {
        let secrets = [("SECRET_KEY", "s1"), ("CSRF_SECRET_KEY", "s2")];
        assert!(matches!(
            Config::from_lookup(lookup_from(&[secrets[0], secrets[1], ("PORT", "http")])),
            Err(ConfigError::Invalid { key: "PORT", .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup_from(&[
                secrets[0],
                secrets[1],
                ("SESSION_TTL_HOURS", "0")
            ])),
            Err(ConfigError::Invalid {
                key: "SESSION_TTL_HOURS",
                ..
            })
        ));
    }

    #[test]
    fn session_ttl_is_bounded() {
        let with_ttl = |ttl: &'static str| {
            Config::from_lookup(lookup_from(&[
                ("SECRET_KEY", "s1"),
                ("CSRF_SECRET_KEY", "s2"),
                ("SESSION_TTL_HOURS", ttl),
            ]))
        };

        assert!(matches!(
            with_ttl("9999999999999"),
            Err(ConfigError::Invalid {
                key: "SESSION_TTL_HOURS",
                ..
            })
        ));
        assert!(matches!(
            with_ttl("8785"),
            Err(ConfigError::Invalid { .. })
        ));
        assert_eq!(
            with_ttl("8784").unwrap().session_ttl_hours,
            MAX_SESSION_TTL_HOURS
        );
    }
}
