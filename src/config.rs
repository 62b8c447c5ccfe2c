use anyhow::Context;
use std::str::FromStr;

pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017/mini-plant-store";
pub const DEFAULT_MONGO_DB: &str = "mini-plant-store";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Selects the log format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Local,
    Production,
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" | "development" | "dev" => Ok(Environment::Local),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(anyhow::anyhow!("unknown environment '{other}'")),
        }
    }
}

/// Runtime configuration, read from the environment (and `.env` if present).
#[derive(Debug, Clone)]
pub struct Config {
    /// MongoDB connection string. A database named in the URI takes
    /// precedence over `mongo_db`.
    pub mongo_uri: String,
    pub mongo_db: String,
    /// Port the API listens on.
    pub port: u16,
    pub environment: Environment,
    /// Root URL the CLI client talks to.
    pub api_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mongo_uri: DEFAULT_MONGO_URI.to_string(),
            mongo_db: DEFAULT_MONGO_DB.to_string(),
            port: DEFAULT_PORT,
            environment: Environment::default(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Config::default();

        let port = match lookup("PORT") {
            Some(port) => port
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got '{port}'"))?,
            None => defaults.port,
        };
        let environment = match lookup("ENVIRONMENT") {
            Some(env) => env.parse().context("ENVIRONMENT must be local or production")?,
            None => defaults.environment,
        };

        Ok(Config {
            mongo_uri: lookup("MONGO_URI").unwrap_or(defaults.mongo_uri),
            mongo_db: lookup("MONGO_DB").unwrap_or(defaults.mongo_db),
            port,
            environment,
            api_url: lookup("PLANT_API_URL").unwrap_or(defaults.api_url),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn falls_back_to_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.mongo_uri, DEFAULT_MONGO_URI);
        assert_eq!(config.port, 5000);
        assert_eq!(config.environment, Environment::Local);
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("MONGO_URI", "mongodb://db:27017"),
            ("PORT", "8080"),
            ("ENVIRONMENT", "Production"),
            ("PLANT_API_URL", "http://catalog:8080"),
        ])
        .unwrap();
        assert_eq!(config.mongo_uri, "mongodb://db:27017");
        assert_eq!(config.mongo_db, DEFAULT_MONGO_DB);
        assert_eq!(config.port, 8080);
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.api_url, "http://catalog:8080");
    }

    #[test]
    fn rejects_bad_port() {
        assert!(config(&[("PORT", "eighty")]).is_err());
    }
}
