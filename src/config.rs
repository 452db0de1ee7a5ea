use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use log::info;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::error::CacheResult;

/// Deployment environment, selecting the default store and pool bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// SQLite file under `data/`.
    Development,
    /// PostgreSQL.
    Production,
    /// In-memory SQLite.
    Test,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            other => Err(format!("unknown environment: {other}")),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub min_connections: u32,
    pub max_connections: u32,
}

pub const DEVELOPMENT_URL: &str = "sqlite://data/reins-cache.db?mode=rwc";
pub const TEST_URL: &str = "sqlite::memory:";

impl DatabaseConfig {
    /// Resolves the configuration from the process environment.
    pub fn from_env(environment: Environment) -> DatabaseConfig {
        Self::resolve(environment, |name| std::env::var(name).ok())
    }

    /// Resolves the configuration with `lookup` standing in for the process
    /// environment.
    pub fn resolve(environment: Environment, lookup: impl Fn(&str) -> Option<String>) -> DatabaseConfig {
        match environment {
            Environment::Development => DatabaseConfig {
                url: lookup("DATABASE_URL").unwrap_or_else(|| DEVELOPMENT_URL.to_string()),
                min_connections: 1,
                max_connections: 1,
            },
            Environment::Test => DatabaseConfig {
                url: TEST_URL.to_string(),
                min_connections: 1,
                max_connections: 1,
            },
            Environment::Production => {
                let url = lookup("DATABASE_URL").unwrap_or_else(|| {
                    let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());
                    format!(
                        "postgres://{}:{}@{}:{}/{}",
                        var("DB_USER", "fango"),
                        var("DB_PASSWORD", "fango"),
                        var("DB_HOST", "localhost"),
                        var("DB_PORT", "5432"),
                        var("DB_NAME", "fango"),
                    )
                });
                DatabaseConfig {
                    url,
                    min_connections: 2,
                    max_connections: 10,
                }
            }
        }
    }

    /// Replaces the URL, keeping the pool bounds.
    pub fn with_url(mut self, url: impl Into<String>) -> DatabaseConfig {
        self.url = url.into();
        self
    }

    pub fn connect_options(&self) -> ConnectOptions {
        let mut options = ConnectOptions::new(self.url.clone());
        options
            .min_connections(self.min_connections)
            .max_connections(self.max_connections)
            .connect_timeout(Duration::from_secs(10))
            .sqlx_logging(false);
        options
    }

    pub async fn connect(&self) -> CacheResult<DatabaseConnection> {
        info!(
            "connecting to cache database (pool {}..{})",
            self.min_connections, self.max_connections
        );
        Ok(Database::connect(self.connect_options()).await?)
    }
}
