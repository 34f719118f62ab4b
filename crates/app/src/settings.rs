//! Settings of the `household` binary.
//!
//! Read from an optional `household.toml` next to the working directory and
//! overridden by `HOUSEHOLD__*` environment variables, e.g.
//! `HOUSEHOLD__APP__LEVEL=debug` or `HOUSEHOLD__DATABASE=memory`.
//!
//! ```toml
//! [app]
//! level = "info"
//!
//! [database]
//! sqlite = "./household.db"
//! ```
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Self::Sqlite("./household.db".to_string())
    }
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub database: Database,
}

impl Settings {
    pub fn new(file: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(file).required(false))
            .add_source(Environment::with_prefix("HOUSEHOLD").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = Settings::new("does-not-exist/household").unwrap();

        assert_eq!(settings.app.level, "info");
        assert_eq!(
            settings.database,
            Database::Sqlite("./household.db".to_string())
        );
    }

    #[test]
    fn database_urls() {
        assert_eq!(Database::Memory.url(), "sqlite::memory:");
        assert_eq!(
            Database::Sqlite("/tmp/h.db".to_string()).url(),
            "sqlite:/tmp/h.db?mode=rwc"
        );
    }
}
