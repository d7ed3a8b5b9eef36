use axum::http::header::InvalidHeaderValue;
use config::{Config, ConfigError, Environment, Source};
use salesboard_core::{DateMatching, YearPolicy, DEFAULT_REFERENCE_YEAR};
use salesboard_import::DEFAULT_DATASET_URL;
use serde::Deserialize;

use crate::cors::OriginPolicy;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://roxilerdashboard.netlify.app/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Postgres,
    Memory,
}

/// Process settings, read once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub port: u16,
    pub database_url: Option<String>,
    pub store: StoreKind,
    pub dataset_url: String,
    /// Comma-separated list of exact `Origin` values.
    pub allowed_origins: String,
    pub allow_missing_origin: bool,
    pub reference_year: i32,
    pub month_matching: YearPolicy,
}

impl Settings {
    /// Load settings from the process environment (`PORT`, `DATABASE_URL`, ...).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(Environment::default().try_parsing(true))
    }

    pub fn load<S>(source: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        Config::builder()
            .set_default("port", DEFAULT_PORT as i64)?
            .set_default("store", "postgres")?
            .set_default("dataset_url", DEFAULT_DATASET_URL)?
            .set_default("allowed_origins", DEFAULT_ALLOWED_ORIGIN)?
            .set_default("allow_missing_origin", false)?
            .set_default("reference_year", DEFAULT_REFERENCE_YEAR as i64)?
            .set_default("month_matching", "projected")?
            .add_source(source)
            .build()?
            .try_deserialize()
    }

    pub fn date_matching(&self) -> DateMatching {
        DateMatching::new(self.reference_year, self.month_matching)
    }

    pub fn origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn origin_policy(&self) -> Result<OriginPolicy, InvalidHeaderValue> {
        OriginPolicy::new(self.origins(), self.allow_missing_origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    fn load(toml: &str) -> Settings {
        Settings::load(File::from_str(toml, FileFormat::Toml)).unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = load("");

        assert_eq!(settings.port, 3000);
        assert_eq!(settings.store, StoreKind::Postgres);
        assert!(settings.database_url.is_none());
        assert_eq!(settings.dataset_url, DEFAULT_DATASET_URL);
        assert_eq!(settings.origins(), vec![DEFAULT_ALLOWED_ORIGIN.to_string()]);
        assert!(!settings.allow_missing_origin);
        assert_eq!(settings.date_matching(), DateMatching::default());
    }

    #[test]
    fn test_overrides() {
        let settings = load(
            r#"
            port = 8080
            store = "memory"
            database_url = "postgres://localhost/sales"
            allowed_origins = "http://localhost:3000, https://dash.example.com"
            reference_year = 2021
            month_matching = "Absolute"
            "#,
        );

        assert_eq!(settings.port, 8080);
        assert_eq!(settings.store, StoreKind::Memory);
        assert_eq!(settings.database_url.as_deref(), Some("postgres://localhost/sales"));
        assert_eq!(
            settings.origins(),
            vec![
                "http://localhost:3000".to_string(),
                "https://dash.example.com".to_string()
            ]
        );
        assert_eq!(
            settings.date_matching(),
            DateMatching::new(2021, YearPolicy::Absolute)
        );
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let result = Settings::load(File::from_str(
            r#"month_matching = "lunar""#,
            FileFormat::Toml,
        ));
        assert!(result.is_err());
    }
}
