use std::path::Path;

use serde::Deserialize;

use crate::error::{ReportError, ReportResult};

/// Report configuration, loaded from a YAML file.
///
/// No module-level state: the loaded struct is passed into each component
/// at construction.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the Firefly III instance, with or without trailing slash.
    pub firefly_url: String,
    /// Personal access token for the API.
    pub access_token: String,
    /// Report currency code, e.g. "EUR".
    pub currency: String,
    /// Display symbol placed directly against the digits.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    pub smtp: SmtpConfig,
    pub email: EmailConfig,
    /// Absent means no delivery-health ping is attempted.
    #[serde(default)]
    pub healthcheck_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    /// Upgrade the plaintext connection with STARTTLS before authenticating.
    #[serde(default)]
    pub starttls: bool,
    /// Present credentials to the server.
    #[serde(default)]
    pub authentication: bool,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub from: String,
    pub to: Vec<String>,
    #[serde(default = "default_subject")]
    pub subject: String,
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_subject() -> String {
    "Firefly III: Monthly report".to_string()
}

impl Config {
    pub fn load(path: &Path) -> ReportResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ReportError::Config(format!("could not read {}: {}", path.display(), e))
        })?;
        let config: Config = serde_yaml::from_str(&contents).map_err(|e| {
            ReportError::Config(format!("could not parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ReportResult<()> {
        if self.firefly_url.trim().is_empty() {
            return Err(ReportError::Config("firefly_url must not be empty".into()));
        }
        if self.access_token.trim().is_empty() {
            return Err(ReportError::Config("access_token must not be empty".into()));
        }
        if self.currency.trim().is_empty() {
            return Err(ReportError::Config("currency must not be empty".into()));
        }
        if self.email.to.is_empty() {
            return Err(ReportError::Config(
                "email.to must list at least one recipient".into(),
            ));
        }
        Ok(())
    }

    /// Base URL with any trailing slash removed.
    pub fn api_base(&self) -> &str {
        self.firefly_url.trim_end_matches('/')
    }
}
