use crate::GarminError;
use secrecy::SecretString;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://connect.garmin.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct Config {
    pub email: String,
    pub password: SecretString,
    pub base_url: String,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, GarminError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function. Blank values count as missing.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, GarminError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut get_non_empty = |k: &str| get(k).filter(|v| !v.trim().is_empty());

        let email = get_non_empty("GARMIN_EMAIL")
            .ok_or_else(|| GarminError::Config("GARMIN_EMAIL missing".into()))?;
        let password = get_non_empty("GARMIN_PASSWORD")
            .ok_or_else(|| GarminError::Config("GARMIN_PASSWORD missing".into()))?;
        let base_url = get_non_empty("GARMIN_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let timeout_secs = match get_non_empty("GARMIN_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                GarminError::Config(format!("GARMIN_TIMEOUT_SECS is not a number: {raw}"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            email,
            password: SecretString::new(password.into()),
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Non-fatal configuration gaps worth a startup warning. Reads the same
    /// variables as [`Config::from_env_with`] without failing on any of them.
    pub fn warnings_with<F>(mut get: F) -> Vec<String>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut warnings = Vec::new();
        let email = get("GARMIN_EMAIL").filter(|v| !v.trim().is_empty());
        let password = get("GARMIN_PASSWORD").filter(|v| !v.trim().is_empty());
        if email.is_none() || password.is_none() {
            warnings.push(
                "Garmin credentials not set - sleep and fitness data will be unavailable".into(),
            );
        }
        if let Some(raw) = get("GARMIN_TIMEOUT_SECS")
            && raw.trim().parse::<u64>().is_err()
        {
            warnings.push(format!("GARMIN_TIMEOUT_SECS is not a number: {raw}"));
        }
        warnings
    }

    pub fn warnings() -> Vec<String> {
        Self::warnings_with(|k| std::env::var(k).ok())
    }
}
