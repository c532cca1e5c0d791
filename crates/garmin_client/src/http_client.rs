//! HTTP client implementation for the Garmin Connect API.
//!
//! This module provides a reqwest-based implementation of the [`GarminClient`](crate::GarminClient) trait.

use crate::config::Config;
use crate::retry::RetryPolicy;
use crate::{
    DailyStats, GarminClient, GarminError, SleepDataResponse, TrainingStatusResponse, UserProfile,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tokio::sync::RwLock;

/// Client for the Garmin Connect API using reqwest.
#[derive(Debug)]
pub struct ReqwestGarminClient {
    base_url: String,
    email: String,
    password: SecretString,
    client: reqwest::Client,
    retry: RetryPolicy,
    display_name: RwLock<Option<String>>,
}

impl ReqwestGarminClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the Garmin Connect API (e.g., "https://connect.garmin.com")
    /// * `email` - Account email used for authentication
    /// * `password` - Account password used for authentication
    /// * `timeout` - Per-request timeout
    ///
    /// Fails with [`GarminError::Unavailable`] when the HTTP stack cannot be
    /// initialised (for example, no TLS backend).
    pub fn new(
        base_url: &str,
        email: impl Into<String>,
        password: SecretString,
        timeout: Duration,
    ) -> Result<Self, GarminError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GarminError::Unavailable(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            email: email.into(),
            password,
            client,
            retry: RetryPolicy::default(),
            display_name: RwLock::new(None),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, GarminError> {
        Self::new(
            &config.base_url,
            config.email.clone(),
            config.password.clone(),
            config.timeout,
        )
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Build an authenticated GET request.
    fn get_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .basic_auth(&self.email, Some(self.password.expose_secret()))
    }

    /// Execute a request and expect a JSON response.
    async fn execute_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, GarminError> {
        let resp = request.send().await?;
        self.handle_response(resp).await
    }

    /// Handle a response, converting status codes to appropriate errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, GarminError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(self.error_from_response(resp).await);
        }
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| GarminError::Decode(e.to_string()))
    }

    /// Extract error information from a failed response.
    async fn error_from_response(&self, resp: reqwest::Response) -> GarminError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();

        match status {
            404 => GarminError::NotFound(body_snippet),
            401 | 403 => GarminError::Auth(body_snippet),
            _ => GarminError::from_status(status, body_snippet),
        }
    }

    /// Display name resolved by [`GarminClient::login`]; logs in lazily when
    /// a per-user endpoint is hit first.
    async fn display_name(&self) -> Result<String, GarminError> {
        if let Some(name) = self.display_name.read().await.as_ref() {
            return Ok(name.clone());
        }
        let profile = self.login().await?;
        profile
            .display_name
            .ok_or_else(|| GarminError::Decode("profile has no displayName".into()))
    }

    fn format_date(date: NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }
}

#[async_trait]
impl GarminClient for ReqwestGarminClient {
    async fn login(&self) -> Result<UserProfile, GarminError> {
        let url = format!("{}/userprofile-service/socialProfile", self.base_url);
        let profile: UserProfile = self
            .retry
            .retry_async("login", || self.execute_json(self.get_request(&url)))
            .await?;

        let name = profile
            .display_name
            .clone()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| GarminError::Decode("profile has no displayName".into()))?;
        *self.display_name.write().await = Some(name);
        Ok(profile)
    }

    async fn get_sleep_data(
        &self,
        date: NaiveDate,
    ) -> Result<Option<SleepDataResponse>, GarminError> {
        let display_name = self.display_name().await?;
        let url = format!(
            "{}/wellness-service/wellness/dailySleepData/{}",
            self.base_url, display_name
        );
        let req = self
            .get_request(&url)
            .query(&[("date", Self::format_date(date))]);

        match self.execute_json::<Option<SleepDataResponse>>(req).await {
            Ok(record) => Ok(record),
            Err(GarminError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn get_daily_stats(&self, date: NaiveDate) -> Result<DailyStats, GarminError> {
        let display_name = self.display_name().await?;
        let url = format!(
            "{}/usersummary-service/usersummary/daily/{}",
            self.base_url, display_name
        );
        let req = self
            .get_request(&url)
            .query(&[("calendarDate", Self::format_date(date))]);
        self.execute_json(req).await
    }

    async fn get_training_status(
        &self,
        date: NaiveDate,
    ) -> Result<TrainingStatusResponse, GarminError> {
        let url = format!(
            "{}/metrics-service/metrics/trainingstatus/aggregated/{}",
            self.base_url,
            Self::format_date(date)
        );
        self.execute_json(self.get_request(&url)).await
    }
}
