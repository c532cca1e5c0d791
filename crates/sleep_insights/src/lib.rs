//! Sleep analytics over Garmin Connect data.
//!
//! [`SleepInsightsService`] turns a window of nightly records into a
//! [`SleepAnalysis`](types::SleepAnalysis): per-night stage breakdowns,
//! window averages, consistency, sleep debt, a trend label and advisory
//! messages. Every failure mode before analysis ends in a fully shaped
//! fallback result instead of an error.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use garmin_client::config::Config;
use garmin_client::http_client::ReqwestGarminClient;
use garmin_client::middleware::InstrumentedClient;
use garmin_client::{GarminClient, GarminError};
use tracing::{debug, info, warn};

pub mod config;
pub mod domains;
pub mod error;
pub mod routes;
pub mod types;

#[cfg(test)]
mod test_utils;

use domains::fallback::{unavailable_analysis, unavailable_snapshot};
use domains::sleep_metrics::analyze;
use domains::snapshot::build_snapshot;
use domains::window::collect_window;
use domains::{DEFAULT_WINDOW_DAYS, Unavailability};
use types::{DailySnapshot, SleepAnalysis};

/// What the service has to work with once startup configuration is read.
#[derive(Clone)]
pub enum ClientState {
    Ready(Arc<dyn GarminClient>),
    /// Credentials are absent.
    NotConfigured,
    /// Credentials are present but the client could not be built.
    Unavailable(String),
}

impl ClientState {
    pub fn from_env() -> Self {
        Self::from_config(Config::from_env())
    }

    pub fn from_config(config: Result<Config, GarminError>) -> Self {
        let config = match config {
            Ok(c) => c,
            Err(e) => {
                info!(error = %e, "Garmin not configured; sleep analysis will return fallbacks");
                return ClientState::NotConfigured;
            }
        };
        match ReqwestGarminClient::from_config(&config) {
            Ok(client) => ClientState::Ready(Arc::new(InstrumentedClient::new(client))),
            Err(e) => {
                warn!(error = %e, "could not build Garmin client");
                ClientState::Unavailable(e.to_string())
            }
        }
    }

    fn unavailability(&self) -> Option<Unavailability> {
        match self {
            ClientState::Ready(_) => None,
            ClientState::NotConfigured => Some(Unavailability::NotConfigured),
            ClientState::Unavailable(_) => Some(Unavailability::ClientUnavailable),
        }
    }
}

pub const ANALYSES_TOTAL: &str = "sleep_analyses_total";

fn record_analysis(outcome: &'static str) {
    metrics::counter!(ANALYSES_TOTAL, "outcome" => outcome).increment(1);
}

#[derive(Clone)]
pub struct SleepInsightsService {
    client: ClientState,
    fetch_concurrency: usize,
}

impl SleepInsightsService {
    pub fn new(client: ClientState) -> Self {
        Self {
            client,
            fetch_concurrency: 1,
        }
    }

    pub fn from_client(client: Arc<dyn GarminClient>) -> Self {
        Self::new(ClientState::Ready(client))
    }

    /// Fetch up to this many days in parallel; values below 1 mean sequential.
    pub fn with_fetch_concurrency(mut self, concurrency: usize) -> Self {
        self.fetch_concurrency = concurrency.max(1);
        self
    }

    async fn connected_client(&self) -> Result<&Arc<dyn GarminClient>, Unavailability> {
        let ClientState::Ready(client) = &self.client else {
            return Err(self
                .client
                .unavailability()
                .unwrap_or(Unavailability::ClientUnavailable));
        };
        match client.login().await {
            Ok(profile) => {
                debug!(display_name = ?profile.display_name, "Garmin login ok");
                Ok(client)
            }
            Err(e) => {
                warn!(error = %e, kind = e.kind(), "Garmin login failed");
                Err(Unavailability::ConnectionFailed)
            }
        }
    }

    /// Analyse the `days` nights ending today (local time).
    pub async fn get_sleep_analysis(&self, days: u32) -> SleepAnalysis {
        self.get_sleep_analysis_on(Local::now().date_naive(), days)
            .await
    }

    pub async fn get_sleep_analysis_on(&self, today: NaiveDate, days: u32) -> SleepAnalysis {
        let client = match self.connected_client().await {
            Ok(c) => c,
            Err(why) => {
                record_analysis(why.label());
                return unavailable_analysis(why);
            }
        };
        let report = collect_window(&**client, today, days, self.fetch_concurrency).await;
        info!(
            %today,
            days,
            nights = report.series.len(),
            skipped = report.skipped.len(),
            "sleep window collected"
        );
        if report.series.is_empty() {
            record_analysis(Unavailability::NoData.label());
        } else {
            record_analysis("ok");
        }
        analyze(report.series)
    }

    pub async fn get_default_sleep_analysis(&self) -> SleepAnalysis {
        self.get_sleep_analysis(DEFAULT_WINDOW_DAYS).await
    }

    /// One-day fitness tile for `date`, today when `None`.
    pub async fn get_daily_snapshot(&self, date: Option<NaiveDate>) -> DailySnapshot {
        let date = date.unwrap_or_else(|| Local::now().date_naive());
        let client = match self.connected_client().await {
            Ok(c) => c,
            Err(why) => return unavailable_snapshot(why),
        };

        let (sleep, training, stats) = tokio::join!(
            client.get_sleep_data(date),
            client.get_training_status(date),
            client.get_daily_stats(date),
        );
        let sleep = match sleep {
            Ok(s) => s,
            Err(e) => {
                warn!(%date, error = %e, "could not fetch sleep data for snapshot");
                return unavailable_snapshot(Unavailability::ConnectionFailed);
            }
        };
        let training = training
            .inspect_err(|e| debug!(%date, error = %e, "no training status"))
            .ok();
        let stats = stats
            .inspect_err(|e| debug!(%date, error = %e, "no daily stats"))
            .ok();

        build_snapshot(date, sleep.as_ref(), training.as_ref(), stats.as_ref())
    }
}
