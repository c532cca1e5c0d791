//! Cross-cutting wrapper around any [`GarminClient`]: debug logging, request
//! counters and latency histograms, without touching the wrapped client.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;

use crate::observability::{outcome_label, record_request};
use crate::{
    DailyStats, GarminClient, GarminError, SleepDataResponse, TrainingStatusResponse, UserProfile,
};

#[derive(Clone)]
pub struct InstrumentedClient<C: GarminClient> {
    inner: Arc<C>,
}

impl<C: GarminClient> InstrumentedClient<C> {
    pub fn new(client: C) -> Self {
        Self {
            inner: Arc::new(client),
        }
    }

    async fn instrumented<F, Fut, T>(
        &self,
        operation: &'static str,
        date: Option<NaiveDate>,
        call: F,
    ) -> Result<T, GarminError>
    where
        F: FnOnce(Arc<C>) -> Fut,
        Fut: std::future::Future<Output = Result<T, GarminError>>,
    {
        let start = Instant::now();
        debug!(operation, ?date, "garmin call started");

        let result = call(self.inner.clone()).await;

        let elapsed = start.elapsed();
        let outcome = outcome_label(&result);
        record_request(operation, outcome, elapsed);
        match &result {
            Ok(_) => debug!(operation, ?date, ?elapsed, "garmin call completed"),
            Err(e) => debug!(operation, ?date, ?elapsed, error = %e, "garmin call failed"),
        }
        result
    }
}

#[async_trait]
impl<C: GarminClient> GarminClient for InstrumentedClient<C> {
    async fn login(&self) -> Result<UserProfile, GarminError> {
        self.instrumented("login", None, |c| async move { c.login().await })
            .await
    }

    async fn get_sleep_data(
        &self,
        date: NaiveDate,
    ) -> Result<Option<SleepDataResponse>, GarminError> {
        self.instrumented("get_sleep_data", Some(date), |c| async move {
            c.get_sleep_data(date).await
        })
        .await
    }

    async fn get_daily_stats(&self, date: NaiveDate) -> Result<DailyStats, GarminError> {
        self.instrumented("get_daily_stats", Some(date), |c| async move {
            c.get_daily_stats(date).await
        })
        .await
    }

    async fn get_training_status(
        &self,
        date: NaiveDate,
    ) -> Result<TrainingStatusResponse, GarminError> {
        self.instrumented("get_training_status", Some(date), |c| async move {
            c.get_training_status(date).await
        })
        .await
    }
}
