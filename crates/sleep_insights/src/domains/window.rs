//! Collect one [`DailySleepSummary`] per date in a window ending today.
//!
//! Each date resolves to a [`DayOutcome`]; only `Collected` days make it into
//! the series. A missing or failed day never aborts the window.

use chrono::{Duration, NaiveDate};
use futures_util::StreamExt;
use futures_util::stream;
use garmin_client::{GarminClient, GarminError};
use tracing::{debug, warn};

use super::stages::summarize_night;
use crate::types::DailySleepSummary;

pub const DEFAULT_WINDOW_DAYS: u32 = 7;

#[derive(Debug)]
pub enum DayOutcome {
    Collected(DailySleepSummary),
    /// Provider has no record, or the record carries no `dailySleepDTO`.
    Missing,
    Failed(GarminError),
}

#[derive(Debug)]
pub enum SkipReason {
    Missing,
    Failed(GarminError),
}

#[derive(Debug, Default)]
pub struct WindowReport {
    /// Collected nights in no particular order.
    pub series: Vec<DailySleepSummary>,
    pub skipped: Vec<(NaiveDate, SkipReason)>,
}

/// `today`, `today - 1`, ..., `today - (days - 1)`.
pub fn window_dates(today: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..days as i64)
        .filter_map(|offset| today.checked_sub_signed(Duration::days(offset)))
        .collect()
}

pub async fn fetch_day(client: &dyn GarminClient, date: NaiveDate) -> DayOutcome {
    match client.get_sleep_data(date).await {
        Ok(Some(record)) => match record.daily_sleep {
            Some(sleep) => DayOutcome::Collected(summarize_night(date, &sleep)),
            None => DayOutcome::Missing,
        },
        Ok(None) => DayOutcome::Missing,
        Err(e) => DayOutcome::Failed(e),
    }
}

/// Fetch every date in the window, at most `concurrency` at a time
/// (`1` fetches sequentially).
pub async fn collect_window(
    client: &dyn GarminClient,
    today: NaiveDate,
    days: u32,
    concurrency: usize,
) -> WindowReport {
    let dates = window_dates(today, days);
    let outcomes: Vec<(NaiveDate, DayOutcome)> = stream::iter(dates)
        .map(|date| async move { (date, fetch_day(client, date).await) })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut report = WindowReport::default();
    for (date, outcome) in outcomes {
        match outcome {
            DayOutcome::Collected(summary) => report.series.push(summary),
            DayOutcome::Missing => {
                debug!(%date, "no sleep record for date");
                report.skipped.push((date, SkipReason::Missing));
            }
            DayOutcome::Failed(e) => {
                warn!(%date, error = %e, kind = e.kind(), "could not fetch sleep data; skipping day");
                report.skipped.push((date, SkipReason::Failed(e)));
            }
        }
    }
    report
}
