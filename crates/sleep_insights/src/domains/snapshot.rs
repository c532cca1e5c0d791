//! One-day fitness tile built from sleep, training status and daily stats.

use chrono::NaiveDate;
use garmin_client::{DailyStats, SleepDataResponse, TrainingStatusResponse};

use crate::types::{BodyBattery, DailySnapshot};

/// Training load and status of the first reporting device. Load prefers the
/// acute value and falls back to chronic; status prefers the feedback phrase.
pub fn training_summary(status: &TrainingStatusResponse) -> (Option<f64>, Option<String>) {
    let Some(device) = status.first_device() else {
        return (None, None);
    };
    let load = device.acute_training_load.as_ref().and_then(|l| {
        l.daily_training_load_acute
            .or(l.daily_training_load_chronic)
    });
    let phrase = device
        .training_status_feedback_phrase
        .clone()
        .or_else(|| device.training_status.clone());
    (load, phrase)
}

pub fn build_snapshot(
    date: NaiveDate,
    sleep: Option<&SleepDataResponse>,
    training: Option<&TrainingStatusResponse>,
    stats: Option<&DailyStats>,
) -> DailySnapshot {
    let daily_sleep = sleep.and_then(|s| s.daily_sleep.as_ref());
    let sleep_score = daily_sleep.and_then(|d| d.overall_score());
    let sleep_hours = daily_sleep
        .and_then(|d| d.sleep_time_seconds)
        .unwrap_or(0.0)
        .max(0.0)
        / 3600.0;

    let (training_load, training_status) = training.map(training_summary).unwrap_or_default();

    let stats = stats.cloned().unwrap_or_default();

    DailySnapshot {
        date: Some(date),
        sleep_score,
        sleep_hours,
        training_load,
        training_status,
        steps: stats.total_steps,
        calories: stats.total_kilocalories,
        resting_heart_rate: stats.resting_heart_rate,
        body_battery: BodyBattery {
            current: stats.body_battery_most_recent_value,
            highest: stats.body_battery_highest_value,
            lowest: stats.body_battery_lowest_value,
        },
        setup_required: None,
        setup_message: None,
    }
}
