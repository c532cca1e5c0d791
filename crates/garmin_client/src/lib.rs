//! Minimal `GarminClient` trait, the raw Garmin Connect payload types, and a
//! reqwest-based implementation.
//!
//! Every payload type in this module is deserialized leniently: a field that is
//! missing, `null`, or of an unexpected JSON type becomes `None` (or an empty
//! list) instead of failing the whole record. Callers resolve `None` to their
//! own documented defaults.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use std::collections::BTreeMap;
use thiserror::Error;

pub mod config;
pub mod http_client;
pub mod middleware;
pub mod observability;
pub mod retry;

#[derive(Debug, Error)]
pub enum GarminError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("client unavailable: {0}")]
    Unavailable(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("decode error: {0}")]
    Decode(String),
}

impl GarminError {
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        GarminError::Status {
            status,
            body: body.into(),
        }
    }

    /// Whether repeating the same request could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            GarminError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            GarminError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Short machine-friendly label used for log fields and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            GarminError::Http(_) => "http",
            GarminError::Config(_) => "config",
            GarminError::Unavailable(_) => "unavailable",
            GarminError::Auth(_) => "auth",
            GarminError::NotFound(_) => "not_found",
            GarminError::Status { .. } => "status",
            GarminError::Decode(_) => "decode",
        }
    }
}

/// Profile returned by the social-profile endpoint; only the display name is
/// needed to address the per-user wellness endpoints.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, deserialize_with = "lenient_string")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub full_name: Option<String>,
}

/// One night's sleep payload as returned by `dailySleepData`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct SleepDataResponse {
    #[serde(
        rename = "dailySleepDTO",
        default,
        deserialize_with = "lenient_struct"
    )]
    pub daily_sleep: Option<DailySleep>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailySleep {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub sleep_time_seconds: Option<f64>,
    #[serde(default, deserialize_with = "lenient_struct")]
    pub sleep_scores: Option<SleepScores>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub sleep_levels: Vec<SleepLevel>,
}

impl DailySleep {
    /// `sleepScores.overall.value`, if every level of the path is present.
    pub fn overall_score(&self) -> Option<f64> {
        self.sleep_scores
            .as_ref()
            .and_then(|s| s.overall.as_ref())
            .and_then(|o| o.value)
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct SleepScores {
    #[serde(default, deserialize_with = "lenient_struct")]
    pub overall: Option<ScoreValue>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ScoreValue {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub value: Option<f64>,
}

/// A single stage segment. The label is whatever the provider sends; numeric
/// levels are kept as their decimal text.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SleepLevel {
    #[serde(default, deserialize_with = "lenient_string")]
    pub activity_level: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub seconds: Option<f64>,
}

/// Daily activity summary (`usersummary/daily`).
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_steps: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_kilocalories: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub resting_heart_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub body_battery_most_recent_value: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub body_battery_highest_value: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub body_battery_lowest_value: Option<f64>,
}

/// Aggregated training status, keyed by device id.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrainingStatusResponse {
    #[serde(default, deserialize_with = "lenient_struct")]
    pub most_recent_training_status: Option<MostRecentTrainingStatus>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MostRecentTrainingStatus {
    #[serde(default, deserialize_with = "lenient_map")]
    pub latest_training_status_data: BTreeMap<String, DeviceTrainingStatus>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeviceTrainingStatus {
    #[serde(default, deserialize_with = "lenient_string")]
    pub training_status_feedback_phrase: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub training_status: Option<String>,
    #[serde(rename = "acuteTrainingLoadDTO", default, deserialize_with = "lenient_struct")]
    pub acute_training_load: Option<AcuteTrainingLoad>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AcuteTrainingLoad {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub daily_training_load_acute: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub daily_training_load_chronic: Option<f64>,
}

impl TrainingStatusResponse {
    /// Status of the first reporting device, ordered by device id.
    pub fn first_device(&self) -> Option<&DeviceTrainingStatus> {
        self.most_recent_training_status
            .as_ref()
            .and_then(|s| s.latest_training_status_data.values().next())
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_struct<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(value
        .filter(|v| v.is_object())
        .and_then(|v| serde_json::from_value(v).ok()))
}

fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    let Some(serde_json::Value::Array(items)) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter(|v| v.is_object())
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect())
}

fn lenient_map<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    let Some(serde_json::Value::Object(entries)) = value else {
        return Ok(BTreeMap::new());
    };
    Ok(entries
        .into_iter()
        .filter(|(_, v)| v.is_object())
        .filter_map(|(k, v)| serde_json::from_value(v).ok().map(|t| (k, t)))
        .collect())
}

#[async_trait]
pub trait GarminClient: Send + Sync + 'static {
    /// Establish the session and resolve the user's display name.
    ///
    /// Called once per request before any per-day fetch; a failure here means
    /// no day in the window can be fetched.
    async fn login(&self) -> Result<UserProfile, GarminError>;

    /// Sleep record for one calendar date. `Ok(None)` means the provider has
    /// no record for that date.
    async fn get_sleep_data(
        &self,
        date: NaiveDate,
    ) -> Result<Option<SleepDataResponse>, GarminError>;

    /// Steps, calories, resting heart rate and body battery for one date.
    async fn get_daily_stats(&self, date: NaiveDate) -> Result<DailyStats, GarminError>;

    /// Aggregated training status as of the given date.
    async fn get_training_status(
        &self,
        date: NaiveDate,
    ) -> Result<TrainingStatusResponse, GarminError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sleep_payload_parses_nested_score_and_levels() {
        let payload = json!({
            "dailySleepDTO": {
                "calendarDate": "2026-10-15",
                "sleepTimeSeconds": 27000,
                "sleepScores": {"overall": {"value": 82}},
                "sleepLevels": [
                    {"activityLevel": "deep", "seconds": 3600},
                    {"activityLevel": 2.0, "seconds": "1200"}
                ]
            }
        });
        let record: SleepDataResponse = serde_json::from_value(payload).expect("deserialize");
        let daily = record.daily_sleep.expect("dailySleepDTO");
        assert_eq!(daily.sleep_time_seconds, Some(27000.0));
        assert_eq!(daily.overall_score(), Some(82.0));
        assert_eq!(daily.sleep_levels.len(), 2);
        assert_eq!(daily.sleep_levels[1].activity_level.as_deref(), Some("2.0"));
        assert_eq!(daily.sleep_levels[1].seconds, Some(1200.0));
    }

    #[test]
    fn wrong_types_degrade_to_none() {
        let payload = json!({
            "dailySleepDTO": {
                "sleepTimeSeconds": {"unexpected": true},
                "sleepScores": "n/a",
                "sleepLevels": {"not": "a list"}
            }
        });
        let record: SleepDataResponse = serde_json::from_value(payload).expect("deserialize");
        let daily = record.daily_sleep.expect("dailySleepDTO");
        assert_eq!(daily.sleep_time_seconds, None);
        assert_eq!(daily.overall_score(), None);
        assert!(daily.sleep_levels.is_empty());
    }

    #[test]
    fn missing_overall_score_level_is_none() {
        let payload = json!({"dailySleepDTO": {"sleepScores": {"overall": {}}}});
        let record: SleepDataResponse = serde_json::from_value(payload).expect("deserialize");
        assert_eq!(record.daily_sleep.expect("dto").overall_score(), None);
    }

    #[test]
    fn null_daily_sleep_is_absent() {
        let record: SleepDataResponse =
            serde_json::from_value(json!({"dailySleepDTO": null})).expect("deserialize");
        assert!(record.daily_sleep.is_none());
    }

    #[test]
    fn training_status_first_device() {
        let payload = json!({
            "mostRecentTrainingStatus": {
                "latestTrainingStatusData": {
                    "3345": {
                        "trainingStatus": "PRODUCTIVE",
                        "acuteTrainingLoadDTO": {"dailyTrainingLoadChronic": 410}
                    }
                }
            }
        });
        let status: TrainingStatusResponse =
            serde_json::from_value(payload).expect("deserialize");
        let device = status.first_device().expect("device");
        assert_eq!(device.training_status.as_deref(), Some("PRODUCTIVE"));
        let load = device.acute_training_load.as_ref().expect("load");
        assert_eq!(load.daily_training_load_acute, None);
        assert_eq!(load.daily_training_load_chronic, Some(410.0));
    }

    #[test]
    fn retryable_statuses() {
        assert!(GarminError::from_status(503, "down").is_retryable());
        assert!(GarminError::from_status(429, "slow down").is_retryable());
        assert!(!GarminError::from_status(400, "bad").is_retryable());
        assert!(!GarminError::Auth("nope".into()).is_retryable());
    }
}
