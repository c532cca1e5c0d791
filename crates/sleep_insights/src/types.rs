use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One night, reduced from the provider's raw record. Values are unrounded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DailySleepSummary {
    pub date: NaiveDate,
    pub hours: f64,
    /// Overall sleep score; `0` means the provider reported none.
    pub score: f64,
    pub deep_minutes: f64,
    pub light_minutes: f64,
    pub rem_minutes: f64,
    pub awake_minutes: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SleepAverages {
    pub hours: f64,
    pub score: f64,
    pub deep_minutes: f64,
    pub light_minutes: f64,
    pub rem_minutes: f64,
    pub awake_minutes: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SleepDebt {
    pub total_hours: f64,
    pub avg_daily: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SleepTrend {
    Improving,
    Declining,
    Stable,
    InsufficientData,
    Unavailable,
}

/// Result of a sleep analysis request. Always fully populated, including when
/// the provider could not be reached.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SleepAnalysis {
    /// Nights in the window, most recent first.
    pub weekly_data: Vec<DailySleepSummary>,
    pub averages: SleepAverages,
    pub consistency_score: f64,
    pub sleep_debt: SleepDebt,
    pub trend: SleepTrend,
    pub optimal_bedtime: String,
    pub recommendations: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BodyBattery {
    pub current: Option<f64>,
    pub highest: Option<f64>,
    pub lowest: Option<f64>,
}

/// One-day fitness tile: last night's sleep, training status and activity totals.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DailySnapshot {
    pub date: Option<NaiveDate>,
    pub sleep_score: Option<f64>,
    pub sleep_hours: f64,
    pub training_load: Option<f64>,
    pub training_status: Option<String>,
    pub steps: Option<f64>,
    pub calories: Option<f64>,
    pub resting_heart_rate: Option<f64>,
    pub body_battery: BodyBattery,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup_required: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup_message: Option<String>,
}
