//! Threshold tiers mapping window metrics to advisory messages.

use super::sleep_metrics::round_to;

/// Unrounded window metrics the tiers are evaluated against.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RecommendationInputs {
    pub avg_hours: f64,
    pub avg_score: f64,
    pub consistency: f64,
    pub avg_deep_minutes: f64,
    pub avg_rem_minutes: f64,
    pub avg_debt: f64,
}

pub const SHORT_SLEEP: &str =
    "⚠️ You're averaging less than 7 hours. Aim for 7-9 hours for optimal recovery.";
pub const LONG_SLEEP: &str =
    "💤 Sleeping over 9 hours might indicate poor sleep quality. Check for disruptions.";
pub const OPTIMAL_DURATION: &str =
    "✅ Great sleep duration! You're in the optimal 7-9 hour range.";
pub const LOW_QUALITY: &str =
    "📉 Low sleep quality detected. Consider reducing caffeine and screen time before bed.";
pub const EXCELLENT_QUALITY: &str = "🌟 Excellent sleep quality! Keep up your sleep routine.";
pub const IRREGULAR_SCHEDULE: &str =
    "🔄 Inconsistent sleep schedule. Try going to bed at the same time each night.";
pub const REGULAR_SCHEDULE: &str =
    "✅ Good sleep consistency! Regular schedule helps optimize recovery.";
pub const LOW_DEEP: &str =
    "🔍 Low deep sleep. Avoid alcohol and exercise 3+ hours before bedtime.";
pub const HIGH_DEEP: &str = "💪 Excellent deep sleep! Your body is recovering optimally.";
pub const LOW_REM: &str =
    "🧠 Low REM sleep. Manage stress and maintain consistent sleep times.";
pub const HIGH_REM: &str = "🎯 Great REM sleep! Your mind is processing and learning well.";

/// Expects `avg_debt` already rounded to one decimal, so the text matches the
/// `sleep_debt.avg_daily` field.
pub fn sleep_debt_message(avg_debt: f64) -> String {
    format!(
        "⏰ You have {:.1} hours of daily sleep debt. Consider a weekend catch-up sleep session.",
        avg_debt
    )
}

pub fn generate_recommendations(inputs: &RecommendationInputs) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();

    if inputs.avg_hours < 7.0 {
        out.push(SHORT_SLEEP.into());
    } else if inputs.avg_hours > 9.0 {
        out.push(LONG_SLEEP.into());
    } else {
        out.push(OPTIMAL_DURATION.into());
    }

    // 70..80 is a neutral band.
    if inputs.avg_score < 70.0 {
        out.push(LOW_QUALITY.into());
    } else if inputs.avg_score >= 80.0 {
        out.push(EXCELLENT_QUALITY.into());
    }

    if inputs.consistency < 70.0 {
        out.push(IRREGULAR_SCHEDULE.into());
    } else {
        out.push(REGULAR_SCHEDULE.into());
    }

    if inputs.avg_deep_minutes < 60.0 {
        out.push(LOW_DEEP.into());
    } else if inputs.avg_deep_minutes > 120.0 {
        out.push(HIGH_DEEP.into());
    }

    if inputs.avg_rem_minutes < 60.0 {
        out.push(LOW_REM.into());
    } else if inputs.avg_rem_minutes > 120.0 {
        out.push(HIGH_REM.into());
    }

    if inputs.avg_debt > 1.0 {
        out.push(sleep_debt_message(round_to(inputs.avg_debt, 1)));
    }

    out
}
