//! Window statistics over a sleep series: averages, consistency, sleep debt
//! and trend, assembled into a [`SleepAnalysis`].
//!
//! All arithmetic runs on unrounded values. Rounding happens once, when the
//! presentation struct is built.

use crate::domains::fallback::{Unavailability, unavailable_analysis};
use crate::domains::recommendations::{RecommendationInputs, generate_recommendations};
use crate::types::{DailySleepSummary, SleepAnalysis, SleepAverages, SleepDebt, SleepTrend};

pub const RECOMMENDED_HOURS: f64 = 8.0;
pub const CONSISTENCY_PENALTY_PER_HOUR: f64 = 30.0;
pub const TREND_MIN_NIGHTS: usize = 6;
pub const TREND_THRESHOLD_HOURS: f64 = 0.5;
pub const OPTIMAL_BEDTIME: &str = "22:30 - 23:00";

/// Unrounded metrics for a non-empty series.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowMetrics {
    pub avg_hours: f64,
    pub avg_score: f64,
    pub avg_deep_minutes: f64,
    pub avg_light_minutes: f64,
    pub avg_rem_minutes: f64,
    pub avg_awake_minutes: f64,
    pub consistency: f64,
    pub total_debt: f64,
    pub avg_debt: f64,
    pub trend: SleepTrend,
}

impl WindowMetrics {
    pub fn recommendation_inputs(&self) -> RecommendationInputs {
        RecommendationInputs {
            avg_hours: self.avg_hours,
            avg_score: self.avg_score,
            consistency: self.consistency,
            avg_deep_minutes: self.avg_deep_minutes,
            avg_rem_minutes: self.avg_rem_minutes,
            avg_debt: self.avg_debt,
        }
    }
}

/// Most recent night first.
pub fn sort_most_recent_first(series: &mut [DailySleepSummary]) {
    series.sort_by(|a, b| b.date.cmp(&a.date));
}

fn mean_of(series: &[DailySleepSummary], field: impl Fn(&DailySleepSummary) -> f64) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    series.iter().map(field).sum::<f64>() / series.len() as f64
}

/// Mean over nights that carry a score; a score of 0 counts as "not measured".
pub fn average_score(series: &[DailySleepSummary]) -> f64 {
    let (total, count) = series
        .iter()
        .filter(|d| d.score > 0.0)
        .fold((0.0, 0usize), |(t, c), d| (t + d.score, c + 1));
    total / count.max(1) as f64
}

/// `100 - 30 * σ(hours)` clamped to `[0, 100]`, σ being the population
/// standard deviation. A single night scores 100.
pub fn consistency_score(series: &[DailySleepSummary]) -> f64 {
    if series.len() <= 1 {
        return 100.0;
    }
    let mean = mean_of(series, |d| d.hours);
    let variance = series
        .iter()
        .map(|d| (d.hours - mean).powi(2))
        .sum::<f64>()
        / series.len() as f64;
    let std_dev = variance.sqrt();
    (100.0 - std_dev * CONSISTENCY_PENALTY_PER_HOUR).clamp(0.0, 100.0)
}

/// Total and per-night shortfall against [`RECOMMENDED_HOURS`].
pub fn sleep_debt(series: &[DailySleepSummary]) -> (f64, f64) {
    if series.is_empty() {
        return (0.0, 0.0);
    }
    let total: f64 = series
        .iter()
        .map(|d| (RECOMMENDED_HOURS - d.hours).max(0.0))
        .sum();
    (total, total / series.len() as f64)
}

/// Compare the three most recent nights against the three before them.
/// Expects `sorted` to be most recent first.
pub fn classify_trend(sorted: &[DailySleepSummary]) -> SleepTrend {
    if sorted.len() < TREND_MIN_NIGHTS {
        return SleepTrend::InsufficientData;
    }
    let recent = mean_of(&sorted[0..3], |d| d.hours);
    let older = mean_of(&sorted[3..6], |d| d.hours);
    let delta = recent - older;
    if delta > TREND_THRESHOLD_HOURS {
        SleepTrend::Improving
    } else if delta < -TREND_THRESHOLD_HOURS {
        SleepTrend::Declining
    } else {
        SleepTrend::Stable
    }
}

/// `None` for an empty series. Expects `sorted` to be most recent first.
pub fn compute_metrics(sorted: &[DailySleepSummary]) -> Option<WindowMetrics> {
    if sorted.is_empty() {
        return None;
    }
    let (total_debt, avg_debt) = sleep_debt(sorted);
    Some(WindowMetrics {
        avg_hours: mean_of(sorted, |d| d.hours),
        avg_score: average_score(sorted),
        avg_deep_minutes: mean_of(sorted, |d| d.deep_minutes),
        avg_light_minutes: mean_of(sorted, |d| d.light_minutes),
        avg_rem_minutes: mean_of(sorted, |d| d.rem_minutes),
        avg_awake_minutes: mean_of(sorted, |d| d.awake_minutes),
        consistency: consistency_score(sorted),
        total_debt,
        avg_debt,
        trend: classify_trend(sorted),
    })
}

/// Round to `places` decimals, ties to even.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}

/// Sort, measure, recommend. An empty series yields the "No data available"
/// fallback.
pub fn analyze(mut series: Vec<DailySleepSummary>) -> SleepAnalysis {
    sort_most_recent_first(&mut series);
    let Some(m) = compute_metrics(&series) else {
        return unavailable_analysis(Unavailability::NoData);
    };
    let recommendations = generate_recommendations(&m.recommendation_inputs());

    SleepAnalysis {
        weekly_data: series,
        averages: SleepAverages {
            hours: round_to(m.avg_hours, 1),
            score: round_to(m.avg_score, 0),
            deep_minutes: round_to(m.avg_deep_minutes, 0),
            light_minutes: round_to(m.avg_light_minutes, 0),
            rem_minutes: round_to(m.avg_rem_minutes, 0),
            awake_minutes: round_to(m.avg_awake_minutes, 0),
        },
        consistency_score: round_to(m.consistency, 0),
        sleep_debt: SleepDebt {
            total_hours: round_to(m.total_debt, 1),
            avg_daily: round_to(m.avg_debt, 1),
        },
        trend: m.trend,
        optimal_bedtime: OPTIMAL_BEDTIME.into(),
        recommendations,
    }
}
