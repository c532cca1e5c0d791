//! Reduce one raw provider record to a [`DailySleepSummary`].

use chrono::NaiveDate;
use garmin_client::{DailySleep, SleepLevel};

use crate::types::DailySleepSummary;

/// Per-stage minute totals for one night.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StageMinutes {
    pub deep: f64,
    pub light: f64,
    pub rem: f64,
    pub awake: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageBucket {
    Deep,
    Light,
    Rem,
    Awake,
}

/// Classify a provider label by case-insensitive substring, first match wins
/// in the order deep, light, rem, awake. Labels matching none are dropped.
pub fn classify_stage(label: &str) -> Option<StageBucket> {
    let label = label.to_lowercase();
    if label.contains("deep") {
        Some(StageBucket::Deep)
    } else if label.contains("light") {
        Some(StageBucket::Light)
    } else if label.contains("rem") {
        Some(StageBucket::Rem)
    } else if label.contains("awake") {
        Some(StageBucket::Awake)
    } else {
        None
    }
}

pub fn sum_stage_minutes(levels: &[SleepLevel]) -> StageMinutes {
    levels.iter().fold(StageMinutes::default(), |mut acc, level| {
        let label = level.activity_level.as_deref().unwrap_or_default();
        let minutes = level.seconds.unwrap_or(0.0).max(0.0) / 60.0;
        match classify_stage(label) {
            Some(StageBucket::Deep) => acc.deep += minutes,
            Some(StageBucket::Light) => acc.light += minutes,
            Some(StageBucket::Rem) => acc.rem += minutes,
            Some(StageBucket::Awake) => acc.awake += minutes,
            None => {}
        }
        acc
    })
}

/// Absent duration and any missing level of the score path both resolve to 0.
pub fn summarize_night(date: NaiveDate, sleep: &DailySleep) -> DailySleepSummary {
    let hours = sleep.sleep_time_seconds.unwrap_or(0.0).max(0.0) / 3600.0;
    let score = sleep.overall_score().unwrap_or(0.0).max(0.0);
    let stages = sum_stage_minutes(&sleep.sleep_levels);

    DailySleepSummary {
        date,
        hours,
        score,
        deep_minutes: stages.deep,
        light_minutes: stages.light,
        rem_minutes: stages.rem,
        awake_minutes: stages.awake,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn level(label: &str, seconds: f64) -> SleepLevel {
        SleepLevel {
            activity_level: Some(label.to_string()),
            seconds: Some(seconds),
        }
    }

    #[test]
    fn light_sleep_label_counts_as_light_only() {
        let stages = sum_stage_minutes(&[level("LIGHT_SLEEP", 600.0)]);
        assert_eq!(stages.light, 10.0);
        assert_eq!(stages.deep, 0.0);
        assert_eq!(stages.rem, 0.0);
        assert_eq!(stages.awake, 0.0);
    }

    #[test]
    fn unmatched_label_is_dropped() {
        let stages = sum_stage_minutes(&[level("unmeasurable", 3600.0)]);
        assert_eq!(stages, StageMinutes::default());
    }

    #[test]
    fn priority_order_is_deep_light_rem_awake() {
        assert_eq!(classify_stage("deep_light"), Some(StageBucket::Deep));
        assert_eq!(classify_stage("Light REM"), Some(StageBucket::Light));
        assert_eq!(classify_stage("rem_awake"), Some(StageBucket::Rem));
        assert_eq!(classify_stage("AWAKE"), Some(StageBucket::Awake));
        assert_eq!(classify_stage("2.0"), None);
    }

    #[test]
    fn segments_accumulate_per_bucket() {
        let stages = sum_stage_minutes(&[
            level("deep", 1800.0),
            level("deep", 1800.0),
            level("rem", 2700.0),
            level("awake", 120.0),
        ]);
        assert_eq!(stages.deep, 60.0);
        assert_eq!(stages.rem, 45.0);
        assert_eq!(stages.awake, 2.0);
    }

    #[test]
    fn missing_label_or_seconds_contribute_nothing() {
        let stages = sum_stage_minutes(&[
            SleepLevel {
                activity_level: None,
                seconds: Some(600.0),
            },
            SleepLevel {
                activity_level: Some("deep".into()),
                seconds: None,
            },
        ]);
        assert_eq!(stages, StageMinutes::default());
    }

    #[test]
    fn summarize_night_reads_hours_score_and_stages() {
        let sleep: DailySleep = serde_json::from_value(json!({
            "sleepTimeSeconds": 27000,
            "sleepScores": {"overall": {"value": 84}},
            "sleepLevels": [
                {"activityLevel": "deep", "seconds": 5400},
                {"activityLevel": "light", "seconds": 14400},
                {"activityLevel": "rem", "seconds": 6000},
                {"activityLevel": "awake", "seconds": 1200}
            ]
        }))
        .unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        let summary = summarize_night(date, &sleep);
        assert_eq!(summary.hours, 7.5);
        assert_eq!(summary.score, 84.0);
        assert_eq!(summary.deep_minutes, 90.0);
        assert_eq!(summary.light_minutes, 240.0);
        assert_eq!(summary.rem_minutes, 100.0);
        assert_eq!(summary.awake_minutes, 20.0);
    }

    #[test]
    fn summarize_night_defaults_to_zero() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        let summary = summarize_night(date, &DailySleep::default());
        assert_eq!(summary.hours, 0.0);
        assert_eq!(summary.score, 0.0);
        assert_eq!(summary.deep_minutes, 0.0);
    }
}
