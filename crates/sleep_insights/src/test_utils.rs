//! Shared test utilities: a scripted in-memory `GarminClient` and record builders.
#![cfg(test)]

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use garmin_client::{
    DailySleep, DailyStats, GarminClient, GarminError, ScoreValue, SleepDataResponse, SleepLevel,
    SleepScores, TrainingStatusResponse, UserProfile,
};

use crate::types::DailySleepSummary;

enum Scripted {
    Night(DailySleep),
    EmptyRecord,
    Failure,
}

/// Answers per-date sleep requests from a script; unscripted dates have no record.
#[derive(Default)]
pub struct ScriptedClient {
    nights: HashMap<NaiveDate, Scripted>,
    login_fails: bool,
    stats: Option<DailyStats>,
    training: Option<TrainingStatusResponse>,
    sleep_calls: AtomicU32,
    login_calls: AtomicU32,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_night(mut self, date: NaiveDate, sleep: DailySleep) -> Self {
        self.nights.insert(date, Scripted::Night(sleep));
        self
    }

    pub fn with_empty_record(mut self, date: NaiveDate) -> Self {
        self.nights.insert(date, Scripted::EmptyRecord);
        self
    }

    pub fn with_failure(mut self, date: NaiveDate) -> Self {
        self.nights.insert(date, Scripted::Failure);
        self
    }

    pub fn with_login_failure(mut self) -> Self {
        self.login_fails = true;
        self
    }

    pub fn with_stats(mut self, stats: DailyStats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn with_training(mut self, training: TrainingStatusResponse) -> Self {
        self.training = Some(training);
        self
    }

    pub fn sleep_calls(&self) -> u32 {
        self.sleep_calls.load(Ordering::SeqCst)
    }

    pub fn login_calls(&self) -> u32 {
        self.login_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GarminClient for ScriptedClient {
    async fn login(&self) -> Result<UserProfile, GarminError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        if self.login_fails {
            return Err(GarminError::Auth("invalid credentials".into()));
        }
        Ok(UserProfile {
            display_name: Some("sleeper".into()),
            full_name: None,
        })
    }

    async fn get_sleep_data(
        &self,
        date: NaiveDate,
    ) -> Result<Option<SleepDataResponse>, GarminError> {
        self.sleep_calls.fetch_add(1, Ordering::SeqCst);
        match self.nights.get(&date) {
            Some(Scripted::Night(sleep)) => Ok(Some(SleepDataResponse {
                daily_sleep: Some(sleep.clone()),
            })),
            Some(Scripted::EmptyRecord) => Ok(Some(SleepDataResponse::default())),
            Some(Scripted::Failure) => Err(GarminError::from_status(503, "try later")),
            None => Ok(None),
        }
    }

    async fn get_daily_stats(&self, _date: NaiveDate) -> Result<DailyStats, GarminError> {
        self.stats
            .clone()
            .ok_or_else(|| GarminError::NotFound("no stats".into()))
    }

    async fn get_training_status(
        &self,
        _date: NaiveDate,
    ) -> Result<TrainingStatusResponse, GarminError> {
        self.training
            .clone()
            .ok_or_else(|| GarminError::NotFound("no training status".into()))
    }
}

/// A night with the given duration and score and no stage segments.
pub fn night(hours: f64, score: f64) -> DailySleep {
    DailySleep {
        sleep_time_seconds: Some(hours * 3600.0),
        sleep_scores: Some(SleepScores {
            overall: Some(ScoreValue { value: Some(score) }),
        }),
        sleep_levels: Vec::new(),
    }
}

/// A night with stage segments, given in minutes.
pub fn staged_night(hours: f64, score: f64, deep: f64, light: f64, rem: f64, awake: f64) -> DailySleep {
    let mut sleep = night(hours, score);
    sleep.sleep_levels = [("deep", deep), ("light", light), ("rem", rem), ("awake", awake)]
        .into_iter()
        .map(|(label, minutes)| SleepLevel {
            activity_level: Some(label.to_string()),
            seconds: Some(minutes * 60.0),
        })
        .collect();
    sleep
}

/// Summary with the given hours and score; stage minutes set to healthy mid-range values.
pub fn summary(date: NaiveDate, hours: f64, score: f64) -> DailySleepSummary {
    DailySleepSummary {
        date,
        hours,
        score,
        deep_minutes: 90.0,
        light_minutes: 240.0,
        rem_minutes: 90.0,
        awake_minutes: 15.0,
    }
}

/// Consecutive days ending at `today`, `hours[0]` being the most recent.
pub fn series_from_hours(today: NaiveDate, hours: &[f64]) -> Vec<DailySleepSummary> {
    hours
        .iter()
        .enumerate()
        .map(|(i, h)| summary(today - chrono::Duration::days(i as i64), *h, 75.0))
        .collect()
}
