//! Fully shaped results for when no analysis can be computed.

use serde::Serialize;

use crate::types::{
    BodyBattery, DailySnapshot, SleepAnalysis, SleepAverages, SleepDebt, SleepTrend,
};

/// Why a request ended on the fallback path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Unavailability {
    /// Credentials are not configured.
    NotConfigured,
    /// The provider client could not be constructed.
    ClientUnavailable,
    /// Login or the required fetch failed.
    ConnectionFailed,
    /// The window produced no nights.
    NoData,
}

impl Unavailability {
    pub fn reason(&self) -> &'static str {
        match self {
            Unavailability::NotConfigured => "Not configured",
            Unavailability::ClientUnavailable => "Client unavailable",
            Unavailability::ConnectionFailed => "Connection failed",
            Unavailability::NoData => "No data available",
        }
    }

    /// Metric label, matching the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            Unavailability::NotConfigured => "not_configured",
            Unavailability::ClientUnavailable => "client_unavailable",
            Unavailability::ConnectionFailed => "connection_failed",
            Unavailability::NoData => "no_data",
        }
    }

    pub fn setup_message(&self) -> &'static str {
        match self {
            Unavailability::NotConfigured => {
                "⚠️ Garmin not configured. Set GARMIN_EMAIL and GARMIN_PASSWORD. This feature is optional."
            }
            Unavailability::ClientUnavailable => {
                "⚠️ Garmin client could not be initialised. Check the server's TLS and network setup."
            }
            Unavailability::ConnectionFailed => {
                "⚠️ Could not connect to Garmin. Check GARMIN_EMAIL and GARMIN_PASSWORD."
            }
            Unavailability::NoData => "⚠️ Garmin returned no data for the requested date.",
        }
    }
}

pub fn unavailable_analysis(why: Unavailability) -> SleepAnalysis {
    SleepAnalysis {
        weekly_data: Vec::new(),
        averages: SleepAverages::default(),
        consistency_score: 0.0,
        sleep_debt: SleepDebt::default(),
        trend: SleepTrend::Unavailable,
        optimal_bedtime: "N/A".into(),
        recommendations: vec![format!("Sleep analysis unavailable: {}", why.reason())],
    }
}

pub fn unavailable_snapshot(why: Unavailability) -> DailySnapshot {
    DailySnapshot {
        date: None,
        sleep_score: None,
        sleep_hours: 0.0,
        training_load: None,
        training_status: None,
        steps: None,
        calories: None,
        resting_heart_rate: None,
        body_battery: BodyBattery::default(),
        setup_required: Some(why.reason().into()),
        setup_message: Some(why.setup_message().into()),
    }
}
