//! Wire and storage types shared by the ingest and alert paths.
//!
//! One typed [`Reading`] is used everywhere; JSON field names (`pH`, `unitId`) are fixed by the
//! clients that post sensor batches.

use serde::{Deserialize, Serialize};

/// Lower inclusive bound of the healthy pH band.
pub const PH_MIN: f64 = 5.5;
/// Upper inclusive bound of the healthy pH band.
pub const PH_MAX: f64 = 7.0;
/// Maximum number of entries returned by an alert query.
pub const ALERT_LIMIT: usize = 10;

pub const STATUS_OK: &str = "OK";

/// One timestamped sensor sample. `timestamp` is kept as the ISO-8601 string the unit sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Reading {
    pub id: String,
    #[serde(rename = "pH")]
    pub ph: f64,
    pub temp: f64,
    pub ec: f64,
    #[schema(example = "2025-06-05T12:00:00")]
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Pod {
    pub id: String,
    /// Age in days.
    pub age: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum HealthLabel {
    #[serde(rename = "Healthy")]
    Healthy,
    #[serde(rename = "Needs Attention")]
    NeedsAttention,
}

impl HealthLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            HealthLabel::Healthy => "Healthy",
            HealthLabel::NeedsAttention => "Needs Attention",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Classification {
    pub status: String,
    pub classification: HealthLabel,
}

/// A growing unit as submitted. `readings` is in submission order; the last one is the latest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Unit {
    pub id: String,
    pub pods: Vec<Pod>,
    pub readings: Vec<Reading>,
    #[serde(default)]
    pub classification: Option<Classification>,
}

/// Flattened per-unit record written on every ingest that had at least one reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingRecord {
    pub unit_id: String,
    pub timestamp: String,
    pub reading: Reading,
    pub classification: Classification,
}

/// An out-of-range reading surfaced by the alert query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AlertEntry {
    pub id: String,
    #[serde(rename = "pH")]
    pub ph: f64,
    pub temp: f64,
    pub ec: f64,
    pub timestamp: String,
}

impl From<&Reading> for AlertEntry {
    fn from(reading: &Reading) -> Self {
        Self {
            id: reading.id.clone(),
            ph: reading.ph,
            temp: reading.temp,
            ec: reading.ec,
            timestamp: reading.timestamp.clone(),
        }
    }
}
