//! # Glucose Samples
//!
//! Sensor readings as delivered by a data source, plus the slice helpers the
//! timeline needs: ordering by date and the change between the two most
//! recent readings.
//!
//! ## Dates in TOML
//! `date` accepts either a quoted RFC 3339 string
//! (`date = "2024-01-01T12:00:00Z"`) or a native TOML datetime
//! (`date = 2024-01-01T12:00:00Z`). Datetimes without an offset are read as UTC.

use crate::units::GlucoseDisplayUnits;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Direction reported by the CGM alongside a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlucoseTrend {
    UpUpUp,
    UpUp,
    Up,
    Flat,
    Down,
    DownDown,
    DownDownDown,
}

impl GlucoseTrend {
    pub fn arrow(&self) -> &'static str {
        match self {
            GlucoseTrend::UpUpUp => "⇈",
            GlucoseTrend::UpUp => "↑",
            GlucoseTrend::Up => "↗",
            GlucoseTrend::Flat => "→",
            GlucoseTrend::Down => "↘",
            GlucoseTrend::DownDown => "↓",
            GlucoseTrend::DownDownDown => "⇊",
        }
    }
}

/// A single glucose reading. `quantity` is always mg/dL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlucoseSample {
    #[serde(deserialize_with = "deserialize_date")]
    pub date: DateTime<Utc>,
    pub quantity: f64,
    #[serde(default)]
    pub trend: Option<GlucoseTrend>,
    #[serde(default)]
    pub is_display_only: bool,
    #[serde(default)]
    pub was_user_entered: bool,
    pub sync_identifier: String,
}

impl GlucoseSample {
    pub fn new(date: DateTime<Utc>, quantity: f64, sync_identifier: impl Into<String>) -> Self {
        Self {
            date,
            quantity,
            trend: None,
            is_display_only: false,
            was_user_entered: false,
            sync_identifier: sync_identifier.into(),
        }
    }

    pub fn with_trend(mut self, trend: GlucoseTrend) -> Self {
        self.trend = Some(trend);
        self
    }

    /// Value converted to `units`, unrounded
    pub fn converted_value(&self, units: GlucoseDisplayUnits) -> f64 {
        units.convert(self.quantity)
    }

    /// Value as the user sees it in `units`
    pub fn presentable_user_value(&self, units: GlucoseDisplayUnits) -> f64 {
        units.presentable_value(self.quantity)
    }
}

pub trait SampleSliceExt {
    /// Change between the two most recent samples, converted to `units`.
    ///
    /// Expects ascending order. `None` with fewer than two samples.
    fn last_glucose_change(&self, units: GlucoseDisplayUnits) -> Option<f64>;
}

impl SampleSliceExt for [GlucoseSample] {
    fn last_glucose_change(&self, units: GlucoseDisplayUnits) -> Option<f64> {
        match self {
            [.., previous, latest] => {
                Some(latest.converted_value(units) - previous.converted_value(units))
            }
            _ => None,
        }
    }
}

fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|date| date.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match toml::Value::deserialize(deserializer)? {
        toml::Value::String(text) => text,
        toml::Value::Datetime(datetime) => datetime.to_string(),
        other => {
            return Err(serde::de::Error::custom(format!(
                "expected a date, found {}",
                other.type_str()
            )))
        }
    };

    parse_date(&text)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid sample date: {}", text)))
}

/// Sort samples oldest first. Stable, so equal dates keep source order.
pub fn sorted_by_date(mut samples: Vec<GlucoseSample>) -> Vec<GlucoseSample> {
    samples.sort_by(|a, b| a.date.cmp(&b.date));
    samples
}
