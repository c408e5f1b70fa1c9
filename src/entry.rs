//! # Glance Entries
//!
//! One immutable snapshot the host paints: who, what the latest reading is,
//! how much it moved since the previous one, and when the snapshot applies.
//! A timeline is a run of these that differ only in `date` and index.
//!
//! ## Presentation Helpers
//! The helpers below only derive text and flags from the stored fields so
//! every renderer formats a reading the same way.

use crate::looper::Looper;
use crate::sample::{sorted_by_date, GlucoseSample, SampleSliceExt};
use crate::units::GlucoseDisplayUnits;
use chrono::{DateTime, Duration, Utc};

/// Interval between CGM readings
pub const SENSOR_SAMPLE_INTERVAL_MINUTES: i64 = 5;

/// Samples older than this are shown as stale
pub const STALE_SAMPLE_MINUTES: i64 = 15;

#[derive(Debug, Clone, PartialEq)]
pub struct GlanceEntry {
    pub looper: Option<Looper>,
    pub current_glucose_sample: Option<GlucoseSample>,
    pub last_glucose_change: Option<f64>,
    pub date: DateTime<Utc>,
    pub entry_index: usize,
    pub is_last_entry: bool,
    pub glucose_display_units: GlucoseDisplayUnits,
}

impl GlanceEntry {
    /// Entry for a configuration that no longer resolves to a looper
    pub fn unconfigured(date: DateTime<Utc>, units: GlucoseDisplayUnits) -> Self {
        Self {
            looper: None,
            current_glucose_sample: None,
            last_glucose_change: None,
            date,
            entry_index: 0,
            is_last_entry: true,
            glucose_display_units: units,
        }
    }

    /// Build the current entry for `looper` from its samples.
    ///
    /// Samples may arrive in any order; they are sorted by date before the
    /// latest one and the change are picked.
    pub fn from_samples(
        looper: Looper,
        samples: Vec<GlucoseSample>,
        date: DateTime<Utc>,
        units: GlucoseDisplayUnits,
    ) -> Self {
        let sorted = sorted_by_date(samples);
        let last_glucose_change = sorted.last_glucose_change(units);

        Self {
            looper: Some(looper),
            current_glucose_sample: sorted.last().cloned(),
            last_glucose_change,
            date,
            entry_index: 0,
            is_last_entry: true,
            glucose_display_units: units,
        }
    }

    /// Same looper, sample and change, moved to another slot of a timeline
    pub fn at_slot(&self, date: DateTime<Utc>, entry_index: usize, is_last_entry: bool) -> Self {
        Self {
            date,
            entry_index,
            is_last_entry,
            ..self.clone()
        }
    }

    /// When the sensor should report again, based on the current sample.
    ///
    /// `None` without a sample, or when the date would be out of range.
    pub fn next_expected_glucose_date(&self) -> Option<DateTime<Utc>> {
        self.current_glucose_sample.as_ref().and_then(|sample| {
            sample
                .date
                .checked_add_signed(Duration::minutes(SENSOR_SAMPLE_INTERVAL_MINUTES))
        })
    }

    pub fn needs_reconfiguration(&self) -> bool {
        self.looper.is_none()
    }

    pub fn glucose_value_text(&self) -> Option<String> {
        let units = self.glucose_display_units;
        self.current_glucose_sample
            .as_ref()
            .map(|sample| units.format_value(sample.presentable_user_value(units)))
    }

    pub fn glucose_change_text(&self) -> Option<String> {
        self.last_glucose_change
            .map(|change| self.glucose_display_units.format_change(change))
    }

    pub fn trend_arrow(&self) -> Option<&'static str> {
        self.current_glucose_sample
            .as_ref()
            .and_then(|sample| sample.trend)
            .map(|trend| trend.arrow())
    }

    /// Whole minutes between the sample and this entry's date, never negative
    pub fn minutes_since_sample(&self) -> Option<i64> {
        self.current_glucose_sample
            .as_ref()
            .map(|sample| (self.date - sample.date).num_minutes().max(0))
    }

    pub fn is_sample_stale(&self) -> bool {
        self.minutes_since_sample()
            .map(|minutes| minutes >= STALE_SAMPLE_MINUTES)
            .unwrap_or(false)
    }
}
