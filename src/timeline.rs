//! # Timeline Provider Module
//!
//! Turns one fetch of a looper's glucose samples into an hour of glance
//! entries plus the time the host should ask again.
//!
//! ## Cycle
//! 1. Resolve the configured looper in the account store (miss → one
//!    "needs configuration" entry, no fetch)
//! 2. Fetch samples from the data source (the only await point)
//! 3. Sort by date, take the latest sample and the change from the one before
//! 4. Schedule the next refresh from the sensor cadence
//! 5. Repeat the entry once per minute for the next hour
//!
//! ## Why Repeat Instead of Refetch
//! The values never change across the hour; only the date does. That is
//! enough for the host to redraw "n min ago" between real refreshes, while
//! the refresh policy decides when new data is actually requested.
//!
//! ## Cancellation
//! Entries are built only after the fetch resolves. Dropping the future
//! while the fetch is pending produces nothing.

use crate::config::WidgetConfiguration;
use crate::entry::GlanceEntry;
use crate::error::TimelineError;
use crate::looper::{Looper, LooperStore};
use crate::sample::{GlucoseSample, GlucoseTrend};
use crate::source::GlucoseDataSource;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

/// Entries per timeline, one per minute
pub const TIMELINE_ENTRY_COUNT: usize = 60;
pub const ENTRY_SPACING_MINUTES: i64 = 1;

/// Refresh interval when no sensor estimate is available
pub const DEFAULT_REFRESH_MINUTES: i64 = 5;

/// Added to the expected sample time to let the upload land
pub const UPLOAD_GRACE_MINUTES: i64 = 1;

/// When the host should run the next cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPolicy {
    After(DateTime<Utc>),
}

impl RefreshPolicy {
    pub fn refresh_date(&self) -> DateTime<Utc> {
        match self {
            RefreshPolicy::After(date) => *date,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    pub entries: Vec<GlanceEntry>,
    pub policy: RefreshPolicy,
}

impl Timeline {
    /// Entry to show at `now`: the latest one whose date has been reached.
    ///
    /// Past the end of the timeline the last entry keeps showing.
    pub fn entry_at(&self, now: DateTime<Utc>) -> Option<&GlanceEntry> {
        self.entries.iter().rev().find(|entry| entry.date <= now)
    }

    /// Date of the first entry after `now`, if any
    pub fn next_entry_date_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.entries
            .iter()
            .map(|entry| entry.date)
            .find(|date| *date > now)
    }
}

/// A looper offered in the widget configuration UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LooperRecommendation {
    pub looper_id: String,
    pub name: String,
}

impl LooperRecommendation {
    pub fn configuration(&self) -> WidgetConfiguration {
        WidgetConfiguration::for_looper(self.looper_id.clone())
    }
}

/// Pick the next refresh: expected sample + grace if that is still ahead,
/// otherwise the default interval.
pub fn next_refresh_date(entry: &GlanceEntry, now: DateTime<Utc>) -> DateTime<Utc> {
    let expected = entry
        .next_expected_glucose_date()
        .filter(|expected| *expected > now)
        .and_then(|expected| expected.checked_add_signed(Duration::minutes(UPLOAD_GRACE_MINUTES)));

    expected.unwrap_or_else(|| later_by(now, DEFAULT_REFRESH_MINUTES))
}

/// `date` plus `minutes`, clamped to the latest representable date
fn later_by(date: DateTime<Utc>, minutes: i64) -> DateTime<Utc> {
    date.checked_add_signed(Duration::minutes(minutes))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Copies of `current`, one per minute starting at `now`. Only the last is final.
pub fn synthesize_entries(current: &GlanceEntry, now: DateTime<Utc>) -> Vec<GlanceEntry> {
    (0..TIMELINE_ENTRY_COUNT)
        .map(|index| {
            let date = later_by(now, ENTRY_SPACING_MINUTES * index as i64);
            current.at_slot(date, index, index == TIMELINE_ENTRY_COUNT - 1)
        })
        .collect()
}

/// Builds glance timelines for a host.
///
/// Holds only shared, read-only collaborators, so one provider can serve
/// overlapping cycles; each cycle fetches on its own.
pub struct TimelineProvider {
    store: Arc<dyn LooperStore>,
    source: Arc<dyn GlucoseDataSource>,
}

impl TimelineProvider {
    pub fn new(store: Arc<dyn LooperStore>, source: Arc<dyn GlucoseDataSource>) -> Self {
        Self { store, source }
    }

    /// Strict lookup of the configured looper. Store failures count as a miss.
    fn resolve_looper(&self, configuration: &WidgetConfiguration) -> Option<Looper> {
        let looper_id = configuration.looper_id.as_deref()?;

        match self.store.lookup(looper_id) {
            Ok(Some(looper)) => Some(looper),
            Ok(None) => {
                log::warn!("Configured looper {} no longer exists", looper_id);
                None
            }
            Err(e) => {
                log::error!("Could not resolve looper {}: {}", looper_id, e);
                None
            }
        }
    }

    /// Current entry, or `None` when the configuration needs redoing
    async fn current_entry(
        &self,
        configuration: &WidgetConfiguration,
        now: DateTime<Utc>,
    ) -> Result<Option<GlanceEntry>, TimelineError> {
        let Some(looper) = self.resolve_looper(configuration) else {
            return Ok(None);
        };

        let samples = self.source.fetch_glucose_samples(&looper).await?;
        log::debug!("Fetched {} samples for {}", samples.len(), looper.name);

        Ok(Some(GlanceEntry::from_samples(
            looper,
            samples,
            now,
            configuration.glucose_display_units,
        )))
    }

    /// Single entry for the current moment
    pub async fn snapshot(&self, configuration: &WidgetConfiguration) -> Result<GlanceEntry, TimelineError> {
        self.snapshot_at(configuration, Utc::now()).await
    }

    pub async fn snapshot_at(
        &self,
        configuration: &WidgetConfiguration,
        now: DateTime<Utc>,
    ) -> Result<GlanceEntry, TimelineError> {
        Ok(self
            .current_entry(configuration, now)
            .await?
            .unwrap_or_else(|| GlanceEntry::unconfigured(now, configuration.glucose_display_units)))
    }

    /// Run one cycle
    pub async fn timeline(&self, configuration: &WidgetConfiguration) -> Result<Timeline, TimelineError> {
        self.timeline_at(configuration, Utc::now()).await
    }

    pub async fn timeline_at(
        &self,
        configuration: &WidgetConfiguration,
        now: DateTime<Utc>,
    ) -> Result<Timeline, TimelineError> {
        let current = match self.current_entry(configuration, now).await? {
            Some(entry) => entry,
            None => {
                let entry = GlanceEntry::unconfigured(now, configuration.glucose_display_units);
                let policy = RefreshPolicy::After(next_refresh_date(&entry, now));
                return Ok(Timeline {
                    entries: vec![entry],
                    policy,
                });
            }
        };

        let policy = RefreshPolicy::After(next_refresh_date(&current, now));
        let entries = synthesize_entries(&current, now);

        log::info!(
            "Built {} entries for {}, refresh after {}",
            entries.len(),
            current.looper.as_ref().map(|l| l.name.as_str()).unwrap_or("?"),
            policy.refresh_date()
        );

        Ok(Timeline { entries, policy })
    }

    /// Preview entry with a fixed sample. Never shown on a live surface.
    pub fn placeholder(&self, configuration: &WidgetConfiguration) -> GlanceEntry {
        self.placeholder_at(configuration, Utc::now())
    }

    pub fn placeholder_at(&self, configuration: &WidgetConfiguration, now: DateTime<Utc>) -> GlanceEntry {
        let sample = GlucoseSample::new(now, 100.0, "1345").with_trend(GlucoseTrend::Up);

        GlanceEntry {
            looper: None,
            current_glucose_sample: Some(sample),
            last_glucose_change: None,
            date: now,
            entry_index: 0,
            is_last_entry: true,
            glucose_display_units: configuration.glucose_display_units,
        }
    }

    /// Loopers to offer in the configuration UI. Empty on store failure.
    pub fn recommendations(&self) -> Vec<LooperRecommendation> {
        match self.store.list_all() {
            Ok(loopers) => loopers
                .into_iter()
                .filter(|looper| !looper.name.is_empty())
                .map(|looper| LooperRecommendation {
                    looper_id: looper.id,
                    name: looper.name,
                })
                .collect(),
            Err(e) => {
                log::error!("Could not list loopers for recommendations: {}", e);
                Vec::new()
            }
        }
    }
}
