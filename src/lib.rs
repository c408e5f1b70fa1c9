//! # glucose-glance
//!
//! Timeline building for glanceable glucose surfaces such as watch widgets.
//! A `TimelineProvider` resolves the configured looper, fetches its samples
//! through an injected `GlucoseDataSource`, and returns an hour of
//! minute-by-minute `GlanceEntry` values plus a `RefreshPolicy`.

pub mod config;
pub mod entry;
pub mod error;
pub mod looper;
pub mod sample;
pub mod source;
pub mod timeline;
pub mod units;

pub use config::{Config, WidgetConfiguration};
pub use entry::GlanceEntry;
pub use error::{ConfigError, FetchError, StoreError, TimelineError};
pub use looper::{FileLooperStore, InMemoryLooperStore, Looper, LooperStore};
pub use sample::{GlucoseSample, GlucoseTrend};
pub use source::{GlucoseDataSource, ReplayDataSource};
pub use timeline::{LooperRecommendation, RefreshPolicy, Timeline, TimelineProvider};
pub use units::GlucoseDisplayUnits;
