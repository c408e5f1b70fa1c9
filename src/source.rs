//! # Glucose Data Sources
//!
//! The timeline never talks to a CGM or a Nightscout site itself. It asks a
//! `GlucoseDataSource` for the looper's samples and builds everything else
//! from the answer. The source is handed to `TimelineProvider::new`, so tests
//! and hosts choose the implementation.
//!
//! `ReplayDataSource` serves recorded samples from `<dir>/<looper id>.toml`
//! and is what the bundled binary uses. Each `[[samples]]` table needs
//! `date` (native TOML datetime or quoted RFC 3339), `quantity` in mg/dL and
//! `sync_identifier`; `trend` and the flags are optional.

use crate::error::FetchError;
use crate::looper::Looper;
use crate::sample::GlucoseSample;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;

#[async_trait]
pub trait GlucoseDataSource: Send + Sync {
    /// Fetch every sample currently available for `looper`, in any order
    async fn fetch_glucose_samples(&self, looper: &Looper) -> Result<Vec<GlucoseSample>, FetchError>;
}

#[derive(Debug, Deserialize)]
struct SampleFile {
    #[serde(default)]
    samples: Vec<GlucoseSample>,
}

#[derive(Debug, Clone)]
pub struct ReplayDataSource {
    dir: PathBuf,
}

impl ReplayDataSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, looper: &Looper) -> PathBuf {
        self.dir.join(format!("{}.toml", looper.id))
    }
}

#[async_trait]
impl GlucoseDataSource for ReplayDataSource {
    async fn fetch_glucose_samples(&self, looper: &Looper) -> Result<Vec<GlucoseSample>, FetchError> {
        let path = self.path_for(looper);
        log::debug!("Replaying samples for {} from {}", looper.name, path.display());

        let contents = tokio::fs::read_to_string(&path).await.map_err(FetchError::Io)?;
        let file: SampleFile =
            toml::from_str(&contents).map_err(|e| FetchError::Parse(e.to_string()))?;

        Ok(file.samples)
    }
}
