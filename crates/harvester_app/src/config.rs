//! Run configuration: defaults, optional RON file, validation.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use harvester_core::{HarvestPlan, SplitPolicy, CHECKPOINT_INTERVAL};
use harvester_engine::FetchSettings;
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://2e.aonprd.com/Monsters.aspx?ID=";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarvestConfig {
    pub base_url: String,
    pub retries: u32,
    pub delay_secs: f64,
    pub max_consecutive_failures: u32,
    /// Absent means no upper bound.
    pub max_id: Option<u64>,
    pub output_dir: PathBuf,
    pub split_policy: SplitPolicy,
    /// Absent means requests may wait indefinitely.
    pub request_timeout_secs: Option<f64>,
    pub permanent_statuses: Vec<u16>,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            retries: fetch.retries,
            delay_secs: fetch.delay.as_secs_f64(),
            max_consecutive_failures: harvester_core::DEFAULT_MAX_CONSECUTIVE_FAILURES,
            max_id: None,
            output_dir: PathBuf::from("output"),
            split_policy: SplitPolicy::First,
            request_timeout_secs: None,
            permanent_statuses: fetch.permanent_statuses,
        }
    }
}

pub fn load_config(path: &Path) -> Result<HarvestConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    ron::from_str(&content).with_context(|| format!("parsing config file {}", path.display()))
}

impl HarvestConfig {
    pub fn validate(&self) -> Result<()> {
        let sample = format!("{}1", self.base_url);
        url::Url::parse(&sample)
            .with_context(|| format!("base url {:?} is not usable", self.base_url))?;
        seconds("delay", self.delay_secs)?;
        if let Some(timeout) = self.request_timeout_secs {
            seconds("request timeout", timeout)?;
        }
        Ok(())
    }

    pub fn plan(&self) -> HarvestPlan {
        HarvestPlan {
            base_url: self.base_url.clone(),
            max_consecutive_failures: self.max_consecutive_failures,
            max_id: self.max_id,
            checkpoint_every: CHECKPOINT_INTERVAL,
        }
    }

    pub fn fetch_settings(&self) -> Result<FetchSettings> {
        Ok(FetchSettings {
            retries: self.retries.max(1),
            delay: seconds("delay", self.delay_secs)?,
            request_timeout: self
                .request_timeout_secs
                .map(|secs| seconds("request timeout", secs))
                .transpose()?,
            permanent_statuses: self.permanent_statuses.clone(),
        })
    }
}

fn seconds(what: &str, secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .map_err(|_| anyhow!("{what} must be a finite, non-negative number of seconds, got {secs}"))
}
