use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use engine_logging::LogDestination;
use harvester_core::SplitPolicy;
use log::LevelFilter;

use crate::config::{load_config, HarvestConfig};

#[derive(Debug, Parser)]
#[command(
    name = "harvester",
    version,
    about = "Fetch numbered pages, extract their visible text and save it as CSV"
)]
pub struct Cli {
    /// RON file with run settings; flags below override it.
    #[arg(long, env = "HARVESTER_CONFIG")]
    pub config: Option<PathBuf>,
    /// URL prefix; the page id is appended to it.
    #[arg(long)]
    pub base_url: Option<String>,
    /// Attempts per page.
    #[arg(long)]
    pub retries: Option<u32>,
    /// Seconds to wait between attempts.
    #[arg(long)]
    pub delay: Option<f64>,
    #[arg(long)]
    pub max_consecutive_failures: Option<u32>,
    /// Last page id to fetch.
    #[arg(long)]
    pub max_id: Option<u64>,
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    #[arg(long, value_enum)]
    pub split_policy: Option<SplitArg>,
    /// Per-request timeout in seconds.
    #[arg(long)]
    pub request_timeout: Option<f64>,
    #[arg(long, value_enum, default_value_t = LogArg::Both)]
    pub log: LogArg,
    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,
    #[arg(long, default_value = "harvest.log")]
    pub log_file: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SplitArg {
    First,
    All,
}

impl From<SplitArg> for SplitPolicy {
    fn from(arg: SplitArg) -> Self {
        match arg {
            SplitArg::First => SplitPolicy::First,
            SplitArg::All => SplitPolicy::All,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogArg {
    Terminal,
    File,
    Both,
}

impl From<LogArg> for LogDestination {
    fn from(arg: LogArg) -> Self {
        match arg {
            LogArg::Terminal => LogDestination::Terminal,
            LogArg::File => LogDestination::File,
            LogArg::Both => LogDestination::Both,
        }
    }
}

impl Cli {
    /// Config file (or defaults) with command-line overrides applied, validated.
    pub fn resolve_config(&self) -> Result<HarvestConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => HarvestConfig::default(),
        };
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut HarvestConfig) {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(retries) = self.retries {
            config.retries = retries;
        }
        if let Some(delay) = self.delay {
            config.delay_secs = delay;
        }
        if let Some(max) = self.max_consecutive_failures {
            config.max_consecutive_failures = max;
        }
        if self.max_id.is_some() {
            config.max_id = self.max_id;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(policy) = self.split_policy {
            config.split_policy = policy.into();
        }
        if self.request_timeout.is_some() {
            config.request_timeout_secs = self.request_timeout;
        }
    }
}
