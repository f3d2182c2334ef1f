mod cli;
mod config;
mod preview;

use anyhow::Result;
use clap::Parser;
use engine_logging::{engine_info, engine_warn};
use harvester_engine::{run_harvest, CsvTableSink, PageFetcher};

use crate::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    engine_logging::initialize(cli.log.into(), cli.log_level, &cli.log_file);

    let config = cli.resolve_config()?;
    engine_info!("Using config {:?}", config);

    let fetcher = PageFetcher::new(config.fetch_settings()?)?;
    let sink = CsvTableSink::new(config.output_dir.clone());
    let report = run_harvest(config.plan(), config.split_policy, &fetcher, &sink);

    if report.failed_saves > 0 {
        engine_warn!(
            "{} saves failed; see the log for details",
            report.failed_saves
        );
    }
    print!("{}", preview::format_preview(&report.derived));
    Ok(())
}
