//! Keyfeed binary: one run-to-completion aggregation pass.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::Utc;
use feed_logging::LogDestination;
use keyfeed_engine::{run_pipeline, AtomicFileWriter, FetchSettings, ReqwestFetcher};

// The static site reads this path; keep it stable.
const OUTPUT_DIR: &str = "docs";
const OUTPUT_FILE: &str = "codes.json";

fn main() -> ExitCode {
    feed_logging::initialize(LogDestination::Terminal);
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("run failed: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let now = Utc::now();
    let sources = keyfeed_core::sources();

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).context("building http client")?;
    let runtime = tokio::runtime::Runtime::new().context("building tokio runtime")?;
    let feed = runtime.block_on(run_pipeline(&fetcher, &sources, now));

    let writer = AtomicFileWriter::new(PathBuf::from(OUTPUT_DIR));
    let path = writer
        .write_feed(OUTPUT_FILE, &feed)
        .context("writing feed artifact")?;
    log::info!("wrote {} codes to {}", feed.codes.len(), path.display());
    Ok(())
}
