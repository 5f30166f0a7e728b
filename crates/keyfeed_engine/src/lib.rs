//! Keyfeed engine: source fetching, pipeline orchestration and atomic
//! feed persistence.
mod fetch;
mod persist;
mod pipeline;

pub use fetch::{FailureKind, FetchError, FetchSettings, Fetcher, ReqwestFetcher, BROWSER_USER_AGENT};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use pipeline::run_pipeline;
