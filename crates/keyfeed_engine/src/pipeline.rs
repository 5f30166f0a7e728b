use chrono::{DateTime, Utc};
use keyfeed_core::{Feed, ReconcileState, Source, TrustTier};

use crate::fetch::Fetcher;

/// One complete aggregation run: fetch every registered source once,
/// reconcile the findings, and assemble the feed.
///
/// The authoritative tier is drained completely before the corroborating
/// tier — the reconciliation skip rules depend on that barrier. A source
/// that fails to fetch is logged and contributes zero findings; it never
/// aborts the run.
pub async fn run_pipeline(fetcher: &dyn Fetcher, sources: &[Source], now: DateTime<Utc>) -> Feed {
    let mut state = ReconcileState::new();

    for tier in [TrustTier::Authoritative, TrustTier::Corroborating] {
        for source in sources.iter().filter(|s| s.tier == tier) {
            match fetcher.fetch(&source.url).await {
                Ok(body) => {
                    log::info!("fetched {} ({} bytes)", source.name, body.len());
                    state.absorb(source, &body, now);
                }
                Err(err) => {
                    log::warn!("skipping {}: {}", source.name, err);
                }
            }
        }
    }

    let codes = state.into_records(now);
    log::info!("reconciled {} publishable codes", codes.len());
    Feed {
        updated_at: now,
        codes,
    }
}
