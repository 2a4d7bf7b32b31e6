//! Detail Hydrator: upgrade summary candidates to full records.
//!
//! Filter-endpoint hits lack instructions, which downstream normalization
//! requires. For each candidate still in summary form this fetches the full
//! record; all fetches for a batch run in parallel. Results are
//! re-associated by input index (never by completion order), so output
//! order always matches input order. Candidates whose detail fetch comes
//! back absent are dropped — a candidate is never passed on in summary
//! form.

use corpus_client::CorpusClient;
use tracing::{debug, instrument, warn};

use crate::types::RankedCandidate;

/// Hydrate a ranked batch, preserving order and match counts.
#[instrument(skip(client, candidates), fields(candidate_count = candidates.len()))]
pub async fn hydrate(
    client: &CorpusClient,
    candidates: Vec<RankedCandidate>,
) -> Vec<RankedCandidate> {
    // Spawn a detail fetch for every summary candidate; already-full
    // records pass through without a network call.
    let fetches: Vec<_> = candidates
        .into_iter()
        .map(|candidate| {
            if candidate.recipe.is_hydrated() {
                (candidate, None)
            } else {
                let client = client.clone();
                let source_id = candidate.recipe.source_id.clone();
                let handle = tokio::spawn(async move { client.fetch_detail(&source_id).await });
                (candidate, Some(handle))
            }
        })
        .collect();

    let mut hydrated = Vec::with_capacity(fetches.len());
    for (mut candidate, handle) in fetches {
        let Some(handle) = handle else {
            hydrated.push(candidate);
            continue;
        };
        match handle.await {
            Ok(Some(full)) => {
                candidate.recipe = full;
                hydrated.push(candidate);
            }
            Ok(None) => {
                debug!(
                    source_id = %candidate.recipe.source_id,
                    "dropping candidate, corpus returned no detail"
                );
            }
            Err(err) => {
                warn!(
                    source_id = %candidate.recipe.source_id,
                    "detail fetch task panicked, dropping candidate: {err}"
                );
            }
        }
    }
    hydrated
}
