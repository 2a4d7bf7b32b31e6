//! Result Aggregator: merge per-ingredient hit lists into a ranked
//! candidate set.
//!
//! ## Algorithm
//! 1. Issue one corpus lookup per distinct ingredient, concurrently. A
//!    failed lookup contributes an empty list (the client fails soft) and
//!    never aborts the others.
//! 2. Tally hits into an `id → (candidate, match count, first-seen rank)`
//!    map, scanning the per-ingredient lists in the user's insertion order.
//! 3. Sort by match count descending; ties keep first-discovery order.
//! 4. Truncate to the top [`MAX_CANDIDATES`] to bound the detail-fetch
//!    fan-out downstream.
//!
//! The tie-break is a specified-but-arbitrary policy: first-sighting order
//! across the ingredient scans, tracked with an explicit rank rather than
//! map iteration order. Do not replace it with a quality signal.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use corpus_client::CorpusClient;
use recipe_model::{CandidateRecipe, IngredientSet};
use tracing::{debug, instrument, warn};

use crate::types::RankedCandidate;

/// Upper bound on the ranked candidate set returned per request.
pub const MAX_CANDIDATES: usize = 5;

/// Merge per-ingredient corpus lookups into a ranked candidate set.
///
/// Returns summary-variant candidates with match counts populated, best
/// match first. An empty ingredient set returns an empty list without
/// issuing any lookups; an all-miss aggregation returns an empty list too
/// (the caller decides whether that triggers the generative fallback).
#[instrument(skip(client, ingredients), fields(ingredient_count = ingredients.len()))]
pub async fn aggregate(client: &CorpusClient, ingredients: &IngredientSet) -> Vec<RankedCandidate> {
    if ingredients.is_empty() {
        debug!("empty ingredient set, skipping corpus lookups");
        return Vec::new();
    }

    // One lookup task per distinct ingredient; the client clone shares the
    // underlying connection pool.
    let handles: Vec<_> = ingredients
        .iter()
        .map(|name| {
            let client = client.clone();
            let name = name.to_string();
            tokio::spawn(async move { client.lookup_by_ingredient(&name).await })
        })
        .collect();

    // Await the full batch in insertion order; the scan order below is what
    // makes the tie-break deterministic.
    let mut hit_lists = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(hits) => hit_lists.push(hits),
            Err(err) => {
                warn!("ingredient lookup task panicked: {err}");
                hit_lists.push(Vec::new());
            }
        }
    }

    let ranked = rank(hit_lists);
    debug!("aggregated {} ranked candidates", ranked.len());
    ranked
}

struct Tally {
    recipe: CandidateRecipe,
    matches: u32,
    first_seen: usize,
}

/// Tally, sort, and truncate the per-ingredient hit lists.
fn rank(hit_lists: Vec<Vec<CandidateRecipe>>) -> Vec<RankedCandidate> {
    let mut tallies: HashMap<String, Tally> = HashMap::new();
    let mut discovered = 0usize;

    for hits in hit_lists {
        for recipe in hits {
            match tallies.entry(recipe.source_id.clone()) {
                Entry::Occupied(mut entry) => entry.get_mut().matches += 1,
                Entry::Vacant(entry) => {
                    entry.insert(Tally {
                        recipe,
                        matches: 1,
                        first_seen: discovered,
                    });
                    discovered += 1;
                }
            }
        }
    }

    let mut ranked: Vec<Tally> = tallies.into_values().collect();
    ranked.sort_by(|a, b| b.matches.cmp(&a.matches).then(a.first_seen.cmp(&b.first_seen)));
    ranked.truncate(MAX_CANDIDATES);

    ranked
        .into_iter()
        .map(|tally| RankedCandidate::new(tally.recipe, tally.matches))
        .collect()
}
