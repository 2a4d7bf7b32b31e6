//! Candidate types produced by the aggregation stage.

use recipe_model::CandidateRecipe;

/// A corpus candidate annotated with its match count.
///
/// `matches` is how many of the requested ingredients this recipe
/// satisfies — the aggregator's only derived field. It is always in
/// `[1, |ingredient set|]`: the corpus lookup is itself ingredient-filtered,
/// so a zero-match candidate cannot exist.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    /// The corpus record. Summary variant out of the aggregator; full
    /// variant out of the hydrator.
    pub recipe: CandidateRecipe,

    /// Number of requested ingredients satisfied.
    pub matches: u32,
}

impl RankedCandidate {
    pub fn new(recipe: CandidateRecipe, matches: u32) -> Self {
        Self { recipe, matches }
    }
}
