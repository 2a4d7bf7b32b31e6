//! Normalization of source record shapes into [`CanonicalRecipe`].
//!
//! Pure functions, no I/O. The only "failure mode" is defaulting: missing
//! optional inputs become empty or placeholder field values, never errors.
//!
//! ## Algorithm
//! - Corpus records: flatten the 20-slot ingredient shape in slot order via
//!   [`CandidateRecipe::ingredient_lines`].
//! - Generated records: zip the parallel ingredient/measurement arrays via
//!   [`GeneratedRecipe::ingredient_lines`].
//! - Description is composed from cuisine + category (+ tags) since neither
//!   source shape carries an explicit description.
//! - Cook time and difficulty are fixed placeholders; the corpus supplies
//!   neither.

use crate::types::{
    CandidateRecipe, CanonicalRecipe, GeneratedRecipe, Provenance, DEFAULT_COOK_TIME,
    DEFAULT_DIFFICULTY,
};

/// Normalize a corpus record.
///
/// Sets `provenance = Corpus` and carries the corpus identifier through as
/// `source_id`. A summary record (no instructions yet) normalizes with an
/// empty instructions field; the matching path hydrates before normalizing,
/// so that only happens for browse listings.
pub fn normalize_candidate(meal: &CandidateRecipe) -> CanonicalRecipe {
    CanonicalRecipe {
        title: meal.title.clone(),
        ingredients: meal.ingredient_lines(),
        instructions: meal.instructions.clone().unwrap_or_default(),
        image_url: meal.thumbnail.clone(),
        description: compose_description(
            meal.area.as_deref(),
            meal.category.as_deref(),
            meal.tags.as_deref(),
        ),
        cook_time: DEFAULT_COOK_TIME.to_string(),
        difficulty: DEFAULT_DIFFICULTY.to_string(),
        provenance: Provenance::Corpus,
        source_id: Some(meal.source_id.clone()),
        area: meal.area.clone(),
        category: meal.category.clone(),
        tags: split_tags(meal.tags.as_deref()),
        youtube_link: non_blank(meal.youtube.as_deref()),
    }
}

/// Normalize a generated record.
///
/// Sets `provenance = Generated` and no `source_id` (generated recipes have
/// no stable identity).
pub fn normalize_generated(recipe: &GeneratedRecipe) -> CanonicalRecipe {
    CanonicalRecipe {
        title: recipe.title.clone(),
        ingredients: recipe.ingredient_lines(),
        instructions: recipe.instructions.clone(),
        image_url: non_blank(recipe.thumbnail.as_deref()),
        description: compose_description(
            recipe.area.as_deref(),
            recipe.category.as_deref(),
            recipe.tags.as_deref(),
        ),
        cook_time: DEFAULT_COOK_TIME.to_string(),
        difficulty: DEFAULT_DIFFICULTY.to_string(),
        provenance: Provenance::Generated,
        source_id: None,
        area: recipe.area.clone(),
        category: recipe.category.clone(),
        tags: split_tags(recipe.tags.as_deref()),
        youtube_link: non_blank(recipe.youtube.as_deref()),
    }
}

/// Compose a display description: `"<area> <category> dish. <tags>"` with
/// whichever parts are present.
fn compose_description(area: Option<&str>, category: Option<&str>, tags: Option<&str>) -> String {
    let mut description = match (non_blank(area), non_blank(category)) {
        (Some(area), Some(category)) => format!("{area} {category} dish."),
        (Some(area), None) => format!("{area} dish."),
        (None, Some(category)) => format!("{category} dish."),
        (None, None) => String::new(),
    };
    let tags = split_tags(tags);
    if !tags.is_empty() {
        if !description.is_empty() {
            description.push(' ');
        }
        description.push_str(&tags.join(", "));
    }
    description
}

/// Split the corpus's comma-separated tag string into clean tags.
fn split_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
