//! Core domain types shared by every stage of the matching engine.
//!
//! Three record shapes exist in this system:
//! - [`CandidateRecipe`]: what the recipe corpus returns. The corpus stores
//!   ingredients in a legacy flat shape (`strIngredient1..strIngredient20`
//!   with parallel `strMeasure` fields); that shape is confined to this
//!   module and only escapes through [`CandidateRecipe::ingredient_lines`].
//! - [`GeneratedRecipe`]: what the generative fallback produces. Parallel
//!   ingredient/measurement arrays, no stable identifier.
//! - [`CanonicalRecipe`]: the single shape every downstream consumer sees,
//!   produced by the [`crate::normalize`] module.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Number of ingredient slots in the corpus's flat record shape.
pub const MAX_INGREDIENT_SLOTS: usize = 20;

/// Measurement used when a generated recipe omits one for an ingredient.
pub const DEFAULT_MEASURE: &str = "to taste";

/// Cook time placeholder; the corpus never supplies a real cook time.
pub const DEFAULT_COOK_TIME: &str = "30";

/// Difficulty placeholder, for the same reason.
pub const DEFAULT_DIFFICULTY: &str = "Medium";

/// Image attached to generated recipes that arrive without one.
pub const PLACEHOLDER_IMAGE: &str =
    "https://plus.unsplash.com/premium_photo-1673108852141-e8c3c22a4a22?w=900&auto=format&fit=crop&q=60";

/// An insertion-ordered set of user-supplied ingredient names.
///
/// Names are deduplicated case-insensitively and blank entries are
/// rejected. Order is the order of addition: it is preserved for display
/// and it drives the aggregator's scan order (and therefore the stable
/// tie-break between equally-matched candidates).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientSet {
    names: Vec<String>,
    seen: HashSet<String>,
}

impl IngredientSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an ingredient name.
    ///
    /// Returns `false` (and leaves the set unchanged) when the name is
    /// blank or a case-insensitive duplicate of an existing entry.
    pub fn insert(&mut self, name: &str) -> bool {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return false;
        }
        if !self.seen.insert(trimmed.to_lowercase()) {
            return false;
        }
        self.names.push(trimmed.to_string());
        true
    }

    /// Whether the set contains `name` (case-insensitive).
    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(&name.trim().to_lowercase())
    }

    /// Iterate over the names in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// The first ingredient added, if any.
    pub fn first(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Join the names with a separator, in insertion order.
    pub fn join(&self, sep: &str) -> String {
        self.names.join(sep)
    }
}

impl<S: AsRef<str>> FromIterator<S> for IngredientSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for name in iter {
            set.insert(name.as_ref());
        }
        set
    }
}

/// A recipe as returned by the corpus.
///
/// Filter/search endpoints return a *summary* variant (no instructions);
/// the detail-lookup endpoint returns the *full* variant. Both decode into
/// this type; [`Self::is_hydrated`] tells them apart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateRecipe {
    /// Corpus-assigned identifier.
    #[serde(rename = "idMeal")]
    pub source_id: String,

    #[serde(rename = "strMeal")]
    pub title: String,

    #[serde(rename = "strMealThumb", default)]
    pub thumbnail: Option<String>,

    #[serde(rename = "strCategory", default)]
    pub category: Option<String>,

    #[serde(rename = "strArea", default)]
    pub area: Option<String>,

    #[serde(rename = "strInstructions", default)]
    pub instructions: Option<String>,

    /// Comma-separated tag string, as the corpus sends it.
    #[serde(rename = "strTags", default)]
    pub tags: Option<String>,

    #[serde(rename = "strYoutube", default)]
    pub youtube: Option<String>,

    /// The remaining wire fields, including the `strIngredientN` /
    /// `strMeasureN` slot pairs. Kept private so slot-indexed access never
    /// leaks past [`Self::ingredient_lines`].
    #[serde(flatten)]
    slots: HashMap<String, Option<String>>,
}

impl CandidateRecipe {
    /// Build a minimal summary record (no instructions, no slots).
    pub fn new(source_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            title: title.into(),
            thumbnail: None,
            category: None,
            area: None,
            instructions: None,
            tags: None,
            youtube: None,
            slots: HashMap::new(),
        }
    }

    /// Whether this record carries usable instructions, i.e. whether it is
    /// the full variant rather than a filter-endpoint summary.
    pub fn is_hydrated(&self) -> bool {
        self.instructions
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
    }

    /// Flatten the slotted ingredient shape into ordered display strings.
    ///
    /// Scans slots 1..=20 in order. Slots with a blank or absent ingredient
    /// name are skipped entirely; a non-blank measure is prefixed
    /// (`"<measure> <ingredient>"`, both trimmed), otherwise the ingredient
    /// name stands alone.
    pub fn ingredient_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for i in 1..=MAX_INGREDIENT_SLOTS {
            let Some(ingredient) = self.slot(&format!("strIngredient{i}")) else {
                continue;
            };
            let ingredient = ingredient.trim();
            if ingredient.is_empty() {
                continue;
            }
            match self.slot(&format!("strMeasure{i}")).map(str::trim) {
                Some(measure) if !measure.is_empty() => {
                    lines.push(format!("{measure} {ingredient}"));
                }
                _ => lines.push(ingredient.to_string()),
            }
        }
        lines
    }

    fn slot(&self, key: &str) -> Option<&str> {
        self.slots.get(key).and_then(|v| v.as_deref())
    }

    #[cfg(test)]
    pub(crate) fn set_slot(&mut self, index: usize, ingredient: &str, measure: &str) {
        self.slots
            .insert(format!("strIngredient{index}"), Some(ingredient.to_string()));
        self.slots
            .insert(format!("strMeasure{index}"), Some(measure.to_string()));
    }
}

/// A recipe synthesized by the generative fallback.
///
/// Ephemeral: identity is its title plus ingredient list within a session.
/// Uses parallel ingredient/measurement arrays instead of the corpus's
/// slotted shape. A payload missing `title` or `instructions` decodes with
/// the field empty; the adapter treats such a record as a failed generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedRecipe {
    #[serde(rename = "strMeal", default)]
    pub title: String,

    #[serde(rename = "strInstructions", default)]
    pub instructions: String,

    #[serde(rename = "strCategory", default)]
    pub category: Option<String>,

    #[serde(rename = "strArea", default)]
    pub area: Option<String>,

    #[serde(rename = "strMealThumb", default)]
    pub thumbnail: Option<String>,

    #[serde(rename = "strYoutube", default)]
    pub youtube: Option<String>,

    #[serde(rename = "strIngredients", default)]
    pub ingredients: Vec<String>,

    /// Parallel to `ingredients`; may be shorter, in which case missing
    /// entries default to [`DEFAULT_MEASURE`].
    #[serde(rename = "strMeasurements", default)]
    pub measurements: Vec<String>,

    #[serde(rename = "strTags", default)]
    pub tags: Option<String>,
}

impl GeneratedRecipe {
    /// Zip the parallel arrays into ordered display strings.
    ///
    /// Blank ingredient entries are skipped; a missing or blank measurement
    /// defaults to [`DEFAULT_MEASURE`].
    pub fn ingredient_lines(&self) -> Vec<String> {
        self.ingredients
            .iter()
            .enumerate()
            .filter_map(|(i, ingredient)| {
                let ingredient = ingredient.trim();
                if ingredient.is_empty() {
                    return None;
                }
                let measure = self
                    .measurements
                    .get(i)
                    .map(|m| m.trim())
                    .filter(|m| !m.is_empty())
                    .unwrap_or(DEFAULT_MEASURE);
                Some(format!("{measure} {ingredient}"))
            })
            .collect()
    }
}

/// Where a canonical recipe came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Corpus,
    Generated,
}

/// The one recipe shape downstream consumers work with.
///
/// Invariant: `provenance` is [`Provenance::Generated`] if and only if
/// `source_id` is `None`. Construct via the [`crate::normalize`] functions
/// to keep that guarantee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRecipe {
    pub title: String,

    /// Ordered ingredient display strings, measurement-prefixed where a
    /// measurement exists. Never contains blank entries.
    pub ingredients: Vec<String>,

    pub instructions: String,

    pub image_url: Option<String>,

    /// Composed from cuisine + category (+ tags) when the source supplies
    /// no explicit description.
    pub description: String,

    pub cook_time: String,

    pub difficulty: String,

    pub provenance: Provenance,

    /// Corpus identifier; present only for corpus-origin records.
    pub source_id: Option<String>,

    pub area: Option<String>,

    pub category: Option<String>,

    pub tags: Vec<String>,

    pub youtube_link: Option<String>,
}
