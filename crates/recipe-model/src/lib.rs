//! # Recipe Model Crate
//!
//! Domain types and shape normalization for the matching engine.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (IngredientSet, CandidateRecipe,
//!   GeneratedRecipe, CanonicalRecipe)
//! - **normalize**: Convert either source shape into the canonical shape
//!
//! ## Example Usage
//!
//! ```ignore
//! use recipe_model::{normalize_candidate, CandidateRecipe, IngredientSet};
//!
//! let ingredients: IngredientSet = ["chicken", "rice"].into_iter().collect();
//!
//! // A corpus record decoded from the wire...
//! let meal: CandidateRecipe = serde_json::from_str(payload)?;
//!
//! // ...becomes the one shape the rest of the app consumes.
//! let recipe = normalize_candidate(&meal);
//! println!("{} ({} ingredients)", recipe.title, recipe.ingredients.len());
//! ```

// Public modules
pub mod normalize;
pub mod types;

// Re-export commonly used items for convenience
pub use normalize::{normalize_candidate, normalize_generated};
pub use types::{
    // Core types
    CandidateRecipe,
    CanonicalRecipe,
    GeneratedRecipe,
    IngredientSet,
    Provenance,
    // Defaults and limits
    DEFAULT_COOK_TIME,
    DEFAULT_DIFFICULTY,
    DEFAULT_MEASURE,
    MAX_INGREDIENT_SLOTS,
    PLACEHOLDER_IMAGE,
};
