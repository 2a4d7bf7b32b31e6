//! # Matcher Crate
//!
//! Ingredient-based candidate generation for the matching engine.
//!
//! ## Components
//!
//! ### Result Aggregator
//! Merges per-ingredient corpus lookups into one scored candidate set:
//! - One concurrent lookup per distinct ingredient
//! - Match count = how many requested ingredients a recipe satisfies
//! - Stable ranking: count descending, ties in first-discovery order
//! - Truncated to the top 5 to bound detail-fetch fan-out
//!
//! ### Detail Hydrator
//! Upgrades the top-ranked summary records to full records (instructions
//! present) before normalization, dropping candidates the corpus no longer
//! recognizes.
//!
//! ## Example Usage
//!
//! ```ignore
//! use corpus_client::CorpusClient;
//! use matcher::{aggregate, hydrate};
//! use recipe_model::IngredientSet;
//!
//! let client = CorpusClient::new("https://www.themealdb.com/api/json/v1/1")?;
//! let ingredients: IngredientSet = ["chicken", "rice"].into_iter().collect();
//!
//! let ranked = aggregate(&client, &ingredients).await;
//! let full = hydrate(&client, ranked).await;
//! ```

// Public modules
pub mod aggregate;
pub mod hydrate;
pub mod types;

// Re-export commonly used items
pub use aggregate::{aggregate, MAX_CANDIDATES};
pub use hydrate::hydrate;
pub use types::RankedCandidate;
