//! Engine crate for the PantryChef matching core.
//!
//! This crate contains the engine that coordinates the corpus client,
//! aggregation/hydration, normalization, and the generative fallback.

pub mod engine;

pub use engine::{MatchOutcome, RecipeEngine};
