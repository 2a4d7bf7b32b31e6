//! # Recipe Match Engine
//!
//! Coordinates the whole matching pipeline:
//! 1. Per-ingredient corpus lookups (concurrent fan-out)
//! 2. Merge and rank by match count
//! 3. Hydrate the top candidates with full detail
//! 4. Normalize into canonical records
//! 5. Generative fallback when the caller wants one
//!
//! The matching surface never returns an error: transient corpus failures
//! degrade to fewer (or zero) results, and the generative path always
//! produces *some* recipe. Only the browsing passthroughs surface errors.

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use corpus_client::{Category, CorpusClient};
use gen_client::GenClient;
use matcher::{aggregate, hydrate};
use recipe_model::{normalize_candidate, normalize_generated, CanonicalRecipe, IngredientSet};

/// What the combined match-then-fallback flow produced.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    /// Corpus matches, best match first. Empty only for an empty
    /// ingredient set.
    Matched(Vec<CanonicalRecipe>),
    /// No usable corpus match; a generated recipe instead.
    Generated(CanonicalRecipe),
}

/// Main engine tying the corpus client, matcher, and generative fallback
/// together behind canonical-record outputs.
#[derive(Clone)]
pub struct RecipeEngine {
    corpus: CorpusClient,
    generator: GenClient,
}

impl RecipeEngine {
    pub fn new(corpus: CorpusClient, generator: GenClient) -> Self {
        Self { corpus, generator }
    }

    /// Find corpus recipes matching the given ingredients.
    ///
    /// Returns canonical records sorted best-match-first. An empty result
    /// is not an error — it is the documented trigger condition for the
    /// generative fallback, and deciding whether to invoke that fallback
    /// is the caller's business (or use [`Self::find_or_generate`]).
    pub async fn find_by_ingredients(&self, ingredients: &IngredientSet) -> Vec<CanonicalRecipe> {
        let start = Instant::now();

        let ranked = aggregate(&self.corpus, ingredients).await;
        info!("Aggregated {} candidates", ranked.len());

        let full = hydrate(&self.corpus, ranked).await;
        info!("Hydrated {} candidates", full.len());

        let recipes: Vec<CanonicalRecipe> = full
            .iter()
            .map(|candidate| normalize_candidate(&candidate.recipe))
            .collect();

        info!(
            "Matched {} recipes for {} ingredients in {:.2?}",
            recipes.len(),
            ingredients.len(),
            start.elapsed()
        );
        recipes
    }

    /// Request an AI-authored recipe for the given ingredients.
    ///
    /// Never fails; the adapter degrades internally (see `gen-client`).
    /// Legitimate both as the empty-match fallback and on explicit user
    /// request regardless of corpus results.
    pub async fn generate(&self, ingredients: &IngredientSet) -> CanonicalRecipe {
        let recipe = self.generator.generate(ingredients).await;
        normalize_generated(&recipe)
    }

    /// Convenience flow: match against the corpus, falling back to
    /// generation when nothing usable comes back.
    ///
    /// An empty ingredient set short-circuits to an empty match — valid
    /// input, no lookups, no generation.
    pub async fn find_or_generate(&self, ingredients: &IngredientSet) -> MatchOutcome {
        if ingredients.is_empty() {
            return MatchOutcome::Matched(Vec::new());
        }

        let matched = self.find_by_ingredients(ingredients).await;
        if matched.is_empty() {
            info!("No corpus matches, invoking generative fallback");
            MatchOutcome::Generated(self.generate(ingredients).await)
        } else {
            MatchOutcome::Matched(matched)
        }
    }

    /// One random corpus recipe, normalized.
    pub async fn random_recipe(&self) -> Result<CanonicalRecipe> {
        let meal = self
            .corpus
            .random_recipe()
            .await
            .context("Failed to fetch a random recipe")?;
        Ok(normalize_candidate(&meal))
    }

    /// Normalized summaries for a category listing.
    pub async fn browse_by_category(&self, category: &str) -> Result<Vec<CanonicalRecipe>> {
        let meals = self
            .corpus
            .list_by_category(category)
            .await
            .with_context(|| format!("Failed to list category {category}"))?;
        Ok(meals.iter().map(normalize_candidate).collect())
    }

    /// Normalized summaries for a cuisine/area listing.
    pub async fn browse_by_cuisine(&self, area: &str) -> Result<Vec<CanonicalRecipe>> {
        let meals = self
            .corpus
            .list_by_cuisine(area)
            .await
            .with_context(|| format!("Failed to list cuisine {area}"))?;
        Ok(meals.iter().map(normalize_candidate).collect())
    }

    /// All corpus categories.
    pub async fn categories(&self) -> Result<Vec<Category>> {
        self.corpus
            .list_categories()
            .await
            .context("Failed to list categories")
    }

    /// All corpus cuisine names.
    pub async fn cuisines(&self) -> Result<Vec<String>> {
        self.corpus
            .list_cuisines()
            .await
            .context("Failed to list cuisines")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use recipe_model::Provenance;
    use serde_json::{json, Value};
    use std::collections::HashMap;

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    async fn serve(app: Router) -> (String, tokio::task::JoinHandle<()>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock service");
        let addr = listener.local_addr().expect("Failed to get local address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock service failed");
        });
        (format!("http://{addr}"), handle)
    }

    fn summary(id: &str, title: &str) -> Value {
        json!({ "idMeal": id, "strMeal": title, "strMealThumb": null })
    }

    fn detail(id: &str, title: &str) -> Value {
        json!({
            "idMeal": id,
            "strMeal": title,
            "strCategory": "Chicken",
            "strArea": "Japanese",
            "strInstructions": format!("Cook {title} thoroughly."),
            "strMealThumb": format!("https://example.test/{id}.jpg"),
            "strTags": "Savoury",
            "strIngredient1": "chicken",
            "strMeasure1": "1 lb",
            "strIngredient2": "rice",
            "strMeasure2": "2 cups"
        })
    }

    /// Mock corpus: chicken -> A, B, C; rice -> B, C; full details for all.
    fn mock_corpus() -> Router {
        let filter = |Query(params): Query<HashMap<String, String>>| async move {
            let meals = match params.get("i").map(String::as_str) {
                Some("chicken") => json!([
                    summary("A", "Chicken Pie"),
                    summary("B", "Chicken Fried Rice"),
                    summary("C", "Chicken Congee"),
                ]),
                Some("rice") => json!([
                    summary("B", "Chicken Fried Rice"),
                    summary("C", "Chicken Congee"),
                ]),
                _ => Value::Null,
            };
            Json(json!({ "meals": meals }))
        };
        let lookup = |Query(params): Query<HashMap<String, String>>| async move {
            let meals = match params.get("i").map(String::as_str) {
                Some("A") => json!([detail("A", "Chicken Pie")]),
                Some("B") => json!([detail("B", "Chicken Fried Rice")]),
                Some("C") => json!([detail("C", "Chicken Congee")]),
                _ => Value::Null,
            };
            Json(json!({ "meals": meals }))
        };
        let random = || async { Json(json!({ "meals": [detail("R", "Random Gyoza")] })) };

        Router::new()
            .route("/filter.php", get(filter))
            .route("/lookup.php", get(lookup))
            .route("/random.php", get(random))
    }

    /// Mock generative service returning a structured recipe.
    fn mock_generator() -> Router {
        let generate = || async {
            let recipe = json!({
                "strMeal": "Durian Snail Surprise",
                "strInstructions": "Combine the durian and snails. Serve chilled.",
                "strCategory": "Mixed",
                "strArea": "Fusion",
                "strIngredients": ["durian", "snails"],
                "strMeasurements": ["1", "12"]
            })
            .to_string();
            Json(json!({
                "candidates": [ { "content": { "parts": [ { "text": recipe } ] } } ]
            }))
        };
        Router::new().route("/generate", post(generate))
    }

    async fn build_engine() -> (RecipeEngine, Vec<tokio::task::JoinHandle<()>>) {
        let (corpus_base, corpus_handle) = serve(mock_corpus()).await;
        let (gen_base, gen_handle) = serve(mock_generator()).await;

        let engine = RecipeEngine::new(
            CorpusClient::new(&corpus_base).expect("corpus client"),
            GenClient::new(format!("{gen_base}/generate"), "test-key").expect("gen client"),
        );
        (engine, vec![corpus_handle, gen_handle])
    }

    fn abort_all(handles: Vec<tokio::task::JoinHandle<()>>) {
        for handle in handles {
            handle.abort();
        }
    }

    // ============================================================================
    // Matching path
    // ============================================================================

    #[tokio::test]
    async fn chicken_rice_scenario_end_to_end() {
        let (engine, handles) = build_engine().await;

        let ingredients: IngredientSet = ["chicken", "rice"].into_iter().collect();
        let recipes = engine.find_by_ingredients(&ingredients).await;

        // B and C (both ingredients) outrank A; B discovered first.
        assert_eq!(recipes.len(), 3);
        assert_eq!(recipes[0].source_id.as_deref(), Some("B"));
        assert_eq!(recipes[1].source_id.as_deref(), Some("C"));
        assert_eq!(recipes[2].source_id.as_deref(), Some("A"));

        for recipe in &recipes {
            assert_eq!(recipe.provenance, Provenance::Corpus);
            assert!(recipe.source_id.is_some());
            assert!(!recipe.instructions.is_empty(), "Hydrated before normalize");
            assert_eq!(recipe.ingredients, vec!["1 lb chicken", "2 cups rice"]);
        }

        abort_all(handles);
    }

    #[tokio::test]
    async fn find_or_generate_prefers_corpus_matches() {
        let (engine, handles) = build_engine().await;

        let ingredients: IngredientSet = ["chicken", "rice"].into_iter().collect();
        match engine.find_or_generate(&ingredients).await {
            MatchOutcome::Matched(recipes) => assert_eq!(recipes.len(), 3),
            MatchOutcome::Generated(_) => panic!("Corpus matches should win"),
        }

        abort_all(handles);
    }

    #[tokio::test]
    async fn empty_ingredient_set_returns_empty_match() {
        let (engine, handles) = build_engine().await;

        match engine.find_or_generate(&IngredientSet::new()).await {
            MatchOutcome::Matched(recipes) => assert!(recipes.is_empty()),
            MatchOutcome::Generated(_) => panic!("Empty input must not generate"),
        }

        abort_all(handles);
    }

    // ============================================================================
    // Fallback path
    // ============================================================================

    #[tokio::test]
    async fn total_miss_falls_back_to_generation() {
        let (engine, handles) = build_engine().await;

        let ingredients: IngredientSet = ["durian", "snails"].into_iter().collect();
        let outcome = engine.find_or_generate(&ingredients).await;

        let MatchOutcome::Generated(recipe) = outcome else {
            panic!("Zero corpus hits must trigger generation");
        };
        assert_eq!(recipe.provenance, Provenance::Generated);
        assert_eq!(recipe.source_id, None);
        let joined = recipe.ingredients.join(" / ").to_lowercase();
        assert!(joined.contains("durian"));
        assert!(joined.contains("snails"));

        abort_all(handles);
    }

    #[tokio::test]
    async fn explicit_generation_ignores_corpus() {
        let (engine, handles) = build_engine().await;

        // "chicken" has corpus matches, but the user asked for AI.
        let ingredients: IngredientSet = ["chicken"].into_iter().collect();
        let recipe = engine.generate(&ingredients).await;

        assert_eq!(recipe.provenance, Provenance::Generated);
        assert_eq!(recipe.title, "Durian Snail Surprise");

        abort_all(handles);
    }

    #[tokio::test]
    async fn generation_succeeds_even_when_service_is_down() {
        let (corpus_base, corpus_handle) = serve(mock_corpus()).await;
        // Generative endpoint that always errors.
        let (gen_base, gen_handle) = serve(Router::new().route(
            "/generate",
            post(|| async { axum::http::StatusCode::SERVICE_UNAVAILABLE }),
        ))
        .await;

        let engine = RecipeEngine::new(
            CorpusClient::new(&corpus_base).unwrap(),
            GenClient::new(format!("{gen_base}/generate"), "test-key").unwrap(),
        );

        let ingredients: IngredientSet = ["durian", "snails"].into_iter().collect();
        let recipe = engine.generate(&ingredients).await;

        // From the caller's perspective generation always succeeds.
        assert_eq!(recipe.provenance, Provenance::Generated);
        assert!(!recipe.title.is_empty());
        assert!(!recipe.instructions.is_empty());

        corpus_handle.abort();
        gen_handle.abort();
    }

    // ============================================================================
    // Browse passthroughs
    // ============================================================================

    #[tokio::test]
    async fn random_recipe_is_normalized() {
        let (engine, handles) = build_engine().await;

        let recipe = engine.random_recipe().await.expect("random recipe");
        assert_eq!(recipe.source_id.as_deref(), Some("R"));
        assert_eq!(recipe.provenance, Provenance::Corpus);
        assert_eq!(recipe.description, "Japanese Chicken dish. Savoury");

        abort_all(handles);
    }

    #[tokio::test]
    async fn browse_errors_surface_when_corpus_unreachable() {
        let (base, handle) = serve(Router::new()).await;
        handle.abort();
        let _ = handle.await;

        let engine = RecipeEngine::new(
            CorpusClient::new(&base).unwrap(),
            GenClient::new(format!("{base}/generate"), "test-key").unwrap(),
        );

        assert!(engine.random_recipe().await.is_err());
        assert!(engine.categories().await.is_err());
    }
}
