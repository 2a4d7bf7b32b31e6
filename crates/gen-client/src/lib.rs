//! Generative fallback client.
//!
//! Requests a synthesized recipe from a generative text service
//! (Gemini-style `generateContent` endpoint) constrained to the supplied
//! ingredients. The defining property of this adapter is that it never
//! fails: whatever the service does — structured JSON, prose, garbage,
//! timeout, non-2xx — the caller always gets back a usable
//! [`GeneratedRecipe`].
//!
//! ## Degradation ladder
//! 1. **Structured**: the whole response text parses as a recipe object.
//! 2. **ExtractedFromText**: a recipe object was dug out of a code fence or
//!    brace span, or built from the raw prose (title guessed, prose as
//!    instructions).
//! 3. **Synthesized**: the service call failed, or it returned recipe JSON
//!    with no usable name and instructions; a deterministic template is
//!    built from the ingredients alone.
//!
//! The public [`GenClient::generate`] collapses the tiers into one success
//! type; [`GenClient::generate_with_outcome`] keeps the tier visible for
//! callers (and tests) that care.

use std::time::Duration;

use recipe_model::{GeneratedRecipe, IngredientSet, DEFAULT_MEASURE, PLACEHOLDER_IMAGE};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

mod extract;
pub mod prompt;

/// Bound on the generative request.
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Which tier of the degradation ladder produced a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The service returned recipe JSON directly.
    Structured,
    /// Recovered from free text (fenced/embedded JSON or raw prose).
    ExtractedFromText,
    /// The service failed; the template fallback was used.
    Synthesized,
}

/// Errors from the generative path.
///
/// Only construction surfaces these to callers. Once a client is built, the
/// generation surface never fails: request errors are absorbed by the
/// degradation ladder and logged with a reason.
#[derive(Error, Debug)]
pub enum GenError {
    #[error("generative request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("generative response contained no text")]
    EmptyResponse,
}

// Wire shapes of the `generateContent` API.

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Deserialize)]
struct ResponseCandidate {
    content: Content,
}

/// Client for the generative text service.
#[derive(Clone)]
pub struct GenClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GenClient {
    /// Create a client for the `generateContent` endpoint at `endpoint`,
    /// authenticating with `api_key`.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self, GenError> {
        Self::with_timeout(endpoint, api_key, GENERATION_TIMEOUT)
    }

    /// Create a client with a non-default timeout (tests use a short one).
    pub fn with_timeout(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    /// Generate a recipe constrained to `ingredients`.
    ///
    /// Never fails; see the module docs for the degradation ladder.
    pub async fn generate(&self, ingredients: &IngredientSet) -> GeneratedRecipe {
        self.generate_with_outcome(ingredients).await.0
    }

    /// Like [`Self::generate`], but also reports which degradation tier
    /// produced the recipe.
    #[instrument(skip(self, ingredients), fields(ingredient_count = ingredients.len()))]
    pub async fn generate_with_outcome(
        &self,
        ingredients: &IngredientSet,
    ) -> (GeneratedRecipe, GenerationOutcome) {
        let prompt = prompt::recipe_prompt(ingredients);
        let (mut recipe, outcome) = match self.request_completion(&prompt).await {
            Ok(text) => interpret(&text, ingredients),
            Err(err) => {
                warn!("generative service failed, synthesizing fallback: {err}");
                (extract::synthesized(ingredients), GenerationOutcome::Synthesized)
            }
        };
        finish(&mut recipe, ingredients);
        debug!(?outcome, title = %recipe.title, "generated recipe");
        (recipe, outcome)
    }

    /// One `generateContent` round trip, returning the response text.
    async fn request_completion(&self, prompt: &str) -> Result<String, GenError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let payload: GenerateContentResponse = response.json().await?;
        payload
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .filter(|text| !text.trim().is_empty())
            .ok_or(GenError::EmptyResponse)
    }
}

/// Turn a non-empty response text into a recipe, classifying the tier.
///
/// A payload that decodes as recipe JSON (directly or dug out of the text)
/// but lacks a usable name and instructions is a failed generation: it goes
/// straight to the synthesized template. Only non-JSON prose is worth
/// salvaging as instructions.
fn interpret(text: &str, ingredients: &IngredientSet) -> (GeneratedRecipe, GenerationOutcome) {
    if let Ok(recipe) = serde_json::from_str::<GeneratedRecipe>(text) {
        return if is_usable(&recipe) {
            (recipe, GenerationOutcome::Structured)
        } else {
            (extract::synthesized(ingredients), GenerationOutcome::Synthesized)
        };
    }
    if let Some(candidate) = extract::embedded_json(text) {
        if let Ok(recipe) = serde_json::from_str::<GeneratedRecipe>(&candidate) {
            return if is_usable(&recipe) {
                (recipe, GenerationOutcome::ExtractedFromText)
            } else {
                (extract::synthesized(ingredients), GenerationOutcome::Synthesized)
            };
        }
    }
    (
        extract::recipe_from_text(text, ingredients),
        GenerationOutcome::ExtractedFromText,
    )
}

/// A payload without a usable name and instructions counts as a failure.
fn is_usable(recipe: &GeneratedRecipe) -> bool {
    !recipe.title.trim().is_empty() && !recipe.instructions.trim().is_empty()
}

/// Post-processing applied on every tier: attach the placeholder image when
/// the service supplied none, and guarantee every supplied ingredient
/// appears in the ingredient list.
fn finish(recipe: &mut GeneratedRecipe, ingredients: &IngredientSet) {
    if recipe
        .thumbnail
        .as_deref()
        .is_none_or(|thumb| thumb.trim().is_empty())
    {
        recipe.thumbnail = Some(PLACEHOLDER_IMAGE.to_string());
    }

    for name in ingredients.iter() {
        let needle = name.to_lowercase();
        let present = recipe
            .ingredients
            .iter()
            .any(|entry| entry.to_lowercase().contains(&needle));
        if !present {
            recipe.ingredients.push(name.to_string());
        }
    }
    if recipe.measurements.len() < recipe.ingredients.len() {
        recipe
            .measurements
            .resize(recipe.ingredients.len(), DEFAULT_MEASURE.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;

    async fn serve(app: Router) -> (String, tokio::task::JoinHandle<()>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock generative service");
        let addr = listener.local_addr().expect("Failed to get local address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Mock generative service failed");
        });
        (format!("http://{addr}/generate"), handle)
    }

    fn completion(text: &str) -> serde_json::Value {
        json!({ "candidates": [ { "content": { "parts": [ { "text": text } ] } } ] })
    }

    fn ingredients() -> IngredientSet {
        ["durian", "snails"].into_iter().collect()
    }

    #[test]
    fn direct_json_is_structured() {
        let text = json!({
            "strMeal": "Durian Snail Stew",
            "strInstructions": "Simmer gently.",
            "strIngredients": ["durian", "snails", "water"],
            "strMeasurements": ["1", "12"]
        })
        .to_string();

        let (recipe, outcome) = interpret(&text, &ingredients());
        assert_eq!(outcome, GenerationOutcome::Structured);
        assert_eq!(recipe.title, "Durian Snail Stew");
    }

    #[test]
    fn fenced_json_is_extracted() {
        let text = format!(
            "Here's a recipe!\n```json\n{}\n```",
            json!({ "strMeal": "Fence Stew", "strInstructions": "Stir." })
        );

        let (recipe, outcome) = interpret(&text, &ingredients());
        assert_eq!(outcome, GenerationOutcome::ExtractedFromText);
        assert_eq!(recipe.title, "Fence Stew");
    }

    #[test]
    fn json_without_name_or_instructions_synthesizes() {
        // Decodes as a recipe object, but fails the usability check; the
        // raw JSON must not leak into the instruction body.
        let (recipe, outcome) = interpret(r#"{"strCategory": "Mystery"}"#, &ingredients());
        assert_eq!(outcome, GenerationOutcome::Synthesized);
        assert_eq!(recipe.title, "Durian Special");
        assert!(!recipe.instructions.contains("strCategory"));
    }

    #[test]
    fn fenced_json_without_required_fields_synthesizes() {
        let text = "Here you go!\n```json\n{\"strArea\": \"Nowhere\"}\n```";
        let (recipe, outcome) = interpret(text, &ingredients());
        assert_eq!(outcome, GenerationOutcome::Synthesized);
        assert!(recipe.instructions.contains("durian, snails"));
    }

    #[test]
    fn prose_becomes_instructions() {
        let text = "Boil the snails, then fold in durian chunks. Season well.";

        let (recipe, outcome) = interpret(text, &ingredients());
        assert_eq!(outcome, GenerationOutcome::ExtractedFromText);
        assert_eq!(recipe.instructions, text);
        assert_eq!(recipe.title, "Durian Recipe");
    }

    #[test]
    fn finish_attaches_placeholder_and_supplied_ingredients() {
        let mut recipe = GeneratedRecipe {
            title: "Bare".to_string(),
            instructions: "Cook.".to_string(),
            category: None,
            area: None,
            thumbnail: None,
            youtube: None,
            ingredients: vec!["Fresh durian chunks".to_string()],
            measurements: vec![],
            tags: None,
        };
        finish(&mut recipe, &ingredients());

        assert_eq!(recipe.thumbnail.as_deref(), Some(PLACEHOLDER_IMAGE));
        // "durian" already present via substring; "snails" appended.
        assert_eq!(
            recipe.ingredients,
            vec!["Fresh durian chunks".to_string(), "snails".to_string()]
        );
        assert_eq!(recipe.measurements.len(), recipe.ingredients.len());
    }

    #[tokio::test]
    async fn structured_success_round_trip() {
        let body = json!({
            "strMeal": "Durian Snail Stew",
            "strInstructions": "Simmer everything for an hour.",
            "strCategory": "Seafood",
            "strArea": "Fusion",
            "strIngredients": ["durian", "snails"],
            "strMeasurements": ["1", "12"]
        })
        .to_string();
        let app = Router::new().route(
            "/generate",
            post(move || {
                let body = body.clone();
                async move { Json(completion(&body)) }
            }),
        );
        let (endpoint, handle) = serve(app).await;

        let client = GenClient::new(&endpoint, "test-key").unwrap();
        let (recipe, outcome) = client.generate_with_outcome(&ingredients()).await;

        assert_eq!(outcome, GenerationOutcome::Structured);
        assert_eq!(recipe.title, "Durian Snail Stew");
        assert_eq!(recipe.thumbnail.as_deref(), Some(PLACEHOLDER_IMAGE));

        handle.abort();
    }

    #[tokio::test]
    async fn server_error_synthesizes_template() {
        let app = Router::new().route(
            "/generate",
            post(|| async { axum::http::StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let (endpoint, handle) = serve(app).await;

        let client = GenClient::new(&endpoint, "test-key").unwrap();
        let (recipe, outcome) = client.generate_with_outcome(&ingredients()).await;

        assert_eq!(outcome, GenerationOutcome::Synthesized);
        assert_eq!(recipe.title, "Durian Special");
        assert!(!recipe.instructions.is_empty());
        assert!(recipe.instructions.contains("durian, snails"));
        assert_eq!(recipe.ingredients, vec!["durian", "snails"]);

        handle.abort();
    }

    #[tokio::test]
    async fn timeout_synthesizes_template() {
        let app = Router::new().route(
            "/generate",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(completion("too late"))
            }),
        );
        let (endpoint, handle) = serve(app).await;

        let client =
            GenClient::with_timeout(&endpoint, "test-key", Duration::from_millis(100)).unwrap();
        let (recipe, outcome) = client.generate_with_outcome(&ingredients()).await;

        assert_eq!(outcome, GenerationOutcome::Synthesized);
        assert!(!recipe.title.is_empty());
        assert!(!recipe.instructions.is_empty());

        handle.abort();
    }

    #[tokio::test]
    async fn payload_missing_required_fields_synthesizes_template() {
        // Valid JSON, but no strMeal/strInstructions: a failed generation,
        // served by the deterministic template.
        let body = json!({ "strCategory": "Mystery" }).to_string();
        let app = Router::new().route(
            "/generate",
            post(move || {
                let body = body.clone();
                async move { Json(completion(&body)) }
            }),
        );
        let (endpoint, handle) = serve(app).await;

        let client = GenClient::new(&endpoint, "test-key").unwrap();
        let (recipe, outcome) = client.generate_with_outcome(&ingredients()).await;

        assert_eq!(outcome, GenerationOutcome::Synthesized);
        assert_eq!(recipe.title, "Durian Special");
        assert!(!recipe.instructions.contains("Mystery"));

        handle.abort();
    }

    #[tokio::test]
    async fn empty_completion_synthesizes_template() {
        let app = Router::new().route(
            "/generate",
            post(|| async { Json(json!({ "candidates": [] })) }),
        );
        let (endpoint, handle) = serve(app).await;

        let client = GenClient::new(&endpoint, "test-key").unwrap();
        let (_, outcome) = client.generate_with_outcome(&ingredients()).await;
        assert_eq!(outcome, GenerationOutcome::Synthesized);

        handle.abort();
    }
}
