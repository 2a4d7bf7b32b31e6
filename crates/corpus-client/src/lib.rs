//! HTTP client for the recipe corpus.
//!
//! The corpus is a TheMealDB-shaped JSON API. Every list endpoint wraps its
//! results in a `{ "meals": [...] | null }` envelope where `null` means
//! "no results", not an error; this client decodes both the same way.
//!
//! Two contracts matter to the matching path:
//! - [`CorpusClient::lookup_by_ingredient`] fails soft: any network or
//!   decode failure yields an empty list so one bad ingredient lookup never
//!   aborts an aggregation.
//! - [`CorpusClient::fetch_detail`] returns `None` both for unknown
//!   identifiers and for transient failures; callers skip the candidate.
//!
//! The browsing lookups (`random_recipe`, category/cuisine listing and
//! filtering) surface errors normally via [`CorpusError`].

use std::time::Duration;

use recipe_model::CandidateRecipe;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Bound on every corpus request, so one slow ingredient lookup cannot
/// stall a whole aggregation batch.
pub const CORPUS_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors surfaced by the browsing lookups.
///
/// The matching-path methods (`lookup_by_ingredient`, `fetch_detail`)
/// recover from these internally and never return them.
#[derive(Error, Debug)]
pub enum CorpusError {
    /// Request construction, transport, non-2xx status, or body decode.
    #[error("corpus request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// An endpoint that must return a record returned an empty envelope.
    #[error("corpus returned no record from {endpoint}")]
    EmptyResponse { endpoint: &'static str },
}

/// A recipe category as listed by the corpus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    #[serde(rename = "strCategory")]
    pub name: String,

    #[serde(rename = "strCategoryThumb", default)]
    pub thumbnail: Option<String>,

    #[serde(rename = "strCategoryDescription", default)]
    pub description: Option<String>,
}

/// The `{ "meals": [...] | null }` envelope shared by most endpoints.
#[derive(Deserialize)]
struct MealEnvelope<T> {
    meals: Option<Vec<T>>,
}

/// The `{ "categories": [...] }` envelope of the category-list endpoint.
#[derive(Deserialize)]
struct CategoryEnvelope {
    #[serde(default)]
    categories: Option<Vec<Category>>,
}

/// Item shape of the cuisine-list endpoint (`list.php?a=list`).
#[derive(Deserialize)]
struct CuisineName {
    #[serde(rename = "strArea")]
    name: String,
}

/// Client for the recipe corpus API.
///
/// Holds no mutable state between calls; cloning is cheap (the underlying
/// `reqwest::Client` is an `Arc` internally), so aggregation fan-out can
/// hand a clone to every spawned lookup task.
#[derive(Clone)]
pub struct CorpusClient {
    http: reqwest::Client,
    base_url: String,
}

impl CorpusClient {
    /// Create a client for the corpus at `base_url`
    /// (e.g. `"https://www.themealdb.com/api/json/v1/1"`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, CorpusError> {
        Self::with_timeout(base_url, CORPUS_TIMEOUT)
    }

    /// Create a client with a non-default request timeout (tests use a
    /// short one to exercise timeout behavior).
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CorpusError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// The base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Look up summary records whose recipes use `ingredient`.
    ///
    /// Fails soft: network or decode errors are logged and yield an empty
    /// list. Zero hits for an obscure ingredient also yield an empty list;
    /// the two cases are deliberately indistinguishable to the aggregator.
    pub async fn lookup_by_ingredient(&self, ingredient: &str) -> Vec<CandidateRecipe> {
        match self.fetch_meals("filter.php", &[("i", ingredient)]).await {
            Ok(meals) => meals,
            Err(err) => {
                warn!(ingredient, "ingredient lookup failed: {err}");
                Vec::new()
            }
        }
    }

    /// Fetch the full record for a corpus identifier.
    ///
    /// `None` means "unknown id" or "transient failure"; callers must treat
    /// both as "skip this candidate".
    pub async fn fetch_detail(&self, source_id: &str) -> Option<CandidateRecipe> {
        match self.fetch_meals("lookup.php", &[("i", source_id)]).await {
            Ok(meals) => meals.into_iter().next(),
            Err(err) => {
                warn!(source_id, "detail lookup failed: {err}");
                None
            }
        }
    }

    /// Fetch one random full record.
    pub async fn random_recipe(&self) -> Result<CandidateRecipe, CorpusError> {
        self.fetch_meals("random.php", &[])
            .await?
            .into_iter()
            .next()
            .ok_or(CorpusError::EmptyResponse {
                endpoint: "random.php",
            })
    }

    /// Summary records in a category.
    pub async fn list_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<CandidateRecipe>, CorpusError> {
        self.fetch_meals("filter.php", &[("c", category)]).await
    }

    /// Summary records from a cuisine/area.
    pub async fn list_by_cuisine(&self, area: &str) -> Result<Vec<CandidateRecipe>, CorpusError> {
        self.fetch_meals("filter.php", &[("a", area)]).await
    }

    /// All recipe categories, with thumbnails and descriptions.
    pub async fn list_categories(&self) -> Result<Vec<Category>, CorpusError> {
        let envelope: CategoryEnvelope = self.get_json("categories.php", &[]).await?;
        Ok(envelope.categories.unwrap_or_default())
    }

    /// All cuisine/area names.
    pub async fn list_cuisines(&self) -> Result<Vec<String>, CorpusError> {
        let envelope: MealEnvelope<CuisineName> = self.get_json("list.php", &[("a", "list")]).await?;
        Ok(envelope
            .meals
            .unwrap_or_default()
            .into_iter()
            .map(|cuisine| cuisine.name)
            .collect())
    }

    /// Fetch a meal-enveloped endpoint, decoding `null` as empty.
    async fn fetch_meals(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<CandidateRecipe>, CorpusError> {
        let envelope: MealEnvelope<CandidateRecipe> = self.get_json(path, query).await?;
        Ok(envelope.meals.unwrap_or_default())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, CorpusError> {
        let url = format!("{}/{path}", self.base_url);
        debug!(%url, "corpus request");
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<T>().await?)
    }
}
