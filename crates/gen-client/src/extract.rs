//! Best-effort extraction of a structured recipe from free text.
//!
//! The generative service is asked for JSON but is free to answer with
//! prose, fenced code blocks, or nothing useful at all. This module holds
//! the recovery ladder: dig a JSON object out of the text, build a record
//! from the raw prose, or synthesize a deterministic template.

use lazy_static::lazy_static;
use recipe_model::{GeneratedRecipe, IngredientSet, DEFAULT_MEASURE};
use regex::Regex;

lazy_static! {
    static ref FENCED_JSON: Regex = Regex::new(r"(?s)```json\s*(.*?)```").unwrap();
    static ref FENCED_ANY: Regex = Regex::new(r"(?s)```\s*(.*?)```").unwrap();
    // Ordered: the "recipe for X" phrasing is the most reliable signal.
    static ref TITLE_PATTERNS: [Regex; 3] = [
        Regex::new(r#"(?i)recipe for ["']?([^"'\n:.]+)"#).unwrap(),
        Regex::new(r#"(?i)["']?([^"'\n]+?)["']? recipe"#).unwrap(),
        Regex::new(r#"(?i)dish ["']?([^"'\n:.]+)"#).unwrap(),
    ];
}

/// Find a JSON object embedded in free text.
///
/// Tries a ```` ```json ```` fence, then any fence, then the widest
/// brace-delimited span. Returns the candidate text; the caller decides
/// whether it actually parses.
pub(crate) fn embedded_json(text: &str) -> Option<String> {
    if let Some(captures) = FENCED_JSON.captures(text) {
        return Some(captures[1].trim().to_string());
    }
    if let Some(captures) = FENCED_ANY.captures(text) {
        return Some(captures[1].trim().to_string());
    }
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| text[start..=end].to_string())
}

/// Build a structured record out of a prose response.
///
/// The raw text becomes the instructions; the title is guessed from
/// "recipe for X"-style phrases, falling back to the first ingredient.
pub(crate) fn recipe_from_text(text: &str, ingredients: &IngredientSet) -> GeneratedRecipe {
    GeneratedRecipe {
        title: guess_title(text, ingredients),
        instructions: text.trim().to_string(),
        category: Some("Mixed".to_string()),
        area: Some("Fusion".to_string()),
        thumbnail: None,
        youtube: None,
        ingredients: ingredients.iter().map(str::to_string).collect(),
        measurements: vec![DEFAULT_MEASURE.to_string(); ingredients.len()],
        tags: Some("AI Generated".to_string()),
    }
}

/// Deterministic template used when the service fails outright.
///
/// Title derives from the first supplied ingredient; the instruction body
/// is a fixed five-step template naming the supplied ingredients verbatim.
pub(crate) fn synthesized(ingredients: &IngredientSet) -> GeneratedRecipe {
    let main = ingredients.first().unwrap_or("food");
    GeneratedRecipe {
        title: format!("{} Special", capitalize(main)),
        instructions: format!(
            "This is a simple recipe using {}.\n\n\
             1. Gather all ingredients.\n\
             2. Prepare {} by washing and cutting as needed.\n\
             3. Combine with other ingredients.\n\
             4. Cook until done.\n\
             5. Serve and enjoy!",
            ingredients.join(", "),
            main
        ),
        category: Some("Mixed".to_string()),
        area: Some("International".to_string()),
        thumbnail: None,
        youtube: None,
        ingredients: ingredients.iter().map(str::to_string).collect(),
        measurements: vec![DEFAULT_MEASURE.to_string(); ingredients.len()],
        tags: Some("Simple,Quick,Easy".to_string()),
    }
}

fn guess_title(text: &str, ingredients: &IngredientSet) -> String {
    for pattern in TITLE_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(text) {
            let title = captures[1].trim();
            if !title.is_empty() {
                return title.to_string();
            }
        }
    }
    match ingredients.first() {
        Some(first) => format!("{} Recipe", capitalize(first)),
        None => "Recipe".to_string(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
