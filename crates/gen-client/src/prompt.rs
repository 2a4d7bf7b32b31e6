//! Prompt composition for the generative service.

use recipe_model::IngredientSet;

/// Build the generation prompt for a set of ingredients.
///
/// Asks for a structured JSON object in the same field naming the rest of
/// the system uses, so a well-behaved response deserializes directly into
/// [`recipe_model::GeneratedRecipe`].
pub fn recipe_prompt(ingredients: &IngredientSet) -> String {
    format!(
        "Generate a detailed recipe that can be made with these ingredients: {}.\n\
         \n\
         Format the response as a structured JSON object with these fields:\n\
         - strMeal: The name of the dish\n\
         - strCategory: The category of the dish (e.g., Vegetarian, Seafood, etc.)\n\
         - strArea: The cuisine of origin\n\
         - strInstructions: Detailed step-by-step cooking instructions\n\
         - strMealThumb: Leave blank, the image is handled elsewhere\n\
         - strYoutube: Leave blank\n\
         - strIngredients: An array of all ingredients needed (including the ones provided)\n\
         - strMeasurements: An array of measurements corresponding to each ingredient\n\
         - strTags: Comma-separated tags for the recipe (e.g., \"Vegetarian,Spicy,Quick\")\n\
         \n\
         Please ensure the recipe is realistic, makes good use of the provided \
         ingredients, and includes clear, step-by-step instructions.",
        ingredients.join(", ")
    )
}
