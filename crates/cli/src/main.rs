use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use corpus_client::CorpusClient;
use engine::{MatchOutcome, RecipeEngine};
use gen_client::GenClient;
use recipe_model::{CanonicalRecipe, IngredientSet, Provenance};

/// PantryChef - Ingredient-based recipe matching engine
#[derive(Parser)]
#[command(name = "pantry-chef")]
#[command(about = "Find or generate recipes from the ingredients you have", long_about = None)]
struct Cli {
    /// Base URL of the recipe corpus API
    #[arg(
        long,
        env = "CORPUS_API_URL",
        default_value = "https://www.themealdb.com/api/json/v1/1"
    )]
    corpus_url: String,

    /// generateContent endpoint of the generative service
    #[arg(
        long,
        env = "GENERATIVE_API_URL",
        default_value = "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-pro:generateContent"
    )]
    generative_url: String,

    /// API key for the generative service
    #[arg(long, env = "GENERATIVE_API_KEY", default_value = "")]
    generative_key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match corpus recipes against a set of ingredients
    Match {
        /// Ingredient to search with (repeat for multiple)
        #[arg(long = "ingredient", value_name = "NAME", required = true)]
        ingredients: Vec<String>,

        /// Fall back to AI generation when nothing matches
        #[arg(long)]
        generate_if_empty: bool,
    },

    /// Ask the generative service for a recipe, skipping the corpus
    Generate {
        /// Ingredient to cook with (repeat for multiple)
        #[arg(long = "ingredient", value_name = "NAME", required = true)]
        ingredients: Vec<String>,
    },

    /// Fetch one random recipe from the corpus
    Random,

    /// List all recipe categories
    Categories,

    /// List all cuisines
    Cuisines,

    /// Browse recipes by category or cuisine
    Browse {
        /// Category to browse (e.g. "Seafood")
        #[arg(long)]
        category: Option<String>,

        /// Cuisine to browse (e.g. "Japanese")
        #[arg(long)]
        cuisine: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let engine = RecipeEngine::new(
        CorpusClient::new(&cli.corpus_url)?,
        GenClient::new(&cli.generative_url, &cli.generative_key)?,
    );

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Match {
            ingredients,
            generate_if_empty,
        } => handle_match(&engine, ingredients, generate_if_empty).await?,
        Commands::Generate { ingredients } => handle_generate(&engine, ingredients).await?,
        Commands::Random => handle_random(&engine).await?,
        Commands::Categories => handle_categories(&engine).await?,
        Commands::Cuisines => handle_cuisines(&engine).await?,
        Commands::Browse { category, cuisine } => handle_browse(&engine, category, cuisine).await?,
    }

    Ok(())
}

fn parse_ingredients(raw: Vec<String>) -> Result<IngredientSet> {
    let set: IngredientSet = raw.iter().collect();
    if set.is_empty() {
        return Err(anyhow!("Add at least one non-empty ingredient"));
    }
    Ok(set)
}

/// Handle the 'match' command
async fn handle_match(
    engine: &RecipeEngine,
    ingredients: Vec<String>,
    generate_if_empty: bool,
) -> Result<()> {
    let ingredients = parse_ingredients(ingredients)?;
    println!(
        "Searching for recipes with: {}",
        ingredients.join(", ").cyan()
    );

    if generate_if_empty {
        match engine.find_or_generate(&ingredients).await {
            MatchOutcome::Matched(recipes) => print_recipes(&recipes),
            MatchOutcome::Generated(recipe) => {
                println!("{}", "No matches found, generated one instead:".yellow());
                print_recipe(&recipe);
            }
        }
        return Ok(());
    }

    let recipes = engine.find_by_ingredients(&ingredients).await;
    if recipes.is_empty() {
        println!(
            "{}",
            "No recipes found. Try --generate-if-empty for an AI-authored one.".yellow()
        );
    } else {
        print_recipes(&recipes);
    }
    Ok(())
}

/// Handle the 'generate' command
async fn handle_generate(engine: &RecipeEngine, ingredients: Vec<String>) -> Result<()> {
    let ingredients = parse_ingredients(ingredients)?;
    println!(
        "Generating a recipe with: {}",
        ingredients.join(", ").cyan()
    );
    let recipe = engine.generate(&ingredients).await;
    print_recipe(&recipe);
    Ok(())
}

/// Handle the 'random' command
async fn handle_random(engine: &RecipeEngine) -> Result<()> {
    let recipe = engine.random_recipe().await?;
    print_recipe(&recipe);
    Ok(())
}

/// Handle the 'categories' command
async fn handle_categories(engine: &RecipeEngine) -> Result<()> {
    let categories = engine.categories().await?;
    println!("{} categories:", categories.len());
    for category in categories {
        println!("{} {}", "•".green(), category.name.bold());
        if let Some(description) = category.description {
            println!("  {}", summarize(&description));
        }
    }
    Ok(())
}

/// Handle the 'cuisines' command
async fn handle_cuisines(engine: &RecipeEngine) -> Result<()> {
    let cuisines = engine.cuisines().await?;
    println!("{} cuisines:", cuisines.len());
    for cuisine in cuisines {
        println!("{} {}", "•".green(), cuisine);
    }
    Ok(())
}

/// Handle the 'browse' command
async fn handle_browse(
    engine: &RecipeEngine,
    category: Option<String>,
    cuisine: Option<String>,
) -> Result<()> {
    let recipes = match (category, cuisine) {
        (Some(category), None) => engine.browse_by_category(&category).await?,
        (None, Some(cuisine)) => engine.browse_by_cuisine(&cuisine).await?,
        _ => return Err(anyhow!("Pass exactly one of --category or --cuisine")),
    };
    println!("{} recipes:", recipes.len());
    for recipe in recipes {
        println!("{} {}", "•".green(), recipe.title.bold());
    }
    Ok(())
}

/// Category descriptions run long; keep the listing scannable. An ellipsis
/// is only added when text was actually cut.
fn summarize(description: &str) -> String {
    let short: String = description.chars().take(100).collect();
    if short.chars().count() < description.chars().count() {
        format!("{short}...")
    } else {
        short
    }
}

fn print_recipes(recipes: &[CanonicalRecipe]) {
    println!("Found {} recipes:\n", recipes.len());
    for recipe in recipes {
        print_recipe(recipe);
        println!();
    }
}

fn print_recipe(recipe: &CanonicalRecipe) {
    match recipe.provenance {
        Provenance::Corpus => println!("{}", recipe.title.bold()),
        Provenance::Generated => {
            println!("{} {}", recipe.title.bold(), "[AI Generated]".green())
        }
    }
    if !recipe.description.is_empty() {
        println!("  {}", recipe.description.italic());
    }
    println!(
        "  ~{} mins | {} | {}",
        recipe.cook_time,
        recipe.difficulty,
        recipe
            .source_id
            .as_deref()
            .map(|id| format!("corpus #{id}"))
            .unwrap_or_else(|| "generated".to_string())
    );
    for line in &recipe.ingredients {
        println!("  {} {}", "•".green(), line);
    }
    if !recipe.instructions.is_empty() {
        println!("\n{}", recipe.instructions);
    }
    if let Some(link) = &recipe.youtube_link {
        println!("  Video: {link}");
    }
}
