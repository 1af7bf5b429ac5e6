//! Command-line front end for the Little Chef recipe book.
//!
//! Favorites are shared with the app through the data directory; filters
//! and selection only last for one invocation.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use little_chef::{Category, Config, Criteria, Difficulty, Recipe, RecipeBook, SortBy};

#[derive(Parser)]
#[command(name = "little-chef", about = "Browse and create kids' recipes")]
struct Cli {
    /// Directory holding saved favorites (overrides LITTLE_CHEF_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List recipes
    List {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Show one recipe with its previous and next recipes in the list
    Show {
        /// Recipe id
        id: String,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Add or remove a favorite
    Favorite {
        /// Recipe id
        id: String,
    },
    /// Ask the AI chef for a new recipe
    Generate {
        /// אפייה / בישול / טיגון (or baking / cooking / frying)
        category: Category,
        /// What to make, e.g. "dinosaur cookies"
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },
}

#[derive(Args)]
struct ViewArgs {
    /// Only this category
    #[arg(long)]
    category: Option<Category>,
    /// Only this difficulty
    #[arg(long)]
    difficulty: Option<Difficulty>,
    /// Match title, description or ingredient names
    #[arg(long, default_value = "")]
    search: String,
    /// title, time or difficulty
    #[arg(long, default_value = "title")]
    sort: SortBy,
    /// Only favorites
    #[arg(long)]
    favorites: bool,
}

impl From<ViewArgs> for Criteria {
    fn from(args: ViewArgs) -> Self {
        Criteria {
            category: args.category,
            difficulty: args.difficulty,
            search: args.search,
            favorites_only: args.favorites,
            sort_by: args.sort,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load().context("failed to load configuration")?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir.into();
    }
    let mut book = RecipeBook::open(&config).context("failed to open recipe book")?;

    match cli.command {
        Commands::List { view } => {
            book.set_criteria(view.into());
            cmd_list(&book);
        }
        Commands::Show { id, view } => {
            book.set_criteria(view.into());
            cmd_show(&mut book, &id)?;
        }
        Commands::Favorite { id } => {
            if !book.catalog().contains(&id) {
                anyhow::bail!("no recipe with id {id}");
            }
            let now = book.toggle_favorite(&id);
            println!(
                "{id} {} favorites ({} total)",
                if now { "added to" } else { "removed from" },
                book.favorites_count()
            );
        }
        Commands::Generate { category, prompt } => {
            let prompt = prompt.join(" ");
            match book.generate(&prompt, category).await {
                Ok(recipe) => print_recipe(&book, &recipe),
                Err(e) => {
                    eprintln!("{}", e.user_message());
                    return Err(e).context("recipe generation failed");
                }
            }
        }
    }

    Ok(())
}

fn cmd_list(book: &RecipeBook) {
    let view = book.view();
    if view.is_empty() {
        if book.criteria().has_active_filters() {
            println!("No recipes match. Try clearing the filters.");
        } else {
            println!("No recipes yet.");
        }
        return;
    }
    for recipe in &view {
        let star = if book.is_favorite(&recipe.id) { "*" } else { " " };
        println!(
            "{star} {:>14}  {}  [{} | {} | {} min]",
            recipe.id,
            recipe.title,
            recipe.category,
            recipe.difficulty,
            recipe.time_minutes
        );
    }
}

fn cmd_show(book: &mut RecipeBook, id: &str) -> anyhow::Result<()> {
    let recipe = book
        .select(id)
        .with_context(|| format!("no recipe with id {id}"))?;
    print_recipe(book, &recipe);

    let neighbors = book.neighbors();
    let label = |r: Option<&Recipe>| r.map_or_else(|| "-".to_string(), |r| r.id.clone());
    println!(
        "\nprevious: {}   next: {}",
        label(neighbors.previous.as_deref()),
        label(neighbors.next.as_deref())
    );
    Ok(())
}

fn print_recipe(book: &RecipeBook, recipe: &Recipe) {
    let star = if book.is_favorite(&recipe.id) { " *" } else { "" };
    let generated = if recipe.is_generated { " (AI)" } else { "" };
    println!("{}{star}{generated}", recipe.title);
    println!("{}", recipe.description);
    println!(
        "{} | {} | {} min",
        recipe.category, recipe.difficulty, recipe.time_minutes
    );
    let image = recipe.display_image(false);
    if image.starts_with("data:") {
        println!("image: (generated picture, {} bytes)", image.len());
    } else {
        println!("image: {image}");
    }

    println!("\nIngredients:");
    for ingredient in &recipe.ingredients {
        println!("  - {} {}", ingredient.amount, ingredient.item);
    }
    println!("\nSteps:");
    for (n, step) in recipe.instructions.iter().enumerate() {
        println!("  {}. {step}", n + 1);
    }
}
