use anyhow::Result;
use log::LevelFilter;
use recipebox::cli::{self, Command, MAX_RANDOM_COUNT};
use recipebox::client::CatalogClient;
use recipebox::config::Config;
use recipebox::context::{AppContext, StandardContext};
use recipebox::controller::{RecipeController, ToggleOutcome};
use recipebox::display::{self, RecipeDisplay};
use recipebox::favorites::FavoritesStore;
use recipebox::storage::FileStorage;
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::env;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = match cli::parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!();
            cli::print_help("recipebox");
            return Ok(ExitCode::from(2));
        }
    };

    // The logger accepts everything; the global max level does the filtering,
    // so it can be tightened once the config is known.
    let _ = TermLogger::init(
        LevelFilter::Trace,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
    log::set_max_level(if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });

    let ctx = StandardContext::new(args.root.clone());
    let config = Config::load_or_init(&ctx)?;
    if !args.verbose {
        log::set_max_level(config.log_level_filter());
    }
    log::debug!("Config file: {}", ctx.get_config_file_path()?.display());

    let client = CatalogClient::from_config(&config)?;
    let store = FavoritesStore::open(FileStorage::from_context(&ctx)?);
    let mut controller = RecipeController::new(client, store, config.featured_count);

    match args.command {
        Command::Help => cli::print_help("recipebox"),
        Command::Home => {
            let page = controller.home().await;
            print!(
                "{}",
                display::render_home(&page, |id| controller.store().is_favorite(id))
            );
        }
        Command::Search(text) => {
            let page = controller.search_page(Some(&text), None).await;
            print!(
                "{}",
                display::render_search(&page, |id| controller.store().is_favorite(id))
            );
        }
        Command::Category(name) => {
            let page = controller.search_page(None, Some(&name)).await;
            print!(
                "{}",
                display::render_search(&page, |id| controller.store().is_favorite(id))
            );
        }
        Command::Categories => {
            let categories = controller.client().get_categories().await;
            if categories.is_empty() {
                println!("No categories found.");
            }
            for category in categories {
                println!("{}", category.name);
            }
        }
        Command::Random(count) => {
            let count = count.unwrap_or(config.random_count).min(MAX_RANDOM_COUNT);
            let recipes = controller.client().get_random_recipes(count).await;
            if recipes.is_empty() {
                println!("No recipes found.");
            } else {
                println!(
                    "{}",
                    display::render_list(&recipes, |id| controller.store().is_favorite(id))
                );
            }
        }
        Command::Show(id) => match controller.recipe_page(&id).await {
            Some(page) => print!("{}", display::render_recipe(&page)),
            None => {
                println!("Recipe not found.");
                return Ok(ExitCode::FAILURE);
            }
        },
        Command::Favorites => {
            print!("{}", display::render_favorites(controller.favorites_page()));
        }
        Command::Fav(id) => {
            match controller.toggle_favorite(&id).await {
                ToggleOutcome::Saved(saved_id) => {
                    if let Some(recipe) = controller.store().get(&saved_id) {
                        println!("Saved {}", recipe.to_card_line(true));
                    }
                }
                ToggleOutcome::Removed(removed_id) => {
                    println!("Removed {} from your favorites.", removed_id)
                }
                ToggleOutcome::NotFound => {
                    println!("Recipe not found.");
                    return Ok(ExitCode::FAILURE);
                }
            }
            if !controller.store().can_save() {
                eprintln!("Favorites file could not be read; changes were not written.");
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Unfav(id) => {
            if controller.remove_favorite(&id) {
                println!("Removed {} from your favorites.", id);
            } else {
                println!("Recipe {} is not in your favorites.", id);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
