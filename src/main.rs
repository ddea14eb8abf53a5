mod catalog;
mod config;
mod core;
mod search;
mod seed;
mod ui;

use crate::catalog::CatalogStore;
use crate::config::{ConfigManager, LarderConfig};
use crate::core::{LarderError, RecipeId, SearchQuery, DEFAULT_MAX_TIME_MINUTES};
use crate::search::SearchEngine;
use crate::ui::{
    create_spinner, log_error, log_success, print_banner, print_results, print_substitutions,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::exit;

#[derive(Parser)]
#[command(name = "larder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Search {
        ingredients: Vec<String>,
        #[arg(long, default_value = "")]
        dietary: String,
        #[arg(long, default_value = "")]
        difficulty: String,
        #[arg(long)]
        max_time: Option<i64>,
        #[arg(long)]
        servings: Option<i64>,
        #[arg(long, action)]
        json: bool,
    },
    Browse {
        query: Option<String>,
    },
    Rate {
        recipe_id: i64,
        rating: i64,
    },
    Subs {
        recipe_id: i64,
    },
    Config {
        #[arg(long)]
        set_db: Option<PathBuf>,
        #[arg(long, action)]
        show: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Machine-readable output stays clean of decoration.
    let quiet = matches!(&cli.command, Commands::Search { json: true, .. });
    if !quiet {
        print_banner();
    }

    if let Err(e) = run(cli).await {
        if quiet {
            println!("{}", serde_json::json!({ "error": e.to_string() }));
        } else {
            log_error(&e.to_string());
        }
        exit(1);
    }
}

fn larder_root() -> PathBuf {
    match std::env::var("LARDER_HOME") {
        Ok(path) => PathBuf::from(path),
        Err(_) => {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".larder")
        }
    }
}

async fn open_store(config: &LarderConfig, quiet: bool) -> Result<CatalogStore, LarderError> {
    let db_url = format!("sqlite://{}?mode=rwc", config.db_path.display());
    let store = CatalogStore::new(&db_url).await?;

    let seeded = store.ensure_seeded().await?;
    if seeded > 0 && !quiet {
        log_success(&format!("Seeded starter catalog ({} recipes)", seeded));
    }

    Ok(store)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let root = larder_root();
    if !root.exists() {
        std::fs::create_dir_all(&root)?;
    }

    let config_manager = ConfigManager::new(&root);
    let mut config = config_manager.load().await?;

    match cli.command {
        Commands::Search {
            ingredients,
            dietary,
            difficulty,
            max_time,
            servings,
            json,
        } => {
            let store = open_store(&config, json).await?;

            let spinner = (!json).then(|| create_spinner("Loading catalog..."));
            let catalog = store.load_all().await?;
            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }

            let query = SearchQuery {
                ingredients,
                dietary,
                difficulty,
                max_time: max_time.unwrap_or(DEFAULT_MAX_TIME_MINUTES),
                servings: servings.unwrap_or(0),
            };
            let report = SearchEngine::search(catalog, &query)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_results(&report);
            }
        }
        Commands::Browse { query } => {
            let store = open_store(&config, false).await?;
            let catalog = store.load_all().await?;
            SearchEngine::browse(query.as_deref(), &catalog);
        }
        Commands::Rate { recipe_id, rating } => {
            let store = open_store(&config, false).await?;
            let (new_avg, count) = store.rate(RecipeId(recipe_id), rating).await?;
            log_success(&format!(
                "Rating saved: {:.1} stars across {} ratings",
                new_avg, count
            ));
        }
        Commands::Subs { recipe_id } => {
            let store = open_store(&config, false).await?;
            let subs = store.substitutions(RecipeId(recipe_id)).await?;
            print_substitutions(&subs);
        }
        Commands::Config { set_db, show } => {
            if let Some(path) = set_db {
                config.db_path = path.clone();
                config_manager.save(&config).await?;
                log_success(&format!("Catalog database set to: {}", path.display()));
            } else if show {
                println!("Current Configuration:");
                println!("   Catalog DB: {}", config.db_path.display());
            } else {
                println!("Use --show or --set-db <PATH>");
            }
        }
    }

    Ok(())
}
