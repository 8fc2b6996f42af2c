use std::fs::OpenOptions;
use std::path::Path;
use std::rc::Rc;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use ghexplorer_api::GitHubClient;
use ghexplorer_cache::CacheManager;
use ghexplorer_core::{
    CatalogSource, Config, Favorites, GitHubCatalog, Preferences, Query, Repository,
    SearchController,
};
use ghexplorer_tui::App;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ghexplorer")]
#[command(version, about = "Search GitHub repositories from the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// GitHub personal access token (raises the rate limit)
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// API base URL, for GitHub Enterprise or a local mock
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Results per page
    #[arg(long, global = true)]
    per_page: Option<u32>,

    /// Quiet period after typing before the TUI searches
    #[arg(long, global = true)]
    debounce_ms: Option<u64>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Launch the interactive explorer (default)
    Tui,
    /// Run a single search and print the results
    Search {
        /// Search query
        query: String,
        /// Page to fetch, starting at 1
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Print JSON instead of one line per repository
        #[arg(long)]
        json: bool,
    },
    /// Manage favorite repositories
    Favorites {
        #[command(subcommand)]
        action: FavoritesCommand,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(clap::Subcommand)]
enum FavoritesCommand {
    /// List favorites in the order they were added
    List {
        #[arg(long)]
        json: bool,
    },
    /// Remove a favorite by repository id
    Remove { id: u64 },
}

#[derive(clap::Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Print where the config file lives
    Path,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut cli = Cli::parse();
    let config = load_config(&cli)?;
    let command = cli.command.take().unwrap_or(Commands::Tui);

    // stdout belongs to the terminal UI, so the TUI logs to a file
    if !matches!(command, Commands::Tui) {
        init_stderr_logging();
    }

    match command {
        Commands::Tui => {
            let data_dir = config.data_dir()?;
            std::fs::create_dir_all(&data_dir)?;
            init_file_logging(&data_dir.join("ghexplorer.log"))?;
            run_explorer(config).await
        }
        Commands::Search { query, page, json } => search(&config, &query, page, json).await,
        Commands::Favorites { action } => favorites(&config, action),
        Commands::Config { action } => show_config(&config, action),
    }
}

/// File, then env, then flags. clap already folded GITHUB_TOKEN into `--token`.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::load()?;

    if let Some(token) = &cli.token {
        config.github.token = Some(token.clone());
    }
    if let Some(api_url) = &cli.api_url {
        config.github.api_url = api_url.clone();
    }
    if let Some(per_page) = cli.per_page {
        config.github.per_page = per_page;
    }
    if let Some(debounce_ms) = cli.debounce_ms {
        config.search.debounce_ms = debounce_ms;
    }

    Ok(config)
}

fn init_stderr_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ghexplorer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn init_file_logging(path: &Path) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ghexplorer=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .init();
    Ok(())
}

fn catalog(config: &Config) -> anyhow::Result<GitHubCatalog> {
    let client = GitHubClient::with_base_url(config.github.token.clone(), config.github.api_url.clone())?
        .with_timeout(config.github.timeout())?
        .with_per_page(config.github.per_page);
    Ok(GitHubCatalog::new(client))
}

fn open_store(config: &Config) -> anyhow::Result<Rc<CacheManager>> {
    let db_path = config.database_path()?;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store = CacheManager::new(&db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;
    Ok(Rc::new(store))
}

async fn run_explorer(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting explorer against {}", config.github.api_url);

    let store = open_store(&config)?;
    let favorites = Favorites::load(Rc::clone(&store))?;
    let preferences = Preferences::load(store)?;
    let controller = SearchController::new(catalog(&config)?, config.search.options());

    ghexplorer_tui::run_tui(
        App::new(favorites, preferences),
        controller,
        config.search.load_more_threshold,
        config.ui.mouse_enabled,
    )
    .await
}

async fn search(config: &Config, query: &str, page: u32, json: bool) -> anyhow::Result<()> {
    let query = Query::new(query);
    if query.is_empty() {
        anyhow::bail!("Search query cannot be empty");
    }

    tracing::info!("Searching for: {}", query);
    let repos = catalog(config)?.fetch(query.as_str(), page).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&repos)?);
    } else if repos.is_empty() {
        println!("No repositories found for \"{}\" (page {})", query, page);
    } else {
        print_repositories(&repos);
    }
    Ok(())
}

fn favorites(config: &Config, action: FavoritesCommand) -> anyhow::Result<()> {
    let mut favorites = Favorites::load(open_store(config)?)?;

    match action {
        FavoritesCommand::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(favorites.list())?);
            } else if favorites.is_empty() {
                println!("No favorites yet");
            } else {
                print_repositories(favorites.list());
            }
        }
        FavoritesCommand::Remove { id } => {
            if favorites.remove(id)? {
                println!("Removed {} from favorites", id);
            } else {
                anyhow::bail!("{} is not a favorite", id);
            }
        }
    }
    Ok(())
}

fn show_config(config: &Config, action: ConfigCommand) -> anyhow::Result<()> {
    match action {
        ConfigCommand::Show => {
            let mut shown = config.clone();
            if shown.github.token.is_some() {
                shown.github.token = Some("<redacted>".to_string());
            }
            print!("{}", toml::to_string_pretty(&shown)?);
        }
        ConfigCommand::Path => println!("{}", Config::config_path()?.display()),
    }
    Ok(())
}

fn print_repositories(repos: &[Repository]) {
    for repo in repos {
        println!(
            "{:>10}  ⭐ {:<7} {}  {}",
            repo.id,
            repo.stars,
            repo.full_name,
            repo.short_description(60)
        );
    }
}
