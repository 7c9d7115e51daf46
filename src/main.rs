//! astrofeed CLI
//!
//! Command-line front end over the astrofeed operations. Results are printed
//! as JSON on stdout, logs go to stderr. Invalid input and unknown ids exit
//! with status 2, every other failure with 1.

use astrofeed::{AppError, AppServices, Category, Config, ConfigError};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "astrofeed")]
#[command(about = "Browse spaceflight news and manage favorites", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Look up one resource, sweeping every category unless one is given
    Get {
        id: String,
        #[arg(long, short)]
        category: Option<Category>,
    },
    /// List one category
    List { category: Category },
    /// List all three categories
    Collection,
    /// Search titles across all categories
    Search { query: String },
    /// Favorites operations
    Favorites(FavoritesArgs),
    /// Show configured upstream and favorites backend
    Status,
}

#[derive(Debug, Args)]
struct FavoritesArgs {
    #[command(subcommand)]
    command: FavoritesCommand,
}

#[derive(Debug, Subcommand)]
enum FavoritesCommand {
    /// Stored favorite ids
    List,
    /// Add an id (no-op when already present)
    Add { id: String },
    /// Remove an id (no-op when absent)
    Remove { id: String },
    /// Favorites resolved into full resources
    Show,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    App(#[from] AppError),
    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::App(error) if error.is_client_error() => 2,
            _ => 1,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,astrofeed=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(error) = run(cli).await {
        eprintln!("Error: {error}");
        std::process::exit(error.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = Config::from_env()?;
    let services = AppServices::from_config(&config).await?;

    match cli.command {
        Commands::Get { id, category } => print_json(&services.resolve_one(category, &id).await?),
        Commands::List { category } => print_json(&services.list_category(category).await?),
        Commands::Collection => print_json(&services.list_all_categories().await?),
        Commands::Search { query } => print_json(&services.search(&query).await?),
        Commands::Favorites(args) => run_favorites(&services, args.command).await,
        Commands::Status => print_json(&services.health_report()),
    }
}

async fn run_favorites(services: &AppServices, command: FavoritesCommand) -> Result<(), CliError> {
    match command {
        FavoritesCommand::List => print_json(&services.favorites_list().await?),
        FavoritesCommand::Add { id } => print_json(&services.favorites_add(&id).await?),
        FavoritesCommand::Remove { id } => print_json(&services.favorites_remove(&id).await?),
        FavoritesCommand::Show => print_json(&services.favorite_resources().await?),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use astrofeed::FavoritesError;

    #[test]
    fn client_errors_exit_with_two() {
        let invalid = CliError::App(AppError::Validation("resource id is missing".to_string()));
        let missing = CliError::App(AppError::NotFound {
            id: "999999".to_string(),
        });

        assert_eq!(invalid.exit_code(), 2);
        assert_eq!(missing.exit_code(), 2);
    }

    #[test]
    fn other_failures_exit_with_one() {
        let config = CliError::Config(ConfigError::UnknownBackend("redis".to_string()));
        let persistence = CliError::App(AppError::Persistence(FavoritesError::Read {
            path: "favorites.json".into(),
            source: std::io::Error::other("disk gone"),
        }));
        let output = CliError::Output(
            serde_json::from_str::<u8>("not json").expect_err("must fail to parse"),
        );

        assert_eq!(config.exit_code(), 1);
        assert_eq!(persistence.exit_code(), 1);
        assert_eq!(output.exit_code(), 1);
    }
}
