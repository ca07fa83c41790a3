pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use storefront_core::config::{AppConfig, LoadOptions};

use commands::bounds::BoundsArgs;
use commands::browse::BrowseArgs;
use commands::compare::CompareArgs;
use commands::recent::RecentArgs;
use commands::suggest::SuggestArgs;

#[derive(Debug, Parser)]
#[command(
    name = "storefront",
    about = "Storefront catalog query CLI",
    long_about = "Filter, sort and search a product catalog file the way the storefront listing does.",
    after_help = "Examples:\n  storefront browse --catalog products.json --term watch --sort price-asc\n  storefront suggest --catalog products.json --term wa --keys down,enter\n  storefront config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "List products matching a search term, category and price range")]
    Browse {
        #[arg(long, help = "Path to a JSON product catalog")]
        catalog: PathBuf,
        #[arg(long, help = "Case-insensitive search over names and descriptions")]
        term: Option<String>,
        #[arg(long, help = "All|Smartphones|Smartwatches|Earbuds|Cameras|Accessories")]
        category: Option<String>,
        #[arg(long, help = "Lowest price in USD (defaults to the category floor)")]
        min: Option<String>,
        #[arg(long, help = "Highest price in USD (defaults to the category ceiling)")]
        max: Option<String>,
        #[arg(long, help = "price-asc|price-desc|rating-desc|newest|most-reviewed")]
        sort: Option<String>,
        #[arg(long, help = "Display currency; the choice is remembered")]
        currency: Option<String>,
        #[arg(long, help = "Saved exchange-rate provider response")]
        rates: Option<PathBuf>,
    },
    #[command(about = "Show autocomplete suggestions and replay dropdown keys")]
    Suggest {
        #[arg(long, help = "Path to a JSON product catalog")]
        catalog: PathBuf,
        #[arg(long, help = "Text typed into the search box")]
        term: String,
        #[arg(long, value_delimiter = ',', help = "down|up|enter|escape|focus|outside|hover:N")]
        keys: Vec<String>,
    },
    #[command(about = "Print price bounds per category")]
    Bounds {
        #[arg(long, help = "Path to a JSON product catalog")]
        catalog: PathBuf,
        #[arg(long, help = "Limit output to one category")]
        category: Option<String>,
    },
    #[command(about = "Show, extend or clear the recently viewed history")]
    Recent {
        #[arg(long, help = "Path to a JSON product catalog")]
        catalog: Option<PathBuf>,
        #[arg(long, requires = "catalog", help = "Record a product id as viewed")]
        add: Option<String>,
        #[arg(long, help = "Forget the stored history first")]
        clear: bool,
    },
    #[command(about = "Compare up to four products side by side")]
    Compare {
        #[arg(long, help = "Path to a JSON product catalog")]
        catalog: PathBuf,
        #[arg(long, value_delimiter = ',', required = true, help = "Product ids to compare")]
        ids: Vec<String>,
    },
    #[command(about = "Top deals and new arrivals for the landing page")]
    Showcase {
        #[arg(long, help = "Path to a JSON product catalog")]
        catalog: PathBuf,
    },
    #[command(about = "Check every catalog entry against the product form rules")]
    Lint {
        #[arg(long, help = "Path to a JSON product catalog")]
        catalog: PathBuf,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    if let Err(error) = init_logging() {
        eprintln!("logging disabled: {error:#}");
    }

    let result = match cli.command {
        Command::Browse { catalog, term, category, min, max, sort, currency, rates } => {
            commands::browse::run(BrowseArgs {
                catalog,
                term,
                category,
                min,
                max,
                sort,
                currency,
                rates,
            })
        }
        Command::Suggest { catalog, term, keys } => {
            commands::suggest::run(SuggestArgs { catalog, term, keys })
        }
        Command::Bounds { catalog, category } => {
            commands::bounds::run(BoundsArgs { catalog, category })
        }
        Command::Recent { catalog, add, clear } => {
            commands::recent::run(RecentArgs { catalog, add, clear })
        }
        Command::Compare { catalog, ids } => commands::compare::run(CompareArgs { catalog, ids }),
        Command::Showcase { catalog } => commands::showcase::run(catalog),
        Command::Lint { catalog } => commands::lint::run(catalog),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so stdout carries only the command payload. An invalid
/// config is reported by the command itself, so logging falls back to defaults.
fn init_logging() -> anyhow::Result<()> {
    use storefront_core::config::LogFormat::{Compact, Json, Pretty};
    use tracing::Level;

    let config = AppConfig::load(LoadOptions::default()).unwrap_or_default();
    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    match config.logging.format {
        Compact => builder.compact().try_init(),
        Pretty => builder.pretty().try_init(),
        Json => builder.json().try_init(),
    }
    .map_err(|error| anyhow!(error))
}
