//! Combo CLI - Create and manage product combos from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! combo-cli products --search pro --category Laptop
//!
//! # Create a combo (repeating a SKU raises its quantity)
//! combo-cli combos create --name "Apple Ecosystem" --sku IP15 --sku IP15 --sku APP
//!
//! # Adopt the first suggestion for a category
//! combo-cli combos suggest --param category=Audio
//! combo-cli combos adopt 0 --param category=Audio
//!
//! # Pause a combo
//! combo-cli combos toggle 42
//! ```
//!
//! # Commands
//!
//! - `products` - List catalog products
//! - `combos list|show|create|suggest|adopt|edit|toggle|delete` - Combo operations
//!
//! Configuration comes from `COMBO_*` environment variables (see
//! `combo_console::config`). Log verbosity follows `RUST_LOG`; pass
//! `--log-format json` for one JSON object per log line.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use combo_console_core::{ComboId, ComboStatus, Sku, StatusFilter};

mod commands;

#[derive(Parser)]
#[command(name = "combo-cli")]
#[command(author, version, about = "Product combo console")]
struct Cli {
    /// Override `COMBO_API_BASE_URL`
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Log line format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products
    Products {
        /// Case-insensitive name search
        #[arg(short, long)]
        search: Option<String>,

        /// Exact category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Manage combos
    Combos {
        #[command(subcommand)]
        action: ComboAction,
    },
}

#[derive(Subcommand)]
enum ComboAction {
    /// List combos
    List {
        /// Matches combo names and product names
        #[arg(short, long)]
        search: Option<String>,

        /// `all`, `active`, or `paused`
        #[arg(long, default_value = "all")]
        status: StatusFilter,
    },
    /// Show one combo with its totals
    Show { id: ComboId },
    /// Create a combo from catalog SKUs
    Create {
        #[arg(short, long)]
        name: String,

        #[arg(long, default_value = "")]
        note: String,

        /// Catalog SKU; repeat to add more units
        #[arg(long = "sku", required = true)]
        skus: Vec<Sku>,
    },
    /// List suggested combos
    Suggest {
        /// Filter entry as `key=value`
        #[arg(short, long = "param")]
        params: Vec<String>,
    },
    /// Create a combo from a suggestion
    Adopt {
        /// Position in the `suggest` output
        index: usize,

        /// Filter entry as `key=value`; use the same ones as `suggest`
        #[arg(short, long = "param")]
        params: Vec<String>,

        /// Name to use instead of the suggested one
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Edit a combo
    Edit {
        id: ComboId,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        note: Option<String>,

        #[arg(long)]
        status: Option<ComboStatus>,

        /// Add one unit of a catalog SKU
        #[arg(long = "add")]
        add: Vec<Sku>,

        /// Remove a SKU entirely
        #[arg(long = "remove")]
        remove: Vec<Sku>,

        /// Raise a SKU's quantity by one
        #[arg(long = "inc")]
        inc: Vec<Sku>,

        /// Lower a SKU's quantity by one (removes it at zero)
        #[arg(long = "dec")]
        dec: Vec<Sku>,
    },
    /// Flip a combo between active and paused
    Toggle { id: ComboId },
    /// Delete a combo
    Delete { id: ComboId },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("combo_cli=info,combo_console=info"));
    let json = cli.log_format == LogFormat::Json;
    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_target(false));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = commands::Context::load(cli.base_url.as_deref())?;

    match cli.command {
        Commands::Products { search, category } => {
            commands::products::list(&ctx, search.unwrap_or_default(), category).await?;
        }
        Commands::Combos { action } => match action {
            ComboAction::List { search, status } => {
                commands::combos::list(&ctx, search.unwrap_or_default(), status).await?;
            }
            ComboAction::Show { id } => commands::combos::show(&ctx, &id).await?,
            ComboAction::Create { name, note, skus } => {
                commands::combos::create(&ctx, name, note, &skus).await?;
            }
            ComboAction::Suggest { params } => commands::combos::suggest(&ctx, &params).await?,
            ComboAction::Adopt {
                index,
                params,
                name,
            } => commands::combos::adopt(&ctx, index, &params, name).await?,
            ComboAction::Edit {
                id,
                name,
                note,
                status,
                add,
                remove,
                inc,
                dec,
            } => {
                let edits = commands::combos::Edits {
                    name,
                    note,
                    status,
                    add,
                    remove,
                    inc,
                    dec,
                };
                commands::combos::edit(&ctx, &id, edits).await?;
            }
            ComboAction::Toggle { id } => commands::combos::toggle(&ctx, &id).await?,
            ComboAction::Delete { id } => commands::combos::delete(&ctx, &id).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_edit_flags() {
        let cli = Cli::try_parse_from([
            "combo-cli", "combos", "edit", "c-1", "--add", "IP15", "--dec", "APP", "--status",
            "paused",
        ])
        .unwrap_or_else(|e| panic!("{e}"));

        let Commands::Combos {
            action: ComboAction::Edit { id, add, dec, status, .. },
        } = cli.command
        else {
            panic!("expected combos edit");
        };
        assert_eq!(id.as_str(), "c-1");
        assert_eq!(add.len(), 1);
        assert_eq!(dec.len(), 1);
        assert_eq!(status, Some(ComboStatus::Paused));
    }

    #[test]
    fn test_status_filter_rejects_unknown() {
        assert!(Cli::try_parse_from(["combo-cli", "combos", "list", "--status", "gone"]).is_err());
    }

    #[test]
    fn test_log_format_flag() {
        let cli = Cli::try_parse_from(["combo-cli", "products"]).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(cli.log_format, LogFormat::Text);

        let cli = Cli::try_parse_from(["combo-cli", "combos", "list", "--log-format", "json"])
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(cli.log_format, LogFormat::Json);

        assert!(Cli::try_parse_from(["combo-cli", "products", "--log-format", "xml"]).is_err());
    }

    #[test]
    fn test_create_requires_sku() {
        assert!(Cli::try_parse_from(["combo-cli", "combos", "create", "--name", "X"]).is_err());
    }
}
