//! Vitrine CLI - Catalog management from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # List electronics, most expensive first
//! vitrine products list --category Eletrônicos --sort-by price --sort-order desc
//!
//! # Show, create, update and delete single products
//! vitrine products show 1
//! vitrine products create -n "Livro" -d "Romance" -p 49.90 -c Livros
//! vitrine products update 1 --price 7999.99 --featured true
//! vitrine products delete 1
//!
//! # List categories
//! vitrine categories
//!
//! # Bulk operations
//! vitrine bulk delete 1 2 3
//! vitrine bulk update 1 2 --featured true
//! vitrine bulk export 1 2 --format json --out-dir exports
//! ```
//!
//! # Environment Variables
//!
//! - `VITRINE_API_URL` - Catalog API base URL (default: http://127.0.0.1:3000)
//! - `VITRINE_PAGE_SIZE` - Products per listing page (default: 12)
//! - `VITRINE_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use vitrine_core::{ExportFormat, ProductId};

mod commands;

use commands::products::{CreateArgs, ListArgs, UpdateArgs};

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(author, version, about = "Vitrine catalog tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and edit products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// List product categories
    Categories,
    /// Run an operation over several products
    Bulk {
        #[command(subcommand)]
        action: BulkAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List one page of products
    List(ListArgs),
    /// Show a single product
    Show { id: ProductId },
    /// Create a product
    Create(CreateArgs),
    /// Update fields of a product
    Update {
        id: ProductId,
        #[command(flatten)]
        changes: UpdateArgs,
    },
    /// Delete a product
    Delete { id: ProductId },
}

#[derive(Subcommand)]
enum BulkAction {
    /// Delete every listed product
    Delete {
        #[arg(required = true)]
        ids: Vec<ProductId>,
    },
    /// Apply the same changes to every listed product
    Update {
        #[arg(required = true)]
        ids: Vec<ProductId>,
        #[command(flatten)]
        changes: UpdateArgs,
    },
    /// Export the listed products to a file
    Export {
        #[arg(required = true)]
        ids: Vec<ProductId>,

        /// Output format (csv or json)
        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,

        /// Directory the export is written to
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List(args) => commands::products::list(args).await?,
            ProductsAction::Show { id } => commands::products::show(&id).await?,
            ProductsAction::Create(args) => commands::products::create(args).await?,
            ProductsAction::Update { id, changes } => {
                commands::products::update(&id, changes).await?;
            }
            ProductsAction::Delete { id } => commands::products::delete(&id).await?,
        },
        Commands::Categories => commands::products::categories().await?,
        Commands::Bulk { action } => match action {
            BulkAction::Delete { ids } => commands::bulk::delete(ids).await?,
            BulkAction::Update { ids, changes } => commands::bulk::update(ids, changes).await?,
            BulkAction::Export {
                ids,
                format,
                out_dir,
            } => commands::bulk::export(ids, format, out_dir).await?,
        },
    }
    Ok(())
}
