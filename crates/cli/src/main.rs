//! Briklyst CLI - database migrations, scheduled jobs and catalog tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! bk-cli migrate
//!
//! # Send the weekly owner report (run weekly from a scheduler)
//! bk-cli report weekly
//!
//! # Inspect the built-in catalogs
//! bk-cli catalog themes
//! bk-cli catalog templates --json
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `report weekly` - Email each opted-in owner their weekly stats
//! - `catalog` - List themes or templates

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::CommandError;

#[derive(Parser)]
#[command(name = "bk-cli")]
#[command(author, version, about = "Briklyst CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Send scheduled reports
    Report {
        #[command(subcommand)]
        kind: ReportKind,
    },
    /// List built-in catalogs
    Catalog {
        #[command(subcommand)]
        list: CatalogList,
    },
}

#[derive(Subcommand)]
enum ReportKind {
    /// Weekly performance email to opted-in owners
    Weekly {
        /// Parallel sends (defaults to `BRIKLYST_REPORT_CONCURRENCY`)
        #[arg(short, long)]
        concurrency: Option<usize>,
    },
}

#[derive(Subcommand)]
enum CatalogList {
    /// List themes
    Themes {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List templates
    Templates {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    // Defaults to info level if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bk_cli=info,briklyst_storefront=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Report { kind } => match kind {
            ReportKind::Weekly { concurrency } => {
                let summary = commands::report::weekly(concurrency).await?;
                if summary.failed > 0 {
                    tracing::warn!(failed = summary.failed, "Some weekly reports were not sent");
                }
            }
        },
        Commands::Catalog { list } => match list {
            CatalogList::Themes { json } => commands::catalog::list_themes(json)?,
            CatalogList::Templates { json } => commands::catalog::list_templates(json)?,
        },
    }
    Ok(())
}
