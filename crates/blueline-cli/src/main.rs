mod config;
mod display;
mod export_cmd;
mod search_cmd;
mod serve_cmd;
#[cfg(test)]
mod test_util;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use blueline_core::plan::{Bounds, classify};
use blueline_core::settings::{FileSettingsStore, Settings, SettingsStore};

use config::AppConfig;
use search_cmd::SearchBy;

#[derive(Parser)]
#[command(name = "blueline", about = "Israeli blue-line plan lookup and analysis")]
struct Cli {
    /// Analysis API key (overrides BLUELINE_API_KEY and the settings file)
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the settings file
    Init {
        /// Overwrite existing settings file
        #[arg(long)]
        force: bool,
    },
    /// Print the category of a plan number
    Classify {
        /// Plan number, e.g. תמא/35
        identifier: String,
    },
    /// Look up a plan by number or address
    Search {
        /// Plan number or address fragment
        term: String,
        /// Interpret the term as a number or an address (inferred if omitted)
        #[arg(long, value_enum)]
        by: Option<SearchBy>,
    },
    /// List plans inside a bounding box
    Area {
        /// south,west,north,east in decimal degrees (omit for all plans)
        #[arg(long)]
        bounds: Option<Bounds>,
    },
    /// Look up a plan and analyze the first match
    Analyze {
        term: String,
        #[arg(long, value_enum)]
        by: Option<SearchBy>,
    },
    /// Export a plan (and optionally its analysis) as JSON
    Export {
        term: String,
        #[arg(long, value_enum)]
        by: Option<SearchBy>,
        /// Run an analysis and include it in the export
        #[arg(long)]
        analyze: bool,
        /// Directory to write into (defaults to stdout)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// List recent searches
    Recent {
        /// Forget all recent searches
        #[arg(long)]
        clear: bool,
    },
    /// Run the local JSON API
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

/// Execute the `blueline init` command: write the settings file.
fn cmd_init(api_key: Option<&str>, force: bool) -> anyhow::Result<()> {
    let path = config::settings_path();

    if path.exists() && !force {
        anyhow::bail!(
            "settings file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let settings = Settings {
        api_key: api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_owned),
        ..Settings::default()
    };
    FileSettingsStore::new(&path).save(&settings)?;

    println!("Settings written to {}", path.display());
    match settings.credential() {
        Some(_) => println!("  api_key = (set)"),
        None => {
            println!("  api_key = (none)");
            println!();
            println!("Analysis needs a key: rerun with --api-key or set BLUELINE_API_KEY.");
        }
    }
    Ok(())
}

fn cmd_classify(identifier: &str) {
    let category = classify(identifier);
    println!("{category}\t{}", category.label());
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

    if let Err(e) = run(cli).await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Init { force } => {
            cmd_init(cli.api_key.as_deref(), force)?;
        }
        Commands::Classify { identifier } => {
            cmd_classify(&identifier);
        }
        Commands::Search { term, by } => {
            let mut session = AppConfig::resolve(cli.api_key.as_deref())?.open_session()?;
            search_cmd::run_search(&mut session, &term, by).await?;
        }
        Commands::Area { bounds } => {
            let mut session = AppConfig::resolve(cli.api_key.as_deref())?.open_session()?;
            search_cmd::run_area(&mut session, bounds).await?;
        }
        Commands::Analyze { term, by } => {
            let mut session = AppConfig::resolve(cli.api_key.as_deref())?.open_session()?;
            search_cmd::run_analyze(&mut session, &term, by).await?;
        }
        Commands::Export {
            term,
            by,
            analyze,
            output_dir,
        } => {
            let mut session = AppConfig::resolve(cli.api_key.as_deref())?.open_session()?;
            export_cmd::run_export(&mut session, &term, by, analyze, output_dir.as_deref())
                .await?;
        }
        Commands::Recent { clear } => {
            let mut session = AppConfig::resolve(cli.api_key.as_deref())?.open_session()?;
            search_cmd::run_recent(&mut session, clear)?;
        }
        Commands::Serve { bind, port } => {
            let session = AppConfig::resolve(cli.api_key.as_deref())?.open_session()?;
            serve_cmd::run_serve(session, &bind, port).await?;
        }
    }
    Ok(())
}
