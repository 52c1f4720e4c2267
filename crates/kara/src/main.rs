//! Kara command-line interface.
//!
//! Loads a JSON fixture into an in-memory ledger and prints one view as JSON.
//!
//! ```bash
//! kara --data gifts.json gifts kim 67e55044-10b1-426f-9247-bb680e5fe0c8 --query "order=-price&page=2"
//! kara --data gifts.json --config kara.toml dashboard kim
//! ```
//!
//! Logging is controlled with `RUST_LOG`, e.g. `RUST_LOG=kara=debug`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kara::models::RegistryId;
use kara::{
    dashboard_view, gift_table_view, registry_detail_view, tag_table_view, AppSettings, Fixture,
    GiftType, Store,
};
use kara_tables::QueryParams;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kara")]
#[command(about = "Wedding gift registry ledger", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON fixture holding users, tags, registries and gifts
    #[arg(short, long, value_name = "PATH")]
    data: PathBuf,

    /// TOML settings file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print compact JSON
    #[arg(long)]
    compact: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the gifts of a registry
    Gifts {
        /// Registry owner
        #[arg(value_name = "USERNAME")]
        owner: String,

        /// Registry id
        #[arg(value_name = "REGISTRY")]
        registry: String,

        /// Which gifts to list
        #[arg(short = 't', long, value_enum)]
        gift_type: Option<GiftType>,

        /// Request query string, e.g. `search=kim&order=-price&page=2`
        #[arg(short, long, default_value = "")]
        query: String,
    },

    /// Show a registry with its gift totals
    Registry {
        #[arg(value_name = "USERNAME")]
        owner: String,

        #[arg(value_name = "REGISTRY")]
        registry: String,
    },

    /// Show an owner's dashboard
    Dashboard {
        #[arg(value_name = "USERNAME")]
        owner: String,

        #[arg(short, long, default_value = "")]
        query: String,
    },

    /// List an owner's tags
    Tags {
        #[arg(value_name = "USERNAME")]
        owner: String,

        #[arg(short, long, default_value = "")]
        query: String,
    },

    /// Show a user's profile and email verification status
    Profile {
        #[arg(value_name = "USERNAME")]
        username: String,
    },
}

#[derive(Serialize)]
struct ProfileOutput<'a> {
    username: &'a str,
    email: &'a str,
    bio: Option<&'a str>,
    email_confirmed: bool,
    email_status: &'static str,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = match &cli.config {
        Some(path) => AppSettings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => AppSettings::default(),
    };
    let store = Fixture::load(&cli.data)
        .and_then(|fixture| fixture.into_store(&mut rand::thread_rng()))
        .with_context(|| format!("failed to load data from {}", cli.data.display()))?;
    debug!(data = %cli.data.display(), "ledger ready");

    match cli.command {
        Commands::Gifts {
            owner,
            registry,
            gift_type,
            query,
        } => {
            let params = QueryParams::parse(&query);
            let gift_type = match gift_type {
                Some(gift_type) => gift_type,
                None => GiftType::from_params(&params)?,
            };
            let registry = parse_registry(&registry)?;
            let view = gift_table_view(&store, &owner, &registry, gift_type, &params, &settings)?;
            print_json(&view, cli.compact)
        }
        Commands::Registry { owner, registry } => {
            let registry = parse_registry(&registry)?;
            print_json(&registry_detail_view(&store, &owner, &registry)?, cli.compact)
        }
        Commands::Dashboard { owner, query } => {
            let params = QueryParams::parse(&query);
            print_json(&dashboard_view(&store, &owner, &params, &settings)?, cli.compact)
        }
        Commands::Tags { owner, query } => {
            let params = QueryParams::parse(&query);
            print_json(&tag_table_view(&store, &owner, &params, &settings)?, cli.compact)
        }
        Commands::Profile { username } => print_profile(&store, &username, cli.compact),
    }
}

fn parse_registry(raw: &str) -> Result<RegistryId> {
    raw.parse()
        .with_context(|| format!("`{raw}` is not a registry id"))
}

fn print_profile(store: &Store, username: &str, compact: bool) -> Result<()> {
    let profile = store.profile(username)?;
    let output = ProfileOutput {
        username: &profile.user.username,
        email: &profile.user.email,
        bio: profile.bio.as_deref(),
        email_confirmed: profile.email_confirmed,
        email_status: profile.email_status(),
    };
    print_json(&output, compact)
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{json}");
    Ok(())
}
