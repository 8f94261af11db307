//! pinlut CLI: inspect multi-site pin maps without instrument hardware.

mod commands;
mod snapshot;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "pinlut", version, about = "Multi-site pin map lookup tables")]
struct Cli {
    /// Log LUT construction and filtering at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a descriptor and print its entries
    Parse {
        #[command(subcommand)]
        action: ParseAction,
    },
    /// Build a lookup table from a snapshot
    Lut {
        /// Pin-map snapshot (.toml)
        snapshot: PathBuf,
        /// Table kind (instrument-to-site, instrument-to-site-pin, site-to-instrument, site-pin-to-instrument)
        #[arg(long)]
        kind: String,
        /// Fail on duplicate (site, pin) claims instead of keeping the first
        #[arg(long)]
        strict: bool,
        /// Restrict to these sites first (e.g., 0,2 or site0,site2)
        #[arg(long)]
        sites: Option<String>,
        /// Output format (text, json)
        #[arg(long)]
        export: Option<String>,
    },
    /// Restrict a snapshot to a subset of sites
    Filter {
        /// Pin-map snapshot (.toml)
        snapshot: PathBuf,
        /// Sites to keep (e.g., 0,2 or site0,site2)
        #[arg(long)]
        sites: String,
        /// Keep system channels, which belong to no site
        #[arg(long)]
        keep_system: bool,
        /// Output format (toml, json)
        #[arg(long)]
        export: Option<String>,
    },
    /// Validate a snapshot and report every mapping problem
    Check {
        /// Pin-map snapshot (.toml)
        snapshot: PathBuf,
        /// Output format (text, json)
        #[arg(long)]
        export: Option<String>,
    },
}

#[derive(Subcommand)]
enum ParseAction {
    /// Parse a channel descriptor (e.g., "site0/A,site1/A,VCC")
    Channels {
        descriptor: String,
        /// Output format (text, json)
        #[arg(long)]
        export: Option<String>,
    },
    /// Parse a site descriptor (e.g., "site0,site1")
    Sites {
        descriptor: String,
        /// Output format (text, json)
        #[arg(long)]
        export: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the default level.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Parse { action } => match action {
            ParseAction::Channels { descriptor, export } => {
                commands::parse::channels(&descriptor, export.as_deref())
            }
            ParseAction::Sites { descriptor, export } => {
                commands::parse::sites(&descriptor, export.as_deref())
            }
        },

        Commands::Lut {
            snapshot,
            kind,
            strict,
            sites,
            export,
        } => commands::lut::run(
            &snapshot,
            &kind,
            strict,
            sites.as_deref(),
            export.as_deref(),
        ),

        Commands::Filter {
            snapshot,
            sites,
            keep_system,
            export,
        } => commands::filter::run(&snapshot, &sites, keep_system, export.as_deref()),

        Commands::Check { snapshot, export } => {
            commands::check::run(&snapshot, export.as_deref())
        }
    }
}
