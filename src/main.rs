//! kp - command-line client for the KnowledgePulse knowledge registry.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kp_client::commands::{self, SearchOpts};
use kp_client::config::KpConfig;
use kp_client::unit::Visibility;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VisibilityArg {
    Private,
    Network,
    Public,
}

impl From<VisibilityArg> for Visibility {
    fn from(arg: VisibilityArg) -> Self {
        match arg {
            VisibilityArg::Private => Visibility::Private,
            VisibilityArg::Network => Visibility::Network,
            VisibilityArg::Public => Visibility::Public,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "kp",
    about = "Client for the KnowledgePulse knowledge registry",
    version
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Registry base URL (overrides config file and environment).
    #[arg(long)]
    registry_url: Option<String>,

    /// MCP endpoint URL (overrides config file and environment).
    #[arg(long)]
    mcp_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the registry for skills (default) or knowledge units.
    Search {
        /// Free-text search query.
        query: String,
        /// Search knowledge units instead of skills.
        #[arg(long)]
        knowledge: bool,
        /// Filter by task domain.
        #[arg(short, long)]
        domain: Option<String>,
        /// Filter by tags (comma-separated).
        #[arg(short, long)]
        tags: Option<String>,
        /// Filter by unit type (e.g. ReasoningTrace).
        #[arg(long = "type")]
        unit_type: Option<String>,
        /// Minimum quality score (0.0-1.0).
        #[arg(long)]
        min_quality: Option<f64>,
        /// Maximum results.
        #[arg(short, long, default_value_t = 5)]
        limit: u32,
        /// Output raw JSON.
        #[arg(long)]
        json: bool,
    },
    /// Contribute a knowledge unit from a JSON file.
    Contribute {
        /// Path to the unit JSON file.
        file: PathBuf,
        /// Visibility override applied before submission.
        #[arg(long, value_enum)]
        visibility: Option<VisibilityArg>,
        /// Output raw JSON.
        #[arg(long)]
        json: bool,
    },
    /// Call an MCP tool directly.
    CallTool {
        /// Tool name (e.g. kp_search_knowledge).
        name: String,
        /// JSON arguments object.
        #[arg(long, default_value = "{}")]
        args: String,
    },
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = KpConfig::discover();
    if let Some(url) = cli.registry_url {
        config.registry_url = url;
    }
    if let Some(url) = cli.mcp_url {
        config.mcp_url = url;
    }
    if let Err(err) = config.validate() {
        eprintln!("{err}");
        std::process::exit(2);
    }

    let code = match cli.command {
        Commands::Search {
            query,
            knowledge,
            domain,
            tags,
            unit_type,
            min_quality,
            limit,
            json,
        } => {
            let opts = SearchOpts {
                query,
                knowledge,
                domain,
                tags,
                unit_type,
                min_quality,
                limit,
                json,
            };
            commands::search(&config, &opts).await
        }
        Commands::Contribute {
            file,
            visibility,
            json,
        } => commands::contribute(&config, &file, visibility.map(Into::into), json).await,
        Commands::CallTool { name, args } => commands::call_tool(&config, &name, &args).await,
    };
    std::process::exit(code);
}
