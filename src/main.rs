use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use stockview::core::ChartPeriod;
use stockview::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for stockview::AppCommand {
    fn from(cmd: Commands) -> stockview::AppCommand {
        match cmd {
            Commands::Analyze { query, period } => stockview::AppCommand::Analyze {
                query: query.join(" "),
                period,
            },
            Commands::Metrics { symbol } => stockview::AppCommand::Metrics { symbol },
            Commands::Chart { symbol, period } => stockview::AppCommand::Chart { symbol, period },
            Commands::News { company } => stockview::AppCommand::News {
                key: company.join(" "),
            },
            Commands::Compare { symbols } => stockview::AppCommand::Compare { symbols },
            Commands::Trending => stockview::AppCommand::Trending,
            Commands::Search { query } => stockview::AppCommand::Search {
                query: query.join(" "),
            },
            Commands::Health => stockview::AppCommand::Health,
            Commands::Interactive => stockview::AppCommand::Interactive,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Analyze a stock by company name or ticker
    Analyze {
        #[arg(required = true)]
        query: Vec<String>,
        /// Chart period: 1mo, 3mo, 6mo, 1y or 5y
        #[arg(short, long)]
        period: Option<ChartPeriod>,
    },
    /// Show price metrics and sentiment for a symbol
    Metrics { symbol: String },
    /// Show the price chart for a symbol
    Chart {
        symbol: String,
        /// Chart period: 1mo, 3mo, 6mo, 1y or 5y
        #[arg(short, long)]
        period: Option<ChartPeriod>,
    },
    /// Show recent headlines for a company
    News {
        #[arg(required = true)]
        company: Vec<String>,
    },
    /// Compare 2 to 4 stocks side by side
    Compare { symbols: Vec<String> },
    /// List trending stocks
    Trending,
    /// Look up the ticker for a company name
    Search {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Check that the analysis service is reachable
    Health,
    /// Start an interactive session
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => stockview::cli::setup::setup(),
        Some(cmd) => stockview::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
