pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::controller::ViewController;
use crate::core::ChartPeriod;
use crate::core::config::AppConfig;
use anyhow::Result;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Analyze {
        query: String,
        period: Option<ChartPeriod>,
    },
    Metrics {
        symbol: String,
    },
    Chart {
        symbol: String,
        period: Option<ChartPeriod>,
    },
    News {
        key: String,
    },
    Compare {
        symbols: Vec<String>,
    },
    Trending,
    Search {
        query: String,
    },
    Health,
    Interactive,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Stock viewer starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let api = providers::HttpStockApi::new(
        &config.server.base_url,
        config.server.timeout_secs.map(Duration::from_secs),
    )?;
    let mut controller = ViewController::new(&api, &config);

    match command {
        AppCommand::Analyze { query, period } => {
            if let Some(period) = period {
                controller.switch_period(period).await;
            }
            let spinner = cli::attach_spinner(&mut controller, "Analyzing...");
            let outcome = controller.analyze_stock(&query).await;
            spinner.finish_and_clear();
            cli::alert_on_error(outcome)?;
        }
        AppCommand::Metrics { symbol } => {
            let spinner = cli::attach_spinner(&mut controller, "Loading metrics...");
            controller.load_metrics(&symbol).await;
            spinner.finish_and_clear();
        }
        AppCommand::Chart { symbol, period } => {
            let period = period.unwrap_or(config.default_period);
            let spinner = cli::attach_spinner(&mut controller, "Loading chart...");
            controller.load_chart(&symbol, period).await;
            spinner.finish_and_clear();
        }
        AppCommand::News { key } => {
            let spinner = cli::attach_spinner(&mut controller, "Loading news...");
            controller.load_news(&key).await;
            spinner.finish_and_clear();
        }
        AppCommand::Compare { symbols } => {
            let spinner = cli::attach_spinner(&mut controller, "Comparing...");
            let outcome = controller.compare_stocks(&symbols).await;
            spinner.finish_and_clear();
            cli::alert_on_error(outcome)?;
        }
        AppCommand::Trending => {
            let spinner = cli::attach_spinner(&mut controller, "Loading trending stocks...");
            controller.load_trending().await;
            spinner.finish_and_clear();
        }
        AppCommand::Search { query } => {
            let spinner = cli::attach_spinner(&mut controller, "Searching...");
            let outcome = controller.search(&query).await;
            spinner.finish_and_clear();
            cli::alert_on_error(outcome)?;
        }
        AppCommand::Health => {
            let status = controller.check_health().await?;
            println!("{status}");
        }
        AppCommand::Interactive => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            cli::interactive::run(&mut controller, stdin).await?;
        }
    }

    Ok(())
}
