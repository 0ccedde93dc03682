//! Line-driven session: one command per line, handled to completion before
//! the next line is read.

use super::controller::ViewController;
use super::{attach_spinner, print_alert, render, ui};
use crate::core::ChartPeriod;
use anyhow::{Result, anyhow};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

const HELP: &str = "\
Commands:
  analyze <name or symbol>   analyze a stock and load metrics, chart and news
  period <1mo|3mo|6mo|1y|5y> switch the chart period for the selected stock
  compare <a> <b> [c] [d]    compare 2 to 4 stocks
  news                       reload news for the selected stock
  trending                   show trending stocks
  search <company>           look up a ticker symbol
  page                       print every section again
  help                       show this message
  quit                       leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Analyze(String),
    Period(ChartPeriod),
    Compare(Vec<String>),
    News,
    Trending,
    Search(String),
    Page,
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "analyze" | "a" => Command::Analyze(rest.to_string()),
        "period" | "p" => Command::Period(rest.parse()?),
        "compare" | "c" => Command::Compare(rest.split_whitespace().map(str::to_string).collect()),
        "news" | "n" => Command::News,
        "trending" | "t" => Command::Trending,
        "search" | "s" => Command::Search(rest.to_string()),
        "page" => Command::Page,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => {
            return Err(anyhow!(
                "Unknown command '{}'. Type 'help' for a list of commands",
                other
            ));
        }
    };
    Ok(Some(command))
}

fn prompt(controller: &ViewController<'_>) {
    let label = controller
        .session()
        .selected_symbol
        .as_deref()
        .unwrap_or("stockview")
        .to_string();
    print!("{} ", ui::style_text(&format!("{label}>"), ui::StyleType::Highlight));
    let _ = std::io::stdout().flush();
}

/// Runs commands from `input` until it ends or the user quits. Trending
/// stocks are loaded first, like a freshly opened page.
pub async fn run<R>(controller: &mut ViewController<'_>, input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let spinner = attach_spinner(controller, "Loading trending stocks...");
    controller.load_trending().await;
    spinner.finish_and_clear();
    println!("{}", ui::style_text("Type 'help' for commands.", ui::StyleType::Subtle));

    let mut lines = input.lines();
    loop {
        prompt(controller);
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                print_alert(&e.to_string());
                continue;
            }
        };
        debug!(?command, "Dispatching command");

        match command {
            Command::Quit => break,
            Command::Help => println!("{HELP}"),
            Command::Page => println!("{}", render::render_page(controller.page())),
            Command::Analyze(query) => {
                let spinner = attach_spinner(controller, "Analyzing...");
                let outcome = controller.analyze_stock(&query).await;
                spinner.finish_and_clear();
                if let Err(e) = outcome {
                    print_alert(&e.to_string());
                }
            }
            Command::Period(period) => {
                let spinner = attach_spinner(controller, "Loading chart...");
                controller.switch_period(period).await;
                spinner.finish_and_clear();
                if controller.session().selected_symbol.is_none() {
                    println!("Chart period set to {period}");
                }
            }
            Command::Compare(symbols) => {
                let spinner = attach_spinner(controller, "Comparing...");
                let outcome = controller.compare_stocks(&symbols).await;
                spinner.finish_and_clear();
                if let Err(e) = outcome {
                    print_alert(&e.to_string());
                }
            }
            Command::News => {
                let spinner = attach_spinner(controller, "Loading news...");
                let reloaded = controller.reload_news().await;
                spinner.finish_and_clear();
                if !reloaded {
                    print_alert("Analyze a stock first");
                }
            }
            Command::Trending => {
                let spinner = attach_spinner(controller, "Loading trending stocks...");
                controller.load_trending().await;
                spinner.finish_and_clear();
            }
            Command::Search(query) => {
                let spinner = attach_spinner(controller, "Searching...");
                let outcome = controller.search(&query).await;
                spinner.finish_and_clear();
                if let Err(e) = outcome {
                    print_alert(&e.to_string());
                }
            }
        }
    }

    println!();
    Ok(())
}
