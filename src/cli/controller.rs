//! Binds user actions to API calls and keeps the page in sync with the
//! responses.
//!
//! Every fetch owns exactly one page section. A failed fetch replaces its
//! section with that section's failure message and leaves the rest alone.

use super::render;
use crate::core::config::{AppConfig, NewsKey};
use crate::core::model::{AnalysisResult, ChartPeriod, ChartSeries, MetricsSnapshot, NewsFeed};
use crate::core::page::{ChartHandle, Page, Section, SectionContent, Session};
use crate::core::{InputError, StockAnalysisApi};
use anyhow::Result;
use futures::future::{BoxFuture, FutureExt};
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, info, warn};

pub const MIN_COMPARE: usize = 2;
pub const MAX_COMPARE: usize = 4;

type Observer = Box<dyn Fn(Section, &SectionContent)>;

/// Outcome of one of the fetches that follow a successful analysis.
enum Update {
    Metrics(Result<(MetricsSnapshot, AnalysisResult)>),
    Chart {
        symbol: String,
        period: ChartPeriod,
        result: Result<ChartSeries>,
    },
    News(Result<NewsFeed>),
}

async fn fetch_metrics(api: &dyn StockAnalysisApi, symbol: String) -> Update {
    // The sentiment score is only exposed by the analysis endpoint.
    let (metrics, analysis) = futures::join!(api.metrics(&symbol), api.analyze(&symbol));
    Update::Metrics(metrics.and_then(|m| analysis.map(|a| (m, a))))
}

async fn fetch_chart(api: &dyn StockAnalysisApi, symbol: String, period: ChartPeriod) -> Update {
    let result = api.chart(&symbol, period).await;
    Update::Chart {
        symbol,
        period,
        result,
    }
}

async fn fetch_news(api: &dyn StockAnalysisApi, key: String) -> Update {
    Update::News(api.news(&key).await)
}

/// Keeps only non-empty entries, trimmed.
pub fn collect_symbols(slots: &[String]) -> Vec<String> {
    slots
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub struct ViewController<'a> {
    api: &'a dyn StockAnalysisApi,
    page: Page,
    session: Session,
    news_key: NewsKey,
    observer: Option<Observer>,
}

impl<'a> ViewController<'a> {
    pub fn new(api: &'a dyn StockAnalysisApi, config: &AppConfig) -> Self {
        ViewController {
            api,
            page: Page::new(),
            session: Session {
                period: config.default_period,
                ..Session::default()
            },
            news_key: config.news_key,
            observer: None,
        }
    }

    /// Registers a callback that sees every section as soon as it changes.
    pub fn set_observer(&mut self, observer: impl Fn(Section, &SectionContent) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn update(&mut self, section: Section, content: SectionContent) {
        self.page.set(section, content);
        if let Some(observer) = &self.observer {
            observer(section, self.page.get(section));
        }
    }

    fn fail(&mut self, section: Section, error: &anyhow::Error) {
        warn!(%section, error = %error, "{}", section.failure_message());
        self.update(
            section,
            SectionContent::Failed(section.failure_message().to_string()),
        );
    }

    /// Looks up `query`, then loads metrics, chart and news for the resolved
    /// symbol. The three follow-up fetches run concurrently and each section
    /// is filled as soon as its own response arrives.
    pub async fn analyze_stock(&mut self, query: &str) -> Result<(), InputError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(InputError::EmptyQuery);
        }

        info!(query, "Analyzing stock");
        let result = match self.api.analyze(query).await {
            Ok(result) => result,
            Err(e) => {
                self.fail(Section::Analysis, &e);
                return Ok(());
            }
        };

        self.session.selected_symbol = Some(result.symbol.clone());
        self.session.selected_company = Some(result.company_name.clone());
        self.update(
            Section::Analysis,
            SectionContent::Rendered(render::render_analysis(&result)),
        );

        let api = self.api;
        let symbol = result.symbol.clone();
        let news_key = self.news_key_for(&result.symbol, &result.company_name);
        let mut pending: FuturesUnordered<BoxFuture<'a, Update>> = FuturesUnordered::new();
        pending.push(fetch_metrics(api, symbol.clone()).boxed());
        pending.push(fetch_chart(api, symbol, self.session.period).boxed());
        pending.push(fetch_news(api, news_key).boxed());

        while let Some(update) = pending.next().await {
            self.apply(update);
        }
        Ok(())
    }

    fn news_key_for(&self, symbol: &str, company: &str) -> String {
        match self.news_key {
            NewsKey::Company => company.to_string(),
            NewsKey::Symbol => symbol.to_string(),
        }
    }

    fn apply(&mut self, update: Update) {
        match update {
            Update::Metrics(Ok((metrics, analysis))) => {
                let text = render::render_metrics(&metrics, analysis.sentiment_score);
                self.update(Section::Metrics, SectionContent::Rendered(text));
            }
            Update::Metrics(Err(e)) => self.fail(Section::Metrics, &e),
            Update::Chart {
                symbol,
                period,
                result,
            } => {
                if let Some(prior) = self.session.chart.take() {
                    debug!(generation = prior.generation, "Discarding prior chart");
                }
                match result {
                    Ok(series) => {
                        self.session.charts_drawn += 1;
                        let chart = ChartHandle {
                            symbol,
                            period,
                            series,
                            generation: self.session.charts_drawn,
                        };
                        let text = render::render_chart(&chart);
                        self.session.chart = Some(chart);
                        self.update(Section::Chart, SectionContent::Rendered(text));
                    }
                    Err(e) => self.fail(Section::Chart, &e),
                }
            }
            Update::News(Ok(feed)) => {
                self.update(Section::News, SectionContent::Rendered(render::render_news(&feed)))
            }
            Update::News(Err(e)) => self.fail(Section::News, &e),
        }
    }

    /// Fetches metrics plus a second analysis call for the sentiment score
    /// and renders both as one block.
    pub async fn load_metrics(&mut self, symbol: &str) {
        let update = fetch_metrics(self.api, symbol.to_string()).await;
        self.apply(update);
    }

    /// Draws a fresh chart, discarding whatever chart was active before.
    pub async fn load_chart(&mut self, symbol: &str, period: ChartPeriod) {
        let update = fetch_chart(self.api, symbol.to_string(), period).await;
        self.apply(update);
    }

    /// Changes the chart period. Only the selected symbol is refetched; with
    /// nothing selected the period is just remembered for the next analysis.
    pub async fn switch_period(&mut self, period: ChartPeriod) {
        self.session.period = period;
        if let Some(symbol) = self.session.selected_symbol.clone() {
            self.load_chart(&symbol, period).await;
        }
    }

    pub async fn load_news(&mut self, key: &str) {
        let update = fetch_news(self.api, key.to_string()).await;
        self.apply(update);
    }

    /// Reloads news for the current selection using the configured key.
    pub async fn reload_news(&mut self) -> bool {
        let (Some(symbol), Some(company)) = (
            self.session.selected_symbol.clone(),
            self.session.selected_company.clone(),
        ) else {
            return false;
        };
        let key = self.news_key_for(&symbol, &company);
        self.load_news(&key).await;
        true
    }

    /// Sends 2 to 4 symbols as a single batch. Blank slots are ignored and
    /// an out-of-range count is rejected before any request is made.
    pub async fn compare_stocks(&mut self, slots: &[String]) -> Result<(), InputError> {
        let symbols = collect_symbols(slots);
        if !(MIN_COMPARE..=MAX_COMPARE).contains(&symbols.len()) {
            return Err(InputError::ComparisonCount {
                given: symbols.len(),
            });
        }

        info!(?symbols, "Comparing stocks");
        match self.api.compare(&symbols).await {
            Ok(result) => self.update(
                Section::Comparison,
                SectionContent::Rendered(render::render_comparison(&result)),
            ),
            Err(e) => self.fail(Section::Comparison, &e),
        }
        Ok(())
    }

    pub async fn load_trending(&mut self) {
        match self.api.trending().await {
            Ok(stocks) => self.update(
                Section::Trending,
                SectionContent::Rendered(render::render_trending(&stocks)),
            ),
            Err(e) => self.fail(Section::Trending, &e),
        }
    }

    pub async fn search(&mut self, query: &str) -> Result<(), InputError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(InputError::EmptyQuery);
        }

        match self.api.search(query).await {
            Ok(result) => self.update(
                Section::Search,
                SectionContent::Rendered(render::render_search(&result)),
            ),
            Err(e) => self.fail(Section::Search, &e),
        }
        Ok(())
    }

    /// Reports whether the service answers its health probe.
    pub async fn check_health(&self) -> Result<String> {
        let health = self.api.health().await?;
        Ok(match health.message {
            Some(message) => format!("{}: {}", health.status, message),
            None => health.status,
        })
    }
}
