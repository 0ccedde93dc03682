//! Abstraction over the remote analysis service

use crate::core::model::{
    AnalysisResult, ChartPeriod, ChartSeries, ComparisonResult, HealthStatus, MetricsSnapshot,
    NewsFeed, SearchResult, TrendingStock,
};
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait StockAnalysisApi: Send + Sync {
    async fn trending(&self) -> Result<Vec<TrendingStock>>;

    /// Resolves a company name or ticker and returns the service's verdict.
    async fn analyze(&self, query: &str) -> Result<AnalysisResult>;

    async fn metrics(&self, symbol: &str) -> Result<MetricsSnapshot>;

    async fn chart(&self, symbol: &str, period: ChartPeriod) -> Result<ChartSeries>;

    /// Headlines are keyed by whatever string the caller passes, usually a
    /// company name rather than a ticker.
    async fn news(&self, key: &str) -> Result<NewsFeed>;

    async fn compare(&self, symbols: &[String]) -> Result<ComparisonResult>;

    async fn search(&self, query: &str) -> Result<SearchResult>;

    async fn health(&self) -> Result<HealthStatus>;
}
