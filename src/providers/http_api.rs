use crate::core::StockAnalysisApi;
use crate::core::model::{
    AnalysisResult, ChartPeriod, ChartSeries, ComparisonResult, HealthStatus, MetricsSnapshot,
    NewsFeed, SearchResult, TrendingStock,
};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Talks to the analyzer's JSON API mounted under `{base_url}/api`.
pub struct HttpStockApi {
    base_url: Url,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TrendingResponse {
    trending_stocks: Vec<TrendingStock>,
}

#[derive(Debug, Serialize)]
struct CompareRequest<'a> {
    stocks: &'a [String],
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl HttpStockApi {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid base URL: {base_url}"))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("Base URL cannot carry a path: {}", base_url));
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("stockview/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(HttpStockApi {
            base_url,
            client: builder.build()?,
        })
    }

    /// Builds `{base_url}/{segments...}`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn api_endpoint(&self, segments: &[&str]) -> Url {
        let mut all = Vec::with_capacity(segments.len() + 1);
        all.push("api");
        all.extend_from_slice(segments);
        self.endpoint(&all)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} URL: {}", e, url))?;
        decode(response, &url).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T> {
        debug!("POST {}", url);
        let response = self
            .client
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} URL: {}", e, url))?;
        decode(response, &url).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response, url: &Url) -> Result<T> {
    let status = response.status();
    let text = response
        .text()
        .await
        .with_context(|| format!("Failed to get response text for {}", url.path()))?;

    if !status.is_success() {
        let detail = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.detail.as_str().map(str::to_string));
        return Err(match detail {
            Some(detail) => anyhow!("HTTP error: {} for {}: {}", status, url.path(), detail),
            None => anyhow!("HTTP error: {} for {}", status, url.path()),
        });
    }

    serde_json::from_str(&text)
        .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", url.path(), e))
}

#[async_trait]
impl StockAnalysisApi for HttpStockApi {
    async fn trending(&self) -> Result<Vec<TrendingStock>> {
        let response: TrendingResponse = self.get_json(self.api_endpoint(&["trending"])).await?;
        Ok(response.trending_stocks)
    }

    #[instrument(name = "AnalyzeFetch", skip(self), fields(query = %query))]
    async fn analyze(&self, query: &str) -> Result<AnalysisResult> {
        self.get_json(self.api_endpoint(&["analyze", query])).await
    }

    #[instrument(name = "MetricsFetch", skip(self), fields(symbol = %symbol))]
    async fn metrics(&self, symbol: &str) -> Result<MetricsSnapshot> {
        self.get_json(self.api_endpoint(&["metrics", symbol])).await
    }

    #[instrument(name = "ChartFetch", skip(self), fields(symbol = %symbol, period = %period))]
    async fn chart(&self, symbol: &str, period: ChartPeriod) -> Result<ChartSeries> {
        self.get_json(self.api_endpoint(&["chart", symbol, period.as_str()]))
            .await
    }

    #[instrument(name = "NewsFetch", skip(self), fields(key = %key))]
    async fn news(&self, key: &str) -> Result<NewsFeed> {
        self.get_json(self.api_endpoint(&["news", key])).await
    }

    #[instrument(name = "CompareFetch", skip(self), fields(count = symbols.len()))]
    async fn compare(&self, symbols: &[String]) -> Result<ComparisonResult> {
        self.post_json(
            self.api_endpoint(&["compare"]),
            &CompareRequest { stocks: symbols },
        )
        .await
    }

    async fn search(&self, query: &str) -> Result<SearchResult> {
        self.get_json(self.api_endpoint(&["search", query])).await
    }

    async fn health(&self) -> Result<HealthStatus> {
        self.get_json(self.endpoint(&["health"])).await
    }
}
