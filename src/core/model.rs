//! Records returned by the analysis API.
//!
//! These are owned by the remote service; the client only deserializes and
//! renders them.

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Buy,
    Sell,
    Hold,
}

/// How a decision banner is presented: a style class and an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Banner {
    pub class: &'static str,
    pub icon: &'static str,
}

impl Decision {
    pub fn banner(&self) -> Banner {
        match self {
            Decision::Buy => Banner {
                class: "decision-buy",
                icon: "▲",
            },
            Decision::Sell => Banner {
                class: "decision-sell",
                icon: "▼",
            },
            Decision::Hold => Banner {
                class: "decision-hold",
                icon: "■",
            },
        }
    }
}

impl Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Decision::Buy => "BUY",
                Decision::Sell => "SELL",
                Decision::Hold => "HOLD",
            }
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub symbol: String,
    pub company_name: String,
    pub exchange: String,
    pub decision: Decision,
    pub explanation: String,
    pub sentiment_score: f64,
    pub price_change_6m: f64,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricsSnapshot {
    #[serde(default)]
    pub symbol: Option<String>,
    pub current_price: f64,
    pub currency: String,
    pub day_change: f64,
    pub day_change_pct: f64,
    #[serde(default)]
    pub open_price: Option<f64>,
    #[serde(default)]
    pub high_52w: Option<f64>,
    #[serde(default)]
    pub low_52w: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub avg_volume: Option<f64>,
    #[serde(default)]
    pub pe_ratio: Option<f64>,
    #[serde(default)]
    pub dividend_yield: Option<f64>,
    #[serde(default)]
    pub exchange: Option<String>,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
pub enum ChartPeriod {
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    #[default]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "5y")]
    FiveYears,
}

impl ChartPeriod {
    pub const ALL: [ChartPeriod; 5] = [
        ChartPeriod::OneMonth,
        ChartPeriod::ThreeMonths,
        ChartPeriod::SixMonths,
        ChartPeriod::OneYear,
        ChartPeriod::FiveYears,
    ];

    /// Path segment understood by the chart endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartPeriod::OneMonth => "1mo",
            ChartPeriod::ThreeMonths => "3mo",
            ChartPeriod::SixMonths => "6mo",
            ChartPeriod::OneYear => "1y",
            ChartPeriod::FiveYears => "5y",
        }
    }
}

impl Display for ChartPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChartPeriod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1mo" => Ok(ChartPeriod::OneMonth),
            "3mo" => Ok(ChartPeriod::ThreeMonths),
            "6mo" => Ok(ChartPeriod::SixMonths),
            "1y" => Ok(ChartPeriod::OneYear),
            "5y" => Ok(ChartPeriod::FiveYears),
            _ => Err(anyhow::anyhow!(
                "Invalid period '{}'. Must be one of: 1mo, 3mo, 6mo, 1y, 5y",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Ordered price points for one symbol over one period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartSeries {
    pub data: Vec<ChartPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsSentiment {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsItem {
    pub headline: String,
    pub sentiment: NewsSentiment,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsFeed {
    pub news: Vec<NewsItem>,
    #[serde(default)]
    pub overall_sentiment: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BestPerformer {
    pub symbol: String,
    pub change: f64,
    pub decision: Decision,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonResult {
    pub comparison: Vec<AnalysisResult>,
    pub best_performer: BestPerformer,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendingStock {
    pub symbol: String,
    pub name: String,
    pub change: f64,
    #[serde(default)]
    pub current_price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub query: String,
    pub found: bool,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_banner_mapping_is_one_to_one() {
        let banners: Vec<Banner> = [Decision::Buy, Decision::Sell, Decision::Hold]
            .iter()
            .map(Decision::banner)
            .collect();

        assert_eq!(banners[0].class, "decision-buy");
        assert_eq!(banners[0].icon, "▲");
        assert_eq!(banners[1].class, "decision-sell");
        assert_eq!(banners[1].icon, "▼");
        assert_eq!(banners[2].class, "decision-hold");
        assert_eq!(banners[2].icon, "■");

        for (i, a) in banners.iter().enumerate() {
            for b in &banners[i + 1..] {
                assert_ne!(a.class, b.class);
                assert_ne!(a.icon, b.icon);
            }
        }
    }

    #[test]
    fn test_analysis_result_deserialization() {
        let json = r#"{
            "symbol": "TCS.NS",
            "company_name": "Tata Consultancy Services",
            "decision": "HOLD",
            "sentiment_score": 0.12,
            "price_change_6m": -3.4,
            "current_price": 3890.5,
            "currency": "INR",
            "exchange": "NSI",
            "explanation": "Mixed signals."
        }"#;

        let result: AnalysisResult = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(result.symbol, "TCS.NS");
        assert_eq!(result.decision, Decision::Hold);
        assert_eq!(result.current_price, Some(3890.5));
        assert_eq!(result.currency.as_deref(), Some("INR"));
    }

    #[test]
    fn test_unknown_decision_is_rejected() {
        let json = r#"{
            "symbol": "X", "company_name": "X", "exchange": "X",
            "decision": "MAYBE", "explanation": "", "sentiment_score": 0.0,
            "price_change_6m": 0.0
        }"#;
        assert!(serde_json::from_str::<AnalysisResult>(json).is_err());
    }

    #[test]
    fn test_metrics_without_optional_fields() {
        let json = r#"{
            "current_price": 101.5,
            "currency": "USD",
            "day_change": -1.2,
            "day_change_pct": -1.17,
            "market_cap": null
        }"#;

        let metrics: MetricsSnapshot = serde_json::from_str(json).unwrap();
        assert!(metrics.market_cap.is_none());
        assert!(metrics.high_52w.is_none());
        assert!(metrics.pe_ratio.is_none());
    }

    #[test]
    fn test_chart_period_parsing() {
        assert_eq!("6mo".parse::<ChartPeriod>().unwrap(), ChartPeriod::SixMonths);
        assert_eq!("1Y".parse::<ChartPeriod>().unwrap(), ChartPeriod::OneYear);
        assert_eq!(ChartPeriod::ThreeMonths.to_string(), "3mo");
        assert!("2w".parse::<ChartPeriod>().is_err());
        assert_eq!(ChartPeriod::default(), ChartPeriod::SixMonths);
    }

    #[test]
    fn test_chart_series_dates() {
        let json = r#"{"symbol": "AAPL", "period": "1mo", "count": 2,
            "data": [{"date": "2024-05-01", "price": 170.2}, {"date": "2024-05-02", "price": 172.9}]}"#;
        let series: ChartSeries = serde_json::from_str(json).unwrap();
        assert_eq!(series.data.len(), 2);
        assert_eq!(
            series.data[0].date,
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
        );
    }
}
