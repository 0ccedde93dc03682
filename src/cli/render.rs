//! Turns API records into printable fragments.
//!
//! Every function here is pure: it takes a record and returns a `String`, so
//! the controller decides where and when fragments land on the page.

use super::ui;
use crate::core::model::{
    AnalysisResult, ComparisonResult, MetricsSnapshot, NewsFeed, NewsSentiment, SearchResult,
    TrendingStock,
};
use crate::core::page::{ChartHandle, Page, Section, SectionContent};
use comfy_table::{Attribute, Cell, Color};

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const SPARK_WIDTH: usize = 60;
const BAR_CELLS: usize = 20;

/// Maps a sentiment score in [-1, 1] linearly onto a width in [0, 100].
///
/// Scores outside the range are clamped; NaN is treated as neutral.
pub fn sentiment_bar_width(score: f64) -> f64 {
    if score.is_nan() {
        return 50.0;
    }
    let clamped = score.clamp(-1.0, 1.0);
    ((clamped + 1.0) / 2.0) * 100.0
}

pub fn sentiment_label(score: f64) -> &'static str {
    if score > 0.0 {
        "Positive"
    } else if score < 0.0 {
        "Negative"
    } else {
        "Neutral"
    }
}

pub fn sentiment_bar(score: f64) -> String {
    let width = sentiment_bar_width(score);
    let filled = ((width / 100.0) * BAR_CELLS as f64).round() as usize;
    let bar = format!(
        "{}{}",
        "█".repeat(filled),
        "·".repeat(BAR_CELLS - filled)
    );
    let style_type = if score > 0.0 {
        ui::StyleType::Positive
    } else if score < 0.0 {
        ui::StyleType::Negative
    } else {
        ui::StyleType::Neutral
    };
    let styled = ui::style_text(&bar, style_type);
    format!("[{styled}] {width:.0}%")
}

/// Compact form for large counts, e.g. `2.9T`, `415.3M`.
pub fn format_large_number(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1_000_000_000_000.0 {
        format!("{:.1}T", value / 1_000_000_000_000.0)
    } else if abs >= 1_000_000_000.0 {
        format!("{:.1}B", value / 1_000_000_000.0)
    } else if abs >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        format!("{value:.0}")
    }
}

pub fn render_analysis(result: &AnalysisResult) -> String {
    let banner = result.decision.banner();
    let headline = format!(
        "{} {}  {} ({})",
        banner.icon, result.decision, result.company_name, result.symbol
    );

    let mut table = ui::new_styled_table();
    table.add_row(vec![
        ui::label_cell("Exchange"),
        ui::value_cell(result.exchange.clone()),
    ]);
    table.add_row(vec![
        ui::label_cell("Sentiment Score"),
        ui::value_cell(format!(
            "{:.2} ({})",
            result.sentiment_score,
            sentiment_label(result.sentiment_score)
        )),
    ]);
    table.add_row(vec![
        ui::label_cell("6M Price Change"),
        ui::change_cell(result.price_change_6m),
    ]);
    if let Some(price) = result.current_price {
        let currency = result.currency.as_deref().unwrap_or("");
        table.add_row(vec![
            ui::label_cell("Current Price"),
            ui::value_cell(format!("{price:.2} {currency}").trim_end().to_string()),
        ]);
    }

    format!(
        "{}\n{}\n\n{}",
        ui::style_text(&headline, ui::banner_style(result.decision)),
        table,
        result.explanation
    )
}

/// Renders the metrics block merged with the sentiment score from a
/// separate analysis call. Optional metrics the service omitted get no row.
pub fn render_metrics(metrics: &MetricsSnapshot, sentiment_score: f64) -> String {
    let currency = &metrics.currency;
    let mut table = ui::new_styled_table();

    table.add_row(vec![
        ui::label_cell("Current Price"),
        ui::value_cell(format!("{:.2} {currency}", metrics.current_price)),
    ]);

    let day_color = if metrics.day_change >= 0.0 {
        Color::Green
    } else {
        Color::Red
    };
    table.add_row(vec![
        ui::label_cell("Day Change"),
        ui::value_cell(format!(
            "{:+.2} ({:+.2}%)",
            metrics.day_change, metrics.day_change_pct
        ))
        .fg(day_color),
    ]);

    let optional_rows: [(&str, Option<String>); 8] = [
        ("Open", metrics.open_price.map(|v| format!("{v:.2} {currency}"))),
        ("52W High", metrics.high_52w.map(|v| format!("{v:.2} {currency}"))),
        ("52W Low", metrics.low_52w.map(|v| format!("{v:.2} {currency}"))),
        (
            "Market Cap",
            metrics
                .market_cap
                .map(|v| format!("{} {currency}", format_large_number(v))),
        ),
        ("Volume", metrics.volume.map(format_large_number)),
        ("Avg Volume", metrics.avg_volume.map(format_large_number)),
        ("P/E Ratio", metrics.pe_ratio.map(|v| format!("{v:.2}"))),
        ("Dividend Yield", metrics.dividend_yield.map(|v| format!("{v:.2}%"))),
    ];
    for (label, value) in optional_rows {
        if let Some(value) = value {
            table.add_row(vec![ui::label_cell(label), ui::value_cell(value)]);
        }
    }

    table.add_row(vec![
        ui::label_cell("Sentiment"),
        Cell::new(sentiment_bar(sentiment_score)),
    ]);

    table.to_string()
}

/// Downsamples prices to at most `width` buckets and draws one block per
/// bucket, scaled between the series minimum and maximum.
pub fn sparkline(prices: &[f64], width: usize) -> String {
    if prices.is_empty() || width == 0 {
        return String::new();
    }

    let buckets: Vec<f64> = if prices.len() <= width {
        prices.to_vec()
    } else {
        (0..width)
            .map(|i| {
                let start = i * prices.len() / width;
                let end = ((i + 1) * prices.len() / width).max(start + 1);
                let slice = &prices[start..end];
                slice.iter().sum::<f64>() / slice.len() as f64
            })
            .collect()
    };

    let min = buckets.iter().copied().fold(f64::INFINITY, f64::min);
    let max = buckets.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    let top = (SPARK_LEVELS.len() - 1) as f64;

    buckets
        .iter()
        .map(|p| {
            if span <= f64::EPSILON {
                SPARK_LEVELS[SPARK_LEVELS.len() / 2]
            } else {
                SPARK_LEVELS[(((p - min) / span) * top).round() as usize]
            }
        })
        .collect()
}

pub fn render_chart(chart: &ChartHandle) -> String {
    let title = format!("{} · {}", chart.symbol, chart.period);
    let points = &chart.series.data;
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return format!(
            "{}\n{}",
            ui::style_text(&title, ui::StyleType::Label),
            ui::style_text("No chart data available", ui::StyleType::Subtle)
        );
    };

    let prices: Vec<f64> = points.iter().map(|p| p.price).collect();
    let low = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let high = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let change = if first.price > 0.0 {
        ((last.price - first.price) / first.price) * 100.0
    } else {
        0.0
    };
    let change_text = format!("{change:+.2}%");
    let change_style = if change >= 0.0 {
        ui::StyleType::Positive
    } else {
        ui::StyleType::Negative
    };

    format!(
        "{} ({} points)\n{}\n{} → {}   Low {low:.2}   High {high:.2}   Change {}",
        ui::style_text(&title, ui::StyleType::Label),
        points.len(),
        ui::style_text(&sparkline(&prices, SPARK_WIDTH), ui::StyleType::Highlight),
        first.date,
        last.date,
        ui::style_text(&change_text, change_style)
    )
}

pub fn render_news(feed: &NewsFeed) -> String {
    if feed.news.is_empty() {
        let message = feed.message.as_deref().unwrap_or("No recent news available");
        return ui::style_text(message, ui::StyleType::Subtle);
    }

    let mut lines: Vec<String> = feed
        .news
        .iter()
        .map(|item| {
            let marker = match item.sentiment {
                NewsSentiment::Positive => ui::style_text("+", ui::StyleType::Positive),
                NewsSentiment::Negative => ui::style_text("-", ui::StyleType::Negative),
                NewsSentiment::Neutral => ui::style_text("·", ui::StyleType::Neutral),
            };
            format!("{marker} {}", item.headline)
        })
        .collect();

    if let Some(overall) = feed.overall_sentiment {
        lines.push(String::new());
        lines.push(format!(
            "Overall sentiment: {overall:.2} ({})",
            sentiment_label(overall)
        ));
    }
    lines.join("\n")
}

pub fn render_comparison(result: &ComparisonResult) -> String {
    let best = &result.best_performer;
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Symbol"),
        ui::header_cell("Company"),
        ui::header_cell("Decision"),
        ui::header_cell("6M Change"),
        ui::header_cell("Sentiment"),
        ui::header_cell("Price"),
    ]);

    for stock in &result.comparison {
        let symbol = if stock.symbol == best.symbol {
            Cell::new(format!("★ {}", stock.symbol))
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold)
        } else {
            Cell::new(&stock.symbol)
        };
        let price = match (stock.current_price, stock.currency.as_deref()) {
            (Some(p), Some(c)) => format!("{p:.2} {c}"),
            (Some(p), None) => format!("{p:.2}"),
            _ => "N/A".to_string(),
        };
        table.add_row(vec![
            symbol,
            Cell::new(&stock.company_name),
            ui::decision_cell(stock.decision),
            ui::change_cell(stock.price_change_6m),
            ui::value_cell(format!("{:.2}", stock.sentiment_score)),
            ui::value_cell(price),
        ]);
    }

    let summary = format!(
        "★ Best performer: {} {:+.2}% ({})",
        best.symbol, best.change, best.decision
    );
    format!(
        "{}\n\n{}",
        table,
        ui::style_text(&summary, ui::StyleType::Highlight)
    )
}

pub fn render_trending(stocks: &[TrendingStock]) -> String {
    if stocks.is_empty() {
        return ui::style_text("No trending stocks right now", ui::StyleType::Subtle);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Symbol"),
        ui::header_cell("Name"),
        ui::header_cell("6M Change"),
        ui::header_cell("Price"),
    ]);
    for stock in stocks {
        table.add_row(vec![
            Cell::new(&stock.symbol),
            Cell::new(&stock.name),
            ui::change_cell(stock.change),
            ui::value_cell(
                stock
                    .current_price
                    .map_or("N/A".to_string(), |p| format!("{p:.2}")),
            ),
        ]);
    }
    table.to_string()
}

pub fn render_search(result: &SearchResult) -> String {
    match (&result.symbol, result.found) {
        (Some(symbol), true) => format!(
            "{} → {} ({})",
            result.query,
            ui::style_text(symbol, ui::StyleType::Highlight),
            result.company_name.as_deref().unwrap_or("unknown company")
        ),
        _ => ui::style_text(
            result
                .message
                .as_deref()
                .unwrap_or("Stock not found. Try full company name or exact ticker symbol."),
            ui::StyleType::Subtle,
        ),
    }
}

pub fn render_section(section: Section, content: &SectionContent) -> String {
    let title = ui::style_text(&section.to_string(), ui::StyleType::Title);
    match content {
        SectionContent::Empty => String::new(),
        SectionContent::Rendered(text) => format!("{title}\n{text}"),
        SectionContent::Failed(message) => {
            format!("{title}\n{}", ui::style_text(message, ui::StyleType::Error))
        }
    }
}

pub fn render_page(page: &Page) -> String {
    let separator = format!("\n{}\n", ui::separator());
    page.visible()
        .map(|(section, content)| render_section(section, content))
        .collect::<Vec<_>>()
        .join(separator.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{
        BestPerformer, ChartPeriod, ChartPoint, ChartSeries, Decision, NewsItem,
    };
    use chrono::NaiveDate;

    fn plain(text: &str) -> String {
        console::strip_ansi_codes(text).to_string()
    }

    fn metrics() -> MetricsSnapshot {
        MetricsSnapshot {
            symbol: Some("AAPL".to_string()),
            current_price: 189.3,
            currency: "USD".to_string(),
            day_change: 1.25,
            day_change_pct: 0.66,
            open_price: None,
            high_52w: Some(199.62),
            low_52w: Some(164.08),
            market_cap: Some(2_910_000_000_000.0),
            volume: Some(48_200_000.0),
            avg_volume: None,
            pe_ratio: Some(29.4),
            dividend_yield: None,
            exchange: None,
        }
    }

    fn analysis(symbol: &str, decision: Decision, change: f64) -> AnalysisResult {
        AnalysisResult {
            symbol: symbol.to_string(),
            company_name: format!("{symbol} Corp"),
            exchange: "NMS".to_string(),
            decision,
            explanation: "Because.".to_string(),
            sentiment_score: 0.2,
            price_change_6m: change,
            current_price: Some(100.0),
            currency: Some("USD".to_string()),
        }
    }

    #[test]
    fn test_sentiment_bar_width_at_bounds() {
        assert_eq!(sentiment_bar_width(-1.0), 0.0);
        assert_eq!(sentiment_bar_width(0.0), 50.0);
        assert_eq!(sentiment_bar_width(1.0), 100.0);
        assert!((sentiment_bar_width(0.5) - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_sentiment_bar_width_clamps() {
        assert_eq!(sentiment_bar_width(-3.0), 0.0);
        assert_eq!(sentiment_bar_width(7.5), 100.0);
        assert_eq!(sentiment_bar_width(f64::NAN), 50.0);
    }

    #[test]
    fn test_sentiment_bar_fill() {
        let bar = plain(&sentiment_bar(1.0));
        assert_eq!(bar, format!("[{}] 100%", "█".repeat(BAR_CELLS)));
        let bar = plain(&sentiment_bar(-1.0));
        assert_eq!(bar, format!("[{}] 0%", "·".repeat(BAR_CELLS)));
    }

    #[test]
    fn test_metrics_rows_present() {
        let text = plain(&render_metrics(&metrics(), 0.3));
        assert!(text.contains("Current Price"));
        assert!(text.contains("189.30 USD"));
        assert!(text.contains("+1.25 (+0.66%)"));
        assert!(text.contains("Market Cap"));
        assert!(text.contains("2.9T USD"));
        assert!(text.contains("48.2M"));
        assert!(text.contains("P/E Ratio"));
        assert!(text.contains("65%"));
    }

    #[test]
    fn test_metrics_omits_missing_optional_rows() {
        let mut m = metrics();
        m.market_cap = None;
        m.pe_ratio = None;
        let text = plain(&render_metrics(&m, 0.0));

        assert!(!text.contains("Market Cap"));
        assert!(!text.contains("P/E Ratio"));
        assert!(!text.contains("Open"));
        assert!(!text.contains("Dividend Yield"));
        assert!(!text.contains("N/A"));
        assert!(text.contains("52W High"));
    }

    #[test]
    fn test_format_large_number() {
        assert_eq!(format_large_number(2_910_000_000_000.0), "2.9T");
        assert_eq!(format_large_number(415_300_000.0), "415.3M");
        assert_eq!(format_large_number(12_340.0), "12.3K");
        assert_eq!(format_large_number(950.0), "950");
    }

    #[test]
    fn test_analysis_banner_matches_decision() {
        for (decision, icon) in [
            (Decision::Buy, "▲ BUY"),
            (Decision::Sell, "▼ SELL"),
            (Decision::Hold, "■ HOLD"),
        ] {
            let text = plain(&render_analysis(&analysis("AAPL", decision, 5.0)));
            assert!(text.starts_with(icon), "{text}");
            assert!(text.contains("AAPL Corp (AAPL)"));
            assert!(text.ends_with("Because."));
        }
    }

    #[test]
    fn test_sparkline_levels() {
        assert_eq!(sparkline(&[1.0, 2.0, 3.0], 10), "▁▅█");
        assert_eq!(sparkline(&[5.0, 5.0], 10), "▅▅");
        assert_eq!(sparkline(&[], 10), "");
        let long: Vec<f64> = (0..600).map(f64::from).collect();
        let line = sparkline(&long, 60);
        assert_eq!(line.chars().count(), 60);
        assert!(line.starts_with('▁'));
        assert!(line.ends_with('█'));
    }

    #[test]
    fn test_render_chart_summary() {
        let chart = ChartHandle {
            symbol: "AAPL".to_string(),
            period: ChartPeriod::OneMonth,
            series: ChartSeries {
                data: vec![
                    ChartPoint {
                        date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                        price: 100.0,
                    },
                    ChartPoint {
                        date: NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
                        price: 110.0,
                    },
                ],
            },
            generation: 1,
        };
        let text = plain(&render_chart(&chart));
        assert!(text.contains("AAPL · 1mo (2 points)"));
        assert!(text.contains("2024-05-01 → 2024-05-31"));
        assert!(text.contains("Change +10.00%"));
    }

    #[test]
    fn test_render_empty_chart() {
        let chart = ChartHandle {
            symbol: "AAPL".to_string(),
            period: ChartPeriod::FiveYears,
            series: ChartSeries { data: vec![] },
            generation: 1,
        };
        assert!(plain(&render_chart(&chart)).contains("No chart data available"));
    }

    #[test]
    fn test_render_news() {
        let feed = NewsFeed {
            news: vec![
                NewsItem {
                    headline: "Record quarter".to_string(),
                    sentiment: NewsSentiment::Positive,
                },
                NewsItem {
                    headline: "Lawsuit filed".to_string(),
                    sentiment: NewsSentiment::Negative,
                },
            ],
            overall_sentiment: Some(-0.25),
            message: None,
        };
        let text = plain(&render_news(&feed));
        assert!(text.contains("+ Record quarter"));
        assert!(text.contains("- Lawsuit filed"));
        assert!(text.contains("Overall sentiment: -0.25 (Negative)"));

        let empty = NewsFeed {
            news: vec![],
            overall_sentiment: None,
            message: None,
        };
        assert_eq!(plain(&render_news(&empty)), "No recent news available");
    }

    #[test]
    fn test_render_comparison_highlights_best() {
        let result = ComparisonResult {
            comparison: vec![
                analysis("AAPL", Decision::Buy, 12.0),
                analysis("MSFT", Decision::Hold, 3.0),
            ],
            best_performer: BestPerformer {
                symbol: "AAPL".to_string(),
                change: 12.0,
                decision: Decision::Buy,
            },
        };
        let text = plain(&render_comparison(&result));
        assert!(text.contains("★ AAPL"));
        assert!(!text.contains("★ MSFT"));
        assert!(text.contains("★ Best performer: AAPL +12.00% (BUY)"));
    }

    #[test]
    fn test_render_failed_section() {
        let text = plain(&render_section(
            Section::News,
            &SectionContent::Failed("Failed to load news".to_string()),
        ));
        assert_eq!(text, "News\nFailed to load news");
    }

    #[test]
    fn test_render_page_skips_empty_sections() {
        let mut page = Page::new();
        page.set(Section::News, SectionContent::Rendered("headline".to_string()));
        page.fail(Section::Metrics);
        page.set(Section::Chart, SectionContent::Empty);

        let text = plain(&render_page(&page));
        let metrics_at = text.find("Failed to load metrics").unwrap();
        let news_at = text.find("headline").unwrap();
        assert!(metrics_at < news_at);
        assert!(!text.contains("Chart"));
    }
}
