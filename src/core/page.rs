//! The rendered page and the session state behind it.
//!
//! A page is a fixed set of sections. Each one is filled independently, so a
//! failure in one never disturbs the others.

use crate::core::model::{ChartPeriod, ChartSeries};
use std::collections::BTreeMap;
use std::fmt::Display;

/// Sections in the order they are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum Section {
    Trending,
    Analysis,
    Metrics,
    Chart,
    News,
    Comparison,
    Search,
}

impl Section {
    /// Inline message shown when the section's fetch fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Section::Trending => "Failed to load trending stocks",
            Section::Search => "Failed to search",
            Section::Analysis => "Failed to analyze stock",
            Section::Metrics => "Failed to load metrics",
            Section::Chart => "Failed to load chart",
            Section::News => "Failed to load news",
            Section::Comparison => "Failed to compare stocks",
        }
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Section::Trending => "Trending",
                Section::Search => "Search",
                Section::Analysis => "Analysis",
                Section::Metrics => "Metrics",
                Section::Chart => "Chart",
                Section::News => "News",
                Section::Comparison => "Comparison",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SectionContent {
    #[default]
    Empty,
    Rendered(String),
    Failed(String),
}

impl SectionContent {
    pub fn is_failed(&self) -> bool {
        matches!(self, SectionContent::Failed(_))
    }
}

#[derive(Debug, Default)]
pub struct Page {
    sections: BTreeMap<Section, SectionContent>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, section: Section, content: SectionContent) {
        self.sections.insert(section, content);
    }

    pub fn fail(&mut self, section: Section) {
        self.set(
            section,
            SectionContent::Failed(section.failure_message().to_string()),
        );
    }

    pub fn get(&self, section: Section) -> &SectionContent {
        static EMPTY: SectionContent = SectionContent::Empty;
        self.sections.get(&section).unwrap_or(&EMPTY)
    }

    pub fn clear(&mut self, section: Section) {
        self.sections.remove(&section);
    }

    /// Non-empty sections in display order.
    pub fn visible(&self) -> impl Iterator<Item = (Section, &SectionContent)> {
        self.sections
            .iter()
            .filter(|(_, content)| **content != SectionContent::Empty)
            .map(|(section, content)| (*section, content))
    }
}

/// A drawn chart. Dropping the handle tears the chart down.
#[derive(Debug)]
pub struct ChartHandle {
    pub symbol: String,
    pub period: ChartPeriod,
    pub series: ChartSeries,
    /// Monotonic id, so callers can tell a fresh chart from a stale one.
    pub generation: u64,
}

/// Client-side state that outlives a single render.
#[derive(Debug, Default)]
pub struct Session {
    pub selected_symbol: Option<String>,
    pub selected_company: Option<String>,
    pub period: ChartPeriod,
    pub chart: Option<ChartHandle>,
    pub(crate) charts_drawn: u64,
}
