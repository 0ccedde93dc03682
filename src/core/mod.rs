//! Core types and abstractions shared by the client

pub mod api;
pub mod config;
pub mod error;
pub mod log;
pub mod model;
pub mod page;

// Re-export main types for cleaner imports
pub use api::StockAnalysisApi;
pub use error::InputError;
pub use model::{ChartPeriod, Decision, NewsSentiment};
pub use page::{Page, Section, SectionContent};
