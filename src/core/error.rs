/// Input problems caught before any request is made. These are shown to the
/// user as blocking alerts rather than inline section errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Please enter a stock name or symbol")]
    EmptyQuery,

    #[error("Please enter between 2 and 4 stocks to compare (got {given})")]
    ComparisonCount { given: usize },
}
