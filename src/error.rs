use thiserror::Error;

/// Failures surfaced by the dataset loader and the aggregation engine.
///
/// `DataUnavailable` is fatal for the session; the rest are caller-correctable
/// (a bad or premature query) and are never silently defaulted.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("dataset unavailable: {reason}")]
    DataUnavailable { reason: String },

    #[error("no club records to summarize")]
    EmptyInput,

    #[error("no clubs found for league {league}")]
    UnknownLeague { league: String },

    #[error("need at least {needed} league summaries, got {got}")]
    InsufficientData { needed: usize, got: usize },
}

impl StatsError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        StatsError::DataUnavailable {
            reason: reason.into(),
        }
    }
}
