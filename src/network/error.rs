use serde::Serialize;
use thiserror::Error;

/// Reasons no network can be drawn for a term set.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum NetworkError {
    /// Fewer than two terms survived filtering and truncation.
    #[error("a term network needs at least 2 terms, got {term_count}")]
    InsufficientTerms { term_count: usize },

    /// Terms exist but no pair is similar enough to connect.
    #[error(
        "no term pairs reach similarity threshold {threshold} across {term_count} terms; \
         try a lower threshold"
    )]
    NoEdgesAboveThreshold { threshold: f64, term_count: usize },

    #[error("similarity threshold must lie within [0, 1], got {threshold}")]
    InvalidThreshold { threshold: f64 },
}

/// Non-fatal conditions raised while building a network.
#[derive(Clone, Debug, Error, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NetworkWarning {
    #[error("{supplied} terms exceed the network limit of {max_terms}; keeping the first {max_terms}")]
    TermCountExceeded { supplied: usize, max_terms: usize },
}

/// A failed build together with the warnings raised before it failed, so a
/// truncated input stays visible on the error path.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("{error}{}", warning_suffix(.warnings))]
pub struct NetworkFailure {
    pub error: NetworkError,
    pub warnings: Vec<NetworkWarning>,
}

impl From<NetworkError> for NetworkFailure {
    fn from(error: NetworkError) -> Self {
        Self {
            error,
            warnings: Vec::new(),
        }
    }
}

fn warning_suffix(warnings: &[NetworkWarning]) -> String {
    warnings
        .iter()
        .map(|warning| format!(" ({warning})"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_message_mentions_truncation() {
        let failure = NetworkFailure {
            error: NetworkError::NoEdgesAboveThreshold {
                threshold: 0.3,
                term_count: 100,
            },
            warnings: vec![NetworkWarning::TermCountExceeded {
                supplied: 150,
                max_terms: 100,
            }],
        };

        let message = failure.to_string();
        assert!(message.starts_with("no term pairs reach similarity threshold 0.3"));
        assert!(message.contains("150 terms exceed the network limit of 100"));
    }

    #[test]
    fn plain_errors_convert_without_warnings() {
        let failure = NetworkFailure::from(NetworkError::InsufficientTerms { term_count: 1 });
        assert!(failure.warnings.is_empty());
        assert_eq!(failure.to_string(), "a term network needs at least 2 terms, got 1");
    }
}
