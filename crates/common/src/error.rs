//! Unified error type for the arb-signal-bot.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Snapshot storage error: {0}")]
    Storage(String),

    // thiserror reserves a field named `source` for the error cause.
    #[error("Empty snapshot for source {src}: {detail}")]
    EmptySnapshot { src: String, detail: String },

    #[error("Notification error: {0}")]
    Notify(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot_names_source_and_has_no_cause() {
        let err = Error::EmptySnapshot {
            src: "toto".into(),
            detail: "no usable rows".into(),
        };
        assert_eq!(err.to_string(), "Empty snapshot for source toto: no usable rows");
        assert!(std::error::Error::source(&err).is_none());
    }
}
