//! Error taxonomy for fetching and categorizing census tables.

use thiserror::Error;

/// Everything that can go wrong between asking for a table and turning it
/// into category totals.
#[derive(Debug, Error)]
pub enum CensusError {
    /// The remote source answered, but not with a success status.
    #[error("unexpected status code {status} from {url}")]
    Fetch { status: u16, url: String },

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The body could not be decoded into the expected response shape.
    #[error("failed to parse census response: {0}")]
    Parse(#[from] serde_json::Error),

    /// A table, geography or column that must exist was absent.
    #[error("missing {what}")]
    Lookup { what: String },

    #[error("cache i/o failed for {path}: {source}")]
    Cache {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl CensusError {
    pub fn lookup(what: impl Into<String>) -> Self {
        CensusError::Lookup { what: what.into() }
    }
}

pub type Result<T> = std::result::Result<T, CensusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_mentions_status() {
        let err = CensusError::Fetch {
            status: 503,
            url: "https://example.org/data".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unexpected status code 503 from https://example.org/data"
        );
    }

    #[test]
    fn test_lookup_helper() {
        let err = CensusError::lookup("column B03002003 for 05000US06037");
        assert!(matches!(err, CensusError::Lookup { .. }));
        assert_eq!(err.to_string(), "missing column B03002003 for 05000US06037");
    }
}
