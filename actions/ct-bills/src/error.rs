use thiserror::Error;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the library
#[derive(Error, Debug)]
pub enum Error {
    /// The bill-info feed belongs to a different session than the one requested.
    #[error("No data for session {requested}: bill feed reports session {found}")]
    NoDataForPeriod { requested: String, found: String },

    #[error("Malformed {field}: {value:?}")]
    MalformedField { field: &'static str, value: String },

    #[error("Missing {what} in {url}")]
    MissingElement { what: &'static str, url: String },

    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("No response available for {0}")]
    NotFound(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid CSS selector: {0}")]
    Selector(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl Error {
    /// True when the error means the requested session has no data yet.
    pub fn is_no_data(&self) -> bool {
        matches!(self, Error::NoDataForPeriod { .. })
    }

    pub(crate) fn malformed(field: &'static str, value: impl Into<String>) -> Self {
        Error::MalformedField {
            field,
            value: value.into(),
        }
    }
}
