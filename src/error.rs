//! Error types for pydocs-scraper
//!
//! This module provides the error hierarchy used across the fetcher, the
//! locator, the extractors and the presenters, built with `thiserror`.

use thiserror::Error;

/// The main error type for scraper operations
#[derive(Error, Debug)]
pub enum Error {
    /// Network / HTTP errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Page structure errors (missing elements, nothing matched)
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Status cross-check errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Rendering / export errors
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

/// Transport-level failures
#[derive(Error, Debug)]
pub enum FetchError {
    /// URL could not be parsed or joined
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Request failed before a response arrived (DNS, timeout, reset)
    #[error("Request to {url} failed: {message}")]
    Transport {
        /// Requested URL
        url: String,
        /// Underlying error chain
        message: String,
    },

    /// Server answered with a non-success status
    #[error("HTTP error {status} for {url}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// Required page could not be fetched
    #[error("No response received from {0}")]
    NoResponse(String),

    /// Cache backend failure
    #[error("Cache error: {0}")]
    Cache(String),
}

/// Page structure errors
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Element not found
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Nothing on the page matched the expected marker
    #[error("Nothing found: {0}")]
    NothingFound(String),

    /// Element found but a required attribute is missing
    #[error("Missing attribute `{attr}` on {element}")]
    MissingAttribute {
        /// Attribute name
        attr: String,
        /// Element description
        element: String,
    },
}

/// Status cross-check failures for the PEP tally
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Summary code is absent from the expected-status table
    #[error("Unknown status code {code:?} for {url}")]
    UnknownStatusCode {
        /// Code shown in the summary table
        code: String,
        /// Detail page URL
        url: String,
    },

    /// Detail page status is not acceptable for a malformed summary code
    #[error("Unexpected status {status:?} for code {code:?} at {url}")]
    UnexpectedStatus {
        /// Code shown in the summary table
        code: String,
        /// Status declared on the detail page
        status: String,
        /// Detail page URL
        url: String,
    },
}

/// Rendering / export errors
#[derive(Error, Debug)]
pub enum OutputError {
    /// Row does not match the header arity
    #[error("Row has {actual} fields, header has {expected}")]
    ArityMismatch {
        /// Header width
        expected: usize,
        /// Offending row width
        actual: usize,
    },

    /// Writing the export failed
    #[error("Failed to write {path}: {message}")]
    WriteFailed {
        /// Target path
        path: String,
        /// Underlying error
        message: String,
    },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config {path}: {message}")]
    Read {
        /// Config path
        path: String,
        /// Underlying error
        message: String,
    },

    /// Config file is not valid TOML for the schema
    #[error("Invalid config {path}: {message}")]
    Parse {
        /// Config path
        path: String,
        /// Parser message
        message: String,
    },
}

/// Result type alias for scraper operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a generic error from a string
    pub fn generic<S: Into<String>>(msg: S) -> Self {
        Error::Generic(msg.into())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::Fetch(FetchError::InvalidUrl(err.to_string()))
    }
}
