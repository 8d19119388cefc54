use crate::store::Operation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid request URL `{url}`: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("URL `{0}` cannot take path segments")]
    NotABase(String),
    #[error("Error talking to server: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("Server responded with status {status} for `{url}`")]
    Status { status: u16, url: String },
}

// The request URL may carry API keys
impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Transport(e.without_url())
    }
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Unexpected {what} response shape: {source}")]
    Shape {
        what: &'static str,
        source: serde_json::Error,
    },
    #[error("The {0} response contained no items")]
    Empty(&'static str),
}

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("{0}")]
    Fetch(#[from] FetchError),
    #[error("{0}")]
    Extract(#[from] ExtractError),
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("The {0} retrieval was cancelled")]
    Cancelled(Operation),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Path to user's config directory could not be detected")]
    ConfigDir,
    #[error("Error reading or writing configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration file location is not usable: {0}")]
    Path(#[from] PathError),
    #[error("Error parsing configuration file: {0}")]
    Parse(#[from] serde_yml::Error),
    #[error("Missing configuration value `{0}`")]
    Missing(&'static str),
}

#[derive(Error, Debug, PartialEq)]
pub enum CoordinatesError {
    #[error("Latitude {0} is outside of -90..=90")]
    InvalidLatitude(f64),
    #[error("Longitude {0} is outside of -180..=180")]
    InvalidLongitude(f64),
}

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Path `{0}` could not be resolved")]
    Canonicalize(#[from] std::io::Error),
    #[error("File or directory `{0}` is not accessible")]
    Inaccessible(String),
}
