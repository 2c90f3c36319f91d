use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed cookie file / config file
    #[error("configuration error: {message}")]
    Config {
        message: String,
        /// The missing cookie name or config key, when there is one
        key: Option<String>,
    },

    #[error(
        "can't log into IMDb. Make sure that your IMDb cookie in {cookie_source} is correct \
         and has not expired. For more info see README.md"
    )]
    AuthenticationFailed { cookie_source: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("unexpected page structure at {url}: {message}")]
    Parse { url: String, message: String },

    #[error("can't extract list/user ID from {path} for the list \"{title}\"")]
    IdentityNotFound { path: String, title: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("error writing archive: {0}")]
    Archive(#[from] zip::result::ZipError),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("error sending request to {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response started but its body could not be read
    #[error("error reading response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: None,
        }
    }
}
