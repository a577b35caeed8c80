use std::path::PathBuf;

use thiserror::Error;

/// Failures of a single card run. Every stage stops on the first one.
#[derive(Debug, Error)]
pub enum Error {
    /// A required option is missing or out of range.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("network error while {stage}: {source}")]
    Network {
        stage: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream answered with something other than a 2xx status.
    #[error("{stage} request failed with status {status}: {body}")]
    Status {
        stage: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    /// Malformed JSON, TOML, font or image payload.
    #[error("error decoding {what}: {reason}")]
    Decode { what: String, reason: String },

    #[error("invalid time zone '{0}'")]
    Timezone(String),

    #[error("error decoding weather time '{value}': {reason}")]
    TimeParse { value: String, reason: String },

    #[error("no font registered for platform '{0}'")]
    UnsupportedPlatform(String),

    #[error("error getting pictogram for {theme} theme, code {code}: {reason}")]
    PictogramResolution {
        theme: &'static str,
        code: i32,
        reason: String,
    },

    #[error("i/o error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn decode(what: impl Into<String>, reason: impl ToString) -> Self {
        Self::Decode {
            what: what.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for failures caused by the transport or the upstream service.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Status { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
