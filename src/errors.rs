use camino::Utf8PathBuf;
use std::fmt::{self, Formatter};
use thiserror::Error;
use url::Url;

/// Failure reported by the API in a non-2xx response.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ApiError {
    pub code: u16,
    pub message: String,
    pub description: String,
}

impl ApiError {
    #[must_use]
    pub fn new(code: u16, message: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            description: description.into(),
        }
    }

    pub const fn code(&self) -> u16 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Full description of the error.
    ///
    /// When the API sent no description, this is the same text as the
    /// `Display` implementation produces.
    #[must_use]
    pub fn description(&self) -> String {
        if self.description.is_empty() {
            self.to_string()
        } else {
            self.description.clone()
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "{} {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// A remote job was accepted but reported that it failed.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ResourceError {
    #[error("Analysis failed: {0}")]
    Analysis(String),

    #[error("Decompilation failed: {0}")]
    Decompilation(String),
}

impl ResourceError {
    /// Error text supplied by the service.
    pub fn message(&self) -> &str {
        match self {
            Self::Analysis(msg) | Self::Decompilation(msg) => msg,
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error("cannot {action} file \"{path}\": {source}")]
    Filesystem {
        action: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON decoding failed: {0}")]
    JsonDecoding(#[from] serde_json::Error),

    #[error(transparent)]
    Api(ApiError),

    #[error(transparent)]
    Auth(ApiError),

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error("{0} cannot be base, provide valid API URL")]
    CannotBeBase(Url),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Resource {id} has not finished after {polls} status checks")]
    StillRunning { id: String, polls: usize },
}

impl ClientError {
    pub(crate) fn filesystem(
        action: &'static str,
        path: impl Into<Utf8PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Filesystem {
            action,
            path: path.into(),
            source,
        }
    }

    /// Maps an API failure onto the matching variant; 401 means bad credentials.
    #[must_use]
    pub fn from_api_error(error: ApiError) -> Self {
        if error.code == 401 {
            Self::Auth(error)
        } else {
            Self::Api(error)
        }
    }

    /// The API failure behind both `Api` and `Auth`.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(error) | Self::Auth(error) => Some(error),
            _ => None,
        }
    }

    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// True for failures of the transport or the local filesystem.
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Reqwest(_) | Self::Filesystem { .. })
    }
}
