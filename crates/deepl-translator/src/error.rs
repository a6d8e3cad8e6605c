//! Translation errors.

use std::fmt;

use deepl_cdp::BrowserError;
use thiserror::Error;

/// Which side of the language pair a code was given for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageSide {
    Source,
    Target,
}

impl fmt::Display for LanguageSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanguageSide::Source => write!(f, "source"),
            LanguageSide::Target => write!(f, "target"),
        }
    }
}

/// Coarse classification callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad construction arguments or API misuse.
    Configuration,
    /// Input text rejected before any I/O.
    Input,
    /// Browser, network or page failure.
    PageLoad,
}

#[derive(Debug, Error)]
pub enum DeeplError {
    #[error("{value:?} is not valid {side} language. Valid language:\n{}", .valid.join(", "))]
    InvalidLanguage {
        side: LanguageSide,
        value: String,
        valid: &'static [&'static str],
    },

    #[error("Script seems to be empty.")]
    EmptyInput,

    #[error("Limit of script is less than {limit} chars (Now: {actual} chars)")]
    InputTooLong { limit: usize, actual: usize },

    #[error("{message} ({timeout_ms} ms)")]
    PageLoad {
        message: String,
        timeout_ms: u64,
        #[source]
        cause: Option<BrowserError>,
    },

    #[error("translate() cannot block inside an async runtime, use translate_async()")]
    BlockingInAsyncContext,
}

impl DeeplError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeeplError::InvalidLanguage { .. } | DeeplError::BlockingInAsyncContext => {
                ErrorKind::Configuration
            }
            DeeplError::EmptyInput | DeeplError::InputTooLong { .. } => ErrorKind::Input,
            DeeplError::PageLoad { .. } => ErrorKind::PageLoad,
        }
    }

    pub(crate) fn page_load(
        message: impl Into<String>,
        timeout_ms: u64,
        cause: impl Into<BrowserError>,
    ) -> Self {
        DeeplError::PageLoad {
            message: message.into(),
            timeout_ms,
            cause: Some(cause.into()),
        }
    }
}
