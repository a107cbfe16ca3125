use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid year range: {0}")]
    InvalidYearRange(String),
    #[error("invalid opinion id: {0}")]
    InvalidOpinionId(String),
}

/// Terminal failure of a fetch, as seen by whoever renders it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request cancelled")]
    Cancelled,
    #[error("not found")]
    NotFound,
    #[error("network error: {0}")]
    Network(String),
    #[error("server error ({}): {message}", status_label(.status))]
    Server { status: Option<u16>, message: String },
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "invalid response".to_string(),
    }
}

impl FetchError {
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        FetchError::Server {
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        FetchError::Server {
            status: None,
            message: message.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }

    /// Whether the view should offer a retry action. Only cancellation is
    /// never shown, so it is the only variant without one.
    pub fn offers_retry(&self) -> bool {
        !self.is_cancelled()
    }

    pub fn search_message(&self) -> &'static str {
        match self {
            FetchError::Network(_) => {
                "Could not reach the search service. It may be waking up; try again in a few seconds."
            }
            FetchError::NotFound | FetchError::Server { .. } => {
                "Something went wrong while searching. Please try again."
            }
            FetchError::Cancelled => "",
        }
    }

    pub fn detail_message(&self) -> &'static str {
        match self {
            FetchError::NotFound => "Opinion not found. It may have been removed or the link is wrong.",
            FetchError::Network(_) => {
                "Could not reach the server. It may be waking up; try again in a few seconds."
            }
            FetchError::Server { .. } => "Failed to load this opinion. Please try again.",
            FetchError::Cancelled => "",
        }
    }
}
