use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("Message must not be empty")]
    EmptyMessage,

    #[error("The assistant did not answer in time")]
    Timeout,

    #[error("Could not reach the assistant: {0}")]
    Network(String),

    #[error("{message} (HTTP {status})")]
    Server { status: u16, message: String },

    #[error("Unexpected response from the assistant: {0}")]
    InvalidResponse(String),

    #[error("Could not set up the HTTP client: {0}")]
    Client(String),
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ChatError::Timeout
        } else {
            ChatError::Network(err.to_string())
        }
    }
}
