//! Wire-model error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LwsError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("server response is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("server reported an error: {0}")]
    Server(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}
