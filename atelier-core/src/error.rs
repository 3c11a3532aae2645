use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("classifier unavailable: {0}")]
    ClassifierUnavailable(String),

    #[error("classifier returned an unusable response: {0}")]
    InvalidClassifierResponse(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
