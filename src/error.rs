pub type CollageResult<T> = Result<T, CollageError>;

#[derive(thiserror::Error, Debug)]
pub enum CollageError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("layer error: {0}")]
    Layer(String),

    #[error("filter error: {0}")]
    Filter(String),

    #[error("missing metadata: {0}")]
    MissingMetadata(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CollageError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn layer(msg: impl Into<String>) -> Self {
        Self::Layer(msg.into())
    }

    pub fn filter(msg: impl Into<String>) -> Self {
        Self::Filter(msg.into())
    }

    pub fn missing_metadata(msg: impl Into<String>) -> Self {
        Self::MissingMetadata(msg.into())
    }
}
