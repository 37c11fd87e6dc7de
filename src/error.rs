#[derive(Debug, thiserror::Error)]
pub enum EnhanceError {
    #[error("Buffer of {width}x{height} needs {expected} bytes, got {actual}")]
    DimensionMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Buffer dimensions must be non-zero, got {width}x{height}")]
    EmptyBuffer { width: usize, height: usize },

    #[error("Buffer of {width}x{height} does not fit in memory")]
    TooLarge { width: usize, height: usize },

    #[error("Invalid enhancement config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, EnhanceError>;
