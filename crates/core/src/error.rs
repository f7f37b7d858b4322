#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Upstream error ({status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
