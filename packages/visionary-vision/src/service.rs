use async_trait::async_trait;
use thiserror::Error;

use crate::result::ImageAnalysis;

/// Analysis features that can be requested from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualFeature {
    Tags,
    Objects,
    People,
    Caption,
    Read,
}

impl VisualFeature {
    /// Name used in the service's `features` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            VisualFeature::Tags => "tags",
            VisualFeature::Objects => "objects",
            VisualFeature::People => "people",
            VisualFeature::Caption => "caption",
            VisualFeature::Read => "read",
        }
    }
}

/// Features requested for tags, objects, people and caption.
pub const ANALYSIS_FEATURES: &[VisualFeature] = &[
    VisualFeature::Tags,
    VisualFeature::Objects,
    VisualFeature::People,
    VisualFeature::Caption,
];

/// Features requested for text extraction.
pub const OCR_FEATURES: &[VisualFeature] = &[VisualFeature::Read];

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("authentication rejected by vision service (status {status})")]
    Authentication { status: u16 },
    #[error("vision service quota exceeded")]
    QuotaExceeded { retry_after_secs: Option<u64> },
    #[error("vision service returned {status}: {message}")]
    Service { status: u16, message: String },
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[async_trait]
pub trait VisionService: Send + Sync {
    async fn analyze(
        &self,
        image: &[u8],
        features: &[VisualFeature],
    ) -> Result<ImageAnalysis, VisionError>;
}
