//! # visionary-rs
//!
//! Analyze an image with a cloud vision service and present what it found:
//! tags, a caption, object and people boxes, and OCR text.
//!
//! ## Features
//!
//! - **Normalization**: Turn the service's nested, optional response sections into a flat display model
//! - **Annotation**: Draw object (cyan) and people (red) boxes with labels onto copies of the upload
//! - **Independent outcomes**: Analysis and OCR are separate calls and fail separately
//! - **Pluggable service**: Anything implementing [`VisionService`] can stand in for Azure, including test doubles
//!
//! ## Quick Start
//!
//! ```ignore
//! use visionary_rs::prelude::*;
//!
//! let config = VisionConfig::from_env()?;
//! let analyzer = MediaAnalyzer::new(config.build_client()?);
//!
//! let bytes = std::fs::read("street.jpg")?;
//! let report = analyzer.process(&bytes).await?;
//! print!("{}", render_report(&report));
//!
//! if let Some(image) = &report.objects_image {
//!     std::fs::write("objects.png", encode_png(image)?)?;
//! }
//! ```

pub mod analyzer;
pub mod annotator;
pub mod config;
pub mod model;
pub mod normalizer;
pub mod report;

// Re-export commonly used types at the root level
pub use analyzer::{AnalysisError, AnalysisReport, MediaAnalyzer};
pub use annotator::{decode_image, encode_png, AnnotateError, Annotator, OBJECT_COLOR, PERSON_COLOR};
pub use config::{ConfigError, VisionConfig};
pub use model::{AnalysisResult, BoundingBox, Caption, DetectedObject, DetectedPerson, Tag};
pub use normalizer::{extract_text, normalize, round_confidence, PERSON_CONFIDENCE_THRESHOLD, UNKNOWN_OBJECT_NAME};
pub use report::{render_report, ReportSummary};
pub use visionary_vision::{AzureVisionClient, VisionError, VisionService, VisualFeature};

/// Prelude module for convenient imports
///
/// Import everything you need with:
/// ```ignore
/// use visionary_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        decode_image, encode_png, extract_text, normalize, render_report, round_confidence, AnalysisError,
        AnalysisReport, AnalysisResult, AnnotateError, Annotator, AzureVisionClient, BoundingBox, Caption,
        ConfigError, DetectedObject, DetectedPerson, MediaAnalyzer, Tag, VisionConfig, VisionError,
        VisionService, VisualFeature, PERSON_CONFIDENCE_THRESHOLD, UNKNOWN_OBJECT_NAME,
    };
}
