pub mod azure;
pub mod region;
pub mod result;
pub mod service;

pub use azure::AzureVisionClient;
pub use region::{BoundingBox, GeometryError};
pub use result::{
    CaptionResult, ImageAnalysis, ObjectEntry, ObjectsResult, PeopleResult, PersonEntry,
    ReadResult, TagEntry, TagsResult, TextBlock, TextLine,
};
pub use service::{VisionError, VisionService, VisualFeature, ANALYSIS_FEATURES, OCR_FEATURES};
