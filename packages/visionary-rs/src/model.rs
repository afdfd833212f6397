//! Display model produced from a raw service response.
//!
//! These are request-scoped values: built once per image, rendered, then dropped.
use serde::Serialize;

pub use visionary_vision::BoundingBox;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tag {
    pub name: String,
    pub confidence: f64,
}

/// A detected object. `confidence` is `None` when the service gave the
/// object no tag, which is different from a tag with zero confidence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedObject {
    pub name: String,
    pub confidence: Option<f64>,
    pub bounding_box: BoundingBox,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedPerson {
    pub bounding_box: BoundingBox,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Caption {
    pub text: String,
    pub confidence: f64,
}

/// Tags, objects, people and caption for one image, in service order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub tags: Vec<Tag>,
    pub objects: Vec<DetectedObject>,
    pub people: Vec<DetectedPerson>,
    pub caption: Option<Caption>,
}

impl AnalysisResult {
    /// True when the service detected nothing at all.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
            && self.objects.is_empty()
            && self.people.is_empty()
            && self.caption.is_none()
    }
}
