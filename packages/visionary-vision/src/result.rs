//! Raw image analysis results as returned by the service.
//!
//! Every section is optional: the service only fills in the features that
//! were requested, and may omit a section even then.
use serde::Deserialize;

use crate::region::BoundingBox;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysis {
    #[serde(default, rename = "captionResult")]
    pub caption: Option<CaptionResult>,
    #[serde(default, rename = "tagsResult")]
    pub tags: Option<TagsResult>,
    #[serde(default, rename = "objectsResult")]
    pub objects: Option<ObjectsResult>,
    #[serde(default, rename = "peopleResult")]
    pub people: Option<PeopleResult>,
    #[serde(default, rename = "readResult")]
    pub read: Option<ReadResult>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CaptionResult {
    pub text: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TagEntry {
    pub name: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TagsResult {
    #[serde(default)]
    pub values: Vec<TagEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectEntry {
    pub bounding_box: BoundingBox,
    #[serde(default)]
    pub tags: Vec<TagEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ObjectsResult {
    #[serde(default)]
    pub values: Vec<ObjectEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonEntry {
    pub bounding_box: BoundingBox,
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PeopleResult {
    #[serde(default)]
    pub values: Vec<PersonEntry>,
}

/// One recognized line. Polygons and per-word detail in the response are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TextLine {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub lines: Vec<TextLine>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReadResult {
    #[serde(default)]
    pub blocks: Vec<TextBlock>,
}

impl TextLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
