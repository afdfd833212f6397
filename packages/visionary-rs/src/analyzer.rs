//! Runs one uploaded image through the vision service, normalizes the
//! response and produces the annotated images.
use image::RgbaImage;
use thiserror::Error;
use tracing::{debug, warn};
use visionary_vision::{VisionError, VisionService, ANALYSIS_FEATURES, OCR_FEATURES};

use crate::annotator::{decode_image, AnnotateError, Annotator};
use crate::model::AnalysisResult;
use crate::normalizer::{extract_text, normalize};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("image analysis unavailable: {0}")]
    Unavailable(VisionError),
    #[error("text extraction unavailable: {0}")]
    TextUnavailable(VisionError),
    #[error(transparent)]
    Image(#[from] AnnotateError),
}

/// Everything handed to the presentation layer for one image. The analysis
/// and the text extraction are separate service calls, so each carries its
/// own outcome.
pub struct AnalysisReport {
    pub analysis: Result<AnalysisResult, AnalysisError>,
    /// Present when at least one object was detected.
    pub objects_image: Option<RgbaImage>,
    /// Present when at least one person was detected.
    pub people_image: Option<RgbaImage>,
    pub text: Result<String, AnalysisError>,
}

pub struct MediaAnalyzer<S> {
    service: S,
    annotator: Annotator,
}

impl<S: VisionService> MediaAnalyzer<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            annotator: Annotator::new(),
        }
    }

    pub fn with_annotator(mut self, annotator: Annotator) -> Self {
        self.annotator = annotator;
        self
    }

    /// Request tags, objects, people and caption, then normalize them.
    pub async fn analyze(&self, image: &[u8]) -> Result<AnalysisResult, AnalysisError> {
        let raw = self
            .service
            .analyze(image, ANALYSIS_FEATURES)
            .await
            .map_err(AnalysisError::Unavailable)?;

        let result = normalize(&raw);
        debug!(
            tags = result.tags.len(),
            objects = result.objects.len(),
            people = result.people.len(),
            caption = result.caption.is_some(),
            "image analysis normalized"
        );
        Ok(result)
    }

    /// Request OCR and join the recognized lines.
    pub async fn extract_text(&self, image: &[u8]) -> Result<String, AnalysisError> {
        let raw = self
            .service
            .analyze(image, OCR_FEATURES)
            .await
            .map_err(AnalysisError::TextUnavailable)?;
        Ok(extract_text(raw.read.as_ref()))
    }

    /// Full request: decode the upload, analyze it, annotate copies of it and
    /// extract its text. Fails only when the upload is not a readable image;
    /// service failures are reported inside the returned report.
    pub async fn process(&self, image_bytes: &[u8]) -> Result<AnalysisReport, AnalysisError> {
        let image = decode_image(image_bytes)?;

        let analysis = self.analyze(image_bytes).await;
        if let Err(err) = &analysis {
            warn!(%err, "image analysis failed");
        }

        let (objects_image, people_image) = match &analysis {
            Ok(result) => (
                (!result.objects.is_empty())
                    .then(|| self.annotator.draw_objects(&image, &result.objects)),
                (!result.people.is_empty())
                    .then(|| self.annotator.draw_people(&image, &result.people)),
            ),
            Err(_) => (None, None),
        };

        let text = self.extract_text(image_bytes).await;
        if let Err(err) = &text {
            warn!(%err, "text extraction failed");
        }

        Ok(AnalysisReport {
            analysis,
            objects_image,
            people_image,
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotator::{encode_png, OBJECT_COLOR};
    use async_trait::async_trait;
    use image::Rgba;
    use std::sync::Mutex;
    use visionary_vision::{
        BoundingBox, ImageAnalysis, ObjectEntry, ObjectsResult, ReadResult, TagEntry, TextBlock,
        TextLine, VisualFeature,
    };

    /// Answers analysis and OCR requests from canned outcomes.
    struct StubService {
        analysis: fn() -> Result<ImageAnalysis, VisionError>,
        read: fn() -> Result<ImageAnalysis, VisionError>,
        calls: Mutex<Vec<Vec<VisualFeature>>>,
    }

    impl StubService {
        fn new(
            analysis: fn() -> Result<ImageAnalysis, VisionError>,
            read: fn() -> Result<ImageAnalysis, VisionError>,
        ) -> Self {
            Self {
                analysis,
                read,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl VisionService for StubService {
        async fn analyze(
            &self,
            _image: &[u8],
            features: &[VisualFeature],
        ) -> Result<ImageAnalysis, VisionError> {
            self.calls.lock().unwrap().push(features.to_vec());
            if features.contains(&VisualFeature::Read) {
                (self.read)()
            } else {
                (self.analysis)()
            }
        }
    }

    fn one_object() -> Result<ImageAnalysis, VisionError> {
        Ok(ImageAnalysis {
            objects: Some(ObjectsResult {
                values: vec![ObjectEntry {
                    bounding_box: BoundingBox::new(2, 2, 5, 5),
                    tags: vec![TagEntry {
                        name: "cup".into(),
                        confidence: 0.654,
                    }],
                }],
            }),
            ..Default::default()
        })
    }

    fn some_text() -> Result<ImageAnalysis, VisionError> {
        Ok(ImageAnalysis {
            read: Some(ReadResult {
                blocks: vec![TextBlock {
                    lines: vec![TextLine::new("OPEN"), TextLine::new("24h")],
                }],
            }),
            ..Default::default()
        })
    }

    fn nothing() -> Result<ImageAnalysis, VisionError> {
        Ok(ImageAnalysis::default())
    }

    fn network_down() -> Result<ImageAnalysis, VisionError> {
        Err(VisionError::Network("connection refused".into()))
    }

    fn upload() -> Vec<u8> {
        encode_png(&RgbaImage::from_pixel(16, 16, Rgba([0, 0, 0, 255]))).unwrap()
    }

    #[tokio::test]
    async fn test_analyze_requests_analysis_features() {
        let analyzer = MediaAnalyzer::new(StubService::new(one_object, some_text));

        let result = analyzer.analyze(b"bytes").await.unwrap();

        assert_eq!(result.objects[0].name, "cup");
        assert_eq!(result.objects[0].confidence, Some(0.65));
        let calls = analyzer.service.calls.lock().unwrap();
        assert_eq!(calls.as_slice(), &[ANALYSIS_FEATURES.to_vec()]);
    }

    #[tokio::test]
    async fn test_failure_is_distinct_from_nothing_detected() {
        let failing = MediaAnalyzer::new(StubService::new(network_down, network_down));
        assert!(matches!(
            failing.analyze(b"bytes").await,
            Err(AnalysisError::Unavailable(VisionError::Network(_)))
        ));
        assert!(matches!(
            failing.extract_text(b"bytes").await,
            Err(AnalysisError::TextUnavailable(_))
        ));

        let empty = MediaAnalyzer::new(StubService::new(nothing, nothing));
        assert!(empty.analyze(b"bytes").await.unwrap().is_empty());
        assert_eq!(empty.extract_text(b"bytes").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_process_builds_all_artifacts() {
        let analyzer = MediaAnalyzer::new(StubService::new(one_object, some_text));

        let report = analyzer.process(&upload()).await.unwrap();

        assert_eq!(report.analysis.unwrap().objects.len(), 1);
        let objects_image = report.objects_image.unwrap();
        assert_eq!(*objects_image.get_pixel(2, 2), OBJECT_COLOR);
        assert!(report.people_image.is_none());
        assert_eq!(report.text.unwrap(), "OPEN\n24h");
    }

    #[tokio::test]
    async fn test_process_keeps_text_when_analysis_fails() {
        let analyzer = MediaAnalyzer::new(StubService::new(network_down, some_text));

        let report = analyzer.process(&upload()).await.unwrap();

        assert!(matches!(report.analysis, Err(AnalysisError::Unavailable(_))));
        assert!(report.objects_image.is_none());
        assert_eq!(report.text.unwrap(), "OPEN\n24h");
    }

    #[tokio::test]
    async fn test_process_keeps_analysis_when_text_fails() {
        let analyzer = MediaAnalyzer::new(StubService::new(one_object, network_down));

        let report = analyzer.process(&upload()).await.unwrap();

        assert!(report.analysis.is_ok());
        assert!(report.objects_image.is_some());
        assert!(matches!(report.text, Err(AnalysisError::TextUnavailable(_))));
    }

    #[tokio::test]
    async fn test_process_rejects_unreadable_upload() {
        let analyzer = MediaAnalyzer::new(StubService::new(one_object, some_text));

        let result = analyzer.process(b"definitely not a png").await;

        assert!(matches!(result, Err(AnalysisError::Image(AnnotateError::Decode(_)))));
        assert!(analyzer.service.calls.lock().unwrap().is_empty());
    }
}
