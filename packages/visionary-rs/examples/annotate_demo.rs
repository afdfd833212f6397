use anyhow::Result;
use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use visionary_rs::prelude::*;
use visionary_vision::{
    CaptionResult, ImageAnalysis, ObjectEntry, ObjectsResult, PeopleResult, PersonEntry, ReadResult, TagEntry,
    TagsResult, TextBlock, TextLine,
};

/// Offline stand-in for the vision service so the demo runs without credentials.
struct CannedService;

#[async_trait]
impl VisionService for CannedService {
    async fn analyze(&self, _image: &[u8], features: &[VisualFeature]) -> Result<ImageAnalysis, VisionError> {
        if features.contains(&VisualFeature::Read) {
            return Ok(ImageAnalysis {
                read: Some(ReadResult {
                    blocks: vec![TextBlock {
                        lines: vec![TextLine::new("MAIN ST"), TextLine::new("ONE WAY")],
                    }],
                }),
                ..Default::default()
            });
        }

        Ok(ImageAnalysis {
            caption: Some(CaptionResult {
                text: "a person standing next to a car".into(),
                confidence: 0.8127,
            }),
            tags: Some(TagsResult {
                values: vec![
                    TagEntry { name: "outdoor".into(), confidence: 0.9934 },
                    TagEntry { name: "street".into(), confidence: 0.86666 },
                ],
            }),
            objects: Some(ObjectsResult {
                values: vec![
                    ObjectEntry {
                        bounding_box: BoundingBox::new(120, 140, 160, 90),
                        tags: vec![TagEntry { name: "car".into(), confidence: 0.781 }],
                    },
                    ObjectEntry { bounding_box: BoundingBox::new(20, 30, 40, 40), tags: vec![] },
                ],
            }),
            people: Some(PeopleResult {
                values: vec![
                    PersonEntry { bounding_box: BoundingBox::new(60, 80, 45, 140), confidence: 0.93 },
                    PersonEntry { bounding_box: BoundingBox::new(300, 10, 10, 20), confidence: 0.05 },
                ],
            }),
            ..Default::default()
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let upload = encode_png(&RgbaImage::from_pixel(320, 240, Rgba([40, 40, 40, 255])))?;

    let analyzer = MediaAnalyzer::new(CannedService);
    let report = analyzer.process(&upload).await?;

    print!("{}", render_report(&report));

    let out_dir = std::env::temp_dir().join("visionary-demo");
    std::fs::create_dir_all(&out_dir)?;
    if let Some(image) = &report.objects_image {
        std::fs::write(out_dir.join("objects.png"), encode_png(image)?)?;
    }
    if let Some(image) = &report.people_image {
        std::fs::write(out_dir.join("people.png"), encode_png(image)?)?;
    }
    println!("\nAnnotated images written to {}", out_dir.display());

    Ok(())
}
