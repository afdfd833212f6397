//! Burns detection boxes and labels onto copies of the source image.
use std::io::Cursor;
use std::path::{Path, PathBuf};

use ab_glyph::FontArc;
use image::{ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use thiserror::Error;
use tracing::{debug, warn};
use visionary_vision::{BoundingBox, GeometryError};

use crate::model::{DetectedObject, DetectedPerson};

pub const OBJECT_COLOR: Rgba<u8> = Rgba([0, 255, 255, 255]);
pub const PERSON_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Rectangle outline thickness in pixels, drawn inward from the box edge.
pub const STROKE_WIDTH: i32 = 3;

/// Labels sit this many pixels above the top edge of their box.
pub const LABEL_OFFSET: i32 = 10;

pub const DEFAULT_LABEL_SCALE: f32 = 14.0;

/// DejaVu Sans Mono, used for labels unless another font is configured.
static DEFAULT_FONT: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
    #[error("failed to read font {path}: {source}")]
    FontIo {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid font data: {0}")]
    InvalidFont(String),
}

/// Draws detections onto images. Labels use the bundled font unless another
/// one is supplied; without any font only the boxes are drawn.
#[derive(Clone)]
pub struct Annotator {
    font: Option<FontArc>,
    label_scale: f32,
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new()
    }
}

impl Annotator {
    pub fn new() -> Self {
        let font = match FontArc::try_from_slice(DEFAULT_FONT) {
            Ok(font) => Some(font),
            Err(err) => {
                warn!(%err, "bundled label font is unreadable, drawing boxes only");
                None
            }
        };
        Self {
            font,
            label_scale: DEFAULT_LABEL_SCALE,
        }
    }

    pub fn with_font(font: FontArc) -> Self {
        Self {
            font: Some(font),
            ..Self::new()
        }
    }

    /// An annotator that draws boxes only.
    pub fn without_labels() -> Self {
        Self {
            font: None,
            label_scale: DEFAULT_LABEL_SCALE,
        }
    }

    /// Load a TrueType/OpenType font for labels.
    pub fn from_font_file(path: impl AsRef<Path>) -> Result<Self, AnnotateError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| AnnotateError::FontIo {
            path: path.to_path_buf(),
            source,
        })?;
        let font = FontArc::try_from_vec(data).map_err(|e| AnnotateError::InvalidFont(e.to_string()))?;
        Ok(Self::with_font(font))
    }

    pub fn with_label_scale(mut self, label_scale: f32) -> Self {
        self.label_scale = label_scale;
        self
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Returns a copy of `image` with a cyan box and `name (confidence)` label
    /// per object. The input is left untouched.
    pub fn draw_objects(&self, image: &RgbaImage, objects: &[DetectedObject]) -> RgbaImage {
        let mut canvas = image.clone();
        self.note_missing_font(objects.len());

        for object in objects {
            if !draw_box(&mut canvas, &object.bounding_box, OBJECT_COLOR) {
                continue;
            }
            if let Some(label) = object_label(object) {
                self.draw_label(&mut canvas, &object.bounding_box, OBJECT_COLOR, &label);
            }
        }

        canvas
    }

    /// Returns a copy of `image` with a red box and confidence label per person.
    pub fn draw_people(&self, image: &RgbaImage, people: &[DetectedPerson]) -> RgbaImage {
        let mut canvas = image.clone();
        self.note_missing_font(people.len());

        for person in people {
            if !draw_box(&mut canvas, &person.bounding_box, PERSON_COLOR) {
                continue;
            }
            let label = person_label(person);
            self.draw_label(&mut canvas, &person.bounding_box, PERSON_COLOR, &label);
        }

        canvas
    }

    fn draw_label(&self, canvas: &mut RgbaImage, bbox: &BoundingBox, color: Rgba<u8>, label: &str) {
        let Some(font) = &self.font else {
            return;
        };
        let (x, y) = label_origin(bbox);
        draw_text_mut(canvas, color, x, y, self.label_scale, font, label);
    }

    fn note_missing_font(&self, detections: usize) {
        if self.font.is_none() && detections > 0 {
            debug!(detections, "labels disabled, drawing boxes only");
        }
    }
}

/// Decode uploaded image bytes into an RGBA buffer.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage, AnnotateError> {
    let image = image::load_from_memory(bytes).map_err(AnnotateError::Decode)?;
    Ok(image.to_rgba8())
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, AnnotateError> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(AnnotateError::Encode)?;
    Ok(bytes)
}

/// `name (0.87)`, just `name` without a confidence, nothing without a name.
pub fn object_label(object: &DetectedObject) -> Option<String> {
    if object.name.is_empty() {
        return None;
    }
    Some(match object.confidence {
        Some(confidence) => format!("{} ({:.2})", object.name, confidence),
        None => object.name.clone(),
    })
}

pub fn person_label(person: &DetectedPerson) -> String {
    format!("{:.2}", person.confidence)
}

/// Glyph offsets are added to the origin in i32; keeping it within half the
/// range leaves room for them without moving any label that could be visible.
const LABEL_ORIGIN_LIMIT: i32 = i32::MAX / 2;

fn label_origin(bbox: &BoundingBox) -> (i32, i32) {
    let x = bbox.x.clamp(-LABEL_ORIGIN_LIMIT, LABEL_ORIGIN_LIMIT);
    let y = bbox.y.saturating_sub(LABEL_OFFSET).clamp(-LABEL_ORIGIN_LIMIT, LABEL_ORIGIN_LIMIT);
    (x, y)
}

/// Draws the outline from `(x, y)` to `(x + width, y + height)` inclusive.
/// Returns false when the box could not be drawn.
fn draw_box(canvas: &mut RgbaImage, bbox: &BoundingBox, color: Rgba<u8>) -> bool {
    if let Err(err) = bbox.validate(canvas.width(), canvas.height()) {
        warn!(%err, "invalid detection geometry");
        if matches!(err, GeometryError::NegativeSize { .. }) {
            return false;
        }
    }

    // Edges further off-canvas than the stroke width are pulled in to just
    // beyond the border: nothing visible changes and the rect math stays in range.
    let margin = i64::from(STROKE_WIDTH);
    let max_x = i64::from(canvas.width()) + margin - 1;
    let max_y = i64::from(canvas.height()) + margin - 1;
    let left = i64::from(bbox.x).clamp(-margin, max_x);
    let right = (i64::from(bbox.x) + i64::from(bbox.width)).clamp(-margin, max_x);
    let top = i64::from(bbox.y).clamp(-margin, max_y);
    let bottom = (i64::from(bbox.y) + i64::from(bbox.height)).clamp(-margin, max_y);

    for inset in 0..margin {
        let (x0, x1) = (left + inset, right - inset);
        let (y0, y1) = (top + inset, bottom - inset);
        if x1 < x0 || y1 < y0 {
            break;
        }
        let rect = Rect::at(x0 as i32, y0 as i32).of_size((x1 - x0 + 1) as u32, (y1 - y0 + 1) as u32);
        draw_hollow_rect_mut(canvas, rect, color);
    }

    true
}
