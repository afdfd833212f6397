use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Axis-aligned box in source-image pixel coordinates, origin top-left.
///
/// The service reports geometry as `{x, y, w, h}`; the short names are
/// accepted on input and the long ones are used on output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    #[serde(alias = "w")]
    pub width: i32,
    #[serde(alias = "h")]
    pub height: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("negative size {width}x{height}")]
    NegativeSize { width: i32, height: i32 },
    #[error("box {bbox} exceeds image bounds {image_width}x{image_height}")]
    OutOfBounds {
        bbox: BoundingBox,
        image_width: u32,
        image_height: u32,
    },
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Checks the box against an image of the given size. The right and
    /// bottom edges may touch the image border but not pass it.
    pub fn validate(&self, image_width: u32, image_height: u32) -> Result<(), GeometryError> {
        if self.width < 0 || self.height < 0 {
            return Err(GeometryError::NegativeSize {
                width: self.width,
                height: self.height,
            });
        }

        let inside = self.x >= 0
            && self.y >= 0
            && i64::from(self.right()) <= i64::from(image_width)
            && i64::from(self.bottom()) <= i64::from(image_height);
        if !inside {
            return Err(GeometryError::OutOfBounds {
                bbox: *self,
                image_width,
                image_height,
            });
        }

        Ok(())
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{x: {}, y: {}, w: {}, h: {}}}",
            self.x, self.y, self.width, self.height
        )
    }
}
