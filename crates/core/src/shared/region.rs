use serde::{Deserialize, Serialize};

use crate::shared::frame::FrameSize;

/// Bounding box in normalized frame coordinates, center-based.
///
/// All coordinates are fractions of the frame dimension on their own axis,
/// so `(0.5, 0.5)` is the frame center regardless of aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x_center: f64, y_center: f64, width: f64, height: f64) -> Self {
        Self {
            x_center,
            y_center,
            width,
            height,
        }
    }

    /// Offset of the box center from the frame center, per axis, in
    /// normalized units.
    pub fn center_offset(&self) -> (f64, f64) {
        (self.x_center - 0.5, self.y_center - 0.5)
    }

    pub fn is_finite(&self) -> bool {
        self.x_center.is_finite()
            && self.y_center.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }
}

/// Bounding box in pixel coordinates, top-left based, as reported by
/// object detectors: `[x, y, width, height]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Converts to normalized center form. Returns `None` when the frame has
    /// no usable dimensions.
    pub fn normalize(&self, size: FrameSize) -> Option<BoundingBox> {
        if size.is_empty() {
            return None;
        }
        let fw = size.width as f64;
        let fh = size.height as f64;
        Some(BoundingBox {
            x_center: (self.x + self.width / 2.0) / fw,
            y_center: (self.y + self.height / 2.0) / fh,
            width: self.width / fw,
            height: self.height / fh,
        })
    }
}

/// Detection region in either of the two forms detectors produce.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Region {
    Normalized(BoundingBox),
    Pixel(PixelBox),
}

impl Region {
    /// Normalizes into the shared coordinate space.
    ///
    /// Non-finite geometry yields `None` and the detection is treated as
    /// having no usable region.
    pub fn normalized(&self, size: FrameSize) -> Option<BoundingBox> {
        let bbox = match self {
            Region::Normalized(b) => Some(*b),
            Region::Pixel(p) => p.normalize(size),
        }?;
        bbox.is_finite().then_some(bbox)
    }
}
