use crate::shared::frame::FrameSize;
use crate::shared::region::{BoundingBox, Region};

/// Semantic category of a single detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Face,
    Phone,
    Book,
    Laptop,
    Keyboard,
    Remote,
    Tv,
    Other,
}

impl Category {
    /// Maps a detector label onto a category. Case-insensitive.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "face" => Category::Face,
            "cell phone" | "cellphone" | "mobile phone" | "phone" => Category::Phone,
            "book" => Category::Book,
            "laptop" => Category::Laptop,
            "keyboard" => Category::Keyboard,
            "remote" => Category::Remote,
            "tv" | "tvmonitor" => Category::Tv,
            _ => Category::Other,
        }
    }
}

/// One model output for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub category: Category,
    /// Label exactly as the detector reported it.
    pub label: String,
    /// `None` when the detector omitted the bounding box.
    pub region: Option<Region>,
    pub confidence: f64,
}

impl Detection {
    pub fn face(region: Region, confidence: f64) -> Self {
        Self {
            category: Category::Face,
            label: "face".to_string(),
            region: Some(region),
            confidence,
        }
    }

    pub fn object(label: impl Into<String>, region: Region, confidence: f64) -> Self {
        let label = label.into();
        Self {
            category: Category::from_label(&label),
            label,
            region: Some(region),
            confidence,
        }
    }

    /// Normalized box, or `None` when the detection carries no usable region
    /// (missing box, malformed geometry, or unknown frame size).
    pub fn bounding_box(&self, size: FrameSize) -> Option<BoundingBox> {
        self.region.as_ref().and_then(|r| r.normalized(size))
    }

    pub fn is_usable(&self, size: FrameSize) -> bool {
        self.confidence.is_finite() && self.bounding_box(size).is_some()
    }
}

/// Detections produced for one evaluation instant.
///
/// Faces and objects come from independent feeds with their own cadence;
/// a feed that did not run at this instant is `None`, which is different
/// from a feed that ran and found nothing (`Some(vec![])`).
#[derive(Clone, Debug, PartialEq)]
pub struct FrameResult {
    pub size: FrameSize,
    pub faces: Option<Vec<Detection>>,
    pub objects: Option<Vec<Detection>>,
}

impl FrameResult {
    pub fn with_faces(size: FrameSize, faces: Vec<Detection>) -> Self {
        Self {
            size,
            faces: Some(faces),
            objects: None,
        }
    }

    pub fn with_objects(size: FrameSize, objects: Vec<Detection>) -> Self {
        Self {
            size,
            faces: None,
            objects: Some(objects),
        }
    }

    /// Number of faces the face feed reported, boxed or not. `None` when the
    /// face feed did not run.
    pub fn face_count(&self) -> Option<usize> {
        self.faces.as_ref().map(Vec::len)
    }

    /// Normalized box of the first reported face, used for gaze.
    ///
    /// `None` when there is no first face, it carries no usable box, or the
    /// frame size is unknown. Later faces never stand in for the first.
    pub fn primary_face_box(&self) -> Option<BoundingBox> {
        if self.size.is_empty() {
            return None;
        }
        self.faces
            .as_ref()
            .and_then(|faces| faces.first())
            .and_then(|face| face.bounding_box(self.size))
    }

    /// Object detections with a usable region, in detector order.
    pub fn usable_objects(&self) -> Option<Vec<&Detection>> {
        self.objects
            .as_ref()
            .map(|objs| objs.iter().filter(|d| d.is_usable(self.size)).collect())
    }
}
