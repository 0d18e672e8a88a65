use crate::detection::domain::detection::Detection;
use crate::detection::domain::detector_error::DetectorError;
use crate::shared::frame::Frame;

/// Domain interface for face detection, invoked once per captured frame.
///
/// Implementations may be stateful (e.g., a model session kept warm across
/// frames), hence `&mut self`.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, DetectorError>;
}
