use crate::detection::domain::detection::Detection;
use crate::detection::domain::detector_error::DetectorError;
use crate::shared::frame::Frame;

/// Domain interface for object detection, polled on a fixed timer
/// independent of the frame tick.
pub trait ObjectDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, DetectorError>;
}
