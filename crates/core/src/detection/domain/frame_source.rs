use crate::shared::frame::Frame;

/// Access to the most recent frame of the live video stream.
pub trait FrameSource: Send {
    /// Returns `None` while the stream has no frame ready (e.g. the camera is
    /// still starting up).
    fn current_frame(&mut self) -> Option<Frame>;
}
