pub mod detection;
pub mod detector_error;
pub mod face_detector;
pub mod frame_source;
pub mod object_detector;
