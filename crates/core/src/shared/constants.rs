/// Continuous absence required before a `noFace` event is offered.
pub const NO_FACE_SECONDS: u64 = 10;

/// Continuous off-center gaze required before a `lookingAway` event is offered.
pub const LOOKING_AWAY_SECONDS: u64 = 5;

/// Max normalized offset of the face center from frame center, per axis.
pub const CENTER_THRESHOLD_RATIO: f64 = 0.25;

/// Minimum confidence for an object detection to be considered.
pub const OBJECT_CONFIDENCE_THRESHOLD: f64 = 0.6;

/// Object detection runs on its own fixed timer, independent of frame ticks.
pub const OBJECT_POLL_INTERVAL_MS: u64 = 800;

pub const NO_FACE_COOLDOWN_MS: u64 = 15_000;
pub const LOOKING_AWAY_COOLDOWN_MS: u64 = 10_000;
pub const MULTIPLE_FACES_COOLDOWN_MS: u64 = 10_000;
pub const PHONE_COOLDOWN_MS: u64 = 15_000;
pub const BOOK_COOLDOWN_MS: u64 = 15_000;
pub const DEVICE_COOLDOWN_MS: u64 = 15_000;

pub const MULTIPLE_FACES_MESSAGE: &str = "Multiple faces detected";
pub const PHONE_MESSAGE: &str = "Phone detected in frame";
pub const BOOK_MESSAGE: &str = "Book or paper notes detected in frame";
pub const DEVICE_MESSAGE_PREFIX: &str = "Extra electronic device detected";

pub const MONITORING_STARTED_MESSAGE: &str = "Monitoring started";
pub const MONITORING_STOPPED_MESSAGE: &str = "Monitoring stopped";

/// Lines per page when preparing the log for document export.
pub const EXPORT_LINES_PER_PAGE: usize = 32;

pub const SETTINGS_DIR_NAME: &str = "Proctor";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
