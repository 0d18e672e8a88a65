use std::fmt;

use thiserror::Error;

/// Which detection feed a result or failure belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DetectorKind {
    Face,
    Object,
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectorKind::Face => write!(f, "Face"),
            DetectorKind::Object => write!(f, "Object"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectorError {
    #[error("model failed to load: {0}")]
    ModelLoad(String),
    #[error("inference failed: {0}")]
    Inference(String),
}
