use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::detection::domain::detection::{Category, Detection};
use crate::detection::domain::detector_error::{DetectorError, DetectorKind};
use crate::shared::frame::FrameSize;
use crate::shared::region::{BoundingBox, PixelBox, Region};

#[derive(Error, Debug)]
pub enum TraceError {
    #[error("failed to read trace {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: &'static str },
}

/// One recorded detector outcome.
#[derive(Clone, Debug, PartialEq)]
pub struct TraceEvent {
    /// Offset from the start of the recording.
    pub at: Duration,
    pub size: FrameSize,
    pub kind: DetectorKind,
    pub result: Result<Vec<Detection>, DetectorError>,
}

/// A line of a JSON Lines detection trace. Exactly one of `faces`,
/// `objects`, or `error` must be present.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TraceLine {
    t_ms: u64,
    width: u32,
    height: u32,
    #[serde(default)]
    faces: Option<Vec<FaceRecord>>,
    #[serde(default)]
    objects: Option<Vec<ObjectRecord>>,
    #[serde(default)]
    error: Option<FailureRecord>,
}

/// Face detector output: normalized center-based box.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FaceRecord {
    #[serde(default)]
    bounding_box: Option<BoundingBox>,
    #[serde(default)]
    score: Option<f64>,
}

/// Object detector output: label, confidence and pixel `[x, y, w, h]` box.
#[derive(Deserialize)]
struct ObjectRecord {
    class: String,
    score: f64,
    #[serde(default)]
    bbox: Option<[f64; 4]>,
}

#[derive(Deserialize)]
struct FailureRecord {
    detector: FailedDetector,
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum FailedDetector {
    Face,
    Object,
}

/// Reads a detection trace file.
pub fn read_trace(path: &Path) -> Result<Vec<TraceEvent>, TraceError> {
    let file = File::open(path).map_err(|source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_trace(BufReader::new(file)).map_err(|e| match e {
        TraceError::Io { source, .. } => TraceError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// Parses JSON Lines trace content. Blank lines and lines starting with `#`
/// are skipped.
pub fn parse_trace(reader: impl BufRead) -> Result<Vec<TraceEvent>, TraceError> {
    let mut events = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|source| TraceError::Io {
            path: PathBuf::new(),
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let record: TraceLine =
            serde_json::from_str(trimmed).map_err(|source| TraceError::Parse {
                line: line_no,
                source,
            })?;
        events.push(to_event(record, line_no)?);
    }
    log::debug!("Parsed {} trace events", events.len());
    Ok(events)
}

fn to_event(record: TraceLine, line: usize) -> Result<TraceEvent, TraceError> {
    let at = Duration::from_millis(record.t_ms);
    let size = FrameSize::new(record.width, record.height);

    let (kind, result) = match (record.faces, record.objects, record.error) {
        (Some(faces), None, None) => (
            DetectorKind::Face,
            Ok(faces.into_iter().map(face_detection).collect()),
        ),
        (None, Some(objects), None) => (
            DetectorKind::Object,
            Ok(objects.into_iter().map(object_detection).collect()),
        ),
        (None, None, Some(failure)) => {
            let kind = match failure.detector {
                FailedDetector::Face => DetectorKind::Face,
                FailedDetector::Object => DetectorKind::Object,
            };
            (kind, Err(DetectorError::Inference(failure.message)))
        }
        (None, None, None) => {
            return Err(TraceError::Malformed {
                line,
                reason: "expected one of faces, objects or error",
            })
        }
        _ => {
            return Err(TraceError::Malformed {
                line,
                reason: "only one of faces, objects or error is allowed per line",
            })
        }
    };

    Ok(TraceEvent {
        at,
        size,
        kind,
        result,
    })
}

fn face_detection(record: FaceRecord) -> Detection {
    Detection {
        category: Category::Face,
        label: "face".to_string(),
        region: record.bounding_box.map(Region::Normalized),
        confidence: record.score.unwrap_or(0.0),
    }
}

fn object_detection(record: ObjectRecord) -> Detection {
    Detection {
        category: Category::from_label(&record.class),
        region: record
            .bbox
            .map(|[x, y, w, h]| Region::Pixel(PixelBox::new(x, y, w, h))),
        label: record.class,
        confidence: record.score,
    }
}
