use crate::detection::domain::detector_error::DetectorKind;
use crate::monitoring::domain::event_key::{EventKey, EventTable};

/// Cross-cutting observer for engine activity.
///
/// Decouples the engine from specific diagnostic outputs (log crate, GUI,
/// tests). This is developer diagnostics; the reviewer-facing record is the
/// session `EventLog`.
pub trait MonitorLogger: Send {
    /// A frame result from `feed` was evaluated.
    fn frame(&mut self, feed: DetectorKind);

    /// A candidate was offered to the cooldown gate.
    fn candidate(&mut self, key: EventKey, fired: bool);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-session summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullMonitorLogger;

impl MonitorLogger for NullMonitorLogger {
    fn frame(&mut self, _feed: DetectorKind) {}
    fn candidate(&mut self, _key: EventKey, _fired: bool) {}
    fn info(&mut self, _message: &str) {}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyCounts {
    pub offered: usize,
    pub emitted: usize,
}

impl KeyCounts {
    pub fn suppressed(&self) -> usize {
        self.offered - self.emitted
    }
}

/// Logger that forwards to the `log` crate and keeps per-key counters for
/// an end-of-session summary.
#[derive(Default)]
pub struct StdoutMonitorLogger {
    face_frames: usize,
    object_frames: usize,
    counts: EventTable<KeyCounts>,
}

impl StdoutMonitorLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counts_for(&self, key: EventKey) -> KeyCounts {
        self.counts[key]
    }

    pub fn frames_for(&self, feed: DetectorKind) -> usize {
        match feed {
            DetectorKind::Face => self.face_frames,
            DetectorKind::Object => self.object_frames,
        }
    }

    /// Returns the formatted summary, or `None` if nothing was evaluated.
    pub fn summary_string(&self) -> Option<String> {
        if self.face_frames == 0 && self.object_frames == 0 {
            return None;
        }

        let mut lines = vec![format!(
            "Monitoring summary ({} face frames, {} object cycles):",
            self.face_frames, self.object_frames
        )];
        for (key, counts) in self.counts.iter() {
            if counts.offered == 0 {
                continue;
            }
            lines.push(format!(
                "  {:14}: offered {:6}  emitted {:4}  suppressed {:6}",
                key.as_str(),
                counts.offered,
                counts.emitted,
                counts.suppressed()
            ));
        }
        Some(lines.join("\n"))
    }
}

impl MonitorLogger for StdoutMonitorLogger {
    fn frame(&mut self, feed: DetectorKind) {
        match feed {
            DetectorKind::Face => self.face_frames += 1,
            DetectorKind::Object => self.object_frames += 1,
        }
    }

    fn candidate(&mut self, key: EventKey, fired: bool) {
        let counts = &mut self.counts[key];
        counts.offered += 1;
        if fired {
            counts.emitted += 1;
            log::info!("Event emitted: {key}");
        } else {
            log::debug!("Event suppressed by cooldown: {key}");
        }
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullMonitorLogger;
        logger.frame(DetectorKind::Face);
        logger.candidate(EventKey::Phone, true);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_counts_frames_per_feed() {
        let mut logger = StdoutMonitorLogger::new();
        logger.frame(DetectorKind::Face);
        logger.frame(DetectorKind::Face);
        logger.frame(DetectorKind::Object);
        assert_eq!(logger.frames_for(DetectorKind::Face), 2);
        assert_eq!(logger.frames_for(DetectorKind::Object), 1);
    }

    #[test]
    fn test_counts_offered_and_emitted() {
        let mut logger = StdoutMonitorLogger::new();
        logger.candidate(EventKey::NoFace, true);
        logger.candidate(EventKey::NoFace, false);
        logger.candidate(EventKey::NoFace, false);

        let counts = logger.counts_for(EventKey::NoFace);
        assert_eq!(counts.offered, 3);
        assert_eq!(counts.emitted, 1);
        assert_eq!(counts.suppressed(), 2);
        assert_eq!(logger.counts_for(EventKey::Book), KeyCounts::default());
    }

    #[test]
    fn test_empty_summary_returns_none() {
        assert!(StdoutMonitorLogger::new().summary_string().is_none());
    }

    #[test]
    fn test_summary_lists_only_offered_keys() {
        let mut logger = StdoutMonitorLogger::new();
        logger.frame(DetectorKind::Face);
        logger.candidate(EventKey::MultipleFaces, true);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Monitoring summary (1 face frames, 0 object cycles)"));
        assert!(summary.contains("multipleFaces"));
        assert!(!summary.contains("phone"));
    }

    #[test]
    fn test_info_only_forwards() {
        let mut logger = StdoutMonitorLogger::new();
        for _ in 0..1000 {
            logger.info("Monitoring started");
        }
        assert!(logger.summary_string().is_none());
    }
}
