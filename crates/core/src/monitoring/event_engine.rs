use crate::detection::domain::detection::{Detection, FrameResult};
use crate::detection::domain::detector_error::{DetectorError, DetectorKind};
use crate::monitoring::domain::candidate::Candidate;
use crate::monitoring::domain::cooldown_gate::CooldownGate;
use crate::monitoring::domain::event_log::{EventLog, LogEntry};
use crate::monitoring::domain::object_classifier::ObjectClassifier;
use crate::monitoring::domain::presence_tracker::PresenceTracker;
use crate::monitoring::monitor_logger::MonitorLogger;
use crate::monitoring::monitor_settings::MonitorSettings;
use crate::shared::clock::Clock;
use crate::shared::constants::{MONITORING_STARTED_MESSAGE, MONITORING_STOPPED_MESSAGE};
use crate::shared::frame::FrameSize;

/// Turns detection results into de-duplicated, cooldown-gated log entries.
///
/// Each result runs through a fixed pipeline:
/// condition detectors (multiplicity, presence, objects) → cooldown gate →
/// session log. The engine is the single writer of the gate and the log;
/// concurrent feeds must be serialized before they reach it.
///
/// Results are only evaluated between `start` and `stop`; anything arriving
/// outside that window is dropped.
pub struct EventEngine {
    presence: PresenceTracker,
    classifier: ObjectClassifier,
    gate: CooldownGate,
    log: EventLog,
    clock: Box<dyn Clock>,
    logger: Box<dyn MonitorLogger>,
    active: bool,
    face_failing: bool,
    object_failing: bool,
}

impl EventEngine {
    pub fn new(
        settings: &MonitorSettings,
        clock: Box<dyn Clock>,
        logger: Box<dyn MonitorLogger>,
    ) -> Self {
        Self {
            presence: PresenceTracker::new(settings.presence_config()),
            classifier: ObjectClassifier::new(settings.object_confidence),
            gate: CooldownGate::new(settings.cooldowns.to_table()),
            log: EventLog::new(),
            clock,
            logger,
            active: false,
            face_failing: false,
            object_failing: false,
        }
    }

    /// Begins a monitoring session with fresh presence and cooldown state.
    /// The log is kept across sessions.
    pub fn start(&mut self) {
        if self.active {
            return;
        }
        self.presence.reset();
        self.gate.reset();
        self.face_failing = false;
        self.object_failing = false;
        self.active = true;
        self.add_log(MONITORING_STARTED_MESSAGE);
        self.logger.info("Monitoring started");
    }

    /// Ends the session: clears both presence sub-machines and stops
    /// accepting results.
    pub fn stop(&mut self) {
        if !self.active {
            return;
        }
        self.presence.reset();
        self.active = false;
        self.add_log(MONITORING_STOPPED_MESSAGE);
        self.logger.info("Monitoring stopped");
        self.logger.summary();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Evaluates one frame result and returns how many entries were emitted.
    pub fn evaluate_frame(&mut self, frame: &FrameResult) -> usize {
        if !self.active {
            log::debug!("Dropping frame result received while monitoring is stopped");
            return 0;
        }
        let now = self.clock.now();
        let mut candidates: Vec<Candidate> = Vec::new();

        // Presence and multiplicity count every reported face; only gaze
        // needs a box.
        if let Some(count) = frame.face_count() {
            self.face_failing = false;
            self.logger.frame(DetectorKind::Face);
            let primary = frame.primary_face_box();
            candidates.extend(self.classifier.classify_faces(count));
            candidates.extend(self.presence.evaluate(count, primary.as_ref(), now));
        }

        if let Some(objects) = frame.usable_objects() {
            self.object_failing = false;
            self.logger.frame(DetectorKind::Object);
            candidates.extend(self.classifier.classify_objects(&objects));
        }

        let timestamp = self.clock.timestamp();
        let mut emitted = 0;
        for candidate in candidates {
            let fired = self.gate.offer(candidate.key, now);
            self.logger.candidate(candidate.key, fired);
            if !fired {
                continue;
            }
            match self
                .log
                .emit_event(candidate.key, &candidate.message, &timestamp)
            {
                Ok(_) => emitted += 1,
                Err(e) => log::warn!("Dropped {} event: {e}", candidate.key),
            }
        }
        emitted
    }

    /// Routes a detector outcome: results are evaluated, failures reported.
    pub fn handle_result(
        &mut self,
        kind: DetectorKind,
        size: FrameSize,
        result: Result<Vec<Detection>, DetectorError>,
    ) -> usize {
        match result {
            Ok(detections) => {
                let frame = match kind {
                    DetectorKind::Face => FrameResult::with_faces(size, detections),
                    DetectorKind::Object => FrameResult::with_objects(size, detections),
                };
                self.evaluate_frame(&frame)
            }
            Err(e) => {
                self.report_detector_failure(kind, &e);
                0
            }
        }
    }

    /// Records a detector failure once per run of consecutive failures of
    /// that detector. The engine keeps going; the next successful result
    /// re-arms reporting.
    pub fn report_detector_failure(&mut self, kind: DetectorKind, error: &DetectorError) {
        if !self.active {
            return;
        }
        let failing = match kind {
            DetectorKind::Face => &mut self.face_failing,
            DetectorKind::Object => &mut self.object_failing,
        };
        if *failing {
            log::debug!("{kind} detection still failing: {error}");
            return;
        }
        *failing = true;
        log::warn!("{kind} detection model failed: {error}");
        self.add_log(&format!("{kind} detection model failed: {error}"));
    }

    /// Appends a status snapshot line.
    pub fn report_status(&mut self, face_ready: bool, object_ready: bool) {
        let line = format!(
            "Detection state: monitoring={}, faceDetector={face_ready}, objectModel={object_ready}",
            self.active
        );
        self.add_log(&line);
    }

    /// The sole mutation entry point for informational entries; stamps the
    /// message with the clock's human-readable timestamp.
    pub fn add_log(&mut self, message: &str) -> Option<&LogEntry> {
        let timestamp = self.clock.timestamp();
        match self.log.emit(message, &timestamp) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Dropped log entry: {e}");
                None
            }
        }
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn into_log(self) -> EventLog {
        self.log
    }

    pub fn presence(&self) -> &PresenceTracker {
        &self.presence
    }
}
