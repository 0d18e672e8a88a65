use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::detection::domain::detection::Detection;
use crate::detection::domain::detector_error::{DetectorError, DetectorKind};
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::frame_source::FrameSource;
use crate::detection::domain::object_detector::ObjectDetector;
use crate::monitoring::domain::event_log::{EventLog, LogEntry};
use crate::monitoring::event_engine::EventEngine;
use crate::shared::frame::{Frame, FrameSize};

/// Entries buffered for `MonitorHandle::events` before new ones are dropped.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Messages serialized into the engine thread.
enum MonitorInput {
    Detections {
        kind: DetectorKind,
        size: FrameSize,
        result: Result<Vec<Detection>, DetectorError>,
    },
    Status {
        face_ready: bool,
        object_ready: bool,
    },
    Log(String),
    Stop,
}

/// Runs the two detection feeds against one engine.
///
/// Layout: `capture callback ─┐`
///         `object poll (tick) ┴→ engine thread → events`
///
/// The engine thread is the only writer of the cooldown table and session
/// log, so the gate's check-and-set stays atomic per key without locks.
pub struct ThreadedMonitor;

impl ThreadedMonitor {
    pub fn spawn(
        engine: EventEngine,
        object_detector: Box<dyn ObjectDetector>,
        frame_source: Box<dyn FrameSource>,
        poll_interval: Duration,
    ) -> MonitorHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let (input_tx, input_rx) = crossbeam_channel::unbounded::<MonitorInput>();
        let (events_tx, events_rx) = crossbeam_channel::bounded::<LogEntry>(EVENT_CHANNEL_CAPACITY);
        let (stop_poll_tx, stop_poll_rx) = crossbeam_channel::bounded::<()>(0);

        let engine_thread = spawn_engine(engine, input_rx, events_tx, cancelled.clone());
        let poll_thread = spawn_object_poll(
            object_detector,
            frame_source,
            poll_interval,
            input_tx.clone(),
            stop_poll_rx,
            cancelled.clone(),
        );

        MonitorHandle {
            input_tx,
            events_rx,
            cancelled,
            stop_poll_tx: Some(stop_poll_tx),
            engine_thread,
            poll_thread,
        }
    }
}

/// Control surface for a running monitor.
pub struct MonitorHandle {
    input_tx: Sender<MonitorInput>,
    events_rx: Receiver<LogEntry>,
    cancelled: Arc<AtomicBool>,
    stop_poll_tx: Option<Sender<()>>,
    engine_thread: JoinHandle<EventEngine>,
    poll_thread: JoinHandle<()>,
}

impl MonitorHandle {
    /// Entries as they are appended to the session log.
    ///
    /// This is a bounded live feed: once it holds `EVENT_CHANNEL_CAPACITY`
    /// undrained entries, newer ones are skipped here. The log returned by
    /// `stop` is always complete.
    pub fn events(&self) -> &Receiver<LogEntry> {
        &self.events_rx
    }

    /// Face-detection callback entry point.
    pub fn submit_faces(&self, size: FrameSize, result: Result<Vec<Detection>, DetectorError>) {
        self.send(MonitorInput::Detections {
            kind: DetectorKind::Face,
            size,
            result,
        });
    }

    /// Runs `detector` on `frame` in the caller's thread and submits the
    /// outcome, for capture pipelines that own their face detector.
    pub fn process_face_frame(&self, detector: &mut dyn FaceDetector, frame: &Frame) {
        if self.is_cancelled() {
            return;
        }
        let result = detector.detect(frame);
        self.submit_faces(frame.size(), result);
    }

    pub fn report_status(&self, face_ready: bool, object_ready: bool) {
        self.send(MonitorInput::Status {
            face_ready,
            object_ready,
        });
    }

    pub fn add_log(&self, message: impl Into<String>) {
        self.send(MonitorInput::Log(message.into()));
    }

    /// Marks the monitor as stopped without waiting. Results still in
    /// flight are dropped from here on.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Cancels, stops the engine, and returns the final session log.
    ///
    /// Does not wait for an object inference that is still running; its
    /// result is discarded when it resolves.
    pub fn stop(mut self) -> Result<EventLog, Box<dyn std::error::Error>> {
        self.cancel();
        self.input_tx
            .send(MonitorInput::Stop)
            .map_err(|_| "Engine thread exited unexpectedly")?;
        let engine = self
            .engine_thread
            .join()
            .map_err(|_| "Engine thread panicked")?;

        // Dropping the sender wakes the poll thread's select immediately.
        drop(self.stop_poll_tx.take());
        if self.poll_thread.is_finished() {
            self.poll_thread
                .join()
                .map_err(|_| "Object poll thread panicked")?;
        } else {
            log::debug!("Object poll thread still busy; detaching");
        }
        Ok(engine.into_log())
    }

    fn send(&self, input: MonitorInput) {
        if self.is_cancelled() {
            return;
        }
        if self.input_tx.send(input).is_err() {
            log::warn!("Monitor input dropped: engine thread is gone");
        }
    }
}

fn spawn_engine(
    mut engine: EventEngine,
    input_rx: Receiver<MonitorInput>,
    events_tx: Sender<LogEntry>,
    cancelled: Arc<AtomicBool>,
) -> JoinHandle<EventEngine> {
    thread::spawn(move || {
        let mut published = 0;
        engine.start();
        publish(&engine, &events_tx, &mut published);

        for input in input_rx {
            match input {
                MonitorInput::Stop => break,
                // Detections still queued at cancellation are late; log and
                // status inputs were accepted before it and are kept.
                MonitorInput::Detections { .. } if cancelled.load(Ordering::SeqCst) => {
                    log::debug!("Dropping detection result received after cancellation");
                }
                MonitorInput::Detections { kind, size, result } => {
                    engine.handle_result(kind, size, result);
                }
                MonitorInput::Status {
                    face_ready,
                    object_ready,
                } => engine.report_status(face_ready, object_ready),
                MonitorInput::Log(message) => {
                    engine.add_log(&message);
                }
            }
            publish(&engine, &events_tx, &mut published);
        }

        engine.stop();
        publish(&engine, &events_tx, &mut published);
        engine
    })
}

fn publish(engine: &EventEngine, events_tx: &Sender<LogEntry>, published: &mut usize) {
    for entry in &engine.log().entries()[*published..] {
        if let Err(TrySendError::Full(_)) = events_tx.try_send(entry.clone()) {
            log::debug!("Event feed full; entry kept only in the session log");
        }
    }
    *published = engine.log().len();
}

fn spawn_object_poll(
    mut detector: Box<dyn ObjectDetector>,
    mut frame_source: Box<dyn FrameSource>,
    poll_interval: Duration,
    input_tx: Sender<MonitorInput>,
    stop_rx: Receiver<()>,
    cancelled: Arc<AtomicBool>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let ticker = crossbeam_channel::tick(poll_interval);
        loop {
            crossbeam_channel::select! {
                recv(stop_rx) -> _ => break,
                recv(ticker) -> _ => {}
            }
            if cancelled.load(Ordering::SeqCst) {
                break;
            }

            let Some(frame) = frame_source.current_frame() else {
                continue;
            };
            let result = detector.detect(&frame);

            if cancelled.load(Ordering::SeqCst) {
                log::debug!("Discarding object detection that resolved after stop");
                break;
            }
            let input = MonitorInput::Detections {
                kind: DetectorKind::Object,
                size: frame.size(),
                result,
            };
            if input_tx.send(input).is_err() {
                break;
            }
        }
    })
}
