use thiserror::Error;

use crate::monitoring::domain::event_key::EventKey;
use crate::shared::constants::{MONITORING_STARTED_MESSAGE, MONITORING_STOPPED_MESSAGE};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventLogError {
    #[error("log message must not be empty")]
    EmptyMessage,
}

/// How prominently a reviewing surface should render an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Caution,
    Warning,
    Alert,
}

impl Severity {
    pub fn for_key(key: Option<EventKey>) -> Self {
        match key {
            Some(EventKey::NoFace) => Severity::Alert,
            Some(EventKey::MultipleFaces) => Severity::Warning,
            Some(EventKey::LookingAway) => Severity::Caution,
            _ => Severity::Info,
        }
    }
}

/// One immutable line of the session log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    message: String,
    timestamp: String,
    key: Option<EventKey>,
}

impl LogEntry {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// The event class that produced this entry, `None` for informational
    /// entries (session lifecycle, detector failures, status).
    pub fn key(&self) -> Option<EventKey> {
        self.key
    }

    pub fn severity(&self) -> Severity {
        Severity::for_key(self.key)
    }

    pub fn is_lifecycle(&self) -> bool {
        self.message == MONITORING_STARTED_MESSAGE || self.message == MONITORING_STOPPED_MESSAGE
    }

    /// `<timestamp> - <message>`
    pub fn display_line(&self) -> String {
        format!("{} - {}", self.timestamp, self.message)
    }
}

/// Ordered, append-only session log. Insertion order is display and export
/// order; entries cannot be modified or removed once appended.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    entries: Vec<LogEntry>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, message: &str, timestamp: &str) -> Result<&LogEntry, EventLogError> {
        self.append(message, timestamp, None)
    }

    pub fn emit_event(
        &mut self,
        key: EventKey,
        message: &str,
        timestamp: &str,
    ) -> Result<&LogEntry, EventLogError> {
        self.append(message, timestamp, Some(key))
    }

    fn append(
        &mut self,
        message: &str,
        timestamp: &str,
        key: Option<EventKey>,
    ) -> Result<&LogEntry, EventLogError> {
        if message.trim().is_empty() {
            return Err(EventLogError::EmptyMessage);
        }
        self.entries.push(LogEntry {
            message: message.to_string(),
            timestamp: timestamp.to_string(),
            key,
        });
        Ok(&self.entries[self.entries.len() - 1])
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count_of(&self, key: EventKey) -> usize {
        self.entries.iter().filter(|e| e.key == Some(key)).count()
    }

    /// Renders the log as pages of display lines for a document export.
    ///
    /// The first page opens with an `Event Logs` title line that counts
    /// toward its line budget. An empty log produces no pages.
    pub fn export_pages(&self, lines_per_page: usize) -> Vec<Vec<String>> {
        if self.entries.is_empty() {
            return Vec::new();
        }
        let per_page = lines_per_page.max(2);
        let mut pages = vec![vec!["Event Logs".to_string()]];
        for entry in &self.entries {
            let full = pages.last().is_some_and(|p| p.len() >= per_page);
            if full {
                pages.push(Vec::with_capacity(per_page));
            }
            if let Some(page) = pages.last_mut() {
                page.push(entry.display_line());
            }
        }
        pages
    }
}
