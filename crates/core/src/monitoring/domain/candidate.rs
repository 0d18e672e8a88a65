use crate::monitoring::domain::event_key::EventKey;

/// A detected condition that has not yet passed the cooldown gate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub key: EventKey,
    pub message: String,
}

impl Candidate {
    pub fn new(key: EventKey, message: impl Into<String>) -> Self {
        Self {
            key,
            message: message.into(),
        }
    }
}
