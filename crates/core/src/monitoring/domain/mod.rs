pub mod candidate;
pub mod cooldown_gate;
pub mod event_key;
pub mod event_log;
pub mod object_classifier;
pub mod presence_tracker;
