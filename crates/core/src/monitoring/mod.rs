pub mod domain;
pub mod event_engine;
pub mod infrastructure;
pub mod monitor_logger;
pub mod monitor_settings;
