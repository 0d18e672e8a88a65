pub mod threaded_monitor;
