pub mod trace_reader;
