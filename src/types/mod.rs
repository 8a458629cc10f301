pub mod bulk_measures;
pub mod field;
pub mod local_time;
pub mod station;
pub mod time_chunk;
pub mod variables;
