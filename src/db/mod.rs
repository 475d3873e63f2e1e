pub mod alerts;
pub mod assignments;
pub mod attendance;
pub mod initialize;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod reference;
pub mod stats;
pub mod students;
pub mod summaries;
