pub mod aggregator;
pub mod aliases;
pub mod attendance;
pub mod backup;
pub mod cell_parser;
pub mod import_roster;
pub mod import_schedule;
pub mod log;
pub mod normalizer;
pub mod resolver;
