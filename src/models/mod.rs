pub mod attendance;
pub mod gender;
pub mod report;
pub mod roster;
pub mod schedule;
pub mod section_letter;
pub mod summary;
pub mod weekday;
