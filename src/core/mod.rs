pub mod backup;
pub mod log;
pub mod report;
pub mod reset;
