pub mod logger;
pub mod timestamp;
