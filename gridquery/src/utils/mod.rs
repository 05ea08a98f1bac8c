pub mod file;
pub mod pattern;
pub mod time;
