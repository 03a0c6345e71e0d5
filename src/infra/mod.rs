pub mod api;
pub mod file;
