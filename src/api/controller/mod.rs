pub mod cluster;
pub mod file;
