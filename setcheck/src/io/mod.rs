//! I/O helpers: snapshot files, check files and tool configuration.

pub mod check_file;
pub mod config;
pub mod state_store;
