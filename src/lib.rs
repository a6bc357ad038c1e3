pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod notice;
pub mod storage;
pub mod store;
pub mod syllabus;

#[cfg(feature = "tui")]
pub mod tui;
