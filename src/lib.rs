pub mod browser;
pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod output;
pub mod scoring;
pub mod stderr_buffer;
pub mod tui;
