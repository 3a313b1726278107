// Export our modules for use in the binary and tests
pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod db;
pub mod event;
pub mod logging;
pub mod scan;
pub mod terminal;
pub mod ui;
