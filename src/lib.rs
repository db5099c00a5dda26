pub mod api;
pub mod cli;
pub mod config;
pub mod console;
pub mod models;
pub mod operations;
pub mod validation;
