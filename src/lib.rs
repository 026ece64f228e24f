pub mod config;
pub mod logging;
pub mod output;
pub mod rating;
pub mod service;
