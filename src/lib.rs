//! Resume analyzer library

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod input;
pub mod output;

pub use error::{Result, ResumeAnalyzerError};
pub use config::Config;
