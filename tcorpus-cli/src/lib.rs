//! tcorpus CLI library
//!
//! This library provides the command-line interface over the tcorpus
//! segmentation, named entity recognition and part-of-speech operations.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod progress;

pub use error::{CliError, CliResult};
