//! s3seed-core - Core library for the s3seed CLI
//!
//! Provisions an S3 bucket and fills it with small random text files,
//! removing the local copies as it goes.

pub mod client;
pub mod config;
pub mod content;
pub mod error;
pub mod seeder;

// Re-export commonly used types
pub use client::{ObjectStore, S3Store};
pub use config::{get_config_path, load_config, validate_config};
pub use config::{ConfigFile, LoggingConfig, S3Config, SeedConfig};
pub use content::{file_name, parse_file_count, random_content};
pub use error::{Error, Result};
pub use seeder::{SeedEvent, SeedPlan, SeedReport, Seeder};
