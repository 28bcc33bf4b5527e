//! Configuration loading and management for the grade engine.
//!
//! This module loads the engine settings (server, logging, ranking limits,
//! import batch size, pagination) and optional catalog seed data from YAML
//! files.
//!
//! # Example
//!
//! ```no_run
//! use grade_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Loaded service: {}", config.settings().service.name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    CatalogSeed, ClassesFile, CoursesFile, EngineSettings, ImportConfig, LoggingConfig,
    PaginationConfig, RankingConfig, ServerConfig, ServiceMetadata, StudentsFile,
};
