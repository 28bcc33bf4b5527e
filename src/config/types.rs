//! Configuration types for the grade engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use serde::Deserialize;

use crate::models::{NewClassSection, NewCourse, NewStudent};

/// Metadata about the running service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceMetadata {
    /// The service name reported in the startup log.
    pub name: String,
    /// The configuration version.
    pub version: String,
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `127.0.0.1:3000`.
    pub bind_address: String,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter directive, overridden by `RUST_LOG`.
    pub filter: String,
}

/// Ranking and dashboard limits.
#[derive(Debug, Clone, Deserialize)]
pub struct RankingConfig {
    /// Number of entries kept by the top-N rankings.
    pub limit: usize,
    /// Display name used for ranked students missing from the catalog.
    pub unknown_student_name: String,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            limit: 5,
            unknown_student_name: "Unknown".to_string(),
        }
    }
}

/// Bulk import settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    /// Number of valid rows written per repository batch.
    pub batch_size: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self { batch_size: 1000 }
    }
}

/// Listing pagination settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    /// Page size used when a request does not give one.
    pub default_limit: usize,
    /// Largest page size a request may ask for.
    pub max_limit: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

/// The `engine.yaml` file structure.
///
/// Only `service` is required; every other section falls back to its
/// default when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    /// Service metadata.
    pub service: ServiceMetadata,
    /// HTTP server settings.
    #[serde(default)]
    pub server: Option<ServerConfig>,
    /// Logging settings.
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
    /// Ranking limits.
    #[serde(default)]
    pub rankings: RankingConfig,
    /// Bulk import settings.
    #[serde(default)]
    pub import: ImportConfig,
    /// Pagination settings.
    #[serde(default)]
    pub pagination: PaginationConfig,
}

impl EngineSettings {
    /// Settings with default limits, for embedding the engine without a
    /// configuration directory.
    pub fn with_defaults(name: impl Into<String>) -> Self {
        Self {
            service: ServiceMetadata {
                name: name.into(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            server: None,
            logging: None,
            rankings: RankingConfig::default(),
            import: ImportConfig::default(),
            pagination: PaginationConfig::default(),
        }
    }
}

/// `catalog/courses.yaml` structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoursesFile {
    /// Seed courses.
    #[serde(default)]
    pub courses: Vec<NewCourse>,
}

/// `catalog/classes.yaml` structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassesFile {
    /// Seed class sections.
    #[serde(default)]
    pub classes: Vec<NewClassSection>,
}

/// `catalog/students.yaml` structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentsFile {
    /// Seed students.
    #[serde(default)]
    pub students: Vec<NewStudent>,
}

/// Catalog entries to seed a fresh store with.
#[derive(Debug, Clone, Default)]
pub struct CatalogSeed {
    /// Seed courses.
    pub courses: Vec<NewCourse>,
    /// Seed class sections.
    pub classes: Vec<NewClassSection>,
    /// Seed students.
    pub students: Vec<NewStudent>,
}

impl CatalogSeed {
    /// Returns true if the seed holds no entries.
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty() && self.classes.is_empty() && self.students.is_empty()
    }
}
