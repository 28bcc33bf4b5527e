//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine settings
//! and catalog seed data from YAML files.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{EngineError, EngineResult};

use super::types::{CatalogSeed, ClassesFile, CoursesFile, EngineSettings, StudentsFile};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── engine.yaml          # Service metadata, server, rankings, import, logging
/// └── catalog/             # Optional seed data
///     ├── courses.yaml
///     ├── classes.yaml
///     └── students.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use grade_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default")?;
/// println!("Loaded service: {}", loader.settings().service.name);
/// println!("Seed courses: {}", loader.catalog().courses.len());
/// # Ok::<(), grade_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    settings: EngineSettings,
    catalog: CatalogSeed,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - `engine.yaml` is missing (`ConfigNotFound`)
    /// - any present file contains invalid YAML (`ConfigParseError`)
    ///
    /// Missing catalog files are treated as empty.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<EngineSettings>(&path.join("engine.yaml"))?;

        let catalog_dir = path.join("catalog");
        let courses = Self::load_optional_yaml::<CoursesFile>(&catalog_dir.join("courses.yaml"))?;
        let classes = Self::load_optional_yaml::<ClassesFile>(&catalog_dir.join("classes.yaml"))?;
        let students =
            Self::load_optional_yaml::<StudentsFile>(&catalog_dir.join("students.yaml"))?;

        Ok(Self {
            settings,
            catalog: CatalogSeed {
                courses: courses.courses,
                classes: classes.classes,
                students: students.students,
            },
        })
    }

    /// Builds a loader from in-memory settings with an empty catalog.
    pub fn from_settings(settings: EngineSettings) -> Self {
        Self {
            settings,
            catalog: CatalogSeed::default(),
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads a YAML file, falling back to the type's default when it does not exist.
    fn load_optional_yaml<T: DeserializeOwned + Default>(path: &Path) -> EngineResult<T> {
        if !path.exists() {
            return Ok(T::default());
        }
        Self::load_yaml(path)
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns the catalog seed data.
    pub fn catalog(&self) -> &CatalogSeed {
        &self.catalog
    }
}
