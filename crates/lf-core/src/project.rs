//! Project discovery and loading

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::model::{Model, ModelSchema, SchemaTest};
use crate::model_name::ModelName;
use crate::source::SourceFile;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Represents a Ledgerflow project
#[derive(Debug)]
pub struct Project {
    /// Project root directory
    pub root: PathBuf,

    /// Project configuration
    pub config: Config,

    /// Models discovered in the project, keyed by name
    pub models: BTreeMap<ModelName, Model>,

    /// Source definitions
    pub sources: Vec<SourceFile>,
}

impl Project {
    /// Load a project from a directory.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let root = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        if !root.exists() {
            return Err(CoreError::ProjectNotFound {
                path: root.display().to_string(),
            });
        }

        let config = Config::load_from_dir(&root)?;

        let mut models = BTreeMap::new();
        for dir in &config.model_paths {
            let dir_path = root.join(dir);
            if dir_path.exists() {
                discover_models(&dir_path, &mut models)?;
            }
        }

        let mut sources = Vec::new();
        for dir in &config.source_paths {
            let dir_path = root.join(dir);
            if dir_path.exists() {
                discover_sources(&dir_path, &mut sources)?;
            }
        }

        log::debug!(
            "Loaded project '{}': {} models, {} source files",
            config.name,
            models.len(),
            sources.len()
        );

        Ok(Self {
            root,
            config,
            models,
            sources,
        })
    }

    /// Look up a model by name.
    pub fn get_model(&self, name: &str) -> CoreResult<&Model> {
        self.models.get(name).ok_or_else(|| CoreError::ModelNotFound {
            name: name.to_string(),
        })
    }

    /// All declared constraint tests: model schemas first, then sources.
    pub fn schema_tests(&self) -> Vec<SchemaTest> {
        let mut tests: Vec<SchemaTest> = self
            .models
            .values()
            .flat_map(|m| m.schema_tests())
            .collect();
        tests.extend(self.sources.iter().flat_map(|s| s.extract_tests()));
        tests
    }

    /// Dependency map (model -> model deps) for DAG construction.
    pub fn dependency_map(
        &self,
    ) -> BTreeMap<String, std::collections::BTreeSet<String>> {
        self.models
            .iter()
            .map(|(name, model)| (name.to_string(), model.model_dependencies()))
            .collect()
    }
}

/// Recursively discover `.sql` model files (with optional sibling `.yml`).
fn discover_models(dir: &Path, models: &mut BTreeMap<ModelName, Model>) -> CoreResult<()> {
    for entry in std::fs::read_dir(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })? {
        let entry = entry.map_err(|e| CoreError::IoWithPath {
            path: dir.display().to_string(),
            source: e,
        })?;
        let path = entry.path();

        if path.is_dir() {
            discover_models(&path, models)?;
            continue;
        }

        if !path.extension().is_some_and(|e| e == "sql") {
            continue;
        }

        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let name = ModelName::try_new(stem).ok_or_else(|| CoreError::EmptyName {
            context: format!("model file {}", path.display()),
        })?;

        if models.contains_key(&name) {
            return Err(CoreError::DuplicateModel {
                name: name.to_string(),
            });
        }

        let raw_sql = std::fs::read_to_string(&path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;

        let schema = find_sibling_schema(&path)?;

        models.insert(
            name.clone(),
            Model {
                name,
                path,
                raw_sql,
                schema,
            },
        );
    }
    Ok(())
}

/// Load the 1:1 schema file next to a model SQL file, if present.
fn find_sibling_schema(sql_path: &Path) -> CoreResult<Option<ModelSchema>> {
    for ext in ["yml", "yaml"] {
        let candidate = sql_path.with_extension(ext);
        if candidate.exists() {
            return Ok(Some(ModelSchema::load(&candidate)?));
        }
    }
    Ok(None)
}

/// Recursively discover source definition YAML files.
fn discover_sources(dir: &Path, sources: &mut Vec<SourceFile>) -> CoreResult<()> {
    for entry in std::fs::read_dir(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })? {
        let entry = entry.map_err(|e| CoreError::IoWithPath {
            path: dir.display().to_string(),
            source: e,
        })?;
        let path = entry.path();

        if path.is_dir() {
            discover_sources(&path, sources)?;
            continue;
        }

        if path.extension().is_some_and(|e| e == "yml" || e == "yaml") {
            sources.push(SourceFile::load(&path)?);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "project_test.rs"]
mod tests;
