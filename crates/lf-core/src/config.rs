//! Configuration types and parsing for ledgerflow.yml

use crate::environment::Environment;
use crate::error::{CoreError, CoreResult};
use crate::model::Materialization;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Main project configuration from ledgerflow.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Project version
    #[serde(default = "default_version")]
    pub version: String,

    /// Directories containing model SQL files
    #[serde(default = "default_model_paths")]
    pub model_paths: Vec<String>,

    /// Directories containing source definition YAML files
    #[serde(default = "default_source_paths")]
    pub source_paths: Vec<String>,

    /// Output directory for compiled SQL artifacts
    #[serde(default = "default_target_path")]
    pub target_path: String,

    /// Default materialization for models (view or table)
    #[serde(default)]
    pub materialization: Materialization,

    /// Environment used when none is selected on the command line
    #[serde(default)]
    pub default_environment: Option<String>,

    /// Variables available in templates (environments may override)
    #[serde(default)]
    pub vars: HashMap<String, serde_yaml::Value>,

    /// Named target environments (e.g. dev, prod)
    #[serde(default)]
    pub environments: BTreeMap<String, Environment>,
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_model_paths() -> Vec<String> {
    vec!["models".to_string()]
}

fn default_source_paths() -> Vec<String> {
    vec!["sources".to_string()]
}

fn default_target_path() -> String {
    "target".to_string()
}

/// Candidate config file names, in precedence order
const CONFIG_FILENAMES: [&str; 2] = ["ledgerflow.yml", "ledgerflow.yaml"];

impl Config {
    /// Load configuration from a project directory.
    pub fn load_from_dir(root: &Path) -> CoreResult<Self> {
        let path = Self::find_config_file(root)?;
        Self::load(&path)
    }

    /// Load configuration from an explicit file path.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                message: format!("{}: {}", path.display(), e),
            })?;
        config.validate()?;
        Ok(config)
    }

    fn find_config_file(root: &Path) -> CoreResult<PathBuf> {
        for name in CONFIG_FILENAMES {
            let candidate = root.join(name);
            if candidate.exists() {
                return Ok(candidate);
            }
        }
        Err(CoreError::ConfigNotFound {
            path: root.join(CONFIG_FILENAMES[0]).display().to_string(),
        })
    }

    fn validate(&self) -> CoreResult<()> {
        if self.name.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "project name must not be empty".to_string(),
            });
        }
        if let Some(default) = &self.default_environment {
            if !self.environments.contains_key(default) {
                return Err(CoreError::ConfigInvalid {
                    message: format!(
                        "default_environment '{}' is not declared under environments",
                        default
                    ),
                });
            }
        }
        Ok(())
    }

    /// Resolve a named environment (or the configured default).
    ///
    /// The returned environment carries its name and the project vars
    /// merged under its own (environment vars win).
    pub fn environment(&self, name: Option<&str>) -> CoreResult<Environment> {
        let name = match name {
            Some(n) => n,
            None => self
                .default_environment
                .as_deref()
                .or_else(|| self.environments.keys().next().map(|k| k.as_str()))
                .ok_or_else(|| CoreError::ConfigInvalid {
                    message: "no environments declared in ledgerflow.yml".to_string(),
                })?,
        };

        let mut env = self
            .environments
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::UnknownEnvironment {
                name: name.to_string(),
            })?;
        env.name = name.to_string();

        let mut vars = self.vars.clone();
        vars.extend(env.vars.clone());
        env.vars = vars;

        Ok(env)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
