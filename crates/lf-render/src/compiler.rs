//! Model compilation: raw templates to validated, executable SQL.
//!
//! Compilation is environment-scoped and deterministic: the same project
//! and environment always produce byte-identical artifacts. A model that
//! fails to compile takes its transitive dependents with it; models on
//! unrelated DAG branches still compile.

use crate::dialect::{dialect_for, SqlDialect};
use crate::error::{RenderError, RenderResult};
use crate::renderer::Renderer;
use lf_core::{Catalog, Environment, Materialization, Model, ModelDag, Project, Relation};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One model compiled for a specific environment.
#[derive(Debug, Clone)]
pub struct CompiledModel {
    /// Model name
    pub name: String,

    /// Relation the model materializes to
    pub relation: Relation,

    /// Dialect-rendered qualified relation, ready to splice into DDL
    pub relation_sql: String,

    /// Dialect-rendered qualified schema (`database.schema`) for DDL
    pub schema_sql: String,

    /// Executable SQL body with every reference resolved
    pub sql: String,

    /// How the model materializes
    pub materialization: Materialization,

    /// Direct model dependencies, sorted
    pub depends_on: Vec<String>,
}

/// Result of compiling a whole project against one environment.
#[derive(Debug)]
pub struct CompileOutput {
    /// Environment the output was compiled for
    pub environment: String,

    /// Topological execution order over all project models
    pub order: Vec<String>,

    /// Successfully compiled models, keyed by name
    pub models: BTreeMap<String, CompiledModel>,

    /// Models that failed to compile, with the reason
    pub failures: BTreeMap<String, RenderError>,

    /// Models skipped because an ancestor failed (value = failing ancestor)
    pub skipped: BTreeMap<String, String>,

    /// Resolution map (object name -> dialect-rendered relation) covering
    /// models and source tables; used downstream for test generation
    pub resolutions: BTreeMap<String, String>,

    /// Dependency graph over the project's models
    pub dag: ModelDag,
}

impl CompileOutput {
    /// True when every model compiled.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.skipped.is_empty()
    }
}

/// Compiles a project's models for one target environment.
pub struct Compiler<'a> {
    project: &'a Project,
    env: &'a Environment,
    dialect: Box<dyn SqlDialect>,
}

impl<'a> Compiler<'a> {
    /// Create a compiler bound to an environment's dialect.
    pub fn new(project: &'a Project, env: &'a Environment) -> Self {
        Self {
            project,
            env,
            dialect: dialect_for(env.dialect),
        }
    }

    /// The dialect strategy in use.
    pub fn dialect(&self) -> &dyn SqlDialect {
        self.dialect.as_ref()
    }

    /// Compile every model in the project.
    ///
    /// A dependency cycle fails the whole compilation with no output. Any
    /// other per-model failure is recorded and its descendants are skipped,
    /// while independent branches continue.
    pub fn compile(&self) -> RenderResult<CompileOutput> {
        let dag = ModelDag::build(&self.project.dependency_map())?;
        let order = dag.topological_order()?;

        let catalog = Catalog::build(self.project, self.env)?;
        let resolutions = self.render_resolutions(&catalog);

        let model_map: BTreeMap<String, String> = catalog
            .models()
            .map(|(name, rel)| (name.clone(), self.dialect.relation_sql(rel)))
            .collect();
        let source_map: BTreeMap<String, String> = catalog
            .sources()
            .map(|(name, rel)| (name.clone(), self.dialect.relation_sql(rel)))
            .collect();
        let renderer = Renderer::new(model_map, source_map, &self.env.vars);

        let mut models = BTreeMap::new();
        let mut failures: BTreeMap<String, RenderError> = BTreeMap::new();
        let mut skipped: BTreeMap<String, String> = BTreeMap::new();

        for name in &order {
            if failures.contains_key(name) || skipped.contains_key(name) {
                continue;
            }

            let model = self.project.get_model(name)?;
            match self.compile_model(model, &catalog, &renderer) {
                Ok(compiled) => {
                    models.insert(name.clone(), compiled);
                }
                Err(err) => {
                    log::warn!("Compilation of '{}' failed: {}", name, err);
                    for dependent in dag.descendants(name) {
                        skipped.entry(dependent).or_insert_with(|| name.clone());
                    }
                    failures.insert(name.clone(), err);
                }
            }
        }

        Ok(CompileOutput {
            environment: self.env.name.clone(),
            order,
            models,
            failures,
            skipped,
            resolutions,
            dag,
        })
    }

    /// Compile a single model: resolve, render, and parse-validate.
    fn compile_model(
        &self,
        model: &Model,
        catalog: &Catalog,
        renderer: &Renderer,
    ) -> RenderResult<CompiledModel> {
        // Resolve references up front so a dangling one is reported by
        // name even when it never renders (e.g. inside a dead branch).
        for reference in model.references() {
            if catalog.resolve(&reference).is_none() {
                return Err(RenderError::UnresolvedReference {
                    model: model.name.to_string(),
                    reference: reference.name().to_string(),
                });
            }
        }

        let sql = renderer.render(model.name.as_str(), &model.raw_sql)?;

        self.dialect
            .parse(&sql)
            .map_err(|e| RenderError::ParseError {
                model: model.name.to_string(),
                message: e.message,
                line: e.line,
                column: e.column,
            })?;

        let relation = self
            .env
            .model_relation(model.name.as_str(), model.schema_override());
        let materialization = model
            .materialization_override()
            .unwrap_or(self.project.config.materialization);
        let depends_on = model.model_dependencies().into_iter().collect();

        Ok(CompiledModel {
            name: model.name.to_string(),
            relation_sql: self.dialect.relation_sql(&relation),
            schema_sql: self.dialect.schema_sql(&relation.database, &relation.schema),
            relation,
            sql,
            materialization,
            depends_on,
        })
    }

    /// Dialect-rendered relations for every catalog entry.
    fn render_resolutions(&self, catalog: &Catalog) -> BTreeMap<String, String> {
        catalog
            .models()
            .chain(catalog.sources())
            .map(|(name, rel)| (name.clone(), self.dialect.relation_sql(rel)))
            .collect()
    }

    /// Write compiled model SQL under `<target>/<environment>/models/`.
    ///
    /// Returns the written paths in execution order.
    pub fn write_artifacts(
        &self,
        output: &CompileOutput,
        target_dir: &Path,
    ) -> RenderResult<Vec<PathBuf>> {
        let models_dir = target_dir.join(&output.environment).join("models");
        std::fs::create_dir_all(&models_dir).map_err(|e| RenderError::ArtifactWrite {
            path: models_dir.display().to_string(),
            source: e,
        })?;

        let mut paths = Vec::new();
        for name in &output.order {
            let Some(compiled) = output.models.get(name) else {
                continue;
            };
            let path = models_dir.join(format!("{}.sql", name));
            std::fs::write(&path, &compiled.sql).map_err(|e| RenderError::ArtifactWrite {
                path: path.display().to_string(),
                source: e,
            })?;
            paths.push(path);
        }

        log::info!(
            "Wrote {} compiled models to {}",
            paths.len(),
            models_dir.display()
        );
        Ok(paths)
    }
}

#[cfg(test)]
#[path = "compiler_test.rs"]
mod tests;
