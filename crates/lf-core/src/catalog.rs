//! Per-environment reference catalog.
//!
//! The catalog is the read-only map every reference resolves against: one
//! entry per model and per declared source table, each bound to the
//! [`Relation`] it occupies in the active environment.

use crate::environment::Environment;
use crate::error::{CoreError, CoreResult};
use crate::project::Project;
use crate::reference::Reference;
use crate::relation::Relation;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Resolution map from object name to its environment-qualified relation.
#[derive(Debug, Clone)]
pub struct Catalog {
    models: BTreeMap<String, Relation>,
    sources: BTreeMap<String, Relation>,
}

impl Catalog {
    /// Build the catalog for one environment.
    ///
    /// Fails if a model and a source table (or two source tables across
    /// files) share a name, since a reference must resolve to exactly one
    /// object.
    pub fn build(project: &Project, env: &Environment) -> CoreResult<Self> {
        let mut models = BTreeMap::new();
        for (name, model) in &project.models {
            let relation = env.model_relation(name.as_str(), model.schema_override());
            models.insert(name.to_string(), relation);
        }

        let mut sources = BTreeMap::new();
        for source in &project.sources {
            for table in &source.tables {
                if models.contains_key(&table.name) {
                    return Err(CoreError::ConfigInvalid {
                        message: format!(
                            "'{}' is declared both as a model and as a source table",
                            table.name
                        ),
                    });
                }
                let relation = env.source_relation(&table.name, source.schema.as_deref());
                match sources.entry(table.name.clone()) {
                    Entry::Vacant(slot) => {
                        slot.insert(relation);
                    }
                    Entry::Occupied(_) => {
                        return Err(CoreError::DuplicateSourceTable {
                            table: table.name.clone(),
                            source_name: source.name.clone(),
                        });
                    }
                }
            }
        }

        Ok(Self { models, sources })
    }

    /// Resolve a reference to its relation, if declared.
    pub fn resolve(&self, reference: &Reference) -> Option<&Relation> {
        match reference {
            Reference::Model(name) => self.models.get(name),
            Reference::Source(name) => self.sources.get(name),
        }
    }

    /// Iterate over model entries in name order.
    pub fn models(&self) -> impl Iterator<Item = (&String, &Relation)> {
        self.models.iter()
    }

    /// Iterate over source entries in name order.
    pub fn sources(&self) -> impl Iterator<Item = (&String, &Relation)> {
        self.sources.iter()
    }
}
