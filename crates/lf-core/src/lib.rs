//! lf-core - Core library for Ledgerflow
//!
//! This crate provides shared types, configuration parsing, project
//! discovery, reference extraction, and DAG building used across all
//! Ledgerflow components.

pub mod catalog;
pub mod config;
pub mod dag;
pub mod environment;
pub mod error;
pub mod model;
pub mod model_name;
pub mod project;
pub mod reference;
pub mod relation;
pub mod source;

pub use catalog::Catalog;
pub use config::Config;
pub use dag::ModelDag;
pub use environment::{DialectKind, Environment};
pub use error::{CoreError, CoreResult};
pub use model::{
    ColumnDef, Materialization, Model, ModelSchema, SchemaTest, TestDefinition, TestKind,
    TestSeverity,
};
pub use model_name::ModelName;
pub use project::Project;
pub use reference::{extract_references, Reference};
pub use relation::Relation;
pub use source::{SourceFile, SourceTable};
