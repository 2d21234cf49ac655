//! Fully-qualified relation identifiers.
//!
//! A [`Relation`] is the resolved target of a reference: the
//! `database.schema.object` triple a model or source maps to in one
//! environment. Quoting is dialect-specific and applied later; the
//! relation itself carries the raw parts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A three-part relation name (`database.schema.identifier`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Relation {
    /// Target database (catalog)
    pub database: String,

    /// Target schema within the database
    pub schema: String,

    /// Object name (table or view)
    pub identifier: String,
}

impl Relation {
    /// Create a new relation from its parts.
    pub fn new(
        database: impl Into<String>,
        schema: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            database: database.into(),
            schema: schema.into(),
            identifier: identifier.into(),
        }
    }

    /// The parts in qualification order.
    pub fn parts(&self) -> [&str; 3] {
        [&self.database, &self.schema, &self.identifier]
    }
}

impl fmt::Display for Relation {
    /// Unquoted dotted form; use a dialect for quoted SQL output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.database, self.schema, self.identifier)
    }
}
