//! Reference marker extraction.
//!
//! Models point at other objects with `{{ ref('name') }}` (another model)
//! or `{{ source('name') }}` (a declared raw table). Dependency extraction
//! happens before rendering so the DAG can be built and dangling references
//! reported without a template backtrace.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// An unresolved pointer from one model's SQL body to another object.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Reference {
    /// A `ref('...')` marker naming another model
    Model(String),
    /// A `source('...')` marker naming a declared raw table
    Source(String),
}

impl Reference {
    /// The referenced object name.
    pub fn name(&self) -> &str {
        match self {
            Reference::Model(n) | Reference::Source(n) => n,
        }
    }
}

fn ref_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*(ref|source)\(\s*['"]([A-Za-z_][A-Za-z0-9_]*)['"]\s*\)\s*\}\}"#)
            .expect("reference regex is valid")
    })
}

/// Extract all `ref`/`source` markers from a raw SQL body.
///
/// Returns a sorted set; repeated markers collapse to one reference.
pub fn extract_references(raw_sql: &str) -> BTreeSet<Reference> {
    ref_regex()
        .captures_iter(raw_sql)
        .map(|cap| {
            let name = cap[2].to_string();
            match &cap[1] {
                "ref" => Reference::Model(name),
                _ => Reference::Source(name),
            }
        })
        .collect()
}
