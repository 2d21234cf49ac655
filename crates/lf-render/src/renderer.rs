//! Template rendering: reference resolution against an environment catalog.
//!
//! The renderer is a pure function of (template, resolution maps, vars):
//! no filesystem or warehouse access happens here. `ref`/`source`/`var`
//! are registered as closures that capture their resolution maps, with a
//! shared slot recording the first unresolved marker so it can be reported
//! by name instead of as a template backtrace.

use crate::error::{RenderError, RenderResult};
use minijinja::value::Value;
use minijinja::{Environment, Error, ErrorKind};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

/// First unresolved marker hit during a render
type MissingCapture = Arc<Mutex<Option<String>>>;

/// Rendering environment bound to one target environment's catalog.
pub struct Renderer<'a> {
    env: Environment<'a>,
    missing: MissingCapture,
}

impl<'a> Renderer<'a> {
    /// Create a renderer from pre-rendered resolution maps.
    ///
    /// `models` and `sources` map object names to their dialect-rendered
    /// qualified SQL (e.g. `"db"."schema"."stg_trades"`).
    pub fn new(
        models: BTreeMap<String, String>,
        sources: BTreeMap<String, String>,
        vars: &HashMap<String, serde_yaml::Value>,
    ) -> Self {
        let mut env = Environment::new();
        let missing: MissingCapture = Arc::new(Mutex::new(None));

        env.add_function("ref", make_lookup_fn("ref", models, missing.clone()));
        env.add_function(
            "source",
            make_lookup_fn("source", sources, missing.clone()),
        );

        let json_vars: HashMap<String, serde_json::Value> = vars
            .iter()
            .map(|(k, v): (&String, &serde_yaml::Value)| (k.clone(), yaml_to_json(v)))
            .collect();
        env.add_function("var", make_var_fn(json_vars));

        Self { env, missing }
    }

    /// Render a model's template.
    ///
    /// `model` is used only for error attribution.
    pub fn render(&self, model: &str, template: &str) -> RenderResult<String> {
        if let Ok(mut slot) = self.missing.lock() {
            slot.take();
        }

        match self.env.render_str(template, ()) {
            Ok(sql) => Ok(sql),
            Err(source) => {
                let unresolved = self
                    .missing
                    .lock()
                    .ok()
                    .and_then(|mut slot| slot.take());
                match unresolved {
                    Some(reference) => Err(RenderError::UnresolvedReference {
                        model: model.to_string(),
                        reference,
                    }),
                    None => Err(RenderError::Template {
                        model: model.to_string(),
                        source,
                    }),
                }
            }
        }
    }
}

/// Create a `ref()`/`source()` resolution function over a fixed map.
///
/// An unknown name records itself in `missing` and raises an undefined
/// error so rendering stops at the first dangling reference.
fn make_lookup_fn(
    kind: &'static str,
    map: BTreeMap<String, String>,
    missing: MissingCapture,
) -> impl Fn(&str) -> Result<String, Error> + Send + Sync + 'static {
    move |name: &str| {
        if let Some(resolved) = map.get(name) {
            Ok(resolved.clone())
        } else {
            if let Ok(mut slot) = missing.lock() {
                slot.get_or_insert_with(|| name.to_string());
            }
            Err(Error::new(
                ErrorKind::UndefinedError,
                format!("{}('{}') does not resolve to any declared object", kind, name),
            ))
        }
    }
}

/// Create the `var(name, default?)` function.
fn make_var_fn(
    vars: HashMap<String, serde_json::Value>,
) -> impl Fn(&str, Option<Value>) -> Result<Value, Error> + Send + Sync + 'static {
    move |name: &str, default: Option<Value>| {
        if let Some(value) = vars.get(name) {
            Ok(json_to_minijinja_value(value))
        } else if let Some(default_val) = default {
            Ok(default_val)
        } else {
            Err(Error::new(
                ErrorKind::UndefinedError,
                format!("Variable '{}' is not defined and no default provided", name),
            ))
        }
    }
}

/// Convert serde_yaml::Value to serde_json::Value
fn yaml_to_json(yaml: &serde_yaml::Value) -> serde_json::Value {
    match yaml {
        serde_yaml::Value::Null => serde_json::Value::Null,
        serde_yaml::Value::Bool(b) => serde_json::Value::Bool(*b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                serde_json::Value::Number(serde_json::Number::from(i))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null)
            } else {
                serde_json::Value::Null
            }
        }
        serde_yaml::Value::String(s) => serde_json::Value::String(s.clone()),
        serde_yaml::Value::Sequence(seq) => {
            serde_json::Value::Array(seq.iter().map(yaml_to_json).collect())
        }
        serde_yaml::Value::Mapping(map) => {
            let obj: serde_json::Map<String, serde_json::Value> = map
                .iter()
                .filter_map(|(k, v): (&serde_yaml::Value, &serde_yaml::Value)| {
                    k.as_str().map(|key| (key.to_string(), yaml_to_json(v)))
                })
                .collect();
            serde_json::Value::Object(obj)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}

/// Convert serde_json::Value to minijinja::Value
fn json_to_minijinja_value(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::from(()),
        serde_json::Value::Bool(b) => Value::from(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(f) = n.as_f64() {
                Value::from(f)
            } else {
                Value::from(n.to_string())
            }
        }
        serde_json::Value::String(s) => Value::from(s.as_str()),
        serde_json::Value::Array(arr) => {
            let values: Vec<Value> = arr.iter().map(json_to_minijinja_value).collect();
            Value::from(values)
        }
        serde_json::Value::Object(obj) => {
            let map: HashMap<String, Value> = obj
                .iter()
                .map(|(k, v)| (k.clone(), json_to_minijinja_value(v)))
                .collect();
            Value::from_iter(map)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer_with(models: &[(&str, &str)], sources: &[(&str, &str)]) -> Renderer<'static> {
        let models = models
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let sources = sources
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Renderer::new(models, sources, &HashMap::new())
    }

    #[test]
    fn test_render_plain_sql_untouched() {
        let r = renderer_with(&[], &[]);
        let sql = r.render("m", "select 1 as one").unwrap();
        assert_eq!(sql, "select 1 as one");
    }

    #[test]
    fn test_render_resolves_ref() {
        let r = renderer_with(
            &[("stg_trades", r#""bain_analytics"."public"."stg_trades""#)],
            &[],
        );
        let sql = r
            .render("int_trade_enriched", "select * from {{ ref('stg_trades') }}")
            .unwrap();
        assert_eq!(
            sql,
            r#"select * from "bain_analytics"."public"."stg_trades""#
        );
    }

    #[test]
    fn test_render_resolves_source() {
        let r = renderer_with(&[], &[("raw_cashflows", "DBT_DEMO.DEV_raw.raw_cashflows")]);
        let sql = r
            .render("stg_cashflows", "select * from {{ source('raw_cashflows') }}")
            .unwrap();
        assert_eq!(sql, "select * from DBT_DEMO.DEV_raw.raw_cashflows");
    }

    #[test]
    fn test_render_unresolved_reference() {
        let r = renderer_with(&[], &[]);
        let err = r
            .render("stg_cashflows", "select * from {{ ref('stg_missing') }}")
            .unwrap_err();
        match err {
            RenderError::UnresolvedReference { model, reference } => {
                assert_eq!(model, "stg_cashflows");
                assert_eq!(reference, "stg_missing");
            }
            other => panic!("expected UnresolvedReference, got {other}"),
        }
    }

    #[test]
    fn test_render_with_var_and_default() {
        let mut vars = HashMap::new();
        vars.insert(
            "start_date".to_string(),
            serde_yaml::Value::String("2024-01-01".to_string()),
        );
        let r = Renderer::new(BTreeMap::new(), BTreeMap::new(), &vars);

        let sql = r
            .render("m", "where trade_date >= '{{ var('start_date') }}'")
            .unwrap();
        assert_eq!(sql, "where trade_date >= '2024-01-01'");

        let sql = r.render("m", "{{ var('missing', 'fallback') }}").unwrap();
        assert_eq!(sql, "fallback");
    }

    #[test]
    fn test_render_missing_var_errors() {
        let r = renderer_with(&[], &[]);
        assert!(matches!(
            r.render("m", "{{ var('nope') }}"),
            Err(RenderError::Template { .. })
        ));
    }
}
