//! # Schema Documents
//!
//! Loads a schema from a declarative YAML or JSON document. Validators are
//! referenced by name and resolved through a [`ValidatorRegistry`]:
//!
//! ```yaml
//! name: not_none | ensure_str
//! age: as_int
//! tags:
//!   - $limit_length: {min: 1, max: 20}
//! address:
//!   street: not_none
//!   zip:
//!     $from_regex: "^[0-9]{5}$"
//! notes: ~
//! ```
//!
//! Node forms:
//!
//! - mapping: a map node, unless every key starts with `$`, in which case
//!   the mapping is a chain of parameterised validators applied in order
//! - sequence: a sequence node; it must contain exactly one element
//! - string: validator names joined with `|`, chained in order
//! - null: a leaf that passes its data through
//!
//! JSON documents are accepted as the YAML subset they are.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::data::{Data, DataKind};
use crate::error::SchemaError;
use crate::literal::{make_from_literal, Literal};
use crate::message::DeferredMessage;
use crate::schema::Schema;
use crate::validator::{validator_ref, ValidatorRef};
use crate::validators;

/// Prefix marking a mapping key as a validator name.
const VALIDATOR_SIGIL: char = '$';

/// Builds a validator from its document parameters (`null` when the
/// validator is named without parameters).
pub type ValidatorFactory = dyn Fn(&Value) -> Result<ValidatorRef, String> + Send + Sync;

/// Named validator factories available to schema documents.
#[derive(Clone)]
pub struct ValidatorRegistry {
    factories: HashMap<String, Arc<ValidatorFactory>>,
}

impl ValidatorRegistry {
    /// A registry with no validators.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// A registry holding every standard validator.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register_plain("noop", validators::noop);
        registry.register_plain("all_children", validators::all_children);
        registry.register_plain("ensure_parent", validators::ensure_parent);
        registry.register_plain("not_none", validators::not_none);
        registry.register_plain("ensure_str", validators::ensure_str);
        registry.register_plain("as_int", validators::as_int);
        registry.register_plain("as_decimal", validators::as_decimal);

        registry.register("limit_length", |params| {
            let p: LengthParams = parse_params(params)?;
            Ok(validators::limit_length(p.min, p.max, p.msg.map(DeferredMessage::from)))
        });
        registry.register("key_matcher", |params| {
            let p: KeyMatcherParams = parse_params(params)?;
            Ok(validators::key_matcher(&p.key1, &p.key2, p.msg.map(DeferredMessage::from)))
        });
        registry.register("one_of", |params| {
            let p: OneOfParams = parse_shorthand(params, "values")?;
            let values = p.values.into_iter().map(Data::from).collect();
            Ok(validators::one_of(values, p.msg.map(DeferredMessage::from)))
        });
        registry.register("limit_chars", |params| {
            let p: CharClassParams = parse_shorthand(params, "char_class")?;
            validators::limit_chars(&p.char_class, p.msg.map(DeferredMessage::from))
                .map_err(|e| e.to_string())
        });
        registry.register("from_regex", |params| {
            let p: PatternParams = parse_shorthand(params, "pattern")?;
            validators::from_regex(&p.pattern, p.msg.map(DeferredMessage::from))
                .map_err(|e| e.to_string())
        });
        registry.register("as_date", |params| {
            let p: DateParams = parse_shorthand(params, "format")?;
            Ok(validators::as_date(&p.format, p.msg.map(DeferredMessage::from)))
        });
        registry.register("ensure_kind", |params| {
            let p: KindParams = parse_shorthand(params, "kind")?;
            let kind = parse_kind(&p.kind)?;
            Ok(validators::ensure_kind(kind, p.msg.map(DeferredMessage::from)))
        });
        registry
    }

    /// Register a factory under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&Value) -> Result<ValidatorRef, String> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    /// Register a validator that takes no parameters.
    pub fn register_plain<V>(&mut self, name: impl Into<String>, validator: V)
    where
        V: crate::validator::Validator + Clone + 'static,
    {
        let name = name.into();
        let label = name.clone();
        self.register(name, move |params| {
            if !is_empty_params(params) {
                return Err(format!("'{label}' takes no parameters"));
            }
            Ok(validator_ref(validator.clone()))
        });
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build the validator registered under `name`.
    pub fn resolve(&self, name: &str, params: &Value) -> Result<ValidatorRef, String> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| format!("unknown validator '{name}'"))?;
        factory(params)
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("names", &self.names())
            .finish()
    }
}

/// A parsed schema document.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    root: serde_yaml::Value,
}

impl SchemaDocument {
    /// Parse a YAML (or JSON) document.
    pub fn from_yaml_str(text: &str) -> Result<Self, SchemaError> {
        Ok(Self {
            root: serde_yaml::from_str(text)?,
        })
    }

    /// Read and parse a document from disk.
    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        let text = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading schema document");
        Self::from_yaml_str(&text)
    }

    /// Translate the document into a literal, resolving validator names.
    pub fn to_literal(&self, registry: &ValidatorRegistry) -> Result<Literal, SchemaError> {
        node_to_literal(&self.root, "", registry)
    }

    /// Build the schema described by this document.
    pub fn build(&self, registry: &ValidatorRegistry) -> Result<Schema, SchemaError> {
        make_from_literal(self.to_literal(registry)?)
    }
}

fn node_to_literal(
    node: &serde_yaml::Value,
    path: &str,
    registry: &ValidatorRegistry,
) -> Result<Literal, SchemaError> {
    use serde_yaml::Value as Yaml;

    match node {
        Yaml::Null => Ok(Literal::validator(validators::noop)),
        Yaml::String(names) => Ok(Literal::Validator(named_chain(names, path, registry)?)),
        Yaml::Sequence(items) => match items.as_slice() {
            [item] => Ok(Literal::seq(node_to_literal(item, &join(path, ':', "0"), registry)?)),
            _ => Err(SchemaError::document(
                path,
                format!("sequence must have exactly one element, got {}", items.len()),
            )),
        },
        Yaml::Mapping(mapping) => {
            let mut entries = Vec::with_capacity(mapping.len());
            for (key, value) in mapping {
                let key = key
                    .as_str()
                    .ok_or_else(|| SchemaError::document(path, format!("non-string key {key:?}")))?;
                entries.push((key, value));
            }
            let sigils = entries.iter().filter(|(k, _)| k.starts_with(VALIDATOR_SIGIL)).count();
            if sigils > 0 && sigils == entries.len() {
                return Ok(Literal::Validator(parameterised_chain(&entries, path, registry)?));
            }
            if sigils > 0 {
                return Err(SchemaError::document(
                    path,
                    "mapping mixes validator keys and field keys",
                ));
            }
            entries
                .into_iter()
                .map(|(key, value)| -> Result<(String, Literal), SchemaError> {
                    let literal = node_to_literal(value, &join(path, '.', key), registry)?;
                    Ok((key.to_string(), literal))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Literal::Map)
        }
        Yaml::Tagged(tagged) => node_to_literal(&tagged.value, path, registry),
        Yaml::Bool(_) | Yaml::Number(_) => Err(SchemaError::document(
            path,
            "expected a mapping, a sequence, validator names or null",
        )),
    }
}

fn named_chain(names: &str, path: &str, registry: &ValidatorRegistry) -> Result<ValidatorRef, SchemaError> {
    let chain = names
        .split('|')
        .map(str::trim)
        .map(|name| {
            registry
                .resolve(name, &Value::Null)
                .map_err(|reason| SchemaError::document(path, reason))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(single_or_chain(chain))
}

fn parameterised_chain(
    entries: &[(&str, &serde_yaml::Value)],
    path: &str,
    registry: &ValidatorRegistry,
) -> Result<ValidatorRef, SchemaError> {
    let mut chain = Vec::with_capacity(entries.len());
    for (key, params) in entries {
        let name = key.trim_start_matches(VALIDATOR_SIGIL);
        let params = yaml_to_json_value(params).map_err(|reason| SchemaError::document(path, reason))?;
        let validator = registry
            .resolve(name, &params)
            .map_err(|reason| SchemaError::document(path, format!("{name}: {reason}")))?;
        chain.push(validator);
    }
    Ok(single_or_chain(chain))
}

fn single_or_chain(mut chain: Vec<ValidatorRef>) -> ValidatorRef {
    if chain.len() == 1 {
        chain.remove(0)
    } else {
        validators::chain(chain)
    }
}

fn join(path: &str, delimiter: char, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}{delimiter}{name}")
    }
}

/// Convert a `serde_yaml::Value` into the equivalent JSON value.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    use serde_yaml::Value as Yaml;

    match yaml {
        Yaml::Null => Ok(Value::Null),
        Yaml::Bool(b) => Ok(Value::Bool(*b)),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(i.into()))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(u.into()))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        Yaml::String(s) => Ok(Value::String(s.clone())),
        Yaml::Sequence(seq) => seq
            .iter()
            .map(yaml_to_json_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Yaml::Mapping(map) => {
            let mut object = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    Yaml::String(s) => s.clone(),
                    Yaml::Number(n) => n.to_string(),
                    Yaml::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key: {other:?}")),
                };
                object.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(object))
        }
        Yaml::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}

// -- Parameter shapes -----------------------------------------------------

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LengthParams {
    #[serde(default)]
    min: usize,
    max: Option<usize>,
    msg: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct KeyMatcherParams {
    key1: String,
    key2: String,
    msg: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct OneOfParams {
    values: Vec<Value>,
    msg: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CharClassParams {
    char_class: String,
    msg: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PatternParams {
    pattern: String,
    msg: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DateParams {
    format: String,
    msg: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct KindParams {
    kind: String,
    msg: Option<String>,
}

fn is_empty_params(params: &Value) -> bool {
    match params {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn parse_params<T: DeserializeOwned>(params: &Value) -> Result<T, String> {
    let params = if params.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        params.clone()
    };
    serde_json::from_value(params).map_err(|e| format!("invalid parameters: {e}"))
}

/// Like [`parse_params`], but a bare non-object value stands for the single
/// field `key` (`$from_regex: "^a"` means `{pattern: "^a"}`).
fn parse_shorthand<T: DeserializeOwned>(params: &Value, key: &str) -> Result<T, String> {
    match params {
        Value::Object(_) | Value::Null => parse_params(params),
        other => {
            let mut object = serde_json::Map::new();
            object.insert(key.to_string(), other.clone());
            parse_params(&Value::Object(object))
        }
    }
}

fn parse_kind(name: &str) -> Result<DataKind, String> {
    [
        DataKind::Null,
        DataKind::Bool,
        DataKind::Number,
        DataKind::String,
        DataKind::Map,
        DataKind::Seq,
    ]
    .into_iter()
    .find(|kind| kind.as_str() == name)
    .ok_or_else(|| format!("unknown kind '{name}'"))
}
