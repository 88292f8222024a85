//! # Schema Tree
//!
//! An immutable tree describing the shape of valid data. Each node is one of
//! three kinds:
//!
//! - **Map**: named children, validated by key.
//! - **Sequence**: a single template child, applied to every element.
//! - **Leaf**: a single datum.
//!
//! Every node carries a validator and a pre-processor. Validation is
//! depth-first: a node's validator runs only after every child has produced
//! its outcome, and receives those outcomes (cleaned values and failure
//! markers) as its input.
//!
//! Schemas are never mutated by validation or binding and can be shared
//! across threads.

use std::fmt;
use std::slice;
use std::sync::Arc;

use serde_json::Value;

use crate::data::{Data, FieldName};
use crate::validator::{validator_ref, PreProcessor, Validator, ValidatorRef};
use crate::validators;

/// The shape of a schema node.
#[derive(Clone)]
pub enum SchemaKind {
    /// Children in declaration order, each named by its key.
    Map(Vec<Schema>),
    /// The template for every element, named `0`.
    Sequence(Box<Schema>),
    /// A single datum.
    Leaf,
}

/// A node of the schema tree.
#[derive(Clone)]
pub struct Schema {
    name: FieldName,
    kind: SchemaKind,
    validator: ValidatorRef,
    pre_processor: PreProcessor,
}

impl Schema {
    /// Build a map node. A later duplicate key replaces the earlier child in
    /// place.
    pub fn map<I, K>(children: I) -> Self
    where
        I: IntoIterator<Item = (K, Schema)>,
        K: Into<String>,
    {
        let mut nodes: Vec<Schema> = Vec::new();
        for (key, child) in children {
            let child = child.named(FieldName::Key(key.into()));
            match nodes.iter_mut().find(|n| n.name == child.name) {
                Some(slot) => *slot = child,
                None => nodes.push(child),
            }
        }
        Self::with_kind(SchemaKind::Map(nodes), validator_ref(validators::all_children))
    }

    /// Build a sequence node around its element template.
    pub fn sequence(child: Schema) -> Self {
        let child = child.named(FieldName::Index(0));
        Self::with_kind(
            SchemaKind::Sequence(Box::new(child)),
            validator_ref(validators::all_children),
        )
    }

    /// Build a leaf node with the given validator.
    pub fn leaf(validator: impl Validator + 'static) -> Self {
        Self::with_kind(SchemaKind::Leaf, validator_ref(validator))
    }

    /// Build a leaf node from a shared validator.
    pub fn leaf_ref(validator: ValidatorRef) -> Self {
        Self::with_kind(SchemaKind::Leaf, validator)
    }

    fn with_kind(kind: SchemaKind, validator: ValidatorRef) -> Self {
        Self {
            name: FieldName::default(),
            kind,
            validator,
            pre_processor: Arc::new(|value: Value| value),
        }
    }

    /// Replace this node's validator.
    pub fn with_validator(self, validator: impl Validator + 'static) -> Self {
        self.with_validator_ref(validator_ref(validator))
    }

    /// Replace this node's validator with a shared one.
    pub fn with_validator_ref(mut self, validator: ValidatorRef) -> Self {
        self.validator = validator;
        self
    }

    /// Replace this node's pre-processor.
    pub fn with_pre_processor<F>(mut self, pre_processor: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.pre_processor = Arc::new(pre_processor);
        self
    }

    /// The same node under a different name.
    pub fn named(mut self, name: impl Into<FieldName>) -> Self {
        self.name = name.into();
        self
    }

    /// The name of this node within its parent.
    pub fn name(&self) -> &FieldName {
        &self.name
    }

    pub fn kind(&self) -> &SchemaKind {
        &self.kind
    }

    pub fn is_map(&self) -> bool {
        matches!(self.kind, SchemaKind::Map(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self.kind, SchemaKind::Sequence(_))
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, SchemaKind::Leaf)
    }

    /// Child nodes: map children in declaration order, the sequence
    /// template, or nothing for a leaf.
    pub fn children(&self) -> &[Schema] {
        match &self.kind {
            SchemaKind::Map(children) => children,
            SchemaKind::Sequence(child) => slice::from_ref(child.as_ref()),
            SchemaKind::Leaf => &[],
        }
    }

    /// Look up a map child by key.
    pub fn child(&self, key: &str) -> Option<&Schema> {
        match &self.kind {
            SchemaKind::Map(children) => children.iter().find(|c| c.name.as_key() == Some(key)),
            _ => None,
        }
    }

    /// The element template of a sequence node.
    pub fn sequence_child(&self) -> Option<&Schema> {
        match &self.kind {
            SchemaKind::Sequence(child) => Some(child),
            _ => None,
        }
    }

    pub fn validator(&self) -> &ValidatorRef {
        &self.validator
    }

    /// Apply this node's pre-processor to raw input.
    pub fn pre_process(&self, data: Value) -> Value {
        (self.pre_processor)(data)
    }

    /// Validate `data` against this subtree.
    ///
    /// Never fails: a rejected node yields [`Data::Failure`] in its
    /// position. For containers the failure carries the children's
    /// outcomes as its partial data.
    pub fn validate(&self, data: &Value) -> Data {
        let collected = match &self.kind {
            SchemaKind::Map(children) => {
                let object = data.as_object();
                Data::Map(
                    children
                        .iter()
                        .map(|child| {
                            let key = child.name.to_string();
                            let slice = object.and_then(|o| o.get(&key)).unwrap_or(&Value::Null);
                            let outcome = child.validate(slice);
                            (key, outcome)
                        })
                        .collect(),
                )
            }
            SchemaKind::Sequence(child) => {
                let items = data.as_array().map(Vec::as_slice).unwrap_or_default();
                Data::Seq(items.iter().map(|item| child.validate(item)).collect())
            }
            SchemaKind::Leaf => Data::from(data),
        };
        self.run_validator(collected)
    }

    /// Run only this node's validator, turning a failure into a marker.
    pub fn run_validator(&self, data: Data) -> Data {
        match self.validator.validate(data) {
            Ok(clean) => clean,
            Err(failure) => failure.into(),
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Schema");
        s.field("name", &self.name);
        match &self.kind {
            SchemaKind::Map(children) => s.field("map", children),
            SchemaKind::Sequence(child) => s.field("sequence", child),
            SchemaKind::Leaf => s.field("leaf", &true),
        };
        s.finish_non_exhaustive()
    }
}

impl fmt::Debug for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Map(children) => f.debug_tuple("Map").field(children).finish(),
            Self::Sequence(child) => f.debug_tuple("Sequence").field(child).finish(),
            Self::Leaf => f.write_str("Leaf"),
        }
    }
}
