//! # Bound Fields
//!
//! A [`BoundField`] pairs one schema node with the slice of input data that
//! belongs to it. Binding a schema builds a tree of bound fields mirroring
//! the schema: map nodes get one child per declared key, sequence nodes one
//! child per input element (or a single placeholder named `0` when there is
//! no input), and leaves get none.
//!
//! [`BoundField::is_valid`] validates the whole subtree through the schema,
//! then walks the result in parallel with the field tree, attaching cleaned
//! values and resolved error messages to every field it reaches.

use std::collections::BTreeMap;
use std::slice;

use dotform_core::{OBJECT_DELIMITER, SEQUENCE_DELIMITER};
use dotform_schema::{
    interpolate, Data, FieldName, MessageProcessor, Params, Schema, SchemaKind, ValidationFailure,
};
use serde_json::Value;

/// A schema node bound to its input data.
#[derive(Debug)]
pub struct BoundField<'s> {
    schema: &'s Schema,
    name: FieldName,
    full_name: String,
    raw_data: Value,
    clean_data: Option<Data>,
    error: Option<String>,
    children: Vec<BoundField<'s>>,
}

impl<'s> BoundField<'s> {
    /// Bind `data` to `schema` as the root of a new field tree.
    pub fn new(schema: &'s Schema, data: Value) -> Self {
        Self::build(schema, data, String::new(), schema.name().clone())
    }

    fn build(schema: &'s Schema, data: Value, full_name: String, name: FieldName) -> Self {
        let raw_data = schema.pre_process(data);
        let children = make_children(schema, &raw_data, &full_name);
        Self {
            schema,
            name,
            full_name,
            raw_data,
            clean_data: None,
            error: None,
            children,
        }
    }

    /// Validate the subtree and attach results to every field.
    ///
    /// Returns `true` if this field's own result is not a failure. Error
    /// messages are resolved with [`interpolate`].
    pub fn is_valid(&mut self) -> bool {
        self.is_valid_with(&interpolate)
    }

    /// Like [`is_valid`](Self::is_valid), resolving error messages with a
    /// caller-supplied processor (e.g. one that translates templates first).
    pub fn is_valid_with(&mut self, processor: &MessageProcessor) -> bool {
        let outcome = self.schema.validate(&self.raw_data);
        let valid = self.propagate(outcome, processor);
        tracing::debug!(
            field = %self.full_name,
            valid,
            errors = self.errors().len(),
            "validated bound field"
        );
        valid
    }

    fn propagate(&mut self, outcome: Data, processor: &MessageProcessor) -> bool {
        let (data, valid) = match outcome {
            Data::Failure(failure) => {
                let ValidationFailure { message, clean_data } = *failure;
                self.error = Some(message.format_with(&self.message_params(), processor));
                self.clean_data = None;
                (clean_data, false)
            }
            value => {
                self.error = None;
                self.clean_data = Some(value.clone());
                (value, true)
            }
        };
        if data.is_null() {
            return valid;
        }
        for child in &mut self.children {
            if let Some(slice) = data.child(&child.name) {
                child.propagate(slice.clone(), processor);
            }
        }
        valid
    }

    /// Parameters identifying this field inside its error message.
    fn message_params(&self) -> Params {
        let mut params = Params::new();
        params.insert("field".to_string(), self.full_name.clone());
        params.insert("field.name".to_string(), self.name.to_string());
        params.insert("field.full_name".to_string(), self.full_name.clone());
        params
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// The name of this field within its parent. Sequence elements are
    /// named by position.
    pub fn name(&self) -> &FieldName {
        &self.name
    }

    /// Path from the root: `.` below maps, `:` below sequences.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Input after the schema's pre-processor; `null` when absent.
    pub fn raw_data(&self) -> &Value {
        &self.raw_data
    }

    /// Cleaned data, set once this field validated successfully.
    pub fn clean_data(&self) -> Option<&Data> {
        self.clean_data.as_ref()
    }

    /// Cleaned data as plain JSON.
    pub fn clean_value(&self) -> Option<Value> {
        self.clean_data.as_ref().map(Data::to_value)
    }

    /// The resolved message of a failure attributed directly to this field.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Every non-empty direct error in this subtree, keyed by full name.
    ///
    /// Container validators fail with an empty message when only their
    /// children are at fault; those entries are omitted.
    pub fn errors(&self) -> BTreeMap<String, String> {
        let mut errors = BTreeMap::new();
        self.collect_errors(&mut errors);
        errors
    }

    fn collect_errors(&self, errors: &mut BTreeMap<String, String>) {
        if let Some(error) = self.error.as_ref().filter(|e| !e.is_empty()) {
            errors.insert(self.full_name.clone(), error.clone());
        }
        for child in &self.children {
            child.collect_errors(errors);
        }
    }

    /// Child of a map field by key.
    pub fn get(&self, key: &str) -> Option<&BoundField<'s>> {
        self.children.iter().find(|c| c.name.as_key() == Some(key))
    }

    /// Mutable child of a map field by key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut BoundField<'s>> {
        self.children.iter_mut().find(|c| c.name.as_key() == Some(key))
    }

    /// Child of a sequence field by position.
    pub fn item(&self, index: usize) -> Option<&BoundField<'s>> {
        if self.schema.is_sequence() {
            self.children.get(index)
        } else {
            None
        }
    }

    /// Children in sequence order, or in schema declaration order for maps.
    pub fn iter(&self) -> slice::Iter<'_, BoundField<'s>> {
        self.children.iter()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl<'a, 's> IntoIterator for &'a BoundField<'s> {
    type Item = &'a BoundField<'s>;
    type IntoIter = slice::Iter<'a, BoundField<'s>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn make_children<'s>(schema: &'s Schema, raw_data: &Value, full_name: &str) -> Vec<BoundField<'s>> {
    match schema.kind() {
        SchemaKind::Sequence(element) => {
            let prefix = format!("{full_name}{SEQUENCE_DELIMITER}");
            match raw_data.as_array().filter(|items| !items.is_empty()) {
                Some(items) => items
                    .iter()
                    .enumerate()
                    .map(|(ix, item)| {
                        BoundField::build(element, item.clone(), format!("{prefix}{ix}"), FieldName::Index(ix))
                    })
                    .collect(),
                None => vec![BoundField::build(
                    element,
                    Value::Null,
                    format!("{prefix}0"),
                    FieldName::Index(0),
                )],
            }
        }
        SchemaKind::Map(children) => {
            let prefix = if full_name.is_empty() {
                String::new()
            } else {
                format!("{full_name}{OBJECT_DELIMITER}")
            };
            children
                .iter()
                .map(|child| {
                    let key = child.name().to_string();
                    let data = raw_data.get(&key).cloned().unwrap_or(Value::Null);
                    BoundField::build(child, data, format!("{prefix}{key}"), child.name().clone())
                })
                .collect()
        }
        SchemaKind::Leaf => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dotform_schema::validators::{as_int, noop, not_none};
    use dotform_schema::{make_from_literal, DeferredMessage, Literal};
    use serde_json::json;

    fn pair_schema() -> Schema {
        make_from_literal(Literal::map([
            ("key1", Literal::validator(noop)),
            ("key2", Literal::validator(noop)),
        ]))
        .unwrap()
    }

    fn seq_schema() -> Schema {
        make_from_literal(Literal::seq(Literal::validator(noop))).unwrap()
    }

    #[test]
    fn test_root_field_defaults() {
        let schema = pair_schema();
        let field = BoundField::new(&schema, Value::Null);
        assert_eq!(field.full_name(), "");
        assert_eq!(field.name(), &FieldName::from(""));
        assert_eq!(field.raw_data(), &Value::Null);
        assert!(field.clean_data().is_none());
        assert!(field.error().is_none());
        assert!(std::ptr::eq(field.schema(), &schema));
    }

    #[test]
    fn test_sequence_without_data_has_placeholder() {
        let schema = seq_schema();
        let field = BoundField::new(&schema, Value::Null);
        assert_eq!(field.len(), 1);
        let child = field.item(0).unwrap();
        assert_eq!(child.full_name(), ":0");
        assert_eq!(child.name(), &FieldName::Index(0));
        assert_eq!(child.raw_data(), &Value::Null);
        assert!(std::ptr::eq(child.schema(), schema.sequence_child().unwrap()));

        let empty = BoundField::new(&schema, json!([]));
        assert_eq!(empty.len(), 1);
    }

    #[test]
    fn test_sequence_with_data() {
        let schema = seq_schema();
        let field = BoundField::new(&schema, json!([0, 1, 2, 3]));
        assert_eq!(field.len(), 4);
        for (i, child) in field.iter().enumerate() {
            assert_eq!(child.full_name(), format!(":{i}"));
            assert_eq!(child.name(), &FieldName::Index(i));
            assert_eq!(child.raw_data(), &json!(i));
            assert!(child.clean_data().is_none());
        }
    }

    #[test]
    fn test_map_children_follow_schema() {
        let schema = pair_schema();
        let field = BoundField::new(&schema, json!({"key1": 1, "other": 2}));
        let names: Vec<&str> = field.iter().map(BoundField::full_name).collect();
        assert_eq!(names, vec!["key1", "key2"]);
        assert_eq!(field.get("key1").unwrap().raw_data(), &json!(1));
        assert_eq!(field.get("key2").unwrap().raw_data(), &Value::Null);
        assert!(field.get("other").is_none());
        assert!(field.item(0).is_none());
    }

    #[test]
    fn test_leaf_has_no_children() {
        let schema = Schema::leaf(noop);
        let field = BoundField::new(&schema, json!(["a", "b", "c"]));
        assert!(field.is_empty());
        assert_eq!(field.raw_data(), &json!(["a", "b", "c"]));
    }

    #[test]
    fn test_nested_full_names() {
        let schema = make_from_literal(Literal::map([(
            "people",
            Literal::seq(Literal::map([("emails", Literal::seq(Literal::validator(noop)))])),
        )]))
        .unwrap();
        let field = BoundField::new(&schema, json!({"people": [{"emails": ["a", "b"]}]}));
        let email = field.get("people").unwrap().item(0).unwrap().get("emails").unwrap().item(1).unwrap();
        assert_eq!(email.full_name(), "people:0.emails:1");
    }

    #[test]
    fn test_pre_processor_shapes_raw_data() {
        let schema = Schema::map([(
            "tags",
            Schema::sequence(Schema::leaf(noop)).with_pre_processor(|v| match v {
                Value::String(s) => Value::Array(s.split(',').map(|t| json!(t)).collect()),
                other => other,
            }),
        )]);
        let mut field = BoundField::new(&schema, json!({"tags": "a,b"}));
        let tags = field.get("tags").unwrap();
        assert_eq!(tags.raw_data(), &json!(["a", "b"]));
        assert_eq!(tags.len(), 2);
        // Validation runs on the root's input, before child pre-processors.
        assert!(field.is_valid());
        assert_eq!(field.get("tags").unwrap().clean_value(), Some(json!([])));
    }

    #[test]
    fn test_noop_schema_is_identity() {
        let schema = make_from_literal(Literal::map([
            ("a", Literal::validator(noop)),
            ("b", Literal::seq(Literal::validator(noop))),
        ]))
        .unwrap();
        let input = json!({"a": "x", "b": [1, 2]});
        let mut field = BoundField::new(&schema, input.clone());
        assert!(field.is_valid());
        assert_eq!(field.clean_value(), Some(input));
        assert_eq!(field.get("b").unwrap().item(1).unwrap().clean_value(), Some(json!(2)));
        assert!(field.errors().is_empty());
    }

    #[test]
    fn test_child_failure_is_attributed() {
        let schema = make_from_literal(Literal::map([
            ("name", Literal::validator(not_none)),
            ("age", Literal::validator(as_int)),
        ]))
        .unwrap();
        let mut field = BoundField::new(&schema, json!({"age": "12"}));
        assert!(!field.is_valid());
        assert_eq!(field.error(), Some(""));
        assert!(field.clean_data().is_none());

        let name = field.get("name").unwrap();
        assert_eq!(name.error(), Some("name is required."));
        assert!(name.clean_data().is_none());

        let age = field.get("age").unwrap();
        assert!(age.error().is_none());
        assert_eq!(age.clean_value(), Some(json!(12)));

        let errors = field.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["name"], "name is required.");
    }

    #[test]
    fn test_parent_failure_without_partial_data_stops() {
        let schema = pair_schema().with_validator(|_: Data| -> Result<Data, ValidationFailure> {
            Err(ValidationFailure::new("{field} rejected", Data::Null))
        });
        let mut field = BoundField::new(&schema, json!({"key1": 1}));
        assert!(!field.is_valid());
        assert_eq!(field.error(), Some(" rejected"));
        assert!(field.iter().all(|c| c.error().is_none() && c.clean_data().is_none()));
    }

    #[test]
    fn test_double_attribution() {
        let schema = make_from_literal(Literal::map([(
            "inner",
            Literal::validator(|data: Data| -> Result<Data, ValidationFailure> {
                Err(ValidationFailure::new("inner bad", data))
            }),
        )]))
        .unwrap()
        .with_validator(|data: Data| -> Result<Data, ValidationFailure> {
            Err(ValidationFailure::new("outer bad", data))
        });
        let mut field = BoundField::new(&schema, json!({"inner": 1}));
        assert!(!field.is_valid());
        assert_eq!(field.error(), Some("outer bad"));
        assert_eq!(field.get("inner").unwrap().error(), Some("inner bad"));
    }

    #[test]
    fn test_message_params() {
        let schema = make_from_literal(Literal::map([(
            "address",
            Literal::map([(
                "zip",
                Literal::validator(|data: Data| -> Result<Data, ValidationFailure> {
                    let msg = DeferredMessage::new("{field.name} at {field.full_name} ({field})")
                        .with_param("field.name", "postcode");
                    Err(ValidationFailure::new(msg, data))
                }),
            )]),
        )]))
        .unwrap();
        let mut field = BoundField::new(&schema, Value::Null);
        field.is_valid();
        let zip = field.get("address").unwrap().get("zip").unwrap();
        assert_eq!(zip.error(), Some("postcode at address.zip (address.zip)"));
    }

    #[test]
    fn test_custom_processor() {
        let schema = make_from_literal(Literal::map([("email", Literal::validator(not_none))])).unwrap();
        let mut field = BoundField::new(&schema, Value::Null);
        let translate = |template: &str, params: &Params| {
            let template = template.replace("is required.", "est obligatoire.");
            interpolate(&template, params)
        };
        assert!(!field.is_valid_with(&translate));
        assert_eq!(field.get("email").unwrap().error(), Some("email est obligatoire."));
    }

    #[test]
    fn test_revalidation_after_fix() {
        let schema = make_from_literal(Literal::map([("n", Literal::validator(as_int))])).unwrap();
        let mut field = BoundField::new(&schema, json!({"n": "x"}));
        assert!(!field.is_valid());
        assert!(field.get("n").unwrap().error().is_some());
        assert!(!field.is_valid());
        assert_eq!(field.errors().len(), 1);
    }

    #[test]
    fn test_into_iterator() {
        let schema = pair_schema();
        let field = BoundField::new(&schema, Value::Null);
        let mut count = 0;
        for child in &field {
            assert!(child.is_empty());
            count += 1;
        }
        assert_eq!(count, 2);
    }
}
