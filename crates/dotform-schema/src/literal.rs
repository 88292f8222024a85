//! # Schema Literals
//!
//! A compact, nested way to write a schema. Maps become map nodes,
//! one-element sequences become sequence nodes and validators become
//! leaves:
//!
//! ```text
//! {"name": not_none, "tags": [ensure_str], "address": {"zip": as_int}}
//! ```
//!
//! An existing [`Schema`] can be embedded anywhere; it keeps its validator
//! and pre-processor and is renamed after its position.

use crate::error::SchemaError;
use crate::schema::Schema;
use crate::validator::{validator_ref, Validator, ValidatorRef};

/// A literally specified schema.
#[derive(Clone)]
pub enum Literal {
    /// Named children, in declaration order.
    Map(Vec<(String, Literal)>),
    /// Must hold exactly one element: the template for every item.
    Seq(Vec<Literal>),
    /// A leaf validated by this validator.
    Validator(ValidatorRef),
    /// A prebuilt subtree.
    Schema(Schema),
}

impl Literal {
    pub fn map<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Literal)>,
        K: Into<String>,
    {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn seq(element: Literal) -> Self {
        Self::Seq(vec![element])
    }

    pub fn validator(validator: impl Validator + 'static) -> Self {
        Self::Validator(validator_ref(validator))
    }
}

impl From<Schema> for Literal {
    fn from(schema: Schema) -> Self {
        Self::Schema(schema)
    }
}

impl From<ValidatorRef> for Literal {
    fn from(validator: ValidatorRef) -> Self {
        Self::Validator(validator)
    }
}

/// Convert a literal into a schema tree rooted at the empty name.
///
/// # Errors
///
/// Returns `SchemaError::SequenceArity` if any sequence literal does not
/// contain exactly one element.
pub fn make_from_literal(literal: Literal) -> Result<Schema, SchemaError> {
    Ok(build(literal)?.named(""))
}

fn build(literal: Literal) -> Result<Schema, SchemaError> {
    match literal {
        Literal::Map(entries) => {
            let children = entries
                .into_iter()
                .map(|(key, value)| -> Result<(String, Schema), SchemaError> {
                    Ok((key, build(value)?))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Schema::map(children))
        }
        Literal::Seq(mut elements) => {
            if elements.len() != 1 {
                return Err(SchemaError::SequenceArity(elements.len()));
            }
            let element = elements.remove(0);
            Ok(Schema::sequence(build(element)?))
        }
        Literal::Validator(validator) => Ok(Schema::leaf_ref(validator)),
        Literal::Schema(schema) => Ok(schema),
    }
}
