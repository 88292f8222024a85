//! # dotform-schema: Schema Trees & Validators
//!
//! Describes the expected shape of nested form data and how each position
//! is cleaned and checked.
//!
//! ## Schema Tree (`schema`)
//!
//! A [`Schema`] is an immutable tree of three node kinds: map, sequence and
//! leaf. Every node carries a [`Validator`] and a pre-processor.
//! [`Schema::validate`] walks the tree depth first; a node's own validator
//! only runs after every child has produced its result.
//!
//! ## Validation Data (`data`)
//!
//! Validators consume and produce [`Data`]: a nested value in which any
//! position may hold a [`ValidationFailure`] instead of a value. Child
//! failures are summarized into their parent's input rather than raised,
//! so one failing field never stops its siblings from validating.
//!
//! ## Messages (`message`)
//!
//! Failure messages are [`DeferredMessage`] templates. They are resolved
//! once, when the failure is attached to a bound field, with the field's
//! identity available as `{field.name}` and `{field.full_name}`.
//!
//! ## Construction (`literal`, `document`)
//!
//! Schemas are built from [`Literal`] trees in code, or loaded from YAML or
//! JSON documents whose validator names resolve through a
//! [`ValidatorRegistry`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `dotform-*` crates.
//! - Schemas are `Send + Sync` and never mutated by validation.

pub mod data;
pub mod document;
pub mod error;
pub mod literal;
pub mod message;
pub mod schema;
pub mod validator;
pub mod validators;

pub use data::{Data, DataKind, FieldName};
pub use document::{SchemaDocument, ValidatorFactory, ValidatorRegistry};
pub use error::SchemaError;
pub use literal::{make_from_literal, Literal};
pub use message::{interpolate, DeferredMessage, MessageProcessor, Params};
pub use schema::{Schema, SchemaKind};
pub use validator::{validator_ref, PreProcessor, ValidationFailure, Validator, ValidatorRef};
