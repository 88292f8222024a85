//! # dotform-fields: Bound Field Trees
//!
//! Binds a submission to a [`Schema`](dotform_schema::Schema) and reports
//! the validation outcome field by field.
//!
//! ```text
//! flat form data ──merge──▶ expand ──▶ nested value ──bind──▶ BoundField tree
//!                                                              │
//!                                                   is_valid() │ schema.validate()
//!                                                              ▼
//!                                       clean_data / error on every field
//! ```
//!
//! ## Bound Fields (`field`)
//!
//! A [`BoundField`] borrows its schema node and owns its children. It is
//! one-shot: bind a fresh tree for every submission. The schema itself is
//! never touched, so one schema can serve many binds, including concurrent
//! ones on other threads.
//!
//! ## Binding (`bind`)
//!
//! [`bind`] takes nested data; [`bind_dotted`] and [`bind_dotted_cached`]
//! take flat form data with `.`/`:` keys and an optional second source of
//! overrides.
//!
//! ## Crate Policy
//!
//! - Validation failures are values. Only decoding can fail with an `Err`.
//! - No `.unwrap()` outside tests.

pub mod bind;
pub mod field;

pub use bind::{bind, bind_dotted, bind_dotted_cached, merge_submission};
pub use field::BoundField;
