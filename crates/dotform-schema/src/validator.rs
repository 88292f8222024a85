//! # Validator Protocol
//!
//! A validator is any function `Data -> Result<Data, ValidationFailure>`.
//! On success it returns the cleaned value; on failure it returns a
//! [`ValidationFailure`] carrying a message and the best-effort cleaned value
//! at the point of failure.
//!
//! Every `Fn(Data) -> Result<Data, ValidationFailure> + Send + Sync` is a
//! [`Validator`], so plain functions and closures can be attached to schema
//! nodes directly.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::data::Data;
use crate::message::DeferredMessage;

/// A structured validation failure.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("validation failed: {}", .message.template())]
pub struct ValidationFailure {
    /// The message to show for the failing field.
    pub message: DeferredMessage,
    /// Best-effort cleaned data at the point of failure.
    ///
    /// For map and sequence nodes this holds the children's outcomes, so
    /// the failure can still be attributed to specific children. `Null`
    /// stops attribution at the failing node.
    pub clean_data: Data,
}

impl ValidationFailure {
    /// Create a failure from a message and the partially cleaned data.
    pub fn new(message: impl Into<DeferredMessage>, clean_data: impl Into<Data>) -> Self {
        Self {
            message: message.into(),
            clean_data: clean_data.into(),
        }
    }
}

/// Converts and checks data for one schema node.
pub trait Validator: Send + Sync {
    /// Clean `data`, or explain why it is invalid.
    fn validate(&self, data: Data) -> Result<Data, ValidationFailure>;
}

impl<F> Validator for F
where
    F: Fn(Data) -> Result<Data, ValidationFailure> + Send + Sync,
{
    fn validate(&self, data: Data) -> Result<Data, ValidationFailure> {
        self(data)
    }
}

/// A shared, type-erased validator.
pub type ValidatorRef = Arc<dyn Validator>;

/// A shared pre-processor, applied to raw input before a bound field builds
/// its children.
pub type PreProcessor = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Erase a validator into a [`ValidatorRef`].
pub fn validator_ref(validator: impl Validator + 'static) -> ValidatorRef {
    Arc::new(validator)
}
