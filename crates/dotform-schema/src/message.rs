//! # Deferred Messages
//!
//! A validator fails before the bound field it belongs to is known, so its
//! message cannot be rendered yet. A [`DeferredMessage`] keeps the raw
//! template plus the parameters known at validator-construction time; the
//! bound field tree resolves it once, adding the field's identity:
//!
//! ```text
//! "The length of {field.name} must be at least {min}"   params: {min: 5}
//!   + field params {field.name: "zip_code", field.full_name: "address.zip_code"}
//!   → "The length of zip_code must be at least 5"
//! ```
//!
//! The message's own parameters win over the field parameters on collision.
//! Placeholders are `{key}`, where the key may contain dots; `{{` and `}}`
//! produce literal braces. A placeholder with no value is left verbatim.

use std::collections::BTreeMap;
use std::fmt;

/// Named substitution parameters.
pub type Params = BTreeMap<String, String>;

/// A function that renders a template with its merged parameters.
///
/// The default processor is [`interpolate`]; callers may substitute their
/// own (for example to translate templates before interpolation).
pub type MessageProcessor = dyn Fn(&str, &Params) -> String + Send + Sync;

/// A message template with deferred formatting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeferredMessage {
    template: String,
    params: Params,
}

impl DeferredMessage {
    /// Create a message with no parameters of its own.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            params: Params::new(),
        }
    }

    /// Attach a substitution parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    /// Use `user` if given, otherwise `default`, and merge `params` in.
    ///
    /// Parameters already carried by the user's message take precedence over
    /// `params`, so a caller can override a default value as well as the
    /// wording.
    pub fn or_default<I, K>(user: Option<DeferredMessage>, default: &str, params: I) -> Self
    where
        I: IntoIterator<Item = (K, String)>,
        K: Into<String>,
    {
        let mut msg = user.unwrap_or_else(|| Self::new(default));
        for (key, value) in params {
            msg.params.entry(key.into()).or_insert(value);
        }
        msg
    }

    /// The raw template.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Parameters supplied at construction time.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Flatten the message into a string using [`interpolate`].
    pub fn format(&self, extra: &Params) -> String {
        self.format_with(extra, &interpolate)
    }

    /// Flatten the message into a string with a custom processor.
    pub fn format_with(&self, extra: &Params, processor: &MessageProcessor) -> String {
        let mut merged = extra.clone();
        merged.extend(self.params.iter().map(|(k, v)| (k.clone(), v.clone())));
        processor(&self.template, &merged)
    }
}

impl fmt::Display for DeferredMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(&Params::new()))
    }
}

impl From<&str> for DeferredMessage {
    fn from(template: &str) -> Self {
        Self::new(template)
    }
}

impl From<String> for DeferredMessage {
    fn from(template: String) -> Self {
        Self::new(template)
    }
}

/// Replace `{key}` placeholders in `template` with values from `params`.
pub fn interpolate(template: &str, params: &Params) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if tail.starts_with("{{") || tail.starts_with("}}") {
            out.push_str(&tail[..1]);
            rest = &tail[2..];
        } else if tail.starts_with('}') {
            out.push('}');
            rest = &tail[1..];
        } else if let Some(end) = tail[1..].find('}') {
            let key = &tail[1..=end];
            match params.get(key) {
                Some(value) => out.push_str(value),
                None => {
                    tracing::warn!(placeholder = key, "no value for message placeholder");
                    out.push_str(&tail[..end + 2]);
                }
            }
            rest = &tail[end + 2..];
        } else {
            out.push_str(tail);
            rest = "";
        }
    }
    out.push_str(rest);
    out
}
