//! # Standard Validators
//!
//! Reusable building blocks for schema nodes. Plain functions ([`noop`],
//! [`all_children`], [`not_none`], ...) are validators as they are;
//! parameterised validators are built by factory functions returning a
//! [`ValidatorRef`].
//!
//! Every factory taking a `msg: Option<DeferredMessage>` falls back to a
//! default template. Defaults reference `{field.name}` and the factory's own
//! parameters, which are merged into a user-supplied message as well.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Number;

use crate::data::{Data, DataKind};
use crate::error::SchemaError;
use crate::message::DeferredMessage;
use crate::validator::{validator_ref, ValidationFailure, ValidatorRef};

type Outcome = Result<Data, ValidationFailure>;

/// Pass data through unchanged.
pub fn noop(data: Data) -> Outcome {
    Ok(data)
}

/// Require a map or sequence.
pub fn ensure_parent(data: Data) -> Outcome {
    if data.is_container() {
        Ok(data)
    } else {
        Err(ValidationFailure::new("{field.name} must be a container", data))
    }
}

/// Require that no direct child is a failure marker.
///
/// This is the default validator of map and sequence schemas. The failure
/// message is empty: the children carry the specific errors.
pub fn all_children(data: Data) -> Outcome {
    let data = ensure_parent(data)?;
    if data.children().any(Data::is_failure) {
        return Err(ValidationFailure::new("", data));
    }
    Ok(data)
}

/// Require a value other than null.
pub fn not_none(data: Data) -> Outcome {
    if data.is_null() {
        Err(ValidationFailure::new("{field.name} is required.", data))
    } else {
        Ok(data)
    }
}

/// Require a string.
pub fn ensure_str(data: Data) -> Outcome {
    check_kind(data, DataKind::String, &default_kind_message(DataKind::String))
}

/// Parse an integer from numbers, numeric strings and booleans.
///
/// Floating point numbers are truncated toward zero. Values outside the
/// `i64` and `u64` ranges are rejected rather than clamped.
pub fn as_int(data: Data) -> Outcome {
    let parsed = match &data {
        Data::Number(n) if n.is_i64() || n.is_u64() => Some(n.clone()),
        Data::Number(n) => n.as_f64().and_then(truncate_to_i64).map(Number::from),
        Data::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .map(Number::from)
                .or_else(|_| s.parse::<u64>().map(Number::from))
                .ok()
        }
        Data::Bool(b) => Some(Number::from(i64::from(*b))),
        _ => None,
    };
    match parsed {
        Some(n) => Ok(Data::Number(n)),
        None => Err(ValidationFailure::new("{field.name} must be a whole number", data)),
    }
}

fn truncate_to_i64(f: f64) -> Option<i64> {
    // 2^63 is exact in f64; the range check keeps the cast from saturating.
    const BOUND: f64 = 9_223_372_036_854_775_808.0;
    let t = f.trunc();
    (t.is_finite() && (-BOUND..BOUND).contains(&t)).then_some(t as i64)
}

/// Parse a decimal number from numbers and numeric strings.
///
/// Strings go through `f64`, so the result is lossy: trailing zeros are
/// dropped (`"1.10"` cleans to `1.1`) and digits beyond 17 significant
/// places are rounded.
pub fn as_decimal(data: Data) -> Outcome {
    let parsed = match &data {
        Data::Number(n) => Some(n.clone()),
        Data::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64),
        _ => None,
    };
    match parsed {
        Some(n) => Ok(Data::Number(n)),
        None => Err(ValidationFailure::new("{field.name} must be a decimal number", data)),
    }
}

/// Turn a boolean predicate into a validator.
///
/// Data is passed through unchanged when `predicate` holds; otherwise the
/// validator fails with `msg` and the unchanged data.
pub fn from_bool_func<P>(predicate: P, msg: impl Into<DeferredMessage>) -> ValidatorRef
where
    P: Fn(&Data) -> bool + Send + Sync + 'static,
{
    let msg = msg.into();
    Arc::new(move |data: Data| -> Outcome {
        if predicate(&data) {
            Ok(data)
        } else {
            Err(ValidationFailure::new(msg.clone(), data))
        }
    })
}

/// Pipe data through `validators` in order, stopping at the first failure.
pub fn chain(validators: impl IntoIterator<Item = ValidatorRef>) -> ValidatorRef {
    let validators: Vec<ValidatorRef> = validators.into_iter().collect();
    Arc::new(move |data: Data| -> Outcome {
        validators.iter().try_fold(data, |data, v| v.validate(data))
    })
}

/// Require the length of a string, map or sequence to lie in `min..=max`.
///
/// Strings are measured in characters. Data without a length fails.
pub fn limit_length(min: usize, max: Option<usize>, msg: Option<DeferredMessage>) -> ValidatorRef {
    match max {
        None => {
            let msg = DeferredMessage::or_default(
                msg,
                "The length of {field.name} must be at least {min}",
                [("min", min.to_string())],
            );
            from_bool_func(move |data| data.len().is_some_and(|len| min <= len), msg)
        }
        Some(max) => {
            let msg = DeferredMessage::or_default(
                msg,
                "The length of {field.name} must be between {min} and {max}",
                [("min", min.to_string()), ("max", max.to_string())],
            );
            from_bool_func(
                move |data| data.len().is_some_and(|len| min <= len && len <= max),
                msg,
            )
        }
    }
}

/// Require two entries of a map to be equal (e.g. password confirmation).
pub fn key_matcher(key1: &str, key2: &str, msg: Option<DeferredMessage>) -> ValidatorRef {
    let msg = DeferredMessage::or_default(
        msg,
        "{field.name}[{key1}] does not equal {field.name}[{key2}]",
        [("key1", key1.to_string()), ("key2", key2.to_string())],
    );
    let (key1, key2) = (key1.to_string(), key2.to_string());
    from_bool_func(
        move |data| match (data.get(&key1), data.get(&key2)) {
            // Failure markers never compare equal, themselves included.
            (Some(a), Some(b)) => !a.contains_failure() && !b.contains_failure() && a == b,
            _ => false,
        },
        msg,
    )
}

/// Require data to equal one of `values`.
pub fn one_of(values: Vec<Data>, msg: Option<DeferredMessage>) -> ValidatorRef {
    let rendered: Vec<String> = values.iter().map(|v| v.to_value().to_string()).collect();
    let msg = DeferredMessage::or_default(
        msg,
        "{field.name} must be one of {values}.",
        [("values", format!("[{}]", rendered.join(", ")))],
    );
    from_bool_func(move |data| values.contains(data), msg)
}

/// Require a value of the given kind.
pub fn ensure_kind(kind: DataKind, msg: Option<DeferredMessage>) -> ValidatorRef {
    let msg = DeferredMessage::or_default(msg, "{field.name} must be a {kind}", [("kind", kind.to_string())]);
    Arc::new(move |data: Data| -> Outcome { check_kind(data, kind, &msg) })
}

/// Require a string whose characters all belong to `char_class`.
///
/// `char_class` uses regex character-class syntax without the brackets,
/// e.g. `a-zA-Z0-9_`. The failure message lists the offending characters
/// as `{invalid_chars}`.
///
/// # Errors
///
/// Returns `SchemaError::Pattern` if the class is not a valid regex class.
pub fn limit_chars(char_class: &str, msg: Option<DeferredMessage>) -> Result<ValidatorRef, SchemaError> {
    let regex = Regex::new(&format!("[^{}]", char_class.replace(']', "\\]")))?;
    let char_class = char_class.to_string();
    let check = validator_ref(move |data: Data| -> Outcome {
        let Some(s) = data.as_str() else {
            return Ok(data);
        };
        if !regex.is_match(s) {
            return Ok(data);
        }
        let invalid: BTreeSet<&str> = regex.find_iter(s).map(|m| m.as_str()).collect();
        let invalid: String = invalid.into_iter().collect();
        let msg = DeferredMessage::or_default(
            msg.clone(),
            "Invalid characters: {invalid_chars}",
            [("invalid_chars", invalid), ("char_class", char_class.clone())],
        );
        Err(ValidationFailure::new(msg, data))
    });
    Ok(chain([validator_ref(ensure_str), check]))
}

/// Require a string containing a match for `pattern`.
///
/// # Errors
///
/// Returns `SchemaError::Pattern` if `pattern` is not a valid regex.
pub fn from_regex(pattern: &str, msg: Option<DeferredMessage>) -> Result<ValidatorRef, SchemaError> {
    let regex = Regex::new(pattern)?;
    let msg = DeferredMessage::or_default(
        msg,
        "{field.name} does not match {pattern}",
        [("pattern", pattern.to_string())],
    );
    let matcher = from_bool_func(
        move |data| data.as_str().is_some_and(|s| regex.is_match(s)),
        msg,
    );
    Ok(chain([validator_ref(ensure_str), matcher]))
}

/// Parse a date from a string in the given `chrono` format.
///
/// The cleaned value is the ISO-8601 date (`YYYY-MM-DD`).
pub fn as_date(format: &str, msg: Option<DeferredMessage>) -> ValidatorRef {
    let msg = DeferredMessage::or_default(msg, "Date must be in {format} format", [("format", format.to_string())]);
    let format = format.to_string();
    Arc::new(move |data: Data| -> Outcome {
        let parsed = data
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s, &format).ok());
        match parsed {
            Some(date) => Ok(Data::String(date.format("%Y-%m-%d").to_string())),
            None => Err(ValidationFailure::new(msg.clone(), data)),
        }
    })
}

fn default_kind_message(kind: DataKind) -> DeferredMessage {
    DeferredMessage::new("{field.name} must be a {kind}").with_param("kind", kind)
}

fn check_kind(data: Data, kind: DataKind, msg: &DeferredMessage) -> Outcome {
    if data.kind() == kind {
        Ok(data)
    } else {
        Err(ValidationFailure::new(msg.clone(), data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Params;
    use std::collections::BTreeMap;
    use serde_json::json;

    fn render(failure: &ValidationFailure, name: &str) -> String {
        let mut params = Params::new();
        params.insert("field.name".into(), name.into());
        failure.message.format(&params)
    }

    #[test]
    fn test_noop_passthrough() {
        assert_eq!(noop(Data::from("x")).unwrap(), Data::from("x"));
        assert_eq!(noop(Data::Null).unwrap(), Data::Null);
    }

    #[test]
    fn test_all_children_passes_clean_containers() {
        let data = Data::from(json!({"a": 1, "b": [2]}));
        assert_eq!(all_children(data.clone()).unwrap(), data);
        assert!(all_children(Data::from(json!([]))).is_ok());
    }

    #[test]
    fn test_all_children_fails_on_child_failure() {
        let data = Data::Seq(vec![
            Data::from(1),
            ValidationFailure::new("bad", Data::Null).into(),
        ]);
        let failure = all_children(data.clone()).unwrap_err();
        assert_eq!(failure.message.template(), "");
        assert_eq!(failure.clean_data, data);
    }

    #[test]
    fn test_all_children_requires_container() {
        let failure = all_children(Data::from("scalar")).unwrap_err();
        assert_eq!(render(&failure, "f"), "f must be a container");
    }

    #[test]
    fn test_not_none() {
        assert!(not_none(Data::from("")).is_ok());
        let failure = not_none(Data::Null).unwrap_err();
        assert_eq!(render(&failure, "email"), "email is required.");
    }

    #[test]
    fn test_as_int() {
        assert_eq!(as_int(Data::from(" 42 ")).unwrap(), Data::from(42));
        assert_eq!(as_int(Data::from(json!(3.7))).unwrap(), Data::from(3));
        assert_eq!(as_int(Data::from(true)).unwrap(), Data::from(1));
        let failure = as_int(Data::from("4x")).unwrap_err();
        assert_eq!(failure.clean_data, Data::from("4x"));
        assert_eq!(render(&failure, "age"), "age must be a whole number");
    }

    #[test]
    fn test_as_int_out_of_range() {
        assert_eq!(
            as_int(Data::from(json!(u64::MAX))).unwrap(),
            Data::from(json!(18_446_744_073_709_551_615u64))
        );
        assert_eq!(
            as_int(Data::from("18446744073709551615")).unwrap(),
            Data::from(json!(u64::MAX))
        );
        assert_eq!(as_int(Data::from(json!(-1e18))).unwrap(), Data::from(-1_000_000_000_000_000_000));
        assert!(as_int(Data::from(json!(1e20))).is_err());
        assert!(as_int(Data::from(json!(-1e20))).is_err());
        assert!(as_int(Data::from(json!(9.3e18))).is_err());
        assert!(as_int(Data::from("99999999999999999999")).is_err());
    }

    #[test]
    fn test_as_decimal() {
        assert_eq!(as_decimal(Data::from("1.25")).unwrap(), Data::from(json!(1.25)));
        assert!(as_decimal(Data::from("one")).is_err());
        assert!(as_decimal(Data::from("NaN")).is_err());
    }

    #[test]
    fn test_chain_pipes_and_short_circuits() {
        let v = chain([validator_ref(not_none), validator_ref(as_int)]);
        assert_eq!(v.validate(Data::from("7")).unwrap(), Data::from(7));
        let failure = v.validate(Data::Null).unwrap_err();
        assert_eq!(failure.message.template(), "{field.name} is required.");
    }

    #[test]
    fn test_limit_length_min_only() {
        let v = limit_length(2, None, None);
        assert!(v.validate(Data::from("ab")).is_ok());
        let failure = v.validate(Data::from("a")).unwrap_err();
        assert_eq!(render(&failure, "code"), "The length of code must be at least 2");
    }

    #[test]
    fn test_limit_length_range() {
        let v = limit_length(5, Some(5), None);
        assert!(v.validate(Data::from("12345")).is_ok());
        assert!(v.validate(Data::from("1234")).is_err());
        assert!(v.validate(Data::from(json!([1, 2, 3, 4, 5]))).is_ok());
        let failure = v.validate(Data::Null).unwrap_err();
        assert_eq!(render(&failure, "zip"), "The length of zip must be between 5 and 5");
    }

    #[test]
    fn test_limit_length_custom_message_gets_params() {
        let v = limit_length(3, None, Some("need {min}+".into()));
        let failure = v.validate(Data::from("x")).unwrap_err();
        assert_eq!(render(&failure, "x"), "need 3+");
    }

    #[test]
    fn test_key_matcher() {
        let v = key_matcher("password", "confirm", None);
        assert!(v.validate(Data::from(json!({"password": "a", "confirm": "a"}))).is_ok());
        let failure = v
            .validate(Data::from(json!({"password": "a", "confirm": "b"})))
            .unwrap_err();
        assert_eq!(
            render(&failure, "account"),
            "account[password] does not equal account[confirm]"
        );
    }

    #[test]
    fn test_key_matcher_failures_never_match() {
        let v = key_matcher("password", "confirm", None);
        let missing = || Data::from(not_none(Data::Null).unwrap_err());
        let mut both_failed = BTreeMap::new();
        both_failed.insert("password".to_string(), missing());
        both_failed.insert("confirm".to_string(), missing());
        assert!(v.validate(Data::Map(both_failed)).is_err());

        let nested = || Data::Seq(vec![Data::from("a"), missing()]);
        let mut nested_failed = BTreeMap::new();
        nested_failed.insert("password".to_string(), nested());
        nested_failed.insert("confirm".to_string(), nested());
        assert!(v.validate(Data::Map(nested_failed)).is_err());
    }

    #[test]
    fn test_one_of() {
        let v = one_of(vec![Data::from("red"), Data::from("blue")], None);
        assert!(v.validate(Data::from("red")).is_ok());
        let failure = v.validate(Data::from("green")).unwrap_err();
        assert_eq!(render(&failure, "colour"), r#"colour must be one of ["red", "blue"]."#);
    }

    #[test]
    fn test_ensure_kind() {
        assert!(ensure_str(Data::from("s")).is_ok());
        let failure = ensure_str(Data::from(1)).unwrap_err();
        assert_eq!(render(&failure, "name"), "name must be a string");
        let v = ensure_kind(DataKind::Seq, None);
        assert!(v.validate(Data::from(json!([]))).is_ok());
        assert!(v.validate(Data::from(json!({}))).is_err());
    }

    #[test]
    fn test_limit_chars() {
        let v = limit_chars("a-z", None).unwrap();
        assert!(v.validate(Data::from("abc")).is_ok());
        let failure = v.validate(Data::from("a$b#$")).unwrap_err();
        assert_eq!(render(&failure, "slug"), "Invalid characters: #$");
        assert_eq!(failure.message.params()["char_class"], "a-z");
        assert!(v.validate(Data::from(5)).is_err());
    }

    #[test]
    fn test_from_regex() {
        let v = from_regex("^[0-9]+$", None).unwrap();
        assert!(v.validate(Data::from("0123")).is_ok());
        let failure = v.validate(Data::from("12a")).unwrap_err();
        assert_eq!(render(&failure, "tel"), "tel does not match ^[0-9]+$");
        assert!(from_regex("(", None).is_err());
    }

    #[test]
    fn test_as_date() {
        let v = as_date("%d/%m/%Y", None);
        assert_eq!(v.validate(Data::from("31/12/2024")).unwrap(), Data::from("2024-12-31"));
        let failure = v.validate(Data::from("2024-12-31")).unwrap_err();
        assert_eq!(render(&failure, "dob"), "Date must be in %d/%m/%Y format");
    }

    #[test]
    fn test_from_bool_func() {
        let v = from_bool_func(|d| d == &Data::from("1"), "must be one");
        assert!(v.validate(Data::from("1")).is_ok());
        assert!(v.validate(Data::from("2")).is_err());
    }
}
