//! # Expand & Flatten Subcommands
//!
//! ```bash
//! # Decode dotted form keys into a nested document:
//! echo '{"address.zip": "02139", "tags:0": "a"}' | dotform expand
//!
//! # And back again:
//! dotform flatten --input nested.json
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use dotform_core::{expand, flatten, FlatInput};
use serde_json::Value;

use crate::input::read_object;

/// Arguments for the expand subcommand.
#[derive(Args, Debug)]
pub struct ExpandArgs {
    /// Flat JSON object with dotted/coloned keys. Reads stdin if omitted.
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Print compact JSON instead of pretty-printed JSON.
    #[arg(long)]
    pub compact: bool,
}

/// Arguments for the flatten subcommand.
#[derive(Args, Debug)]
pub struct FlattenArgs {
    /// Nested JSON object. Reads stdin if omitted.
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Print compact JSON instead of pretty-printed JSON.
    #[arg(long)]
    pub compact: bool,
}

/// Execute the expand subcommand.
pub fn run_expand(args: &ExpandArgs) -> Result<u8> {
    let flat = read_object(args.input.as_deref())?;
    let nested = expand_object(&flat)?;
    println!("{}", render(&nested, args.compact)?);
    Ok(0)
}

/// Execute the flatten subcommand.
pub fn run_flatten(args: &FlattenArgs) -> Result<u8> {
    let nested = read_object(args.input.as_deref())?;
    let flat = Value::Object(flatten(&nested));
    println!("{}", render(&flat, args.compact)?);
    Ok(0)
}

/// Expand a flat object into a nested JSON value.
pub fn expand_object(flat: &FlatInput) -> Result<Value> {
    let nested = expand(flat)?;
    tracing::debug!(keys = flat.len(), roots = nested.len(), "expanded input");
    Ok(Value::Object(nested))
}

pub(crate) fn render(value: &Value, compact: bool) -> Result<String> {
    Ok(if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    })
}
