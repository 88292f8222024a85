//! # dotform-cli: Command-Line Interface for dotform
//!
//! Provides the `dotform` binary. Every subcommand reads JSON from a file or
//! standard input and writes JSON to standard output; logs go to standard
//! error.
//!
//! ## Subcommands
//!
//! - `dotform expand`: Decode dotted/coloned form keys into nested data.
//! - `dotform flatten`: Encode nested data back into form keys.
//! - `dotform validate`: Bind a submission to a schema document and report
//!   cleaned data or per-field errors.
//!
//! ```bash
//! dotform expand --input form.json
//! dotform validate --schema signup.yaml --input form.json --overrides extra.json
//! ```

pub mod expand;
pub mod input;
pub mod validate;
