//! # dotform CLI entry point
//!
//! Parses command-line arguments, initializes logging and dispatches to
//! subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dotform_cli::expand::{run_expand, run_flatten, ExpandArgs, FlattenArgs};
use dotform_cli::validate::{run_validate, ValidateArgs};

/// Expand, flatten and validate dotted form submissions.
#[derive(Parser, Debug)]
#[command(name = "dotform", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Expand a flat object with dotted/coloned keys into nested data.
    Expand(ExpandArgs),

    /// Flatten nested data into dotted/coloned keys.
    Flatten(FlattenArgs),

    /// Validate a flat submission against a schema document.
    Validate(ValidateArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    tracing::debug!("dotform CLI starting");

    let result = match cli.command {
        Commands::Expand(args) => run_expand(&args),
        Commands::Flatten(args) => run_flatten(&args),
        Commands::Validate(args) => run_validate(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

/// `RUST_LOG` wins over `-v` when set.
fn init_tracing(verbose: u8, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_expand_defaults() {
        let cli = Cli::try_parse_from(["dotform", "expand"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert!(!cli.log_json);
        if let Commands::Expand(args) = cli.command {
            assert!(args.input.is_none());
            assert!(!args.compact);
        } else {
            panic!("expected expand");
        }
    }

    #[test]
    fn cli_parse_flatten_with_input() {
        let cli = Cli::try_parse_from(["dotform", "flatten", "--input", "nested.json", "--compact"])
            .unwrap();
        if let Commands::Flatten(args) = cli.command {
            assert_eq!(args.input.unwrap().to_str(), Some("nested.json"));
            assert!(args.compact);
        } else {
            panic!("expected flatten");
        }
    }

    #[test]
    fn cli_parse_validate() {
        let cli = Cli::try_parse_from([
            "dotform",
            "-vv",
            "--log-json",
            "validate",
            "--schema",
            "signup.yaml",
            "--input",
            "form.json",
            "--overrides",
            "extra.json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.log_json);
        if let Commands::Validate(args) = cli.command {
            assert_eq!(args.schema.to_str(), Some("signup.yaml"));
            assert_eq!(args.input.unwrap().to_str(), Some("form.json"));
            assert_eq!(args.overrides.unwrap().to_str(), Some("extra.json"));
        } else {
            panic!("expected validate");
        }
    }

    #[test]
    fn cli_parse_validate_requires_schema() {
        assert!(Cli::try_parse_from(["dotform", "validate"]).is_err());
    }

    #[test]
    fn cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["dotform", "expand", "-v"]).unwrap();
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn cli_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["dotform", "lock"]).is_err());
    }
}
