//! Command-line front end for branchfile
//!
//! Loads a root document, resolves one branch spec against it and prints the
//! check result, the parsed and expanded specs, the serial form and finally
//! the applied document.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

use anyhow::{Context, Result};
use branchfile_core::{InvalidTag, Outcome, Pipeline, PipelineConfig};
use branchfile_model::Root;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Output format of the applied document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    /// Parse a `--format` value
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "json" => Some(Self::Json),
            "yaml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// One parsed command line
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub path: PathBuf,
    pub spec: String,
    pub config: PipelineConfig,
    pub format: OutputFormat,
    pub verbose: bool,
}

impl Invocation {
    /// Read an invocation back out of [`command`] matches
    ///
    /// # Errors
    /// Returns error if a required argument is missing.
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let path = matches
            .get_one::<PathBuf>("path")
            .cloned()
            .context("missing document path")?;
        let spec = matches.get_one::<String>("spec").cloned().unwrap_or_default();

        let mut config = PipelineConfig::new().with_strict(matches.get_flag("strict"));
        if let Some(seed) = matches.get_one::<u64>("seed") {
            config = config.with_seed(*seed);
        }

        let format = matches
            .get_one::<String>("format")
            .and_then(|name| OutputFormat::from_name(name))
            .unwrap_or_default();

        Ok(Self {
            path,
            spec,
            config,
            format,
            verbose: matches.get_flag("verbose"),
        })
    }
}

/// Argument definitions for the `branchfile` binary
#[must_use]
pub fn command() -> Command {
    Command::new("branchfile")
        .version(branchfile_core::VERSION)
        .about("Expand a branch spec and apply it to a document")
        .arg(
            Arg::new("path")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Path to the root document (YAML, or JSON with a .json extension)"),
        )
        .arg(
            Arg::new("spec")
                .help("Branch spec, e.g. sab.mS (empty draws every key)"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_parser(value_parser!(u64))
                .help("Random seed for reproducible expansion"),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .action(ArgAction::SetTrue)
                .help("Fail when the spec names unknown tags"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .default_value("json")
                .value_parser(["json", "yaml"])
                .help("Output format of the applied document"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log debug events to stderr"),
        )
}

/// Install the stderr subscriber
///
/// `RUST_LOG` is honoured unless `verbose` forces `debug`.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load, resolve and print one invocation
///
/// # Errors
/// Returns error if the document cannot be loaded, the branch declarations
/// are invalid, or the spec cannot be resolved.
pub fn run(invocation: &Invocation, out: &mut impl Write) -> Result<()> {
    let root = Root::from_path(&invocation.path)
        .with_context(|| format!("failed to load {}", invocation.path.display()))?;
    tracing::debug!(
        path = %invocation.path.display(),
        branches = root.branches.len(),
        "loaded root document"
    );
    let pipeline =
        Pipeline::new(&root, invocation.config.clone()).context("invalid branch declarations")?;
    let outcome = pipeline
        .run_seeded(&invocation.spec)
        .with_context(|| format!("failed to resolve spec '{}'", invocation.spec))?;
    write_outcome(&outcome, invocation.format, out)
}

/// Print an outcome in the report layout
///
/// # Errors
/// Returns error on serialization or write failure.
pub fn write_outcome(outcome: &Outcome, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    writeln!(out, "check [{}]", join_pairs(&outcome.invalid))?;
    writeln!(out, "spec {}", serde_json::to_string(&outcome.partial)?)?;
    writeln!(out, "expanded {}", serde_json::to_string(&outcome.expanded)?)?;
    writeln!(out, "serial {}", outcome.serial)?;

    let body = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&outcome.document)?,
        OutputFormat::Yaml => serde_yaml::to_string(&outcome.document)?,
    };
    writeln!(out, "{}", body.trim_end())?;
    Ok(())
}

fn join_pairs(pairs: &[InvalidTag]) -> String {
    pairs
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_from_minimal_command_line() {
        let matches = command().try_get_matches_from(["branchfile", "doc.yml"]).unwrap();
        let invocation = Invocation::from_matches(&matches).unwrap();
        assert_eq!(invocation.path, PathBuf::from("doc.yml"));
        assert_eq!(invocation.spec, "");
        assert_eq!(invocation.config, PipelineConfig::default());
        assert_eq!(invocation.format, OutputFormat::Json);
        assert!(!invocation.verbose);
    }

    #[test]
    fn flags_reach_pipeline_config() {
        let matches = command()
            .try_get_matches_from([
                "branchfile", "doc.yml", "sab", "--seed", "7", "--strict", "--format", "yaml", "-v",
            ])
            .unwrap();
        let invocation = Invocation::from_matches(&matches).unwrap();
        assert_eq!(invocation.spec, "sab");
        assert_eq!(invocation.config, PipelineConfig::new().with_seed(7).with_strict(true));
        assert_eq!(invocation.format, OutputFormat::Yaml);
        assert!(invocation.verbose);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let result = command().try_get_matches_from(["branchfile", "doc.yml", "--format", "toml"]);
        assert!(result.is_err());
    }

    #[test]
    fn pairs_join_in_order() {
        let pairs = vec![InvalidTag::new("s", "q"), InvalidTag::new("t", "A")];
        assert_eq!(join_pairs(&pairs), "(s, q), (t, A)");
        assert_eq!(join_pairs(&[]), "");
    }
}
