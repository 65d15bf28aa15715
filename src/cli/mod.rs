//! CLI argument parsing for registry-gate.
//!
//! Uses clap derive macros for declarative argument definitions.
//! The run itself lives in the `commands` module.

use clap::builder::NonEmptyStringValueParser;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Registry-gate: checks a pull request against a library registry.
///
/// Reads the pull request diff, validates every submitted repository URL
/// and prints a single-line JSON report to stdout.
#[derive(Parser, Debug)]
#[command(name = "registry-gate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Access control file, relative to --repopath.
    #[arg(long = "accesslist", value_name = "PATH")]
    pub access_list: PathBuf,

    /// Pull request diff file.
    #[arg(long = "diffpath", value_name = "PATH")]
    pub diff_path: PathBuf,

    /// Path to the registry repository checkout.
    #[arg(long = "repopath", value_name = "DIR")]
    pub repo_path: PathBuf,

    /// Registry list file, relative to --repopath.
    #[arg(long = "listname", value_name = "PATH", value_parser = NonEmptyStringValueParser::new())]
    pub list_name: String,

    /// Account name of the pull request author.
    #[arg(long, value_name = "NAME", value_parser = NonEmptyStringValueParser::new())]
    pub submitter: String,

    /// Rules file overriding the built-in hosts and organizations.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log progress to stderr.
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub verbose: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn access_list_path(&self) -> PathBuf {
        self.repo_path.join(&self.access_list)
    }

    pub fn list_path(&self) -> PathBuf {
        self.repo_path.join(&self.list_name)
    }
}
