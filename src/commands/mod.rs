//! The registry-gate run.
//!
//! Checks the input files, loads the access list, rules and registry,
//! assembles the request report and prints it.

use crate::access::load_access_list;
use crate::cli::Cli;
use crate::config::Config;
use crate::error::{GateError, Result};
use crate::git::GitCli;
use crate::http::HttpProbe;
use crate::registry::Registry;
use crate::request::{Request, RequestAssembler};
use log::{debug, warn};
use std::path::Path;

/// Execute a run and print the JSON report to stdout.
pub fn run(cli: &Cli) -> Result<()> {
    let request = build_request(cli)?;
    println!("{}", request.to_json()?);
    Ok(())
}

/// Build the report without printing it.
pub fn build_request(cli: &Cli) -> Result<Request> {
    let access_list_path = cli.access_list_path();
    let list_path = cli.list_path();

    require_file(&access_list_path, || "Access control file not found".to_string())?;
    require_file(&cli.diff_path, || "diff file not found".to_string())?;
    require_file(&list_path, || {
        format!("list file {} not found", list_path.display())
    })?;

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let access_list = load_access_list(&access_list_path)?;
    let registry = Registry::load(&list_path)?;
    if registry.is_empty() {
        warn!("registry {} lists no libraries", list_path.display());
    }
    debug!(
        "loaded {} access entries and {} registry URLs",
        access_list.len(),
        registry.len()
    );

    let probe = HttpProbe::new();
    let git = GitCli::new();
    let assembler = RequestAssembler {
        config: &config,
        access_list: &access_list,
        registry: &registry,
        probe: &probe,
        git: &git,
    };

    assembler.assemble(&cli.submitter, &cli.list_name, || read_diff(&cli.diff_path))
}

fn require_file(path: &Path, message: impl FnOnce() -> String) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(GateError::UserError(message()))
    }
}

fn read_diff(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        GateError::IoError(format!("failed to read diff '{}': {}", path.display(), e))
    })
}
