// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The immutable inputs of a verification run: reducible configurations and
//! discharging rules, read once from catalog directories.

pub mod configuration;
pub mod rule;

pub use configuration::Configuration;
pub use rule::Rule;

use crate::error::{Error, Result};
use std::path::Path;
use tracing::{info, trace};

/// Read every `.conf` file in `dir`, non-recursively.
pub fn load_configurations(dir: &Path) -> Result<Vec<Configuration>> {
    info!("reading configurations from {} ...", dir.display());
    let mut confs = Vec::new();
    for path in directory_files(dir)? {
        if path.extension().is_some_and(|ext| ext == "conf") {
            trace!("reading {}", path.display());
            confs.push(Configuration::read_file(&path)?);
        }
    }
    Ok(confs)
}

/// Read every `.rule` file in `dir`, non-recursively.
pub fn load_rules(dir: &Path) -> Result<Vec<Rule>> {
    info!("reading rules from {} ...", dir.display());
    let mut rules = Vec::new();
    for path in directory_files(dir)? {
        if path.extension().is_some_and(|ext| ext == "rule") {
            trace!("reading {}", path.display());
            rules.push(Rule::read_file(&path)?);
        }
    }
    Ok(rules)
}

fn directory_files(dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    let read_error = |source| Error::Read {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}
