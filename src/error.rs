// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Error kinds crossing the library boundary.
//!
//! Parse and I/O errors propagate to the CLI, which logs them and exits
//! nonzero. Invariant violations (too many diagonals, conflicting matcher
//! assignments, a mandatory edge missing) are programmer bugs and abort via
//! `assert!`; they never surface as [`Error`].

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to parse {input:?} as a degree")]
    InvalidDegree { input: String },

    #[error("malformed {kind} file {path}: {message}")]
    Malformed {
        kind: &'static str,
        path: PathBuf,
        message: String,
    },

    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
