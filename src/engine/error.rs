//! Error types raised by the nickname engine.
//!
//! None of these are fatal. Callers log them and carry on.

use std::path::PathBuf;
use thiserror::Error;

use super::mode::Mode;

/// The name pool file exists but could not be read.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("failed to read name pool from {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A mode switch was requested to the mode that is already active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("mode is already {0}")]
pub struct AlreadySet(pub Mode);

/// Every pool name is held by another member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("every name in the pool is currently in use")]
pub struct NoneAvailable;

/// The live member snapshot could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("member snapshot unavailable: {0}")]
pub struct SnapshotError(pub String);
