//! Error types. Every condition here is recoverable: the tree is left exactly as it was and the
//! caller decides how to surface the notice.

use std::path::PathBuf;

use thiserror::Error;

/// Why a structural operation on a [`Tree`](crate::tree::Tree) did nothing.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// `insert` was given a value the tree already holds.
    #[error("value already exists")]
    DuplicateValue,
    /// `delete` was given a value the tree doesn't hold.
    #[error("value not found")]
    ValueNotFound,
}

/// User entry that couldn't be turned into a tree value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The entry is not an integer.
    #[error("enter a valid number (got {0:?})")]
    InvalidNumber(String),
    /// The word names no traversal order.
    #[error("unknown traversal order {0:?}, expected inorder, preorder or postorder")]
    UnknownOrder(String),
    /// The word names no command.
    #[error("unknown command {0:?}, try `help`")]
    UnknownCommand(String),
}

/// Why a configuration could not be used.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML for a config.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// The values parsed but are out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}
