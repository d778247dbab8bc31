/*!
 * Error types for the labtex application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when resolving a binary through a content store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store has no binary under the given identifier
    #[error("file {0} not found in content store")]
    NotFound(String),

    /// The store could be reached but reading failed
    #[error("content store I/O failure: {0}")]
    Io(#[from] io::Error),
}

/// Errors that can occur while materializing an attached binary asset
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The content store could not resolve the file identifier
    #[error("could not resolve file {file_id}: {source}")]
    Resolve {
        /// Identifier of the binary in the content store
        file_id: String,
        #[source]
        source: StoreError,
    },

    /// The binary resolved but could not be written to the asset directory
    #[error("could not write asset for file {file_id}: {source}")]
    Write {
        /// Identifier of the binary in the content store
        file_id: String,
        #[source]
        source: io::Error,
    },
}

/// Error raised by a fragment parser on content it cannot turn into a tree
#[derive(Error, Debug)]
pub enum ParseError {
    /// The content could not be parsed into a document fragment
    #[error("malformed fragment: {0}")]
    Malformed(String),
}

/// Errors from the external document compile step
#[derive(Error, Debug)]
pub enum CompileError {
    /// The compiler binary could not be started
    #[error("failed to launch compiler: {0}")]
    Launch(#[from] io::Error),

    /// The compiler ran past the configured deadline
    #[error("compiler timed out after {0}s")]
    Timeout(u64),

    /// The compiler finished but the output document is missing
    #[error("compiler produced no output document")]
    NoOutput,
}

/// Fatal errors that abort an export job
#[derive(Error, Debug)]
pub enum ExportError {
    /// An output or asset directory could not be created
    #[error("failed to create directory {path}: {source}")]
    Directory {
        /// Directory that could not be created
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing the markup file failed mid-stream
    #[error("failed writing markup file {path}: {source}")]
    Stream {
        /// Markup file being written
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Non-fatal conditions accumulated while an export job runs
#[derive(Error, Debug)]
pub enum ExportWarning {
    /// A tag without a translation rule was emitted as a literal block
    #[error("unrecognized tag <{0}>, emitted as literal block")]
    UnrecognizedTag(String),

    /// An image embed was dropped because its binary could not be materialized
    #[error("image skipped: {0}")]
    Extraction(#[from] ExtractionError),

    /// Snippet content degraded to a literal block because parsing failed
    #[error("content emitted as literal block: {0}")]
    Parse(#[from] ParseError),

    /// The external compile step did not produce a document
    #[error("compile step failed: {0}")]
    Compile(#[from] CompileError),

    /// The external archive step did not produce a bundle
    #[error("bundle step failed: {0}")]
    Bundle(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Fatal export job error
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// Error from a file operation
    #[error("file error: {0}")]
    File(String),

    /// Any other error
    #[error("unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<io::Error> for AppError {
    fn from(error: io::Error) -> Self {
        Self::File(error.to_string())
    }
}
