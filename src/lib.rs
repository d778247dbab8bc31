/*!
 * # labtex
 *
 * A Rust library for exporting rich-text lab-notebook snippets to LaTeX.
 *
 * ## Features
 *
 * - Translate embedded HTML snippet content into LaTeX through a recursive
 *   tag-rule-driven tree walk
 * - Extract attached binaries (images) from a content store into the job's
 *   asset directory while walking
 * - Order quote and comment subsnippets around each entry and wrap the
 *   result in a complete compilable document
 * - Invoke an external compiler and archiver as optional post-processing
 * - Accumulate per-job warnings instead of failing on degraded content
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `snippet`: Snippet and file-reference data model
 * - `dom`: Minimal structural DOM consumed by the translator
 * - `parser`: Fragment parser seam and the html5ever adapter
 * - `store`: Content-store seam and the filesystem client
 * - `latex`: The translation engine:
 *   - `latex::rules`: tag rule table
 *   - `latex::translator`: recursive walk
 *   - `latex::assets`: asset extraction
 *   - `latex::document`: document assembly
 * - `app_controller`: Export orchestrator
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod dom;
pub mod errors;
pub mod file_utils;
pub mod latex;
pub mod parser;
pub mod snippet;
pub mod store;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, ExportOutcome};
pub use dom::{Element, Node};
pub use errors::{
    AppError, CompileError, ExportError, ExportWarning, ExtractionError, ParseError, StoreError,
};
pub use latex::Translator;
pub use parser::{FragmentParser, Html5Parser};
pub use snippet::{FileRef, FileStyle, LinkType, Snippet};
pub use store::{ContentStore, FsStore};
