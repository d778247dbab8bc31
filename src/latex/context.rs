/*!
 * Per-walk traversal state.
 *
 * One value is threaded through every recursive call of a snippet walk; the
 * translator keeps no mutable fields of its own, so sibling walks can never
 * observe each other's counters.
 */

use crate::errors::ExportWarning;

/// Mutable state carried through one snippet translation walk
#[derive(Debug, Default)]
pub struct WalkContext {
    /// Cells seen so far in the current row; reset when a row opens
    pub column_counter: usize,

    /// Position in the snippet's attached-file list; advances only on an
    /// actually-emitted image embed
    pub file_counter: usize,

    /// Set during the deferred-suffix recomputation; no asset may be
    /// materialized and no cursor advanced while this is on
    pub suppress_assets: bool,

    /// Non-fatal conditions collected during this walk
    pub warnings: Vec<ExportWarning>,
}

impl WalkContext {
    /// Fresh state for one snippet walk
    pub fn new() -> Self {
        WalkContext::default()
    }
}
