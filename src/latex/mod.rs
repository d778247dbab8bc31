/*!
 * LaTeX rendering engine.
 *
 * This module contains the document-tree-to-markup translation core, split
 * into several submodules:
 *
 * - `rules`: the tag rule table mapping DOM tags to directives
 * - `context`: per-walk traversal state
 * - `escape`: literal-text escaping
 * - `assets`: binary asset extraction from the content store
 * - `translator`: the recursive depth-first walk
 * - `document`: snippet ordering and document header/footer
 */

// Re-export main types for easier usage
pub use self::assets::AssetExtractor;
pub use self::context::WalkContext;
pub use self::document::{document_footer, document_header, write_document};
pub use self::escape::escape_special;
pub use self::rules::{directive_for, link_directive, AssetRef, Directive, Tag};
pub use self::translator::Translator;

// Submodules
pub mod assets;
pub mod context;
pub mod document;
pub mod escape;
pub mod rules;
pub mod translator;
