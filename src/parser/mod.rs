/*!
 * Fragment parsers turning raw snippet content into the minimal DOM.
 *
 * Parsing itself is an external concern; the translator only requires a tree
 * satisfying `dom::Node`. The trait below is the seam, `html5` the bundled
 * adapter.
 */

use std::fmt::Debug;

use crate::dom::Node;
use crate::errors::ParseError;

/// Common trait for all fragment parsers
pub trait FragmentParser: Send + Sync + Debug {
    /// Parse an HTML fragment into a tree rooted at the fragment body
    ///
    /// # Arguments
    /// * `content` - Raw embedded-markup content of one snippet
    ///
    /// # Returns
    /// * `Result<Node, ParseError>` - The body element or a parse error
    fn parse(&self, content: &str) -> Result<Node, ParseError>;
}

pub mod html5;

pub use html5::Html5Parser;
