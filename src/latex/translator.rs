/*!
 * Recursive document-tree-to-LaTeX translator.
 *
 * The walk is depth-first and post-order: children are translated first, then
 * the node's own directive is composed around their concatenated output. The
 * only suspension points are asset extractions, each awaited before the walk
 * moves to the next sibling so the file cursor and destination paths stay
 * in document order.
 */

use futures::future::BoxFuture;
use log::warn;
use std::path::PathBuf;
use std::sync::Arc;

use crate::dom::{Element, Node};
use crate::errors::ExportWarning;
use crate::latex::assets::AssetExtractor;
use crate::latex::context::WalkContext;
use crate::latex::escape::escape_special;
use crate::latex::rules::{self, Directive, Tag, CENTER_CLOSE, CENTER_OPEN, VERBATIM_OPEN, VERBATIM_CLOSE};
use crate::parser::FragmentParser;
use crate::snippet::{LinkType, Snippet};
use crate::store::ContentStore;

/// Translates snippet content into LaTeX for one export job
pub struct Translator {
    parser: Arc<dyn FragmentParser>,
    extractor: AssetExtractor,
    asset_dir: PathBuf,
}

impl Translator {
    /// Create a translator extracting assets into `asset_dir`
    pub fn new<P: Into<PathBuf>>(
        parser: Arc<dyn FragmentParser>,
        store: Arc<dyn ContentStore>,
        asset_dir: P,
    ) -> Self {
        let asset_dir = asset_dir.into();
        Translator {
            parser,
            extractor: AssetExtractor::new(store, asset_dir.clone()),
            asset_dir,
        }
    }

    /// Translate one snippet's content.
    ///
    /// Quote and comment subsnippets get their whole output wrapped in the
    /// matching highlight block. Content the parser cannot handle degrades to
    /// a literal block instead of failing the job. Warnings found during the
    /// walk are appended to `warnings`.
    pub async fn translate_snippet(
        &self,
        snippet: &Snippet,
        warnings: &mut Vec<ExportWarning>,
    ) -> String {
        let mut ctx = WalkContext::new();

        let body_content = match self.parser.parse(&snippet.textcontent) {
            Ok(Node::Element(body)) => self.walk_children(snippet, &body, &mut ctx).await,
            // A parser may hand back a bare text node for plain content
            Ok(Node::Text(text)) => escape_special(&text),
            Err(err) => {
                warn!("fragment parse failed, emitting literal block: {}", err);
                let fallback = format!("{}{}{}", VERBATIM_OPEN, snippet.textcontent, VERBATIM_CLOSE);
                ctx.warnings.push(ExportWarning::Parse(err));
                fallback
            }
        };

        warnings.append(&mut ctx.warnings);

        match snippet.link_type {
            LinkType::None => body_content,
            link => {
                let directive = rules::link_directive(link);
                format!("{}{}{}", directive.prefix, body_content, directive.suffix)
            }
        }
    }

    /// Depth-first post-order walk over an element's children.
    ///
    /// Returns the concatenated translated output of the subtree.
    fn walk_children<'a>(
        &'a self,
        snippet: &'a Snippet,
        element: &'a Element,
        ctx: &'a mut WalkContext,
    ) -> BoxFuture<'a, String> {
        Box::pin(async move {
            let mut content = String::new();

            for child in &element.children {
                match child {
                    Node::Text(text) => content.push_str(&escape_special(text)),
                    Node::Element(el) => {
                        let tag = Tag::from_name(&el.tag);
                        let mut directive =
                            rules::directive_for(&tag, el, ctx, snippet, &self.asset_dir);

                        if let Tag::Other(name) = &tag {
                            warn!("unrecognized tag <{}>", name);
                            ctx.warnings.push(ExportWarning::UnrecognizedTag(name.clone()));
                        }

                        rules::update_column_counter(&tag, ctx);

                        // Materialize the embed's binary before walking on;
                        // the file cursor and asset paths are order-dependent
                        if let Some(asset) = directive.asset.take() {
                            if !ctx.suppress_assets {
                                match self.extractor.extract(&asset.file_id, &asset.extension).await
                                {
                                    Ok(_) => ctx.file_counter += 1,
                                    Err(err) => {
                                        warn!("asset extraction failed: {}", err);
                                        ctx.warnings.push(ExportWarning::Extraction(err));
                                        // The embed is omitted; the cursor stays put
                                        directive = Directive::default();
                                    }
                                }
                            }
                        }

                        let child_content = self.walk_children(snippet, el, ctx).await;

                        if directive.deferred_suffix {
                            // The column spec is only known after the subtree
                            // scan; the recomputation must not touch assets
                            ctx.suppress_assets = true;
                            directive =
                                rules::directive_for(&tag, el, ctx, snippet, &self.asset_dir);
                            ctx.suppress_assets = false;
                        }

                        content = compose(&directive, &child_content, content);
                    }
                }
            }

            content
        })
    }
}

/// Combine a directive with already-produced child content, appending onto
/// the accumulated sibling output.
fn compose(directive: &Directive, child_content: &str, mut accumulated: String) -> String {
    if directive.prefix == VERBATIM_OPEN && child_content.starts_with(VERBATIM_OPEN) {
        // Two literal blocks merge into one instead of nesting
        accumulated.push_str(child_content);
    } else if directive.prefix.starts_with("\\href{") && child_content.contains(CENTER_OPEN) {
        // The link wraps the inside of the centered block, not around it
        let insert_at = child_content
            .rfind(CENTER_OPEN)
            .map(|pos| pos + CENTER_OPEN.len())
            .unwrap_or(0);
        let mut spliced = String::with_capacity(
            child_content.len() + directive.prefix.len() + directive.suffix.len(),
        );
        spliced.push_str(&child_content[..insert_at]);
        spliced.push_str(&directive.prefix);
        spliced.push_str(&child_content[insert_at..]);
        if let Some(close_at) = spliced.find(CENTER_CLOSE) {
            spliced.insert_str(close_at, &directive.suffix);
        }
        accumulated.push_str(&spliced);
    } else {
        accumulated.push_str(&directive.prefix);
        accumulated.push_str(child_content);
        if directive.splice < 0 {
            // Drop the trailing characters the splice asks for, typically the
            // last cell separator before a row closes
            for _ in 0..directive.splice.unsigned_abs() {
                accumulated.pop();
            }
        }
        accumulated.push_str(&directive.suffix);
    }
    accumulated
}
