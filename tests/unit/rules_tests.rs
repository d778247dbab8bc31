/*!
 * Tests for the tag rule table
 */

use std::path::Path;

use labtex::dom::{Element, Node};
use labtex::latex::{directive_for, link_directive, Tag, WalkContext};
use labtex::snippet::{LinkType, Snippet};

use crate::common;

fn element(tag: &str, attrs: &[(&str, &str)]) -> Element {
    match Node::element(tag, attrs, Vec::new()) {
        Node::Element(el) => el,
        Node::Text(_) => unreachable!(),
    }
}

fn lookup(tag_name: &str, attrs: &[(&str, &str)]) -> labtex::latex::Directive {
    let el = element(tag_name, attrs);
    let ctx = WalkContext::new();
    let snippet = Snippet::default();
    directive_for(&Tag::from_name(tag_name), &el, &ctx, &snippet, Path::new("images"))
}

/// Test that repeated lookups with identical inputs return identical directives
#[test]
fn test_directive_for_withIdenticalInputs_shouldBePure() {
    let el = element("table", &[]);
    let mut ctx = WalkContext::new();
    ctx.column_counter = 3;
    let snippet = Snippet::default();

    let first = directive_for(&Tag::Table, &el, &ctx, &snippet, Path::new("images"));
    let second = directive_for(&Tag::Table, &el, &ctx, &snippet, Path::new("images"));

    assert_eq!(first, second);
}

/// Test that the top heading level carries no wrap
#[test]
fn test_directive_for_withH1_shouldEmitNoWrap() {
    let directive = lookup("h1", &[]);
    assert!(directive.prefix.is_empty());
    assert!(directive.suffix.is_empty());
}

/// Test the section mappings of the remaining heading levels
#[test]
fn test_directive_for_withHeadings_shouldEmitSectionWraps() {
    assert_eq!(lookup("h2", &[]).prefix, "\\section{");
    assert_eq!(lookup("h3", &[]).prefix, "\\subsection{");
    assert_eq!(lookup("h4", &[]).prefix, "\\subsubsection{");
}

/// Test that the table column spec carries one marker per counted column
#[test]
fn test_directive_for_withTable_shouldBuildColumnSpecFromCounter() {
    let el = element("table", &[]);
    let mut ctx = WalkContext::new();
    ctx.column_counter = 3;
    let snippet = Snippet::default();

    let directive = directive_for(&Tag::Table, &el, &ctx, &snippet, Path::new("images"));

    assert!(directive.prefix.starts_with("\\begin{tabular}{|c|c|c|}"));
    assert!(directive.deferred_suffix);
}

/// Test that a row directive splices away the trailing cell separator
#[test]
fn test_directive_for_withRow_shouldSpliceOneTrailingCharacter() {
    let directive = lookup("tr", &[]);
    assert_eq!(directive.splice, -1);
    assert_eq!(directive.suffix, "\\\\\\hline\r\n");
}

/// Test that data and header cells both emit the trailing separator
#[test]
fn test_directive_for_withCells_shouldEmitSeparator() {
    assert_eq!(lookup("td", &[]).suffix, "&");
    assert_eq!(lookup("th", &[]).suffix, "&");
}

/// Test that rows reset and cells advance the column counter
#[test]
fn test_update_column_counter_withRowAndCells_shouldTrackColumns() {
    let mut ctx = WalkContext::new();

    labtex::latex::rules::update_column_counter(&Tag::Tr, &mut ctx);
    assert_eq!(ctx.column_counter, 0);
    labtex::latex::rules::update_column_counter(&Tag::Td, &mut ctx);
    labtex::latex::rules::update_column_counter(&Tag::Th, &mut ctx);
    assert_eq!(ctx.column_counter, 2);
    labtex::latex::rules::update_column_counter(&Tag::Tr, &mut ctx);
    assert_eq!(ctx.column_counter, 0);
}

/// Test that a highlight color rides in on the class suffix
#[test]
fn test_directive_for_withMarkClass_shouldEmitColorBox() {
    let directive = lookup("mark", &[("class", "marker-yellow")]);
    assert_eq!(directive.prefix, "\\colorbox{yellow}{");
    assert_eq!(directive.suffix, "}");
}

/// Test that a mark without a color suffix emits no wrap
#[test]
fn test_directive_for_withMarkWithoutColor_shouldEmitNoWrap() {
    assert_eq!(lookup("mark", &[("class", "plain")]).prefix, "");
    assert_eq!(lookup("mark", &[]).prefix, "");
}

/// Test that hyperlinks carry their target
#[test]
fn test_directive_for_withAnchor_shouldCarryTarget() {
    let directive = lookup("a", &[("href", "https://example.com/run/4")]);
    assert_eq!(directive.prefix, "\\href{https://example.com/run/4}{");
}

/// Test that a figure frames image-classified files and centers the rest
#[test]
fn test_directive_for_withFigure_shouldFrameOnlyImages() {
    let el = element("figure", &[]);
    let ctx = WalkContext::new();

    let mut snippet = Snippet::default();
    snippet.files.push(common::image_file_ref("h1", "f1", None));
    let framed = directive_for(&Tag::Figure, &el, &ctx, &snippet, Path::new("images"));
    assert!(framed.prefix.starts_with("\\begin{figure}[H]"));

    snippet.files[0].file_extension = "application/pdf".to_string();
    let centered = directive_for(&Tag::Figure, &el, &ctx, &snippet, Path::new("images"));
    assert_eq!(centered.prefix, "\\begin{center}\r\n");
}

/// Test that an image placeholder resolves through its title hash
#[test]
fn test_directive_for_withImage_shouldResolveFileByHash() {
    let el = element("img", &[("title", "h1")]);
    let ctx = WalkContext::new();
    let mut snippet = Snippet::default();
    snippet.files.push(common::image_file_ref("h1", "f1", Some("50%")));

    let directive = directive_for(&Tag::Img, &el, &ctx, &snippet, Path::new("images"));

    assert!(directive.prefix.contains("width=0.50\\linewidth"));
    assert!(directive.prefix.contains("f1.png"));
    let asset = directive.asset.expect("image directive should carry an asset");
    assert_eq!(asset.file_id, "f1");
    assert_eq!(asset.extension, "png");
}

/// Test that an image without a matching file emits nothing
#[test]
fn test_directive_for_withUnmatchedImage_shouldEmitNothing() {
    let el = element("img", &[("title", "unknown-hash")]);
    let ctx = WalkContext::new();
    let mut snippet = Snippet::default();
    snippet.files.push(common::image_file_ref("h1", "f1", None));

    let directive = directive_for(&Tag::Img, &el, &ctx, &snippet, Path::new("images"));

    assert!(directive.prefix.is_empty());
    assert!(directive.asset.is_none());
}

/// Test that an unspecified width falls back to the fixed default
#[test]
fn test_directive_for_withImageWithoutWidth_shouldUseDefaultWidth() {
    let el = element("img", &[("title", "h1")]);
    let ctx = WalkContext::new();
    let mut snippet = Snippet::default();
    snippet.files.push(common::image_file_ref("h1", "f1", None));

    let directive = directive_for(&Tag::Img, &el, &ctx, &snippet, Path::new("images"));

    assert!(directive.prefix.contains("width=0.6\\linewidth"));
}

/// Test that an unrecognized tag falls back to the literal block
#[test]
fn test_directive_for_withUnknownTag_shouldFallBackToLiteralBlock() {
    let directive = lookup("custom-widget", &[]);
    assert_eq!(directive.prefix, "\\begin{verbatim}\r\n");
    assert_eq!(directive.suffix, "\\end{verbatim}\r\n");
}

/// Test the quote and comment pseudo-directives
#[test]
fn test_link_directive_withQuoteAndComment_shouldEmitHighlightBlocks() {
    let quote = link_directive(LinkType::Quote);
    assert!(quote.prefix.contains("\\colorbox{quote}"));
    let comment = link_directive(LinkType::Comment);
    assert!(comment.prefix.contains("\\colorbox{comment}"));
    assert_eq!(link_directive(LinkType::None).prefix, "");
}
