/*!
 * Tag rule table: maps DOM tags to LaTeX translation directives.
 *
 * The table is a pure function of (tag, element, walk state, snippet): it
 * reads the column counter for table column specs and the file cursor for
 * figure framing, but performs no side effects. Asset materialization is
 * described through `Directive::asset` and executed by the walker.
 */

use std::path::Path;

use crate::dom::Element;
use crate::latex::context::WalkContext;
use crate::snippet::{LinkType, Snippet};

pub const VERBATIM_OPEN: &str = "\\begin{verbatim}\r\n";
pub const VERBATIM_CLOSE: &str = "\\end{verbatim}\r\n";
pub const CENTER_OPEN: &str = "\\begin{center}\r\n";
pub const CENTER_CLOSE: &str = "\\end{center}\r\n";

/// One tag's translation directive
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Directive {
    /// Markup emitted before the node's translated children
    pub prefix: String,

    /// Markup emitted after the node's translated children
    pub suffix: String,

    /// Recompute the directive after the subtree has been scanned; the table
    /// column count is only known once the rows and cells have been walked
    pub deferred_suffix: bool,

    /// Negative: drop that many trailing characters from the accumulated
    /// content before appending the suffix
    pub splice: i32,

    /// Binary to materialize when this directive is emitted
    pub asset: Option<AssetRef>,
}

impl Directive {
    fn wrap<P: Into<String>, S: Into<String>>(prefix: P, suffix: S) -> Self {
        Directive {
            prefix: prefix.into(),
            suffix: suffix.into(),
            ..Directive::default()
        }
    }
}

/// Binary an image directive wants extracted into the asset directory
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRef {
    /// Identifier of the binary in the content store
    pub file_id: String,

    /// Filename extension for the materialized asset
    pub extension: String,
}

/// Closed set of recognized tags plus a fallback for everything else
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    H1,
    H2,
    H3,
    H4,
    P,
    Figure,
    Img,
    Strong,
    Italic,
    Ol,
    Ul,
    Li,
    Table,
    Tbody,
    Tr,
    Td,
    Th,
    Figcaption,
    Mark,
    Br,
    Anchor,
    Underline,
    Sub,
    Sup,
    Strike,
    /// Anything without a translation rule; rendered as a literal block
    Other(String),
}

impl Tag {
    /// Classify a tag name, case-insensitively
    pub fn from_name(name: &str) -> Tag {
        match name.to_ascii_lowercase().as_str() {
            "h1" => Tag::H1,
            "h2" => Tag::H2,
            "h3" => Tag::H3,
            "h4" => Tag::H4,
            "p" => Tag::P,
            "figure" => Tag::Figure,
            "img" => Tag::Img,
            "strong" => Tag::Strong,
            "i" => Tag::Italic,
            "ol" => Tag::Ol,
            "ul" => Tag::Ul,
            "li" => Tag::Li,
            "table" => Tag::Table,
            "tbody" => Tag::Tbody,
            "tr" => Tag::Tr,
            "td" => Tag::Td,
            "th" => Tag::Th,
            "figcaption" => Tag::Figcaption,
            "mark" => Tag::Mark,
            "br" => Tag::Br,
            "a" => Tag::Anchor,
            "u" => Tag::Underline,
            "sub" => Tag::Sub,
            "sup" => Tag::Sup,
            "s" => Tag::Strike,
            other => Tag::Other(other.to_string()),
        }
    }
}

/// Look up the directive for one element in the current walk state
pub fn directive_for(
    tag: &Tag,
    element: &Element,
    ctx: &WalkContext,
    snippet: &Snippet,
    asset_dir: &Path,
) -> Directive {
    match tag {
        // The upstream editor remaps the top heading level away, so a
        // distinguishable h1 never arrives; it carries no wrap
        Tag::H1 => Directive::default(),
        Tag::H2 => Directive::wrap("\\section{", "}\r\n"),
        Tag::H3 => Directive::wrap("\\subsection{", "}\r\n"),
        Tag::H4 => Directive::wrap("\\subsubsection{", "}\r\n"),
        Tag::P => Directive::wrap("", "\\\\\r\n"),
        Tag::Figure => {
            let framed = snippet
                .files
                .get(ctx.file_counter)
                .map(|file| file.is_image())
                .unwrap_or(false);
            if framed {
                Directive::wrap(
                    "\\begin{figure}[H]\r\n\\begin{center}\r\n",
                    "\\end{center}\r\n\\end{figure}\r\n",
                )
            } else {
                Directive::wrap(CENTER_OPEN, CENTER_CLOSE)
            }
        }
        Tag::Img => image_directive(element, snippet, asset_dir),
        Tag::Strong => Directive::wrap("\\textbf{", "}"),
        Tag::Italic => Directive::wrap("\\textit{", "}"),
        Tag::Ol => Directive::wrap("\\begin{enumerate}\r\n", "\\end{enumerate}\r\n"),
        Tag::Ul => Directive::wrap("\\begin{itemize}\r\n", "\\end{itemize}\r\n"),
        Tag::Li => Directive::wrap("\\item ", "\r\n"),
        Tag::Table => {
            let mut spec = String::from("{|");
            for _ in 0..ctx.column_counter {
                spec.push_str("c|");
            }
            spec.push('}');
            Directive {
                prefix: format!("\\begin{{tabular}}{}\r\n\\hline ", spec),
                suffix: "\\end{tabular}\r\n".to_string(),
                deferred_suffix: true,
                ..Directive::default()
            }
        }
        Tag::Tbody => Directive::default(),
        Tag::Tr => Directive {
            suffix: "\\\\\\hline\r\n".to_string(),
            splice: -1,
            ..Directive::default()
        },
        Tag::Td | Tag::Th => Directive {
            suffix: "&".to_string(),
            ..Directive::default()
        },
        Tag::Figcaption => Directive::wrap("\\caption{", "}\r\n"),
        Tag::Mark => {
            // Highlight color rides in on a class like "marker-yellow"
            match element
                .class()
                .and_then(|class| class.split('-').nth(1))
                .filter(|color| !color.is_empty())
            {
                Some(color) => Directive::wrap(format!("\\colorbox{{{}}}{{", color), "}"),
                None => Directive::default(),
            }
        }
        Tag::Br => Directive {
            suffix: "\\\\".to_string(),
            ..Directive::default()
        },
        Tag::Anchor => Directive::wrap(
            format!("\\href{{{}}}{{", element.attr("href").unwrap_or("")),
            "}\r\n",
        ),
        Tag::Underline => Directive::wrap("\\underline{", "}"),
        Tag::Sub => Directive::wrap("\\textsubscript{", "}"),
        Tag::Sup => Directive::wrap("\\textsuperscript{", "}"),
        Tag::Strike => Directive::wrap("\\sout{", "}"),
        Tag::Other(_) => Directive::wrap(VERBATIM_OPEN, VERBATIM_CLOSE),
    }
}

fn image_directive(element: &Element, snippet: &Snippet, asset_dir: &Path) -> Directive {
    // The placeholder's title attribute correlates it with an attached file
    let hash = element.attr("title").unwrap_or("");
    let Some(file) = snippet.files.iter().find(|file| file.file_hash == hash) else {
        return Directive::default();
    };

    let extension = file.extension().to_string();
    let path = asset_dir.join(format!("{}.{}", file.file_id, extension));
    Directive {
        prefix: format!(
            "\\includegraphics[width={}\\linewidth]{{{}}}\r\n",
            file.width_fraction(),
            path.display()
        ),
        asset: Some(AssetRef {
            file_id: file.file_id.clone(),
            extension,
        }),
        ..Directive::default()
    }
}

/// Highlighted wrap applied to a whole quote or comment subsnippet
pub fn link_directive(link: LinkType) -> Directive {
    match link {
        LinkType::Quote => Directive::wrap(
            "\\hfill\r\n\\colorbox{quote}{\\begin{minipage}{\\textwidth}",
            "\\end{minipage}}\\\\",
        ),
        LinkType::Comment => Directive::wrap(
            "\\hfill\r\n\\colorbox{comment}{\\begin{minipage}{0.8\\textwidth}",
            "\\end{minipage}}\\\\",
        ),
        LinkType::None => Directive::default(),
    }
}

/// Column bookkeeping applied when a node is first visited
pub fn update_column_counter(tag: &Tag, ctx: &mut WalkContext) {
    match tag {
        Tag::Tr => ctx.column_counter = 0,
        Tag::Td | Tag::Th => ctx.column_counter += 1,
        _ => {}
    }
}
