/*!
 * Snippet data model.
 *
 * Snippets are rich-text lab-notebook entries handed over read-only by the
 * data layer, each with embedded HTML content, attached binary files and
 * nested child snippets tagged as quotes or comments. The wire form is the
 * data layer's camelCase JSON.
 */

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

// @const: Leading decimal prefix of a CSS-ish dimension ("62.5%", "120px")
static LEADING_FLOAT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+(?:\.\d+)?)").unwrap()
});

/// Relationship of a child snippet to its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum LinkType {
    /// Regular content, no special placement
    #[default]
    None,
    /// Quoted earlier entry, emitted before the parent's own content
    Quote,
    /// Commentary on the parent, emitted after the parent's own content
    Comment,
}

impl From<String> for LinkType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "quote" => LinkType::Quote,
            "comment" => LinkType::Comment,
            _ => LinkType::None,
        }
    }
}

/// Display styling attached to a file reference by the editor
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FileStyle {
    /// Width as a percentage string, e.g. "62.5%"
    #[serde(default)]
    pub width: Option<String>,

    /// Height as set by the editor, usually empty
    #[serde(default)]
    pub height: Option<String>,

    /// Aspect ratio as a percentage string
    #[serde(default)]
    pub ratio: Option<String>,
}

/// Reference to a binary attached to a snippet
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    /// Correlates an inline placeholder in the content with this reference
    #[serde(default)]
    pub file_hash: String,

    /// Addresses the binary in the content store
    #[serde(default)]
    pub file_id: String,

    /// Declared content type, e.g. "image/png"
    #[serde(default)]
    pub file_extension: String,

    /// Editor styling for the embed
    #[serde(default)]
    pub style: FileStyle,

    /// Pre-authorized download token, unused outside the web tier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_hash: Option<String>,
}

impl FileRef {
    /// Whether the declared content type classifies this file as an image
    pub fn is_image(&self) -> bool {
        self.file_extension.starts_with("image/")
    }

    /// Filename extension derived from the content type subtype
    pub fn extension(&self) -> &str {
        self.file_extension.split('/').nth(1).unwrap_or("bin")
    }

    /// Embed width as a fraction of the line width, formatted for the markup.
    /// Falls back to the fixed default when the editor set no width.
    pub fn width_fraction(&self) -> String {
        let parsed = self
            .style
            .width
            .as_deref()
            .and_then(|width| LEADING_FLOAT_REGEX.captures(width))
            .and_then(|captures| captures.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok());

        match parsed {
            Some(percent) => format!("{:.2}", percent / 100.0),
            None => "0.6".to_string(),
        }
    }
}

/// One rich-text notebook entry
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    /// Data-layer identifier
    #[serde(default)]
    pub id: String,

    /// Embedded-markup content
    #[serde(default)]
    pub textcontent: String,

    /// Attached binaries in placeholder order
    #[serde(default)]
    pub files: Vec<FileRef>,

    /// Nested child snippets in child order
    #[serde(default)]
    pub subsnippets: Vec<Snippet>,

    /// Placement of this snippet relative to its parent
    #[serde(default)]
    pub link_type: LinkType,
}

/// Wrapper shape some data-layer dumps use instead of a bare array
#[derive(Debug, Deserialize)]
struct SnippetDump {
    snippets: Vec<Snippet>,
}

impl Snippet {
    /// Parse a snippet dump, accepting either a bare array or a
    /// `{"snippets": [...]}` wrapper object
    pub fn parse_json(content: &str) -> Result<Vec<Snippet>> {
        if let Ok(snippets) = serde_json::from_str::<Vec<Snippet>>(content) {
            return Ok(snippets);
        }
        let dump: SnippetDump =
            serde_json::from_str(content).context("Failed to parse snippet dump")?;
        Ok(dump.snippets)
    }

    /// Load a snippet dump from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Vec<Snippet>> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read snippet dump: {:?}", path.as_ref()))?;
        Self::parse_json(&content)
    }

    /// Direct child subsnippets with the given placement, in child order
    pub fn subsnippets_with_link(&self, link: LinkType) -> impl Iterator<Item = &Snippet> {
        self.subsnippets
            .iter()
            .filter(move |sub| sub.link_type == link)
    }
}
