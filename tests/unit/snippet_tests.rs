/*!
 * Tests for the snippet data model
 */

use labtex::snippet::{FileRef, FileStyle, LinkType, Snippet};

use crate::common;

/// Test that a camelCase dump parses into the model
#[test]
fn test_parse_json_withCamelCaseDump_shouldDeserialize() {
    let snippets = Snippet::parse_json(&common::sample_dump_json("f1")).unwrap();

    assert_eq!(snippets.len(), 1);
    let snippet = &snippets[0];
    assert_eq!(snippet.id, "s1");
    assert_eq!(snippet.files.len(), 1);
    assert_eq!(snippet.files[0].file_hash, "hash-1");
    assert_eq!(snippet.files[0].file_id, "f1");
    assert_eq!(snippet.subsnippets.len(), 1);
    assert_eq!(snippet.subsnippets[0].link_type, LinkType::Comment);
}

/// Test that a wrapped dump shape also parses
#[test]
fn test_parse_json_withWrappedDump_shouldDeserialize() {
    let content = r#"{"snippets": [{"id": "a", "textcontent": "<p>x</p>"}]}"#;

    let snippets = Snippet::parse_json(content).unwrap();

    assert_eq!(snippets.len(), 1);
    assert_eq!(snippets[0].id, "a");
}

/// Test that unknown link types fall back to regular placement
#[test]
fn test_parse_json_withUnknownLinkType_shouldFallBackToNone() {
    let content = r#"[{"id": "a", "textcontent": "<p>x</p>", "linkType": "paragraph"}]"#;

    let snippets = Snippet::parse_json(content).unwrap();

    assert_eq!(snippets[0].link_type, LinkType::None);
}

/// Test that garbage input is rejected
#[test]
fn test_parse_json_withGarbage_shouldFail() {
    assert!(Snippet::parse_json("not json at all").is_err());
}

/// Test the image classification from the declared content type
#[test]
fn test_is_image_withContentTypes_shouldClassify() {
    let mut file = FileRef {
        file_extension: "image/png".to_string(),
        ..FileRef::default()
    };
    assert!(file.is_image());
    assert_eq!(file.extension(), "png");

    file.file_extension = "application/pdf".to_string();
    assert!(!file.is_image());
    assert_eq!(file.extension(), "pdf");

    file.file_extension = "garbage".to_string();
    assert_eq!(file.extension(), "bin");
}

/// Test embed width derivation from the style width
#[test]
fn test_width_fraction_withStyles_shouldDeriveFraction() {
    let mut file = FileRef {
        style: FileStyle {
            width: Some("50%".to_string()),
            height: None,
            ratio: None,
        },
        ..FileRef::default()
    };
    assert_eq!(file.width_fraction(), "0.50");

    file.style.width = Some("81.8%".to_string());
    assert_eq!(file.width_fraction(), "0.82");

    file.style.width = Some("".to_string());
    assert_eq!(file.width_fraction(), "0.6");

    file.style.width = None;
    assert_eq!(file.width_fraction(), "0.6");
}

/// Test the direct-children link filter used by assembly
#[test]
fn test_subsnippets_with_link_withMixedChildren_shouldFilterInOrder() {
    let mut snippet = Snippet::default();
    for (id, link) in [
        ("q1", LinkType::Quote),
        ("c1", LinkType::Comment),
        ("q2", LinkType::Quote),
    ] {
        snippet.subsnippets.push(Snippet {
            id: id.to_string(),
            link_type: link,
            ..Snippet::default()
        });
    }

    let quotes: Vec<&str> = snippet
        .subsnippets_with_link(LinkType::Quote)
        .map(|s| s.id.as_str())
        .collect();
    assert_eq!(quotes, vec!["q1", "q2"]);

    let comments: Vec<&str> = snippet
        .subsnippets_with_link(LinkType::Comment)
        .map(|s| s.id.as_str())
        .collect();
    assert_eq!(comments, vec!["c1"]);
}
