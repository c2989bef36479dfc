//! Tests for comment removal.

use super::*;

#[test]
fn finds_line_and_block_comments() {
    let source = "// one\ntype A = string; /* two */\n";
    let ranges = get_comment_ranges(source);

    assert_eq!(ranges.len(), 2);
    assert_eq!(ranges[0].get_text(source), "// one");
    assert!(!ranges[0].is_multi_line);
    assert_eq!(ranges[1].get_text(source), "/* two */");
    assert!(ranges[1].is_multi_line);
}

#[test]
fn strip_preserves_offsets_and_line_breaks() {
    let source = "/**\n * Docs\n */\nexport type A = string;\n";
    let stripped = strip_comments(source);

    assert_eq!(stripped.len(), source.len());
    assert_eq!(stripped.lines().count(), source.lines().count());
    assert!(stripped.contains("export type A = string;"));
    assert!(!stripped.contains("Docs"));
    assert_eq!(stripped.find("export"), source.find("export"));
}

#[test]
fn comment_markers_inside_strings_are_ignored() {
    let source = "type Url = 'https://example.com'; // trailing\n";
    let stripped = strip_comments(source);

    assert!(stripped.starts_with("type Url = 'https://example.com';"));
    assert!(!stripped.contains("trailing"));
}

#[test]
fn reference_directives_are_removed() {
    let source = "/// <reference types=\"node\" />\nexport {};\n";
    let stripped = strip_comments(source);

    assert_eq!(stripped.trim(), "export {};");
}

#[test]
fn unterminated_block_comment_runs_to_end() {
    let source = "type A = string; /* open";
    let ranges = get_comment_ranges(source);

    assert_eq!(ranges.len(), 1);
    assert_eq!(ranges[0].end as usize, source.len());
}

#[test]
fn source_without_comments_is_unchanged() {
    let source = "export interface A { a: string; }";
    assert_eq!(strip_comments(source), source);
}
