//! Tests for line-range rendering and splicing.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tempfile::TempDir;
use ward::error::WardError;
use ward::tools::{EditRange, LineDocument, PathResolver, RangedTextEditor};
use ward::types::config::WorkspaceConfig;

#[test]
fn test_render_wide_line_numbers() {
    let text: String = (1..=12_000).map(|n| format!("line {n}\n")).collect();
    let doc = LineDocument::parse(&text);
    let range = doc.range(9_999, 10_001).unwrap();

    assert_eq!(
        doc.render(range, 4).unwrap(),
        "9999: line 9999\n10000: line 10000\n10001: line 10001"
    );
}

#[test]
fn test_render_strips_crlf() {
    let doc = LineDocument::parse("a\r\nb\r\n");
    let range = doc.range(1, 2).unwrap();
    assert_eq!(doc.render(range, 4).unwrap(), "   1: a\n   2: b");
}

#[test]
fn test_replacement_without_newline_joins_next_line() {
    let doc = LineDocument::parse("a\nb\nc\n");
    let range = doc.range(2, 2).unwrap();
    assert_eq!(doc.splice(range, "X").unwrap(), "a\nXc\n");
}

#[tokio::test]
async fn test_custom_gutter_width() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("f.txt"), "a\nb\n").unwrap();
    let config = WorkspaceConfig::new(temp_dir.path()).unwrap();
    let target = PathResolver::new(&config).resolve("f.txt", false).unwrap();

    let text = RangedTextEditor::new()
        .with_gutter_width(1)
        .read(&target, None, None, 100)
        .await
        .unwrap();
    assert_eq!(text, "1: a\n2: b");
}

#[tokio::test]
async fn test_replace_last_line_without_terminator() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("f.txt"), "a\nb").unwrap();
    let config = WorkspaceConfig::new(temp_dir.path()).unwrap();
    let target = PathResolver::new(&config).resolve("f.txt", false).unwrap();

    RangedTextEditor::new()
        .replace(&target, 2, 2, "B")
        .await
        .unwrap();
    assert_eq!(
        std::fs::read_to_string(temp_dir.path().join("f.txt")).unwrap(),
        "a\nB"
    );
}

#[test]
fn test_range_error_carries_total() {
    assert_eq!(
        EditRange::new(4, 9, 3).unwrap_err().to_string(),
        "Invalid range 4-9. File currently has 3 lines."
    );
    assert_eq!(
        EditRange::new(0, 0, 3).unwrap_err(),
        WardError::invalid_range(0, 0, 3)
    );
}

fn document_and_range() -> impl Strategy<Value = (Vec<String>, usize, usize)> {
    (1usize..30).prop_flat_map(|n| {
        let lines = prop::collection::vec("[a-z ]{0,12}", n);
        (lines, 1..=n).prop_flat_map(move |(lines, start)| {
            (Just(lines), Just(start), start..=n)
        })
    })
}

proptest! {
    /// Lines outside the range survive a splice untouched.
    #[test]
    fn prop_splice_keeps_surrounding_lines(
        (lines, start, end) in document_and_range(),
        replacement in prop::collection::vec("[A-Z]{0,8}", 0..5),
    ) {
        let text: String = lines.iter().map(|l| format!("{l}\n")).collect();
        let doc = LineDocument::parse(&text);
        let range = doc.range(start, end).unwrap();

        let replacement: String = replacement.iter().map(|l| format!("{l}\n")).collect();
        let updated = LineDocument::parse(&doc.splice(range, &replacement).unwrap());

        let kept_after = doc.len() - end;
        prop_assert_eq!(
            updated.len(),
            doc.len() - range.line_count() + replacement.lines().count()
        );
        prop_assert_eq!(&updated.lines()[..start - 1], &doc.lines()[..start - 1]);
        prop_assert_eq!(
            &updated.lines()[updated.len() - kept_after..],
            &doc.lines()[end..]
        );
    }

    /// Rendering shows exactly the requested lines, numbered in order.
    #[test]
    fn prop_render_numbers_every_line((lines, start, end) in document_and_range()) {
        let text: String = lines.iter().map(|l| format!("{l}\n")).collect();
        let doc = LineDocument::parse(&text);
        let range = doc.range(start, end).unwrap();

        let rendered = doc.render(range, 4).unwrap();
        let shown: Vec<&str> = rendered.split('\n').collect();
        prop_assert_eq!(shown.len(), end - start + 1);
        for (offset, row) in shown.iter().enumerate() {
            let expected = format!("{:>4}: {}", start + offset, lines[start - 1 + offset]);
            prop_assert_eq!(*row, expected.as_str());
        }
    }
}
