//! Line-addressed reading and patching of text files.
//!
//! Reads render each line behind a right-aligned line-number gutter, so a
//! caller can copy the numbers straight into a later replace:
//!
//! ```text
//!    2: b
//!    3: c
//! ```
//!
//! Replaces splice text over an inclusive 1-indexed line range and rewrite
//! the whole file. There is no locking: concurrent replaces on the same file
//! race and the last writer wins.

use std::io::ErrorKind;
use tracing::debug;

use super::path::ResolvedPath;
use crate::error::{WardError, WardResult};
use crate::util::{strip_line_ending, truncate_chars};

/// Returned by a read of a file with zero lines.
pub const EMPTY_FILE_MESSAGE: &str = "File is empty.";

/// Width of the line-number column.
pub const DEFAULT_GUTTER_WIDTH: usize = 4;

/// A text file split into lines, each keeping its original line ending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineDocument {
    lines: Vec<String>,
}

impl LineDocument {
    /// Splits `text` after every `\n`, `\r\n` or lone `\r`. Endings stay
    /// attached to their line; a final line without one is kept as is.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut lines = Vec::new();
        let mut start = 0;
        for (i, &b) in bytes.iter().enumerate() {
            let ends_line = b == b'\n' || (b == b'\r' && bytes.get(i + 1) != Some(&b'\n'));
            if ends_line {
                lines.push(text[start..=i].to_string());
                start = i + 1;
            }
        }
        if start < text.len() {
            lines.push(text[start..].to_string());
        }
        Self { lines }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines with their original endings.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Validates `start..=end` against this document.
    ///
    /// # Errors
    ///
    /// Returns [`WardError::InvalidRange`] carrying the line count.
    pub fn range(&self, start: usize, end: usize) -> WardResult<EditRange> {
        EditRange::new(start, end, self.len())
    }

    /// Renders `range` with a right-aligned gutter, endings stripped.
    ///
    /// # Errors
    ///
    /// Returns [`WardError::InvalidRange`] if `range` does not fit this
    /// document, e.g. one validated against a longer file.
    pub fn render(&self, range: EditRange, gutter_width: usize) -> WardResult<String> {
        let range = self.range(range.start(), range.end())?;
        Ok(self.lines[range.start() - 1..range.end()]
            .iter()
            .enumerate()
            .map(|(offset, line)| {
                format!(
                    "{:>width$}: {}",
                    range.start() + offset,
                    strip_line_ending(line),
                    width = gutter_width
                )
            })
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Returns the document text with `range` replaced by `replacement`,
    /// inserted verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`WardError::InvalidRange`] if `range` does not fit this
    /// document.
    pub fn splice(&self, range: EditRange, replacement: &str) -> WardResult<String> {
        let range = self.range(range.start(), range.end())?;
        let mut out = String::new();
        for line in &self.lines[..range.start() - 1] {
            out.push_str(line);
        }
        out.push_str(replacement);
        for line in &self.lines[range.end()..] {
            out.push_str(line);
        }
        Ok(out)
    }
}

/// An inclusive, 1-indexed line range validated against a document length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditRange {
    start: usize,
    end: usize,
}

impl EditRange {
    /// Validates `1 <= start <= end <= total`.
    ///
    /// # Errors
    ///
    /// Returns [`WardError::InvalidRange`] carrying `total` otherwise.
    pub fn new(start: usize, end: usize, total: usize) -> WardResult<Self> {
        if start < 1 || end < start || end > total {
            return Err(WardError::invalid_range(start, end, total));
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of lines covered.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.end - self.start + 1
    }
}

/// What a replace did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceSummary {
    pub lines_replaced: usize,
    pub chars_written: usize,
}

/// Reads and patches files by line range.
#[derive(Debug, Clone)]
pub struct RangedTextEditor {
    gutter_width: usize,
}

impl Default for RangedTextEditor {
    fn default() -> Self {
        Self {
            gutter_width: DEFAULT_GUTTER_WIDTH,
        }
    }
}

impl RangedTextEditor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_gutter_width(mut self, width: usize) -> Self {
        self.gutter_width = width;
        self
    }

    /// Reads `target` as numbered lines.
    ///
    /// With no bounds the whole file is shown; with only `start_line` that
    /// single line; with only `end_line` lines `1..=end_line`. An empty
    /// file yields [`EMPTY_FILE_MESSAGE`]. Output longer than
    /// `max_output_chars` is cut to exactly that many characters, ending
    /// in `...`.
    ///
    /// # Errors
    ///
    /// [`WardError::NotFound`], [`WardError::InvalidRange`] or
    /// [`WardError::FileIo`].
    pub async fn read(
        &self,
        target: &ResolvedPath,
        start_line: Option<usize>,
        end_line: Option<usize>,
        max_output_chars: usize,
    ) -> WardResult<String> {
        let document = load(target).await?;
        if document.is_empty() {
            return Ok(EMPTY_FILE_MESSAGE.to_string());
        }

        let total = document.len();
        let (start, end) = match (start_line, end_line) {
            (None, None) => (1, total),
            (Some(start), None) => (start, start),
            (None, Some(end)) => (1, end),
            (Some(start), Some(end)) => (start, end),
        };
        let range = document.range(start, end)?;

        let rendered = document.render(range, self.gutter_width)?;
        let (text, truncated) = truncate_chars(&rendered, max_output_chars);
        debug!(
            path = %target.requested(),
            start = range.start(),
            end = range.end(),
            truncated,
            "Read file range"
        );
        Ok(text)
    }

    /// Replaces lines `start_line..=end_line` of `target` with
    /// `replacement_text` and rewrites the file.
    ///
    /// The replacement is inserted verbatim: include a trailing newline to
    /// keep the following line separate.
    ///
    /// # Errors
    ///
    /// [`WardError::NotFound`] (files are never created here),
    /// [`WardError::EmptyFile`], [`WardError::InvalidRange`] or
    /// [`WardError::FileIo`].
    pub async fn replace(
        &self,
        target: &ResolvedPath,
        start_line: usize,
        end_line: usize,
        replacement_text: &str,
    ) -> WardResult<ReplaceSummary> {
        let document = load(target).await?;
        if document.is_empty() {
            return Err(WardError::empty_file(target.requested()));
        }

        let range = document.range(start_line, end_line)?;
        let updated = document.splice(range, replacement_text)?;

        tokio::fs::write(target.as_path(), updated)
            .await
            .map_err(|e| {
                debug!(path = %target.requested(), error = %e, "File write failed");
                WardError::file_io(target.requested(), format!("failed to write file: {e}"))
            })?;

        let summary = ReplaceSummary {
            lines_replaced: range.line_count(),
            chars_written: replacement_text.chars().count(),
        };
        debug!(
            path = %target.requested(),
            start = range.start(),
            end = range.end(),
            chars = summary.chars_written,
            "Replaced file range"
        );
        Ok(summary)
    }
}

async fn load(target: &ResolvedPath) -> WardResult<LineDocument> {
    match tokio::fs::read_to_string(target.as_path()).await {
        Ok(text) => Ok(LineDocument::parse(&text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(WardError::not_found(target.requested())),
        Err(e) if e.kind() == ErrorKind::InvalidData => Err(WardError::file_io(
            target.requested(),
            "file is not valid UTF-8 text",
        )),
        Err(e) => {
            debug!(path = %target.requested(), error = %e, "File read failed");
            Err(WardError::file_io(
                target.requested(),
                format!("failed to read file: {e}"),
            ))
        }
    }
}
