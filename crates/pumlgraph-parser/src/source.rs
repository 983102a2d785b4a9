//! Source text, offset-to-position decoding and source references.

use std::fmt;

/// A 1-based location in a named source.
///
/// Every part is optional; missing parts render as `-`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SourceRef {
    file: Option<String>,
    line: Option<usize>,
    column: Option<usize>,
}

impl SourceRef {
    /// Create a source reference. Path separators in `file` are normalized to `/`.
    pub fn new(file: Option<&str>, line: Option<usize>, column: Option<usize>) -> Self {
        Self {
            file: file.map(normalize_path),
            line,
            column,
        }
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn line(&self) -> Option<usize> {
        self.line
    }

    pub fn column(&self) -> Option<usize> {
        self.column
    }

    /// `file <f>, line <l>, col <c>`, the location suffix of diagnostic messages.
    pub fn brief(&self) -> String {
        format!(
            "file {}, line {}, col {}",
            self.file.as_deref().unwrap_or("-"),
            or_dash(self.line),
            or_dash(self.column)
        )
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "File {}, line {}, column {}",
            self.file.as_deref().unwrap_or("-"),
            or_dash(self.line),
            or_dash(self.column)
        )
    }
}

fn or_dash(value: Option<usize>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Maps byte offsets to 1-based `(line, column)` pairs.
///
/// Columns count characters, not bytes. Built once per text; each lookup is
/// a binary search over the line starts and the multi-byte characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionDecoder {
    line_starts: Vec<usize>,
    /// Offset of each multi-byte character, paired with the number of
    /// continuation bytes up to and including it.
    wide_chars: Vec<(usize, usize)>,
    len: usize,
}

impl PositionDecoder {
    pub fn new(text: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();

        let mut continuation = 0;
        let mut wide_chars = Vec::new();
        for (offset, c) in text.char_indices().filter(|(_, c)| !c.is_ascii()) {
            continuation += c.len_utf8() - 1;
            wide_chars.push((offset, continuation));
        }

        Self {
            line_starts,
            wide_chars,
            len: text.len(),
        }
    }

    /// Locate `offset`. Offsets past the end of the text are clamped to its length.
    pub fn locate(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.len);
        // line_starts[0] == 0, so the partition point is at least 1
        let index = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.line_starts[index];
        let skipped = self.continuation_before(offset) - self.continuation_before(line_start);
        (index + 1, offset - line_start - skipped + 1)
    }

    fn continuation_before(&self, offset: usize) -> usize {
        match self.wide_chars.partition_point(|&(start, _)| start < offset) {
            0 => 0,
            n => self.wide_chars[n - 1].1,
        }
    }

    /// Number of line starts, including the empty line after a trailing newline.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// A source file prepared for compilation.
///
/// Carriage returns are stripped on construction and a newline is appended
/// so that the last line of the file is always terminated.
#[derive(Debug, Clone)]
pub struct Source {
    text: String,
    path: Option<String>,
    decoder: PositionDecoder,
}

impl Source {
    pub fn new(text: &str, path: Option<&str>) -> Self {
        let mut text = text.replace('\r', "");
        text.push('\n');
        let decoder = PositionDecoder::new(&text);
        Self {
            text,
            path: path.map(normalize_path),
            decoder,
        }
    }

    /// The normalized text including the appended newline.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// The path used in diagnostic messages, `-` for unnamed sources.
    pub fn name(&self) -> &str {
        self.path.as_deref().unwrap_or("-")
    }

    pub fn decoder(&self) -> &PositionDecoder {
        &self.decoder
    }

    /// Build a [`SourceRef`] for a byte offset into [`Source::text`].
    pub fn source_ref(&self, offset: usize) -> SourceRef {
        let (line, column) = self.decoder.locate(offset);
        SourceRef {
            file: self.path.clone(),
            line: Some(line),
            column: Some(column),
        }
    }
}
