//! Line scanner

use crate::common::Range;

/// One line of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub index: usize,
    pub raw: &'a str,
    pub trimmed: &'a str,
}

impl<'a> Line<'a> {
    pub fn new(index: usize, raw: &'a str) -> Self {
        Self {
            index,
            raw,
            trimmed: raw.trim(),
        }
    }

    /// Length of the raw line in characters
    pub fn len(&self) -> usize {
        self.raw.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Range covering the whole raw line
    pub fn span(&self) -> Range {
        Range::on_line(self.index, 0, self.len())
    }

    /// The label name if this line defines one (`name:`)
    pub fn label(&self) -> Option<&'a str> {
        let name = self.trimmed.strip_suffix(':')?.trim();
        (!name.is_empty()).then_some(name)
    }

    /// Whether the trimmed line starts with a directive keyword
    pub fn starts_with(&self, keyword: &str) -> bool {
        self.trimmed.starts_with(keyword)
    }
}

/// Split text into lines on `\n`, dropping a trailing `\r` from each.
///
/// Always yields at least one line; a trailing newline yields a final
/// empty line.
pub fn scan_lines(text: &str) -> Vec<Line<'_>> {
    text.split('\n')
        .enumerate()
        .map(|(index, raw)| Line::new(index, raw.strip_suffix('\r').unwrap_or(raw)))
        .collect()
}
