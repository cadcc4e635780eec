//! Line-based context windows around a match

use regex::Regex;

/// Byte offsets of line starts for a piece of text
pub struct LineIndex<'a> {
    text: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { text, starts }
    }

    /// Zero-based line containing the byte `offset`
    pub fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset) - 1
    }

    /// Text of lines `line - radius ..= line + radius`, clamped to the document
    pub fn window(&self, line: usize, radius: usize) -> &'a str {
        let last_line = self.starts.len() - 1;
        let first = line.min(last_line).saturating_sub(radius);
        let last = line.saturating_add(radius).min(last_line);

        let start = self.starts[first];
        let end = self
            .starts
            .get(last + 1)
            .copied()
            .unwrap_or(self.text.len());
        &self.text[start..end]
    }

    /// Check if `evidence` appears within `radius` lines of the byte `offset`
    pub fn has_context(&self, offset: usize, radius: usize, evidence: &Regex) -> bool {
        evidence.is_match(self.window(self.line_of(offset), radius))
    }
}
