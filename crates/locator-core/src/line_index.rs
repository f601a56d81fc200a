/// Maps byte offsets in a source text to `(line, column)` pairs.
///
/// Lines are 1-based, columns are 0-based and counted in characters from the start of
/// the line, which is the convention the JSX parser uses for its own positions.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    /// Builds the newline index once for the given text
    pub fn new(source: &str) -> Self {
        Self {
            line_starts: Self::calculate_line_starts(source),
            len: source.len(),
        }
    }

    /// Number of lines in the indexed text
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte offset at which the given 1-based line starts
    pub fn line_start(&self, line: usize) -> Option<usize> {
        line.checked_sub(1)
            .and_then(|idx| self.line_starts.get(idx))
            .copied()
    }

    /// Converts a byte offset into a `(line, column)` pair.
    ///
    /// `source` must be the text the index was built from; it is needed to count characters.
    /// Offsets past the end clamp to the end of the text.
    pub fn location(&self, source: &str, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.len);

        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };
        let line_start = self.line_starts[line_idx];

        let column = source
            .get(line_start..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(offset - line_start);

        (line_idx + 1, column)
    }

    /// Calculates the start positions of each line (in bytes)
    fn calculate_line_starts(source: &str) -> Vec<usize> {
        let mut line_starts = vec![0];
        for (pos, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(pos + 1);
            }
        }
        line_starts
    }
}
