//! File-relative source spans

/// Contiguous region of one source file
///
/// Offsets are relative to the start of the file text, unlike SWC spans which
/// are positions inside a shared `SourceMap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceSpan {
    /// Byte offset of the start of the span (inclusive)
    pub start: usize,
    /// Byte offset of the end of the span (exclusive)
    pub end: usize,
    /// Line number of the start (1-indexed)
    pub start_line: u32,
}

impl SourceSpan {
    pub fn new(start: usize, end: usize, start_line: u32) -> Self {
        SourceSpan {
            start,
            end,
            start_line,
        }
    }

    /// Get the length of the span in bytes
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Check if this span overlaps with another span
    ///
    /// Zero-width spans don't overlap with anything, including themselves.
    pub fn overlaps(&self, other: &SourceSpan) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.start < other.end && other.start < self.end
    }

    /// Slice the text this span covers out of the file it came from
    ///
    /// Returns `None` when the span is out of bounds or not on a char boundary.
    pub fn text<'a>(&self, src: &'a str) -> Option<&'a str> {
        src.get(self.start..self.end)
    }
}

/// Convert an SWC span into a file-relative span with line info
pub fn span_in_file(span: swc_common::Span, source_map: &swc_common::SourceMap) -> SourceSpan {
    let lo = source_map.lookup_byte_offset(span.lo);
    let hi = source_map.lookup_byte_offset(span.hi);
    let start_loc = source_map.lookup_char_pos(span.lo);
    SourceSpan {
        start: lo.pos.0 as usize,
        end: hi.pos.0 as usize,
        start_line: start_loc.line as u32,
    }
}
