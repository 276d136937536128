//! Read-only view of a source document.
//!
//! The editor owns the text; this module only provides the position/offset
//! conversions and span-based slicing the completion pipeline needs. All
//! offsets are byte offsets into the document text and always land on char
//! boundaries because they are derived from `char_indices`.

use tower_lsp::lsp_types::Position;

/// A half-open byte range `[start, end)` into a [`Buffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// A caller handing us an inverted span is a bug on their side, not
    /// something recoverable at runtime.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "inverted span: {}..{}", start, end);
        Self { start, end }
    }

    /// An empty span anchored at a single offset.
    pub fn empty(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `other` lies fully inside this span.
    pub fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether a single offset lies inside this span (end-inclusive, so a
    /// cursor sitting right after the closing delimiter still counts).
    pub fn contains_offset(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }
}

/// Immutable snapshot of a document's text, captured when a request starts.
#[derive(Debug, Clone)]
pub struct Buffer {
    text: String,
}

impl Buffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn slice(&self, span: Span) -> &str {
        &self.text[span.start..span.end]
    }

    /// Convert an LSP Position (line, character) to a byte offset.
    ///
    /// The character offset is clamped to the end of the line, matching how
    /// editors report a cursor past the last typed character. Returns `None`
    /// when the line does not exist in the document.
    pub fn offset_at(&self, position: Position) -> Option<usize> {
        let mut offset: usize = 0;
        for (i, line) in self.text.lines().enumerate() {
            if i == position.line as usize {
                let byte_col = line
                    .char_indices()
                    .nth(position.character as usize)
                    .map(|(idx, _)| idx)
                    .unwrap_or(line.len());
                return Some(offset + byte_col);
            }
            // +1 for the newline character
            offset += line.len() + 1;
        }
        // An empty document still has a line 0
        if position.line == 0 {
            return Some(0);
        }
        None
    }

    /// Convert a byte offset back to an LSP Position.
    pub fn position_at(&self, offset: usize) -> Position {
        let offset = offset.min(self.text.len());
        let mut line: u32 = 0;
        let mut line_start: usize = 0;
        for (i, ch) in self.text.char_indices() {
            if i >= offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                line_start = i + 1;
            }
        }
        let character = self.text[line_start..offset].chars().count() as u32;
        Position { line, character }
    }

    /// The span of the line containing `offset`, excluding the newline.
    pub fn line_span(&self, offset: usize) -> Span {
        let offset = offset.min(self.text.len());
        let start = self.text[..offset]
            .rfind('\n')
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let end = self.text[offset..]
            .find('\n')
            .map(|idx| offset + idx)
            .unwrap_or(self.text.len());
        Span::new(start, end)
    }
}
