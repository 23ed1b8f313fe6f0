//! Source locations shared by every compiler stage.
//!
//! A [`Span`] is the unit every diagnostic, token, and AST node carries to point back at the
//! program text it came from. Spans are plain data: cheap to copy, cheap to merge, and never own
//! the text they describe.

/// Identifies a single compiled source file.
///
/// The driver constructs one `fax-drv::Compiler` per input file (see the crate-level concurrency
/// notes), so in practice every `Span` in a given compilation carries the same `FileId`. The type
/// exists anyway because the driver may hold several `CompileReport`s side by side and
/// diagnostics should remain self-describing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub usize);

impl FileId {
    /// A placeholder id for spans that are not associated with any real file (synthesized nodes).
    pub const DUMMY: FileId = FileId(usize::MAX);
}

impl Default for FileId {
    fn default() -> Self {
        FileId(0)
    }
}

/// A byte range in a source file, with the line/column of its start already resolved.
///
/// `start`/`end` are byte offsets (`end` exclusive); `line`/`column` are 1-based and describe
/// `start`. Re-deriving line/column from a raw offset later would require re-scanning the file,
/// so the lexer resolves them once, at the point it already knows them, and every later stage
/// just carries the values forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
    pub file_id: FileId,
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Span {
            start,
            end,
            line,
            column,
            file_id: FileId::default(),
        }
    }

    pub fn with_file(start: usize, end: usize, line: u32, column: u32, file_id: FileId) -> Self {
        Span {
            start,
            end,
            line,
            column,
            file_id,
        }
    }

    /// A zero-width span at a single position, used for synthesized nodes and end-of-input
    /// diagnostics that have nowhere else to point.
    pub fn point(line: u32, column: u32) -> Self {
        Span::new(0, 0, line, column)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    pub fn contains_span(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Smallest span covering both `self` and `other`. Keeps `self`'s line/column (the earlier
    /// position), since callers merge left-to-right while building up larger syntax nodes.
    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line: self.line,
            column: self.column,
            file_id: self.file_id,
        }
    }

    /// Alias for [`merge`](Self::merge) used where the call site reads more naturally as "joining"
    /// two adjacent spans (e.g. a keyword and the block that follows it).
    pub fn join(&self, other: &Span) -> Span {
        self.merge(other)
    }

    pub fn with_file_id(mut self, file_id: FileId) -> Self {
        self.file_id = file_id;
        self
    }
}
