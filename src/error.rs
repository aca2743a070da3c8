use std::fmt;

use thiserror::Error;

/// Compact byte-span used across the inspector.
///
/// Offsets are clamped to `u32`; sources larger than 4GiB are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32, // exclusive
}

impl Span {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        // Clamp rather than panic.
        let s = if start > u32::MAX as usize {
            u32::MAX
        } else {
            start as u32
        };
        let e = if end > u32::MAX as usize {
            u32::MAX
        } else {
            end as u32
        };
        Self { start: s, end: e }
    }

    #[inline]
    pub const fn empty_at(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    #[inline]
    pub const fn from_range(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }

    /// Smallest span covering both `self` and `other`.
    #[inline]
    pub const fn to(self, other: Span) -> Span {
        let start = if self.start < other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end > other.end {
            self.end
        } else {
            other.end
        };
        Span { start, end }
    }

    #[inline]
    pub const fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }
}

/// Index of a compilation unit inside one inspection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FileId(pub u32);

impl FileId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

// =============================================================================
// Diagnostics
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagKind {
    /// Unrecognised input skipped by the lexer.
    Lex,
    /// Unexpected token; the parser recovered.
    Parse,
    /// Unresolved reference, override mismatch, duplicate declaration.
    Index,
    /// Inheritance cycle found during resolution or traversal.
    Cycle,
}

impl fmt::Display for DiagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiagKind::Lex => "lex",
            DiagKind::Parse => "parse",
            DiagKind::Index => "index",
            DiagKind::Cycle => "cycle",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        })
    }
}

/// What the lexer or parser did to get past a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recovery {
    /// `n` tokens (or code units, for the lexer) were dropped.
    SkippedTokens(u32),
    /// A missing token was assumed present.
    InsertedToken(&'static str),
    /// Parsing resumed at the next statement or block boundary.
    Resynchronized,
}

impl fmt::Display for Recovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recovery::SkippedTokens(1) => f.write_str("skipped 1 token"),
            Recovery::SkippedTokens(n) => write!(f, "skipped {n} tokens"),
            Recovery::InsertedToken(t) => write!(f, "inserted `{t}`"),
            Recovery::Resynchronized => f.write_str("resynchronized"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diag {
    pub file: FileId,
    pub kind: DiagKind,
    pub severity: Severity,
    pub span: Span,
    pub message: String,
    pub recovery: Option<Recovery>,
}

impl Diag {
    pub fn error(file: FileId, kind: DiagKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            file,
            kind,
            severity: Severity::Error,
            span,
            message: message.into(),
            recovery: None,
        }
    }

    pub fn warning(file: FileId, kind: DiagKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(file, kind, span, message)
        }
    }

    #[inline]
    pub fn with_recovery(mut self, recovery: Recovery) -> Self {
        self.recovery = Some(recovery);
        self
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

// =============================================================================
// Lexer errors
// =============================================================================

#[derive(Debug, Error, Clone, PartialEq, Eq, Default)]
pub enum LexErrorKind {
    #[default]
    #[error("invalid token")]
    InvalidToken,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated character literal")]
    UnterminatedChar,
    #[error("unterminated comment")]
    UnterminatedComment,
}

#[derive(Debug, Error, Clone, PartialEq, Eq, Default)]
#[error("{kind}: {span:?}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    #[inline]
    pub fn diag(&self, file: FileId) -> Diag {
        Diag::error(file, DiagKind::Lex, self.span, self.kind.to_string())
            .with_recovery(Recovery::SkippedTokens(1))
    }
}

// =============================================================================
// Query-side errors
// =============================================================================

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("class `{0}` not found")]
    NotFound(String),
    #[error("method `{method}` not found in `{class}`")]
    MethodNotFound { class: String, method: String },
}
