//! Diagnostics collection and source positions.
//!
//! Parse tasks each own a private [`Diagnostics`] list; the pipeline merges
//! them after the fork-join completes, so no locking is involved.

use std::collections::HashMap;
use std::fmt::Write as _;

use memchr::memchr_iter;

use crate::error::{Diag, DiagKind, FileId, Severity, Span};

/// 1-based line and column (column counted in chars).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// Byte offset to line/column mapping for one source text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineIndex {
    line_starts: Vec<u32>,
    len: u32,
}

impl LineIndex {
    pub fn new(src: &str) -> Self {
        let mut line_starts = Vec::with_capacity(src.len() / 32 + 1);
        line_starts.push(0);
        line_starts.extend(memchr_iter(b'\n', src.as_bytes()).map(|i| (i + 1) as u32));
        Self {
            line_starts,
            len: src.len() as u32,
        }
    }

    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 1-based line containing `offset`.
    #[inline]
    pub fn line(&self, offset: u32) -> u32 {
        let offset = offset.min(self.len);
        match self.line_starts.binary_search(&offset) {
            Ok(i) => i as u32 + 1,
            Err(i) => i as u32,
        }
    }

    pub fn line_col(&self, src: &str, offset: u32) -> LineCol {
        let line = self.line(offset);
        let start = self.line_starts[(line - 1) as usize] as usize;
        let end = (offset.min(self.len) as usize).max(start);
        let col = src
            .get(start..end)
            .map(|s| s.chars().count())
            .unwrap_or(end - start);
        LineCol {
            line,
            col: col as u32 + 1,
        }
    }
}

/// Append-only diagnostics list with an optional per-file cap.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diag>,
    per_file: HashMap<FileId, usize>,
    limit_per_file: usize,
    suppressed: usize,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the number of diagnostics kept per file; `0` disables the cap.
    pub fn with_limit(limit_per_file: usize) -> Self {
        Self {
            limit_per_file,
            ..Self::default()
        }
    }

    pub fn push(&mut self, diag: Diag) {
        let kept = self.per_file.entry(diag.file).or_insert(0);
        if self.limit_per_file != 0 && *kept >= self.limit_per_file {
            self.suppressed += 1;
            return;
        }
        *kept += 1;
        self.items.push(diag);
    }

    pub fn extend(&mut self, diags: impl IntoIterator<Item = Diag>) {
        for d in diags {
            self.push(d);
        }
    }

    /// Fork-join merge of a task-local list.
    pub fn merge(&mut self, other: Diagnostics) {
        self.suppressed += other.suppressed;
        self.extend(other.items);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn suppressed(&self) -> usize {
        self.suppressed
    }

    #[inline]
    pub fn as_slice(&self) -> &[Diag] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diag> {
        self.items.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diag> {
        self.items.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diag> {
        self.items.iter().filter(|d| d.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn of_kind(&self, kind: DiagKind) -> impl Iterator<Item = &Diag> {
        self.items.iter().filter(move |d| d.kind == kind)
    }

    pub fn for_file(&self, file: FileId) -> impl Iterator<Item = &Diag> {
        self.items.iter().filter(move |d| d.file == file)
    }

    /// Diagnostics ordered by file, then position. Stable for equal keys.
    pub fn sorted(&self) -> Vec<&Diag> {
        let mut out: Vec<&Diag> = self.items.iter().collect();
        out.sort_by_key(|d| (d.file, d.span.start, d.span.end));
        out
    }

    /// Renders the diagnostics of one file in position order.
    pub fn render(&self, file: FileId, name: &str, src: &str, lines: &LineIndex) -> Vec<String> {
        self.sorted()
            .into_iter()
            .filter(|d| d.file == file)
            .map(|d| render_diag(d, name, src, lines))
            .collect()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diag;
    type IntoIter = std::vec::IntoIter<Diag>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diag;
    type IntoIter = std::slice::Iter<'a, Diag>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<Diag> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = Diag>>(iter: I) -> Self {
        let mut out = Self::default();
        out.extend(iter);
        out
    }
}

/// Formats one diagnostic as `name:line:col: severity[kind]: message (recovery)`.
pub fn render_diag(diag: &Diag, name: &str, src: &str, lines: &LineIndex) -> String {
    let pos = lines.line_col(src, diag.span.start);
    let mut out = format!(
        "{name}:{}:{}: {}[{}]: {}",
        pos.line, pos.col, diag.severity, diag.kind, diag.message
    );
    if let Some(rec) = diag.recovery {
        let _ = write!(out, " ({rec})");
    }
    out
}

/// Returns the source text under `span`, or `""` when out of bounds.
#[inline]
pub fn snippet(src: &str, span: Span) -> &str {
    src.get(span.range()).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Recovery;

    fn diag(file: u32, start: usize) -> Diag {
        Diag::error(FileId(file), DiagKind::Parse, Span::new(start, start + 1), "bad")
    }

    #[test]
    fn line_index_is_one_based() {
        let src = "ab\ncd\r\nef";
        let lines = LineIndex::new(src);
        assert_eq!(lines.line_count(), 3);
        let at = |o: u32| {
            let p = lines.line_col(src, o);
            (p.line, p.col)
        };
        assert_eq!(at(0), (1, 1));
        assert_eq!(at(3), (2, 1));
        assert_eq!(at(5), (2, 3));
        assert_eq!(at(7), (3, 1));
        assert_eq!(at(src.len() as u32), (3, 3));
    }

    #[test]
    fn cap_counts_suppressed_per_file() {
        let mut d = Diagnostics::with_limit(2);
        d.extend((0..4).map(|i| diag(0, i)));
        d.push(diag(1, 0));
        assert_eq!(d.len(), 3);
        assert_eq!(d.suppressed(), 2);
        assert_eq!(d.for_file(FileId(1)).count(), 1);
    }

    #[test]
    fn cap_holds_across_many_interleaved_files() {
        let mut d = Diagnostics::with_limit(3);
        for i in 0..10_000 {
            d.push(diag(i % 50, i as usize));
        }
        assert_eq!(d.len(), 150);
        assert_eq!(d.suppressed(), 10_000 - 150);
        for f in 0..50 {
            assert_eq!(d.for_file(FileId(f)).count(), 3);
        }
        // Merged lists keep counting against the same cap.
        let mut more = Diagnostics::new();
        more.push(diag(7, 0));
        more.push(diag(50, 0));
        d.merge(more);
        assert_eq!(d.for_file(FileId(7)).count(), 3);
        assert_eq!(d.for_file(FileId(50)).count(), 1);
        assert_eq!(d.suppressed(), 10_000 - 150 + 1);
    }

    #[test]
    fn merge_keeps_suppressed_counts() {
        let mut task = Diagnostics::with_limit(1);
        task.extend([diag(0, 0), diag(0, 1)]);
        let mut all = Diagnostics::new();
        all.merge(task);
        assert_eq!(all.len(), 1);
        assert_eq!(all.suppressed(), 1);
    }

    #[test]
    fn renders_position_severity_and_recovery() {
        let src = "class A {\n  int x = ;\n}\n";
        let lines = LineIndex::new(src);
        let mut d = Diagnostics::new();
        d.push(
            Diag::error(FileId(0), DiagKind::Parse, Span::new(20, 21), "expected expression, found `;`")
                .with_recovery(Recovery::Resynchronized),
        );
        d.push(Diag::warning(FileId(0), DiagKind::Index, Span::new(6, 7), "unresolved"));
        assert_eq!(
            d.render(FileId(0), "A.java", src, &lines),
            [
                "A.java:1:7: warning[index]: unresolved",
                "A.java:2:11: error[parse]: expected expression, found `;` (resynchronized)",
            ]
        );
    }
}
