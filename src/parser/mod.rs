//! Hand-written recursive-descent parser with error recovery.
//!
//! The parser buffers the whole token stream (lexer `Error` tokens removed,
//! their trivia moved onto the next token) and walks it with a cursor.
//! It never fails: every entry point returns a best-effort
//! [`CompilationUnit`] plus diagnostics.
//!
//! Recovery rules:
//! - a missing token is reported once and parsing resumes after skipping to
//!   the next occurrence of that token, a `;`, or an unmatched closer;
//! - skipping steps over balanced `()`/`[]`/`{}` groups as a whole;
//! - two diagnostics at the same token are never reported;
//! - a construct nested deeper than [`MAX_NESTING`] is skipped whole with
//!   one diagnostic, which bounds the parser's stack use;
//! - every loop makes progress, so parsing always terminates.

mod expr;
mod items;
mod naming;
mod stmt;
mod types;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::ast::{AstArena, CompilationUnit, Ident, IdentName, Interner, ListRef, TypeId};
use crate::comment::Comment;
use crate::diagnostics::LineIndex;
use crate::error::{Diag, DiagKind, FileId, Recovery, Span};
use crate::lexer::{tokenize, Tok, Token};

/// One parsed compilation unit together with everything needed to read it.
#[derive(Debug)]
pub struct ParsedFile {
    pub file: FileId,
    pub name: String,
    pub source: String,
    pub lines: LineIndex,
    pub arena: AstArena,
    pub interner: Interner,
    pub unit: CompilationUnit,
    /// Lex and parse diagnostics in source order.
    pub diags: Vec<Diag>,
}

impl ParsedFile {
    #[inline]
    pub fn ident(&self, name: IdentName) -> &str {
        self.interner.resolve(name.sym)
    }

    #[inline]
    pub fn sym(&self, sym: Ident) -> &str {
        self.interner.resolve(sym)
    }

    /// Dotted text of a qualified name (`a.b.C`).
    pub fn qualified(&self, path: ListRef<IdentName>) -> String {
        let parts: Vec<&str> = self
            .arena
            .ident_names(path)
            .iter()
            .map(|n| self.ident(*n))
            .collect();
        parts.join(".")
    }

    #[inline]
    pub fn text(&self, span: Span) -> &str {
        crate::diagnostics::snippet(&self.source, span)
    }

    /// 1-based line of a byte offset.
    #[inline]
    pub fn line(&self, offset: u32) -> u32 {
        self.lines.line(offset)
    }

    /// Normalised text of a doc comment attached to a declaration.
    pub fn doc(&self, span: Option<Span>) -> Option<String> {
        let span = span?;
        Comment::parse(self.text(span)).ok().map(|c| c.content)
    }

    /// Source-like rendering of a type, with generic arguments.
    pub fn type_text(&self, id: TypeId) -> String {
        types::render(self, id)
    }

    /// Type name without generic arguments, as used for reference lookup.
    pub fn type_name(&self, id: TypeId) -> String {
        types::erased(self, id)
    }

    /// Simple type name with array dimensions, as used in signature keys.
    pub fn type_key(&self, id: TypeId) -> String {
        types::simple_key(self, id)
    }

    pub fn has_errors(&self) -> bool {
        self.diags.iter().any(Diag::is_error)
    }
}

/// Parses one source text as file 0.
pub fn parse_source(src: &str) -> ParsedFile {
    parse_file(FileId(0), "<source>", src)
}

pub fn parse_file(file: FileId, name: &str, src: &str) -> ParsedFile {
    let (toks, lex_diags) = tokenize(src, file);
    let mut p = Parser::new(src, file, toks);
    let unit = p.parse_compilation_unit();
    naming::name_anonymous_classes(&mut p.arena, &mut p.interner, &unit);

    let mut diags = lex_diags;
    diags.extend(p.diags);
    diags.sort_by_key(|d| (d.span.start, d.span.end));

    debug!(
        file = name,
        types = p.arena.type_decls.len(),
        methods = p.arena.methods.len(),
        diags = diags.len(),
        "parsed compilation unit"
    );

    ParsedFile {
        file,
        name: name.to_string(),
        source: src.to_string(),
        lines: LineIndex::new(src),
        arena: p.arena,
        interner: p.interner,
        unit,
        diags,
    }
}

// =============================================================================
// Parser state and token cursor
// =============================================================================

/// Deepest nesting of statements, expressions, types and member
/// declarations the parser descends into.
pub const MAX_NESTING: u32 = 128;

/// What a nesting guard skips when the limit is hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Construct {
    /// Up to the next `,`, `;` or unmatched closer; the `;` is left alone.
    Expr,
    /// Through the next `;` or the first `{}` group.
    Stmt,
    /// The rest of one type, up to the `>` or `,` of an enclosing list.
    Type,
}

pub(crate) struct Parser<'src> {
    file: FileId,
    toks: Vec<Token<'src>>,
    pos: usize,
    /// End offset of the last consumed token.
    prev_end: u32,
    pub(crate) arena: AstArena,
    pub(crate) interner: Interner,
    diags: Vec<Diag>,
    last_diag_at: Option<usize>,
    /// Simple names of the enclosing type declarations, innermost last.
    type_names: Vec<Ident>,
    /// Set while parsing `case` labels, where `x -> ...` is not a lambda.
    no_lambda: bool,
    depth: u32,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(src: &'src str, file: FileId, raw: Vec<Token<'src>>) -> Self {
        let mut toks: Vec<Token<'src>> = Vec::with_capacity(raw.len());
        let mut carry: SmallVec<[crate::lexer::Trivia; 1]> = SmallVec::new();
        for mut t in raw {
            if t.tok == Tok::Error {
                carry.extend(t.trivia);
                continue;
            }
            if !carry.is_empty() {
                carry.extend(t.trivia.drain(..));
                t.trivia = std::mem::take(&mut carry);
            }
            toks.push(t);
        }
        if toks.last().map_or(true, |t| t.tok != Tok::Eof) {
            let end = src.len();
            toks.push(Token {
                tok: Tok::Eof,
                span: Span::empty_at(end),
                pos: LineIndex::new(src).line_col(src, end as u32),
                trivia: carry,
            });
        }

        Self {
            file,
            toks,
            pos: 0,
            prev_end: 0,
            arena: AstArena::new(),
            interner: Interner::new(),
            diags: Vec::new(),
            last_diag_at: None,
            type_names: Vec::new(),
            no_lambda: false,
            depth: 0,
        }
    }

    // ---- lookahead ----

    #[inline]
    fn tok_at(&self, idx: usize) -> Tok<'src> {
        let last = self.toks.len() - 1;
        self.toks[idx.min(last)].tok
    }

    #[inline]
    fn peek(&self) -> Tok<'src> {
        self.tok_at(self.pos)
    }

    #[inline]
    fn peek_nth(&self, n: usize) -> Tok<'src> {
        self.tok_at(self.pos + n)
    }

    #[inline]
    fn at(&self, t: Tok<'_>) -> bool {
        self.peek() == t
    }

    #[inline]
    fn at_ident(&self) -> bool {
        matches!(self.peek(), Tok::Ident(_))
    }

    #[inline]
    fn at_eof(&self) -> bool {
        self.at(Tok::Eof)
    }

    #[inline]
    fn cur_span(&self) -> Span {
        self.toks[self.pos.min(self.toks.len() - 1)].span
    }

    /// Start offset of the current token.
    #[inline]
    fn start(&self) -> u32 {
        self.cur_span().start
    }

    /// Span from `start` to the end of the last consumed token. Nodes that
    /// consumed nothing collapse to a zero-width span at `prev_end`, which
    /// keeps them inside every enclosing node.
    #[inline]
    fn finish(&self, start: u32) -> Span {
        if self.prev_end > start {
            Span {
                start,
                end: self.prev_end,
            }
        } else {
            Span {
                start: self.prev_end,
                end: self.prev_end,
            }
        }
    }

    /// Doc comment attached to the current token.
    fn doc_here(&self) -> Option<Span> {
        self.toks
            .get(self.pos)
            .and_then(Token::doc_comment)
            .map(|t| t.span)
    }

    // ---- consumption ----

    #[inline]
    fn bump(&mut self) -> Tok<'src> {
        let t = self.peek();
        if t != Tok::Eof {
            self.prev_end = self.cur_span().end;
            self.pos += 1;
        }
        t
    }

    #[inline]
    fn eat(&mut self, t: Tok<'_>) -> bool {
        if self.at(t) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn ident_name(&mut self) -> Option<IdentName> {
        match self.peek() {
            Tok::Ident(s) => {
                let pos = self.cur_span();
                self.bump();
                Some(IdentName {
                    sym: self.interner.intern(s),
                    pos,
                })
            }
            _ => None,
        }
    }

    /// Identifier or a zero-width placeholder plus a diagnostic.
    fn expect_ident(&mut self, what: &str) -> IdentName {
        if let Some(name) = self.ident_name() {
            return name;
        }
        let found = self.peek();
        self.error_here(
            format!("expected {what}, found {found}"),
            Recovery::InsertedToken("<identifier>"),
        );
        self.missing_name()
    }

    fn missing_name(&mut self) -> IdentName {
        IdentName {
            sym: self.interner.intern(""),
            pos: Span::empty_at(self.prev_end as usize),
        }
    }

    /// Consumes `want` or reports it missing without skipping anything.
    fn expect(&mut self, want: Tok<'static>) -> bool {
        if self.eat(want) {
            return true;
        }
        let found = self.peek();
        self.error_here(
            format!("expected {want}, found {found}"),
            Recovery::InsertedToken(want.text()),
        );
        false
    }

    /// Consumes `want`; if it is missing, reports once and skips forward to
    /// the next `want` (consuming it) or to a stop token from `also`.
    fn expect_sync(&mut self, want: Tok<'static>, also: &[Tok<'static>]) -> bool {
        if self.eat(want) {
            return true;
        }
        let at = self.pos;
        let span = self.cur_span();
        let found = self.peek();
        let mut stop: SmallVec<[Tok<'static>; 4]> = SmallVec::new();
        stop.push(want);
        stop.extend_from_slice(also);
        let skipped = self.skip_until(&stop);
        let found_want = self.eat(want);
        let recovery = match (skipped, found_want) {
            (0, _) => Recovery::InsertedToken(want.text()),
            (n, true) => Recovery::SkippedTokens(n),
            (_, false) => Recovery::Resynchronized,
        };
        self.report_at(at, span, format!("expected {want}, found {found}"), recovery);
        found_want
    }

    // ---- diagnostics ----

    fn report_at(&mut self, tok_idx: usize, span: Span, msg: String, recovery: Recovery) {
        if self.last_diag_at == Some(tok_idx) {
            trace!(%msg, "suppressed duplicate diagnostic");
            return;
        }
        self.last_diag_at = Some(tok_idx);
        trace!(start = span.start, %msg, %recovery, "parse error");
        self.diags.push(
            Diag::error(self.file, DiagKind::Parse, span, msg).with_recovery(recovery),
        );
    }

    fn error_here(&mut self, msg: String, recovery: Recovery) {
        let span = self.cur_span();
        self.report_at(self.pos, span, msg, recovery);
    }

    // ---- recovery ----

    /// Skips tokens until one in `stop`, an unmatched closer or EOF.
    /// Balanced groups are skipped whole. Returns the number of tokens skipped.
    fn skip_until(&mut self, stop: &[Tok<'static>]) -> u32 {
        let mut skipped = 0;
        loop {
            let t = self.peek();
            if t == Tok::Eof || stop.iter().any(|s| *s == t) {
                break;
            }
            match t {
                Tok::RParen | Tok::RBrack | Tok::RBrace => break,
                Tok::LParen | Tok::LBrack | Tok::LBrace => skipped += self.skip_group(),
                _ => {
                    self.bump();
                    skipped += 1;
                }
            }
        }
        skipped
    }

    /// Skips a balanced group starting at the current opener.
    fn skip_group(&mut self) -> u32 {
        let mut depth = 0u32;
        let mut skipped = 0;
        loop {
            match self.peek() {
                Tok::Eof => break,
                Tok::LParen | Tok::LBrack | Tok::LBrace => depth += 1,
                Tok::RParen | Tok::RBrack | Tok::RBrace => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.bump();
            skipped += 1;
            if depth == 0 {
                break;
            }
        }
        skipped
    }

    /// Reports the current token as unexpected and steps past it, so the
    /// caller's loop makes progress.
    fn skip_unexpected(&mut self, expected: &str) {
        let found = self.peek();
        let at = self.pos;
        let span = self.cur_span();
        let n = match found {
            Tok::LParen | Tok::LBrack | Tok::LBrace => self.skip_group(),
            Tok::Eof => 0,
            _ => {
                self.bump();
                1
            }
        };
        self.report_at(
            at,
            span,
            format!("expected {expected}, found {found}"),
            Recovery::SkippedTokens(n),
        );
    }

    /// Resynchronises at the end of the current statement: skips to the next
    /// `;` (consumed) or block boundary (not consumed).
    fn recover_statement(&mut self, msg: String) {
        let at = self.pos;
        let span = self.cur_span();
        let mut skipped = self.skip_until(&[Tok::Semi]);
        if self.eat(Tok::Semi) {
            skipped += 1;
        } else if skipped == 0 && !matches!(self.peek(), Tok::RBrace | Tok::Eof) {
            // Unmatched `)` or `]`: drop it so the enclosing loop advances.
            self.bump();
            skipped = 1;
        }
        debug!(start = span.start, skipped, "resynchronized at statement boundary");
        let recovery = if skipped == 0 {
            Recovery::Resynchronized
        } else {
            Recovery::SkippedTokens(skipped)
        };
        self.report_at(at, span, msg, recovery);
    }

    /// Runs `f` one nesting level deeper. Past [`MAX_NESTING`] the construct
    /// at the cursor is reported once and skipped, and `bail` builds the
    /// placeholder that stands in for it.
    fn nested<T>(
        &mut self,
        what: Construct,
        f: impl FnOnce(&mut Self) -> T,
        bail: impl FnOnce(&mut Self) -> T,
    ) -> T {
        if self.depth >= MAX_NESTING {
            self.skip_too_deep(what);
            return bail(self);
        }
        self.depth += 1;
        let out = f(self);
        self.depth -= 1;
        out
    }

    fn skip_too_deep(&mut self, what: Construct) {
        let at = self.pos;
        let span = self.cur_span();
        let skipped = match what {
            Construct::Type => self.skip_type_tail(),
            Construct::Expr | Construct::Stmt => self.skip_code(what),
        };
        debug!(start = span.start, skipped, "skipped construct nested too deeply");
        let recovery = if skipped == 0 {
            Recovery::Resynchronized
        } else {
            Recovery::SkippedTokens(skipped)
        };
        self.report_at(
            at,
            span,
            format!("nesting deeper than {MAX_NESTING} levels"),
            recovery,
        );
    }

    /// Skips an expression or statement; see [`Construct`].
    fn skip_code(&mut self, what: Construct) -> u32 {
        let mut skipped = 0;
        loop {
            match self.peek() {
                Tok::Eof | Tok::RParen | Tok::RBrack | Tok::RBrace => break,
                Tok::Comma if what == Construct::Expr => break,
                Tok::Semi => {
                    if what == Construct::Stmt {
                        self.bump();
                        skipped += 1;
                    }
                    break;
                }
                Tok::LBrace if what == Construct::Stmt => {
                    skipped += self.skip_group();
                    break;
                }
                Tok::LParen | Tok::LBrack | Tok::LBrace => skipped += self.skip_group(),
                _ => {
                    self.bump();
                    skipped += 1;
                }
            }
        }
        skipped
    }

    /// Skips one type whose arguments are too deep to parse. `<` opened here
    /// is closed here, one `>` at a time, so the enclosing lists still find
    /// their own closers.
    fn skip_type_tail(&mut self) -> u32 {
        let mut open = 0u32;
        let mut skipped = 0;
        let mut want_name = true;
        loop {
            match self.peek() {
                Tok::Gt | Tok::Shr | Tok::UShr if open > 0 => {
                    self.split_gt();
                    open -= 1;
                    skipped += 1;
                    want_name = false;
                    continue;
                }
                Tok::Lt => open += 1,
                Tok::Ident(_) if want_name || open > 0 => want_name = false,
                Tok::Dot => want_name = true,
                Tok::Comma | Tok::Question | Tok::KwExtends | Tok::KwSuper | Tok::Amp
                    if open > 0 =>
                {
                    want_name = true;
                }
                Tok::LBrack | Tok::RBrack => {}
                t if types::primitive(t).is_some() => want_name = false,
                _ => break,
            }
            self.bump();
            skipped += 1;
        }
        skipped
    }

    /// Splits a leading `>` off `>>`, `>>>`, `>=`, `>>=` or `>>>=` so type
    /// argument lists can close one level at a time. Returns `false` if the
    /// current token does not start with `>`.
    fn split_gt(&mut self) -> bool {
        let rest = match self.peek() {
            Tok::Gt => {
                self.bump();
                return true;
            }
            Tok::Shr => Tok::Gt,
            Tok::UShr => Tok::Shr,
            Tok::Ge => Tok::Assign,
            Tok::ShrAssign => Tok::Ge,
            Tok::UShrAssign => Tok::ShrAssign,
            _ => return false,
        };
        let idx = self.pos;
        let tok = &mut self.toks[idx];
        tok.tok = rest;
        tok.span.start += 1;
        tok.pos.col += 1;
        tok.trivia.clear();
        self.prev_end = tok.span.start;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_yields_empty_unit() {
        let f = parse_source("");
        assert!(f.unit.package.is_none());
        assert!(f.unit.types.is_empty());
        assert!(f.diags.is_empty());
    }

    #[test]
    fn split_gt_keeps_remaining_token() {
        let src = "List<List<String>> x;";
        let (toks, _) = tokenize(src, FileId(0));
        let mut p = Parser::new(src, FileId(0), toks);
        while !p.at(Tok::Shr) {
            p.bump();
        }
        assert!(p.split_gt());
        assert_eq!(p.peek(), Tok::Gt);
        assert_eq!(p.cur_span(), Span::new(17, 18));
        assert_eq!(p.prev_end, 17);
    }

    #[test]
    fn error_tokens_are_dropped() {
        let src = "class A { # }";
        let f = parse_source(src);
        assert_eq!(f.diags.len(), 1);
        assert_eq!(f.diags[0].kind, DiagKind::Lex);
        assert_eq!(f.arena.type_decls.len(), 1);
    }
}
