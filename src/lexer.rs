use std::ops::Range;

use logos::{Lexer as LogosLexer, Logos};
use memchr::{memchr, memchr2, memchr_iter, memrchr};
use smallvec::SmallVec;

use crate::diagnostics::{LineCol, LineIndex};
use crate::error::{Diag, FileId, LexError, LexErrorKind, Span};

// =============================================================================
// 1. Comment scanners (manual; memchr)
// =============================================================================

#[inline]
fn lex_line_comment(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let rem = lex.remainder().as_bytes();
    let end = memchr2(b'\n', b'\r', rem).unwrap_or(rem.len());
    lex.bump(end);
    Ok(())
}

#[inline]
fn lex_block_comment(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let rem = lex.remainder().as_bytes();
    let mut search_start = 0;

    while let Some(star_pos) = memchr(b'*', &rem[search_start..]) {
        let abs_pos = search_start + star_pos;
        if rem.get(abs_pos + 1) == Some(&b'/') {
            lex.bump(abs_pos + 2);
            return Ok(());
        }
        search_start = abs_pos + 1;
    }

    // Block comments do not nest; a missing `*/` swallows the rest of the input.
    lex.bump(rem.len());
    Err(LexErrorKind::UnterminatedComment)
}

#[inline]
fn unterminated_string(_: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    Err(LexErrorKind::UnterminatedString)
}

#[inline]
fn unterminated_char(_: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    Err(LexErrorKind::UnterminatedChar)
}

// =============================================================================
// 2. Raw token definition (logos DFA)
// =============================================================================

#[repr(u8)]
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\r\n\x0C]+")]
#[rustfmt::skip]
enum RawTok {
    #[token("\u{FEFF}")] Bom,

    // Trivia
    #[token("//", lex_line_comment)] LineComment,
    #[token("/*", lex_block_comment)] BlockComment,

    // Keywords (before Ident)
    #[token("abstract")] KwAbstract,
    #[token("assert")] KwAssert,
    #[token("boolean")] KwBoolean,
    #[token("break")] KwBreak,
    #[token("byte")] KwByte,
    #[token("case")] KwCase,
    #[token("catch")] KwCatch,
    #[token("char")] KwChar,
    #[token("class")] KwClass,
    #[token("const")] KwConst,
    #[token("continue")] KwContinue,
    #[token("default")] KwDefault,
    #[token("do")] KwDo,
    #[token("double")] KwDouble,
    #[token("else")] KwElse,
    #[token("enum")] KwEnum,
    #[token("extends")] KwExtends,
    #[token("final")] KwFinal,
    #[token("finally")] KwFinally,
    #[token("float")] KwFloat,
    #[token("for")] KwFor,
    #[token("goto")] KwGoto,
    #[token("if")] KwIf,
    #[token("implements")] KwImplements,
    #[token("import")] KwImport,
    #[token("instanceof")] KwInstanceof,
    #[token("int")] KwInt,
    #[token("interface")] KwInterface,
    #[token("long")] KwLong,
    #[token("native")] KwNative,
    #[token("new")] KwNew,
    #[token("package")] KwPackage,
    #[token("private")] KwPrivate,
    #[token("protected")] KwProtected,
    #[token("public")] KwPublic,
    #[token("return")] KwReturn,
    #[token("short")] KwShort,
    #[token("static")] KwStatic,
    #[token("strictfp")] KwStrictfp,
    #[token("super")] KwSuper,
    #[token("switch")] KwSwitch,
    #[token("synchronized")] KwSynchronized,
    #[token("this")] KwThis,
    #[token("throw")] KwThrow,
    #[token("throws")] KwThrows,
    #[token("transient")] KwTransient,
    #[token("try")] KwTry,
    #[token("void")] KwVoid,
    #[token("volatile")] KwVolatile,
    #[token("while")] KwWhile,
    #[token("true")] KwTrue,
    #[token("false")] KwFalse,
    #[token("null")] KwNull,

    // Identifiers
    #[regex(r"[_$\p{L}][_$\p{L}\p{Nd}]*")] Ident,

    // Numbers
    #[regex(r"[0-9][0-9_]*[lL]?")]
    #[regex(r"0[xX][0-9a-fA-F_]+[lL]?")]
    #[regex(r"0[bB][01_]+[lL]?")]
    Int,
    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9]+)?[fFdD]?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?[fFdD]?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+[fFdD]?")]
    #[regex(r"[0-9][0-9_]*[fFdD]")]
    Float,

    // Strings / chars
    // The unterminated forms run to the end of the line; a closed literal
    // is always the longer match.
    #[regex(r#""([^"\\\n\r]|\\[^\n\r])*""#)] String,
    #[regex(r#""([^"\\\n\r]|\\[^\n\r])*\\?"#, unterminated_string)] UnterminatedString,
    #[regex(r"'([^'\\\n\r]|\\[^\n\r])+'")] Char,
    #[regex(r"'([^'\\\n\r]|\\[^\n\r])*\\?", unterminated_char)] UnterminatedChar,

    // Separators
    #[token("(")] LParen,
    #[token(")")] RParen,
    #[token("{")] LBrace,
    #[token("}")] RBrace,
    #[token("[")] LBrack,
    #[token("]")] RBrack,
    #[token(";")] Semi,
    #[token(",")] Comma,
    #[token(".")] Dot,
    #[token("...")] Ellipsis,
    #[token("@")] At,
    #[token("::")] ColonColon,

    // Operators
    #[token(">>>=")] UShrAssign,
    #[token("<<=")] ShlAssign,
    #[token(">>=")] ShrAssign,
    #[token(">>>")] UShr,
    #[token("+=")] AddAssign,
    #[token("-=")] SubAssign,
    #[token("*=")] MulAssign,
    #[token("/=")] DivAssign,
    #[token("&=")] AndAssign,
    #[token("|=")] OrAssign,
    #[token("^=")] XorAssign,
    #[token("%=")] ModAssign,
    #[token("<<")] Shl,
    #[token(">>")] Shr,
    #[token("->")] Arrow,
    #[token("==")] EqEq,
    #[token("<=")] Le,
    #[token(">=")] Ge,
    #[token("!=")] NotEq,
    #[token("&&")] LAnd,
    #[token("||")] LOr,
    #[token("++")] Inc,
    #[token("--")] Dec,
    #[token("=")] Assign,
    #[token(">")] Gt,
    #[token("<")] Lt,
    #[token("!")] Bang,
    #[token("~")] Tilde,
    #[token("?")] Question,
    #[token(":")] Colon,
    #[token("+")] Plus,
    #[token("-")] Minus,
    #[token("*")] Star,
    #[token("/")] Slash,
    #[token("&")] Amp,
    #[token("|")] Pipe,
    #[token("^")] Caret,
    #[token("%")] Percent,

    // Catch-all (lowest priority)
    #[regex(r".", priority = 0)] Error,
}

impl RawTok {
    #[inline]
    const fn to_token<'src>(self, slice: &'src str) -> Tok<'src> {
        macro_rules! map_tok {
            (literals { $($lraw:ident => $ltok:ident),* $(,)? } simple { $($raw:ident),* $(,)? }) => {
                match self {
                    $(Self::$lraw => Tok::$ltok(slice),)*
                    $(Self::$raw => Tok::$raw,)*
                    // Handled by the wrapper before conversion.
                    Self::Bom | Self::LineComment | Self::BlockComment
                    | Self::UnterminatedString | Self::UnterminatedChar | Self::Error => Tok::Error,
                }
            };
        }
        map_tok! {
            literals {
                Ident => Ident, Int => IntLit, Float => FloatLit,
                String => StringLit, Char => CharLit,
            }
            simple {
                KwAbstract, KwAssert, KwBoolean, KwBreak, KwByte, KwCase, KwCatch, KwChar,
                KwClass, KwConst, KwContinue, KwDefault, KwDo, KwDouble, KwElse, KwEnum,
                KwExtends, KwFinal, KwFinally, KwFloat, KwFor, KwGoto, KwIf, KwImplements,
                KwImport, KwInstanceof, KwInt, KwInterface, KwLong, KwNative, KwNew, KwPackage,
                KwPrivate, KwProtected, KwPublic, KwReturn, KwShort, KwStatic, KwStrictfp,
                KwSuper, KwSwitch, KwSynchronized, KwThis, KwThrow, KwThrows, KwTransient,
                KwTry, KwVoid, KwVolatile, KwWhile, KwTrue, KwFalse, KwNull,
                LParen, RParen, LBrace, RBrace, LBrack, RBrack, Semi, Comma, Dot, Ellipsis,
                At, ColonColon, UShrAssign, ShlAssign, ShrAssign, UShr, AddAssign, SubAssign,
                MulAssign, DivAssign, AndAssign, OrAssign, XorAssign, ModAssign, Shl, Shr,
                Arrow, EqEq, Le, Ge, NotEq, LAnd, LOr, Inc, Dec, Assign, Gt, Lt, Bang, Tilde,
                Question, Colon, Plus, Minus, Star, Slash, Amp, Pipe, Caret, Percent,
            }
        }
    }
}

// =============================================================================
// 3. Public token definition (zero-copy)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tok<'input> {
    Ident(&'input str),
    IntLit(&'input str),
    FloatLit(&'input str),
    CharLit(&'input str),
    StringLit(&'input str),

    // Keywords
    KwAbstract,
    KwAssert,
    KwBoolean,
    KwBreak,
    KwByte,
    KwCase,
    KwCatch,
    KwChar,
    KwClass,
    KwConst,
    KwContinue,
    KwDefault,
    KwDo,
    KwDouble,
    KwElse,
    KwEnum,
    KwExtends,
    KwFinal,
    KwFinally,
    KwFloat,
    KwFor,
    KwGoto,
    KwIf,
    KwImplements,
    KwImport,
    KwInstanceof,
    KwInt,
    KwInterface,
    KwLong,
    KwNative,
    KwNew,
    KwPackage,
    KwPrivate,
    KwProtected,
    KwPublic,
    KwReturn,
    KwShort,
    KwStatic,
    KwStrictfp,
    KwSuper,
    KwSwitch,
    KwSynchronized,
    KwThis,
    KwThrow,
    KwThrows,
    KwTransient,
    KwTry,
    KwVoid,
    KwVolatile,
    KwWhile,
    KwTrue,
    KwFalse,
    KwNull,

    // Separators
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBrack,
    RBrack,
    Semi,
    Comma,
    Dot,
    Ellipsis,
    At,
    ColonColon,

    // Operators
    UShrAssign,
    ShlAssign,
    ShrAssign,
    UShr,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    ModAssign,
    Shl,
    Shr,
    Arrow,
    EqEq,
    Le,
    Ge,
    NotEq,
    LAnd,
    LOr,
    Inc,
    Dec,
    Assign,
    Gt,
    Lt,
    Bang,
    Tilde,
    Question,
    Colon,
    Plus,
    Minus,
    Star,
    Slash,
    Amp,
    Pipe,
    Caret,
    Percent,

    Error,
    Eof,
}

impl<'input> Tok<'input> {
    /// Source text of the token; literal kinds return their lexeme.
    #[rustfmt::skip]
    pub const fn text(&self) -> &'input str {
        match self {
            Tok::Ident(s) | Tok::IntLit(s) | Tok::FloatLit(s) | Tok::CharLit(s) | Tok::StringLit(s) => *s,
            Tok::KwAbstract => "abstract", Tok::KwAssert => "assert", Tok::KwBoolean => "boolean",
            Tok::KwBreak => "break", Tok::KwByte => "byte", Tok::KwCase => "case",
            Tok::KwCatch => "catch", Tok::KwChar => "char", Tok::KwClass => "class",
            Tok::KwConst => "const", Tok::KwContinue => "continue", Tok::KwDefault => "default",
            Tok::KwDo => "do", Tok::KwDouble => "double", Tok::KwElse => "else",
            Tok::KwEnum => "enum", Tok::KwExtends => "extends", Tok::KwFinal => "final",
            Tok::KwFinally => "finally", Tok::KwFloat => "float", Tok::KwFor => "for",
            Tok::KwGoto => "goto", Tok::KwIf => "if", Tok::KwImplements => "implements",
            Tok::KwImport => "import", Tok::KwInstanceof => "instanceof", Tok::KwInt => "int",
            Tok::KwInterface => "interface", Tok::KwLong => "long", Tok::KwNative => "native",
            Tok::KwNew => "new", Tok::KwPackage => "package", Tok::KwPrivate => "private",
            Tok::KwProtected => "protected", Tok::KwPublic => "public", Tok::KwReturn => "return",
            Tok::KwShort => "short", Tok::KwStatic => "static", Tok::KwStrictfp => "strictfp",
            Tok::KwSuper => "super", Tok::KwSwitch => "switch", Tok::KwSynchronized => "synchronized",
            Tok::KwThis => "this", Tok::KwThrow => "throw", Tok::KwThrows => "throws",
            Tok::KwTransient => "transient", Tok::KwTry => "try", Tok::KwVoid => "void",
            Tok::KwVolatile => "volatile", Tok::KwWhile => "while", Tok::KwTrue => "true",
            Tok::KwFalse => "false", Tok::KwNull => "null",
            Tok::LParen => "(", Tok::RParen => ")", Tok::LBrace => "{", Tok::RBrace => "}",
            Tok::LBrack => "[", Tok::RBrack => "]", Tok::Semi => ";", Tok::Comma => ",",
            Tok::Dot => ".", Tok::Ellipsis => "...", Tok::At => "@", Tok::ColonColon => "::",
            Tok::UShrAssign => ">>>=", Tok::ShlAssign => "<<=", Tok::ShrAssign => ">>=",
            Tok::UShr => ">>>", Tok::AddAssign => "+=", Tok::SubAssign => "-=",
            Tok::MulAssign => "*=", Tok::DivAssign => "/=", Tok::AndAssign => "&=",
            Tok::OrAssign => "|=", Tok::XorAssign => "^=", Tok::ModAssign => "%=",
            Tok::Shl => "<<", Tok::Shr => ">>", Tok::Arrow => "->", Tok::EqEq => "==",
            Tok::Le => "<=", Tok::Ge => ">=", Tok::NotEq => "!=", Tok::LAnd => "&&",
            Tok::LOr => "||", Tok::Inc => "++", Tok::Dec => "--", Tok::Assign => "=",
            Tok::Gt => ">", Tok::Lt => "<", Tok::Bang => "!", Tok::Tilde => "~",
            Tok::Question => "?", Tok::Colon => ":", Tok::Plus => "+", Tok::Minus => "-",
            Tok::Star => "*", Tok::Slash => "/", Tok::Amp => "&", Tok::Pipe => "|",
            Tok::Caret => "^", Tok::Percent => "%",
            Tok::Error => "<error>", Tok::Eof => "<eof>",
        }
    }

    #[inline]
    pub const fn is_primitive_type(&self) -> bool {
        matches!(
            self,
            Tok::KwBoolean
                | Tok::KwByte
                | Tok::KwChar
                | Tok::KwShort
                | Tok::KwInt
                | Tok::KwLong
                | Tok::KwFloat
                | Tok::KwDouble
        )
    }

    #[inline]
    pub const fn is_modifier(&self) -> bool {
        matches!(
            self,
            Tok::KwPublic
                | Tok::KwProtected
                | Tok::KwPrivate
                | Tok::KwStatic
                | Tok::KwFinal
                | Tok::KwAbstract
                | Tok::KwSynchronized
                | Tok::KwNative
                | Tok::KwTransient
                | Tok::KwVolatile
                | Tok::KwStrictfp
                | Tok::KwDefault
        )
    }
}

impl<'input> std::fmt::Display for Tok<'input> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "`{}`", self.text())
    }
}

// =============================================================================
// 4. Trivia + Token
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentKind {
    /// `// ...`
    Line,
    /// `/* ... */`
    Block,
    /// `/** ... */`
    Doc,
}

/// A comment preceding a token. Text is recovered from the source via `span`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trivia {
    pub kind: CommentKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'src> {
    pub tok: Tok<'src>,
    pub span: Span,
    pub pos: LineCol,
    /// Comments between the previous token and this one, in source order.
    pub trivia: SmallVec<[Trivia; 1]>,
}

impl<'src> Token<'src> {
    /// Last doc comment in the leading trivia, if any.
    #[inline]
    pub fn doc_comment(&self) -> Option<Trivia> {
        self.trivia
            .iter()
            .rev()
            .find(|t| t.kind == CommentKind::Doc)
            .copied()
    }
}

// =============================================================================
// 5. Lexer wrapper: trivia attachment + positions + diags
// =============================================================================

pub struct Lexer<'src> {
    src: &'src str,
    file: FileId,
    logos: LogosLexer<'src, RawTok>,
    lines: LineIndex,
    trivia: SmallVec<[Trivia; 1]>,
    diags: Vec<Diag>,
    eof_done: bool,
    // Position of the last token start; tokens arrive in offset order.
    cursor: usize,
    cursor_pos: LineCol,
}

impl<'src> Lexer<'src> {
    pub fn new(input: &'src str) -> Self {
        Self::with_file(input, FileId::default())
    }

    pub fn with_file(input: &'src str, file: FileId) -> Self {
        Self {
            src: input,
            file,
            logos: RawTok::lexer(input),
            lines: LineIndex::new(input),
            trivia: SmallVec::new(),
            diags: Vec::with_capacity(4),
            eof_done: false,
            cursor: 0,
            cursor_pos: LineCol { line: 1, col: 1 },
        }
    }

    /// Restarts scanning from the beginning of the source.
    pub fn reset(&mut self) {
        self.logos = RawTok::lexer(self.src);
        self.trivia.clear();
        self.diags.clear();
        self.eof_done = false;
        self.cursor = 0;
        self.cursor_pos = LineCol { line: 1, col: 1 };
    }

    #[inline]
    pub fn source(&self) -> &'src str {
        self.src
    }

    #[inline]
    pub fn line_index(&self) -> &LineIndex {
        &self.lines
    }

    pub fn take_diags(&mut self) -> Vec<Diag> {
        std::mem::take(&mut self.diags)
    }

    #[inline]
    fn make(&mut self, tok: Tok<'src>, span: Range<usize>) -> Token<'src> {
        let span = Span::from_range(span);
        Token {
            tok,
            span,
            pos: self.position(span.start as usize),
            trivia: std::mem::take(&mut self.trivia),
        }
    }

    /// Line and column of `offset`, counted from the previous token so a
    /// long line is scanned once rather than once per token.
    fn position(&mut self, offset: usize) -> LineCol {
        let Some(gap) = self.src.get(self.cursor..offset) else {
            return self.lines.line_col(self.src, offset as u32);
        };
        let bytes = gap.as_bytes();
        let pos = match memrchr(b'\n', bytes) {
            Some(last) => LineCol {
                line: self.cursor_pos.line + memchr_iter(b'\n', bytes).count() as u32,
                col: chars_in(&gap[last + 1..]) + 1,
            },
            None => LineCol {
                line: self.cursor_pos.line,
                col: self.cursor_pos.col + chars_in(gap),
            },
        };
        self.cursor = offset;
        self.cursor_pos = pos;
        pos
    }

    #[inline]
    fn push_lex_diag(&mut self, kind: LexErrorKind, span: Range<usize>) {
        let err = LexError {
            kind,
            span: Span::from_range(span),
        };
        self.diags.push(err.diag(self.file));
    }

    #[inline]
    fn handle_trivia(&mut self, raw: RawTok, span: &Range<usize>, slice: &str) -> bool {
        let kind = match raw {
            RawTok::LineComment => CommentKind::Line,
            // `/**/` is an empty block comment, not a doc comment.
            RawTok::BlockComment if slice.starts_with("/**") && slice != "/**/" => CommentKind::Doc,
            RawTok::BlockComment => CommentKind::Block,
            _ => return false,
        };
        self.trivia.push(Trivia {
            kind,
            span: Span::from_range(span.clone()),
        });
        true
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.eof_done {
                return None;
            }

            match self.logos.next() {
                None => {
                    self.eof_done = true;
                    let end = self.src.len();
                    return Some(self.make(Tok::Eof, end..end));
                }
                Some(Err(kind)) => {
                    let span = self.logos.span();
                    self.push_lex_diag(kind, span.clone());
                    return Some(self.make(Tok::Error, span));
                }
                Some(Ok(raw)) => {
                    let span = self.logos.span();
                    let slice = self.logos.slice();

                    if raw == RawTok::Bom {
                        if span.start == 0 {
                            continue;
                        }
                        self.push_lex_diag(LexErrorKind::InvalidToken, span.clone());
                        return Some(self.make(Tok::Error, span));
                    }

                    if self.handle_trivia(raw, &span, slice) {
                        continue;
                    }

                    if raw == RawTok::Error {
                        self.push_lex_diag(LexErrorKind::InvalidToken, span.clone());
                        return Some(self.make(Tok::Error, span));
                    }

                    let tok = raw.to_token(slice);
                    return Some(self.make(tok, span));
                }
            }
        }
    }
}

#[inline]
fn chars_in(s: &str) -> u32 {
    if s.is_ascii() {
        s.len() as u32
    } else {
        s.chars().count() as u32
    }
}

/// Lexes `src` completely. The last token is always `Tok::Eof`.
pub fn tokenize(src: &str, file: FileId) -> (Vec<Token<'_>>, Vec<Diag>) {
    let mut lx = Lexer::with_file(src, file);
    let toks: Vec<_> = lx.by_ref().collect();
    let diags = lx.take_diags();
    (toks, diags)
}
