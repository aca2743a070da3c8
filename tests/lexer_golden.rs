// tests/lexer_golden.rs
use java_inspector::error::Diag;
use java_inspector::lexer::{CommentKind, Lexer, Tok, Token};

fn lex_all(input: &str) -> (Vec<Token<'_>>, Vec<Diag>) {
    let mut lx = Lexer::new(input);
    let toks: Vec<_> = lx.by_ref().collect();
    let diags = lx.take_diags();
    (toks, diags)
}

fn toks(input: &str) -> Vec<Tok<'_>> {
    let (toks, diags) = lex_all(input);
    assert!(diags.is_empty(), "unexpected diagnostics for {input:?}: {diags:#?}");
    toks.into_iter().map(|t| t.tok).collect()
}

#[test]
fn declarations_and_literals() {
    assert_eq!(
        toks("int x = 0x1F + 3.5e2f - 10L;"),
        vec![
            Tok::KwInt,
            Tok::Ident("x"),
            Tok::Assign,
            Tok::IntLit("0x1F"),
            Tok::Plus,
            Tok::FloatLit("3.5e2f"),
            Tok::Minus,
            Tok::IntLit("10L"),
            Tok::Semi,
            Tok::Eof,
        ]
    );
}

#[test]
fn numeric_forms() {
    let table: &[(&str, Tok<'_>)] = &[
        ("0", Tok::IntLit("0")),
        ("1_000_000", Tok::IntLit("1_000_000")),
        ("0b1010", Tok::IntLit("0b1010")),
        ("0xCAFE_BABEL", Tok::IntLit("0xCAFE_BABEL")),
        ("1.", Tok::FloatLit("1.")),
        (".5", Tok::FloatLit(".5")),
        ("1e10", Tok::FloatLit("1e10")),
        ("2.5D", Tok::FloatLit("2.5D")),
        ("7f", Tok::FloatLit("7f")),
    ];
    for (src, want) in table {
        assert_eq!(toks(src), vec![*want, Tok::Eof], "input {src:?}");
    }
}

#[test]
fn strings_and_chars_keep_their_quotes() {
    assert_eq!(
        toks(r#"s = "a\"b" + 'c' + '\n';"#),
        vec![
            Tok::Ident("s"),
            Tok::Assign,
            Tok::StringLit(r#""a\"b""#),
            Tok::Plus,
            Tok::CharLit("'c'"),
            Tok::Plus,
            Tok::CharLit(r"'\n'"),
            Tok::Semi,
            Tok::Eof,
        ]
    );
}

#[test]
fn longest_operator_wins() {
    assert_eq!(
        toks("a >>>= b >> c >>> d >= e"),
        vec![
            Tok::Ident("a"),
            Tok::UShrAssign,
            Tok::Ident("b"),
            Tok::Shr,
            Tok::Ident("c"),
            Tok::UShr,
            Tok::Ident("d"),
            Tok::Ge,
            Tok::Ident("e"),
            Tok::Eof,
        ]
    );
    assert_eq!(
        toks("x -> y::z ... @A"),
        vec![
            Tok::Ident("x"),
            Tok::Arrow,
            Tok::Ident("y"),
            Tok::ColonColon,
            Tok::Ident("z"),
            Tok::Ellipsis,
            Tok::At,
            Tok::Ident("A"),
            Tok::Eof,
        ]
    );
}

#[test]
fn keywords_are_not_identifiers() {
    assert_eq!(
        toks("public synchronized void classy(final int $a, long _b)"),
        vec![
            Tok::KwPublic,
            Tok::KwSynchronized,
            Tok::KwVoid,
            Tok::Ident("classy"),
            Tok::LParen,
            Tok::KwFinal,
            Tok::KwInt,
            Tok::Ident("$a"),
            Tok::Comma,
            Tok::KwLong,
            Tok::Ident("_b"),
            Tok::RParen,
            Tok::Eof,
        ]
    );
}

#[test]
fn unicode_identifiers() {
    assert_eq!(
        toks("café = 名前;"),
        vec![
            Tok::Ident("café"),
            Tok::Assign,
            Tok::Ident("名前"),
            Tok::Semi,
            Tok::Eof,
        ]
    );
}

#[test]
fn comments_become_trivia_of_the_next_token() {
    let src = "/** Doc. */\nclass // trailing\nA /* inner */ { }\n// end";
    let (toks, diags) = lex_all(src);
    assert!(diags.is_empty());

    let kinds: Vec<Tok<'_>> = toks.iter().map(|t| t.tok).collect();
    assert_eq!(
        kinds,
        vec![Tok::KwClass, Tok::Ident("A"), Tok::LBrace, Tok::RBrace, Tok::Eof]
    );

    let trivia = |i: usize| -> Vec<CommentKind> { toks[i].trivia.iter().map(|t| t.kind).collect() };
    assert_eq!(trivia(0), [CommentKind::Doc]);
    assert_eq!(trivia(1), [CommentKind::Line]);
    assert_eq!(trivia(2), [CommentKind::Block]);
    assert!(trivia(3).is_empty());
    assert_eq!(trivia(4), [CommentKind::Line]);

    let doc = toks[0].doc_comment().unwrap();
    assert_eq!(&src[doc.span.range()], "/** Doc. */");
}

#[test]
fn empty_block_comment_is_not_doc() {
    let (toks, _) = lex_all("/**/ x");
    assert_eq!(toks[0].trivia[0].kind, CommentKind::Block);
    assert!(toks[0].doc_comment().is_none());
}

#[test]
fn block_comments_do_not_nest() {
    assert_eq!(
        toks("/* a /* b */ c */"),
        vec![Tok::Ident("c"), Tok::Star, Tok::Slash, Tok::Eof]
    );
}

#[test]
fn positions_are_one_based_line_and_column() {
    let (toks, _) = lex_all("a\n  bb\r\n\tc");
    let pos: Vec<(u32, u32)> = toks.iter().map(|t| (t.pos.line, t.pos.col)).collect();
    assert_eq!(pos, [(1, 1), (2, 3), (3, 2), (3, 3)]);
}

#[test]
fn positions_on_one_long_line() {
    // 20k statements without a newline; the non-ASCII name shifts byte
    // offsets away from columns.
    let stmt = "é = é + 1; ";
    let src = stmt.repeat(20_000);
    let (toks, diags) = lex_all(&src);
    assert!(diags.is_empty());
    let per_stmt = stmt.chars().count() as u32;
    let last_ident = toks
        .iter()
        .rev()
        .find(|t| t.tok == Tok::Ident("é"))
        .map(|t| (t.pos.line, t.pos.col));
    assert_eq!(last_ident, Some((1, 19_999 * per_stmt + 5)));
    let eof = toks.last().map(|t| (t.tok, t.pos.line, t.pos.col));
    assert_eq!(eof, Some((Tok::Eof, 1, 20_000 * per_stmt + 1)));
}

#[test]
fn reset_restarts_positions() {
    let mut lx = Lexer::new("a\nb");
    let first: Vec<_> = lx.by_ref().map(|t| t.pos).collect();
    lx.reset();
    let second: Vec<_> = lx.map(|t| t.pos).collect();
    assert_eq!(first, second);
}

#[test]
fn leading_bom_is_skipped() {
    assert_eq!(
        toks("\u{FEFF}class A {}"),
        vec![
            Tok::KwClass,
            Tok::Ident("A"),
            Tok::LBrace,
            Tok::RBrace,
            Tok::Eof
        ]
    );
}

#[test]
fn reset_restarts_the_stream() {
    let src = "class A { int x; }";
    let mut lx = Lexer::new(src);
    let first: Vec<Tok<'_>> = lx.by_ref().map(|t| t.tok).collect();
    assert!(lx.next().is_none());
    lx.reset();
    let second: Vec<Tok<'_>> = lx.map(|t| t.tok).collect();
    assert_eq!(first, second);
}

#[test]
fn token_text_matches_source() {
    let src = "for (int i = 0; i < n; i++) { s += a[i]; }";
    let (toks, _) = lex_all(src);
    for t in toks.iter().filter(|t| t.tok != Tok::Eof) {
        assert_eq!(&src[t.span.range()], t.tok.text(), "token {:?}", t.tok);
    }
}
