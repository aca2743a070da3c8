// tests/lexer_errors.rs
//
// Every malformed input yields an `Error` token plus one `Lex` diagnostic,
// and scanning carries on to `Eof`.

use java_inspector::error::{Diag, DiagKind, FileId, Recovery, Severity};
use java_inspector::lexer::{tokenize, Tok, Token};

fn lex_all(input: &str) -> (Vec<Token<'_>>, Vec<Diag>) {
    tokenize(input, FileId(3))
}

struct Case {
    input: &'static str,
    message: &'static str,
    /// Byte offset where the error token starts.
    at: u32,
}

const CASES: &[Case] = &[
    Case {
        input: "int # x;",
        message: "invalid token",
        at: 4,
    },
    Case {
        input: "a ` b",
        message: "invalid token",
        at: 2,
    },
    Case {
        input: "s = \"abc\n;",
        message: "unterminated string literal",
        at: 4,
    },
    Case {
        input: "c = '\n;",
        message: "unterminated character literal",
        at: 4,
    },
    Case {
        input: "c = 'a\n;",
        message: "unterminated character literal",
        at: 4,
    },
    Case {
        input: "s = \"tail \\\" quote\nx;",
        message: "unterminated string literal",
        at: 4,
    },
    Case {
        input: "s = \"at eof",
        message: "unterminated string literal",
        at: 4,
    },
    Case {
        input: "x /* never closed",
        message: "unterminated comment",
        at: 2,
    },
    Case {
        input: "a \u{FEFF} b",
        message: "invalid token",
        at: 2,
    },
];

#[test]
fn error_corpus() {
    for case in CASES {
        let (toks, diags) = lex_all(case.input);

        assert_eq!(diags.len(), 1, "input {:?}: {diags:#?}", case.input);
        let d = &diags[0];
        assert_eq!(d.kind, DiagKind::Lex);
        assert_eq!(d.severity, Severity::Error);
        assert_eq!(d.file, FileId(3));
        assert_eq!(d.message, case.message, "input {:?}", case.input);
        assert_eq!(d.recovery, Some(Recovery::SkippedTokens(1)));
        assert_eq!(d.span.start, case.at, "input {:?}", case.input);

        let err = toks
            .iter()
            .find(|t| t.tok == Tok::Error)
            .unwrap_or_else(|| panic!("no error token for {:?}", case.input));
        assert_eq!(err.span, d.span);
        assert_eq!(toks.last().map(|t| t.tok), Some(Tok::Eof));
    }
}

#[test]
fn unterminated_string_runs_to_the_end_of_the_line() {
    let (toks, diags) = lex_all("s = \"abc;\nx = 1;");
    assert_eq!(diags.len(), 1, "{diags:#?}");
    assert_eq!(diags[0].message, "unterminated string literal");
    assert_eq!(diags[0].span.start, 4);
    assert_eq!(diags[0].span.end, 9);
    let after: Vec<Tok<'_>> = toks
        .iter()
        .skip_while(|t| t.tok != Tok::Error)
        .skip(1)
        .map(|t| t.tok)
        .collect();
    assert_eq!(
        after,
        [Tok::Ident("x"), Tok::Assign, Tok::IntLit("1"), Tok::Semi, Tok::Eof]
    );
}

#[test]
fn scanning_continues_after_an_error() {
    let (toks, diags) = lex_all("a # b # c");
    let kinds: Vec<Tok<'_>> = toks.iter().map(|t| t.tok).collect();
    assert_eq!(
        kinds,
        vec![
            Tok::Ident("a"),
            Tok::Error,
            Tok::Ident("b"),
            Tok::Error,
            Tok::Ident("c"),
            Tok::Eof
        ]
    );
    assert_eq!(diags.len(), 2);
}

#[test]
fn unterminated_comment_swallows_the_rest() {
    let src = "x /* never closed\n class A {}";
    let (toks, _) = lex_all(src);
    assert_eq!(toks.len(), 3);
    assert_eq!(toks[1].span.end as usize, src.len());
}

#[test]
fn stray_bang_is_an_operator_not_an_error() {
    let (toks, diags) = lex_all("i ! names.length");
    assert!(diags.is_empty());
    assert_eq!(toks[1].tok, Tok::Bang);
}
