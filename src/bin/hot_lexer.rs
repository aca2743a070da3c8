// src/bin/hot_lexer.rs
use java_inspector::lexer::{Lexer, Tok};
use std::hint::black_box as bb;
use std::time::{Duration, Instant};

const SMALL: &str = r#"
class Hello { public static void main(String[] args) { System.out.println("Hello, World!"); } }
"#;

const MEDIUM: &str = r#"
package geometry;

/** A point in the plane. */
public class Point {
    private double x, y;

    public double abs() {
        return Math.sqrt(x * x + y * y);
    }

    public void scale(double f) {
        x = x * f;
        y = y * f;
    }
}
"#;

const LARGE: &str = r#"
package compiler;

import java.util.ArrayList;
import java.util.List;

enum TokenKind { EOF, IDENT, NUMBER, STRING }

final class Token {
    final TokenKind kind;
    final String text;
    final int line;

    Token(TokenKind kind, String text, int line) {
        this.kind = kind;
        this.text = text;
        this.line = line;
    }
}

public class Scanner {
    private final char[] input;
    private int pos = 0;
    private int line = 1;
    private final List<Token> tokens = new ArrayList<>();

    public Scanner(String source) { this.input = source.toCharArray(); }

    // Returns the next token, or EOF at the end of input.
    public Token nextToken() {
        if (pos >= input.length) return new Token(TokenKind.EOF, "", line);
        char ch = input[pos];
        if (Character.isLetter(ch)) return readIdent();
        if (Character.isDigit(ch)) return readNumber();
        pos++;
        return new Token(TokenKind.IDENT, String.valueOf(ch), line);
    }

    private Token readIdent() {
        int start = pos;
        while (pos < input.length && Character.isLetterOrDigit(input[pos])) pos++;
        return new Token(TokenKind.IDENT, new String(input, start, pos - start), line);
    }

    private Token readNumber() {
        int start = pos;
        while (pos < input.length && Character.isDigit(input[pos])) pos++;
        return new Token(TokenKind.NUMBER, new String(input, start, pos - start), line);
    }
}
"#;

// ----------------- arg parsing -----------------

fn arg_value<'a>(args: &'a [String], key: &str) -> Option<&'a str> {
    let mut it = args.iter();
    while let Some(a) = it.next() {
        if a == key {
            return it.next().map(|s| s.as_str());
        }
    }
    None
}

fn arg_usize(args: &[String], key: &str, default: usize) -> usize {
    arg_value(args, key)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn arg_f64(args: &[String], key: &str, default: f64) -> f64 {
    arg_value(args, key)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn arg_str<'a>(args: &'a [String], key: &str, default: &'a str) -> &'a str {
    arg_value(args, key).unwrap_or(default)
}

// ----------------- hot loop -----------------

#[inline(never)]
fn lex_once(input: &str) -> u64 {
    let mut checksum: u64 = 0;
    let mut n: u64 = 0;

    for t in Lexer::new(bb(input)) {
        n = n.wrapping_add(1);
        checksum ^= (t.span.start as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        checksum ^= (t.span.end as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
        checksum ^= (t.trivia.len() as u64) << 16;

        match t.tok {
            Tok::Ident(x)
            | Tok::IntLit(x)
            | Tok::FloatLit(x)
            | Tok::CharLit(x)
            | Tok::StringLit(x) => {
                checksum ^= x.len() as u64;
                if let Some(b0) = x.as_bytes().first() {
                    checksum ^= (*b0 as u64) << 32;
                }
            }
            _ => {
                checksum ^= 1;
            }
        }
    }

    checksum ^ (n.wrapping_mul(0xD6E8_FEB8_6659_FD93))
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let seconds = arg_f64(&args, "--seconds", 3.0);
    let repeat = arg_usize(&args, "--repeat", 64);
    let corpus = arg_str(&args, "--corpus", "large");

    let base = match corpus {
        "small" => SMALL,
        "medium" => MEDIUM,
        _ => LARGE,
    };

    let mut input = String::with_capacity(base.len() * repeat);
    for _ in 0..repeat {
        input.push_str(base);
        input.push('\n');
    }

    let dur = Duration::from_secs_f64(seconds);
    let start = Instant::now();

    let mut iters: u64 = 0;
    let mut acc: u64 = 0;

    while start.elapsed() < dur {
        acc ^= lex_once(&input);
        iters += 1;
    }

    eprintln!(
        "hot_lexer done: iters={iters}, checksum={acc}, bytes={}",
        input.len()
    );
    bb(acc);
}
