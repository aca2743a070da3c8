use java_inspector::diagnostics::LineIndex;
use java_inspector::lexer::{Lexer, Tok};
use java_inspector::parse_source;
use proptest::prelude::*;

/// Fragments that are individually meaningful to the lexer, glued together
/// to reach interesting states more often than uniform text would.
fn java_soup() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        Just("class "),
        Just("interface "),
        Just("new "),
        Just("A"),
        Just("x"),
        Just("("),
        Just(")"),
        Just("{"),
        Just("}"),
        Just("<"),
        Just(">>"),
        Just(";"),
        Just("!"),
        Just("\""),
        Just("'"),
        Just("/*"),
        Just("*/"),
        Just("//"),
        Just("\n"),
        Just("@"),
        Just("0x1"),
        Just("."),
        Just("->"),
        Just("synchronized "),
    ];
    prop::collection::vec(piece, 0..64).prop_map(|v| v.concat())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]
    #[test]
    fn never_panics_and_progresses(s in ".*") {
        let lx = Lexer::new(&s);

        let mut last_end = 0usize;
        let mut eof_seen = false;
        let max_steps = s.len() + 1;

        for (steps, t) in lx.enumerate() {
            let (start, end) = (t.span.start as usize, t.span.end as usize);

            // 1) spans must be in-bounds
            prop_assert!(start <= end, "start>end: ({start},{end}) tok={:?} input={s:?}", t.tok);
            prop_assert!(end <= s.len(), "end out of bounds: ({start},{end}) len={} input={s:?}", s.len());

            // 2) tokens are monotonic and never overlap
            prop_assert!(
                start >= last_end,
                "token moved backwards: start={start} < last_end={last_end} tok={:?} input={s:?}", t.tok
            );
            for tr in &t.trivia {
                prop_assert!(tr.span.start as usize >= last_end && tr.span.end as usize <= start);
            }
            last_end = end;

            // 3) only non-empty tokens before Eof, and nothing after it
            prop_assert!(!eof_seen, "token after Eof: input={s:?}");
            if t.tok == Tok::Eof {
                eof_seen = true;
                prop_assert_eq!(start, s.len());
            } else {
                prop_assert!(end > start, "empty token {:?} input={s:?}", t.tok);
            }

            // 4) anti-hang guard
            prop_assert!(steps <= max_steps, "too many steps: input={s:?}");
        }
        prop_assert!(eof_seen);
    }

    #[test]
    fn soup_always_parses_to_a_unit(s in java_soup()) {
        let f = parse_source(&s);
        prop_assert!(f.unit.span.end as usize <= s.len());
        for d in &f.diags {
            prop_assert!(d.span.end as usize <= s.len(), "diag out of bounds: {d:?} input={s:?}");
        }
    }

    #[test]
    fn reparsing_is_stable(s in java_soup()) {
        let a = parse_source(&s);
        let b = parse_source(&s);
        prop_assert_eq!(a.diags, b.diags);
        prop_assert_eq!(a.arena.type_decls.len(), b.arena.type_decls.len());
        prop_assert_eq!(a.unit, b.unit);
    }

    #[test]
    fn positions_agree_with_the_line_index(s in "(\\PC|\n|\r\n){0,200}") {
        let lines = LineIndex::new(&s);
        for t in Lexer::new(&s) {
            prop_assert_eq!(t.pos, lines.line_col(&s, t.span.start), "tok={:?} input={:?}", t.tok, s);
        }
    }
}
