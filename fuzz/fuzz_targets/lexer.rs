// fuzz_targets/lexer.rs
#![no_main]

use java_inspector::lexer::{Lexer, Tok};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);

    let mut lx = Lexer::new(&s);

    let mut last_end = 0usize;
    let mut steps = 0usize;
    let max_steps = s.len() + 1;
    let mut saw_eof = false;

    for t in lx.by_ref() {
        let (start, end) = (t.span.start as usize, t.span.end as usize);
        assert!(start <= end);
        assert!(end <= s.len());
        assert!(start >= last_end);
        for tr in &t.trivia {
            assert!(tr.span.start as usize >= last_end);
            assert!(tr.span.end as usize <= start);
        }
        last_end = end;

        assert!(!saw_eof, "token after Eof");
        saw_eof = matches!(t.tok, Tok::Eof);

        steps += 1;
        assert!(steps <= max_steps);
    }
    assert!(saw_eof);
});
