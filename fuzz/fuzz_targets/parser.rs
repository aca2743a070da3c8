// fuzz_targets/parser.rs
#![no_main]

use java_inspector::{Inspector, InspectorConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);

    // Must terminate without panicking on any input, and report every
    // diagnostic inside the source.
    let run = Inspector::new(InspectorConfig::sequential()).inspect(&[("fuzz.java", &*s)]);
    for d in run.diagnostics.iter() {
        assert!(d.span.start <= d.span.end);
        assert!(d.span.end as usize <= s.len());
    }
    let again = Inspector::new(InspectorConfig::sequential()).inspect(&[("fuzz.java", &*s)]);
    assert_eq!(run.diagnostics.len(), again.diagnostics.len());
});
