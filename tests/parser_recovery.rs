use java_inspector::parser::MAX_NESTING;
use java_inspector::{parse_source, DiagKind, Inspector, InspectorConfig, ParsedFile, Recovery};

const LOOKUP: &str = include_str!("fixtures/lookup.java");
const FIBONACCI: &str = include_str!("fixtures/fibonacci.java");

fn type_names(f: &ParsedFile) -> Vec<&str> {
    f.arena
        .type_decls
        .ids()
        .map(|id| f.ident(f.arena.type_decls[id].name))
        .collect()
}

fn method_names(f: &ParsedFile) -> Vec<&str> {
    f.arena
        .methods
        .ids()
        .map(|id| f.ident(f.arena.methods[id].name))
        .collect()
}

#[test]
fn bad_loop_condition_reports_once_and_keeps_going() {
    let f = parse_source(LOOKUP);
    assert_eq!(f.diags.len(), 1, "{:#?}", f.diags);

    let d = &f.diags[0];
    let bang = LOOKUP.find(" ! ").unwrap() + 1;
    assert_eq!(d.kind, DiagKind::Parse);
    assert_eq!(d.span.start as usize, bang);
    assert_eq!(d.span.len(), 1);
    assert_eq!(d.recovery, Some(Recovery::SkippedTokens(4)));

    // Everything after the damage is still there.
    assert_eq!(method_names(&f), ["find", "processValues", "find"]);
    assert_eq!(type_names(&f), ["Lookup", "SimpleLookup"]);
}

#[test]
fn missing_closing_brace_is_reported_at_eof() {
    let f = parse_source(FIBONACCI);
    assert_eq!(f.diags.len(), 1, "{:#?}", f.diags);
    let d = &f.diags[0];
    assert!(d.message.starts_with("expected `}`"), "{}", d.message);
    assert_eq!(d.span.start as usize, FIBONACCI.len());
    assert_eq!(d.recovery, Some(Recovery::InsertedToken("}")));
    assert_eq!(method_names(&f), ["main"]);
}

#[test]
fn missing_semicolon_before_closer_is_inserted() {
    let f = parse_source("class A {\n  int f() { return 1 }\n  void g() {}\n}\n");
    assert_eq!(f.diags.len(), 1, "{:#?}", f.diags);
    assert_eq!(f.diags[0].recovery, Some(Recovery::InsertedToken(";")));
    assert_eq!(method_names(&f), ["f", "g"]);
}

#[test]
fn missing_semicolon_skips_to_the_next_one() {
    let f = parse_source("class A { void f() { int x = 1 int y = 2; foo(); } }");
    assert_eq!(f.diags.len(), 1, "{:#?}", f.diags);
    assert_eq!(f.diags[0].recovery, Some(Recovery::SkippedTokens(4)));
    assert_eq!(f.text(f.diags[0].span), "int");
}

#[test]
fn one_diagnostic_per_token() {
    // The bad argument and the missing `)` point at the same `;`.
    let f = parse_source("class A { void f() { foo(; } }");
    assert_eq!(f.diags.len(), 1, "{:#?}", f.diags);
    assert_eq!(f.text(f.diags[0].span), ";");
}

#[test]
fn method_without_return_type() {
    let f = parse_source("class A { foo() {} void bar() {} }");
    assert_eq!(f.diags.len(), 1, "{:#?}", f.diags);
    assert!(f.diags[0].message.contains("no return type"));
    assert_eq!(f.diags[0].recovery, Some(Recovery::InsertedToken("void")));
    assert_eq!(method_names(&f), ["foo", "bar"]);
}

#[test]
fn missing_class_name_still_parses_the_rest() {
    let f = parse_source("class { int x; }\nclass B {}\n");
    assert_eq!(f.diags.len(), 1, "{:#?}", f.diags);
    assert_eq!(
        f.diags[0].recovery,
        Some(Recovery::InsertedToken("<identifier>"))
    );
    assert_eq!(type_names(&f), ["", "B"]);
}

#[test]
fn stray_top_level_tokens_are_skipped() {
    let f = parse_source("+ 42 ;\nclass A {}\n");
    assert!(!f.diags.is_empty());
    assert!(f.diags.iter().all(|d| d.kind == DiagKind::Parse));
    assert_eq!(type_names(&f), ["A"]);
}

#[test]
fn bad_member_does_not_lose_the_class() {
    let f = parse_source("class A { int x; ) void f() {} }\nclass B {}\n");
    assert!(!f.diags.is_empty());
    assert_eq!(type_names(&f), ["A", "B"]);
    assert!(method_names(&f).contains(&"f"));
}

#[test]
fn garbage_terminates() {
    let inputs = [
        "}}}}",
        ")))(((",
        "class",
        "class A extends",
        "class A { void f( }",
        "class A { void f() { if ( } }",
        "class A { int[ x; }",
        "class A { Map<String, List<Integer> m; }",
        "class A { void f() { switch (x) { case } } }",
        "class A { void f() { try } }",
        "class A { void f() { new } }",
        "@",
        "import ;",
        "package",
        "enum E { A, B, ; void f( }",
    ];
    for src in inputs {
        let f = parse_source(src);
        assert!(!f.diags.is_empty(), "no diagnostics for {src:?}");
        for d in &f.diags {
            assert!(d.span.end as usize <= src.len(), "{src:?}: {d:?}");
        }
    }
}

#[test]
fn lex_errors_reach_the_parse_result() {
    let f = parse_source("class A { int x = 1 # 2; }");
    assert!(f.diags.iter().any(|d| d.kind == DiagKind::Lex));
    assert_eq!(type_names(&f), ["A"]);
}

#[test]
fn diagnostics_are_in_source_order() {
    let f = parse_source("class A { void f() { int = 1; } void g() { return 1 } ) }");
    let starts: Vec<u32> = f.diags.iter().map(|d| d.span.start).collect();
    let mut sorted = starts.clone();
    sorted.sort_unstable();
    assert_eq!(starts, sorted);
    assert!(f.diags.len() >= 2, "{:#?}", f.diags);
}

/// Runs `f` on a thread with a 2 MiB stack, the size rayon workers get.
fn on_small_stack<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    std::thread::Builder::new()
        .stack_size(2 << 20)
        .spawn(f)
        .unwrap()
        .join()
        .unwrap()
}

fn inspect_all(sources: &[(String, String)]) {
    for config in [InspectorConfig::sequential(), InspectorConfig::default()] {
        let run = Inspector::new(config).inspect(sources);
        assert_eq!(run.files.len(), sources.len());
        assert!(run.graph.find_class("Ok").is_ok());
    }
}

#[test]
fn long_concatenation_fits_a_small_stack() {
    let terms: Vec<String> = (0..5000).map(|i| format!("\"s{i}\"")).collect();
    let src = format!(
        "class Big {{ String s = new Object() {{}}.toString() + {} + new Object() {{}}.toString(); }}",
        terms.join(" + ")
    );
    on_small_stack(move || {
        let f = parse_source(&src);
        assert!(f.diags.is_empty(), "{:#?}", f.diags);

        let sources = vec![
            ("ok.java".to_string(), "class Ok {}".to_string()),
            ("big.java".to_string(), src),
        ];
        inspect_all(&sources);

        let run = Inspector::new(InspectorConfig::sequential()).inspect(&sources);
        let anon: Vec<&str> = run
            .graph
            .list_anonymous_classes("Big")
            .unwrap()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(anon, ["Big$1", "Big$2"]);
    });
}

#[test]
fn long_else_if_chain_fits_a_small_stack() {
    let mut body = String::from("if (x == 0) { a(); }");
    for i in 1..5000 {
        body.push_str(&format!(" else if (x == {i}) {{ a(); }}"));
    }
    body.push_str(" else { Runnable r = new Runnable() { public void run() {} }; }");
    let src = format!("class Chain {{ void f(int x) {{ {body} }} void g() {{}} }}");

    on_small_stack(move || {
        let f = parse_source(&src);
        assert!(f.diags.is_empty(), "{:#?}", f.diags);
        let mut methods = method_names(&f);
        methods.sort();
        assert_eq!(methods, ["f", "g", "run"]);

        let sources = vec![
            ("ok.java".to_string(), "class Ok {}".to_string()),
            ("chain.java".to_string(), src),
        ];
        inspect_all(&sources);

        let run = Inspector::new(InspectorConfig::sequential()).inspect(&sources);
        let g = &run.graph;
        let anon = g.anonymous_classes_in_method("Chain", "f").unwrap();
        assert_eq!(anon.len(), 1);
        assert_eq!(anon[0].name, "f$1");
    });
}

#[test]
fn deep_parentheses_are_skipped_once() {
    let depth = 1000;
    let src = format!(
        "class D {{ int f() {{ return {}1{}; }} int g() {{ return 0; }} }}",
        "(".repeat(depth),
        ")".repeat(depth)
    );
    on_small_stack(move || {
        let f = parse_source(&src);
        assert_eq!(f.diags.len(), 1, "{:#?}", f.diags);
        let d = &f.diags[0];
        assert_eq!(d.kind, DiagKind::Parse);
        assert_eq!(
            d.message,
            format!("nesting deeper than {MAX_NESTING} levels")
        );
        assert!(matches!(d.recovery, Some(Recovery::SkippedTokens(_))));
        assert_eq!(method_names(&f), ["f", "g"]);
    });
}

#[test]
fn deep_blocks_are_skipped_once() {
    let depth = 1000;
    let src = format!(
        "class D {{ void f() {{ {}x();{} }} void g() {{}} }}",
        "{".repeat(depth),
        "}".repeat(depth)
    );
    on_small_stack(move || {
        let f = parse_source(&src);
        assert_eq!(f.diags.len(), 1, "{:#?}", f.diags);
        assert!(f.diags[0].message.starts_with("nesting deeper than"));
        assert_eq!(method_names(&f), ["f", "g"]);
    });
}

#[test]
fn deep_type_arguments_are_skipped_once() {
    let depth = 1000;
    let src = format!(
        "class D {{ {}String{} x; void g() {{}} }}",
        "java.util.List<".repeat(depth),
        ">".repeat(depth)
    );
    on_small_stack(move || {
        let f = parse_source(&src);
        assert_eq!(f.diags.len(), 1, "{:#?}", f.diags);
        assert!(f.diags[0].message.starts_with("nesting deeper than"));
        // The enclosing lists still close, so the rest of the class parses.
        assert_eq!(method_names(&f), ["g"]);
        assert_eq!(type_names(&f), ["D"]);
    });
}

#[test]
fn nesting_below_the_limit_is_kept() {
    let depth = 30;
    let src = format!(
        "class D {{ int f() {{ {}return {}1{};{} }} }}",
        "{".repeat(depth),
        "(".repeat(depth),
        ")".repeat(depth),
        "}".repeat(depth)
    );
    let f = parse_source(&src);
    assert!(f.diags.is_empty(), "{:#?}", f.diags);
}
