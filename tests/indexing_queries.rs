use java_inspector::{DiagKind, Inspection, Inspector, InspectorConfig, QueryError};

fn inspect(sources: &[(&str, &str)]) -> Inspection {
    Inspector::new(InspectorConfig::sequential()).inspect(sources)
}

fn names<'a>(classes: impl IntoIterator<Item = &'a java_inspector::ClassSymbol>) -> Vec<&'a str> {
    classes.into_iter().map(|c| c.qualified_name.as_str()).collect()
}

#[test]
fn resolves_across_files_and_packages() {
    let run = inspect(&[
        (
            "shapes/Shape.java",
            "package shapes;\npublic interface Shape { double area(); }\n",
        ),
        (
            "shapes/Circle.java",
            "package shapes;\npublic class Circle implements Shape { public double area() { return 3.14; } }\n",
        ),
        (
            "app/Ring.java",
            "package app;\nimport shapes.Circle;\nclass Ring extends Circle {}\n",
        ),
        (
            "app/Square.java",
            "package app;\nimport shapes.*;\nclass Square implements Shape { public double area() { return 1; } }\n",
        ),
    ]);
    assert!(run.diagnostics.is_empty(), "{:#?}", run.render_diagnostics());

    let g = &run.graph;
    let ring = g.find_class("app.Ring").unwrap();
    let sup = ring.superclass.as_ref().unwrap();
    assert_eq!(sup.name, "Circle");
    assert_eq!(
        sup.resolved.map(|id| g.class(id).qualified_name.as_str()),
        Some("shapes.Circle")
    );

    assert_eq!(
        names(g.list_implementors("shapes.Shape").unwrap()),
        ["shapes.Circle", "app.Ring", "app.Square"]
    );
    assert!(g.is_subclass_of("app.Ring", "shapes.Shape").unwrap());
}

#[test]
fn subclasses_include_implementors() {
    let run = inspect(&[(
        "a.java",
        "interface I {} class A implements I {} class B extends A {} class C {}",
    )]);
    assert_eq!(run.graph.list_subclasses("I").unwrap().names(), ["A", "B"]);
}

#[test]
fn nested_classes_resolve_through_the_enclosing_class() {
    let run = inspect(&[(
        "outer.java",
        "package p; class Outer { static class Base {} class Derived extends Base {} }",
    )]);
    assert!(run.diagnostics.is_empty(), "{:#?}", run.render_diagnostics());
    let g = &run.graph;
    let derived = g.find_class("p.Outer.Derived").unwrap();
    assert_eq!(
        derived
            .superclass
            .as_ref()
            .and_then(|r| r.resolved)
            .map(|id| g.class(id).qualified_name.as_str()),
        Some("p.Outer.Base")
    );
    let outer = g.find_class("p.Outer").unwrap();
    assert_eq!(outer.nested.len(), 2);
}

#[test]
fn mutual_extends_is_a_cycle() {
    let run = inspect(&[
        ("a.java", "class A extends B {}"),
        ("b.java", "class B extends A {}"),
        ("c.java", "class C extends A {}"),
    ]);
    let cycles: Vec<_> = run.diagnostics.of_kind(DiagKind::Cycle).collect();
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].message, "inheritance cycle involving `A`, `B`");
    assert!(cycles[0].is_error());

    let g = &run.graph;
    assert_eq!(g.cycles().len(), 1);
    let c = g.find_class("C").unwrap();
    assert!(!g.in_cycle(c.id));

    // Queries still terminate and report the cycle they crossed.
    let subs = g.list_subclasses("A").unwrap();
    assert_eq!(subs.names(), ["B", "C"]);
    assert_eq!(subs.cycles.len(), 1);
    assert_eq!(subs.cycles[0].kind, DiagKind::Cycle);

    assert!(g.is_subclass_of("A", "B").unwrap());
    assert!(g.is_subclass_of("B", "A").unwrap());
    assert_eq!(g.ancestors(c.id).len(), 2);
}

#[test]
fn self_extension_is_a_cycle() {
    let run = inspect(&[("a.java", "class Loop extends Loop {}")]);
    assert_eq!(run.diagnostics.of_kind(DiagKind::Cycle).count(), 1);
    let subs = run.graph.list_subclasses("Loop").unwrap();
    assert!(subs.classes.is_empty());
    assert_eq!(subs.cycles.len(), 1);
}

#[test]
fn overrides_are_linked_and_listed() {
    let run = inspect(&[(
        "shapes.java",
        r#"
abstract class Shape {
    abstract double area();
    String name() { return "shape"; }
    static Shape unit() { return null; }
}
class Square extends Shape {
    @Override double area() { return 1; }
    static Shape unit() { return null; }
}
class Tile extends Square {
    @Override double area() { return 2; }
    @Override String name() { return "tile"; }
}
"#,
    )]);
    assert!(run.diagnostics.is_empty(), "{:#?}", run.render_diagnostics());
    let g = &run.graph;

    let owners: Vec<&str> = g
        .list_overrides("Shape", "area")
        .unwrap()
        .iter()
        .filter_map(|m| m.owner)
        .map(|c| g.class(c).name.as_str())
        .collect();
    assert_eq!(owners, ["Square", "Tile"]);

    let square = g.find_class("Square").unwrap();
    assert!(g.method_named(square.id, "unit").unwrap().overrides.is_none());
    assert!(g.find_class("Shape").unwrap().is_abstract());
}

#[test]
fn override_of_nothing_warns() {
    let run = inspect(&[(
        "a.java",
        "class A { void f(int x) {} } class B extends A { @Override void f(long x) {} @Override public String toString() { return \"\"; } }",
    )]);
    let warnings: Vec<_> = run.diagnostics.warnings().collect();
    assert_eq!(warnings.len(), 1, "{:#?}", warnings);
    assert_eq!(warnings[0].kind, DiagKind::Index);
    assert!(warnings[0].message.contains("`f(long)`"), "{}", warnings[0].message);
}

#[test]
fn override_check_can_be_disabled() {
    let config = InspectorConfig {
        check_overrides: false,
        ..InspectorConfig::sequential()
    };
    let run = Inspector::new(config).inspect(&[(
        "a.java",
        "class A { @Override void f() {} }",
    )]);
    assert!(run.diagnostics.is_empty());
}

#[test]
fn unresolved_reporting_can_be_disabled() {
    let src = [("a.java", "class A extends java.lang.Thread implements Runnable {}")];
    let loud = inspect(&src);
    assert_eq!(loud.diagnostics.warnings().count(), 2);

    let config = InspectorConfig {
        report_unresolved: false,
        ..InspectorConfig::sequential()
    };
    let quiet = Inspector::new(config).inspect(&src);
    assert!(quiet.diagnostics.is_empty());
    let a = quiet.graph.find_class("A").unwrap();
    assert!(a.supertypes().all(|r| !r.is_resolved()));
}

#[test]
fn anonymous_implementors() {
    let run = inspect(&[(
        "a.java",
        r#"
interface Task { void run(); }
class Worker implements Task { public void run() {} }
class Pool {
    Task idle = new Task() { public void run() {} };
    void submit() {
        Worker w = new Worker() { };
        Object o = new Object() { };
    }
}
"#,
    )]);
    let g = &run.graph;

    let anon = g.list_anonymous_implementing("Task").unwrap();
    let anon: Vec<&str> = anon.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(anon, ["Pool$1", "submit$2"]);

    // An interface base counts as an implemented interface.
    let first = g.find_class("Pool.Pool$1").unwrap();
    assert!(first.superclass.is_none());
    assert_eq!(first.interfaces.len(), 1);

    assert_eq!(names(g.list_implementors("Task").unwrap()), ["Worker"]);
    assert_eq!(g.list_anonymous_classes("Pool").unwrap().len(), 3);
}

#[test]
fn qualified_anonymous_creation_keeps_its_base() {
    let run = inspect(&[(
        "outer.java",
        "class Outer { class Inner {} void make(Outer o) { Object x = o.new Inner() { }.self(); } }",
    )]);
    let g = &run.graph;
    let anon = g.list_anonymous_classes("Outer").unwrap();
    assert_eq!(anon.len(), 1);
    assert_eq!(
        anon[0]
            .superclass
            .as_ref()
            .and_then(|r| r.resolved)
            .map(|id| g.class(id).qualified_name.as_str()),
        Some("Outer.Inner")
    );
    assert!(g.is_subclass_of(&anon[0].qualified_name, "Outer.Inner").unwrap());
}

#[test]
fn superclass_chain_is_nearest_first() {
    let run = inspect(&[("a.java", "class A {} class B extends A {} class C extends B {}")]);
    let chain: Vec<&str> = run
        .graph
        .superclass_chain("C")
        .unwrap()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(chain, ["B", "A"]);
}

#[test]
fn synchronized_blocks_do_not_count() {
    let run = inspect(&[(
        "a.java",
        "class A { synchronized void f() {} void g() { synchronized (this) {} } static synchronized void h() {} }",
    )]);
    let names: Vec<&str> = run
        .graph
        .list_synchronized_members("A")
        .unwrap()
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(names, ["f", "h"]);
}

#[test]
fn enum_constants_become_fields() {
    let run = inspect(&[(
        "color.java",
        "enum Color { RED, GREEN { int shade() { return 1; } }; int shade() { return 0; } }",
    )]);
    let g = &run.graph;
    let color = g.find_class("Color").unwrap();
    let fields: Vec<&str> = g.fields_of(color.id).map(|f| f.name.as_str()).collect();
    assert_eq!(fields, ["RED", "GREEN"]);

    let body = g.find_class("Color.Color$1").unwrap();
    assert!(body.is_anonymous);
    let shade = g.method_named(body.id, "shade").unwrap();
    assert_eq!(
        shade.overrides.and_then(|m| g.method(m).owner),
        Some(color.id)
    );
}

#[test]
fn queries_report_missing_names() {
    let run = inspect(&[("a.java", "class A { void f() {} }")]);
    let g = &run.graph;
    assert_eq!(
        g.list_subclasses("Missing").unwrap_err(),
        QueryError::NotFound("Missing".into())
    );
    assert_eq!(
        g.anonymous_classes_in_method("A", "g").unwrap_err(),
        QueryError::MethodNotFound {
            class: "A".into(),
            method: "g".into()
        }
    );
    assert!(g.list_synchronized_members("Nope").is_err());
}

#[test]
fn classes_in_file_follow_input_order() {
    let run = inspect(&[
        ("one.java", "class One {} class Two {}"),
        ("two.java", "class Three {}"),
    ]);
    let second = run.file_named("two.java").unwrap().file;
    assert_eq!(names(run.graph.classes_in_file(second)), ["Three"]);
    assert_eq!(run.graph.files().len(), 2);
}
