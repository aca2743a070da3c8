use java_inspector::parse_source;

fn assert_parses(src: &str) {
    let f = parse_source(src);
    if !f.diags.is_empty() {
        panic!("expected parse ok, got diagnostics: {:#?}", f.diags);
    }
}

#[test]
fn parses_package_imports_and_types() {
    assert_parses(
        r#"
package com.example.app;

import java.util.List;
import java.util.*;
import static java.lang.Math.max;
import static java.util.Collections.*;

public final class App {}

interface Shape extends Comparable<Shape>, Cloneable {
    double area();
    default String label() { return "shape"; }
    static Shape unit() { return null; }
}

enum Color { RED, GREEN, BLUE; }

@interface Marker {
    String value() default "";
    int[] ids() default {};
}
"#,
    );
}

#[test]
fn parses_members() {
    assert_parses(
        r#"
class Members {
    private static final int MAX = 10, MIN = -MAX;
    protected volatile long counter;
    transient int[] buf[] = new int[4][];
    String s = "a" + 'b' + 1.5e3 + 0x1F + 0b1010L;

    static { counter(); }
    { counter = 0; }

    Members() { this(1); }
    Members(int x) { super(); }

    public synchronized void inc() throws IllegalStateException, java.io.IOException {
        counter++;
    }

    native int peek();
    abstract void later();
    static void counter() {}
}
"#,
    );
}

#[test]
fn parses_generics() {
    assert_parses(
        r#"
class Box<T extends Comparable<? super T> & Cloneable> {
    java.util.Map<String, java.util.List<Integer>> index = new java.util.HashMap<>();
    java.util.List<? extends Number> nums;
    java.util.List<java.util.List<java.util.List<String>>> deep;

    <R> R map(java.util.function.Function<? super T, ? extends R> f) {
        return f.apply(null);
    }

    static <K, V extends K> void pair(K k, V v) {
        Box.<String>empty();
        boolean lt = k.hashCode() < v.hashCode();
        int shifted = 1 << 3 >> 1 >>> 2;
    }

    static <E> Box<E> empty() { return new Box<E>(); }
}
"#,
    );
}

#[test]
fn parses_statements() {
    assert_parses(
        r#"
class Stmts {
    int f(int x, String... rest) {
        if (x < 0) return -x; else if (x == 0) { return 0; }
        for (int i = 0, j = 10; i < j; i++, j--) {
            if (i == 5) break;
            continue;
        }
        for (String r : rest) { System.out.println(r); }
        for (;;) { break; }
        while (x > 0) x--;
        do { x++; } while (x < 3);
        outer:
        for (int a = 0; a < 3; a++) {
            for (int b = 0; b < 3; b++) {
                if (b == a) continue outer;
            }
        }
        synchronized (this) { x += 1; }
        assert x > 0 : "positive";
        final int y = x;
        int[] arr = {1, 2, 3};
        ;
        throw new IllegalArgumentException("no");
    }
}
"#,
    );
}

#[test]
fn parses_try_forms() {
    assert_parses(
        r#"
class Io {
    void read(java.nio.file.Path p) throws Exception {
        try (var in = java.nio.file.Files.newInputStream(p);
             java.io.Reader r = new java.io.InputStreamReader(in)) {
            r.read();
        } catch (java.io.IOException | RuntimeException e) {
            throw e;
        } finally {
            cleanup();
        }
        try { cleanup(); } finally { }
    }
    void cleanup() {}
}
"#,
    );
}

#[test]
fn parses_switches() {
    assert_parses(
        r#"
class Sw {
    int kind(int x, Object o) {
        switch (x) {
            case 0:
            case 1:
                return 1;
            default:
                break;
        }
        String s = switch (x) {
            case 1, 2 -> "small";
            case 3 -> { yield "three"; }
            default -> "big";
        };
        int n = switch (s) {
            case "a":
                yield 1;
            default:
                yield 2;
        };
        return n;
    }
}
"#,
    );
}

#[test]
fn parses_expressions() {
    assert_parses(
        r#"
class Exprs {
    Object all(Object o, int[] xs) {
        int a = (int) 3.5;
        long b = (long) a * 2;
        String s = (String) o;
        boolean c = o instanceof String t && t.isEmpty();
        int d = c ? a : (a + 1) * 2;
        int e = ~a ^ a | a & 1;
        a += 2; a <<= 1; a >>>= 1;
        int[][] grid = new int[3][4];
        String[] names = new String[] { "x", "y" };
        Class<?> k = String[].class;
        Class<?> v = void.class;
        Class<?> i = int.class;
        xs[0] = xs[xs.length - 1]++;
        Object p = this.new Inner();
        return Exprs.this;
    }
    class Inner {}
}
"#,
    );
}

#[test]
fn parses_lambdas_and_method_refs() {
    assert_parses(
        r#"
class Fn {
    void run() {
        Runnable r = () -> {};
        java.util.function.Function<String, Integer> len = s -> s.length();
        java.util.function.BiFunction<Integer, Integer, Integer> add = (x, y) -> x + y;
        java.util.function.BiFunction<Integer, Integer, Integer> mul = (Integer x, Integer y) -> { return x * y; };
        java.util.function.Supplier<java.util.List<String>> mk = java.util.ArrayList::new;
        java.util.function.IntFunction<int[]> arr = int[]::new;
        java.util.function.Function<Object, String> str = String::valueOf;
        names().forEach(System.out::println);
        names().stream().map(n -> n.trim()).filter(n -> !n.isEmpty()).count();
    }
    java.util.List<String> names() { return java.util.List.of(); }
}
"#,
    );
}

#[test]
fn parses_anonymous_and_local_classes() {
    assert_parses(
        r#"
class Outer {
    Runnable field = new Runnable() {
        public void run() {}
    };
    void m() {
        class Local { int v; }
        abstract class Base { abstract void go(); }
        new Thread(new Runnable() {
            @Override
            public void run() { new Local(); }
        }).start();
    }
}
"#,
    );
}

#[test]
fn parses_enums_with_bodies() {
    assert_parses(
        r#"
public enum Op implements java.util.function.IntBinaryOperator {
    PLUS("+") {
        public int applyAsInt(int a, int b) { return a + b; }
    },
    MINUS("-") {
        public int applyAsInt(int a, int b) { return a - b; }
    };

    private final String symbol;

    Op(String symbol) { this.symbol = symbol; }

    public String symbol() { return symbol; }
}
"#,
    );
}

#[test]
fn parses_annotations() {
    assert_parses(
        r#"
@Deprecated
@SuppressWarnings({"unchecked", "rawtypes"})
public class Annotated {
    @Override public String toString() { return ""; }
    @Retention(value = RetentionPolicy.RUNTIME) int x;
    void f(@Nullable String s, final int n) {
        @SuppressWarnings("unused") int local = n;
    }
}
"#,
    );
}

#[test]
fn parses_free_functions_at_top_level() {
    let f = parse_source("void helper(int x) { x++; }\nclass A {}\n");
    assert!(f.diags.is_empty(), "{:#?}", f.diags);
    assert_eq!(f.unit.items(&f.arena).len(), 2);
}

#[test]
fn comments_do_not_disturb_parsing() {
    assert_parses(
        r#"
/** Doc on the class. */
class C /* inline */ extends /* more */ Object {
    // line comment
    int x; /* trailing */
    /**
     * Doc on a method.
     */
    void f() { /* empty */ }
}
"#,
    );
}

#[test]
fn empty_source_is_an_empty_unit() {
    let f = parse_source("");
    assert!(f.diags.is_empty());
    assert_eq!(f.unit.items(&f.arena).len(), 0);
    assert!(f.unit.package.is_none());
}
