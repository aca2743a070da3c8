//! Synthesized names for anonymous classes.
//!
//! Each anonymous body is named `<enclosing>$<n>`, where `<enclosing>` is the
//! innermost enclosing method (or type, for field initializers) and `n`
//! counts anonymous bodies in pre-order across the whole compilation unit,
//! starting at 1. The result depends only on the source text.

use crate::ast::{AstArena, CompilationUnit, Interner, MethodDeclId, TypeDeclId, UnitItem};
use crate::walk::{Visitor, Walk};

struct Namer<'a> {
    interner: &'a Interner,
    scopes: Vec<String>,
    counter: u32,
    out: Vec<(TypeDeclId, String)>,
}

impl<'ast> Visitor<'ast> for Namer<'_> {
    fn visit_unit(&mut self, a: &'ast AstArena, unit: &'ast CompilationUnit) {
        for item in unit.items(a) {
            match item {
                UnitItem::Type(id) => self.visit_type_decl(a, id),
                UnitItem::Method(id) => self.visit_method(a, id),
            }
        }
    }

    fn visit_type_decl(&mut self, a: &'ast AstArena, id: TypeDeclId) {
        let decl = &a.type_decls[id];
        let name = if decl.is_anonymous {
            self.counter += 1;
            let enclosing = self.scopes.last().map_or("", String::as_str);
            let name = format!("{enclosing}${}", self.counter);
            self.out.push((id, name.clone()));
            name
        } else {
            self.interner.resolve(decl.name.sym).to_string()
        };
        self.scopes.push(name);
        decl.walk(a, self);
        self.scopes.pop();
    }

    fn visit_method(&mut self, a: &'ast AstArena, id: MethodDeclId) {
        let method = &a.methods[id];
        self.scopes
            .push(self.interner.resolve(method.name.sym).to_string());
        method.walk(a, self);
        self.scopes.pop();
    }
}

pub(super) fn name_anonymous_classes(
    arena: &mut AstArena,
    interner: &mut Interner,
    unit: &CompilationUnit,
) {
    let names = {
        let mut namer = Namer {
            interner,
            scopes: Vec::new(),
            counter: 0,
            out: Vec::new(),
        };
        namer.visit_unit(arena, unit);
        namer.out
    };
    for (id, name) in names {
        let sym = interner.intern(&name);
        arena.type_decls[id].name.sym = sym;
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse_source;

    fn anonymous_names(src: &str) -> Vec<String> {
        let f = parse_source(src);
        f.arena
            .type_decls
            .ids()
            .filter(|&id| f.arena.type_decls[id].is_anonymous)
            .map(|id| f.ident(f.arena.type_decls[id].name).to_string())
            .collect()
    }

    #[test]
    fn names_follow_enclosing_method() {
        let src = r#"
class A {
    Runnable r = new Runnable() { public void run() {} };
    void go() {
        Object o = new Object() {
            void inner() { new Thread() {}; }
        };
    }
}
"#;
        let mut names = anonymous_names(src);
        names.sort();
        assert_eq!(names, ["A$1", "go$2", "inner$3"]);
    }

    #[test]
    fn enum_constant_bodies_are_named() {
        let src = "enum Op { PLUS { int apply() { return 1; } }, MINUS }";
        assert_eq!(anonymous_names(src), ["Op$1"]);
    }
}
