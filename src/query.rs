//! Read-only structural queries over a finished [`SymbolGraph`].
//!
//! Every traversal keeps a visited set, so cyclic `extends` chains end the
//! walk instead of looping; where a query crosses a cycle it reports it as
//! a `Cycle` diagnostic alongside its result.

use std::collections::{HashSet, VecDeque};

use crate::error::{Diag, DiagKind, FileId, QueryError};
use crate::symbols::{ClassId, ClassSymbol, MethodId, MethodSymbol, SymbolGraph};

/// Result of [`SymbolGraph::list_subclasses`].
#[derive(Debug, Clone)]
pub struct Subclasses<'g> {
    /// Direct and transitive subtypes in declaration order.
    pub classes: Vec<&'g ClassSymbol>,
    /// One diagnostic per inheritance cycle met during the walk.
    pub cycles: Vec<Diag>,
}

impl<'g> Subclasses<'g> {
    pub fn names(&self) -> Vec<&'g str> {
        self.classes.iter().map(|c| c.name.as_str()).collect()
    }
}

impl SymbolGraph {
    /// Looks a class up by qualified name, falling back to the first class
    /// with that simple name.
    pub fn find_class(&self, name: &str) -> Result<&ClassSymbol, QueryError> {
        self.find_class_id(name).map(|id| self.class(id))
    }

    fn find_class_id(&self, name: &str) -> Result<ClassId, QueryError> {
        self.by_qualified_name(name)
            .or_else(|| self.by_simple_name(name).first().copied())
            .ok_or_else(|| QueryError::NotFound(name.to_string()))
    }

    /// Direct subtypes: classes naming `id` as superclass or interface.
    fn direct_subtypes(&self, id: ClassId) -> impl Iterator<Item = &ClassSymbol> + '_ {
        self.classes()
            .filter(move |c| c.supertypes().any(|r| r.resolved == Some(id)))
    }

    /// Every class that extends or implements `name`, directly or not.
    pub fn list_subclasses(&self, name: &str) -> Result<Subclasses<'_>, QueryError> {
        let root = self.find_class_id(name)?;
        let mut seen = HashSet::from([root]);
        let mut queue = VecDeque::from([root]);
        let mut found: Vec<ClassId> = Vec::new();
        let mut cycles_hit: Vec<usize> = Vec::new();

        while let Some(c) = queue.pop_front() {
            for sub in self.direct_subtypes(c) {
                if seen.insert(sub.id) {
                    found.push(sub.id);
                    queue.push_back(sub.id);
                    continue;
                }
                // Revisit: only a cycle can lead back to a class already seen
                // through the same chain.
                if let Some(i) = self.cycles().iter().position(|cy| cy.contains(&sub.id)) {
                    if !cycles_hit.contains(&i) {
                        cycles_hit.push(i);
                    }
                }
            }
        }

        found.retain(|&id| id != root);
        found.sort();
        let cycles = cycles_hit
            .into_iter()
            .map(|i| self.cycle_diag(&self.cycles()[i]))
            .collect();
        Ok(Subclasses {
            classes: found.into_iter().map(|id| self.class(id)).collect(),
            cycles,
        })
    }

    fn cycle_diag(&self, members: &[ClassId]) -> Diag {
        let names: Vec<String> = members
            .iter()
            .map(|&m| format!("`{}`", self.class(m).qualified_name))
            .collect();
        let first = self.class(members[0]);
        Diag::error(
            first.file,
            DiagKind::Cycle,
            first.name_span,
            format!("inheritance cycle involving {}", names.join(", ")),
        )
    }

    /// Methods of `class` declared `synchronized`, in declaration order.
    /// `synchronized` blocks inside a body do not count.
    pub fn list_synchronized_members(&self, class: &str) -> Result<Vec<&MethodSymbol>, QueryError> {
        let id = self.find_class_id(class)?;
        Ok(self.methods_of(id).filter(|m| m.is_synchronized).collect())
    }

    /// Anonymous classes declared anywhere inside `class`, nested ones
    /// included, in source order.
    pub fn list_anonymous_classes(&self, class: &str) -> Result<Vec<&ClassSymbol>, QueryError> {
        let id = self.find_class_id(class)?;
        let mut out: Vec<&ClassSymbol> = self
            .classes()
            .filter(|c| c.is_anonymous && self.is_enclosed_by(c.id, id))
            .collect();
        out.sort_by_key(|c| (c.file, c.span.start));
        Ok(out)
    }

    fn is_enclosed_by(&self, class: ClassId, outer: ClassId) -> bool {
        let mut cur = self.class(class).enclosing_class;
        while let Some(c) = cur {
            if c == outer {
                return true;
            }
            cur = self.class(c).enclosing_class;
        }
        false
    }

    /// Anonymous classes declared directly in the body of `class.method`.
    pub fn anonymous_classes_in_method(
        &self,
        class: &str,
        method: &str,
    ) -> Result<Vec<&ClassSymbol>, QueryError> {
        let id = self.find_class_id(class)?;
        let m = self
            .method_named(id, method)
            .ok_or_else(|| QueryError::MethodNotFound {
                class: class.to_string(),
                method: method.to_string(),
            })?;
        Ok(m.anonymous_classes.iter().map(|&c| self.class(c)).collect())
    }

    /// All supertypes of `id` reachable through resolved references,
    /// nearest first. `id` itself is never included.
    pub fn ancestors(&self, id: ClassId) -> Vec<ClassId> {
        let mut seen = HashSet::from([id]);
        let mut queue = VecDeque::from([id]);
        let mut out = Vec::new();
        while let Some(c) = queue.pop_front() {
            for sup in self.class(c).supertypes().filter_map(|r| r.resolved) {
                if seen.insert(sup) {
                    out.push(sup);
                    queue.push_back(sup);
                }
            }
        }
        out
    }

    pub fn is_subclass_of(&self, class: &str, parent: &str) -> Result<bool, QueryError> {
        let c = self.find_class_id(class)?;
        let p = self.find_class_id(parent)?;
        Ok(self.ancestors(c).contains(&p))
    }

    /// Superclasses of `class`, nearest first, stopping at the first
    /// unresolved name or repeated class.
    pub fn superclass_chain(&self, class: &str) -> Result<Vec<&ClassSymbol>, QueryError> {
        let id = self.find_class_id(class)?;
        let mut seen = HashSet::from([id]);
        let mut out = Vec::new();
        let mut cur = self.class(id).superclass.as_ref().and_then(|r| r.resolved);
        while let Some(c) = cur {
            if !seen.insert(c) {
                break;
            }
            let sym = self.class(c);
            out.push(sym);
            cur = sym.superclass.as_ref().and_then(|r| r.resolved);
        }
        Ok(out)
    }

    /// Methods that override `class.method`, directly or through
    /// intermediate overrides.
    pub fn list_overrides(&self, class: &str, method: &str) -> Result<Vec<&MethodSymbol>, QueryError> {
        let id = self.find_class_id(class)?;
        let target = self
            .method_named(id, method)
            .ok_or_else(|| QueryError::MethodNotFound {
                class: class.to_string(),
                method: method.to_string(),
            })?
            .id;
        Ok(self
            .methods()
            .filter(|m| self.overrides_transitively(m.id, target))
            .collect())
    }

    fn overrides_transitively(&self, method: MethodId, target: MethodId) -> bool {
        let mut seen = HashSet::new();
        let mut cur = self.method(method).overrides;
        while let Some(m) = cur {
            if m == target {
                return true;
            }
            if !seen.insert(m) {
                return false;
            }
            cur = self.method(m).overrides;
        }
        false
    }

    /// Concrete, named classes implementing `interface` directly or through
    /// a supertype.
    pub fn list_implementors(&self, interface: &str) -> Result<Vec<&ClassSymbol>, QueryError> {
        let id = self.find_class_id(interface)?;
        Ok(self
            .classes()
            .filter(|c| !c.is_interface() && !c.is_anonymous && self.ancestors(c.id).contains(&id))
            .collect())
    }

    /// Anonymous classes whose base type is, or implements, `interface`.
    pub fn list_anonymous_implementing(
        &self,
        interface: &str,
    ) -> Result<Vec<&ClassSymbol>, QueryError> {
        let id = self.find_class_id(interface)?;
        Ok(self
            .classes()
            .filter(|c| c.is_anonymous && self.ancestors(c.id).contains(&id))
            .collect())
    }

    pub fn classes_in_file(&self, file: FileId) -> Vec<&ClassSymbol> {
        self.classes().filter(|c| c.file == file).collect()
    }

    /// Methods declared outside any class.
    pub fn free_functions(&self) -> impl Iterator<Item = &MethodSymbol> {
        self.methods().filter(|m| m.owner.is_none())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::InspectorConfig;
    use crate::error::QueryError;
    use crate::indexer::index_files;
    use crate::parser::parse_source;
    use crate::symbols::SymbolGraph;

    fn graph(src: &str) -> SymbolGraph {
        let f = parse_source(src);
        index_files([&f], &InspectorConfig::sequential()).0
    }

    #[test]
    fn subclasses_are_transitive() {
        let g = graph("class A {} class B extends A {} class C extends B {} class D {}");
        assert_eq!(g.list_subclasses("A").unwrap().names(), ["B", "C"]);
        assert!(g.list_subclasses("C").unwrap().classes.is_empty());
    }

    #[test]
    fn unknown_class_is_not_found() {
        let g = graph("class A {}");
        assert_eq!(
            g.find_class("Nope").unwrap_err(),
            QueryError::NotFound("Nope".into())
        );
    }

    #[test]
    fn superclass_chain_stops_on_cycle() {
        let g = graph("class A extends B {} class B extends A {}");
        let chain: Vec<&str> = g
            .superclass_chain("A")
            .unwrap()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(chain, ["B"]);
    }

    #[test]
    fn overrides_follow_intermediate_classes() {
        let g = graph(
            "class A { void f() {} } class B extends A { void f() {} } class C extends B { void f() {} }",
        );
        let owners: Vec<&str> = g
            .list_overrides("A", "f")
            .unwrap()
            .iter()
            .map(|m| g.class(m.owner.unwrap()).name.as_str())
            .collect();
        assert_eq!(owners, ["B", "C"]);
    }

    #[test]
    fn missing_method_is_reported() {
        let g = graph("class A {}");
        assert!(matches!(
            g.list_overrides("A", "f"),
            Err(QueryError::MethodNotFound { .. })
        ));
    }

    #[test]
    fn implementors_include_inherited_interfaces() {
        let g = graph(
            "interface I {} interface J extends I {} class A implements J {} class B extends A {}",
        );
        let names: Vec<&str> = g
            .list_implementors("I")
            .unwrap()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, ["A", "B"]);
    }
}
