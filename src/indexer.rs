//! Builds a [`SymbolGraph`] from parsed compilation units.
//!
//! Indexing runs in passes:
//! 1. declaration collection, one file at a time, on the calling thread;
//! 2. name resolution of superclass and interface references;
//! 3. inheritance cycle detection;
//! 4. the advisory `@Override` check.
//!
//! Nothing here is fatal. Unresolved names stay unresolved and are exposed
//! through [`TypeRef::resolved`]; problems become `Index` or `Cycle`
//! diagnostics.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, trace, warn};

use crate::ast::{
    AstArena, CompilationUnit, Expr, ExprId, FieldDeclId, ListRef, MethodDeclId, ModifierList,
    Modifiers, TypeDeclId, TypeId, TypeKind, UnitItem,
};
use crate::config::InspectorConfig;
use crate::diagnostics::Diagnostics;
use crate::error::{Diag, DiagKind, Span};
use crate::parser::ParsedFile;
use crate::symbols::*;
use crate::walk::{walk_expr, Visitor, Walk};

/// Signature keys of the methods every class inherits from `java.lang.Object`.
const OBJECT_METHODS: [&str; 5] = [
    "equals(Object)",
    "hashCode()",
    "toString()",
    "clone()",
    "finalize()",
];

pub struct Indexer<'cfg> {
    config: &'cfg InspectorConfig,
    graph: SymbolGraph,
    diags: Diagnostics,
}

impl<'cfg> Indexer<'cfg> {
    pub fn new(config: &'cfg InspectorConfig) -> Self {
        Self {
            config,
            graph: SymbolGraph::new(),
            diags: Diagnostics::with_limit(config.max_diagnostics_per_file),
        }
    }

    /// Collects the declarations of one file. Files must be added from a
    /// single thread; the order of calls fixes symbol ids.
    pub fn add_file(&mut self, f: &ParsedFile) {
        let mut c = Collector {
            f,
            graph: &mut self.graph,
            diags: &mut self.diags,
            summary: FileSummary {
                file: f.file,
                name: f.name.clone(),
                ..FileSummary::default()
            },
            frames: Vec::new(),
            anon_bases: HashMap::new(),
            enum_bodies: HashMap::new(),
        };
        c.visit_unit(&f.arena, &f.unit);
        let summary = c.summary;
        debug!(
            file = %f.name,
            classes = summary.classes.len(),
            interfaces = summary.interfaces.len(),
            functions = summary.functions.len(),
            "indexed file"
        );
        self.graph.files.push(summary);
    }

    /// Runs the cross-file passes and returns the finished graph.
    pub fn finish(mut self) -> (SymbolGraph, Diagnostics) {
        self.resolve_references();
        self.detect_cycles();
        if self.config.check_overrides {
            self.check_overrides();
        }
        debug!(
            classes = self.graph.classes.len(),
            methods = self.graph.methods.len(),
            cycles = self.graph.cycles.len(),
            diags = self.diags.len(),
            "symbol graph complete"
        );
        (self.graph, self.diags)
    }

    // ---- resolution ----

    fn resolve_references(&mut self) {
        let mut unresolved = 0usize;
        for i in 0..self.graph.classes.len() {
            let id = ClassId(i as u32);
            let class = self.graph.class(id);

            let superclass = class
                .superclass
                .as_ref()
                .filter(|r| !r.is_resolved())
                .map(|r| resolve(&self.graph, id, &r.name));
            let interfaces: Vec<Option<ClassId>> = class
                .interfaces
                .iter()
                .map(|r| r.resolved.or_else(|| resolve(&self.graph, id, &r.name)))
                .collect();

            let class = self.graph.class_mut(id);
            if let (Some(sup), Some(resolved)) = (class.superclass.as_mut(), superclass) {
                sup.resolved = resolved;
            }
            for (r, resolved) in class.interfaces.iter_mut().zip(interfaces) {
                r.resolved = resolved;
            }

            // `new Runnable() {}` implements rather than extends.
            let class = self.graph.class(id);
            let base_is_interface = class.is_anonymous
                && class
                    .superclass
                    .as_ref()
                    .and_then(|r| r.resolved)
                    .is_some_and(|b| self.graph.class(b).is_interface());
            if base_is_interface {
                let class = self.graph.class_mut(id);
                if let Some(base) = class.superclass.take() {
                    class.interfaces.insert(0, base);
                }
            }

            let class = self.graph.class(id);
            for (role, r) in class
                .superclass
                .iter()
                .map(|r| ("superclass", r))
                .chain(class.interfaces.iter().map(|r| ("interface", r)))
            {
                if r.is_resolved() {
                    continue;
                }
                unresolved += 1;
                trace!(class = %class.qualified_name, name = %r.name, role, "unresolved supertype");
                if self.config.report_unresolved {
                    self.diags.push(Diag::warning(
                        class.file,
                        DiagKind::Index,
                        class.name_span,
                        format!(
                            "unresolved {role} `{}` of `{}`",
                            r.name, class.qualified_name
                        ),
                    ));
                }
            }
        }
        debug!(unresolved, "resolved supertype references");
    }

    // ---- cycles ----

    fn detect_cycles(&mut self) {
        let edges: Vec<Vec<usize>> = self
            .graph
            .classes
            .iter()
            .map(|c| c.supertypes().filter_map(|r| r.resolved).map(ClassId::index).collect())
            .collect();

        for component in strongly_connected(&edges) {
            let is_cycle = component.len() > 1 || edges[component[0]].contains(&component[0]);
            if !is_cycle {
                continue;
            }
            let mut members: Vec<ClassId> =
                component.into_iter().map(|i| ClassId(i as u32)).collect();
            members.sort_by(|a, b| {
                self.graph
                    .class(*a)
                    .qualified_name
                    .cmp(&self.graph.class(*b).qualified_name)
            });

            let names: Vec<String> = members
                .iter()
                .map(|&m| format!("`{}`", self.graph.class(m).qualified_name))
                .collect();
            let first = self.graph.class(members[0]);
            warn!(participants = %names.join(", "), "inheritance cycle");
            self.diags.push(Diag::error(
                first.file,
                DiagKind::Cycle,
                first.name_span,
                format!("inheritance cycle involving {}", names.join(", ")),
            ));
            self.graph.cycles.push(members);
        }
    }

    // ---- overrides ----

    fn check_overrides(&mut self) {
        for i in 0..self.graph.methods.len() {
            let id = MethodId(i as u32);
            let m = self.graph.method(id);
            let Some(owner) = m.owner else { continue };
            if m.is_constructor || m.is_static() || m.access == Access::Private {
                continue;
            }

            let (found, complete) = find_overridden(&self.graph, owner, &m.signature_key);
            let m = self.graph.method(id);
            if m.has_override_annotation && found.is_none() {
                if !complete {
                    trace!(method = %m.signature_key, "override check skipped: unresolved supertype");
                } else if !OBJECT_METHODS.contains(&m.signature_key.as_str()) {
                    let owner = self.graph.class(owner);
                    self.diags.push(Diag::warning(
                        m.file,
                        DiagKind::Index,
                        m.name_span,
                        format!(
                            "method `{}` in `{}` is annotated @Override but overrides nothing",
                            m.signature_key, owner.qualified_name
                        ),
                    ));
                }
            }
            self.graph.method_mut(id).overrides = found;
        }
    }
}

/// Indexes `files` in order and runs every pass.
pub fn index_files<'a>(
    files: impl IntoIterator<Item = &'a ParsedFile>,
    config: &InspectorConfig,
) -> (SymbolGraph, Diagnostics) {
    let mut indexer = Indexer::new(config);
    for f in files {
        indexer.add_file(f);
    }
    indexer.finish()
}

/// Looks a supertype name up as seen from class `from`: exact qualified
/// name, member of an enclosing class, same package, single-type import,
/// on-demand import, then a unique simple-name match.
fn resolve(graph: &SymbolGraph, from: ClassId, name: &str) -> Option<ClassId> {
    if let Some(id) = graph.by_qualified_name(name) {
        return Some(id);
    }

    let class = graph.class(from);
    let mut outer = class.enclosing_class;
    while let Some(o) = outer {
        let oc = graph.class(o);
        if let Some(id) = graph.by_qualified_name(&format!("{}.{name}", oc.qualified_name)) {
            return Some(id);
        }
        outer = oc.enclosing_class;
    }

    if let Some(file) = graph.file(class.file) {
        if let Some(pkg) = &file.package {
            if let Some(id) = graph.by_qualified_name(&format!("{pkg}.{name}")) {
                return Some(id);
            }
        }
        let (head, rest) = match name.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (name, None),
        };
        for import in file.imports.iter().filter(|i| !i.ends_with(".*")) {
            if import.rsplit('.').next() != Some(head) {
                continue;
            }
            let candidate = match rest {
                Some(rest) => format!("{import}.{rest}"),
                None => import.clone(),
            };
            if let Some(id) = graph.by_qualified_name(&candidate) {
                return Some(id);
            }
        }
        for import in file.imports.iter() {
            if let Some(prefix) = import.strip_suffix(".*") {
                if let Some(id) = graph.by_qualified_name(&format!("{prefix}.{name}")) {
                    return Some(id);
                }
            }
        }
    }

    if !name.contains('.') {
        if let [only] = graph.by_simple_name(name) {
            return Some(*only);
        }
    }
    None
}

/// Breadth-first search of the supertypes of `class` for a method with
/// `key`. The flag is `false` when some supertype on the way is unresolved,
/// in which case a miss proves nothing.
fn find_overridden(graph: &SymbolGraph, class: ClassId, key: &str) -> (Option<MethodId>, bool) {
    let mut complete = true;
    let mut seen = HashSet::new();
    seen.insert(class);
    let mut queue: VecDeque<ClassId> = VecDeque::new();
    queue.push_back(class);

    while let Some(c) = queue.pop_front() {
        for r in graph.class(c).supertypes() {
            let Some(sup) = r.resolved else {
                complete = false;
                continue;
            };
            if !seen.insert(sup) {
                continue;
            }
            let hit = graph.methods_of(sup).find(|m| {
                m.signature_key == key
                    && !m.is_constructor
                    && !m.is_static()
                    && m.access != Access::Private
            });
            if let Some(m) = hit {
                return (Some(m.id), complete);
            }
            queue.push_back(sup);
        }
    }
    (None, complete)
}

/// Tarjan's algorithm, iterative so deep hierarchies cannot overflow the
/// stack. Components come out in reverse topological order.
fn strongly_connected(edges: &[Vec<usize>]) -> Vec<Vec<usize>> {
    const UNVISITED: u32 = u32::MAX;
    let n = edges.len();
    let mut index = vec![UNVISITED; n];
    let mut low = vec![0u32; n];
    let mut on_stack = vec![false; n];
    let mut stack = Vec::new();
    let mut next = 0u32;
    let mut out = Vec::new();

    for root in 0..n {
        if index[root] != UNVISITED {
            continue;
        }
        index[root] = next;
        low[root] = next;
        next += 1;
        stack.push(root);
        on_stack[root] = true;
        let mut work: Vec<(usize, usize)> = vec![(root, 0)];

        while let Some(frame) = work.last_mut() {
            let v = frame.0;
            if let Some(&w) = edges[v].get(frame.1) {
                frame.1 += 1;
                if index[w] == UNVISITED {
                    index[w] = next;
                    low[w] = next;
                    next += 1;
                    stack.push(w);
                    on_stack[w] = true;
                    work.push((w, 0));
                } else if on_stack[w] {
                    low[v] = low[v].min(index[w]);
                }
                continue;
            }

            work.pop();
            if let Some(&(parent, _)) = work.last() {
                low[parent] = low[parent].min(low[v]);
            }
            if low[v] == index[v] {
                let mut component = Vec::new();
                while let Some(w) = stack.pop() {
                    on_stack[w] = false;
                    component.push(w);
                    if w == v {
                        break;
                    }
                }
                out.push(component);
            }
        }
    }
    out
}

// =============================================================================
// Declaration collection
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum Frame {
    Class(ClassId),
    Method(MethodId),
}

struct Collector<'f, 'g> {
    f: &'f ParsedFile,
    graph: &'g mut SymbolGraph,
    diags: &'g mut Diagnostics,
    summary: FileSummary,
    frames: Vec<Frame>,
    /// Base type of each anonymous body created by `new T() { ... }`.
    anon_bases: HashMap<TypeDeclId, TypeId>,
    /// Enum constant bodies and the enum they specialise.
    enum_bodies: HashMap<TypeDeclId, ClassId>,
}

impl Collector<'_, '_> {
    fn note_anonymous_base(&mut self, a: &AstArena, id: ExprId) {
        if let Expr::New {
            typ,
            body: Some(body),
            ..
        } = a.exprs[id]
        {
            self.anon_bases.insert(body, typ);
        }
    }

    fn current_class(&self) -> Option<ClassId> {
        self.frames.iter().rev().find_map(|fr| match fr {
            Frame::Class(c) => Some(*c),
            Frame::Method(_) => None,
        })
    }

    fn enclosing_method(&self) -> Option<MethodId> {
        match self.frames.last() {
            Some(Frame::Method(m)) => Some(*m),
            _ => None,
        }
    }

    fn in_interface(&self) -> bool {
        self.current_class().is_some_and(|c| {
            matches!(
                self.graph.class(c).kind,
                ClassKind::Interface | ClassKind::Annotation
            )
        })
    }

    /// Interface members are public unless declared private.
    fn member_access(&self, flags: Modifiers) -> Access {
        if self.in_interface() && !flags.contains(Modifiers::PRIVATE) {
            Access::Public
        } else {
            Access::from_modifiers(flags)
        }
    }

    fn annotation_names(&self, mods: &ModifierList) -> Vec<String> {
        self.f
            .arena
            .annotations(mods.annotations)
            .iter()
            .map(|an| self.f.qualified(an.name))
            .collect()
    }

    fn span_lines(&self, span: Span) -> (u32, u32) {
        let start = self.f.line(span.start);
        let end = self.f.line(span.end.saturating_sub(1).max(span.start));
        (start, end)
    }

    fn type_refs(&self, list: ListRef<TypeId>) -> Vec<TypeRef> {
        self.f
            .arena
            .types_list(list)
            .iter()
            .map(|&t| TypeRef::unresolved(self.f.type_name(t)))
            .collect()
    }

    fn register_class(&mut self, sym: ClassSymbol) -> ClassId {
        let qualified = sym.qualified_name.clone();
        let (file, span) = (sym.file, sym.name_span);
        let id = self.graph.add_class(sym);
        if self.graph.by_qualified.contains_key(&qualified) {
            self.diags.push(Diag::warning(
                file,
                DiagKind::Index,
                span,
                format!("duplicate declaration of `{qualified}`; the first one is kept"),
            ));
        } else {
            self.graph.by_qualified.insert(qualified, id);
        }
        id
    }
}

impl<'f> Visitor<'f> for Collector<'f, '_> {
    fn visit_unit(&mut self, a: &'f AstArena, unit: &'f CompilationUnit) {
        let f = self.f;
        self.summary.package = unit.package.map(|p| f.qualified(p.name));
        self.summary.imports = a
            .imports(unit.imports)
            .iter()
            .map(|imp| {
                let path = f.qualified(imp.path);
                if imp.wildcard {
                    path + ".*"
                } else {
                    path
                }
            })
            .collect();

        for item in unit.items(a) {
            match item {
                UnitItem::Type(id) => self.visit_type_decl(a, id),
                UnitItem::Method(id) => self.visit_method(a, id),
            }
        }
    }

    fn visit_type_decl(&mut self, a: &'f AstArena, id: TypeDeclId) {
        let f = self.f;
        let decl = &a.type_decls[id];
        let parent = self.current_class();
        let enclosing_method = self.enclosing_method();
        let name = f.ident(decl.name).to_string();

        let qualified_name = match (parent, &self.summary.package) {
            (Some(p), _) => format!("{}.{name}", self.graph.class(p).qualified_name),
            (None, Some(pkg)) => format!("{pkg}.{name}"),
            (None, None) => name.clone(),
        };

        let kind = match decl.kind {
            TypeKind::Class => ClassKind::Class,
            TypeKind::Interface => ClassKind::Interface,
            TypeKind::Enum => ClassKind::Enum,
            TypeKind::Annotation => ClassKind::Annotation,
        };

        let (mut superclass, interfaces) = match decl.kind {
            TypeKind::Class => (
                self.type_refs(decl.extends).into_iter().next(),
                self.type_refs(decl.implements),
            ),
            TypeKind::Interface => (None, self.type_refs(decl.extends)),
            TypeKind::Enum | TypeKind::Annotation => (None, self.type_refs(decl.implements)),
        };
        if decl.is_anonymous {
            if let Some(&base) = self.anon_bases.get(&id) {
                superclass = Some(TypeRef::unresolved(f.type_name(base)));
            } else if let Some(&owner) = self.enum_bodies.get(&id) {
                superclass = Some(TypeRef {
                    name: self.graph.class(owner).qualified_name.clone(),
                    resolved: Some(owner),
                });
            }
        }

        let span = a.type_decl_span(id);
        let (start_line, end_line) = self.span_lines(span);
        let flags = decl.modifiers.flags;
        let access = if parent.is_some() {
            self.member_access(flags)
        } else {
            Access::from_modifiers(flags)
        };

        let sym = ClassSymbol {
            id: ClassId(0),
            name,
            qualified_name,
            kind,
            access,
            modifiers: flags,
            annotations: self.annotation_names(&decl.modifiers),
            superclass,
            interfaces,
            methods: Vec::new(),
            fields: Vec::new(),
            nested: Vec::new(),
            enclosing_class: parent,
            enclosing_method,
            is_anonymous: decl.is_anonymous,
            doc: f.doc(decl.doc),
            file: f.file,
            span,
            name_span: decl.name.pos,
            start_line,
            end_line,
        };
        let cid = self.register_class(sym);

        match parent {
            Some(p) => self.graph.class_mut(p).nested.push(cid),
            None if kind == ClassKind::Interface => self.summary.interfaces.push(cid),
            None => self.summary.classes.push(cid),
        }
        if decl.is_anonymous {
            if let Some(m) = enclosing_method {
                self.graph.method_mut(m).anonymous_classes.push(cid);
            }
        }

        // Enum constants are public static final fields of the enum type.
        for constant in a.enum_constants(decl.enum_constants) {
            let field = FieldSymbol {
                id: FieldId(0),
                name: f.ident(constant.name).to_string(),
                typ: self.graph.class(cid).name.clone(),
                modifiers: Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL,
                access: Access::Public,
                owner: cid,
                file: f.file,
                span: constant.span,
            };
            let fid = self.graph.add_field(field);
            self.graph.class_mut(cid).fields.push(fid);
            if let Some(body) = constant.body {
                self.enum_bodies.insert(body, cid);
            }
        }

        self.frames.push(Frame::Class(cid));
        decl.walk(a, self);
        self.frames.pop();
    }

    fn visit_method(&mut self, a: &'f AstArena, id: MethodDeclId) {
        let f = self.f;
        let m = &a.methods[id];
        let owner = self.current_class();
        let flags = m.modifiers.flags;
        let in_interface = self.in_interface();

        let mut params = Vec::new();
        let mut keys = Vec::new();
        for p in a.params(m.params) {
            let (mut typ, mut key) = match p.typ {
                Some(t) => (f.type_text(t), f.type_key(t)),
                None => (String::new(), String::new()),
            };
            if p.varargs {
                typ.push_str("...");
                key.push_str("[]");
            }
            params.push(ParamSymbol {
                typ,
                name: f.ident(p.name).to_string(),
            });
            keys.push(key);
        }
        let name = f.ident(m.name).to_string();
        let signature_key = format!("{name}({})", keys.join(","));

        let annotations = self.annotation_names(&m.modifiers);
        let has_override_annotation = annotations
            .iter()
            .any(|n| n == "Override" || n == "java.lang.Override");
        let is_abstract = flags.contains(Modifiers::ABSTRACT)
            || (in_interface
                && m.body.is_none()
                && !flags.intersects(Modifiers::STATIC | Modifiers::DEFAULT | Modifiers::PRIVATE));
        let binding = match owner {
            None => Binding::Unbound,
            Some(_) if flags.contains(Modifiers::STATIC) => Binding::Static,
            Some(_) => Binding::Instance,
        };

        let span = a.method_span(id);
        let (start_line, end_line) = self.span_lines(span);

        let sym = MethodSymbol {
            id: MethodId(0),
            name,
            params,
            return_type: m.ret.map(|t| f.type_text(t)),
            modifiers: flags,
            access: self.member_access(flags),
            binding,
            is_abstract,
            is_synchronized: flags.contains(Modifiers::SYNCHRONIZED),
            is_constructor: m.is_constructor,
            has_override_annotation,
            annotations,
            owner,
            overrides: None,
            anonymous_classes: Vec::new(),
            signature_key,
            doc: f.doc(m.doc),
            file: f.file,
            span,
            name_span: m.name.pos,
            line_count: end_line - start_line + 1,
        };
        let mid = self.graph.add_method(sym);
        match owner {
            Some(c) => self.graph.class_mut(c).methods.push(mid),
            None => self.summary.functions.push(mid),
        }

        self.frames.push(Frame::Method(mid));
        m.walk(a, self);
        self.frames.pop();
    }

    fn visit_field(&mut self, a: &'f AstArena, id: FieldDeclId) {
        let f = self.f;
        let fd = &a.fields[id];
        if let Some(owner) = self.current_class() {
            let base = f.type_text(fd.typ);
            let access = self.member_access(fd.modifiers.flags);
            for d in a.declarators(fd.declarators) {
                let mut typ = base.clone();
                for _ in 0..d.dims {
                    typ.push_str("[]");
                }
                let sym = FieldSymbol {
                    id: FieldId(0),
                    name: f.ident(d.name).to_string(),
                    typ,
                    modifiers: fd.modifiers.flags,
                    access,
                    owner,
                    file: f.file,
                    span: a.field_span(id),
                };
                let fid = self.graph.add_field(sym);
                self.graph.class_mut(owner).fields.push(fid);
            }
        }
        fd.walk(a, self);
    }

    fn visit_expr(&mut self, a: &'f AstArena, id: ExprId) {
        self.note_anonymous_base(a, id);
        walk_expr(a, self, id);
    }

    // `outer.new Inner() {}` sits inside a chain.
    fn visit_chain_link(&mut self, a: &'f AstArena, id: ExprId) {
        self.note_anonymous_base(a, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FileId;
    use crate::parser::parse_file;

    fn index(sources: &[&str]) -> (SymbolGraph, Diagnostics) {
        let files: Vec<ParsedFile> = sources
            .iter()
            .enumerate()
            .map(|(i, src)| parse_file(FileId(i as u32), &format!("f{i}.java"), src))
            .collect();
        index_files(&files, &InspectorConfig::sequential())
    }

    #[test]
    fn strongly_connected_finds_mutual_and_self_loops() {
        let edges = vec![vec![1], vec![0], vec![2], vec![]];
        let mut comps: Vec<Vec<usize>> = strongly_connected(&edges)
            .into_iter()
            .map(|mut c| {
                c.sort();
                c
            })
            .collect();
        comps.sort();
        assert_eq!(comps, vec![vec![0, 1], vec![2], vec![3]]);
    }

    #[test]
    fn resolves_through_package_and_imports() {
        let (g, _) = index(&[
            "package a; public class Base {}",
            "package b; import a.Base; class Derived extends Base {}",
        ]);
        let derived = g.by_qualified_name("b.Derived").unwrap();
        let base = g.by_qualified_name("a.Base").unwrap();
        assert_eq!(
            g.class(derived).superclass.as_ref().and_then(|r| r.resolved),
            Some(base)
        );
    }

    #[test]
    fn ambiguous_simple_name_stays_unresolved() {
        let (g, d) = index(&[
            "package a; class Base {}",
            "package b; class Base {}",
            "package c; class Derived extends Base {}",
        ]);
        let derived = g.by_qualified_name("c.Derived").unwrap();
        assert!(!g.class(derived).superclass.as_ref().unwrap().is_resolved());
        assert_eq!(d.of_kind(DiagKind::Index).count(), 1);
    }

    #[test]
    fn anonymous_interface_base_becomes_interface() {
        let (g, _) = index(&[
            "interface Task { void run(); }
             class Runner { void go() { Task t = new Task() { public void run() {} }; } }",
        ]);
        let anon = g.classes().find(|c| c.is_anonymous).unwrap();
        assert!(anon.superclass.is_none());
        assert_eq!(anon.interfaces.len(), 1);
        assert_eq!(anon.interfaces[0].name, "Task");
        assert!(anon.interfaces[0].is_resolved());
    }

    #[test]
    fn override_of_object_method_is_accepted() {
        let (g, d) = index(&[
            "class A { @Override public String toString() { return \"\"; } }",
        ]);
        assert_eq!(d.len(), 0);
        let m = g.methods().next().unwrap();
        assert!(m.is_override());
        assert!(m.overrides.is_none());
    }

    #[test]
    fn override_links_to_supertype_method() {
        let (g, d) = index(&[
            "class A { void f(int[] x, java.util.List<String> y) {} }
             class B extends A { @Override void f(int[] a, List<Integer> b) {} }",
        ]);
        assert!(d.is_empty(), "{:?}", d.as_slice());
        let b = g.by_qualified_name("B").unwrap();
        let f = g.methods_of(b).next().unwrap();
        assert_eq!(f.signature_key, "f(int[],List)");
        assert!(f.overrides.is_some());
    }

    #[test]
    fn mismatched_override_warns() {
        let (_, d) = index(&["class A { void f() {} } class B extends A { @Override void g() {} }"]);
        let msgs: Vec<&str> = d.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].contains("`g()`"));
    }

    #[test]
    fn override_check_is_silent_with_unresolved_ancestor() {
        let (_, d) = index(&["class B extends Missing { @Override void g() {} }"]);
        assert!(d.iter().all(|d| !d.message.contains("@Override")));
    }
}
