//! Indexed declarations: classes, methods and fields across a run.
//!
//! Symbols live in flat vectors inside [`SymbolGraph`] and refer to each
//! other by index. Superclass and interface references are names plus an
//! optional resolved index, never ownership.

use std::collections::HashMap;
use std::fmt;

use crate::ast::Modifiers;
use crate::error::{FileId, Span};

macro_rules! symbol_id {
    ($($(#[$m:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$m])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
            pub struct $name(pub u32);

            impl $name {
                #[inline]
                pub fn index(self) -> usize {
                    self.0 as usize
                }
            }
        )*
    };
}

symbol_id! {
    /// Index of a [`ClassSymbol`] in its graph.
    ClassId,
    /// Index of a [`MethodSymbol`] in its graph.
    MethodId,
    FieldId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Enum => "enum",
            ClassKind::Annotation => "annotation",
        })
    }
}

/// Declared visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Access {
    Private,
    Protected,
    Package,
    Public,
}

impl Access {
    pub fn from_modifiers(m: Modifiers) -> Self {
        if m.contains(Modifiers::PUBLIC) {
            Access::Public
        } else if m.contains(Modifiers::PROTECTED) {
            Access::Protected
        } else if m.contains(Modifiers::PRIVATE) {
            Access::Private
        } else {
            Access::Package
        }
    }

    /// Inverse of [`Access::as_str`].
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "private" => Access::Private,
            "protected" => Access::Protected,
            "package" => Access::Package,
            "public" => Access::Public,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Access::Private => "private",
            Access::Protected => "protected",
            Access::Package => "package",
            Access::Public => "public",
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a method is bound: to the class, to an instance, or to nothing
/// (free functions declared outside any class).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    Unbound,
    Static,
    Instance,
}

impl Binding {
    pub fn as_str(self) -> &'static str {
        match self {
            Binding::Unbound => "unbound",
            Binding::Static => "static",
            Binding::Instance => "instance",
        }
    }
}

/// A type reference by name. `resolved` is filled by the resolution pass
/// when the name matches a class indexed in the same run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub name: String,
    pub resolved: Option<ClassId>,
}

impl TypeRef {
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resolved: None,
        }
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    /// Last dotted segment of the name.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSymbol {
    /// Source rendering of the type, generic arguments included.
    pub typ: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct ClassSymbol {
    pub id: ClassId,
    pub name: String,
    /// Package, enclosing classes and name, dot separated.
    pub qualified_name: String,
    pub kind: ClassKind,
    pub access: Access,
    pub modifiers: Modifiers,
    pub annotations: Vec<String>,
    pub superclass: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    pub methods: Vec<MethodId>,
    pub fields: Vec<FieldId>,
    pub nested: Vec<ClassId>,
    pub enclosing_class: Option<ClassId>,
    /// Method whose body declares this class (anonymous and local classes).
    pub enclosing_method: Option<MethodId>,
    pub is_anonymous: bool,
    pub doc: Option<String>,
    pub file: FileId,
    pub span: Span,
    pub name_span: Span,
    pub start_line: u32,
    pub end_line: u32,
}

impl ClassSymbol {
    #[inline]
    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.modifiers.contains(Modifiers::ABSTRACT) || self.is_interface()
    }

    /// Superclass followed by interfaces.
    pub fn supertypes(&self) -> impl Iterator<Item = &TypeRef> {
        self.superclass.iter().chain(self.interfaces.iter())
    }
}

impl fmt::Display for ClassSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_anonymous {
            "Anonymous class"
        } else {
            match self.kind {
                ClassKind::Class => "Class",
                ClassKind::Interface => "Interface",
                ClassKind::Enum => "Enum",
                ClassKind::Annotation => "Annotation",
            }
        };
        write!(f, "{kind} {}", self.qualified_name)
    }
}

#[derive(Debug, Clone)]
pub struct MethodSymbol {
    pub id: MethodId,
    pub name: String,
    pub params: Vec<ParamSymbol>,
    /// `None` for constructors.
    pub return_type: Option<String>,
    pub modifiers: Modifiers,
    pub access: Access,
    pub binding: Binding,
    pub is_abstract: bool,
    pub is_synchronized: bool,
    pub is_constructor: bool,
    pub has_override_annotation: bool,
    pub annotations: Vec<String>,
    /// Owning class; `None` for free functions.
    pub owner: Option<ClassId>,
    /// Supertype method this one overrides, when every step resolved.
    pub overrides: Option<MethodId>,
    pub anonymous_classes: Vec<ClassId>,
    /// Name plus simple parameter type names: `equals(Object)`.
    pub signature_key: String,
    pub doc: Option<String>,
    pub file: FileId,
    pub span: Span,
    pub name_span: Span,
    pub line_count: u32,
}

impl MethodSymbol {
    /// Declared `@Override` or found to override a supertype method.
    #[inline]
    pub fn is_override(&self) -> bool {
        self.has_override_annotation || self.overrides.is_some()
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.binding == Binding::Static
    }
}

impl fmt::Display for MethodSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.access)?;
        if self.is_abstract {
            f.write_str(" abstract")?;
        }
        if self.binding != Binding::Instance {
            write!(f, " {}", self.binding.as_str())?;
        }
        write!(f, " method {}(", self.name)?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {}", p.typ, p.name)?;
        }
        f.write_str(")")?;
        if let Some(ret) = &self.return_type {
            write!(f, ": {ret}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct FieldSymbol {
    pub id: FieldId,
    pub name: String,
    pub typ: String,
    pub modifiers: Modifiers,
    pub access: Access,
    pub owner: ClassId,
    pub file: FileId,
    pub span: Span,
}

/// Per-file view of what was indexed.
#[derive(Debug, Clone, Default)]
pub struct FileSummary {
    pub file: FileId,
    pub name: String,
    pub package: Option<String>,
    /// Import paths, `.*` kept for on-demand imports.
    pub imports: Vec<String>,
    /// Top-level classes, enums and annotation types.
    pub classes: Vec<ClassId>,
    pub interfaces: Vec<ClassId>,
    /// Methods declared outside any class.
    pub functions: Vec<MethodId>,
}

impl fmt::Display for FileSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(3);
        if !self.imports.is_empty() {
            parts.push(format!("{} imports", self.imports.len()));
        }
        if !self.classes.is_empty() || self.interfaces.is_empty() {
            parts.push(format!("{} classes", self.classes.len()));
        }
        if !self.interfaces.is_empty() {
            parts.push(format!("{} interfaces", self.interfaces.len()));
        }
        write!(f, "Java SourceFile: {}", parts.join(", "))
    }
}

/// Every symbol of one indexing run. Built once by the indexer and then
/// only read.
#[derive(Debug, Clone, Default)]
pub struct SymbolGraph {
    pub(crate) classes: Vec<ClassSymbol>,
    pub(crate) methods: Vec<MethodSymbol>,
    pub(crate) fields: Vec<FieldSymbol>,
    pub(crate) files: Vec<FileSummary>,
    pub(crate) by_qualified: HashMap<String, ClassId>,
    pub(crate) by_simple: HashMap<String, Vec<ClassId>>,
    /// Inheritance cycles, each sorted by qualified name.
    pub(crate) cycles: Vec<Vec<ClassId>>,
}

impl SymbolGraph {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn class(&self, id: ClassId) -> &ClassSymbol {
        &self.classes[id.index()]
    }

    #[inline]
    pub fn method(&self, id: MethodId) -> &MethodSymbol {
        &self.methods[id.index()]
    }

    #[inline]
    pub fn field(&self, id: FieldId) -> &FieldSymbol {
        &self.fields[id.index()]
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassSymbol> {
        self.classes.iter()
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodSymbol> {
        self.methods.iter()
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldSymbol> {
        self.fields.iter()
    }

    pub fn files(&self) -> &[FileSummary] {
        &self.files
    }

    pub fn file(&self, file: FileId) -> Option<&FileSummary> {
        self.files.iter().find(|s| s.file == file)
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.methods.is_empty()
    }

    pub fn by_qualified_name(&self, name: &str) -> Option<ClassId> {
        self.by_qualified.get(name).copied()
    }

    /// Classes with this simple name, in declaration order.
    pub fn by_simple_name(&self, name: &str) -> &[ClassId] {
        self.by_simple.get(name).map_or(&[], Vec::as_slice)
    }

    pub fn cycles(&self) -> &[Vec<ClassId>] {
        &self.cycles
    }

    /// Whether `id` takes part in an inheritance cycle.
    pub fn in_cycle(&self, id: ClassId) -> bool {
        self.cycles.iter().any(|c| c.contains(&id))
    }

    pub fn methods_of(&self, id: ClassId) -> impl Iterator<Item = &MethodSymbol> {
        self.class(id).methods.iter().map(|&m| self.method(m))
    }

    pub fn fields_of(&self, id: ClassId) -> impl Iterator<Item = &FieldSymbol> {
        self.class(id).fields.iter().map(|&f| self.field(f))
    }

    /// Methods of `id` without a body that must be implemented by subtypes.
    pub fn abstract_methods_of(&self, id: ClassId) -> impl Iterator<Item = &MethodSymbol> {
        self.methods_of(id).filter(|m| m.is_abstract)
    }

    pub fn method_named(&self, class: ClassId, name: &str) -> Option<&MethodSymbol> {
        self.methods_of(class).find(|m| m.name == name)
    }

    pub(crate) fn add_class(&mut self, mut sym: ClassSymbol) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        sym.id = id;
        self.by_simple.entry(sym.name.clone()).or_default().push(id);
        self.classes.push(sym);
        id
    }

    pub(crate) fn add_method(&mut self, mut sym: MethodSymbol) -> MethodId {
        let id = MethodId(self.methods.len() as u32);
        sym.id = id;
        self.methods.push(sym);
        id
    }

    pub(crate) fn add_field(&mut self, mut sym: FieldSymbol) -> FieldId {
        let id = FieldId(self.fields.len() as u32);
        sym.id = id;
        self.fields.push(sym);
        id
    }

    #[inline]
    pub(crate) fn class_mut(&mut self, id: ClassId) -> &mut ClassSymbol {
        &mut self.classes[id.index()]
    }

    #[inline]
    pub(crate) fn method_mut(&mut self, id: MethodId) -> &mut MethodSymbol {
        &mut self.methods[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_round_trips_through_names() {
        for a in [Access::Private, Access::Protected, Access::Package, Access::Public] {
            assert_eq!(Access::parse(a.as_str()), Some(a));
        }
        assert_eq!(Access::parse("published"), None);
    }

    #[test]
    fn access_prefers_explicit_keyword() {
        assert_eq!(Access::from_modifiers(Modifiers::empty()), Access::Package);
        assert_eq!(
            Access::from_modifiers(Modifiers::PRIVATE | Modifiers::STATIC),
            Access::Private
        );
    }

    #[test]
    fn file_summary_lists_non_empty_groups() {
        let mut s = FileSummary::default();
        assert_eq!(s.to_string(), "Java SourceFile: 0 classes");
        s.imports.push("java.util.List".into());
        s.classes.push(ClassId(0));
        assert_eq!(s.to_string(), "Java SourceFile: 1 imports, 1 classes");
        s.imports.clear();
        s.interfaces.push(ClassId(1));
        assert_eq!(s.to_string(), "Java SourceFile: 1 classes, 1 interfaces");
    }

    #[test]
    fn type_ref_simple_name() {
        assert_eq!(TypeRef::unresolved("java.util.AClass").simple_name(), "AClass");
        assert_eq!(TypeRef::unresolved("Thread").simple_name(), "Thread");
    }
}
