//! # Java-like AST
//!
//! Flattened, arena-allocated syntax tree for one compilation unit.
//!
//! ## Architecture
//!
//! - **Nodes**: every node kind that other nodes point at lives in a typed
//!   `SpannedArena<T>` and is referenced by `Id<T>`.
//! - **Lists**: variable-length children are stored in `ExtraData` buffers and
//!   referenced by typed `ListRef<T>` handles.
//! - **Spans**: kept in side tables next to the nodes. A node's span always
//!   lies within its parent's span; recovery nodes that consumed nothing get a
//!   zero-width span at the end of the last consumed token.
//! - **Symbols**: identifiers are interned once per file.
//!
//! Walk/Visitor infrastructure lives in `crate::walk`; `#[derive(WalkAst)]`
//! generates the `Walk` impls for the node types below.

use ast_derive::WalkAst;
use bitflags::bitflags;
use core::marker::PhantomData;
use core::ops::{Index, IndexMut};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::hash::{BuildHasher, BuildHasherDefault, Hasher, RandomState};

pub use crate::error::Span;

// =============================================================================
// Core Foundation Types
// =============================================================================

/// Type-safe identifier for arena-allocated nodes.
///
/// Comparison and hashing only look at the raw index, so ids work as map
/// keys whatever the node type implements.
#[derive(Debug)]
#[repr(transparent)]
pub struct Id<T> {
    raw: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Copy for Id<T> {}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<T> std::hash::Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> Id<T> {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn to_usize(&self) -> usize {
        self.raw as usize
    }

    #[inline]
    pub const fn raw(&self) -> u32 {
        self.raw
    }
}

/// Typed reference into a centralized list buffer.
///
/// Lists are stored in `AstArena::extras`; each `ListRef` points to a
/// contiguous slice in the matching buffer.
#[derive(Debug, PartialEq, Eq)]
pub struct ListRef<T> {
    start: u32,
    len: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Copy for ListRef<T> {}

impl<T> Clone for ListRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Default for ListRef<T> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<T> ListRef<T> {
    pub const EMPTY: Self = Self {
        start: 0,
        len: 0,
        _marker: PhantomData,
    };

    #[inline]
    pub const fn new(start: u32, len: u32) -> Self {
        Self {
            start,
            len,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn start(&self) -> u32 {
        self.start
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.len
    }

    #[inline]
    pub const fn end(&self) -> u32 {
        self.start + self.len
    }
}

// =============================================================================
// Symbol Interning
// =============================================================================

/// Interned string symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Symbol(u32);

pub type Ident = Symbol;

impl Symbol {
    #[inline]
    pub const fn from_raw(v: u32) -> Self {
        Self(v)
    }

    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

/// Identifier occurrence: interned symbol plus its source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct IdentName {
    pub sym: Ident,
    pub pos: Span,
}

#[derive(Default)]
struct U64IdentityHasher(u64);

impl Hasher for U64IdentityHasher {
    fn write(&mut self, _b: &[u8]) {
        unreachable!("U64IdentityHasher only supports write_u64")
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.0 = i;
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }
}

type U64IdentityBuild = BuildHasherDefault<U64IdentityHasher>;

/// String interner. Strings are stored once and looked up through hash
/// buckets keyed by a seeded hash.
#[derive(Debug, Default)]
pub struct Interner {
    strings: Vec<Box<str>>,
    buckets: HashMap<u64, SmallVec<[Symbol; 1]>, U64IdentityBuild>,
    state: RandomState,
}

// Symbols are assigned in first-seen order, so two interners fed the same
// sequence compare equal regardless of their hash seeds.
impl PartialEq for Interner {
    fn eq(&self, other: &Self) -> bool {
        self.strings == other.strings
    }
}

impl Interner {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    #[inline(always)]
    pub fn hash_str(&self, s: &str) -> u64 {
        self.state.hash_one(s)
    }

    /// Interns a string and returns its symbol.
    #[inline]
    pub fn intern(&mut self, s: &str) -> Symbol {
        let h = self.hash_str(s);
        let entry = self.buckets.entry(h).or_default();

        for &sym in entry.iter() {
            if self.strings[sym.0 as usize].as_ref() == s {
                return sym;
            }
        }

        let sym = Symbol(self.strings.len() as u32);
        self.strings.push(s.into());
        entry.push(sym);
        sym
    }

    /// Looks a string up without interning it.
    pub fn get(&self, s: &str) -> Option<Symbol> {
        let h = self.hash_str(s);
        self.buckets
            .get(&h)?
            .iter()
            .copied()
            .find(|sym| self.strings[sym.0 as usize].as_ref() == s)
    }

    /// Resolves a symbol back to its string; unknown symbols resolve to `""`.
    #[inline]
    pub fn resolve(&self, sym: Symbol) -> &str {
        debug_assert!((sym.0 as usize) < self.strings.len());
        self.strings.get(sym.0 as usize).map_or("", |s| s.as_ref())
    }
}

// =============================================================================
// Arena Allocation
// =============================================================================

/// Arena for nodes with associated spans, stored in parallel vectors.
#[derive(Debug, PartialEq)]
pub struct SpannedArena<T> {
    data: Vec<T>,
    spans: Vec<Span>,
}

impl<T> Default for SpannedArena<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            spans: Vec::new(),
        }
    }
}

impl<T> SpannedArena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc(&mut self, node: T, span: Span) -> Id<T> {
        let id = Id::from_raw(self.data.len() as u32);
        self.data.push(node);
        self.spans.push(span);
        id
    }

    #[inline]
    pub fn get(&self, id: Id<T>) -> &T {
        &self.data[id.to_usize()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: Id<T>) -> &mut T {
        &mut self.data[id.to_usize()]
    }

    #[inline]
    pub fn span(&self, id: Id<T>) -> Span {
        self.spans[id.to_usize()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// All ids in allocation order.
    pub fn ids(&self) -> impl Iterator<Item = Id<T>> + '_ {
        (0..self.data.len() as u32).map(Id::from_raw)
    }
}

impl<T> Index<Id<T>> for SpannedArena<T> {
    type Output = T;
    fn index(&self, id: Id<T>) -> &T {
        self.get(id)
    }
}

impl<T> IndexMut<Id<T>> for SpannedArena<T> {
    fn index_mut(&mut self, id: Id<T>) -> &mut T {
        self.get_mut(id)
    }
}

// =============================================================================
// Type Aliases for Node IDs
// =============================================================================

pub type TypeDeclId = Id<TypeDecl>;
pub type MethodDeclId = Id<MethodDecl>;
pub type FieldDeclId = Id<FieldDecl>;
pub type BlockId = Id<Block>;
pub type StmtId = Id<Stmt>;
pub type ExprId = Id<Expr>;
pub type TypeId = Id<Type>;

// =============================================================================
// Centralized List Storage
// =============================================================================

#[derive(Debug, Default, PartialEq)]
pub struct ExtraData {
    pub ident_names: Vec<IdentName>,
    pub imports: Vec<ImportDecl>,
    pub annotations: Vec<Annotation>,
    pub type_params: Vec<TypeParam>,
    pub type_segments: Vec<TypeSegment>,
    pub members: Vec<Member>,
    pub enum_constants: Vec<EnumConstant>,
    pub declarators: Vec<VarDeclarator>,
    pub params: Vec<Param>,
    pub catches: Vec<CatchClause>,
    pub switch_cases: Vec<SwitchCase>,
    pub type_decl_ids: Vec<TypeDeclId>,
    pub method_ids: Vec<MethodDeclId>,
    pub stmts: Vec<StmtId>,
    pub exprs: Vec<ExprId>,
    pub types: Vec<TypeId>,
}

// =============================================================================
// Main AST Arena
// =============================================================================

/// Central arena holding all AST nodes and list buffers of one file.
#[derive(Debug, Default, PartialEq)]
pub struct AstArena {
    pub type_decls: SpannedArena<TypeDecl>,
    pub methods: SpannedArena<MethodDecl>,
    pub fields: SpannedArena<FieldDecl>,
    pub blocks: SpannedArena<Block>,
    pub stmts: SpannedArena<Stmt>,
    pub exprs: SpannedArena<Expr>,
    pub types: SpannedArena<Type>,
    pub extras: ExtraData,
}

macro_rules! list_accessors {
    ($($t:ty => $field:ident, $push:ident, $get:ident;)*) => {
        impl AstArena {
            $(
                #[inline]
                pub fn $push(&mut self, items: impl IntoIterator<Item = $t>) -> ListRef<$t> {
                    Self::push_list(&mut self.extras.$field, items)
                }

                #[inline]
                pub fn $get(&self, r: ListRef<$t>) -> &[$t] {
                    Self::slice(&self.extras.$field, r)
                }
            )*
        }
    };
}

list_accessors! {
    IdentName => ident_names, list_ident_names, ident_names;
    ImportDecl => imports, list_imports, imports;
    Annotation => annotations, list_annotations, annotations;
    TypeParam => type_params, list_type_params, type_params;
    TypeSegment => type_segments, list_type_segments, type_segments;
    Member => members, list_members, members;
    EnumConstant => enum_constants, list_enum_constants, enum_constants;
    VarDeclarator => declarators, list_declarators, declarators;
    Param => params, list_params, params;
    CatchClause => catches, list_catches, catches;
    SwitchCase => switch_cases, list_switch_cases, switch_cases;
    TypeDeclId => type_decl_ids, list_type_decls, type_decl_ids;
    MethodDeclId => method_ids, list_methods, method_ids;
    StmtId => stmts, list_stmts, stmts_list;
    ExprId => exprs, list_exprs, exprs_list;
    TypeId => types, list_types, types_list;
}

impl AstArena {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn push_list<T>(buf: &mut Vec<T>, items: impl IntoIterator<Item = T>) -> ListRef<T> {
        let start = buf.len();
        buf.extend(items);
        let len = buf.len() - start;
        debug_assert!(start <= u32::MAX as usize);
        ListRef::new(start as u32, len as u32)
    }

    #[inline]
    fn slice<T>(buf: &[T], r: ListRef<T>) -> &[T] {
        buf.get(r.start() as usize..r.end() as usize).unwrap_or(&[])
    }

    #[inline]
    pub fn alloc_type_decl(&mut self, node: TypeDecl, span: Span) -> TypeDeclId {
        self.type_decls.alloc(node, span)
    }

    #[inline]
    pub fn alloc_method(&mut self, node: MethodDecl, span: Span) -> MethodDeclId {
        self.methods.alloc(node, span)
    }

    #[inline]
    pub fn alloc_field(&mut self, node: FieldDecl, span: Span) -> FieldDeclId {
        self.fields.alloc(node, span)
    }

    #[inline]
    pub fn alloc_block(&mut self, node: Block, span: Span) -> BlockId {
        self.blocks.alloc(node, span)
    }

    #[inline]
    pub fn alloc_stmt(&mut self, node: Stmt, span: Span) -> StmtId {
        self.stmts.alloc(node, span)
    }

    #[inline]
    pub fn alloc_expr(&mut self, node: Expr, span: Span) -> ExprId {
        self.exprs.alloc(node, span)
    }

    #[inline]
    pub fn alloc_type(&mut self, node: Type, span: Span) -> TypeId {
        self.types.alloc(node, span)
    }

    #[inline]
    pub fn type_decl_span(&self, id: TypeDeclId) -> Span {
        self.type_decls.span(id)
    }

    #[inline]
    pub fn method_span(&self, id: MethodDeclId) -> Span {
        self.methods.span(id)
    }

    #[inline]
    pub fn field_span(&self, id: FieldDeclId) -> Span {
        self.fields.span(id)
    }

    #[inline]
    pub fn block_span(&self, id: BlockId) -> Span {
        self.blocks.span(id)
    }

    #[inline]
    pub fn stmt_span(&self, id: StmtId) -> Span {
        self.stmts.span(id)
    }

    #[inline]
    pub fn expr_span(&self, id: ExprId) -> Span {
        self.exprs.span(id)
    }

    #[inline]
    pub fn type_span(&self, id: TypeId) -> Span {
        self.types.span(id)
    }
}

// =============================================================================
// Compilation Unit
// =============================================================================

/// Root node of one source file.
///
/// `methods` holds methods declared outside any type; they are accepted
/// without a diagnostic and indexed as free functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct CompilationUnit {
    pub package: Option<PackageDecl>,
    pub imports: ListRef<ImportDecl>,
    pub types: ListRef<TypeDeclId>,
    pub methods: ListRef<MethodDeclId>,
    pub span: Span,
}

/// A top-level declaration of a [`CompilationUnit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitItem {
    Type(TypeDeclId),
    Method(MethodDeclId),
}

impl CompilationUnit {
    /// Top-level types and free methods merged in source order.
    pub fn items(&self, a: &AstArena) -> Vec<UnitItem> {
        let mut items: Vec<(u32, UnitItem)> = a
            .type_decl_ids(self.types)
            .iter()
            .map(|&id| (a.type_decl_span(id).start, UnitItem::Type(id)))
            .chain(
                a.method_ids(self.methods)
                    .iter()
                    .map(|&id| (a.method_span(id).start, UnitItem::Method(id))),
            )
            .collect();
        items.sort_by_key(|(start, _)| *start);
        items.into_iter().map(|(_, item)| item).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct PackageDecl {
    pub name: ListRef<IdentName>,
    pub span: Span,
}

/// `import [static] a.b.C;` or `import a.b.*;`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct ImportDecl {
    pub path: ListRef<IdentName>,
    pub is_static: bool,
    pub wildcard: bool,
    pub span: Span,
}

// =============================================================================
// Modifiers and Annotations
// =============================================================================

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u16 {
        const PUBLIC       = 1 << 0;
        const PROTECTED    = 1 << 1;
        const PRIVATE      = 1 << 2;
        const STATIC       = 1 << 3;
        const FINAL        = 1 << 4;
        const ABSTRACT     = 1 << 5;
        const SYNCHRONIZED = 1 << 6;
        const NATIVE       = 1 << 7;
        const TRANSIENT    = 1 << 8;
        const VOLATILE     = 1 << 9;
        const STRICTFP     = 1 << 10;
        const DEFAULT      = 1 << 11;
    }
}

impl Modifiers {
    const KEYWORDS: [(Modifiers, &'static str); 12] = [
        (Self::PUBLIC, "public"),
        (Self::PROTECTED, "protected"),
        (Self::PRIVATE, "private"),
        (Self::STATIC, "static"),
        (Self::FINAL, "final"),
        (Self::ABSTRACT, "abstract"),
        (Self::SYNCHRONIZED, "synchronized"),
        (Self::NATIVE, "native"),
        (Self::TRANSIENT, "transient"),
        (Self::VOLATILE, "volatile"),
        (Self::STRICTFP, "strictfp"),
        (Self::DEFAULT, "default"),
    ];

    /// Keywords of the set flags, in canonical order.
    pub fn keywords(self) -> impl Iterator<Item = &'static str> {
        Self::KEYWORDS
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, kw)| kw)
    }
}

/// `@Name` or `@Name(args)`. Element-value pairs are kept as assignment
/// expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct Annotation {
    pub name: ListRef<IdentName>,
    pub args: ListRef<ExprId>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, WalkAst)]
pub struct ModifierList {
    pub flags: Modifiers,
    pub annotations: ListRef<Annotation>,
    pub span: Span,
}

// =============================================================================
// Declarations
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    /// `@interface`
    Annotation,
}

/// Class, interface, enum or annotation declaration.
///
/// Anonymous class bodies are `TypeDecl`s too (`is_anonymous`), reached
/// through `Expr::New::body`. Their `name` is synthesized after parsing as
/// `<enclosingMethod>$<ordinal>` and positioned on the instantiated type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct TypeDecl {
    /// Span of the attached `/** */` comment, if any.
    #[walk(skip)]
    pub doc: Option<Span>,
    pub modifiers: ModifierList,
    pub kind: TypeKind,
    pub name: IdentName,
    pub type_params: ListRef<TypeParam>,
    /// For classes at most one entry; interfaces may extend several.
    pub extends: ListRef<TypeId>,
    pub implements: ListRef<TypeId>,
    pub enum_constants: ListRef<EnumConstant>,
    pub members: ListRef<Member>,
    pub is_anonymous: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct EnumConstant {
    pub annotations: ListRef<Annotation>,
    pub name: IdentName,
    pub args: ListRef<ExprId>,
    pub body: Option<TypeDeclId>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Member {
    Field(FieldDeclId),
    Method(MethodDeclId),
    Type(TypeDeclId),
    Initializer { is_static: bool, body: BlockId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct TypeParam {
    pub name: IdentName,
    pub bounds: ListRef<TypeId>,
}

/// Field declaration; one entry per `int x, y = 1;` statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct FieldDecl {
    #[walk(skip)]
    pub doc: Option<Span>,
    pub modifiers: ModifierList,
    pub typ: TypeId,
    pub declarators: ListRef<VarDeclarator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct VarDeclarator {
    pub name: IdentName,
    /// Array brackets after the name (`int a[]`).
    pub dims: u8,
    pub init: Option<ExprId>,
}

/// Method or constructor. Constructors have no return type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct MethodDecl {
    #[walk(skip)]
    pub doc: Option<Span>,
    pub modifiers: ModifierList,
    pub type_params: ListRef<TypeParam>,
    pub ret: Option<TypeId>,
    pub name: IdentName,
    pub params: ListRef<Param>,
    pub throws: ListRef<TypeId>,
    /// Annotation element default (`String value() default "";`).
    pub default_value: Option<ExprId>,
    pub body: Option<BlockId>,
    pub is_constructor: bool,
}

/// Formal parameter. `typ` is `None` only for untyped lambda parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct Param {
    pub modifiers: ModifierList,
    pub typ: Option<TypeId>,
    pub varargs: bool,
    pub name: IdentName,
}

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Char => "char",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
        }
    }
}

/// One `Name<Args>` segment of a (possibly qualified) class type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct TypeSegment {
    pub name: IdentName,
    pub args: ListRef<TypeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Type {
    Primitive(PrimitiveType),
    Named(ListRef<TypeSegment>),
    Array(TypeId),
    /// `?`, `? extends T`, `? super T`
    Wildcard { bound: Option<TypeId>, is_super: bool },
    Void,
    Bad,
}

// =============================================================================
// Statements
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct Block {
    pub stmts: ListRef<StmtId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct CatchClause {
    pub modifiers: ModifierList,
    /// Multi-catch alternatives (`IOException | SQLException e`).
    pub types: ListRef<TypeId>,
    pub name: IdentName,
    pub body: BlockId,
    pub span: Span,
}

/// `case a, b:` / `case a ->` / `default:` group with its statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct SwitchCase {
    pub labels: ListRef<ExprId>,
    pub is_default: bool,
    pub arrow: bool,
    pub body: ListRef<StmtId>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Stmt {
    Block(BlockId),
    LocalVar {
        modifiers: ModifierList,
        typ: TypeId,
        declarators: ListRef<VarDeclarator>,
    },
    LocalClass(TypeDeclId),
    Expr(ExprId),
    If {
        cond: ExprId,
        then: StmtId,
        els: Option<StmtId>,
    },
    While {
        cond: ExprId,
        body: StmtId,
    },
    DoWhile {
        body: StmtId,
        cond: ExprId,
    },
    For {
        init: ListRef<StmtId>,
        cond: Option<ExprId>,
        update: ListRef<ExprId>,
        body: StmtId,
    },
    ForEach {
        param: Param,
        iterable: ExprId,
        body: StmtId,
    },
    Return(Option<ExprId>),
    Break(Option<IdentName>),
    Continue(Option<IdentName>),
    Throw(ExprId),
    Synchronized {
        lock: ExprId,
        body: BlockId,
    },
    Try {
        resources: ListRef<StmtId>,
        body: BlockId,
        catches: ListRef<CatchClause>,
        finally: Option<BlockId>,
    },
    Switch {
        selector: ExprId,
        cases: ListRef<SwitchCase>,
    },
    Labeled {
        label: IdentName,
        body: StmtId,
    },
    Assert {
        cond: ExprId,
        message: Option<ExprId>,
    },
    Yield(ExprId),
    Empty,
    /// Placeholder for a statement the parser had to skip.
    Bad,
}

// =============================================================================
// Expressions
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LitKind {
    Int,
    Float,
    Char,
    String,
    Bool,
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
    BitNot,
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Mul,
    Div,
    Rem,
    Add,
    Sub,
    Shl,
    Shr,
    UShr,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    BitAnd,
    BitXor,
    BitOr,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    UShr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum LambdaBody {
    Expr(ExprId),
    Block(BlockId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Expr {
    Name(IdentName),
    Literal { kind: LitKind, value: Ident },
    This,
    Super,
    Field {
        target: ExprId,
        name: IdentName,
    },
    Call {
        target: Option<ExprId>,
        type_args: ListRef<TypeId>,
        name: IdentName,
        args: ListRef<ExprId>,
    },
    /// `[outer.]new T(args) [{ body }]`; `body` is an anonymous class.
    New {
        outer: Option<ExprId>,
        typ: TypeId,
        args: ListRef<ExprId>,
        body: Option<TypeDeclId>,
    },
    NewArray {
        elem: TypeId,
        dims: ListRef<ExprId>,
        extra_dims: u8,
        init: Option<ExprId>,
    },
    ArrayInit(ListRef<ExprId>),
    Index {
        target: ExprId,
        index: ExprId,
    },
    Unary {
        op: UnaryOp,
        expr: ExprId,
    },
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    Assign {
        op: AssignOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    Conditional {
        cond: ExprId,
        then: ExprId,
        els: ExprId,
    },
    InstanceOf {
        expr: ExprId,
        typ: TypeId,
        binding: Option<IdentName>,
    },
    Cast {
        typ: TypeId,
        expr: ExprId,
    },
    Lambda {
        params: ListRef<Param>,
        body: LambdaBody,
    },
    /// `target::name`; `target` is an expression or a type written as a name.
    MethodRef {
        target: ExprId,
        name: IdentName,
    },
    ArrayTypeRef {
        typ: TypeId,
        name: IdentName,
    },
    ClassLit(TypeId),
    Switch {
        selector: ExprId,
        cases: ListRef<SwitchCase>,
    },
    Paren(ExprId),
    Bad,
}

impl Expr {
    /// The leftmost operand this node extends, for the node kinds the
    /// parser builds in a loop (`a + b + c`, `x.f().g()[i]`). Such chains
    /// nest through this operand and can be arbitrarily deep.
    pub fn chain_head(&self) -> Option<ExprId> {
        match *self {
            Expr::Binary { lhs, .. } => Some(lhs),
            Expr::Field { target, .. }
            | Expr::Index { target, .. }
            | Expr::MethodRef { target, .. } => Some(target),
            Expr::Call { target, .. } => target,
            Expr::New { outer, .. } => outer,
            Expr::InstanceOf { expr, .. } => Some(expr),
            Expr::Unary {
                op: UnaryOp::PostInc | UnaryOp::PostDec,
                expr,
            } => Some(expr),
            _ => None,
        }
    }
}
