//! Read-only AST traversal.
//!
//! `Walk` is implemented for every node type (mostly via `#[derive(WalkAst)]`)
//! and visits children in source order. `Visitor` hooks fire at every
//! arena-allocated node; the default bodies just keep walking, so overriding
//! a hook and not calling `walk` prunes that subtree.
//!
//! Operator chains and `else if` chains can nest thousands of levels deep.
//! [`walk_expr`] and [`walk_stmt`] follow them in a loop instead of
//! recursing; hooks that override `visit_expr` or `visit_stmt` should finish
//! with those rather than with the node's own `walk`.

use crate::ast::*;

pub trait Walk<'ast> {
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V);
}

pub trait Visitor<'ast> {
    #[inline(always)]
    fn visit_unit(&mut self, a: &'ast AstArena, unit: &'ast CompilationUnit) {
        unit.walk(a, self);
    }

    #[inline(always)]
    fn visit_type_decl(&mut self, a: &'ast AstArena, id: TypeDeclId) {
        a.type_decls[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_method(&mut self, a: &'ast AstArena, id: MethodDeclId) {
        a.methods[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_field(&mut self, a: &'ast AstArena, id: FieldDeclId) {
        a.fields[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_block(&mut self, a: &'ast AstArena, id: BlockId) {
        a.blocks[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_stmt(&mut self, a: &'ast AstArena, id: StmtId) {
        walk_stmt(a, self, id);
    }

    #[inline(always)]
    fn visit_expr(&mut self, a: &'ast AstArena, id: ExprId) {
        walk_expr(a, self, id);
    }

    /// Fires for an intermediate link of an unrolled chain, in place of
    /// `visit_expr`, just before the link's other children are walked.
    #[inline(always)]
    fn visit_chain_link(&mut self, _a: &'ast AstArena, _id: ExprId) {}

    #[inline(always)]
    fn visit_type(&mut self, a: &'ast AstArena, id: TypeId) {
        a.types[id].walk(a, self);
    }
}

/// Walks the children of expression `id`.
///
/// The chain below `id` (see [`Expr::chain_head`]) is unrolled: `visit_expr`
/// fires for the innermost operand and for every other child in source
/// order. The intermediate chain links get `visit_chain_link` instead.
pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(a: &'ast AstArena, v: &mut V, id: ExprId) {
    let mut links = Vec::new();
    let mut cur = id;
    while let Some(head) = a.exprs[cur].chain_head() {
        links.push(cur);
        cur = head;
    }
    if links.is_empty() {
        a.exprs[id].walk(a, v);
        return;
    }
    v.visit_expr(a, cur);
    for link in links.into_iter().rev() {
        if link != id {
            v.visit_chain_link(a, link);
        }
        match &a.exprs[link] {
            Expr::Binary { rhs, .. } => rhs.walk(a, v),
            Expr::Call { type_args, args, .. } => {
                type_args.walk(a, v);
                args.walk(a, v);
            }
            Expr::Index { index, .. } => index.walk(a, v),
            Expr::New {
                typ, args, body, ..
            } => {
                typ.walk(a, v);
                args.walk(a, v);
                body.walk(a, v);
            }
            Expr::InstanceOf { typ, .. } => typ.walk(a, v),
            _ => {}
        }
    }
}

/// Walks the children of statement `id`. The `if` links of an `else if`
/// chain are followed in a loop and do not reach `visit_stmt` themselves.
pub fn walk_stmt<'ast, V: Visitor<'ast> + ?Sized>(a: &'ast AstArena, v: &mut V, id: StmtId) {
    let mut cur = id;
    loop {
        match &a.stmts[cur] {
            Stmt::If {
                cond,
                then,
                els: Some(els),
            } if matches!(a.stmts[*els], Stmt::If { .. }) => {
                v.visit_expr(a, *cond);
                v.visit_stmt(a, *then);
                cur = *els;
            }
            stmt => {
                stmt.walk(a, v);
                return;
            }
        }
    }
}

macro_rules! impl_walk_for_ids {
    ($($id:ty => $visit:ident),* $(,)?) => {
        $(
            impl<'ast> Walk<'ast> for $id {
                #[inline(always)]
                fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
                    v.$visit(a, *self);
                }
            }
        )*
    };
}

impl_walk_for_ids! {
    TypeDeclId => visit_type_decl,
    MethodDeclId => visit_method,
    FieldDeclId => visit_field,
    BlockId => visit_block,
    StmtId => visit_stmt,
    ExprId => visit_expr,
    TypeId => visit_type,
}

pub trait ListSlice<T> {
    fn slice(&self, r: ListRef<T>) -> &[T];
}

impl<'ast, T> Walk<'ast> for ListRef<T>
where
    AstArena: ListSlice<T>,
    T: Walk<'ast> + 'ast,
{
    #[inline(always)]
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
        for item in a.slice(*self) {
            item.walk(a, v);
        }
    }
}

macro_rules! impl_list_slice {
    ($($t:ty => $getter:ident),* $(,)?) => {
        $(
            impl ListSlice<$t> for AstArena {
                #[inline(always)]
                fn slice(&self, r: ListRef<$t>) -> &[$t] {
                    self.$getter(r)
                }
            }
        )*
    };
}

impl_list_slice! {
    IdentName => ident_names,
    ImportDecl => imports,
    Annotation => annotations,
    TypeParam => type_params,
    TypeSegment => type_segments,
    Member => members,
    EnumConstant => enum_constants,
    VarDeclarator => declarators,
    Param => params,
    CatchClause => catches,
    SwitchCase => switch_cases,
    TypeDeclId => type_decl_ids,
    MethodDeclId => method_ids,
    StmtId => stmts_list,
    ExprId => exprs_list,
    TypeId => types_list,
}

impl<'ast, T: Walk<'ast>> Walk<'ast> for Option<T> {
    #[inline(always)]
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
        if let Some(x) = self {
            x.walk(a, v);
        }
    }
}

// Leaves
macro_rules! impl_walk_noop {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<'ast> Walk<'ast> for $ty {
                #[inline(always)]
                fn walk<V: Visitor<'ast> + ?Sized>(&self, _: &'ast AstArena, _: &mut V) {}
            }
        )*
    };
}

impl_walk_noop! {
    Span,
    Symbol,
    bool,
    u8,
    Modifiers,
    TypeKind,
    PrimitiveType,
    LitKind,
    UnaryOp,
    BinaryOp,
    AssignOp,
}
