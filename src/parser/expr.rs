//! Expressions: precedence climbing over the binary operators, with casts,
//! lambdas and anonymous class bodies handled at the primary level.

use crate::ast::*;
use crate::error::Recovery;
use crate::lexer::Tok;

use super::stmt::can_start_expr;
use super::types::primitive;
use super::{Construct, Parser};

const INSTANCEOF_PREC: u8 = 7;

fn binary_op(t: Tok<'_>) -> Option<(BinaryOp, u8)> {
    Some(match t {
        Tok::LOr => (BinaryOp::Or, 1),
        Tok::LAnd => (BinaryOp::And, 2),
        Tok::Pipe => (BinaryOp::BitOr, 3),
        Tok::Caret => (BinaryOp::BitXor, 4),
        Tok::Amp => (BinaryOp::BitAnd, 5),
        Tok::EqEq => (BinaryOp::Eq, 6),
        Tok::NotEq => (BinaryOp::Ne, 6),
        Tok::Lt => (BinaryOp::Lt, 7),
        Tok::Gt => (BinaryOp::Gt, 7),
        Tok::Le => (BinaryOp::Le, 7),
        Tok::Ge => (BinaryOp::Ge, 7),
        Tok::Shl => (BinaryOp::Shl, 8),
        Tok::Shr => (BinaryOp::Shr, 8),
        Tok::UShr => (BinaryOp::UShr, 8),
        Tok::Plus => (BinaryOp::Add, 9),
        Tok::Minus => (BinaryOp::Sub, 9),
        Tok::Star => (BinaryOp::Mul, 10),
        Tok::Slash => (BinaryOp::Div, 10),
        Tok::Percent => (BinaryOp::Rem, 10),
        _ => return None,
    })
}

fn assign_op(t: Tok<'_>) -> Option<AssignOp> {
    Some(match t {
        Tok::Assign => AssignOp::Assign,
        Tok::AddAssign => AssignOp::Add,
        Tok::SubAssign => AssignOp::Sub,
        Tok::MulAssign => AssignOp::Mul,
        Tok::DivAssign => AssignOp::Div,
        Tok::ModAssign => AssignOp::Rem,
        Tok::AndAssign => AssignOp::And,
        Tok::OrAssign => AssignOp::Or,
        Tok::XorAssign => AssignOp::Xor,
        Tok::ShlAssign => AssignOp::Shl,
        Tok::ShrAssign => AssignOp::Shr,
        Tok::UShrAssign => AssignOp::UShr,
        _ => return None,
    })
}

impl<'src> Parser<'src> {
    pub(super) fn parse_expr(&mut self) -> ExprId {
        self.guarded_expr(Self::expr_inner)
    }

    /// Parses with `f` one nesting level deeper, or skips the expression
    /// and yields `Expr::Bad` past the limit.
    fn guarded_expr(&mut self, f: fn(&mut Self) -> ExprId) -> ExprId {
        let start = self.start();
        self.nested(Construct::Expr, f, |p| {
            p.arena.alloc_expr(Expr::Bad, p.finish(start))
        })
    }

    fn expr_inner(&mut self) -> ExprId {
        if self.lambda_ahead() {
            return self.parse_lambda();
        }
        let start = self.start();
        let lhs = self.parse_ternary();
        match assign_op(self.peek()) {
            Some(op) => {
                self.bump();
                let rhs = if self.at(Tok::LBrace) {
                    self.parse_array_init()
                } else {
                    self.parse_expr()
                };
                self.arena
                    .alloc_expr(Expr::Assign { op, lhs, rhs }, self.finish(start))
            }
            None => lhs,
        }
    }

    /// Conditional expression (`a ? b : c`) and everything that binds tighter.
    pub(super) fn parse_ternary(&mut self) -> ExprId {
        let start = self.start();
        let cond = self.parse_binary(1);
        if !self.eat(Tok::Question) {
            return cond;
        }
        let then = self.parse_expr();
        self.expect(Tok::Colon);
        let els = if self.lambda_ahead() {
            self.parse_lambda()
        } else {
            self.guarded_expr(Self::parse_ternary)
        };
        self.arena
            .alloc_expr(Expr::Conditional { cond, then, els }, self.finish(start))
    }

    fn parse_binary(&mut self, min_prec: u8) -> ExprId {
        let start = self.start();
        let mut lhs = self.parse_unary();
        loop {
            if self.at(Tok::KwInstanceof) && INSTANCEOF_PREC >= min_prec {
                self.bump();
                self.eat(Tok::KwFinal);
                let typ = self.parse_type(false);
                let binding = self.ident_name();
                lhs = self.arena.alloc_expr(
                    Expr::InstanceOf {
                        expr: lhs,
                        typ,
                        binding,
                    },
                    self.finish(start),
                );
                continue;
            }
            let Some((op, prec)) = binary_op(self.peek()) else {
                break;
            };
            if prec < min_prec {
                break;
            }
            self.bump();
            let rhs = self.parse_binary(prec + 1);
            lhs = self
                .arena
                .alloc_expr(Expr::Binary { op, lhs, rhs }, self.finish(start));
        }
        lhs
    }

    fn parse_unary(&mut self) -> ExprId {
        self.guarded_expr(Self::unary_inner)
    }

    fn unary_inner(&mut self) -> ExprId {
        let start = self.start();
        let op = match self.peek() {
            Tok::Plus => Some(UnaryOp::Plus),
            Tok::Minus => Some(UnaryOp::Neg),
            Tok::Bang => Some(UnaryOp::Not),
            Tok::Tilde => Some(UnaryOp::BitNot),
            Tok::Inc => Some(UnaryOp::PreInc),
            Tok::Dec => Some(UnaryOp::PreDec),
            _ => None,
        };
        if let Some(op) = op {
            self.bump();
            let expr = self.parse_unary();
            return self
                .arena
                .alloc_expr(Expr::Unary { op, expr }, self.finish(start));
        }

        if self.at(Tok::LParen) && self.cast_ahead() {
            self.bump();
            let typ = self.parse_type(false);
            self.expect(Tok::RParen);
            let expr = if self.lambda_ahead() {
                self.parse_lambda()
            } else {
                self.parse_unary()
            };
            return self
                .arena
                .alloc_expr(Expr::Cast { typ, expr }, self.finish(start));
        }

        self.parse_postfix()
    }

    /// At `(`: is this `(Type) operand`?
    fn cast_ahead(&self) -> bool {
        let Some(end) = self.scan_type(self.pos + 1) else {
            return false;
        };
        if self.tok_at(end) != Tok::RParen {
            return false;
        }
        if primitive(self.tok_at(self.pos + 1)).is_some() {
            return true;
        }
        // A reference cast must be followed by something that cannot
        // continue a parenthesised expression.
        let next = self.tok_at(end + 1);
        can_start_expr(next)
            && !matches!(next, Tok::Plus | Tok::Minus | Tok::Inc | Tok::Dec)
    }

    /// `x ->` or `( ... ) ->`
    fn lambda_ahead(&self) -> bool {
        if self.no_lambda {
            return false;
        }
        match self.peek() {
            Tok::Ident(_) => self.peek_nth(1) == Tok::Arrow,
            Tok::LParen => {
                let mut depth = 0u32;
                let mut idx = self.pos;
                loop {
                    match self.tok_at(idx) {
                        Tok::LParen => depth += 1,
                        Tok::RParen => {
                            depth -= 1;
                            if depth == 0 {
                                return self.tok_at(idx + 1) == Tok::Arrow;
                            }
                        }
                        Tok::Eof | Tok::Semi | Tok::LBrace | Tok::RBrace => return false,
                        _ => {}
                    }
                    idx += 1;
                }
            }
            _ => false,
        }
    }

    fn parse_lambda(&mut self) -> ExprId {
        let start = self.start();
        let mut params = Vec::new();
        if let Some(name) = self.ident_name() {
            params.push(self.untyped_param(name));
        } else {
            self.bump(); // (
            while !self.at(Tok::RParen) && !self.at_eof() {
                let untyped = matches!(self.peek(), Tok::Ident(_))
                    && matches!(self.peek_nth(1), Tok::Comma | Tok::RParen);
                if untyped {
                    let name = self.expect_ident("parameter name");
                    params.push(self.untyped_param(name));
                } else {
                    params.push(self.parse_param());
                }
                if !self.eat(Tok::Comma) {
                    break;
                }
            }
            self.expect(Tok::RParen);
        }
        self.expect(Tok::Arrow);

        let body = if self.at(Tok::LBrace) {
            LambdaBody::Block(self.parse_block())
        } else {
            LambdaBody::Expr(self.parse_expr())
        };
        let params = self.arena.list_params(params);
        self.arena
            .alloc_expr(Expr::Lambda { params, body }, self.finish(start))
    }

    fn untyped_param(&self, name: IdentName) -> Param {
        Param {
            modifiers: ModifierList {
                span: Span::empty_at(name.pos.start as usize),
                ..ModifierList::default()
            },
            typ: None,
            varargs: false,
            name,
        }
    }

    fn parse_postfix(&mut self) -> ExprId {
        let start = self.start();
        let mut e = self.parse_primary();
        loop {
            let node = match self.peek() {
                Tok::Dot => {
                    self.bump();
                    match self.peek() {
                        Tok::Ident(_) => {
                            let name = self.expect_ident("member name");
                            if self.at(Tok::LParen) {
                                let args = self.parse_args();
                                Expr::Call {
                                    target: Some(e),
                                    type_args: ListRef::EMPTY,
                                    name,
                                    args,
                                }
                            } else {
                                Expr::Field { target: e, name }
                            }
                        }
                        Tok::Lt => {
                            let type_args = self.parse_type_args();
                            let name = self.expect_ident("method name");
                            let args = self.parse_args();
                            Expr::Call {
                                target: Some(e),
                                type_args,
                                name,
                                args,
                            }
                        }
                        Tok::KwNew => {
                            e = self.parse_new(start, Some(e));
                            continue;
                        }
                        Tok::KwThis | Tok::KwSuper => {
                            let name = self.keyword_name();
                            Expr::Field { target: e, name }
                        }
                        found => {
                            self.error_here(
                                format!("expected member name, found {found}"),
                                Recovery::Resynchronized,
                            );
                            break;
                        }
                    }
                }
                Tok::LBrack => {
                    self.bump();
                    let index = self.parse_expr();
                    self.expect_sync(Tok::RBrack, &[Tok::Semi]);
                    Expr::Index { target: e, index }
                }
                Tok::ColonColon => {
                    self.bump();
                    let name = self.method_ref_name();
                    Expr::MethodRef { target: e, name }
                }
                Tok::Inc | Tok::Dec => {
                    let op = if self.bump() == Tok::Inc {
                        UnaryOp::PostInc
                    } else {
                        UnaryOp::PostDec
                    };
                    Expr::Unary { op, expr: e }
                }
                _ => break,
            };
            e = self.arena.alloc_expr(node, self.finish(start));
        }
        e
    }

    /// Identifier node for `this`/`super`/`new` used in name position.
    fn keyword_name(&mut self) -> IdentName {
        let pos = self.cur_span();
        let text = self.bump().text();
        IdentName {
            sym: self.interner.intern(text),
            pos,
        }
    }

    fn method_ref_name(&mut self) -> IdentName {
        if self.at(Tok::KwNew) {
            self.keyword_name()
        } else {
            self.expect_ident("method name")
        }
    }

    fn literal(&mut self, kind: LitKind) -> Expr {
        let text = self.bump().text();
        Expr::Literal {
            kind,
            value: self.interner.intern(text),
        }
    }

    fn parse_primary(&mut self) -> ExprId {
        let start = self.start();
        let node = match self.peek() {
            Tok::IntLit(_) => self.literal(LitKind::Int),
            Tok::FloatLit(_) => self.literal(LitKind::Float),
            Tok::CharLit(_) => self.literal(LitKind::Char),
            Tok::StringLit(_) => self.literal(LitKind::String),
            Tok::KwTrue | Tok::KwFalse => self.literal(LitKind::Bool),
            Tok::KwNull => self.literal(LitKind::Null),
            Tok::KwThis | Tok::KwSuper => {
                let is_this = self.at(Tok::KwThis);
                if self.peek_nth(1) == Tok::LParen {
                    // Explicit constructor invocation.
                    let name = self.keyword_name();
                    let args = self.parse_args();
                    Expr::Call {
                        target: None,
                        type_args: ListRef::EMPTY,
                        name,
                        args,
                    }
                } else {
                    self.bump();
                    if is_this {
                        Expr::This
                    } else {
                        Expr::Super
                    }
                }
            }
            Tok::KwNew => return self.parse_new(start, None),
            Tok::LParen => {
                if self.lambda_ahead() {
                    return self.parse_lambda();
                }
                self.bump();
                let inner = self.parse_expr();
                self.expect_sync(Tok::RParen, &[Tok::Semi]);
                Expr::Paren(inner)
            }
            Tok::KwSwitch => {
                self.bump();
                let selector = self.parse_paren_expr();
                let cases = self.parse_switch_body();
                Expr::Switch { selector, cases }
            }
            Tok::Ident(_) => {
                if let Some(node) = self.try_type_primary() {
                    node
                } else {
                    let name = self.expect_ident("name");
                    if self.at(Tok::LParen) {
                        let args = self.parse_args();
                        Expr::Call {
                            target: None,
                            type_args: ListRef::EMPTY,
                            name,
                            args,
                        }
                    } else {
                        Expr::Name(name)
                    }
                }
            }
            t if primitive(t).is_some() || t == Tok::KwVoid => {
                let typ = self.parse_type(true);
                self.type_primary_rest(typ)
            }
            found => {
                self.error_here(
                    format!("expected expression, found {found}"),
                    Recovery::Resynchronized,
                );
                Expr::Bad
            }
        };
        self.arena.alloc_expr(node, self.finish(start))
    }

    /// `a.b.C.class`, `C[].class` and `C[]::new`, recognised by lookahead so
    /// that the type is parsed as a type.
    fn try_type_primary(&mut self) -> Option<Expr> {
        let end = self.scan_type(self.pos)?;
        let class_lit = self.tok_at(end) == Tok::Dot && self.tok_at(end + 1) == Tok::KwClass;
        let array_ref = self.tok_at(end) == Tok::ColonColon && self.tok_at(end - 1) == Tok::RBrack;
        if !class_lit && !array_ref {
            return None;
        }
        let typ = self.parse_type(false);
        Some(self.type_primary_rest(typ))
    }

    fn type_primary_rest(&mut self, typ: TypeId) -> Expr {
        if self.eat(Tok::ColonColon) {
            let name = self.method_ref_name();
            return Expr::ArrayTypeRef { typ, name };
        }
        self.expect(Tok::Dot);
        self.expect(Tok::KwClass);
        Expr::ClassLit(typ)
    }

    /// `new` creation expression; the cursor is at `new`.
    fn parse_new(&mut self, start: u32, outer: Option<ExprId>) -> ExprId {
        self.bump(); // new
        if self.at(Tok::Lt) {
            // Constructor type arguments are not kept.
            self.skip_type_args();
        }

        let tstart = self.start();
        let typ = if let Some(p) = primitive(self.peek()) {
            self.bump();
            self.arena.alloc_type(Type::Primitive(p), self.finish(tstart))
        } else {
            while self.at(Tok::At) {
                self.skip_annotation();
            }
            if self.at_ident() {
                self.parse_class_type()
            } else {
                self.parse_type(false)
            }
        };

        let node = if self.at(Tok::LBrack) {
            let mut dims = Vec::new();
            let mut extra_dims = 0u8;
            while self.at(Tok::LBrack) {
                self.bump();
                if self.eat(Tok::RBrack) {
                    extra_dims = extra_dims.saturating_add(1);
                    continue;
                }
                dims.push(self.parse_expr());
                self.expect_sync(Tok::RBrack, &[Tok::Semi]);
            }
            let init = if self.at(Tok::LBrace) {
                Some(self.parse_array_init())
            } else {
                None
            };
            Expr::NewArray {
                elem: typ,
                dims: self.arena.list_exprs(dims),
                extra_dims,
                init,
            }
        } else {
            let args = if self.at(Tok::LParen) {
                self.parse_args()
            } else {
                self.expect(Tok::LParen);
                ListRef::EMPTY
            };
            let body = if self.at(Tok::LBrace) {
                let name_pos = self.arena.type_span(typ);
                Some(self.parse_anonymous_body(name_pos))
            } else {
                None
            };
            Expr::New {
                outer,
                typ,
                args,
                body,
            }
        };
        self.arena.alloc_expr(node, self.finish(start))
    }

    fn skip_type_args(&mut self) {
        let mut depth = 0i32;
        loop {
            match self.peek() {
                Tok::Lt => depth += 1,
                Tok::Gt => depth -= 1,
                Tok::Shr => depth -= 2,
                Tok::UShr => depth -= 3,
                Tok::Eof | Tok::Semi | Tok::LBrace | Tok::LParen => return,
                _ => {}
            }
            self.bump();
            if depth <= 0 {
                return;
            }
        }
    }

    /// `( expr {, expr} )`
    pub(super) fn parse_args(&mut self) -> ListRef<ExprId> {
        if !self.expect(Tok::LParen) {
            return ListRef::EMPTY;
        }
        let mut args = Vec::new();
        while !self.at(Tok::RParen) && !self.at_eof() {
            let before = self.pos;
            args.push(self.parse_expr());
            if !self.eat(Tok::Comma) || self.pos == before {
                break;
            }
        }
        self.expect_sync(Tok::RParen, &[Tok::Semi]);
        self.arena.list_exprs(args)
    }

    /// `{ a, b, {c} }`
    pub(super) fn parse_array_init(&mut self) -> ExprId {
        let start = self.start();
        self.bump(); // {
        let mut elems = Vec::new();
        while !self.at(Tok::RBrace) && !self.at_eof() {
            let before = self.pos;
            let e = if self.at(Tok::LBrace) {
                self.guarded_expr(Self::parse_array_init)
            } else {
                self.parse_expr()
            };
            elems.push(e);
            if !self.eat(Tok::Comma) || self.pos == before {
                break;
            }
        }
        self.expect_sync(Tok::RBrace, &[Tok::Semi]);
        let elems = self.arena.list_exprs(elems);
        self.arena.alloc_expr(Expr::ArrayInit(elems), self.finish(start))
    }
}
