//! Blocks and statements.

use crate::ast::*;
use crate::lexer::Tok;

use super::{Construct, Parser};

impl<'src> Parser<'src> {
    pub(super) fn parse_block(&mut self) -> BlockId {
        let start = self.start();
        if !self.expect(Tok::LBrace) {
            let empty = self.arena.list_stmts([]);
            return self
                .arena
                .alloc_block(Block { stmts: empty }, self.finish(start));
        }
        let mut stmts = Vec::new();
        while !self.at(Tok::RBrace) && !self.at_eof() {
            let before = self.pos;
            stmts.push(self.parse_stmt());
            if self.pos == before {
                self.skip_unexpected("statement");
            }
        }
        self.expect(Tok::RBrace);
        let stmts = self.arena.list_stmts(stmts);
        self.arena.alloc_block(Block { stmts }, self.finish(start))
    }

    /// Ends a simple statement: expects `;`, skipping to it if needed.
    fn end_stmt(&mut self) {
        self.expect_sync(Tok::Semi, &[]);
    }

    pub(super) fn parse_stmt(&mut self) -> StmtId {
        let start = self.start();
        self.nested(Construct::Stmt, Self::stmt_inner, |p| {
            p.arena.alloc_stmt(Stmt::Bad, p.finish(start))
        })
    }

    fn stmt_inner(&mut self) -> StmtId {
        let start = self.start();
        let stmt = match self.peek() {
            Tok::LBrace => Stmt::Block(self.parse_block()),
            Tok::Semi => {
                self.bump();
                Stmt::Empty
            }
            Tok::KwIf => return self.parse_if(start),
            Tok::KwWhile => {
                self.bump();
                let cond = self.parse_paren_expr();
                let body = self.parse_stmt();
                Stmt::While { cond, body }
            }
            Tok::KwDo => {
                self.bump();
                let body = self.parse_stmt();
                self.expect(Tok::KwWhile);
                let cond = self.parse_paren_expr();
                self.end_stmt();
                Stmt::DoWhile { body, cond }
            }
            Tok::KwFor => self.parse_for(),
            Tok::KwTry => self.parse_try(),
            Tok::KwSwitch => {
                self.bump();
                let selector = self.parse_paren_expr();
                let cases = self.parse_switch_body();
                Stmt::Switch { selector, cases }
            }
            Tok::KwReturn => {
                self.bump();
                let value = if self.at(Tok::Semi) {
                    None
                } else {
                    Some(self.parse_expr())
                };
                self.end_stmt();
                Stmt::Return(value)
            }
            Tok::KwBreak => {
                self.bump();
                let label = self.ident_name();
                self.end_stmt();
                Stmt::Break(label)
            }
            Tok::KwContinue => {
                self.bump();
                let label = self.ident_name();
                self.end_stmt();
                Stmt::Continue(label)
            }
            Tok::KwThrow => {
                self.bump();
                let value = self.parse_expr();
                self.end_stmt();
                Stmt::Throw(value)
            }
            Tok::KwSynchronized if self.peek_nth(1) == Tok::LParen => {
                self.bump();
                let lock = self.parse_paren_expr();
                let body = self.parse_block();
                Stmt::Synchronized { lock, body }
            }
            Tok::KwAssert => {
                self.bump();
                let cond = self.parse_expr();
                let message = if self.eat(Tok::Colon) {
                    Some(self.parse_expr())
                } else {
                    None
                };
                self.end_stmt();
                Stmt::Assert { cond, message }
            }
            Tok::KwClass
            | Tok::KwInterface
            | Tok::KwEnum
            | Tok::KwAbstract
            | Tok::KwFinal
            | Tok::KwStatic
            | Tok::KwStrictfp
            | Tok::At => {
                let doc = self.doc_here();
                let mods = self.parse_modifiers();
                if matches!(self.peek(), Tok::KwClass | Tok::KwInterface | Tok::KwEnum) {
                    Stmt::LocalClass(self.parse_type_decl(start, doc, mods))
                } else {
                    let typ = self.parse_type(false);
                    let stmt = self.local_var_rest(mods, typ);
                    self.end_stmt();
                    stmt
                }
            }
            Tok::Ident("yield") if self.at_yield() => {
                self.bump();
                let value = self.parse_expr();
                self.end_stmt();
                Stmt::Yield(value)
            }
            Tok::Ident(_) if self.peek_nth(1) == Tok::Colon => {
                let label = self.expect_ident("label");
                self.bump(); // :
                let body = self.parse_stmt();
                Stmt::Labeled { label, body }
            }
            _ if self.looks_like_local_var() => {
                let mods = self.empty_modifiers();
                let typ = self.parse_type(false);
                let stmt = self.local_var_rest(mods, typ);
                self.end_stmt();
                stmt
            }
            t if can_start_expr(t) => {
                let e = self.parse_expr();
                self.end_stmt();
                Stmt::Expr(e)
            }
            t => {
                self.recover_statement(format!("expected statement, found {t}"));
                Stmt::Bad
            }
        };
        self.arena.alloc_stmt(stmt, self.finish(start))
    }

    /// `if` with its `else if` arms. The arms are parsed in a loop and
    /// linked back to front, so a long chain costs no stack.
    fn parse_if(&mut self, start: u32) -> StmtId {
        let mut arms = Vec::new();
        let mut arm_start = start;
        let tail = loop {
            self.bump(); // if
            let cond = self.parse_paren_expr();
            let then = self.parse_stmt();
            arms.push((arm_start, cond, then));
            if !self.eat(Tok::KwElse) {
                break None;
            }
            if !self.at(Tok::KwIf) {
                break Some(self.parse_stmt());
            }
            arm_start = self.start();
        };

        // Every arm runs to the end of the whole chain.
        let mut els = tail;
        let mut outer = None;
        for (arm_start, cond, then) in arms.into_iter().rev() {
            let span = self.finish(arm_start);
            let id = self.arena.alloc_stmt(Stmt::If { cond, then, els }, span);
            els = Some(id);
            outer = Some(id);
        }
        match outer {
            Some(id) => id,
            None => self.arena.alloc_stmt(Stmt::Bad, self.finish(start)),
        }
    }

    /// `yield` is contextual: `yield = 1;` or `yield(x)` are ordinary code.
    fn at_yield(&self) -> bool {
        let next = self.peek_nth(1);
        can_start_expr(next)
            && !matches!(
                next,
                Tok::LParen | Tok::Inc | Tok::Dec | Tok::Plus | Tok::Minus
            )
    }

    fn empty_modifiers(&self) -> ModifierList {
        ModifierList {
            span: Span::empty_at(self.start() as usize),
            ..ModifierList::default()
        }
    }

    fn local_var_rest(&mut self, modifiers: ModifierList, typ: TypeId) -> Stmt {
        let name = self.expect_ident("variable name");
        let declarators = self.parse_declarators(name);
        Stmt::LocalVar {
            modifiers,
            typ,
            declarators,
        }
    }

    pub(super) fn parse_paren_expr(&mut self) -> ExprId {
        self.expect(Tok::LParen);
        let e = self.parse_expr();
        self.expect_sync(Tok::RParen, &[Tok::LBrace, Tok::Semi]);
        e
    }

    fn parse_for(&mut self) -> Stmt {
        self.bump(); // for
        self.expect(Tok::LParen);

        let mut init = Vec::new();
        if !self.at(Tok::Semi) {
            let start = self.start();
            let is_decl = matches!(self.peek(), Tok::KwFinal | Tok::At) || self.looks_like_local_var();
            if is_decl {
                let modifiers = self.parse_modifiers();
                let typ = self.parse_type(false);
                let name = self.expect_ident("variable name");
                if self.eat(Tok::Colon) {
                    let iterable = self.parse_expr();
                    self.expect_sync(Tok::RParen, &[Tok::LBrace]);
                    let body = self.parse_stmt();
                    let param = Param {
                        modifiers,
                        typ: Some(typ),
                        varargs: false,
                        name,
                    };
                    return Stmt::ForEach {
                        param,
                        iterable,
                        body,
                    };
                }
                let declarators = self.parse_declarators(name);
                let decl = Stmt::LocalVar {
                    modifiers,
                    typ,
                    declarators,
                };
                init.push(self.arena.alloc_stmt(decl, self.finish(start)));
            } else {
                loop {
                    let start = self.start();
                    let e = self.parse_expr();
                    init.push(self.arena.alloc_stmt(Stmt::Expr(e), self.finish(start)));
                    if !self.eat(Tok::Comma) {
                        break;
                    }
                }
            }
        }
        self.expect_sync(Tok::Semi, &[Tok::RParen]);

        let cond = if self.at(Tok::Semi) || self.at(Tok::RParen) {
            None
        } else {
            Some(self.parse_expr())
        };
        self.expect_sync(Tok::Semi, &[Tok::RParen]);

        let mut update = Vec::new();
        if !self.at(Tok::RParen) {
            loop {
                update.push(self.parse_expr());
                if !self.eat(Tok::Comma) {
                    break;
                }
            }
        }
        self.expect_sync(Tok::RParen, &[Tok::LBrace]);
        let body = self.parse_stmt();

        Stmt::For {
            init: self.arena.list_stmts(init),
            cond,
            update: self.arena.list_exprs(update),
            body,
        }
    }

    fn parse_try(&mut self) -> Stmt {
        self.bump(); // try
        let mut resources = Vec::new();
        if self.eat(Tok::LParen) {
            while !self.at(Tok::RParen) && !self.at_eof() {
                let start = self.start();
                let is_decl = matches!(self.peek(), Tok::KwFinal | Tok::At) || self.looks_like_local_var();
                let res = if is_decl {
                    let mods = self.parse_modifiers();
                    let typ = self.parse_type(false);
                    self.local_var_rest(mods, typ)
                } else {
                    Stmt::Expr(self.parse_expr())
                };
                resources.push(self.arena.alloc_stmt(res, self.finish(start)));
                if !self.eat(Tok::Semi) {
                    break;
                }
            }
            self.expect_sync(Tok::RParen, &[Tok::LBrace]);
        }

        let body = self.parse_block();

        let mut catches = Vec::new();
        while self.at(Tok::KwCatch) {
            let start = self.start();
            self.bump();
            self.expect(Tok::LParen);
            let modifiers = self.parse_modifiers();
            let mut types = vec![self.parse_type(false)];
            while self.eat(Tok::Pipe) {
                types.push(self.parse_type(false));
            }
            let name = self.expect_ident("exception parameter");
            self.expect_sync(Tok::RParen, &[Tok::LBrace]);
            let body = self.parse_block();
            catches.push(CatchClause {
                modifiers,
                types: self.arena.list_types(types),
                name,
                body,
                span: self.finish(start),
            });
        }

        let finally = if self.eat(Tok::KwFinally) {
            Some(self.parse_block())
        } else {
            None
        };

        Stmt::Try {
            resources: self.arena.list_stmts(resources),
            body,
            catches: self.arena.list_catches(catches),
            finally,
        }
    }

    /// `{ case ...: stmts  case ... -> stmt  default: ... }`
    pub(super) fn parse_switch_body(&mut self) -> ListRef<SwitchCase> {
        if !self.expect_sync(Tok::LBrace, &[]) {
            return ListRef::EMPTY;
        }
        let mut cases = Vec::new();
        while !self.at(Tok::RBrace) && !self.at_eof() {
            let before = self.pos;
            let start = self.start();
            let mut labels = Vec::new();
            let is_default = self.eat(Tok::KwDefault);
            if !is_default {
                if !self.eat(Tok::KwCase) {
                    let found = self.peek();
                    self.recover_statement(format!("expected `case` or `default`, found {found}"));
                    if self.pos == before {
                        self.skip_unexpected("`case` or `default`");
                    }
                    continue;
                }
                let saved = std::mem::replace(&mut self.no_lambda, true);
                loop {
                    // `case null, default`
                    if !self.eat(Tok::KwDefault) {
                        labels.push(self.parse_ternary());
                    }
                    if !self.eat(Tok::Comma) {
                        break;
                    }
                }
                self.no_lambda = saved;
            }

            let mut body = Vec::new();
            let arrow = self.eat(Tok::Arrow);
            if arrow {
                body.push(self.parse_stmt());
            } else {
                self.expect(Tok::Colon);
                while !matches!(
                    self.peek(),
                    Tok::KwCase | Tok::KwDefault | Tok::RBrace | Tok::Eof
                ) {
                    let inner = self.pos;
                    body.push(self.parse_stmt());
                    if self.pos == inner {
                        self.skip_unexpected("statement");
                    }
                }
            }

            cases.push(SwitchCase {
                labels: self.arena.list_exprs(labels),
                is_default,
                arrow,
                body: self.arena.list_stmts(body),
                span: self.finish(start),
            });
            if self.pos == before {
                self.skip_unexpected("switch case");
            }
        }
        self.expect(Tok::RBrace);
        self.arena.list_switch_cases(cases)
    }
}

/// Tokens that may begin an expression.
pub(super) fn can_start_expr(t: Tok<'_>) -> bool {
    matches!(
        t,
        Tok::Ident(_)
            | Tok::IntLit(_)
            | Tok::FloatLit(_)
            | Tok::CharLit(_)
            | Tok::StringLit(_)
            | Tok::KwTrue
            | Tok::KwFalse
            | Tok::KwNull
            | Tok::KwThis
            | Tok::KwSuper
            | Tok::KwNew
            | Tok::KwSwitch
            | Tok::KwVoid
            | Tok::LParen
            | Tok::Bang
            | Tok::Tilde
            | Tok::Plus
            | Tok::Minus
            | Tok::Inc
            | Tok::Dec
    ) || t.is_primitive_type()
}
