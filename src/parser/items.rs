//! Compilation unit, type declarations and members.

use crate::ast::*;
use crate::error::Recovery;
use crate::lexer::Tok;

use super::{Construct, Parser};

fn modifier_flag(tok: Tok<'_>) -> Modifiers {
    match tok {
        Tok::KwPublic => Modifiers::PUBLIC,
        Tok::KwProtected => Modifiers::PROTECTED,
        Tok::KwPrivate => Modifiers::PRIVATE,
        Tok::KwStatic => Modifiers::STATIC,
        Tok::KwFinal => Modifiers::FINAL,
        Tok::KwAbstract => Modifiers::ABSTRACT,
        Tok::KwSynchronized => Modifiers::SYNCHRONIZED,
        Tok::KwNative => Modifiers::NATIVE,
        Tok::KwTransient => Modifiers::TRANSIENT,
        Tok::KwVolatile => Modifiers::VOLATILE,
        Tok::KwStrictfp => Modifiers::STRICTFP,
        Tok::KwDefault => Modifiers::DEFAULT,
        _ => Modifiers::empty(),
    }
}

impl<'src> Parser<'src> {
    pub(super) fn parse_compilation_unit(&mut self) -> CompilationUnit {
        let mut package = None;
        let mut imports = Vec::new();
        let mut types = Vec::new();
        let mut methods = Vec::new();

        if self.at(Tok::KwPackage) {
            let start = self.start();
            self.bump();
            let name = self.parse_qualified_name();
            self.expect_sync(Tok::Semi, &[]);
            package = Some(PackageDecl {
                name,
                span: self.finish(start),
            });
        }

        while !self.at_eof() {
            let before = self.pos;
            if self.eat(Tok::Semi) {
                continue;
            }
            if self.at(Tok::KwImport) {
                imports.push(self.parse_import());
                continue;
            }

            let doc = self.doc_here();
            let start = self.start();
            let mods = self.parse_modifiers();
            if self.at_type_keyword() {
                types.push(self.parse_type_decl(start, doc, mods));
            } else if self.looks_like_method() {
                match self.parse_member_after_modifiers(start, doc, mods) {
                    Some(Member::Method(m)) => methods.push(m),
                    Some(Member::Type(t)) => types.push(t),
                    _ => {}
                }
            } else {
                self.skip_unexpected("class, interface or enum declaration");
            }

            if self.pos == before {
                self.skip_unexpected("class, interface or enum declaration");
            }
        }

        CompilationUnit {
            package,
            imports: self.arena.list_imports(imports),
            types: self.arena.list_type_decls(types),
            methods: self.arena.list_methods(methods),
            span: Span::new(0, self.cur_span().end as usize),
        }
    }

    fn parse_import(&mut self) -> ImportDecl {
        let start = self.start();
        self.bump(); // import
        let is_static = self.eat(Tok::KwStatic);
        let mut parts = Vec::new();
        let mut wildcard = false;
        loop {
            if self.eat(Tok::Star) {
                wildcard = true;
                break;
            }
            parts.push(self.expect_ident("import path"));
            if !self.eat(Tok::Dot) {
                break;
            }
        }
        self.expect_sync(Tok::Semi, &[]);
        ImportDecl {
            path: self.arena.list_ident_names(parts),
            is_static,
            wildcard,
            span: self.finish(start),
        }
    }

    pub(super) fn parse_qualified_name(&mut self) -> ListRef<IdentName> {
        let mut parts = vec![self.expect_ident("name")];
        while self.at(Tok::Dot) && matches!(self.peek_nth(1), Tok::Ident(_)) {
            self.bump();
            if let Some(n) = self.ident_name() {
                parts.push(n);
            }
        }
        self.arena.list_ident_names(parts)
    }

    fn at_type_keyword(&self) -> bool {
        match self.peek() {
            Tok::KwClass | Tok::KwInterface | Tok::KwEnum => true,
            Tok::At => self.peek_nth(1) == Tok::KwInterface,
            _ => false,
        }
    }

    /// Lookahead after modifiers: `<T> ...`, `void name(`, `Type name(` or
    /// `Name(`.
    fn looks_like_method(&self) -> bool {
        match self.peek() {
            Tok::Lt | Tok::KwVoid => true,
            Tok::Ident(_) if self.peek_nth(1) == Tok::LParen => true,
            _ => match self.scan_type(self.pos) {
                Some(end) => {
                    matches!(self.tok_at(end), Tok::Ident(_)) && self.tok_at(end + 1) == Tok::LParen
                }
                None => false,
            },
        }
    }

    // ---- modifiers and annotations ----

    pub(super) fn parse_modifiers(&mut self) -> ModifierList {
        let start = self.start();
        let mut flags = Modifiers::empty();
        let mut annotations = Vec::new();
        loop {
            match self.peek() {
                Tok::At if self.peek_nth(1) != Tok::KwInterface => {
                    annotations.push(self.parse_annotation());
                }
                // `default:` and `default ->` belong to switch statements.
                Tok::KwDefault if matches!(self.peek_nth(1), Tok::Colon | Tok::Arrow) => break,
                t if t.is_modifier() => {
                    flags |= modifier_flag(t);
                    self.bump();
                }
                _ => break,
            }
        }
        let span = if flags.is_empty() && annotations.is_empty() {
            Span::empty_at(start as usize)
        } else {
            self.finish(start)
        };
        ModifierList {
            flags,
            annotations: self.arena.list_annotations(annotations),
            span,
        }
    }

    fn parse_annotation(&mut self) -> Annotation {
        let start = self.start();
        self.bump(); // @
        let name = self.parse_qualified_name();
        let mut args = Vec::new();
        if self.eat(Tok::LParen) {
            while !self.at(Tok::RParen) && !self.at_eof() {
                if self.at(Tok::At) {
                    self.skip_annotation();
                } else {
                    args.push(self.parse_element_value());
                }
                if !self.eat(Tok::Comma) {
                    break;
                }
            }
            self.expect_sync(Tok::RParen, &[]);
        }
        Annotation {
            name,
            args: self.arena.list_exprs(args),
            span: self.finish(start),
        }
    }

    fn parse_element_value(&mut self) -> ExprId {
        if self.at(Tok::LBrace) {
            self.parse_array_init()
        } else {
            self.parse_expr()
        }
    }

    /// Steps over an annotation in a position the AST does not model
    /// (type-use annotations, nested annotation values).
    pub(super) fn skip_annotation(&mut self) {
        self.bump(); // @
        self.parse_qualified_name();
        if self.at(Tok::LParen) {
            self.skip_group();
        }
    }

    // ---- type declarations ----

    pub(super) fn parse_type_decl(
        &mut self,
        start: u32,
        doc: Option<Span>,
        modifiers: ModifierList,
    ) -> TypeDeclId {
        let kind = match self.bump() {
            Tok::KwInterface => TypeKind::Interface,
            Tok::KwEnum => TypeKind::Enum,
            Tok::At => {
                self.bump(); // interface
                TypeKind::Annotation
            }
            _ => TypeKind::Class,
        };
        let name = self.expect_ident("type name");
        let type_params = self.parse_type_params();

        let extends = if self.eat(Tok::KwExtends) {
            if kind == TypeKind::Interface {
                self.parse_type_list()
            } else {
                let t = self.parse_type(false);
                self.arena.list_types([t])
            }
        } else {
            ListRef::EMPTY
        };
        let implements = if self.eat(Tok::KwImplements) {
            self.parse_type_list()
        } else {
            ListRef::EMPTY
        };

        self.type_names.push(name.sym);
        let (enum_constants, members) = self.parse_type_body(kind);
        self.type_names.pop();

        self.arena.alloc_type_decl(
            TypeDecl {
                doc,
                modifiers,
                kind,
                name,
                type_params,
                extends,
                implements,
                enum_constants,
                members,
                is_anonymous: false,
            },
            self.finish(start),
        )
    }

    /// Body of an anonymous class (`new T() { ... }` or an enum constant
    /// body). The name is filled in after parsing.
    pub(super) fn parse_anonymous_body(&mut self, name_pos: Span) -> TypeDeclId {
        let start = self.start();
        let unnamed = self.interner.intern("");
        self.type_names.push(unnamed);
        let (_, members) = self.parse_type_body(TypeKind::Class);
        self.type_names.pop();

        self.arena.alloc_type_decl(
            TypeDecl {
                doc: None,
                modifiers: ModifierList {
                    span: Span::empty_at(start as usize),
                    ..ModifierList::default()
                },
                kind: TypeKind::Class,
                name: IdentName {
                    sym: unnamed,
                    pos: name_pos,
                },
                type_params: ListRef::EMPTY,
                extends: ListRef::EMPTY,
                implements: ListRef::EMPTY,
                enum_constants: ListRef::EMPTY,
                members,
                is_anonymous: true,
            },
            self.finish(start),
        )
    }

    fn parse_type_body(&mut self, kind: TypeKind) -> (ListRef<EnumConstant>, ListRef<Member>) {
        if !self.expect_sync(Tok::LBrace, &[]) {
            return (ListRef::EMPTY, ListRef::EMPTY);
        }
        let constants = if kind == TypeKind::Enum {
            self.parse_enum_constants()
        } else {
            ListRef::EMPTY
        };

        let mut members = Vec::new();
        while !self.at(Tok::RBrace) && !self.at_eof() {
            let before = self.pos;
            if self.eat(Tok::Semi) {
                continue;
            }
            if let Some(m) = self.parse_member() {
                members.push(m);
            }
            if self.pos == before {
                self.skip_unexpected("member declaration");
            }
        }
        self.expect(Tok::RBrace);
        (constants, self.arena.list_members(members))
    }

    fn parse_enum_constants(&mut self) -> ListRef<EnumConstant> {
        let mut out = Vec::new();
        while !matches!(self.peek(), Tok::Semi | Tok::RBrace | Tok::Eof) {
            let start = self.start();
            let annotations = self.parse_modifiers().annotations;
            let Some(name) = self.ident_name() else {
                break;
            };
            let args = if self.at(Tok::LParen) {
                self.parse_args()
            } else {
                ListRef::EMPTY
            };
            let body = if self.at(Tok::LBrace) {
                Some(self.parse_anonymous_body(name.pos))
            } else {
                None
            };
            out.push(EnumConstant {
                annotations,
                name,
                args,
                body,
                span: self.finish(start),
            });
            if !self.eat(Tok::Comma) {
                break;
            }
        }
        self.eat(Tok::Semi);
        self.arena.list_enum_constants(out)
    }

    // ---- members ----

    fn parse_member(&mut self) -> Option<Member> {
        self.nested(Construct::Stmt, Self::member_inner, |_| None)
    }

    fn member_inner(&mut self) -> Option<Member> {
        let doc = self.doc_here();
        let start = self.start();

        if self.at(Tok::LBrace) {
            let body = self.parse_block();
            return Some(Member::Initializer {
                is_static: false,
                body,
            });
        }
        if self.at(Tok::KwStatic) && self.peek_nth(1) == Tok::LBrace {
            self.bump();
            let body = self.parse_block();
            return Some(Member::Initializer {
                is_static: true,
                body,
            });
        }

        let mods = self.parse_modifiers();
        if self.at_type_keyword() {
            return Some(Member::Type(self.parse_type_decl(start, doc, mods)));
        }
        self.parse_member_after_modifiers(start, doc, mods)
    }

    fn at_constructor_name(&self) -> bool {
        match (self.peek(), self.type_names.last()) {
            (Tok::Ident(s), Some(&owner)) => {
                self.peek_nth(1) == Tok::LParen && self.interner.resolve(owner) == s
            }
            _ => false,
        }
    }

    /// Method, constructor or field after its modifiers.
    fn parse_member_after_modifiers(
        &mut self,
        start: u32,
        doc: Option<Span>,
        mods: ModifierList,
    ) -> Option<Member> {
        let type_params = self.parse_type_params();

        if self.at_constructor_name() {
            let name = self.expect_ident("constructor name");
            let m = self.parse_method_rest(start, doc, mods, type_params, None, name, true);
            return Some(Member::Method(m));
        }
        if matches!(self.peek(), Tok::Ident(_)) && self.peek_nth(1) == Tok::LParen {
            let name = self.expect_ident("method name");
            self.report_at(
                self.pos - 1,
                name.pos,
                format!(
                    "method `{}` has no return type",
                    self.interner.resolve(name.sym)
                ),
                Recovery::InsertedToken("void"),
            );
            let m = self.parse_method_rest(start, doc, mods, type_params, None, name, false);
            return Some(Member::Method(m));
        }

        let typ = self.parse_type(true);
        if matches!(self.arena.types[typ], Type::Bad) {
            return None;
        }
        let name = self.expect_ident("member name");
        if self.at(Tok::LParen) {
            let m = self.parse_method_rest(start, doc, mods, type_params, Some(typ), name, false);
            return Some(Member::Method(m));
        }

        let declarators = self.parse_declarators(name);
        self.expect_sync(Tok::Semi, &[]);
        let field = self.arena.alloc_field(
            FieldDecl {
                doc,
                modifiers: mods,
                typ,
                declarators,
            },
            self.finish(start),
        );
        Some(Member::Field(field))
    }

    #[allow(clippy::too_many_arguments)]
    fn parse_method_rest(
        &mut self,
        start: u32,
        doc: Option<Span>,
        modifiers: ModifierList,
        type_params: ListRef<TypeParam>,
        ret: Option<TypeId>,
        name: IdentName,
        is_constructor: bool,
    ) -> MethodDeclId {
        let params = self.parse_params();
        // Legacy `int f()[]` form.
        while self.at(Tok::LBrack) && self.peek_nth(1) == Tok::RBrack {
            self.bump();
            self.bump();
        }
        let throws = if self.eat(Tok::KwThrows) {
            self.parse_type_list()
        } else {
            ListRef::EMPTY
        };
        let default_value = if self.eat(Tok::KwDefault) {
            Some(self.parse_element_value())
        } else {
            None
        };
        let body = if self.at(Tok::LBrace) {
            Some(self.parse_block())
        } else {
            if self.expect_sync(Tok::Semi, &[Tok::LBrace]) {
                None
            } else if self.at(Tok::LBrace) {
                Some(self.parse_block())
            } else {
                None
            }
        };

        self.arena.alloc_method(
            MethodDecl {
                doc,
                modifiers,
                type_params,
                ret,
                name,
                params,
                throws,
                default_value,
                body,
                is_constructor,
            },
            self.finish(start),
        )
    }

    fn parse_params(&mut self) -> ListRef<Param> {
        if !self.expect(Tok::LParen) {
            return ListRef::EMPTY;
        }
        let mut params = Vec::new();
        while !self.at(Tok::RParen) && !self.at_eof() {
            params.push(self.parse_param());
            if !self.eat(Tok::Comma) {
                break;
            }
        }
        self.expect_sync(Tok::RParen, &[Tok::LBrace, Tok::Semi]);
        self.arena.list_params(params)
    }

    pub(super) fn parse_param(&mut self) -> Param {
        let modifiers = self.parse_modifiers();
        let typ = self.parse_type(false);
        let varargs = self.eat(Tok::Ellipsis);
        let name = self.expect_ident("parameter name");
        while self.at(Tok::LBrack) && self.peek_nth(1) == Tok::RBrack {
            self.bump();
            self.bump();
        }
        Param {
            modifiers,
            typ: Some(typ),
            varargs,
            name,
        }
    }

    /// `a [= init] {, b [= init]}` after the first name has been read.
    pub(super) fn parse_declarators(&mut self, first: IdentName) -> ListRef<VarDeclarator> {
        let mut out = vec![self.parse_declarator_rest(first)];
        while self.eat(Tok::Comma) {
            let name = self.expect_ident("variable name");
            out.push(self.parse_declarator_rest(name));
        }
        self.arena.list_declarators(out)
    }

    fn parse_declarator_rest(&mut self, name: IdentName) -> VarDeclarator {
        let mut dims = 0u8;
        while self.at(Tok::LBrack) && self.peek_nth(1) == Tok::RBrack {
            self.bump();
            self.bump();
            dims = dims.saturating_add(1);
        }
        let init = if self.eat(Tok::Assign) {
            Some(if self.at(Tok::LBrace) {
                self.parse_array_init()
            } else {
                self.parse_expr()
            })
        } else {
            None
        };
        VarDeclarator { name, dims, init }
    }
}
