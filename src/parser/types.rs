//! Types, type arguments and type parameters.

use crate::ast::{ListRef, PrimitiveType, Type, TypeId, TypeParam, TypeSegment};
use crate::lexer::Tok;

use super::{Construct, ParsedFile, Parser};

pub(super) fn primitive(tok: Tok<'_>) -> Option<PrimitiveType> {
    Some(match tok {
        Tok::KwBoolean => PrimitiveType::Boolean,
        Tok::KwByte => PrimitiveType::Byte,
        Tok::KwChar => PrimitiveType::Char,
        Tok::KwShort => PrimitiveType::Short,
        Tok::KwInt => PrimitiveType::Int,
        Tok::KwLong => PrimitiveType::Long,
        Tok::KwFloat => PrimitiveType::Float,
        Tok::KwDouble => PrimitiveType::Double,
        _ => return None,
    })
}

impl<'src> Parser<'src> {
    /// `Type` including trailing `[]` dimensions. `void` is accepted when
    /// `allow_void` is set (method results).
    pub(super) fn parse_type(&mut self, allow_void: bool) -> TypeId {
        let start = self.start();
        self.nested(
            Construct::Type,
            |p| p.type_inner(start, allow_void),
            |p| p.arena.alloc_type(Type::Bad, p.finish(start)),
        )
    }

    fn type_inner(&mut self, start: u32, allow_void: bool) -> TypeId {
        let base = if let Some(p) = primitive(self.peek()) {
            self.bump();
            self.arena.alloc_type(Type::Primitive(p), self.finish(start))
        } else if allow_void && self.at(Tok::KwVoid) {
            self.bump();
            return self.arena.alloc_type(Type::Void, self.finish(start));
        } else if self.at_ident() {
            self.parse_class_type()
        } else {
            let found = self.peek();
            self.error_here(
                format!("expected type, found {found}"),
                crate::error::Recovery::Resynchronized,
            );
            return self.arena.alloc_type(Type::Bad, self.finish(start));
        };
        self.parse_dims(start, base)
    }

    /// Wraps `base` in one `Type::Array` per `[]` pair.
    pub(super) fn parse_dims(&mut self, start: u32, mut base: TypeId) -> TypeId {
        while self.at(Tok::LBrack) && self.peek_nth(1) == Tok::RBrack {
            self.bump();
            self.bump();
            base = self.arena.alloc_type(Type::Array(base), self.finish(start));
        }
        base
    }

    /// `A<T>.B<U>` without dimensions. The current token must be an identifier.
    pub(super) fn parse_class_type(&mut self) -> TypeId {
        let start = self.start();
        let mut segs = Vec::with_capacity(2);
        loop {
            let name = self.expect_ident("type name");
            let args = if self.at(Tok::Lt) {
                self.parse_type_args()
            } else {
                ListRef::EMPTY
            };
            segs.push(TypeSegment { name, args });
            if self.at(Tok::Dot) && matches!(self.peek_nth(1), Tok::Ident(_)) {
                self.bump();
            } else {
                break;
            }
        }
        let segs = self.arena.list_type_segments(segs);
        self.arena.alloc_type(Type::Named(segs), self.finish(start))
    }

    /// `<...>` argument list; `<>` (diamond) yields an empty list.
    pub(super) fn parse_type_args(&mut self) -> ListRef<TypeId> {
        self.bump(); // <
        let mut args = Vec::new();
        if self.split_gt() {
            return self.arena.list_types(args);
        }
        loop {
            args.push(self.parse_type_arg());
            if !self.eat(Tok::Comma) {
                break;
            }
        }
        if !self.split_gt() {
            let found = self.peek();
            self.error_here(
                format!("expected `>`, found {found}"),
                crate::error::Recovery::InsertedToken(">"),
            );
        }
        self.arena.list_types(args)
    }

    fn parse_type_arg(&mut self) -> TypeId {
        let start = self.start();
        while self.at(Tok::At) {
            self.skip_annotation();
        }
        if !self.eat(Tok::Question) {
            return self.parse_type(false);
        }
        let (bound, is_super) = if self.eat(Tok::KwExtends) {
            (Some(self.parse_type(false)), false)
        } else if self.eat(Tok::KwSuper) {
            (Some(self.parse_type(false)), true)
        } else {
            (None, false)
        };
        self.arena
            .alloc_type(Type::Wildcard { bound, is_super }, self.finish(start))
    }

    /// `<T extends A & B, U>`
    pub(super) fn parse_type_params(&mut self) -> ListRef<TypeParam> {
        if !self.at(Tok::Lt) {
            return ListRef::EMPTY;
        }
        self.bump();
        let mut params = Vec::new();
        loop {
            while self.at(Tok::At) {
                self.skip_annotation();
            }
            let name = self.expect_ident("type parameter");
            let mut bounds = Vec::new();
            if self.eat(Tok::KwExtends) {
                loop {
                    bounds.push(self.parse_type(false));
                    if !self.eat(Tok::Amp) {
                        break;
                    }
                }
            }
            let bounds = self.arena.list_types(bounds);
            params.push(TypeParam { name, bounds });
            if !self.eat(Tok::Comma) {
                break;
            }
        }
        if !self.split_gt() {
            let found = self.peek();
            self.error_here(
                format!("expected `>`, found {found}"),
                crate::error::Recovery::InsertedToken(">"),
            );
        }
        self.arena.list_type_params(params)
    }

    /// Comma-separated list of class types (`extends`, `implements`, `throws`).
    pub(super) fn parse_type_list(&mut self) -> ListRef<TypeId> {
        let mut out = Vec::new();
        loop {
            out.push(self.parse_type(false));
            if !self.eat(Tok::Comma) {
                break;
            }
        }
        self.arena.list_types(out)
    }

    // ---- side-effect-free lookahead ----

    /// Scans a type starting at token `idx` without consuming anything.
    /// Returns the index just past it.
    pub(super) fn scan_type(&self, mut idx: usize) -> Option<usize> {
        if primitive(self.tok_at(idx)).is_some() {
            idx += 1;
        } else {
            loop {
                if !matches!(self.tok_at(idx), Tok::Ident(_)) {
                    return None;
                }
                idx += 1;
                if self.tok_at(idx) == Tok::Lt {
                    idx = self.scan_type_args(idx)?;
                }
                if self.tok_at(idx) == Tok::Dot && matches!(self.tok_at(idx + 1), Tok::Ident(_)) {
                    idx += 1;
                } else {
                    break;
                }
            }
        }
        while self.tok_at(idx) == Tok::LBrack && self.tok_at(idx + 1) == Tok::RBrack {
            idx += 2;
        }
        Some(idx)
    }

    /// Scans a balanced `<...>` starting at `idx`. Closing tokens `>>` and
    /// `>>>` count for two and three levels.
    fn scan_type_args(&self, mut idx: usize) -> Option<usize> {
        let mut depth: i32 = 0;
        loop {
            let t = self.tok_at(idx);
            match t {
                Tok::Lt => depth += 1,
                Tok::Gt => depth -= 1,
                Tok::Shr => depth -= 2,
                Tok::UShr => depth -= 3,
                Tok::Ident(_)
                | Tok::Dot
                | Tok::Comma
                | Tok::Question
                | Tok::KwExtends
                | Tok::KwSuper
                | Tok::Amp
                | Tok::LBrack
                | Tok::RBrack => {}
                t if primitive(t).is_some() => {}
                _ => return None,
            }
            idx += 1;
            if depth <= 0 {
                // A `>>` that closes more levels than were opened belongs to
                // an enclosing list; only the outermost scan may see that.
                return (depth == 0).then_some(idx);
            }
        }
    }

    /// Lookahead: does a local variable declaration start here?
    pub(super) fn looks_like_local_var(&self) -> bool {
        match self.scan_type(self.pos) {
            Some(end) => matches!(self.tok_at(end), Tok::Ident(_)),
            None => false,
        }
    }
}

/// Renders a type node back to Java-like text.
pub(super) fn render(f: &ParsedFile, id: TypeId) -> String {
    let mut out = String::new();
    render_into(f, id, &mut out);
    out
}

fn render_into(f: &ParsedFile, id: TypeId, out: &mut String) {
    match f.arena.types[id] {
        Type::Primitive(p) => out.push_str(p.as_str()),
        Type::Void => out.push_str("void"),
        Type::Bad => out.push_str("<error>"),
        Type::Array(elem) => {
            render_into(f, elem, out);
            out.push_str("[]");
        }
        Type::Wildcard { bound, is_super } => {
            out.push('?');
            if let Some(b) = bound {
                out.push_str(if is_super { " super " } else { " extends " });
                render_into(f, b, out);
            }
        }
        Type::Named(segs) => {
            for (i, seg) in f.arena.type_segments(segs).iter().enumerate() {
                if i > 0 {
                    out.push('.');
                }
                out.push_str(f.ident(seg.name));
                if !seg.args.is_empty() {
                    out.push('<');
                    for (j, arg) in f.arena.types_list(seg.args).iter().enumerate() {
                        if j > 0 {
                            out.push_str(", ");
                        }
                        render_into(f, *arg, out);
                    }
                    out.push('>');
                }
            }
        }
    }
}

/// Dotted class name with generic arguments dropped (`java.util.List`).
pub(super) fn erased(f: &ParsedFile, id: TypeId) -> String {
    match f.arena.types[id] {
        Type::Named(segs) => {
            let names: Vec<&str> = f
                .arena
                .type_segments(segs)
                .iter()
                .map(|s| f.ident(s.name))
                .collect();
            names.join(".")
        }
        Type::Array(elem) => erased(f, elem) + "[]",
        _ => render(f, id),
    }
}

/// Last segment of a class type plus array dimensions (`String[]`).
pub(super) fn simple_key(f: &ParsedFile, id: TypeId) -> String {
    match f.arena.types[id] {
        Type::Named(segs) => f
            .arena
            .type_segments(segs)
            .last()
            .map_or_else(String::new, |s| f.ident(s.name).to_string()),
        Type::Array(elem) => simple_key(f, elem) + "[]",
        _ => render(f, id),
    }
}
