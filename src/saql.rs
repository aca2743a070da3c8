//! A small structural query language over the symbol graph.
//!
//! ```text
//! SELECT classes FROM project WHERE isSubclassOf(Point) AND isAbstract
//! SELECT methods FROM class:Account WHERE isSynchronized
//! SELECT methods FROM file:Account.java, file:Point.java
//! ```
//!
//! Keywords are case-insensitive; predicate names are not.

use std::fmt;

use logos::Logos;
use thiserror::Error;

use crate::error::FileId;
use crate::symbols::{Access, ClassId, ClassSymbol, MethodSymbol, SymbolGraph};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SaqlError {
    #[error("invalid query: {0}")]
    Syntax(String),
    #[error("unsupported query type: {0}")]
    Unsupported(String),
    #[error("mixed FROM types are not supported ({0} and {1})")]
    MixedSources(&'static str, &'static str),
    #[error("query not applicable on these types: {target} from {from}")]
    NotApplicable {
        target: &'static str,
        from: &'static str,
    },
    #[error("unknown predicate `{name}` for {target}")]
    UnknownPredicate { name: String, target: &'static str },
    #[error("unknown source `{0}`")]
    UnknownSource(String),
}

// =============================================================================
// Tokens
// =============================================================================

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
#[rustfmt::skip]
enum QTok<'q> {
    #[token("SELECT", ignore(ascii_case))] Select,
    #[token("FROM", ignore(ascii_case))] From,
    #[token("WHERE", ignore(ascii_case))] Where,
    #[token("AND", ignore(ascii_case))] And,
    #[token(":")] Colon,
    #[token(",")] Comma,
    #[token("(")] LParen,
    #[token(")")] RParen,
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$./\-]*")] Word(&'q str),
    #[regex(r#"'[^']*'|"[^"]*""#, |lex| { let s = lex.slice(); &s[1..s.len() - 1] })]
    Quoted(&'q str),
}

impl fmt::Display for QTok<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QTok::Select => f.write_str("SELECT"),
            QTok::From => f.write_str("FROM"),
            QTok::Where => f.write_str("WHERE"),
            QTok::And => f.write_str("AND"),
            QTok::Colon => f.write_str("`:`"),
            QTok::Comma => f.write_str("`,`"),
            QTok::LParen => f.write_str("`(`"),
            QTok::RParen => f.write_str("`)`"),
            QTok::Word(w) => write!(f, "`{w}`"),
            QTok::Quoted(q) => write!(f, "'{q}'"),
        }
    }
}

// =============================================================================
// Query model
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Classes,
    Methods,
}

impl Target {
    fn as_str(self) -> &'static str {
        match self {
            Target::Classes => "classes",
            Target::Methods => "methods",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Project,
    /// File name, file stem, or `package.Stem`.
    File(String),
    /// Qualified or simple class name.
    Class(String),
}

impl Source {
    fn kind(&self) -> &'static str {
        match self {
            Source::Project => "project",
            Source::File(_) => "file",
            Source::Class(_) => "class",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Project => f.write_str("project"),
            Source::File(name) => write!(f, "file:{name}"),
            Source::Class(name) => write!(f, "class:{name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    IsSubclassOf(String),
    Implements(String),
    IsAnonymous,
    IsInterface,
    IsAbstract,
    IsPrivate,
    IsProtected,
    IsPackage,
    IsPublic,
    IsStatic,
    IsSynchronized,
    IsConstructor,
    IsOverride,
}

impl Predicate {
    fn parse(name: &str, arg: Option<String>, target: Target) -> Result<Self, SaqlError> {
        let unknown = || SaqlError::UnknownPredicate {
            name: name.to_string(),
            target: target.as_str(),
        };
        let p = match (target, name, arg) {
            (Target::Classes, "isSubClass" | "isSubclassOf", Some(a)) => Predicate::IsSubclassOf(a),
            (Target::Classes, "implements", Some(a)) => Predicate::Implements(a),
            (Target::Classes, "isAnonymous", None) => Predicate::IsAnonymous,
            (Target::Classes, "isInterface", None) => Predicate::IsInterface,
            (_, "isAbstract", None) => Predicate::IsAbstract,
            (Target::Methods, "isPrivate", None) => Predicate::IsPrivate,
            (Target::Methods, "isProtected", None) => Predicate::IsProtected,
            (Target::Methods, "isPackage", None) => Predicate::IsPackage,
            (Target::Methods, "isPublic", None) => Predicate::IsPublic,
            (Target::Methods, "isStatic", None) => Predicate::IsStatic,
            (Target::Methods, "isSynchronized", None) => Predicate::IsSynchronized,
            (Target::Methods, "isConstructor", None) => Predicate::IsConstructor,
            (Target::Methods, "isOverride", None) => Predicate::IsOverride,
            _ => return Err(unknown()),
        };
        Ok(p)
    }

    fn matches_class(&self, g: &SymbolGraph, c: &ClassSymbol) -> bool {
        match self {
            Predicate::IsSubclassOf(name) => derives_from(g, c.id, name, false),
            Predicate::Implements(name) => derives_from(g, c.id, name, true),
            Predicate::IsAnonymous => c.is_anonymous,
            Predicate::IsInterface => c.is_interface(),
            Predicate::IsAbstract => c.is_abstract(),
            _ => false,
        }
    }

    fn matches_method(&self, m: &MethodSymbol) -> bool {
        match self {
            Predicate::IsAbstract => m.is_abstract,
            Predicate::IsPrivate => m.access == Access::Private,
            Predicate::IsProtected => m.access == Access::Protected,
            Predicate::IsPackage => m.access == Access::Package,
            Predicate::IsPublic => m.access == Access::Public,
            Predicate::IsStatic => m.is_static(),
            Predicate::IsSynchronized => m.is_synchronized,
            Predicate::IsConstructor => m.is_constructor,
            Predicate::IsOverride => m.is_override(),
            _ => false,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Predicate::IsSubclassOf(arg) => return write!(f, "isSubclassOf({arg})"),
            Predicate::Implements(arg) => return write!(f, "implements({arg})"),
            Predicate::IsAnonymous => "isAnonymous",
            Predicate::IsInterface => "isInterface",
            Predicate::IsAbstract => "isAbstract",
            Predicate::IsPrivate => "isPrivate",
            Predicate::IsProtected => "isProtected",
            Predicate::IsPackage => "isPackage",
            Predicate::IsPublic => "isPublic",
            Predicate::IsStatic => "isStatic",
            Predicate::IsSynchronized => "isSynchronized",
            Predicate::IsConstructor => "isConstructor",
            Predicate::IsOverride => "isOverride",
        };
        f.write_str(name)
    }
}

/// Whether `class` or one of its ancestors names `target` as a supertype.
/// Unresolved references match by name, so external bases such as
/// `Thread` can still be queried.
fn derives_from(g: &SymbolGraph, class: ClassId, target: &str, interfaces_only: bool) -> bool {
    let names_target = |name: &str| name == target || name.rsplit('.').next() == Some(target);
    std::iter::once(class).chain(g.ancestors(class)).any(|id| {
        let c = g.class(id);
        let superclass = if interfaces_only {
            None
        } else {
            c.superclass.as_ref()
        };
        superclass.into_iter().chain(c.interfaces.iter()).any(|r| {
            names_target(&r.name)
                || r.resolved
                    .is_some_and(|s| names_target(&g.class(s).qualified_name))
        })
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaqlQuery {
    pub target: Target,
    pub sources: Vec<Source>,
    pub conditions: Vec<Predicate>,
}

impl fmt::Display for SaqlQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT {} FROM ", self.target.as_str())?;
        for (i, s) in self.sources.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{s}")?;
        }
        for (i, c) in self.conditions.iter().enumerate() {
            f.write_str(if i == 0 { " WHERE " } else { " AND " })?;
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for SaqlQuery {
    type Err = SaqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_query(s)
    }
}

/// Rows returned by [`SaqlQuery::run`].
#[derive(Debug, Clone)]
pub enum QueryRows<'g> {
    Classes(Vec<&'g ClassSymbol>),
    Methods(Vec<&'g MethodSymbol>),
}

impl QueryRows<'_> {
    pub fn len(&self) -> usize {
        match self {
            QueryRows::Classes(c) => c.len(),
            QueryRows::Methods(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Qualified class names, or `Class.method` for methods.
    pub fn names(&self, g: &SymbolGraph) -> Vec<String> {
        match self {
            QueryRows::Classes(c) => c.iter().map(|c| c.qualified_name.clone()).collect(),
            QueryRows::Methods(m) => m
                .iter()
                .map(|m| match m.owner {
                    Some(o) => format!("{}.{}", g.class(o).qualified_name, m.name),
                    None => m.name.clone(),
                })
                .collect(),
        }
    }
}

impl SaqlQuery {
    /// Kind shared by every source; mixing kinds is an error.
    pub fn source_kind(&self) -> Result<&'static str, SaqlError> {
        let mut kind: Option<&'static str> = None;
        for s in &self.sources {
            match kind {
                Some(k) if k != s.kind() => return Err(SaqlError::MixedSources(k, s.kind())),
                _ => kind = Some(s.kind()),
            }
        }
        kind.ok_or_else(|| SaqlError::Syntax("missing FROM source".into()))
    }

    pub fn is_project_level(&self) -> bool {
        matches!(self.source_kind(), Ok("project"))
    }

    pub fn run<'g>(&self, g: &'g SymbolGraph) -> Result<QueryRows<'g>, SaqlError> {
        let kind = self.source_kind()?;
        match (self.target, kind) {
            (Target::Classes, "class") => Err(SaqlError::NotApplicable {
                target: "classes",
                from: "class",
            }),
            (Target::Classes, _) => {
                let mut rows: Vec<&ClassSymbol> = Vec::new();
                for s in &self.sources {
                    let files = files_of(g, s)?;
                    rows.extend(g.classes().filter(|c| {
                        files.as_ref().map_or(true, |fs| fs.contains(&c.file))
                    }));
                }
                dedup_by_id(&mut rows, |c| c.id.index());
                rows.retain(|c| self.conditions.iter().all(|p| p.matches_class(g, c)));
                Ok(QueryRows::Classes(rows))
            }
            (Target::Methods, _) => {
                let mut rows: Vec<&MethodSymbol> = Vec::new();
                for s in &self.sources {
                    if let Source::Class(name) = s {
                        let class = g
                            .find_class(name)
                            .map_err(|_| SaqlError::UnknownSource(s.to_string()))?;
                        rows.extend(g.methods_of(class.id));
                        continue;
                    }
                    let files = files_of(g, s)?;
                    rows.extend(g.methods().filter(|m| {
                        files.as_ref().map_or(true, |fs| fs.contains(&m.file))
                    }));
                }
                dedup_by_id(&mut rows, |m| m.id.index());
                rows.retain(|m| self.conditions.iter().all(|p| p.matches_method(m)));
                Ok(QueryRows::Methods(rows))
            }
        }
    }
}

/// Files selected by a `project` or `file:` source; `None` means all.
fn files_of(g: &SymbolGraph, s: &Source) -> Result<Option<Vec<FileId>>, SaqlError> {
    let Source::File(name) = s else {
        return Ok(None);
    };
    let hits: Vec<_> = g
        .files()
        .iter()
        .filter(|f| {
            let stem = f.name.rsplit('/').next().unwrap_or(&f.name);
            let stem = stem.strip_suffix(".java").unwrap_or(stem);
            f.name == *name
                || stem == name
                || f.package.as_ref().is_some_and(|p| format!("{p}.{stem}") == *name)
        })
        .map(|f| f.file)
        .collect();
    if hits.is_empty() {
        return Err(SaqlError::UnknownSource(s.to_string()));
    }
    Ok(Some(hits))
}

fn dedup_by_id<T>(rows: &mut Vec<&T>, key: impl Fn(&T) -> usize) {
    rows.sort_by_key(|r| key(r));
    rows.dedup_by_key(|r| key(r));
}

// =============================================================================
// Parser
// =============================================================================

struct QueryParser<'q> {
    toks: Vec<QTok<'q>>,
    pos: usize,
}

pub fn parse_query(text: &str) -> Result<SaqlQuery, SaqlError> {
    let mut toks = Vec::new();
    let mut lex = QTok::lexer(text);
    while let Some(t) = lex.next() {
        match t {
            Ok(t) => toks.push(t),
            Err(()) => {
                return Err(SaqlError::Syntax(format!(
                    "unexpected `{}` at offset {}",
                    lex.slice(),
                    lex.span().start
                )))
            }
        }
    }
    QueryParser { toks, pos: 0 }.query()
}

impl<'q> QueryParser<'q> {
    fn peek(&self) -> Option<QTok<'q>> {
        self.toks.get(self.pos).copied()
    }

    fn eat(&mut self, want: QTok<'_>) -> bool {
        if self.peek() == Some(want) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, want: QTok<'_>) -> Result<(), SaqlError> {
        if self.eat(want) {
            return Ok(());
        }
        Err(self.unexpected(&want.to_string()))
    }

    fn unexpected(&self, expected: &str) -> SaqlError {
        match self.peek() {
            Some(t) => SaqlError::Syntax(format!("expected {expected}, found {t}")),
            None => SaqlError::Syntax(format!("expected {expected}, found end of query")),
        }
    }

    fn word(&mut self, what: &str) -> Result<&'q str, SaqlError> {
        match self.peek() {
            Some(QTok::Word(w)) => {
                self.pos += 1;
                Ok(w)
            }
            _ => Err(self.unexpected(what)),
        }
    }

    fn query(mut self) -> Result<SaqlQuery, SaqlError> {
        self.expect(QTok::Select)?;
        let target = match self.word("`classes` or `methods`")? {
            "classes" => Target::Classes,
            "methods" => Target::Methods,
            other => return Err(SaqlError::Unsupported(other.into())),
        };

        self.expect(QTok::From)?;
        let mut sources = vec![self.source()?];
        while self.eat(QTok::Comma) {
            sources.push(self.source()?);
        }

        let mut conditions = Vec::new();
        if self.eat(QTok::Where) {
            loop {
                conditions.push(self.condition(target)?);
                if !self.eat(QTok::And) {
                    break;
                }
            }
        }
        if self.peek().is_some() {
            return Err(self.unexpected("end of query"));
        }

        let q = SaqlQuery {
            target,
            sources,
            conditions,
        };
        q.source_kind()?;
        Ok(q)
    }

    fn source(&mut self) -> Result<Source, SaqlError> {
        let kind = self.word("source")?;
        match kind {
            "project" => Ok(Source::Project),
            "file" | "class" => {
                self.expect(QTok::Colon)?;
                let name = self.name()?;
                Ok(if kind == "file" {
                    Source::File(name)
                } else {
                    Source::Class(name)
                })
            }
            other => Err(SaqlError::UnknownSource(other.to_string())),
        }
    }

    /// A bare word or a quoted string.
    fn name(&mut self) -> Result<String, SaqlError> {
        match self.peek() {
            Some(QTok::Word(w) | QTok::Quoted(w)) => {
                self.pos += 1;
                Ok(w.to_string())
            }
            _ => Err(self.unexpected("name")),
        }
    }

    fn condition(&mut self, target: Target) -> Result<Predicate, SaqlError> {
        let name = self.word("predicate")?;
        let arg = if self.eat(QTok::LParen) {
            // `class:` prefixes are accepted and dropped.
            let prefixed = self.peek() == Some(QTok::Word("class"))
                && self.toks.get(self.pos + 1) == Some(&QTok::Colon);
            if prefixed {
                self.pos += 2;
            }
            let a = self.name()?;
            self.expect(QTok::RParen)?;
            Some(a)
        } else {
            None
        };
        Predicate::parse(name, arg, target)
    }
}
