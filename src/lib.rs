//! Structural inspector for Java sources.
//!
//! - Lexer built on Logos; comments are kept as trivia on the next token.
//! - Hand-written recursive-descent parser that never fails: malformed input
//!   yields a best-effort AST plus diagnostics.
//! - Symbol indexer producing a cross-file [`SymbolGraph`], and read-only
//!   queries over it (including a small query language, [`saql`]).

pub mod ast;
pub mod comment;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod indexer;
pub mod lexer;
pub mod parser;
pub mod pipeline;
pub mod query;
pub mod saql;
pub mod symbols;
pub mod walk;

// Re-exports for convenience
pub use config::InspectorConfig;
pub use diagnostics::Diagnostics;
pub use error::{Diag, DiagKind, FileId, QueryError, Recovery, Severity, Span};
pub use lexer::Lexer;
pub use parser::{parse_file, parse_source, ParsedFile};
pub use pipeline::{Inspection, Inspector};
pub use symbols::{ClassSymbol, FieldSymbol, MethodSymbol, SymbolGraph};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke_inspect_class() {
        let run = Inspector::default().inspect(&[("A.java", "package p;\n\nclass A {}\n")]);
        assert!(run.diagnostics.is_empty());
        assert_eq!(run.graph.find_class("p.A").map(|c| c.name.as_str()), Ok("A"));
    }
}
