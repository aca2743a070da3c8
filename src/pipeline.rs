//! End-to-end run: parse every source (in parallel when configured), then
//! index them on the calling thread.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::InspectorConfig;
use crate::diagnostics::{render_diag, Diagnostics};
use crate::error::{Diag, FileId};
use crate::indexer::Indexer;
use crate::parser::{parse_file, ParsedFile};
use crate::symbols::SymbolGraph;

/// Everything one run produced.
#[derive(Debug)]
pub struct Inspection {
    /// Parsed files in input order; `files[i].file == FileId(i)`.
    pub files: Vec<ParsedFile>,
    pub graph: SymbolGraph,
    /// Lex, parse and index diagnostics of every file.
    pub diagnostics: Diagnostics,
}

impl Inspection {
    pub fn file(&self, id: FileId) -> Option<&ParsedFile> {
        self.files.get(id.index())
    }

    pub fn file_named(&self, name: &str) -> Option<&ParsedFile> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn diagnostics_for(&self, id: FileId) -> Vec<&Diag> {
        self.diagnostics.for_file(id).collect()
    }

    /// `name:line:col: severity[kind]: message` lines, sorted by file and
    /// offset.
    pub fn render_diagnostics(&self) -> Vec<String> {
        self.diagnostics
            .sorted()
            .into_iter()
            .filter_map(|d| {
                let f = self.file(d.file)?;
                Some(render_diag(d, &f.name, &f.source, &f.lines))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Inspector {
    config: InspectorConfig,
}

impl Inspector {
    pub fn new(config: InspectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    /// Parses and indexes `(name, text)` pairs. File ids follow input order.
    pub fn inspect<N, S>(&self, sources: &[(N, S)]) -> Inspection
    where
        N: AsRef<str> + Sync,
        S: AsRef<str> + Sync,
    {
        info!(
            files = sources.len(),
            parallel = self.config.parallel,
            "inspecting sources"
        );

        let parse = |(i, (name, text)): (usize, &(N, S))| {
            parse_file(FileId(i as u32), name.as_ref(), text.as_ref())
        };
        let files: Vec<ParsedFile> = if self.config.parallel {
            sources.par_iter().enumerate().map(parse).collect()
        } else {
            sources.iter().enumerate().map(parse).collect()
        };

        // Fork-join: each parse produced its own list; merge after the join.
        let mut diagnostics = Diagnostics::with_limit(self.config.max_diagnostics_per_file);
        for f in &files {
            diagnostics.extend(f.diags.iter().cloned());
        }

        let mut indexer = Indexer::new(&self.config);
        for f in &files {
            indexer.add_file(f);
        }
        let (graph, index_diags) = indexer.finish();
        diagnostics.merge(index_diags);

        debug!(
            classes = graph.class_count(),
            diagnostics = diagnostics.len(),
            suppressed = diagnostics.suppressed(),
            "inspection complete"
        );
        Inspection {
            files,
            graph,
            diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallel_and_sequential_runs_agree() {
        let sources = [
            ("a.java", "class A extends B { void f() {} }"),
            ("b.java", "class B { void f() {} }"),
            ("c.java", "class C { void g() { int x = ; } }"),
        ];
        let par = Inspector::new(InspectorConfig::default()).inspect(&sources);
        let seq = Inspector::new(InspectorConfig::sequential()).inspect(&sources);

        let names = |i: &Inspection| -> Vec<String> {
            i.graph.classes().map(|c| c.qualified_name.clone()).collect()
        };
        assert_eq!(names(&par), names(&seq));
        assert_eq!(par.diagnostics.len(), seq.diagnostics.len());
        assert_eq!(par.diagnostics_for(FileId(2)).len(), 1);
        assert!(par.diagnostics_for(FileId(0)).is_empty());
    }

    #[test]
    fn rendered_diagnostics_carry_file_and_line() {
        let sources = [("broken.java", "class A {\n  void f() { return 1 }\n}\n")];
        let run = Inspector::new(InspectorConfig::sequential()).inspect(&sources);
        let lines = run.render_diagnostics();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("broken.java:2:"), "{}", lines[0]);
        assert!(lines[0].contains("error[parse]"), "{}", lines[0]);
    }
}
