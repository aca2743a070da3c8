use java_inspector::{parse_source, Inspector};
use walkdir::WalkDir;

#[test]
fn parses_java_corpus_if_configured() {
    let Some(root) = std::env::var_os("JAVA_INSPECTOR_CORPUS") else {
        eprintln!("JAVA_INSPECTOR_CORPUS not set; skipping corpus test");
        return;
    };

    let root = root.to_string_lossy().to_string();
    let mut sources: Vec<(String, String)> = Vec::new();

    for entry in WalkDir::new(&root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("java") {
            continue;
        }
        // module-info and package-info are not class files.
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
        if stem.contains('-') {
            continue;
        }

        let src = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(_) => continue,
        };

        let f = parse_source(&src);
        if f.has_errors() {
            eprintln!("FAILED: {}", path.display());
            for d in f.diags.iter().take(8) {
                let pos = f.lines.line_col(&src, d.span.start);
                eprintln!("  {}:{} {}[{}]: {}", pos.line, pos.col, d.severity, d.kind, d.message);
            }
            // Stop early so failures are fast to triage.
            panic!(
                "Java corpus parse failed after {} files",
                sources.len() + 1
            );
        }
        sources.push((path.display().to_string(), src));
    }

    let run = Inspector::default().inspect(&sources);
    assert_eq!(run.files.len(), sources.len());
    eprintln!(
        "Parsed {} Java files, {} classes, {} diagnostics.",
        sources.len(),
        run.graph.class_count(),
        run.diagnostics.len()
    );
}
