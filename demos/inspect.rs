use std::env;
use std::path::{Path, PathBuf};

use java_inspector::config::load;
use java_inspector::saql::parse_query;
use java_inspector::{Inspector, InspectorConfig};
use walkdir::WalkDir;

fn java_files(root: &Path) -> Vec<PathBuf> {
    if root.is_file() {
        return vec![root.to_path_buf()];
    }
    let mut out: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("java"))
        .collect();
    out.sort();
    out
}

fn main() {
    let mut args = env::args().skip(1);
    let mut roots = Vec::new();
    let mut query = None;
    let mut config = InspectorConfig::default();

    while let Some(a) = args.next() {
        match a.as_str() {
            "--query" => query = args.next(),
            "--config" => {
                let Some(path) = args.next() else {
                    eprintln!("--config needs a path");
                    std::process::exit(2);
                };
                config = load(Path::new(&path)).unwrap_or_else(|e| {
                    eprintln!("{e}");
                    std::process::exit(2);
                });
            }
            _ => roots.push(PathBuf::from(a)),
        }
    }
    if roots.is_empty() {
        eprintln!(
            "usage: cargo run --example inspect -- <file.java|dir>... [--query SAQL] [--config inspector.toml]"
        );
        std::process::exit(2);
    }

    let mut sources = Vec::new();
    for path in roots.iter().flat_map(|r| java_files(r)) {
        match std::fs::read_to_string(&path) {
            Ok(text) => sources.push((path.display().to_string(), text)),
            Err(e) => eprintln!("skipping {}: {e}", path.display()),
        }
    }

    let run = Inspector::new(config).inspect(&sources);

    for summary in run.graph.files() {
        println!("{}: {summary}", summary.name);
    }
    for class in run.graph.classes() {
        println!("{class}");
        for m in run.graph.methods_of(class.id) {
            println!("  {m} [{} lines]", m.line_count);
        }
    }
    for line in run.render_diagnostics() {
        eprintln!("{line}");
    }

    if let Some(q) = query {
        match parse_query(&q).and_then(|q| q.run(&run.graph).map(|rows| rows.names(&run.graph))) {
            Ok(names) => {
                for n in names {
                    println!("{n}");
                }
            }
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }
}
