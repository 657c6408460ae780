//! Source hygiene for the renderer, checked at test time.
//!
//! Everything here ends up in one wasm module on a page nobody watches, and a
//! single panic stops every layer. The check walks the production sources of
//! all three crates (`layers`, `events`, and the wasm entry) and holds each
//! forbidden construct to its budget. Budgets are zero and stay zero.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Source roots relative to the `layers` manifest directory.
const ROOTS: [&str; 3] = ["src", "../events/src", "../src"];

/// A forbidden construct, the most occurrences tolerated, and what to do
/// instead.
struct Rule {
    pattern: &'static str,
    budget: usize,
    hint: &'static str,
}

const RULES: &[Rule] = &[
    Rule { pattern: ".unwrap()", budget: 0, hint: "propagate with `?` or map to LayerError" },
    Rule { pattern: ".expect(", budget: 0, hint: "propagate with `?` or map to LayerError" },
    Rule { pattern: "panic!(", budget: 0, hint: "return an error" },
    Rule { pattern: "unreachable!(", budget: 0, hint: "make the state unrepresentable" },
    Rule { pattern: "todo!(", budget: 0, hint: "finish the stub" },
    Rule { pattern: "unimplemented!(", budget: 0, hint: "finish the stub" },
    Rule { pattern: "let _ =", budget: 0, hint: "log the error or handle it" },
    Rule { pattern: ".ok()", budget: 0, hint: "match on the Result so the error is seen" },
    Rule { pattern: "#[allow(dead_code)]", budget: 0, hint: "delete the unused item" },
    // Also catches `eprintln!(`.
    Rule { pattern: "println!(", budget: 0, hint: "use log::*" },
];

/// Production `.rs` files under `root`; sibling `*_test.rs` files are skipped.
fn production_sources(root: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(root) else {
        return;
    };
    for path in entries.flatten().map(|entry| entry.path()) {
        if path.is_dir() {
            production_sources(&path, out);
        } else if path.extension().is_some_and(|ext| ext == "rs")
            && !path.to_string_lossy().ends_with("_test.rs")
        {
            out.push(path);
        }
    }
}

fn all_sources() -> Vec<(PathBuf, String)> {
    let mut paths = Vec::new();
    for root in ROOTS {
        production_sources(Path::new(root), &mut paths);
    }
    paths.sort();
    paths
        .into_iter()
        .filter_map(|path| fs::read_to_string(&path).ok().map(|text| (path, text)))
        .collect()
}

#[test]
fn every_crate_is_scanned() {
    let sources = all_sources();
    for root in ROOTS {
        let root = Path::new(root);
        assert!(
            sources.iter().any(|(path, _)| path.starts_with(root)),
            "no sources found under {}",
            root.display()
        );
    }
    assert!(sources.iter().any(|(path, _)| path.ends_with("manager.rs")));
    assert!(sources.iter().all(|(path, _)| !path.to_string_lossy().ends_with("_test.rs")));
}

#[test]
fn forbidden_constructs_stay_within_budget() {
    let sources = all_sources();
    let mut report = String::new();

    for rule in RULES {
        let hits: Vec<(&Path, usize)> = sources
            .iter()
            .map(|(path, text)| (path.as_path(), text.lines().filter(|line| line.contains(rule.pattern)).count()))
            .filter(|(_, count)| *count > 0)
            .collect();
        let found: usize = hits.iter().map(|(_, count)| count).sum();
        if found > rule.budget {
            writeln!(report, "`{}`: found {found}, budget {} ({})", rule.pattern, rule.budget, rule.hint)
                .expect("write to String");
            for (path, count) in hits {
                writeln!(report, "  {}: {count}", path.display()).expect("write to String");
            }
        }
    }

    assert!(report.is_empty(), "hygiene budgets exceeded:\n{report}");
}
