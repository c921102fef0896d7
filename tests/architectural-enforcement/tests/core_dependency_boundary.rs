//! Integration Test: Headless Core
//!
//! **Policy**: `orb-core` is pure state logic. It MUST NOT depend on terminal,
//! CLI or subscriber crates, and MUST NOT reach into the console crate. Any
//! surface can embed it.

use std::fs;

use architectural_enforcement::{
    dependency_names, production_lines_of, rust_files, workspace_root,
};

/// Crates that belong to a surface, never to the core
const SURFACE_ONLY: &[&str] = &[
    "clap",
    "tracing-subscriber",
    "ratatui",
    "crossterm",
    "anyhow",
    "orb-console",
];

#[test]
fn test_core_has_no_surface_dependencies() {
    let manifest_path = workspace_root().join("orb/core/Cargo.toml");
    let manifest = fs::read_to_string(&manifest_path).unwrap();

    let offending: Vec<String> = dependency_names(&manifest)
        .into_iter()
        .filter(|name| SURFACE_ONLY.contains(&name.as_str()))
        .collect();

    assert!(
        offending.is_empty(),
        "orb-core depends on surface crates: {offending:?}"
    );
}

#[test]
fn test_core_source_does_not_use_console() {
    let violations: Vec<String> = rust_files("orb/core/src")
        .into_iter()
        .flat_map(|path| {
            production_lines_of(&path)
                .into_iter()
                .filter(|line| line.code.contains("orb_console") || line.code.contains("println!"))
                .map(move |line| format!("{}:{}", path.display(), line.number))
        })
        .collect();

    assert!(
        violations.is_empty(),
        "orb-core writes to the terminal or uses the console crate: {violations:?}"
    );
}
