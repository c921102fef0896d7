//! Architectural Enforcement Integration Tests
//!
//! Source scans that keep the workspace honest:
//! - No sleep() calls in production code
//! - No blocking I/O inside async code
//! - No terminal or CLI dependencies in the headless core
//!
//! This library only holds the shared scanning helpers; the rules live in
//! `tests/`.

use std::fs;
use std::path::{Path, PathBuf};

/// Production source directories, relative to the workspace root
pub const PRODUCTION_DIRS: &[&str] = &["orb/core/src", "orb/console/src"];

/// Workspace root, resolved from this crate's manifest
#[must_use]
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

/// Every `.rs` file under `dir` (relative to the workspace root)
///
/// Panics when the directory is missing so a moved crate cannot make a rule
/// pass silently.
#[must_use]
pub fn rust_files(dir: &str) -> Vec<PathBuf> {
    let path = workspace_root().join(dir);
    assert!(path.exists(), "source directory not found: {}", path.display());

    walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// A line of production code with its comment stripped
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeLine {
    /// 1-based line number
    pub number: usize,
    /// Code before any `//`
    pub code: String,
    /// Signature of the nearest enclosing `fn`, if any
    pub enclosing_fn: Option<String>,
}

impl CodeLine {
    /// Whether the enclosing function is `async`
    #[must_use]
    pub fn in_async_fn(&self) -> bool {
        self.enclosing_fn
            .as_deref()
            .is_some_and(|signature| signature.contains("async fn"))
    }
}

/// Production lines of one source file
///
/// Everything from the first `#[cfg(test)]` on is test code and skipped.
#[must_use]
pub fn production_lines(content: &str) -> Vec<CodeLine> {
    let mut lines = Vec::new();
    let mut enclosing_fn = None;

    for (idx, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.starts_with("#[cfg(test)]") {
            break;
        }

        let code = line.split("//").next().unwrap_or(line);
        if code.contains("fn ") {
            enclosing_fn = Some(code.trim().to_string());
        }
        if code.trim().is_empty() {
            continue;
        }

        lines.push(CodeLine {
            number: idx + 1,
            code: code.to_string(),
            enclosing_fn: enclosing_fn.clone(),
        });
    }
    lines
}

/// Read a file and return its production lines; unreadable files are empty
#[must_use]
pub fn production_lines_of(path: &Path) -> Vec<CodeLine> {
    fs::read_to_string(path)
        .map(|content| production_lines(&content))
        .unwrap_or_default()
}

/// Crate names declared in the `[dependencies]` table of a manifest
#[must_use]
pub fn dependency_names(manifest: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut in_dependencies = false;

    for line in manifest.lines() {
        let line = line.split('#').next().unwrap_or(line).trim();
        if line.starts_with('[') {
            in_dependencies = line == "[dependencies]";
            continue;
        }
        if !in_dependencies {
            continue;
        }
        if let Some((name, _)) = line.split_once('=') {
            names.push(name.trim().to_string());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_lines_stop_at_test_module() {
        let source = "\
use std::sync::Arc; // shared
async fn run() {
    work().await;
}

#[cfg(test)]
mod tests {
    fn helper() {}
}
";
        let lines = production_lines(source);

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].code, "use std::sync::Arc; ");
        assert!(lines[2].in_async_fn());
        assert!(lines.iter().all(|l| !l.code.contains("helper")));
    }

    #[test]
    fn test_dependency_names() {
        let manifest = r#"
[package]
name = "demo"

[dependencies]
tokio = { version = "1" } # runtime
serde = "1.0"

[dev-dependencies]
tempfile = "3"
"#;
        assert_eq!(dependency_names(manifest), vec!["tokio", "serde"]);
    }
}
