//! Integration Test: Blocking I/O Prohibition
//!
//! **Policy**: async functions in the core and the console MUST NOT use
//! blocking I/O. Use `tokio::io`, `tokio::net` and async `reqwest`.
//! **Acceptable**: blocking calls in non-async functions that run before the
//! event loop (configuration loading, logging setup), and test code.

use architectural_enforcement::{production_lines_of, rust_files, PRODUCTION_DIRS};

/// Blocking calls and what to use instead
const FORBIDDEN: &[(&str, &str)] = &[
    ("std::fs::", "tokio::fs"),
    ("std::net::", "tokio::net"),
    ("std::io::stdin", "tokio::io::stdin"),
    ("std::io::stdout", "tokio::io::stdout"),
    ("std::thread::sleep", "waiting on a channel"),
    ("std::process::Command", "tokio::process::Command"),
    ("reqwest::blocking", "async reqwest"),
];

#[test]
fn test_no_blocking_io_in_async_code() {
    let violations = find_blocking_io_violations();

    if !violations.is_empty() {
        eprintln!("\nBlocking I/O found inside async functions:\n");
        for violation in &violations {
            eprintln!("  {violation}");
        }

        panic!(
            "\nFound {} blocking I/O violation(s) in production code.",
            violations.len()
        );
    }
}

fn find_blocking_io_violations() -> Vec<String> {
    let mut violations = Vec::new();

    for dir in PRODUCTION_DIRS {
        for path in rust_files(dir) {
            for line in production_lines_of(&path) {
                if !line.in_async_fn() {
                    continue;
                }
                for (pattern, instead) in FORBIDDEN {
                    if line.code.contains(pattern) {
                        violations.push(format!(
                            "{}:{} - {} (use {instead})",
                            path.display(),
                            line.number,
                            line.code.trim()
                        ));
                    }
                }
            }
        }
    }

    violations
}
