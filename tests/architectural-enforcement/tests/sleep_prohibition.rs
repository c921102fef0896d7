//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code in the core and the console MUST NOT call
//! sleep. Controllers wait on completions, the console waits on input or
//! completions; there is nothing to poll on a timer.
//! **Exceptions**: test code (`#[cfg(test)]` modules and `tests/`).

use architectural_enforcement::{production_lines_of, rust_files, PRODUCTION_DIRS};

#[test]
fn test_no_sleep_in_production_code() {
    let violations = find_sleep_violations();

    if !violations.is_empty() {
        eprintln!("\nSleep calls found in production code:\n");
        for violation in &violations {
            eprintln!("  {violation}");
        }
        eprintln!("\nWait on a channel, a watch receiver or the input stream instead.");

        panic!(
            "\nFound {} sleep violation(s) in production code.",
            violations.len()
        );
    }
}

fn find_sleep_violations() -> Vec<String> {
    let mut violations = Vec::new();

    for dir in PRODUCTION_DIRS {
        for path in rust_files(dir) {
            for line in production_lines_of(&path) {
                if line.code.contains("::sleep(") || line.code.contains(".sleep(") {
                    violations.push(format!(
                        "{}:{} - {}",
                        path.display(),
                        line.number,
                        line.code.trim()
                    ));
                }
            }
        }
    }

    violations
}
