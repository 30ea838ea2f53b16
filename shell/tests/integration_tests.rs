//! Integration tests for the subspace shell
//!
//! This test harness:
//! 1. Discovers all .sub test scripts
//! 2. Runs each script line by line through a fresh session
//! 3. Compares the transcript with the expected .out file
//! 4. Reports differences

use std::fs;
use std::path::{Path, PathBuf};
use subspace_config::ServerConfig;
use subspace_shell::ShellSession;

/// Discover all .sub test scripts
fn discover_test_scripts() -> Vec<PathBuf> {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let scripts_dir = manifest_dir.join("tests/scripts");

    let mut scripts = Vec::new();
    if let Ok(entries) = fs::read_dir(&scripts_dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "sub") {
                scripts.push(path);
            }
        }
    }

    scripts.sort();
    scripts
}

/// Run every line of `script` as `admin`.
///
/// The transcript echoes each command as `$ line` followed by its output,
/// if any. Blank lines and lines starting with `#` are skipped. A line
/// `@name` switches the acting user for the lines after it.
fn transcript(script: &str) -> String {
    let config = ServerConfig {
        hostname: "testbox".to_string(),
        ..ServerConfig::default()
    };
    let mut session = ShellSession::new(&config).expect("default config builds a session");
    let mut user = session.user("admin").expect("admin exists");

    let mut out = String::new();
    for line in script.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(name) = line.strip_prefix('@') {
            user = session.user(name).expect("script switches to a known user");
            out.push_str(&format!("@{}\n", name));
            continue;
        }

        out.push_str(&format!("$ {}\n", line));
        let output = session.submit_command(&user, line);
        if !output.is_empty() {
            out.push_str(&output);
            out.push('\n');
        }
    }
    out
}

/// Run a single test script and compare output
fn run_test_script(script_path: &Path) -> Result<TestResult, Box<dyn std::error::Error>> {
    let expected_path = script_path.with_extension("out");

    let expected = if expected_path.exists() {
        fs::read_to_string(&expected_path)?
    } else {
        return Ok(TestResult::Skipped {
            reason: format!("Missing expected output file: {:?}", expected_path),
        });
    };

    let actual = transcript(&fs::read_to_string(script_path)?);

    if matches_pattern(expected.trim_end(), actual.trim_end()) {
        Ok(TestResult::Passed)
    } else {
        Ok(TestResult::Failed { expected, actual })
    }
}

#[derive(Debug)]
enum TestResult {
    Passed,
    Failed { expected: String, actual: String },
    Skipped { reason: String },
}

#[test]
fn integration_tests() {
    let scripts = discover_test_scripts();
    assert!(!scripts.is_empty(), "no test scripts found in tests/scripts/");

    let mut passed = 0;
    let mut failed = 0;
    let mut skipped = 0;

    for script in &scripts {
        let name = script
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        print!("Running {}... ", name);

        match run_test_script(script) {
            Ok(TestResult::Passed) => {
                println!("PASSED");
                passed += 1;
            }
            Ok(TestResult::Failed { expected, actual }) => {
                println!("FAILED");
                println!("  Expected:\n{}", indent(&expected, "    "));
                println!("  Actual:\n{}", indent(&actual, "    "));
                failed += 1;
            }
            Ok(TestResult::Skipped { reason }) => {
                println!("SKIPPED: {}", reason);
                skipped += 1;
            }
            Err(e) => {
                println!("ERROR: {}", e);
                failed += 1;
            }
        }
    }

    println!();
    println!(
        "Results: {} passed, {} failed, {} skipped",
        passed, failed, skipped
    );

    if failed > 0 {
        panic!("{} tests failed", failed);
    }
}

#[test]
fn sessions_are_independent() {
    let first = transcript("mkdir /shared\nls /shared");
    let second = transcript("ls /shared");
    assert!(first.ends_with("$ ls /shared\n/shared\n"));
    assert!(second.contains("directory not found: /shared"));
}

fn indent(s: &str, prefix: &str) -> String {
    s.lines()
        .map(|line| format!("{}{}", prefix, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check if actual output matches expected pattern.
/// Supports wildcards: ____-__-__ __:__:__ matches any timestamp
fn matches_pattern(expected: &str, actual: &str) -> bool {
    let expected_lines: Vec<&str> = expected.lines().collect();
    let actual_lines: Vec<&str> = actual.lines().collect();

    if expected_lines.len() != actual_lines.len() {
        return false;
    }

    expected_lines
        .iter()
        .zip(actual_lines.iter())
        .all(|(exp, act)| line_matches(exp, act))
}

/// Check if a single line matches the pattern
fn line_matches(pattern: &str, actual: &str) -> bool {
    const STAMP: &str = "____-__-__ __:__:__";

    let parts: Vec<&str> = pattern.split(STAMP).collect();
    if parts.len() == 1 {
        return pattern == actual;
    }

    // Every wildcard stands for exactly one timestamp of the same width.
    if actual.len() != pattern.len() {
        return false;
    }
    let mut pos = 0;
    for (i, part) in parts.iter().enumerate() {
        if !actual[pos..].starts_with(part) {
            return false;
        }
        pos += part.len();
        if i + 1 < parts.len() {
            let stamp = &actual[pos..pos + STAMP.len()];
            if chrono::NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S").is_err() {
                return false;
            }
            pos += STAMP.len();
        }
    }

    true
}
