//! Architectural Enforcement
//!
//! Source scanners backing the integration tests in `tests/`, which enforce:
//! - No sleep() calls in production code (pacing goes through intervals)
//! - No OS threads in the presenter core (one tokio timer drives all timing)
//!
//! These checks are line based and deliberately simple; they catch
//! regressions early rather than prove absence.

use std::fs;
use std::path::{Path, PathBuf};

/// Workspace root, resolved from this crate's manifest directory
#[must_use]
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

/// What a directory is allowed to do with sleep calls
#[derive(Clone, Copy, Debug, Default)]
pub struct SleepPolicy {
    /// Allow sleeps inside `#[cfg(test)]` modules
    pub allow_tests: bool,
    /// Allow sleeps in retry/backoff loops
    pub allow_backoff: bool,
}

/// Find sleep calls under `dir` that `policy` does not permit
#[must_use]
pub fn find_sleep_violations(dir: &Path, policy: SleepPolicy) -> Vec<String> {
    let mut violations = Vec::new();
    for (path, content) in rust_sources(dir) {
        let lines: Vec<&str> = content.lines().collect();
        for (idx, line) in lines.iter().enumerate() {
            let code = code_part(line);
            if !(code.contains("::sleep(") || code.contains(".sleep(")) {
                continue;
            }
            if policy.allow_tests && is_in_test_module(&lines, idx) {
                continue;
            }
            if policy.allow_backoff && is_backoff_context(&lines, idx) {
                continue;
            }
            if is_interval_pattern(&lines, idx) {
                continue;
            }
            violations.push(format!("{}:{} - {}", path.display(), idx + 1, line.trim()));
        }
    }
    violations
}

/// Find OS thread spawns under `dir`, test modules excluded
#[must_use]
pub fn find_thread_spawns(dir: &Path) -> Vec<String> {
    let mut violations = Vec::new();
    for (path, content) in rust_sources(dir) {
        let lines: Vec<&str> = content.lines().collect();
        for (idx, line) in lines.iter().enumerate() {
            let code = code_part(line);
            let spawns = code.contains("thread::spawn(") || code.contains("thread::Builder::new(");
            if spawns && !is_in_test_module(&lines, idx) {
                violations.push(format!("{}:{} - {}", path.display(), idx + 1, line.trim()));
            }
        }
    }
    violations
}

fn rust_sources(dir: &Path) -> Vec<(PathBuf, String)> {
    if !dir.exists() {
        return Vec::new();
    }

    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .filter_map(|e| {
            let content = fs::read_to_string(e.path()).ok()?;
            Some((e.path().to_path_buf(), content))
        })
        .collect()
}

fn code_part(line: &str) -> &str {
    line.split("//").next().unwrap_or(line)
}

/// Whether `current_idx` follows a `#[cfg(test)]` attribute in the file
fn is_in_test_module(lines: &[&str], current_idx: usize) -> bool {
    lines[..current_idx]
        .iter()
        .any(|line| line.trim() == "#[cfg(test)]")
}

/// Whether the sleep sits in retry logic with an exponential delay
fn is_backoff_context(lines: &[&str], current_idx: usize) -> bool {
    let context_range = current_idx.saturating_sub(15)..std::cmp::min(current_idx + 5, lines.len());

    let mut has_backoff_calc = false;
    let mut has_retry_context = false;

    for line in &lines[context_range] {
        let line = line.to_lowercase();
        if line.contains("<<") || line.contains("pow") || line.contains("* 2") {
            has_backoff_calc = true;
        }
        if line.contains("retry") || line.contains("backoff") || line.contains("attempt") {
            has_retry_context = true;
        }
    }

    has_backoff_calc && has_retry_context
}

/// Whether the call sits in a `tokio::time::interval` driven loop
fn is_interval_pattern(lines: &[&str], current_idx: usize) -> bool {
    let context_range = current_idx.saturating_sub(20)..current_idx;
    lines[context_range]
        .iter()
        .any(|line| line.contains("interval.tick()") || line.contains("tokio::time::interval"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_module_detection() {
        let code = vec![
            "fn pace() {}",
            "#[cfg(test)]",
            "mod tests {",
            "    async fn waits() { tokio::time::sleep(d).await; }",
            "}",
        ];

        assert!(!is_in_test_module(&code, 0));
        assert!(is_in_test_module(&code, 3));
    }

    #[test]
    fn test_backoff_detection() {
        let code = vec![
            "fn reconnect() {",
            "    let delay = base_delay * (1 << attempt);",
            "    println!(\"Retry attempt {}\", attempt);",
            "    tokio::time::sleep(Duration::from_millis(delay)).await;",
            "}",
        ];

        assert!(is_backoff_context(&code, 3));
        assert!(!is_backoff_context(&code[3..], 0));
    }

    #[test]
    fn test_comment_is_not_code() {
        assert_eq!(code_part("let x = 1; // thread::sleep(d)"), "let x = 1; ");
    }

    #[test]
    fn test_workspace_root_contains_presenter() {
        assert!(workspace_root().join("presenter").join("core").exists());
    }
}
