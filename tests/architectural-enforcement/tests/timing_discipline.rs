//! Integration Test: Timing Discipline
//!
//! **Policy**: All presenter timing runs on tokio intervals. Production code
//! MUST NOT sleep, and the core MUST NOT start OS threads.
//! **Exceptions**: test modules, exponential backoff in retry logic.

use architectural_enforcement::{
    find_sleep_violations, find_thread_spawns, workspace_root, SleepPolicy,
};

fn report(kind: &str, violations: &[String]) {
    if violations.is_empty() {
        return;
    }

    eprintln!("\n❌ {kind} found in production code:\n");
    for violation in violations {
        eprintln!("  ❌ {violation}");
    }
    eprintln!("\n✅ Use tokio::time::interval() for pacing and timeouts\n");

    panic!("Found {} {kind} violation(s)", violations.len());
}

#[test]
fn test_no_sleep_in_production_code() {
    let root = workspace_root();
    let mut violations = find_sleep_violations(
        &root.join("presenter").join("core").join("src"),
        SleepPolicy {
            allow_tests: true,
            allow_backoff: false,
        },
    );
    violations.extend(find_sleep_violations(
        &root.join("presenter").join("demo").join("src"),
        SleepPolicy {
            allow_tests: true,
            allow_backoff: true,
        },
    ));

    report("sleep call", &violations);
}

#[test]
fn test_no_threads_in_core() {
    let root = workspace_root();
    let violations = find_thread_spawns(&root.join("presenter").join("core").join("src"));

    report("thread spawn", &violations);
}
