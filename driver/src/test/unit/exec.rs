use crate::error::Error;
use std::time::{Duration, Instant};

use crate::exec::{run, spawn, wait_all};

#[test]
fn test_run_captures_output() {
    let output = run("sh", ["-c", "echo hello"]).unwrap();
    assert_eq!(String::from_utf8_lossy(&output.stdout), "hello\n");
}

#[test]
fn test_failure_carries_status() {
    let err = run("sh", ["-c", "echo broken >&2; exit 3"]).unwrap_err();
    match &err {
        Error::Subprocess { program, status, stderr } => {
            assert_eq!(program, "sh");
            assert_eq!(*status, 3);
            assert_eq!(stderr, "broken");
        }
        other => panic!("unexpected {other}"),
    }
    assert_eq!(err.exit_status(), 3);
    assert_eq!(err.to_string(), "'sh' failed with status 3");
}

#[test]
fn test_missing_program() {
    let err = spawn("kgen-no-such-program", Vec::<String>::new()).unwrap_err();
    assert!(matches!(err, Error::Spawn { .. }));
    assert_eq!(err.exit_status(), 1);
}

#[test]
fn test_pending_processes_waited_later() {
    let first = spawn("sh", ["-c", "exit 0"]).unwrap();
    let second = spawn("sh", ["-c", "exit 5"]).unwrap();
    assert_eq!(first.program(), "sh");
    assert_ne!(first.id(), second.id());

    assert!(first.wait().is_ok());
    assert!(matches!(second.wait(), Err(Error::Subprocess { status: 5, .. })));
}

#[test]
fn test_wait_all_reaps_every_process() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("done");
    let slow = format!("sleep 1; touch '{}'", marker.display());
    let pending = vec![spawn("sh", ["-c", "exit 3"]).unwrap(), spawn("sh", ["-c", slow.as_str()]).unwrap()];

    let result = wait_all(pending);

    assert!(matches!(result, Err(Error::Subprocess { status: 3, .. })));
    assert!(marker.exists());
}

#[test]
fn test_wait_all_keeps_first_failure() {
    let pending = vec![spawn("sh", ["-c", "exit 4"]).unwrap(), spawn("sh", ["-c", "exit 5"]).unwrap()];
    assert!(matches!(wait_all(pending), Err(Error::Subprocess { status: 4, .. })));
    assert!(wait_all(Vec::new()).is_ok());
}

#[test]
fn test_dropped_process_is_killed() {
    let start = Instant::now();
    drop(spawn("sh", ["-c", "sleep 30"]).unwrap());
    assert!(start.elapsed() < Duration::from_secs(10));
}
