use crate::diagnostics::{Abort, Diagnostics, Severity};
use crate::provenance::SourceLocation;

#[test]
fn test_fifth_error_aborts() {
    let mut diag = Diagnostics::default();
    for _ in 0..4 {
        diag.error("bad").unwrap();
    }
    assert!(matches!(diag.error("bad"), Err(Abort::TooManyErrors { count: 5 })));
    assert_eq!(diag.error_count(), 5);
}

#[test]
fn test_custom_bound() {
    let mut diag = Diagnostics::builder().max_errors(1).build();
    assert!(diag.error("first").is_err());
}

#[test]
fn test_warnings_do_not_count() {
    let mut diag = Diagnostics::default();
    for _ in 0..10 {
        diag.warning("careful");
    }
    assert_eq!(diag.warning_count(), 10);
    assert!(!diag.has_errors());
    assert!(diag.exit_if_error().is_ok());
}

#[test]
fn test_exit_if_error() {
    let mut diag = Diagnostics::default();
    diag.error("one").unwrap();
    assert!(matches!(diag.exit_if_error(), Err(Abort::PendingErrors { count: 1 })));
}

#[test]
fn test_message_verbosity() {
    let mut diag = Diagnostics::builder().verbosity(1).build();
    diag.message(1, "shown");
    diag.message(2, "hidden");
    assert_eq!(diag.entries().len(), 1);
    assert_eq!(diag.entries()[0].severity, Severity::Message);
}

#[test]
fn test_location_display() {
    let mut diag = Diagnostics::default();
    let loc = SourceLocation::new("dev.cfg", 3);
    diag.error_at(Some(loc.at_line(4)), "unknown property 'foo'").unwrap();
    assert_eq!(diag.entries()[0].to_string(), "dev.cfg:4: error: unknown property 'foo'");
}

#[test]
fn test_fatal_and_internal() {
    let mut diag = Diagnostics::default();
    let abort = diag.fatal(None, "cannot open file");
    assert_eq!(abort.to_string(), "fatal error: cannot open file");
    let abort = diag.internal("cycle");
    assert!(matches!(abort, Abort::Internal { .. }));
    assert_eq!(abort.exit_status(), 1);
    assert_eq!(diag.error_count(), 2);
}
