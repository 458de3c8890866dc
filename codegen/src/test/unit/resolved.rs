use kgen_ir::{DataState, GranularityMode, shape};

use crate::c::render;
use crate::ensure_resolved;
use crate::error::Error;
use crate::test::helpers::{blur, schedule};

#[test]
fn test_unanalyzed_kernel_refused() {
    let kernel = blur(shape::fixed(&[64, 32]), 1);
    let err = render(&kernel).unwrap_err();

    assert_eq!(err, Error::Unresolved { kernel: "blur".into(), data: "in".into(), state: DataState::Unscheduled });
    assert_eq!(err.to_string(), "kernel 'blur': 'in' reached the emitter in state UNSCHEDULED");
}

#[test]
fn test_infeasible_kernel_emits_nothing() {
    let mut kernel = blur(shape::fixed(&[256, 64]), 0);
    assert!(!schedule(&mut kernel, GranularityMode::WorkGroupSlicing, Some(1024)));

    let err = render(&kernel).unwrap_err();
    assert!(matches!(err, Error::Unresolved { state: DataState::SlotSized, .. }), "{err}");
}

#[test]
fn test_scheduled_kernel_accepted() {
    let mut kernel = blur(shape::fixed(&[64, 32]), 1);
    assert!(schedule(&mut kernel, GranularityMode::WholeImage, None));
    assert_eq!(ensure_resolved(&kernel), Ok(()));
}
