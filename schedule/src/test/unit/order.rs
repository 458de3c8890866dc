use kgen_ir::{Kernel, NodeDecl, NodeInput, ScalarType, UnitContext, shape};

use crate::error::Error;
use crate::order::topological_order;
use crate::test::helpers::{device, stencil_chain};
use crate::{TilingConfig, analyze};

#[test]
fn test_chain_in_declaration_order() {
    let kernel = stencil_chain("chain", &[16, 8], &[1, 0, 2]);
    let names: Vec<_> = topological_order(&kernel).unwrap().into_iter().map(|n| kernel.node(n).name().to_string()).collect();
    assert_eq!(names, ["f0", "f1", "f2"]);
}

#[test]
fn test_consumer_declared_first() {
    let mut ctx = UnitContext::default();
    let mut k = Kernel::new("reversed");
    let input = k.add_input("in", ScalarType::Float, shape::fixed(&[8, 8])).unwrap();
    let tmp = k.add_data("tmp", ScalarType::Float, shape::fixed(&[8, 8])).unwrap();
    let out = k.add_output("out", ScalarType::Float, shape::fixed(&[8, 8])).unwrap();
    let late = k
        .add_node(&mut ctx, NodeDecl::builder().name("late").output(out).inputs(vec![NodeInput::pointwise(tmp, 2)]).build())
        .unwrap();
    let early = k
        .add_node(&mut ctx, NodeDecl::builder().name("early").output(tmp).inputs(vec![NodeInput::pointwise(input, 2)]).build())
        .unwrap();

    assert_eq!(topological_order(&k).unwrap(), vec![early, late]);
}

#[test]
fn test_independent_nodes_by_id() {
    let mut ctx = UnitContext::default();
    let mut k = Kernel::new("fork");
    let input = k.add_input("in", ScalarType::Float, shape::fixed(&[8])).unwrap();
    let a = k.add_output("a", ScalarType::Float, shape::fixed(&[8])).unwrap();
    let b = k.add_output("b", ScalarType::Float, shape::fixed(&[8])).unwrap();
    let na = k.add_node(&mut ctx, NodeDecl::builder().name("fa").output(a).inputs(vec![NodeInput::pointwise(input, 1)]).build()).unwrap();
    let nb = k.add_node(&mut ctx, NodeDecl::builder().name("fb").output(b).inputs(vec![NodeInput::pointwise(input, 1)]).build()).unwrap();

    assert_eq!(topological_order(&k).unwrap(), vec![na, nb]);
}

fn cyclic_kernel() -> Kernel {
    let mut ctx = UnitContext::default();
    let mut k = Kernel::new("loop");
    let a = k.add_data("a", ScalarType::Float, shape::fixed(&[8])).unwrap();
    let b = k.add_output("b", ScalarType::Float, shape::fixed(&[8])).unwrap();
    k.add_node(&mut ctx, NodeDecl::builder().name("x").output(a).inputs(vec![NodeInput::pointwise(b, 1)]).build()).unwrap();
    k.add_node(&mut ctx, NodeDecl::builder().name("y").output(b).inputs(vec![NodeInput::pointwise(a, 1)]).build()).unwrap();
    k
}

#[test]
fn test_cycle_rejected() {
    let k = cyclic_kernel();
    let err = topological_order(&k).unwrap_err();
    assert_eq!(err, Error::Cycle { kernel: "loop".into(), nodes: "'x', 'y'".into() });
}

#[test]
fn test_cycle_is_an_error_of_analyze() {
    let mut k = cyclic_kernel();
    let mut diag = kgen_ir::Diagnostics::default();
    let result = analyze(&mut k, &device(None), &TilingConfig::default(), &mut diag);
    assert!(matches!(result, Err(Error::Cycle { .. })));
    assert!(k.schedule().is_none());
}
