use kgen_ir::{Kernel, NodeDecl, NodeInput, ScalarType, Size, UnitContext, Window, shape};

use crate::order::topological_order;
use crate::test::helpers::stencil_chain;
use crate::tile::analyze_tiles;

fn analysed(mut kernel: Kernel) -> Kernel {
    let order = topological_order(&kernel).unwrap();
    analyze_tiles(&mut kernel, &order).unwrap();
    kernel
}

fn tiling<'a>(kernel: &'a Kernel, name: &str) -> &'a kgen_ir::TileInfo {
    kernel.data(kernel.find_data(name).unwrap()).tiling().unwrap()
}

#[test]
fn test_pointwise_unit_grain() {
    let k = analysed(stencil_chain("copy", &[16, 8], &[0, 0]));
    for name in ["in", "t0", "out"] {
        let t = tiling(&k, name);
        assert_eq!(t.grain, Size::ones(2));
        assert_eq!(t.execution_rate, Size::ones(2));
        assert_eq!(t.nbh_for_successors, Window::zero(2));
    }
}

#[test]
fn test_neighbourhood_accumulates_upstream() {
    let k = analysed(stencil_chain("blur", &[16, 8], &[1, 2]));
    assert_eq!(tiling(&k, "out").nbh_for_successors, Window::zero(2));
    assert_eq!(tiling(&k, "t0").nbh_for_successors, Window::symmetric(2, 2));
    assert_eq!(tiling(&k, "in").nbh_for_successors, Window::symmetric(2, 3));
    assert_eq!(tiling(&k, "in").access_union, Window::symmetric(2, 1));
}

#[test]
fn test_downsampling_grain() {
    let mut ctx = UnitContext::default();
    let mut k = Kernel::new("down");
    let input = k.add_input("in", ScalarType::Float, shape::fixed(&[16, 16])).unwrap();
    let out = k.add_output("out", ScalarType::Float, shape::fixed(&[8, 8])).unwrap();
    let decl = NodeDecl::builder()
        .name("down")
        .output(out)
        .inputs(vec![NodeInput::new(input, Window::new([(0, 1), (0, 1)]))])
        .input_stride(Size::from([2, 2]))
        .build();
    k.add_node(&mut ctx, decl).unwrap();
    let k = analysed(k);

    assert_eq!(tiling(&k, "in").grain, Size::from([2, 2]));
    assert_eq!(tiling(&k, "out").grain, Size::ones(2));
    assert_eq!(tiling(&k, "out").execution_rate, Size::ones(2));
    assert_eq!(tiling(&k, "in").nbh_for_successors, Window::zero(2));
}

#[test]
fn test_upsampling_grain() {
    let mut ctx = UnitContext::default();
    let mut k = Kernel::new("up");
    let input = k.add_input("in", ScalarType::Float, shape::fixed(&[8])).unwrap();
    let out = k.add_output("out", ScalarType::Float, shape::fixed(&[16])).unwrap();
    let decl = NodeDecl::builder()
        .name("up")
        .output(out)
        .inputs(vec![NodeInput::pointwise(input, 1)])
        .output_stride(Size::from([2]))
        .build();
    k.add_node(&mut ctx, decl).unwrap();
    let k = analysed(k);

    assert_eq!(tiling(&k, "in").grain, Size::from([1]));
    assert_eq!(tiling(&k, "out").grain, Size::from([2]));
    assert_eq!(tiling(&k, "out").grain_for_successors, Size::from([2]));
    assert_eq!(tiling(&k, "out").execution_rate, Size::from([1]));
}

#[test]
fn test_tiling_only_before_scheduling() {
    let mut k = analysed(stencil_chain("copy", &[8], &[0]));
    let input = k.find_data("in").unwrap();
    k.data_mut(input).schedule_at(0).unwrap();
    assert!(k.data_mut(input).set_tiling(Default::default()).is_err());
}
