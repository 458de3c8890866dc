use kgen_ir::{Kernel, NodeDecl, NodeInput, ScalarType, ScanOrder, UnitContext, Window, shape};
use test_case::test_case;

use crate::cycles::assign_cycles;
use crate::order::topological_order;
use crate::test::helpers::stencil_chain;
use crate::tile::analyze_tiles;

fn scheduled(kernel: &mut Kernel, scan: ScanOrder) -> crate::cycles::Pipeline {
    let order = topological_order(kernel).unwrap();
    analyze_tiles(kernel, &order).unwrap();
    assign_cycles(kernel, &order, scan).unwrap()
}

fn cycle(kernel: &Kernel, name: &str) -> u32 {
    kernel.data(kernel.find_data(name).unwrap()).pattern().scheduling_cycle().unwrap()
}

#[test]
fn test_pointwise_chain_one_cycle_per_node() {
    let mut k = stencil_chain("copy", &[16, 8], &[0, 0]);
    let pipeline = scheduled(&mut k, ScanOrder::Rows);
    assert_eq!((cycle(&k, "in"), cycle(&k, "t0"), cycle(&k, "out")), (0, 1, 2));
    assert_eq!(pipeline.depth, 2);
}

#[test]
fn test_right_halo_delays_consumer() {
    let mut k = stencil_chain("blur", &[16, 8], &[1, 2]);
    scheduled(&mut k, ScanOrder::Rows);
    assert_eq!(cycle(&k, "t0"), 2);
    assert_eq!(cycle(&k, "out"), 2 + 3);
}

// Reads two pixels ahead along dimension 0 only.
#[test_case(ScanOrder::Rows, 1; "rows ignore the width halo")]
#[test_case(ScanOrder::Columns, 3; "columns wait for it")]
fn test_lag_follows_scan_dimension(scan: ScanOrder, expected: u32) {
    let mut ctx = UnitContext::default();
    let mut k = Kernel::new("ahead");
    let input = k.add_input("in", ScalarType::Float, shape::fixed(&[16, 8])).unwrap();
    let out = k.add_output("out", ScalarType::Float, shape::fixed(&[16, 8])).unwrap();
    let read = Window::new([(0, 2), (0, 0)]);
    k.add_node(&mut ctx, NodeDecl::builder().name("f").output(out).inputs(vec![NodeInput::new(input, read)]).build())
        .unwrap();
    scheduled(&mut k, scan);
    assert_eq!(cycle(&k, "out"), expected);
}

#[test]
fn test_control_input_available_at_start() {
    let mut ctx = UnitContext::default();
    let mut k = Kernel::new("gain");
    let input = k.add_input("in", ScalarType::Float, shape::fixed(&[16])).unwrap();
    let gain = k.add_control("gain", ScalarType::Float).unwrap();
    let out = k.add_output("out", ScalarType::Float, shape::fixed(&[16])).unwrap();
    let decl = NodeDecl::builder()
        .name("mul")
        .output(out)
        .inputs(vec![NodeInput::pointwise(input, 1)])
        .control_inputs(vec![gain])
        .build();
    k.add_node(&mut ctx, decl).unwrap();
    scheduled(&mut k, ScanOrder::Rows);
    assert_eq!(cycle(&k, "gain"), 0);
    assert_eq!(cycle(&k, "out"), 1);
}

#[test]
fn test_node_order_sorted_by_cycle() {
    let mut ctx = UnitContext::default();
    let mut k = Kernel::new("diamond");
    let input = k.add_input("in", ScalarType::Float, shape::fixed(&[16, 8])).unwrap();
    let slow = k.add_data("slow", ScalarType::Float, shape::fixed(&[16, 8])).unwrap();
    let fast = k.add_data("fast", ScalarType::Float, shape::fixed(&[16, 8])).unwrap();
    let out = k.add_output("out", ScalarType::Float, shape::fixed(&[16, 8])).unwrap();
    let blur = NodeDecl::builder().name("blur").output(slow).inputs(vec![NodeInput::new(input, Window::symmetric(2, 2))]);
    let n_blur = k.add_node(&mut ctx, blur.build()).unwrap();
    let copy = NodeDecl::builder().name("copy").output(fast).inputs(vec![NodeInput::pointwise(input, 2)]);
    let n_copy = k.add_node(&mut ctx, copy.build()).unwrap();
    let join = NodeDecl::builder()
        .name("join")
        .output(out)
        .inputs(vec![NodeInput::pointwise(slow, 2), NodeInput::pointwise(fast, 2)]);
    let n_join = k.add_node(&mut ctx, join.build()).unwrap();

    let pipeline = scheduled(&mut k, ScanOrder::Rows);
    assert_eq!((cycle(&k, "slow"), cycle(&k, "fast"), cycle(&k, "out")), (3, 1, 4));
    assert_eq!(pipeline.node_order, vec![n_copy, n_blur, n_join]);
}
