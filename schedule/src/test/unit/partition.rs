use kgen_ir::{GranularityMode, Partition, ScanOrder, Size};

use crate::TilingConfig;
use crate::test::helpers::{device, error_texts, run, stencil_chain};

fn partitions(config: &TilingConfig, unit_memory: Option<usize>, radii: &[i64]) -> Vec<Partition> {
    let mut k = stencil_chain("blur", &[64, 32], radii);
    let (analysis, diag) = run(&mut k, &device(unit_memory), config);
    assert!(analysis.is_ready(), "{:?}", diag.entries());
    k.schedule().unwrap().partitions.to_vec()
}

#[test]
fn test_whole_image_single_part() {
    let p = partitions(&TilingConfig::default(), None, &[1]);
    assert_eq!(p, vec![Partition::whole(64), Partition::whole(32)]);
}

#[test]
fn test_slicing_splits_scan_dimension() {
    let config = TilingConfig::builder().mode(GranularityMode::WorkGroupSlicing).build();
    let p = partitions(&config, None, &[1]);
    assert_eq!(p[0], Partition::whole(64));
    assert_eq!(p[1], Partition { nb_grains: 32, slice_grains: 8, parts: 4 });
}

#[test]
fn test_slicing_columns() {
    let config = TilingConfig::builder()
        .mode(GranularityMode::WorkGroupSlicing)
        .scan_order(ScanOrder::Columns)
        .nb_work_groups(3)
        .build();
    let p = partitions(&config, None, &[1]);
    assert_eq!(p[0], Partition { nb_grains: 64, slice_grains: 22, parts: 3 });
    assert_eq!(p[1], Partition::whole(32));
}

#[test]
fn test_fixed_tile() {
    let config = TilingConfig::builder().mode(GranularityMode::ExternalTiling).tile(Size::from([16, 8])).build();
    let p = partitions(&config, None, &[1]);
    assert_eq!(p[0], Partition { nb_grains: 64, slice_grains: 16, parts: 4 });
    assert_eq!(p[1], Partition { nb_grains: 32, slice_grains: 8, parts: 4 });
}

// in: 4 slots and a 2-pixel halo, out: 2 slots; 4-byte floats.
// Bytes for a width of w pixels: 16*(w+2) + 8*w = 32 + 24*w.
#[test]
fn test_tile_width_fitted_to_budget() {
    let config = TilingConfig::builder().mode(GranularityMode::ExternalTiling).build();
    let p = partitions(&config, Some(32 + 24 * 10), &[1]);
    assert_eq!(p[0], Partition { nb_grains: 64, slice_grains: 10, parts: 7 });
    assert_eq!(p[1], Partition::whole(32));
}

#[test]
fn test_fixed_tile_narrower_than_stencil() {
    let mut k = stencil_chain("blur", &[64, 32], &[1]);
    let config = TilingConfig::builder().mode(GranularityMode::ExternalTiling).tile(Size::from([2, 32])).build();
    let (analysis, diag) = run(&mut k, &device(None), &config);

    assert!(!analysis.is_ready());
    assert!(k.schedule().is_none());
    assert_eq!(
        error_texts(&diag),
        ["kernel 'blur': tile limits 'in' to 2 pixels in dimension 0, narrower than its 3-pixel stencil"]
    );
}

#[test]
fn test_budget_forces_tile_below_stencil() {
    let mut k = stencil_chain("blur", &[64, 32], &[1]);
    let config = TilingConfig::builder().mode(GranularityMode::ExternalTiling).build();
    let (analysis, diag) = run(&mut k, &device(Some(32 + 24 * 2)), &config);

    assert!(!analysis.is_ready());
    let errors = error_texts(&diag);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("local memory budget limits 'in' to 2 pixels"), "{errors:?}");
}

#[test]
fn test_budget_below_one_grain() {
    let mut k = stencil_chain("blur", &[64, 32], &[1]);
    let config = TilingConfig::builder().mode(GranularityMode::ExternalTiling).build();
    let (analysis, diag) = run(&mut k, &device(Some(40)), &config);

    assert!(!analysis.is_ready());
    assert_eq!(error_texts(&diag), ["kernel 'blur': local memory too small for a tile of one grain in dimension 0"]);
}

#[test]
fn test_unbounded_extent_cannot_be_tiled() {
    use kgen_ir::{Kernel, NodeDecl, NodeInput, ScalarType, Shape, UnitContext};
    use crate::test::helpers::dynamic;

    let mut ctx = UnitContext::default();
    let mut k = Kernel::new("dyn");
    let height = k.add_control("height", ScalarType::Int).unwrap();
    let shape: Shape = [64usize.into(), dynamic(height, None)].into_iter().collect();
    let input = k.add_input("in", ScalarType::Float, shape.clone()).unwrap();
    let out = k.add_output("out", ScalarType::Float, shape).unwrap();
    k.add_node(&mut ctx, NodeDecl::builder().name("f").output(out).inputs(vec![NodeInput::pointwise(input, 2)]).build())
        .unwrap();

    let config = TilingConfig::builder().mode(GranularityMode::WorkGroupSlicing).build();
    let (analysis, diag) = run(&mut k, &device(None), &config);
    assert!(!analysis.is_ready());
    assert_eq!(
        error_texts(&diag),
        ["kernel 'dyn': 'in' has no bound on its extent in dimension 1, cannot tile it"]
    );

    // Whole-image kernels keep the extent symbolic.
    let (analysis, _) = run(&mut k, &device(None), &TilingConfig::default());
    assert!(analysis.is_ready());
}
