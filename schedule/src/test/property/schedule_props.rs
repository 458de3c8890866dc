use kgen_ir::test::property::generators::arb_stencil_chain;
use kgen_ir::{DataState, Diagnostics, GranularityMode, Quantity, Unit};
use proptest::prelude::*;

use crate::partition::line_extent;
use crate::test::helpers::device;
use crate::{TilingConfig, analyze};

fn arb_config() -> impl Strategy<Value = TilingConfig> {
    (
        prop_oneof![
            Just(GranularityMode::WholeImage),
            Just(GranularityMode::ExternalTiling),
            Just(GranularityMode::WorkGroupSlicing),
        ],
        prop_oneof![Just(kgen_ir::ScanOrder::Rows), Just(kgen_ir::ScanOrder::Columns)],
        1usize..=6,
    )
        .prop_map(|(mode, scan_order, nb_wg)| {
            TilingConfig::builder().mode(mode).scan_order(scan_order).nb_work_groups(nb_wg).build()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn consumers_run_after_producers((mut kernel, _) in arb_stencil_chain(24, 12, 5), config in arb_config()) {
        let mut diag = Diagnostics::default();
        let analysis = analyze(&mut kernel, &device(None), &config, &mut diag).unwrap();
        prop_assert!(analysis.is_ready());

        for node in kernel.nodes() {
            let cycle = kernel.data(node.output()).pattern().scheduling_cycle().unwrap();
            for edge in kernel.input_edges(node.id()) {
                let ready = kernel.data(edge.source()).pattern().scheduling_cycle().unwrap();
                prop_assert!(cycle > ready);
            }
        }
        prop_assert!(kernel.data_items().all(|d| d.state() == DataState::GeometryResolved));
    }

    #[test]
    fn buffer_lines_cover_the_halo((mut kernel, radii) in arb_stencil_chain(24, 12, 5)) {
        let config = TilingConfig::builder().mode(GranularityMode::WorkGroupSlicing).build();
        let mut diag = Diagnostics::default();
        analyze(&mut kernel, &device(None), &config, &mut diag).unwrap();
        let width = kernel.schedule().unwrap().partitions[0].slice_grains;

        for (node, &k) in kernel.nodes().zip(&radii) {
            for edge in kernel.input_edges(node.id()) {
                prop_assert!(line_extent(kernel.data(edge.source()), 0, width) >= 24 + 2 * k);
            }
        }
    }

    #[test]
    fn slices_tile_the_image((mut kernel, _) in arb_stencil_chain(24, 12, 4), config in arb_config()) {
        let mut diag = Diagnostics::default();
        analyze(&mut kernel, &device(None), &config, &mut diag).unwrap();
        let schedule = kernel.schedule().unwrap().clone();

        for data in kernel.iterative_data() {
            let geometry = data.geometry().unwrap();
            for (dim, extent) in [24i64, 12].into_iter().enumerate() {
                let parts = schedule.partitions[dim].parts;
                let mut covered = 0;
                for part in 0..parts {
                    for (key, expr) in geometry.iter().filter(|(key, _)| key.dim == dim) {
                        prop_assert!(expr.eval_static(part).unwrap() >= 0, "{key} < 0 for part {part}");
                    }
                    let pos = geometry.get(dim, Quantity::SlicePosition, Unit::Pixel).unwrap().eval_static(part).unwrap();
                    prop_assert_eq!(pos, covered);
                    covered += geometry.get(dim, Quantity::SliceSize, Unit::Pixel).unwrap().eval_static(part).unwrap();
                }
                prop_assert_eq!(covered, extent);
            }
        }
    }
}
