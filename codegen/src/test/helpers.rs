//! Scheduled kernels for the renderer tests.

use kgen_device::ComputeDevice;
use kgen_ir::{Diagnostics, Extent, GranularityMode, Kernel, NodeDecl, NodeInput, ScalarType, Shape, UnitContext, Window};
use kgen_schedule::{TilingConfig, analyze};

/// `in -> f0[-radius:radius] -> out`.
pub fn blur(shape: Shape, radius: i64) -> Kernel {
    let mut ctx = UnitContext::default();
    let mut kernel = Kernel::new("blur");
    let nb_dims = shape.len();
    let input = kernel.add_input("in", ScalarType::Float, shape.clone()).unwrap();
    let out = kernel.add_output("out", ScalarType::Float, shape).unwrap();
    let decl = NodeDecl::builder()
        .name("f0")
        .output(out)
        .inputs(vec![NodeInput::new(input, Window::symmetric(nb_dims, radius))])
        .build();
    kernel.add_node(&mut ctx, decl).unwrap();
    kernel
}

/// `blur` over an image whose width is the control parameter `w`.
pub fn dynamic_blur(max_width: usize, height: usize) -> Kernel {
    let mut ctx = UnitContext::default();
    let mut kernel = Kernel::new("blur");
    let w = kernel.add_control("w", ScalarType::Int).unwrap();
    let shape: Shape = [Extent::Dynamic { param: w, max: Some(max_width) }, Extent::Fixed(height)].into_iter().collect();
    let input = kernel.add_input("in", ScalarType::Float, shape.clone()).unwrap();
    let out = kernel.add_output("out", ScalarType::Float, shape).unwrap();
    let decl = NodeDecl::builder()
        .name("f0")
        .output(out)
        .inputs(vec![NodeInput::new(input, Window::symmetric(2, 1))])
        .build();
    kernel.add_node(&mut ctx, decl).unwrap();
    kernel
}

pub fn device(unit_memory: Option<usize>) -> ComputeDevice {
    ComputeDevice::builder().nb_compute_units(4).nb_compute_elements(4).maybe_unit_memory(unit_memory).build()
}

/// Schedule `kernel`; `true` when it fits.
pub fn schedule(kernel: &mut Kernel, mode: GranularityMode, unit_memory: Option<usize>) -> bool {
    let mut diag = Diagnostics::default();
    let config = TilingConfig::builder().mode(mode).build();
    analyze(kernel, &device(unit_memory), &config, &mut diag).unwrap().is_ready()
}
