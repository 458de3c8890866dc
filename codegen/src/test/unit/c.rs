//! OpenCL C renderer output checks.

use kgen_ir::{Diagnostics, GranularityMode, Size, shape};
use kgen_schedule::{TilingConfig, analyze};
use test_case::test_case;

use crate::c::types::c_ident;
use crate::c::{CRenderer, render};
use crate::test::helpers::{blur, device, dynamic_blur, schedule};
use crate::{ArgKind, Renderer};

fn line_starting<'a>(code: &'a str, prefix: &str) -> &'a str {
    code.lines().map(str::trim).find(|l| l.starts_with(prefix)).unwrap_or_else(|| panic!("no `{prefix}` in:\n{code}"))
}

#[test]
fn test_work_group_slicing() {
    let mut kernel = blur(shape::fixed(&[64, 32]), 1);
    assert!(schedule(&mut kernel, GranularityMode::WorkGroupSlicing, Some(1 << 20)));
    let result = render(&kernel).expect("C codegen failed");
    let code = &result.code;

    assert!(code.starts_with("/* kernel 'blur': "), "{code}");
    assert!(code.contains("parts=1x4 work-groups=4 work-items=4"), "{code}");
    assert!(code.contains("__kernel void blur(__global const float *in, __global float *out) {\n"), "{code}");
    assert!(code.contains("    const int kg_part1 = get_group_id(0);\n"), "{code}");
    assert_eq!(line_starting(code, "const int kg_SlicePosGrain1_out"), "const int kg_SlicePosGrain1_out = ((kg_part1)*8);");
    assert!(code.contains("__local float kg_buf_in["), "{code}");
    assert!(code.contains("compute_0_f0(kg_buf_in, kg_buf_out);"), "{code}");
    assert!(code.ends_with("}\n"));

    assert_eq!(result.entry_point, "blur");
    assert_eq!(result.local_size, Some([4, 1, 1]));
    assert_eq!(result.global_size, Some([16, 1, 1]));
    let args: Vec<_> = result.args.iter().map(|a| (a.name.as_str(), a.kind)).collect();
    assert_eq!(args, [("in", ArgKind::Input), ("out", ArgKind::Output)]);
    assert_eq!(result.outputs().count(), 1);
}

#[test]
fn test_whole_image_uses_global_images() {
    let mut kernel = blur(shape::fixed(&[64, 32]), 1);
    assert!(schedule(&mut kernel, GranularityMode::WholeImage, None));
    let code = render(&kernel).unwrap().code;

    assert!(!code.contains("get_group_id"), "{code}");
    assert!(!code.contains("__local"), "{code}");
    assert!(code.contains("compute_0_f0(in, out);"), "{code}");
    assert_eq!(line_starting(&code, "const int kg_SlicePosPix0_in"), "const int kg_SlicePosPix0_in = 0;");
}

#[test]
fn test_external_tiles_loop() {
    let mut kernel = blur(shape::fixed(&[64, 32]), 1);
    let config = TilingConfig::builder().mode(GranularityMode::ExternalTiling).tile(Size::from([16, 8])).build();
    let mut diag = Diagnostics::default();
    assert!(analyze(&mut kernel, &device(None), &config, &mut diag).unwrap().is_ready());
    let code = render(&kernel).unwrap().code;

    assert!(
        code.contains("    for (int kg_tile = get_group_id(0); kg_tile < 16; kg_tile += get_num_groups(0)) {\n"),
        "{code}"
    );
    assert!(code.contains("        const int kg_part0 = (kg_tile / 1) % 4;\n"), "{code}");
    assert!(code.contains("        const int kg_part1 = (kg_tile / 4) % 4;\n"), "{code}");
    assert!(code.ends_with("    }\n}\n"), "{code}");
}

#[test]
fn test_dynamic_extent_reads_control() {
    let mut kernel = dynamic_blur(64, 32);
    assert!(schedule(&mut kernel, GranularityMode::WorkGroupSlicing, Some(1 << 20)));
    let code = render(&kernel).unwrap().code;

    assert!(code.contains("blur(const int w, __global const float *in, __global float *out)"), "{code}");
    assert!(line_starting(&code, "const int kg_SliceSizeGrain0_in = ").contains('w'));
    assert!(line_starting(&code, "compute_0_f0(").contains(", w, "), "{code}");
}

#[test]
fn test_indent_width() {
    let mut kernel = blur(shape::fixed(&[16, 16]), 0);
    assert!(schedule(&mut kernel, GranularityMode::WholeImage, None));
    let code = CRenderer::with_indent(2).render(&kernel).unwrap().code;
    assert!(code.contains("\n  compute_0_f0(in, out);\n"), "{code}");
}

#[test]
fn test_backend_names() {
    let renderer = CRenderer::default();
    assert_eq!(renderer.backend_name(), "opencl");
    assert_eq!(renderer.file_extension(), "cl");
}

#[test_case("in" => "in"; "plain")]
#[test_case("left-eye" => "left_eye"; "dash")]
#[test_case("3x3" => "_3x3"; "leading digit")]
#[test_case("a.b c" => "a_b_c"; "punctuation")]
fn test_c_ident(name: &str) -> String {
    c_ident(name)
}
