//! OpenCL C backend.
//!
//! Generates one `__kernel` per scheduled kernel. The body is a straight
//! walk of the annotations:
//!
//! ```c
//! __kernel void blur(__global const uchar *in, __global uchar *out) {
//!     const int kg_part1 = get_group_id(0);
//!     /* in: D2_BY_ROW_CIRCULAR_BUFFER sched=0 slots=4 */
//!     const int kg_SlicePosGrain1_in = (kg_part1*8);
//!     ...
//!     __local uchar kg_buf_in[272];
//!     /* cycle 1 */
//!     compute_0_f0(kg_buf_in, kg_buf_t0);
//! }
//! ```

pub mod prelude;
pub mod types;

use itertools::Itertools;
use kgen_ir::{Kernel, KernelSchedule};
use tracing::debug;

use crate::{ArgKind, KernelArg, RenderedKernel, Result, ensure_resolved};

use self::prelude::{geometry_lines, part_indices};
use self::types::{c_buffer, c_ident, c_operand, c_param};

/// OpenCL C source renderer.
pub struct CRenderer {
    indent: usize,
}

impl CRenderer {
    pub fn new() -> Self {
        Self { indent: 4 }
    }

    pub fn with_indent(indent: usize) -> Self {
        Self { indent }
    }
}

impl Default for CRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl crate::Renderer for CRenderer {
    #[tracing::instrument(skip_all, fields(kernel = kernel.name()))]
    fn render(&self, kernel: &Kernel) -> Result<RenderedKernel> {
        ensure_resolved(kernel)?;
        let Some(schedule) = kernel.schedule() else {
            return crate::NotScheduledSnafu { kernel: kernel.name() }.fail();
        };

        let entry_point = c_ident(kernel.name());
        let mut body = Body::new(self.indent);

        let (part_lines, tile_loop) = part_indices(schedule);
        let mut lines = part_lines.into_iter();
        if tile_loop && let Some(open) = lines.next() {
            body.open(open);
        }
        lines.for_each(|l| body.line(l));

        for data in kernel.data_items().filter(|d| d.geometry().is_some_and(|g| !g.is_empty())) {
            body.line(format!("/* {}:{} */", data.name(), data.pattern()));
            geometry_lines(kernel, data).into_iter().for_each(|l| body.line(l));
        }

        for usage in &schedule.buffers {
            let data = kernel.data(usage.data);
            let elems = usage.bytes / data.elem_bytes().max(1);
            body.line(format!("__local {} {}[{elems}];", data.dtype().c_style(), c_buffer(data)));
        }

        let mut current_cycle = None;
        for &node_id in &schedule.node_order {
            let node = kernel.node(node_id);
            let output = kernel.data(node.output());
            let cycle = output.pattern().scheduling_cycle();
            if cycle != current_cycle {
                body.line(format!("/* cycle {} */", cycle.unwrap_or(0)));
                current_cycle = cycle;
            }
            let operands = kernel
                .input_edges(node_id)
                .map(|e| c_operand(kernel.data(e.source())))
                .chain(node.control_params().iter().map(|&c| c_ident(kernel.data(c).name())))
                .chain(std::iter::once(c_operand(output)))
                .join(", ");
            body.line(format!("{}({operands});", node.mangled_name()));
        }

        if tile_loop {
            body.close();
        }

        let mut rendered = RenderedKernel::new(String::new(), entry_point.clone(), kernel.name().to_string());
        let params = signature(kernel, &mut rendered);
        rendered.code = format!(
            "{}\n__kernel void {entry_point}({}) {{\n{}}}\n",
            header(kernel.name(), schedule),
            params.join(", "),
            body.finish()
        );
        rendered.set_work_sizes(
            [schedule.work_groups * schedule.work_items, 1, 1],
            [schedule.work_items, 1, 1],
        );

        debug!(bytes = rendered.code.len(), args = rendered.args.len(), "kernel rendered");
        Ok(rendered)
    }

    fn backend_name(&self) -> &str {
        "opencl"
    }

    fn file_extension(&self) -> &str {
        "cl"
    }
}

fn header(name: &str, schedule: &KernelSchedule) -> String {
    let parts = schedule.partitions.iter().map(|p| p.parts).join("x");
    format!(
        "/* kernel '{name}': {} {} parts={parts} work-groups={} work-items={} depth={} local={}B */",
        schedule.mode,
        schedule.scan_order,
        schedule.work_groups,
        schedule.work_items,
        schedule.pipeline_depth,
        schedule.local_memory_bytes()
    )
}

/// Entry point parameters: kernel inputs in declaration order, then outputs.
fn signature(kernel: &Kernel, rendered: &mut RenderedKernel) -> Vec<String> {
    let ids = kernel.inputs().iter().copied().chain(kernel.outputs());
    ids.enumerate()
        .map(|(index, id)| {
            let data = kernel.data(id);
            let kind = if data.is_control() {
                ArgKind::Control
            } else if data.is_input() {
                ArgKind::Input
            } else {
                ArgKind::Output
            };
            rendered.add_arg(KernelArg { index, name: data.name().to_string(), dtype: data.dtype(), kind });
            c_param(data)
        })
        .collect()
}

/// Indented statement list.
struct Body {
    step: usize,
    depth: usize,
    text: String,
}

impl Body {
    fn new(step: usize) -> Self {
        Self { step, depth: 1, text: String::new() }
    }

    fn line(&mut self, line: impl AsRef<str>) {
        self.text.push_str(&" ".repeat(self.step * self.depth));
        self.text.push_str(line.as_ref());
        self.text.push('\n');
    }

    fn open(&mut self, line: impl AsRef<str>) {
        self.line(line);
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1).max(1);
        self.line("}");
    }

    fn finish(self) -> String {
        self.text
    }
}

/// Render `kernel` with the default [`CRenderer`].
pub fn render(kernel: &Kernel) -> Result<RenderedKernel> {
    use crate::Renderer;
    CRenderer::new().render(kernel)
}
