//! C spelling of kernel data.

use kgen_ir::KernelData;

/// `name` with every character outside `[A-Za-z0-9_]` replaced by `_`.
pub fn c_ident(name: &str) -> String {
    let ident: String = name.chars().map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' }).collect();
    match ident.chars().next() {
        Some(c) if c.is_ascii_digit() => format!("_{ident}"),
        _ => ident,
    }
}

/// Entry point parameter declaring `data`.
pub fn c_param(data: &KernelData) -> String {
    let ty = data.dtype().c_style();
    let name = c_ident(data.name());
    if data.is_control() {
        format!("const {ty} {name}")
    } else if data.is_input() {
        format!("__global const {ty} *{name}")
    } else {
        format!("__global {ty} *{name}")
    }
}

/// Name of the local buffer of `data`.
pub fn c_buffer(data: &KernelData) -> String {
    format!("kg_buf_{}", c_ident(data.name()))
}

/// Expression a node call passes for `data`.
pub fn c_operand(data: &KernelData) -> String {
    if data.pattern().access_type().is_buffered() { c_buffer(data) } else { c_ident(data.name()) }
}
