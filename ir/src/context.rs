//! Per-compilation-unit mutable state.
//!
//! One context exists per input file. It owns the diagnostics sink and the
//! counters used for node ids and name mangling, and is handed explicitly
//! to every component (and moved into the worker compiling that file), so
//! concurrently compiled files never share counters.

use crate::diagnostics::Diagnostics;

#[derive(Debug)]
pub struct UnitContext {
    name: String,
    pub diagnostics: Diagnostics,
    next_node_id: u32,
    next_mangle: u32,
}

impl UnitContext {
    pub fn new(name: impl Into<String>, diagnostics: Diagnostics) -> Self {
        Self { name: name.into(), diagnostics, next_node_id: 0, next_mangle: 0 }
    }

    /// Compilation unit name (usually the input file).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fresh node id, unique within the unit.
    pub fn next_node_id(&mut self) -> u32 {
        let id = self.next_node_id;
        self.next_node_id += 1;
        id
    }

    /// Fresh compute-function symbol for `base`, unique within the unit.
    pub fn mangle(&mut self, base: &str) -> String {
        let n = self.next_mangle;
        self.next_mangle += 1;
        format!("compute_{n}_{base}")
    }
}

impl Default for UnitContext {
    fn default() -> Self {
        Self::new("<unit>", Diagnostics::default())
    }
}
