//! Property-based tests for the IR arithmetic and graph invariants.
