//! Property-based tests over generated stencil chains.

mod schedule_props;
