//! Multi-step workflows: the page-creation state machine and the
//! resolve-then-mutate management operations.

pub mod create;
pub mod management;
