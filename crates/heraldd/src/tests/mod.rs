//! Test suites for the lifecycle controller and its collaborators.

mod behaviour;
pub(crate) mod support;
