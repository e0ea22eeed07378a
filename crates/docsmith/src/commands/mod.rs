//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod scaffold;

pub(crate) use build::BuildArgs;
pub(crate) use scaffold::ScaffoldArgs;
