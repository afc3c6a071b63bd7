//! Subcommand implementations

pub(crate) mod build_ext;
pub(crate) mod completion;
pub(crate) mod metadata;
pub(crate) mod version;
