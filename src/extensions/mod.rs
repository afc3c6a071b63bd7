//! Native extension building
//!
//! Compiles the package's native extension modules with Bazel and copies the
//! results into the installable package tree.
//!
//! - [`target`] parses `//<path>:<name>` labels into [`ExtensionTarget`]s
//! - [`runner`] abstracts process execution behind [`ProcessRunner`]
//! - [`builder`] runs the build and installs each artifact

pub mod builder;
pub mod runner;
pub mod target;
pub mod types;

pub use builder::{BuildError, BuildOptions, DEFAULT_BUILD_TOOL, ExtensionBuilder};
pub use runner::{Invocation, ProcessOutput, ProcessRunner, SystemRunner};
pub use target::{ExtensionTarget, TargetError, parse_targets};
pub use types::{BuildReport, CompilationMode, TargetState};
