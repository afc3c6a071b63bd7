//! sailbuild internal library code

pub mod config;
pub mod debug;
pub mod env_vars;
pub mod extensions;
pub mod metadata;
pub mod platform;
pub mod settings;
pub mod version;

// Re-export common types for convenience
pub use config::{BuildConfig, Config, PackageConfig};
pub use debug::{init_debug, is_debug_enabled};
pub use extensions::{
    BuildError, BuildOptions, BuildReport, CompilationMode, ExtensionBuilder, ExtensionTarget,
    Invocation, ProcessOutput, ProcessRunner, SystemRunner, TargetError, TargetState,
};
pub use metadata::PackageMetadata;
pub use settings::{CliOverrides, EnvOverrides, ResolvedBuild, resolve_build};
pub use version::{VersionError, read_package_version};
