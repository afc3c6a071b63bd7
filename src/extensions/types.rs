//! Extension build type definitions

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Compilation mode passed to the build tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompilationMode {
    /// Unoptimized build with debug symbols (`dbg`)
    Debug,
    /// Optimized build (`opt`)
    #[default]
    Release,
}

impl CompilationMode {
    /// Pick the mode from a debug flag.
    #[must_use]
    pub const fn from_debug(debug: bool) -> Self {
        if debug { Self::Debug } else { Self::Release }
    }

    /// Value used for `--compilation_mode=`
    #[must_use]
    pub const fn as_flag_value(self) -> &'static str {
        match self {
            Self::Debug => "dbg",
            Self::Release => "opt",
        }
    }
}

/// Progress of a single target through the bridge.
///
/// A target moves `Pending -> Staged -> Built -> Located -> Installed`.
/// Any failed step moves it to `Failed`; nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    /// Declared, nothing done yet
    Pending,
    /// Staging directory exists
    Staged,
    /// Build tool exited successfully
    Built,
    /// Output artifact found at the expected path
    Located,
    /// Artifact copied into the package tree
    Installed,
    /// A step failed
    Failed,
}

impl TargetState {
    /// Whether `next` is a legal successor of `self`.
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Staged)
                | (Self::Staged, Self::Built)
                | (Self::Built, Self::Located)
                | (Self::Located, Self::Installed)
                | (
                    Self::Pending | Self::Staged | Self::Built | Self::Located,
                    Self::Failed
                )
        )
    }

    /// Whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Installed | Self::Failed)
    }
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Staged => "staged",
            Self::Built => "built",
            Self::Located => "located",
            Self::Installed => "installed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of building and installing one extension
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Qualified target identifier (e.g. `//saildb:_core`)
    pub target: String,

    /// Final state of the target
    pub state: TargetState,

    /// Artifact produced by the build tool
    pub artifact: PathBuf,

    /// Where the artifact was installed
    pub installed: PathBuf,

    /// Wall time spent on the target
    pub duration: Duration,

    /// Build tool output (stdout + stderr)
    pub output: String,
}
