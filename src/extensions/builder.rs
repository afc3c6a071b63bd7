//! Extension Builder Orchestration
//!
//! Drives one Bazel build per extension target and stages the resulting
//! module into the package tree. Targets are handled one at a time in
//! declaration order and the first failure aborts the whole run.
//!
//! Per target:
//! ```bash
//! mkdir -p <build_temp>
//! bazel build //saildb:_core \
//!     --symlink_prefix=<build_temp>/bazel- \
//!     --compilation_mode=opt \
//!     --linkopt=/LIBPATH:<lib_dir>
//! cp <build_temp>/bazel-bin/saildb/_core.so <package_root>/saildb/_core.so
//! ```

use super::runner::{Invocation, ProcessRunner};
use super::target::ExtensionTarget;
use super::types::{BuildReport, CompilationMode, TargetState};
use crate::debug::debug_output;
use indicatif::{ProgressBar, ProgressStyle};
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Default build tool executable
pub const DEFAULT_BUILD_TOOL: &str = "bazel";

/// Errors that abort an extension build
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Failed to create staging directory {}: {source}", path.display())]
    Staging {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to resolve library directory {}: {source}", path.display())]
    LibraryDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("External build failed for {target}: {reason}\n  command: {command}")]
    ExternalBuildFailed {
        target: String,
        command: String,
        reason: String,
        output: String,
        #[source]
        source: Option<io::Error>,
    },

    #[error(
        "Build of {target} reported success but no artifact exists at {}; \
         the build tool's output layout does not match bazel-bin/<path>/<name>",
        path.display()
    )]
    ArtifactNotFound { target: String, path: PathBuf },

    #[error("Failed to install {target} to {}: {source}", path.display())]
    Install {
        target: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Settings shared by every target in a build
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Build tool executable
    pub tool: OsString,
    /// Directory the build tool works in (the Bazel workspace)
    pub workspace: Option<PathBuf>,
    /// Scratch directory holding the build tool's output symlinks
    pub build_temp: PathBuf,
    /// Root of the installable package tree
    pub package_root: PathBuf,
    /// Debug or optimized compilation
    pub mode: CompilationMode,
    /// Extra linker search directories
    pub library_dirs: Vec<PathBuf>,
    /// Native module suffix, e.g. `.so`
    pub suffix: String,
}

impl BuildOptions {
    /// Options with the default tool, host suffix and release mode.
    pub fn new(build_temp: impl Into<PathBuf>, package_root: impl Into<PathBuf>) -> Self {
        Self {
            tool: OsString::from(DEFAULT_BUILD_TOOL),
            workspace: None,
            build_temp: build_temp.into(),
            package_root: package_root.into(),
            mode: CompilationMode::default(),
            library_dirs: Vec::new(),
            suffix: crate::platform::extension_suffix().to_string(),
        }
    }
}

/// Extension build bridge
///
/// Generic over the [`ProcessRunner`] so tests can stand in for Bazel.
#[derive(Debug)]
pub struct ExtensionBuilder<R> {
    runner: R,
    options: BuildOptions,
    /// Show a spinner while the build tool runs
    progress: bool,
}

impl<R: ProcessRunner> ExtensionBuilder<R> {
    pub const fn new(runner: R, options: BuildOptions) -> Self {
        Self {
            runner,
            options,
            progress: false,
        }
    }

    /// Enable or disable the progress spinner.
    #[must_use]
    pub const fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Assemble the build tool command line for `target`.
    pub fn invocation(&self, target: &ExtensionTarget) -> Result<Invocation, BuildError> {
        let opts = &self.options;

        let mut symlink_prefix = OsString::from("--symlink_prefix=");
        symlink_prefix.push(opts.build_temp.join("bazel-"));

        let mut inv = Invocation::new(opts.tool.clone())
            .arg("build")
            .arg(target.qualified_target())
            .arg(symlink_prefix)
            .arg(format!("--compilation_mode={}", opts.mode.as_flag_value()));

        for dir in &opts.library_dirs {
            let abs = std::path::absolute(dir).map_err(|source| BuildError::LibraryDir {
                path: dir.clone(),
                source,
            })?;
            let mut linkopt = OsString::from("--linkopt=/LIBPATH:");
            linkopt.push(abs);
            inv = inv.arg(linkopt);
        }

        if let Some(workspace) = &opts.workspace {
            inv = inv.current_dir(workspace);
        }

        Ok(inv)
    }

    /// Where the build tool is expected to leave the artifact for `target`.
    #[must_use]
    pub fn artifact_path(&self, target: &ExtensionTarget) -> PathBuf {
        self.options
            .build_temp
            .join(target.artifact_relative_path(&self.options.suffix))
    }

    /// Where the artifact for `target` is installed.
    #[must_use]
    pub fn destination_path(&self, target: &ExtensionTarget) -> PathBuf {
        self.options
            .package_root
            .join(target.install_relative_path(&self.options.suffix))
    }

    /// Build one target and install its artifact.
    pub fn build(&self, target: &ExtensionTarget) -> Result<BuildReport, BuildError> {
        let start_time = Instant::now();
        let mut state = TargetState::Pending;

        let result = self.run_steps(target, &mut state);
        if result.is_err() {
            advance(target, &mut state, TargetState::Failed);
        }
        debug_assert!(state.is_terminal(), "{target} left {state}");
        let (artifact, installed, output) = result?;

        Ok(BuildReport {
            target: target.qualified_target().to_string(),
            state,
            artifact,
            installed,
            duration: start_time.elapsed(),
            output,
        })
    }

    fn run_steps(
        &self,
        target: &ExtensionTarget,
        state: &mut TargetState,
    ) -> Result<(PathBuf, PathBuf, String), BuildError> {
        let build_temp = &self.options.build_temp;
        ensure_dir(build_temp).map_err(|source| BuildError::Staging {
            path: build_temp.clone(),
            source,
        })?;
        advance(target, state, TargetState::Staged);

        let inv = self.invocation(target)?;
        let output = self.run_build(target, &inv)?;
        advance(target, state, TargetState::Built);

        let artifact = self.artifact_path(target);
        if !artifact.is_file() {
            return Err(BuildError::ArtifactNotFound {
                target: target.qualified_target().to_string(),
                path: artifact,
            });
        }
        advance(target, state, TargetState::Located);

        let installed = self.destination_path(target);
        install_artifact(&artifact, &installed).map_err(|source| BuildError::Install {
            target: target.qualified_target().to_string(),
            path: installed.clone(),
            source,
        })?;
        advance(target, state, TargetState::Installed);

        Ok((artifact, installed, output))
    }

    fn run_build(&self, target: &ExtensionTarget, inv: &Invocation) -> Result<String, BuildError> {
        crate::debug!("Running: {inv}");

        let spinner = self.progress.then(|| {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{elapsed}]") {
                pb.set_style(style);
            }
            pb.set_message(format!("Building {target}"));
            pb.enable_steady_tick(Duration::from_millis(120));
            pb
        });

        let result = self.runner.run(inv);

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        let failed = |reason: String, output: String, source: Option<io::Error>| {
            BuildError::ExternalBuildFailed {
                target: target.qualified_target().to_string(),
                command: inv.to_string(),
                reason,
                output,
                source,
            }
        };

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                let reason = format!("could not start {}", inv.program.to_string_lossy());
                return Err(failed(reason, String::new(), Some(e)));
            }
        };

        let combined = output.combined();
        debug_output("bazel", &combined);

        if !output.success() {
            let reason = output.code.map_or_else(
                || "terminated by signal".to_string(),
                |code| format!("exit status {code}"),
            );
            return Err(failed(reason, combined, None));
        }

        Ok(combined)
    }

    /// Build every target in order, stopping at the first error.
    pub fn build_all(&self, targets: &[ExtensionTarget]) -> Result<Vec<BuildReport>, BuildError> {
        targets.iter().map(|target| self.build(target)).collect()
    }

    /// Number of installed targets and the total build time.
    #[must_use]
    pub fn summarize(reports: &[BuildReport]) -> (usize, Duration) {
        let installed = reports
            .iter()
            .filter(|r| r.state == TargetState::Installed)
            .count();
        let total = reports.iter().map(|r| r.duration).sum();
        (installed, total)
    }
}

fn advance(target: &ExtensionTarget, state: &mut TargetState, next: TargetState) {
    debug_assert!(state.can_advance_to(next), "{state} -> {next}");
    crate::debug!("{target}: {state} -> {next}");
    *state = next;
}

/// Create `dir` and its parents; an existing directory is fine.
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    std::fs::create_dir_all(dir)
}

/// Copy `artifact` to `dest`, creating parent directories first.
pub fn install_artifact(artifact: &Path, dest: &Path) -> io::Result<()> {
    if let Some(parent) = dest.parent() {
        ensure_dir(parent)?;
    }
    std::fs::copy(artifact, dest)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extensions::runner::ProcessOutput;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    /// Stands in for Bazel: records invocations, optionally writes an
    /// artifact, then exits with a fixed code.
    #[derive(Debug)]
    struct FakeBazel {
        code: Option<i32>,
        spawn_fails: bool,
        artifact: Option<(PathBuf, Vec<u8>)>,
        calls: RefCell<Vec<Invocation>>,
    }

    impl FakeBazel {
        fn exits(code: i32) -> Self {
            Self {
                code: Some(code),
                spawn_fails: false,
                artifact: None,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn producing(path: PathBuf, bytes: &[u8]) -> Self {
            Self {
                artifact: Some((path, bytes.to_vec())),
                ..Self::exits(0)
            }
        }

        fn unspawnable() -> Self {
            Self {
                spawn_fails: true,
                ..Self::exits(0)
            }
        }

        fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl ProcessRunner for FakeBazel {
        fn run(&self, invocation: &Invocation) -> io::Result<ProcessOutput> {
            self.calls.borrow_mut().push(invocation.clone());
            if self.spawn_fails {
                return Err(io::Error::new(io::ErrorKind::NotFound, "bazel not found"));
            }
            if let Some((path, bytes)) = &self.artifact {
                fs::create_dir_all(path.parent().unwrap())?;
                fs::write(path, bytes)?;
            }
            Ok(ProcessOutput {
                code: self.code,
                stdout: "INFO: Build completed\n".to_string(),
                stderr: String::new(),
            })
        }
    }

    fn options(dir: &TempDir) -> BuildOptions {
        let mut opts = BuildOptions::new(dir.path().join("build"), dir.path().join("pkg"));
        opts.suffix = ".so".to_string();
        opts
    }

    fn core_target() -> ExtensionTarget {
        ExtensionTarget::parse("//saildb:_core").unwrap()
    }

    #[test]
    fn release_invocation_uses_opt() {
        let dir = TempDir::new().unwrap();
        let builder = ExtensionBuilder::new(FakeBazel::exits(0), options(&dir));

        let inv = builder.invocation(&core_target()).unwrap();

        assert_eq!(inv.program, "bazel");
        assert!(inv.has_arg("--compilation_mode=opt"));
        assert!(!inv.has_arg("--compilation_mode=dbg"));
        assert_eq!(
            inv.args.first().map(|a| a.to_string_lossy().into_owned()),
            Some("build".to_string())
        );
        assert_eq!(
            inv.args.get(1).map(|a| a.to_string_lossy().into_owned()),
            Some("//saildb:_core".to_string())
        );
    }

    #[test]
    fn debug_invocation_uses_dbg() {
        let dir = TempDir::new().unwrap();
        let mut opts = options(&dir);
        opts.mode = CompilationMode::Debug;
        let builder = ExtensionBuilder::new(FakeBazel::exits(0), opts);

        let inv = builder.invocation(&core_target()).unwrap();

        assert!(inv.has_arg("--compilation_mode=dbg"));
        assert!(!inv.has_arg("--compilation_mode=opt"));
    }

    #[test]
    fn invocation_points_symlinks_into_staging_dir() {
        let dir = TempDir::new().unwrap();
        let builder = ExtensionBuilder::new(FakeBazel::exits(0), options(&dir));

        let inv = builder.invocation(&core_target()).unwrap();

        let expected = format!(
            "--symlink_prefix={}",
            dir.path().join("build").join("bazel-").display()
        );
        assert!(inv.has_arg(&expected), "{inv}");
    }

    #[test]
    fn library_dirs_become_absolute_linkopts() {
        let dir = TempDir::new().unwrap();
        let mut opts = options(&dir);
        opts.library_dirs = vec![dir.path().join("libs"), PathBuf::from("relative/libs")];
        let builder = ExtensionBuilder::new(FakeBazel::exits(0), opts);

        let inv = builder.invocation(&core_target()).unwrap();
        let linkopts: Vec<String> = inv
            .args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .filter(|a| a.starts_with("--linkopt=/LIBPATH:"))
            .collect();

        assert_eq!(linkopts.len(), 2);
        for opt in &linkopts {
            let path = opt.trim_start_matches("--linkopt=/LIBPATH:");
            assert!(Path::new(path).is_absolute(), "{opt}");
        }
        assert!(linkopts.iter().any(|o| o.ends_with("libs")));
    }

    #[test]
    fn installs_byte_identical_artifact() {
        let dir = TempDir::new().unwrap();
        let opts = options(&dir);
        let artifact = opts.build_temp.join("bazel-bin/saildb/_core.so");
        let bytes = b"\x7fELF\x02\x01\x01\x00fake-module".to_vec();
        let builder = ExtensionBuilder::new(FakeBazel::producing(artifact.clone(), &bytes), opts);

        let report = builder.build(&core_target()).unwrap();

        assert_eq!(report.state, TargetState::Installed);
        assert_eq!(report.artifact, artifact);
        assert_eq!(report.installed, dir.path().join("pkg").join("saildb").join("_core.so"));
        assert!(report.output.contains("Build completed"));
        assert_eq!(fs::read(&report.installed).unwrap(), bytes);
        assert_eq!(fs::read(&report.installed).unwrap(), fs::read(&artifact).unwrap());
    }

    #[test]
    fn missing_artifact_is_reported_and_nothing_copied() {
        let dir = TempDir::new().unwrap();
        let builder = ExtensionBuilder::new(FakeBazel::exits(0), options(&dir));
        let target = core_target();

        let err = builder.build(&target).unwrap_err();

        assert!(matches!(err, BuildError::ArtifactNotFound { .. }));
        assert!(err.to_string().contains("bazel-bin"));
        assert!(!builder.destination_path(&target).exists());
    }

    #[test]
    fn nonzero_exit_fails_without_copy() {
        let dir = TempDir::new().unwrap();
        let opts = options(&dir);
        let artifact = opts.build_temp.join("bazel-bin/saildb/_core.so");
        let fake = FakeBazel {
            code: Some(1),
            ..FakeBazel::producing(artifact, b"partial")
        };
        let builder = ExtensionBuilder::new(fake, opts);
        let target = core_target();

        let err = builder.build(&target).unwrap_err();

        assert!(matches!(
            err,
            BuildError::ExternalBuildFailed { ref reason, .. } if reason == "exit status 1"
        ));
        assert!(!builder.destination_path(&target).exists());
    }

    #[test]
    fn spawn_failure_is_external_build_failure() {
        let dir = TempDir::new().unwrap();
        let builder = ExtensionBuilder::new(FakeBazel::unspawnable(), options(&dir));

        let err = builder.build(&core_target()).unwrap_err();

        assert!(matches!(
            err,
            BuildError::ExternalBuildFailed { source: Some(_), .. }
        ));
        assert!(err.to_string().contains("could not start bazel"));
    }

    #[test]
    fn staging_dir_is_created_and_reused() {
        let dir = TempDir::new().unwrap();
        let opts = options(&dir);
        fs::create_dir_all(&opts.build_temp).unwrap();
        let artifact = opts.build_temp.join("bazel-bin/saildb/_core.so");
        let builder = ExtensionBuilder::new(FakeBazel::producing(artifact, b"x"), opts);

        builder.build(&core_target()).unwrap();
        builder.build(&core_target()).unwrap();

        assert!(dir.path().join("build").is_dir());
        assert_eq!(builder.runner.call_count(), 2);
    }

    #[test]
    fn build_all_stops_at_first_failure() {
        let dir = TempDir::new().unwrap();
        let builder = ExtensionBuilder::new(FakeBazel::exits(0), options(&dir));
        let targets = vec![
            core_target(),
            ExtensionTarget::parse("//saildb:_extra").unwrap(),
        ];

        let err = builder.build_all(&targets).unwrap_err();

        assert!(matches!(
            err,
            BuildError::ArtifactNotFound { ref target, .. } if target == "//saildb:_core"
        ));
        assert_eq!(builder.runner.call_count(), 1);
    }

    #[test]
    fn summarize_reports() {
        let report = |secs| BuildReport {
            target: "//saildb:_core".to_string(),
            state: TargetState::Installed,
            artifact: PathBuf::new(),
            installed: PathBuf::new(),
            duration: Duration::from_secs(secs),
            output: String::new(),
        };

        let (count, total) =
            ExtensionBuilder::<FakeBazel>::summarize(&[report(1), report(2)]);
        assert_eq!(count, 2);
        assert_eq!(total, Duration::from_secs(3));

        let (count, total) = ExtensionBuilder::<FakeBazel>::summarize(&[]);
        assert_eq!(count, 0);
        assert_eq!(total, Duration::ZERO);
    }

    #[test]
    fn install_artifact_creates_parents() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src.so");
        fs::write(&src, b"module").unwrap();
        let dest = dir.path().join("a").join("b").join("dest.so");

        install_artifact(&src, &dest).unwrap();
        install_artifact(&src, &dest).unwrap();

        assert_eq!(fs::read(dest).unwrap(), b"module");
    }
}
