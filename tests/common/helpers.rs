//! Shared test helpers and utilities

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Get the path to the compiled sailbuild binary
pub(crate) fn get_sailbuild_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_sailbuild"))
}

/// A sailbuild command with environment overrides cleared
pub(crate) fn sailbuild(project: &Path) -> Command {
    let mut cmd = Command::new(get_sailbuild_binary());
    cmd.arg("--project")
        .arg(project)
        .env_remove("BAZEL")
        .env_remove("SAILBUILD_BUILD_TEMP")
        .env_remove("SAILBUILD_LIBRARY_DIRS")
        .env_remove("SAILBUILD_DEBUG");
    cmd
}

/// Create a project laid out like the saildb repository
///
/// Writes `saildb/__init__.py` with the given version line, a README and a
/// `sailbuild.toml` that pins the artifact suffix to `.so`.
#[allow(dead_code)]
pub(crate) fn create_project(version_line: &str) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let pkg = dir.path().join("saildb");
    fs::create_dir_all(&pkg).expect("Failed to create package dir");

    let init = format!(
        "\"\"\"saildb interface\"\"\"\n\nfrom ._core import (\n  __doc__,\n  try_dot_env\n)\n\n{version_line}\n\n__all__ = ['__doc__', '__version__', 'try_dot_env']\n"
    );
    fs::write(pkg.join("__init__.py"), init).expect("Failed to write __init__.py");
    fs::write(dir.path().join("README.md"), "# saildb\n\nTest library\n")
        .expect("Failed to write README.md");
    fs::write(
        dir.path().join("sailbuild.toml"),
        r#"[package]
name = "saildb"
url = "https://github.com/test/test"
description = "Test library"
author = "test"
author_email = "test@test.com"
license = "MIT"
keywords = ["test"]

[build]
targets = ["//saildb:_core"]
artifact_suffix = ".so"
"#,
    )
    .expect("Failed to write sailbuild.toml");

    dir
}

/// Write an executable shell script that pretends to be Bazel
///
/// The script records its arguments in `bazel-args.txt` next to itself,
/// optionally writes `<symlink_prefix>bin/saildb/_core.so`, then exits
/// with `exit_code`.
#[cfg(unix)]
#[allow(dead_code)]
pub(crate) fn create_fake_bazel(dir: &Path, produce_artifact: bool, exit_code: i32) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let produce = if produce_artifact {
        "mkdir -p \"${prefix}bin/saildb\"\nprintf 'compiled-module' > \"${prefix}bin/saildb/_core.so\"\n"
    } else {
        ""
    };
    let script = format!(
        r#"#!/bin/sh
printf '%s\n' "$@" > "$(dirname "$0")/bazel-args.txt"
prefix=""
for arg in "$@"; do
  case "$arg" in
    --symlink_prefix=*) prefix="${{arg#--symlink_prefix=}}" ;;
  esac
done
echo "INFO: Analyzed target $2"
{produce}echo "fake bazel finished" >&2
exit {exit_code}
"#
    );

    let path = dir.join("fake-bazel.sh");
    fs::write(&path, script).expect("Failed to write fake bazel");
    let mut perms = fs::metadata(&path).expect("stat fake bazel").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("chmod fake bazel");
    path
}

/// Arguments recorded by the fake Bazel, one per line
#[allow(dead_code)]
pub(crate) fn recorded_args(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join("bazel-args.txt"))
        .map(|s| s.lines().map(str::to_string).collect())
        .unwrap_or_default()
}
