//! Common test utilities and helpers
//!
//! - Binary path resolution (via `get_sailbuild_binary`)
//! - Project fixtures and a scripted stand-in for Bazel (via `helpers`)

pub(crate) mod helpers;

pub(crate) use helpers::sailbuild;
