#![allow(dead_code)]

use std::path::PathBuf;

pub use jobdag_test_utils::{builders, init_tracing, write_script};

/// Path to a script under `demos/`.
pub fn demo_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("demos")
        .join(name)
}
