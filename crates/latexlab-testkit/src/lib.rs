//! Test utilities shared across the latexlab workspace
//!
//! Scratch directories under `.tmp/` and, on Unix, fake LaTeX engines.

#[cfg(unix)]
mod engine;

#[cfg(unix)]
pub use engine::{FakeEngine, FakeEngineBuilder};

use tempfile::TempDir;

/// Scratch directory under `.tmp/` in the current crate, removed on drop
///
/// Compile tests pass it as the workspace parent so leftovers can be counted.
///
/// # Panics
///
/// Panics if `.tmp/` or the directory inside it cannot be created.
pub fn temp_dir_in_workspace() -> TempDir {
    try_temp_dir_in_workspace().expect("Failed to create temporary directory in .tmp/")
}

/// Fallible form of [`temp_dir_in_workspace`]
pub fn try_temp_dir_in_workspace() -> std::io::Result<TempDir> {
    let workspace_root = std::env::current_dir()?;
    let tmp_base = workspace_root.join(".tmp");
    std::fs::create_dir_all(&tmp_base)?;
    TempDir::new_in(&tmp_base)
}

/// Number of entries directly inside `dir`
///
/// Used to assert that compile workspaces leave nothing behind.
pub fn count_entries(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| entries.count())
        .unwrap_or(0)
}
