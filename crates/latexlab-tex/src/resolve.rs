//! Locating engine binaries (used by `latexlab doctor`)

use std::path::Path;
use std::process::{Command, Stdio};

use crate::info::EngineInfo;

/// Resolve `engine` to a binary on `PATH` (or an explicit path)
///
/// Returns `None` when the engine cannot be found. This is only a diagnostic
/// aid; compiling never requires it, the spawn itself reports a missing engine.
pub fn locate_engine(engine: &str) -> Option<EngineInfo> {
    let path = which::which(engine).ok()?;
    let version = query_version(&path);
    Some(EngineInfo {
        name: engine.to_string(),
        path,
        version,
    })
}

/// Run `<engine> --version` and keep the first line
fn query_version(path: &Path) -> Option<String> {
    let output = Command::new(path)
        .arg("--version")
        .stdin(Stdio::null())
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    parse_version_line(&String::from_utf8_lossy(&output.stdout))
}

/// First non-empty line of `--version` output
///
/// TeX engines print e.g. "pdfTeX 3.141592653-2.6-1.40.25 (TeX Live 2023)".
fn parse_version_line(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
