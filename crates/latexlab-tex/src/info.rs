use serde::Serialize;
use std::path::PathBuf;

/// An engine binary found on the system
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EngineInfo {
    pub name: String,
    pub path: PathBuf,
    /// First line of `<engine> --version`, if the engine answered
    pub version: Option<String>,
}
