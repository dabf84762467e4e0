use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::template::TemplateError;

#[derive(Error, Debug)]
pub enum LatexlabError {
    // Template errors
    #[error("TEMPLATE_ERROR: {0}")]
    Template(#[from] TemplateError),

    #[error("TEMPLATE_NOT_FOUND: template '{0}' not found")]
    TemplateNotFound(String),

    #[error("TEMPLATE_PATH_ESCAPE: template path '{path}' resolves outside the template directory")]
    TemplatePathEscape { path: PathBuf },

    // Engine errors
    #[error("ENGINE_NOT_FOUND: the command '{command}' failed. Is everything installed?")]
    EngineNotFound { command: String },

    /// `log` is the engine log, or the captured output when no log was written
    #[error("COMPILATION_FAILED: Something went wrong during compilation!\n\n{log}")]
    CompilationFailed { log: String },

    #[error("ARTIFACT_MISSING: engine finished but '{}' was not produced", path.display())]
    ArtifactMissing { path: PathBuf },

    #[error("ENGINE_TIMED_OUT: '{command}' did not finish within {:.2}s", timeout.as_secs_f64())]
    EngineTimedOut { command: String, timeout: Duration },

    // Config errors
    #[error("CONFIG_PARSE_ERROR: {0}")]
    ConfigParseError(String),

    #[error("CONFIG_INVALID_VALUE: {field}: {reason}")]
    ConfigInvalidValue { field: String, reason: String },

    // IO errors
    #[error("IO_ERROR: {0}")]
    Io(#[from] std::io::Error),
}

impl LatexlabError {
    /// Diagnostic text attached to the error, if any
    pub fn log(&self) -> Option<&str> {
        match self {
            LatexlabError::CompilationFailed { log } => Some(log),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for LatexlabError {
    fn from(err: toml::de::Error) -> Self {
        LatexlabError::ConfigParseError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LatexlabError>;
