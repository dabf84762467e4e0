//! The compile-until-stable loop
//!
//! ```text
//! compile()
//!     ↓
//! 1. Create workspace, write temp.tex
//!     ↓
//! 2. Run engine (batch mode)        ──fail──> CompilationFailed (log or output)
//!     ↓ success
//! 3. Log mentions "run"? ──yes, passes left──> back to 2
//!     ↓ no (or pass limit reached)
//! 4. Read temp.<ext>                ──missing──> ArtifactMissing
//!     ↓
//! 5. Drop workspace, return bytes
//! ```

use latexlab_core::config::consts::engine::{DEFAULT_ENGINE, DEFAULT_MAX_PASSES};
use latexlab_core::config::{infer_output_extension, EngineConfig};
use latexlab_core::{LatexlabError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::exec::{ExecOptions, exec_engine};
use crate::workspace::CompileWorkspace;

/// Substring of the engine log that asks for another pass
///
/// Matched case-sensitively anywhere in the log ("Rerun to get
/// cross-references right", "Please rerun LaTeX", ...).
// TODO: parse the log's rerun warnings instead of matching a bare substring.
pub const RERUN_SIGNAL: &str = "run";

/// One compile call: the source plus how to drive the engine
#[derive(Debug, Clone, PartialEq)]
pub struct CompileRequest {
    source: String,
    engine: String,
    max_passes: u32,
    timeout: Option<Duration>,
    output_extension: Option<String>,
    scratch_dir: Option<PathBuf>,
}

impl CompileRequest {
    /// Request with the default engine and pass limit
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            engine: DEFAULT_ENGINE.to_string(),
            max_passes: DEFAULT_MAX_PASSES,
            timeout: None,
            output_extension: None,
            scratch_dir: None,
        }
    }

    /// Request driven by an `[engine]` config section
    ///
    /// `engine` overrides the configured default engine.
    pub fn from_config(source: impl Into<String>, config: &EngineConfig, engine: Option<&str>) -> Self {
        let engine = engine.unwrap_or(&config.default);
        Self::new(source)
            .engine(engine)
            .max_passes(config.max_passes)
            .timeout(config.timeout_secs.map(Duration::from_secs))
            .output_extension(config.output_extension_for(engine))
    }

    pub fn engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    pub fn max_passes(mut self, max_passes: u32) -> Self {
        self.max_passes = max_passes;
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn output_extension(mut self, extension: impl Into<String>) -> Self {
        self.output_extension = Some(extension.into().trim_start_matches('.').to_string());
        self
    }

    /// Create the workspace under `dir` instead of the system temp dir
    pub fn scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn engine_name(&self) -> &str {
        &self.engine
    }

    pub fn pass_limit(&self) -> u32 {
        self.max_passes
    }

    /// Extension of the artifact to collect
    pub fn artifact_extension(&self) -> String {
        self.output_extension
            .clone()
            .unwrap_or_else(|| infer_output_extension(&self.engine).to_string())
    }
}

/// Result of a successful compile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutput {
    pub artifact: Vec<u8>,
    /// Number of engine invocations
    pub passes: u32,
    /// `false` if the pass limit was hit while the log still asked for a rerun
    pub converged: bool,
}

/// Whether a pass log asks for another pass
pub fn needs_rerun(log: &str) -> bool {
    log.contains(RERUN_SIGNAL)
}

/// Compile and return the artifact bytes
pub fn compile(request: &CompileRequest) -> Result<Vec<u8>> {
    compile_with_report(request).map(|output| output.artifact)
}

/// Compile and report how many passes it took
///
/// Hitting the pass limit without convergence is not an error: the artifact
/// of the last pass is returned with `converged == false`.
pub fn compile_with_report(request: &CompileRequest) -> Result<CompileOutput> {
    if request.max_passes == 0 {
        return Err(LatexlabError::ConfigInvalidValue {
            field: "max_passes".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    if request.timeout.is_some_and(|t| t.is_zero()) {
        return Err(LatexlabError::ConfigInvalidValue {
            field: "timeout".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let workspace = CompileWorkspace::create(request.scratch_dir.as_deref())?;
    workspace.write_source(&request.source)?;

    let options = ExecOptions {
        program: request.engine.clone(),
        args: engine_args(workspace.path(), &workspace.source_path()),
        timeout: request.timeout,
    };

    let mut passes = 0;
    let mut converged = false;
    while passes < request.max_passes {
        passes += 1;
        tracing::debug!(pass = passes, command = %options.command_line(), "running engine");

        let result = exec_engine(&options)?;
        if !result.success {
            tracing::debug!(pass = passes, exit_code = ?result.exit_code, "engine failed");
            let log = workspace.read_log()?.unwrap_or(result.output);
            return Err(LatexlabError::CompilationFailed { log });
        }

        let log = workspace.read_log()?.unwrap_or_default();
        if !needs_rerun(&log) {
            converged = true;
            break;
        }
        tracing::debug!(pass = passes, duration_ms = result.duration_ms, "engine requested another pass");
    }

    if converged {
        tracing::info!(passes, engine = %request.engine, "compilation converged");
    } else {
        tracing::warn!(
            passes,
            engine = %request.engine,
            "pass limit reached before references stabilised; returning last artifact"
        );
    }

    let artifact = workspace.read_artifact(&request.artifact_extension())?;
    Ok(CompileOutput {
        artifact,
        passes,
        converged,
    })
}

/// `-output-directory <dir> -interaction=batchmode <source>`
fn engine_args(output_dir: &Path, source: &Path) -> Vec<OsString> {
    vec![
        "-output-directory".into(),
        output_dir.as_os_str().to_owned(),
        "-interaction=batchmode".into(),
        source.as_os_str().to_owned(),
    ]
}
