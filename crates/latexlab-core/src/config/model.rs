use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::consts::{engine, syntax};
use crate::error::{LatexlabError, Result};

/// latexlab.toml schema
///
/// Every section is optional; an empty file yields [`Config::default`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub syntax: Syntax,
    #[serde(default)]
    pub templates: TemplatesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Engine binary used when a compile call does not name one
    #[serde(default = "default_engine")]
    pub default: String,
    #[serde(default = "default_max_passes")]
    pub max_passes: u32,
    /// Per-pass timeout; unset means wait indefinitely
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Overrides the extension inferred from the engine name
    #[serde(default)]
    pub output_extension: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default: default_engine(),
            max_passes: default_max_passes(),
            timeout_secs: None,
            output_extension: None,
        }
    }
}

fn default_engine() -> String {
    engine::DEFAULT_ENGINE.to_string()
}

fn default_max_passes() -> u32 {
    engine::DEFAULT_MAX_PASSES
}

impl EngineConfig {
    /// Artifact extension for `engine`, honouring `output_extension`
    pub fn output_extension_for(&self, engine_name: &str) -> String {
        if let Some(ext) = &self.output_extension {
            return ext.trim_start_matches('.').to_string();
        }
        infer_output_extension(engine_name).to_string()
    }
}

/// Infer the artifact extension from an engine name or path
pub fn infer_output_extension(engine_name: &str) -> &'static str {
    let stem = Path::new(engine_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(engine_name);
    if engine::DVI_ENGINES.contains(&stem) {
        "dvi"
    } else {
        engine::PDF_EXTENSION
    }
}

/// Template delimiters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Syntax {
    pub block_start: String,
    pub block_end: String,
    pub variable_start: String,
    pub variable_end: String,
    pub comment_start: String,
    pub comment_end: String,
}

impl Default for Syntax {
    fn default() -> Self {
        Self {
            block_start: syntax::BLOCK_START.to_string(),
            block_end: syntax::BLOCK_END.to_string(),
            variable_start: syntax::VARIABLE_START.to_string(),
            variable_end: syntax::VARIABLE_END.to_string(),
            comment_start: syntax::COMMENT_START.to_string(),
            comment_end: syntax::COMMENT_END.to_string(),
        }
    }
}

impl Syntax {
    /// Reject empty delimiters and ambiguous openers
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("syntax.block_start", &self.block_start),
            ("syntax.block_end", &self.block_end),
            ("syntax.variable_start", &self.variable_start),
            ("syntax.variable_end", &self.variable_end),
            ("syntax.comment_start", &self.comment_start),
            ("syntax.comment_end", &self.comment_end),
        ];
        for (field, value) in fields {
            if value.is_empty() {
                return Err(LatexlabError::ConfigInvalidValue {
                    field: field.to_string(),
                    reason: "delimiter must not be empty".to_string(),
                });
            }
        }

        let openers = [&self.block_start, &self.variable_start, &self.comment_start];
        for (i, a) in openers.iter().enumerate() {
            for b in &openers[i + 1..] {
                if a == b {
                    return Err(LatexlabError::ConfigInvalidValue {
                        field: "syntax".to_string(),
                        reason: format!("opening delimiter '{}' is used twice", a),
                    });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TemplatesConfig {
    /// Directory that named templates are loaded from
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Read and validate latexlab.toml
    ///
    /// A relative `templates.dir` is resolved against the file's directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LatexlabError::ConfigParseError(format!("{}: {}", path.display(), e))
        })?;

        let mut config = Self::from_toml_str(&content)?;
        if let (Some(dir), Some(base)) = (&config.templates.dir, path.parent()) {
            if dir.is_relative() {
                config.templates.dir = Some(base.join(dir));
            }
        }
        Ok(config)
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.engine.max_passes == 0 {
            return Err(LatexlabError::ConfigInvalidValue {
                field: "engine.max_passes".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.engine.timeout_secs == Some(0) {
            return Err(LatexlabError::ConfigInvalidValue {
                field: "engine.timeout_secs".to_string(),
                reason: "must be at least 1 second; omit it to wait indefinitely".to_string(),
            });
        }
        if self.engine.default.trim().is_empty() {
            return Err(LatexlabError::ConfigInvalidValue {
                field: "engine.default".to_string(),
                reason: "engine name must not be empty".to_string(),
            });
        }
        self.syntax.validate()
    }

    /// Write latexlab.toml
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| LatexlabError::ConfigParseError(e.to_string()))?;

        std::fs::write(path.as_ref(), content)?;

        Ok(())
    }
}
