//! Template stores used by `render_named` / `compile_named`

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use crate::error::{LatexlabError, Result};

/// Source of named templates
pub trait TemplateSource: Send + Sync {
    /// Load the template text registered under `name`
    fn load(&self, name: &str) -> Result<String>;
}

/// Loads templates from files below a root directory
///
/// Names are relative paths (`letters/invoice.tex`). Absolute names and names
/// that climb out of the root with `..` are rejected.
#[derive(Debug, Clone)]
pub struct FileSystemLoader {
    root: PathBuf,
}

impl FileSystemLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> Result<PathBuf> {
        let relative = Path::new(name);
        let escapes = relative.components().any(|c| {
            matches!(
                c,
                Component::RootDir | Component::Prefix(_) | Component::ParentDir
            )
        });
        if relative.is_absolute() || escapes {
            return Err(LatexlabError::TemplatePathEscape {
                path: relative.to_path_buf(),
            });
        }
        Ok(self.root.join(relative))
    }
}

impl TemplateSource for FileSystemLoader {
    fn load(&self, name: &str) -> Result<String> {
        let path = self.resolve(name)?;
        if !path.is_file() {
            return Err(LatexlabError::TemplateNotFound(name.to_string()));
        }
        tracing::debug!("loading template '{}' from {}", name, path.display());
        Ok(std::fs::read_to_string(path)?)
    }
}

/// In-memory template store
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    templates: HashMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, template: impl Into<String>) {
        self.templates.insert(name.into(), template.into());
    }

    pub fn with_template(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.insert(name, template);
        self
    }
}

impl TemplateSource for MemoryLoader {
    fn load(&self, name: &str) -> Result<String> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| LatexlabError::TemplateNotFound(name.to_string()))
    }
}
