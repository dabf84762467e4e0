//! Global context for CLI commands

use anyhow::{Context as _, Result, anyhow, bail};
use latexlab_core::TemplateContext;
use latexlab_core::config::Config;
use latexlab_core::config::consts::CONFIG_FILE;
use latexlab_tex::Latexlab;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use toml::Value;

use crate::cli::DataArgs;

/// Loaded configuration plus global flags
pub struct Context {
    pub config: Config,
    /// File the config was read from; `None` means built-in defaults
    pub config_path: Option<PathBuf>,
    pub verbose: bool,
}

/// Where a template comes from
#[derive(Debug, PartialEq)]
pub enum TemplateRef {
    /// Contents of a file given on the command line
    Text(String),
    /// Name to look up under `templates.dir`
    Named(String),
}

impl Context {
    /// Load the config named by `--config`, else `./latexlab.toml` when it exists
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read, parsed or validated
    pub fn new(config_path: Option<PathBuf>, verbose: bool) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => Some(path),
            None => {
                let default = env::current_dir()?.join(CONFIG_FILE);
                default.is_file().then_some(default)
            }
        };

        let config = match &config_path {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("Failed to load config '{}'", path.display()))?,
            None => Config::default(),
        };
        tracing::debug!(path = ?config_path, engine = %config.engine.default, "configuration loaded");

        Ok(Self {
            config,
            config_path,
            verbose,
        })
    }

    pub fn latexlab(&self) -> Result<Latexlab> {
        Ok(Latexlab::new(self.config.clone())?)
    }

    /// A path that exists is read as a file; anything else is a stored template name
    pub fn resolve_template(&self, template: &Path) -> Result<TemplateRef> {
        if template.is_file() {
            let text = fs::read_to_string(template)
                .with_context(|| format!("Failed to read template '{}'", template.display()))?;
            return Ok(TemplateRef::Text(text));
        }
        if self.config.templates.dir.is_some() {
            return Ok(TemplateRef::Named(template.to_string_lossy().into_owned()));
        }
        bail!("Template '{}' not found", template.display())
    }
}

/// Build template bindings from `--data` and `--set`
///
/// `--set` values are applied after the data file and override it.
pub fn load_bindings(args: &DataArgs) -> Result<TemplateContext> {
    let mut table = match &args.data {
        Some(path) => read_data_file(path)?,
        None => toml::Table::new(),
    };

    for assignment in &args.set {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid --set '{}': expected KEY=VALUE", assignment))?;
        set_dotted(&mut table, key.trim(), Value::String(value.to_string()))?;
    }

    Ok(TemplateContext::from(table))
}

fn read_data_file(path: &Path) -> Result<toml::Table> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file '{}'", path.display()))?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&content)
            .with_context(|| format!("Failed to parse '{}'", path.display())),
        Some("json") => {
            let json: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse '{}'", path.display()))?;
            match Value::try_from(json) {
                Ok(Value::Table(table)) => Ok(table),
                Ok(_) => bail!("Data file '{}' must contain an object", path.display()),
                Err(e) => bail!("Data file '{}' cannot be used: {}", path.display(), e),
            }
        }
        _ => bail!(
            "Unsupported data file '{}': expected .toml or .json",
            path.display()
        ),
    }
}

fn set_dotted(table: &mut toml::Table, key: &str, value: Value) -> Result<()> {
    let mut parts = key.split('.').peekable();
    let mut current = table;

    while let Some(part) = parts.next() {
        if part.is_empty() {
            bail!("Invalid --set key '{}'", key);
        }
        if parts.peek().is_none() {
            current.insert(part.to_string(), value);
            return Ok(());
        }
        let entry = current
            .entry(part.to_string())
            .or_insert_with(|| Value::Table(toml::Table::new()));
        current = match entry {
            Value::Table(inner) => inner,
            _ => bail!("Cannot set '{}': '{}' is not a table", key, part),
        };
    }

    bail!("Invalid --set key '{}'", key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(set: &[&str]) -> DataArgs {
        DataArgs {
            data: None,
            set: set.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_set_creates_nested_tables() {
        let bindings = load_bindings(&args(&["paper.title=On Rust", "author=Kim"])).unwrap();
        let data = bindings.data();
        assert_eq!(data["paper"]["title"].as_str(), Some("On Rust"));
        assert_eq!(data["author"].as_str(), Some("Kim"));
    }

    #[test]
    fn test_set_value_may_contain_equals() {
        let bindings = load_bindings(&args(&["eq=a=b"])).unwrap();
        assert_eq!(bindings.data()["eq"].as_str(), Some("a=b"));
    }

    #[test]
    fn test_set_without_equals_is_rejected() {
        assert!(load_bindings(&args(&["nope"])).is_err());
    }

    #[test]
    fn test_set_through_scalar_is_rejected() {
        assert!(load_bindings(&args(&["a=1", "a.b=2"])).is_err());
    }

    #[test]
    fn test_set_empty_segment_is_rejected() {
        assert!(load_bindings(&args(&["a..b=1"])).is_err());
    }

    #[test]
    fn test_data_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let toml_path = dir.path().join("data.toml");
        fs::write(&toml_path, "title = \"T\"\n[meta]\npages = 3\n").unwrap();
        let json_path = dir.path().join("data.json");
        fs::write(&json_path, r#"{"items": [1, 2], "name": "J"}"#).unwrap();

        let from_toml = load_bindings(&DataArgs {
            data: Some(toml_path),
            set: vec!["title=Override".to_string()],
        })
        .unwrap();
        assert_eq!(from_toml.data()["title"].as_str(), Some("Override"));
        assert_eq!(from_toml.data()["meta"]["pages"].as_integer(), Some(3));

        let from_json = load_bindings(&DataArgs {
            data: Some(json_path),
            set: vec![],
        })
        .unwrap();
        assert_eq!(from_json.data()["name"].as_str(), Some("J"));
        assert_eq!(from_json.data()["items"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_json_array_root_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "[1, 2]").unwrap();
        assert!(read_data_file(&path).is_err());
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("data.yaml");
        fs::write(&path, "a: 1").unwrap();
        assert!(read_data_file(&path).is_err());
    }
}
