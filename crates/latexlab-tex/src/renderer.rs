//! `Latexlab`: template rendering and compilation behind one configured value

use latexlab_core::template::{FileSystemLoader, TemplateSource};
use latexlab_core::{Config, LatexlabError, Result, TemplateContext, TemplateEngine};
use std::path::PathBuf;

use crate::compile::{CompileOutput, CompileRequest, compile_with_report};

/// Renders templates and compiles them to PDF
///
/// All settings come from the [`Config`] given at construction; two instances
/// with different configs never affect each other. The value is `Send + Sync`
/// and every compile call gets its own workspace, so one instance can serve
/// many threads.
pub struct Latexlab {
    config: Config,
    templates: TemplateEngine,
    store: Option<Box<dyn TemplateSource>>,
    scratch_dir: Option<PathBuf>,
}

impl Latexlab {
    /// Build from a validated config
    ///
    /// When `templates.dir` is set, named templates are loaded from it.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let templates = TemplateEngine::with_syntax(config.syntax.clone());
        let store = config
            .templates
            .dir
            .as_ref()
            .map(|dir| Box::new(FileSystemLoader::new(dir)) as Box<dyn TemplateSource>);

        Ok(Self {
            config,
            templates,
            store,
            scratch_dir: None,
        })
    }

    /// Replace the store used by the `*_named` operations
    pub fn with_store(mut self, store: impl TemplateSource + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Create compile workspaces under `dir`
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Template engine, e.g. for registering extra filters
    pub fn template_engine_mut(&mut self) -> &mut TemplateEngine {
        &mut self.templates
    }

    /// Expand a template string
    pub fn render(&self, template: &str, context: &TemplateContext) -> Result<String> {
        Ok(self.templates.render(template, context)?)
    }

    /// Expand a template from the store
    pub fn render_named(&self, name: &str, context: &TemplateContext) -> Result<String> {
        let template = self.load(name)?;
        self.render(&template, context)
    }

    /// Expand a template string and compile it, returning the artifact bytes
    ///
    /// `engine` overrides the configured default engine.
    pub fn compile(
        &self,
        template: &str,
        context: &TemplateContext,
        engine: Option<&str>,
    ) -> Result<Vec<u8>> {
        self.compile_with_report(template, context, engine)
            .map(|output| output.artifact)
    }

    /// Expand a stored template and compile it
    pub fn compile_named(
        &self,
        name: &str,
        context: &TemplateContext,
        engine: Option<&str>,
    ) -> Result<Vec<u8>> {
        let template = self.load(name)?;
        self.compile(&template, context, engine)
    }

    /// Like [`Latexlab::compile`], also reporting pass count and convergence
    pub fn compile_with_report(
        &self,
        template: &str,
        context: &TemplateContext,
        engine: Option<&str>,
    ) -> Result<CompileOutput> {
        let source = self.render(template, context)?;
        compile_with_report(&self.request(source, engine))
    }

    /// Compile request for already expanded source
    pub fn request(&self, source: String, engine: Option<&str>) -> CompileRequest {
        let request = CompileRequest::from_config(source, &self.config.engine, engine);
        match &self.scratch_dir {
            Some(dir) => request.scratch_dir(dir),
            None => request,
        }
    }

    fn load(&self, name: &str) -> Result<String> {
        match &self.store {
            Some(store) => store.load(name),
            None => Err(LatexlabError::TemplateNotFound(name.to_string())),
        }
    }
}

impl Default for Latexlab {
    fn default() -> Self {
        let config = Config::default();
        Self {
            templates: TemplateEngine::with_syntax(config.syntax.clone()),
            config,
            store: None,
            scratch_dir: None,
        }
    }
}

impl std::fmt::Debug for Latexlab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Latexlab")
            .field("config", &self.config)
            .field("templates", &self.templates)
            .field("has_store", &self.store.is_some())
            .field("scratch_dir", &self.scratch_dir)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use latexlab_core::template::MemoryLoader;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_latexlab_is_send_sync() {
        assert_send_sync::<Latexlab>();
    }

    #[test]
    fn test_render() {
        let lab = Latexlab::default();
        let context = TemplateContext::empty().with("name", "Alex");
        assert_eq!(lab.render("Hi ((( name )))!", &context).unwrap(), "Hi Alex!");
    }

    #[test]
    fn test_render_error_propagates_unchanged() {
        let lab = Latexlab::default();
        let err = lab
            .render("((( missing )))", &TemplateContext::empty())
            .unwrap_err();
        match err {
            LatexlabError::Template(inner) => assert_eq!(
                inner,
                latexlab_core::TemplateError::UndefinedKey {
                    key: "missing".to_string(),
                    line: 1
                }
            ),
            other => panic!("Expected template error, got {:?}", other),
        }
    }

    #[test]
    fn test_render_named_from_store() {
        let lab = Latexlab::default()
            .with_store(MemoryLoader::new().with_template("hello", "Hello ((( who | t )))"));
        let context = TemplateContext::empty().with("who", "R&D");
        assert_eq!(
            lab.render_named("hello", &context).unwrap(),
            r"Hello R\&D"
        );
    }

    #[test]
    fn test_render_named_without_store() {
        let lab = Latexlab::default();
        assert!(matches!(
            lab.render_named("hello", &TemplateContext::empty()),
            Err(LatexlabError::TemplateNotFound(_))
        ));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = Config::default();
        config.engine.max_passes = 0;
        assert!(matches!(
            Latexlab::new(config),
            Err(LatexlabError::ConfigInvalidValue { .. })
        ));
    }

    #[test]
    fn test_custom_syntax_from_config() {
        let config = Config::from_toml_str("[syntax]\nvariable_start = \"<<\"\nvariable_end = \">>\"\n")
            .unwrap();
        let lab = Latexlab::new(config).unwrap();
        let context = TemplateContext::empty().with("x", 1);
        assert_eq!(lab.render("<< x >>", &context).unwrap(), "1");
    }

    #[test]
    fn test_request_uses_config() {
        let mut config = Config::default();
        config.engine.default = "lualatex".to_string();
        config.engine.max_passes = 2;
        let lab = Latexlab::new(config).unwrap();

        let request = lab.request("src".to_string(), None);
        assert_eq!(request.engine_name(), "lualatex");
        assert_eq!(request.pass_limit(), 2);

        let request = lab.request("src".to_string(), Some("xelatex"));
        assert_eq!(request.engine_name(), "xelatex");
    }
}
