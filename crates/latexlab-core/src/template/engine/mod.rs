//! Template engine implementation

mod blocks;
mod helpers;
mod tokenize;

use crate::config::Syntax;
use crate::template::error::TemplateError;
use crate::template::filters::Filters;
use std::borrow::Cow;
use std::time::{Duration, Instant};
use toml::Value;

use blocks::{Expression, Node};
use helpers::{create_loop_context, is_truthy, resolve_key, stringify_value};

/// Maximum duration for template rendering (malformed input protection)
const RENDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Check if rendering has exceeded the timeout
fn check_timeout(start: Instant) -> Result<(), TemplateError> {
    let elapsed = start.elapsed();
    if elapsed >= RENDER_TIMEOUT {
        return Err(TemplateError::Timeout {
            max_duration: RENDER_TIMEOUT,
            elapsed,
        });
    }
    Ok(())
}

/// Template context holding TOML data for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateContext {
    data: Value,
}

impl TemplateContext {
    /// Create a new template context from TOML value
    pub fn new(data: Value) -> Self {
        Self { data }
    }

    /// Context with no bindings
    pub fn empty() -> Self {
        Self::new(Value::Table(toml::map::Map::new()))
    }

    /// Bind `key` at the top level, replacing any previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        if !self.data.is_table() {
            self.data = Value::Table(toml::map::Map::new());
        }
        if let Value::Table(table) = &mut self.data {
            table.insert(key.into(), value.into());
        }
    }

    /// Builder form of [`TemplateContext::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get the underlying TOML value
    pub fn data(&self) -> &Value {
        &self.data
    }
}

impl Default for TemplateContext {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<toml::Table> for TemplateContext {
    fn from(table: toml::Table) -> Self {
        Self::new(Value::Table(table))
    }
}

/// Template engine for rendering templates with TOML data
///
/// Holds its own delimiters and filter registry; nothing is process-global,
/// so differently configured engines can coexist.
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    syntax: Syntax,
    filters: Filters,
}

impl TemplateEngine {
    /// Create a template engine with the default delimiters
    pub fn new() -> Self {
        Self::with_syntax(Syntax::default())
    }

    /// Create a template engine with custom delimiters
    pub fn with_syntax(syntax: Syntax) -> Self {
        Self {
            syntax,
            filters: Filters::new(),
        }
    }

    pub fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Register an additional filter usable as `((( value | name )))`
    pub fn add_filter<F>(&mut self, name: impl Into<String>, filter: F)
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.filters.register(name, filter);
    }

    /// Render a template with the given context
    pub fn render(
        &self,
        template: &str,
        context: &TemplateContext,
    ) -> Result<String, TemplateError> {
        let start = Instant::now();
        let nodes = blocks::parse(template, &self.syntax)?;

        let mut output = String::with_capacity(template.len());
        self.render_nodes(&nodes, context.data(), start, &mut output)?;
        Ok(output)
    }

    fn render_nodes(
        &self,
        nodes: &[Node<'_>],
        data: &Value,
        start: Instant,
        output: &mut String,
    ) -> Result<(), TemplateError> {
        for node in nodes {
            check_timeout(start)?;
            match node {
                Node::Text(text) => output.push_str(text),
                Node::Output { expr, line } => {
                    let value = self.evaluate(expr, data, *line)?;
                    output.push_str(&stringify_value(&*value, expr.path)?);
                }
                Node::For {
                    var,
                    iterable,
                    body,
                    line,
                } => {
                    let items = resolve_array(data, iterable, *line)?;
                    for (index, item) in items.iter().enumerate() {
                        let loop_context =
                            create_loop_context(data, var, item.clone(), index, items.len());
                        self.render_nodes(body, loop_context.data(), start, output)?;
                    }
                }
                Node::If {
                    condition,
                    then_branch,
                    else_branch,
                    line,
                } => {
                    let value = lookup(data, condition.path, *line)?;
                    let branch = if is_truthy(value) != condition.negated {
                        then_branch
                    } else {
                        else_branch
                    };
                    self.render_nodes(branch, data, start, output)?;
                }
            }
        }
        Ok(())
    }

    /// Resolve an expression and run it through its filters
    fn evaluate<'v>(
        &self,
        expr: &Expression<'_>,
        data: &'v Value,
        line: usize,
    ) -> Result<Cow<'v, Value>, TemplateError> {
        let mut value = Cow::Borrowed(lookup(data, expr.path, line)?);

        for name in &expr.filters {
            let filter = self
                .filters
                .get(name)
                .ok_or_else(|| TemplateError::UnknownFilter {
                    name: name.to_string(),
                    line,
                })?;
            value = Cow::Owned(filter(&*value));
        }

        Ok(value)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn lookup<'v>(data: &'v Value, key: &str, line: usize) -> Result<&'v Value, TemplateError> {
    resolve_key(data, key).ok_or_else(|| TemplateError::UndefinedKey {
        key: key.to_string(),
        line,
    })
}

/// Resolve an array value from context
fn resolve_array<'v>(
    data: &'v Value,
    key: &str,
    line: usize,
) -> Result<&'v Vec<Value>, TemplateError> {
    lookup(data, key, line)?
        .as_array()
        .ok_or_else(|| TemplateError::MalformedSyntax {
            message: format!("Key '{}' is not an array", key),
            line,
        })
}

/// Convenience function to render a template with default settings
pub fn render(template: &str, context: &TemplateContext) -> Result<String, TemplateError> {
    TemplateEngine::new().render(template, context)
}

#[cfg(test)]
mod tests;
