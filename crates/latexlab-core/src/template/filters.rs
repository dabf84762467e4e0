//! Named filters applied to placeholder values (`((( value | t )))`)

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use toml::Value;

use super::escape::escape_value;

/// Name of the built-in LaTeX escaping filter
pub const ESCAPE_FILTER: &str = "t";

/// Signature of a filter function
pub type FilterFn = dyn Fn(&Value) -> Value + Send + Sync;

/// Registry of filters known to a [`super::TemplateEngine`]
#[derive(Clone)]
pub struct Filters {
    filters: BTreeMap<String, Arc<FilterFn>>,
}

impl Filters {
    /// Registry holding the built-in `t` filter
    pub fn new() -> Self {
        let mut filters = Self {
            filters: BTreeMap::new(),
        };
        filters.register(ESCAPE_FILTER, escape_value);
        filters
    }

    /// Register or replace a filter
    pub fn register<F>(&mut self, name: impl Into<String>, filter: F)
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.filters.insert(name.into(), Arc::new(filter));
    }

    pub fn get(&self, name: &str) -> Option<&FilterFn> {
        self.filters.get(name).map(|f| f.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(String::as_str)
    }
}

impl Default for Filters {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Filters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
