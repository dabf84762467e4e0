//! Shared test helpers for template engine tests

use crate::template::engine::TemplateContext;
use toml::{toml, Value};

/// Create a simple test context with basic scalar values
pub(super) fn simple_context() -> TemplateContext {
    let data = toml! {
        title = "My Title"
        count = 42
        price = 9.99
        enabled = true
        disabled = false
        empty = ""
        date = 2026-01-15
    };
    TemplateContext::new(Value::Table(data))
}

/// Create a nested test context with arrays and tables
pub(super) fn nested_context() -> TemplateContext {
    let data = toml! {
        [invoice]
        number = "2026-017"
        customer = "Smith & Sons"

        [[invoice.items]]
        name = "Consulting_hours"
        amount = 1200

        [[invoice.items]]
        name = "Travel 100%"
        amount = 80
    };
    TemplateContext::new(Value::Table(data))
}
