//! Helper functions for template rendering

use crate::template::error::TemplateError;
use toml::Value;

use super::TemplateContext;

/// Resolve a nested key from TOML data
pub(crate) fn resolve_key<'a>(data: &'a Value, key: &str) -> Option<&'a Value> {
    let mut current = data;

    for part in key.split('.') {
        current = match current {
            Value::Table(table) => table.get(part)?,
            _ => return None,
        };
    }

    Some(current)
}

/// Stringify a TOML value for template output
pub(crate) fn stringify_value(value: &Value, key: &str) -> Result<String, TemplateError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Boolean(b) => Ok(b.to_string()),
        Value::Datetime(dt) => Ok(dt.to_string()),
        Value::Array(_) => Err(TemplateError::ArrayInPlaceholder {
            key: key.to_string(),
        }),
        Value::Table(_) => Err(TemplateError::TableInPlaceholder {
            key: key.to_string(),
        }),
    }
}

/// Truthiness used by `if` blocks
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.is_empty(),
        Value::Integer(i) => *i != 0,
        Value::Float(f) => *f != 0.0,
        Value::Boolean(b) => *b,
        Value::Datetime(_) => true,
        Value::Array(a) => !a.is_empty(),
        Value::Table(t) => !t.is_empty(),
    }
}

/// Create a loop context binding the current item and a `loop` table
pub(crate) fn create_loop_context(
    base_data: &Value,
    var_name: &str,
    item: Value,
    index: usize,
    len: usize,
) -> TemplateContext {
    let mut table = if let Value::Table(t) = base_data {
        t.clone()
    } else {
        toml::map::Map::new()
    };

    let mut loop_info = toml::map::Map::new();
    loop_info.insert("index".to_string(), Value::Integer(index as i64 + 1));
    loop_info.insert("index0".to_string(), Value::Integer(index as i64));
    loop_info.insert("first".to_string(), Value::Boolean(index == 0));
    loop_info.insert("last".to_string(), Value::Boolean(index + 1 == len));

    table.insert("loop".to_string(), Value::Table(loop_info));
    table.insert(var_name.to_string(), item);
    TemplateContext::new(Value::Table(table))
}
