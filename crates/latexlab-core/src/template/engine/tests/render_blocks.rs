//! Loop and conditional rendering tests

use super::helpers::{nested_context, simple_context};
use super::*;
use toml::toml;

#[test]
fn test_for_loop() {
    let context = nested_context();
    let template =
        "((* for item in invoice.items *))((( item.name | t ))) & ((( item.amount ))) \\\\\n((* endfor *))";
    assert_eq!(
        render(template, &context).unwrap(),
        "Consulting\\_hours & 1200 \\\\\nTravel 100\\% & 80 \\\\\n"
    );
}

#[test]
fn test_loop_variables() {
    let data = toml! { letters = ["a", "b", "c"] };
    let context = TemplateContext::new(Value::Table(data));
    let template = "((* for l in letters *))((( loop.index )))((( l )))((* if not loop.last *)),((* endif *))((* endfor *))";
    assert_eq!(render(template, &context).unwrap(), "1a,2b,3c");
}

#[test]
fn test_loop_sees_outer_scope() {
    let data = toml! {
        sep = ";"
        xs = [1, 2]
    };
    let context = TemplateContext::new(Value::Table(data));
    let template = "((* for x in xs *))((( x )))((( sep )))((* endfor *))";
    assert_eq!(render(template, &context).unwrap(), "1;2;");
}

#[test]
fn test_nested_loops() {
    let data = toml! {
        rows = [[1, 2], [3, 4]]
    };
    let context = TemplateContext::new(Value::Table(data));
    let template =
        "((* for row in rows *))((* for cell in row *))((( cell )))((* endfor *))|((* endfor *))";
    assert_eq!(render(template, &context).unwrap(), "12|34|");
}

#[test]
fn test_empty_loop() {
    let data = toml! { xs = [] };
    let context = TemplateContext::new(Value::Table(data));
    assert_eq!(
        render("[((* for x in xs *))((( x )))((* endfor *))]", &context).unwrap(),
        "[]"
    );
}

#[test]
fn test_if_else() {
    let context = simple_context();
    let template = "((* if enabled *))on((* else *))off((* endif *))/((* if disabled *))on((* else *))off((* endif *))";
    assert_eq!(render(template, &context).unwrap(), "on/off");
}

#[test]
fn test_if_not_and_truthiness() {
    let context = simple_context();
    let template = "((* if not empty *))E((* endif *))((* if count *))C((* endif *))((* if title *))T((* endif *))";
    assert_eq!(render(template, &context).unwrap(), "ECT");
}

#[test]
fn test_if_inside_loop() {
    let context = nested_context();
    let template = "((* for item in invoice.items *))((* if loop.first *))first:((* endif *))((( item.amount )))((* endfor *))";
    assert_eq!(render(template, &context).unwrap(), "first:120080");
}
