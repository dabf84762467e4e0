//! Error handling tests for template engine

use super::helpers::{nested_context, simple_context};
use super::*;

fn malformed_message(result: Result<String, TemplateError>) -> (String, usize) {
    match result {
        Err(TemplateError::MalformedSyntax { message, line }) => (message, line),
        other => panic!("Expected MalformedSyntax error, got {:?}", other),
    }
}

#[test]
fn test_error_undefined_key() {
    let context = simple_context();
    let result = render("Line one\nValue: ((( nonexistent )))", &context);
    match result {
        Err(TemplateError::UndefinedKey { key, line }) => {
            assert_eq!(key, "nonexistent");
            assert_eq!(line, 2);
        }
        _ => panic!("Expected UndefinedKey error"),
    }
}

#[test]
fn test_error_undefined_nested_key() {
    let context = nested_context();
    match render("((( invoice.nonexistent )))", &context) {
        Err(TemplateError::UndefinedKey { key, .. }) => assert_eq!(key, "invoice.nonexistent"),
        _ => panic!("Expected UndefinedKey error"),
    }
}

#[test]
fn test_error_undefined_in_condition() {
    let context = simple_context();
    assert!(matches!(
        render("((* if missing *))x((* endif *))", &context),
        Err(TemplateError::UndefinedKey { .. })
    ));
}

#[test]
fn test_error_unknown_filter() {
    let context = simple_context();
    match render("((( title | shout )))", &context) {
        Err(TemplateError::UnknownFilter { name, line }) => {
            assert_eq!(name, "shout");
            assert_eq!(line, 1);
        }
        _ => panic!("Expected UnknownFilter error"),
    }
}

#[test]
fn test_error_array_in_placeholder() {
    let context = nested_context();
    assert!(matches!(
        render("((( invoice.items )))", &context),
        Err(TemplateError::ArrayInPlaceholder { key }) if key == "invoice.items"
    ));
}

#[test]
fn test_error_table_in_placeholder() {
    let context = nested_context();
    assert!(matches!(
        render("((( invoice )))", &context),
        Err(TemplateError::TableInPlaceholder { key }) if key == "invoice"
    ));
}

#[test]
fn test_error_unclosed_placeholder() {
    let context = simple_context();
    let (message, _) = malformed_message(render("Value: ((( title", &context));
    assert!(message.contains("Unclosed"));
}

#[test]
fn test_error_unclosed_for() {
    let context = nested_context();
    let (message, line) = malformed_message(render(
        "\n((* for item in invoice.items *))((( item.name )))",
        &context,
    ));
    assert!(message.contains("Unclosed for loop"));
    assert_eq!(line, 2);
}

#[test]
fn test_error_unclosed_if() {
    let context = simple_context();
    let (message, _) = malformed_message(render("((* if enabled *))x((* else *))y", &context));
    assert!(message.contains("Unclosed if block"));
}

#[test]
fn test_error_stray_end_tag() {
    let context = simple_context();
    let (message, _) = malformed_message(render("x((* endfor *))", &context));
    assert!(message.contains("Unexpected 'endfor'"));
}

#[test]
fn test_error_mismatched_end_tag() {
    let context = nested_context();
    let (message, _) = malformed_message(render(
        "((* for item in invoice.items *))x((* endif *))",
        &context,
    ));
    assert!(message.contains("Unexpected 'endif'"));
}

#[test]
fn test_error_unknown_block() {
    let context = simple_context();
    let (message, _) = malformed_message(render("((* macro m() *))", &context));
    assert!(message.contains("Unknown block tag"));
}

#[test]
fn test_error_bad_for_syntax() {
    let context = nested_context();
    let (message, _) = malformed_message(render("((* for item invoice.items *))((* endfor *))", &context));
    assert!(message.contains("Invalid for syntax"));
}

#[test]
fn test_error_loop_over_scalar() {
    let context = simple_context();
    let (message, _) = malformed_message(render("((* for c in title *))((* endfor *))", &context));
    assert!(message.contains("not an array"));
}

#[test]
fn test_error_empty_placeholder() {
    let context = simple_context();
    let (message, _) = malformed_message(render("((( )))", &context));
    assert!(message.contains("Invalid key"));
}
