//! Integration tests: templates loaded from disk and rendered with config syntax

use latexlab_core::template::{FileSystemLoader, TemplateSource};
use latexlab_core::{Config, LatexlabError, TemplateContext, TemplateEngine, TemplateError};
use latexlab_testkit::temp_dir_in_workspace;
use std::fs;

const INVOICE: &str = r"\documentclass{article}
\begin{document}
<* for item in items *>
\item <( item.name | t )> <( item.amount )>
<* endfor *>
<# totals are computed by the caller #>
Total: <( total )>
\end{document}
";

fn invoice_context() -> TemplateContext {
    let data: toml::Table = toml::from_str(
        r#"
total = 1280
[[items]]
name = "Design_work"
amount = 1200
[[items]]
name = "Fees & taxes"
amount = 80
"#,
    )
    .unwrap();
    TemplateContext::from(data)
}

#[test]
fn test_config_file_drives_store_and_syntax() {
    let temp = temp_dir_in_workspace();
    let root = temp.path();
    fs::create_dir_all(root.join("templates/billing")).unwrap();
    fs::write(root.join("templates/billing/invoice.tex"), INVOICE).unwrap();
    fs::write(
        root.join("latexlab.toml"),
        r##"
[syntax]
block_start = "<*"
block_end = "*>"
variable_start = "<("
variable_end = ")>"
comment_start = "<#"
comment_end = "#>"

[templates]
dir = "templates"
"##,
    )
    .unwrap();

    let config = Config::from_file(root.join("latexlab.toml")).unwrap();
    let store = FileSystemLoader::new(config.templates.dir.clone().unwrap());
    let engine = TemplateEngine::with_syntax(config.syntax.clone());

    let template = store.load("billing/invoice.tex").unwrap();
    let rendered = engine.render(&template, &invoice_context()).unwrap();

    assert!(rendered.contains(r"\item Design\_work 1200"));
    assert!(rendered.contains(r"\item Fees \& taxes 80"));
    assert!(rendered.contains("Total: 1280"));
    assert!(!rendered.contains("computed by the caller"));
}

#[test]
fn test_default_syntax_leaves_custom_delimiters_alone() {
    let engine = TemplateEngine::new();
    let rendered = engine
        .render("<( total )> ((( total )))", &invoice_context())
        .unwrap();
    assert_eq!(rendered, "<( total )> 1280");
}

#[test]
fn test_store_errors() {
    let temp = temp_dir_in_workspace();
    let store = FileSystemLoader::new(temp.path());

    assert!(matches!(
        store.load("absent.tex"),
        Err(LatexlabError::TemplateNotFound(_))
    ));
    assert!(matches!(
        store.load("../outside.tex"),
        Err(LatexlabError::TemplatePathEscape { .. })
    ));
}

#[test]
fn test_error_line_numbers_from_file() {
    let temp = temp_dir_in_workspace();
    fs::write(
        temp.path().join("broken.tex"),
        "line 1\nline 2\n((* if shown *))\nno endif here\n",
    )
    .unwrap();
    let store = FileSystemLoader::new(temp.path());
    let template = store.load("broken.tex").unwrap();

    let context = TemplateContext::empty().with("shown", true);
    match TemplateEngine::new().render(&template, &context) {
        Err(TemplateError::MalformedSyntax { line, .. }) => assert_eq!(line, 3),
        other => panic!("Expected MalformedSyntax, got {:?}", other),
    }
}
