//! Render command - expand a template into LaTeX source

use crate::cli::DataArgs;
use crate::context::{Context, TemplateRef, load_bindings};
use crate::output::write_output;
use anyhow::Result;
use colored::Colorize;
use std::path::Path;

/// Expand `template` and write the source to `output` (stdout when `None`)
pub fn run(ctx: &Context, template: &Path, data: &DataArgs, output: Option<&Path>) -> Result<()> {
    let lab = ctx.latexlab()?;
    let bindings = load_bindings(data)?;

    if ctx.verbose {
        eprintln!("{} Rendering '{}'", "→".cyan(), template.display());
    }

    let source = match ctx.resolve_template(template)? {
        TemplateRef::Text(text) => lab.render(&text, &bindings)?,
        TemplateRef::Named(name) => lab.render_named(&name, &bindings)?,
    };

    write_output(output, source.as_bytes())?;

    if let Some(path) = output {
        eprintln!(
            "{} Rendered '{}' to {}",
            "✓".green().bold(),
            template.display(),
            path.display()
        );
    }

    Ok(())
}
