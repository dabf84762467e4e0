//! Compile command - expand a template and run the engine until stable

use crate::cli::DataArgs;
use crate::context::{Context, TemplateRef, load_bindings};
use crate::output::write_output;
use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use std::time::Instant;

/// Command-line values that take precedence over `[engine]`
#[derive(Debug, Default)]
pub struct Overrides {
    pub engine: Option<String>,
    pub max_passes: Option<u32>,
    pub timeout: Option<u64>,
}

pub fn run(
    mut ctx: Context,
    template: &Path,
    data: &DataArgs,
    output: &Path,
    overrides: Overrides,
) -> Result<()> {
    if let Some(max_passes) = overrides.max_passes {
        ctx.config.engine.max_passes = max_passes;
    }
    if let Some(timeout) = overrides.timeout {
        ctx.config.engine.timeout_secs = Some(timeout);
    }
    // Validates the overridden values too
    let lab = ctx.latexlab()?;
    let bindings = load_bindings(data)?;
    let engine = overrides.engine.as_deref();

    let source = match ctx.resolve_template(template)? {
        TemplateRef::Text(text) => lab.render(&text, &bindings)?,
        TemplateRef::Named(name) => lab.render_named(&name, &bindings)?,
    };

    if ctx.verbose {
        let request = lab.request(String::new(), engine);
        eprintln!(
            "{} Compiling '{}' with {} (at most {} passes)",
            "→".cyan(),
            template.display(),
            request.engine_name(),
            request.pass_limit()
        );
    }

    let start = Instant::now();
    let report = latexlab_tex::compile_with_report(&lab.request(source, engine))?;
    let duration_ms = start.elapsed().as_millis();

    write_output(Some(output), &report.artifact)?;

    if !report.converged {
        eprintln!(
            "{} References did not settle after {} passes",
            "⚠".yellow(),
            report.passes
        );
    }
    eprintln!(
        "{} Compiled '{}' to {} ({} passes, {}ms)",
        "✓".green().bold(),
        template.display(),
        output.display(),
        report.passes,
        duration_ms
    );

    Ok(())
}
