//! LaTeX compilation for latexlab.
//!
//! This crate drives an external LaTeX engine until cross-references settle
//! and wraps template expansion and compilation behind [`Latexlab`].
//!
//! # Architecture
//!
//! - [`workspace`]: per-call scratch directory, removed on drop
//! - [`exec`]: one engine invocation with captured output and optional timeout
//! - [`compile`]: the pass loop and its failure handling
//! - [`renderer`]: the [`Latexlab`] facade (`render`, `compile`, `*_named`)
//! - [`resolve`]: locating engine binaries for diagnostics
//!
//! # Examples
//!
//! ```no_run
//! use latexlab_tex::Latexlab;
//! use latexlab_core::{Config, TemplateContext};
//!
//! # fn main() -> latexlab_core::Result<()> {
//! let lab = Latexlab::new(Config::default())?;
//! let context = TemplateContext::empty().with("name", "Alex");
//!
//! let source = lab.render("Hi ((( name | t )))!", &context)?;
//! println!("{}", source);
//!
//! let template = r"\documentclass{article}\begin{document}Hi ((( name )))!\end{document}";
//! let pdf = lab.compile(template, &context, Some("xelatex"))?;
//! std::fs::write("result.pdf", pdf)?;
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod compile;
pub mod exec;
pub mod info;
pub mod renderer;
pub mod resolve;
pub mod workspace;

// Re-export commonly used types
pub use compile::{CompileOutput, CompileRequest, compile, compile_with_report, needs_rerun};
pub use exec::{ExecOptions, ExecResult, exec_engine};
pub use info::EngineInfo;
pub use renderer::Latexlab;
pub use resolve::locate_engine;
pub use workspace::CompileWorkspace;

// Type alias for convenience
pub type Result<T> = latexlab_core::Result<T>;
