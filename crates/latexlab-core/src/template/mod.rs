//! Template module - LaTeX-friendly text template engine
//!
//! Expands templates into LaTeX source using a TOML data context.
//!
//! ## Syntax (default delimiters)
//!
//! - Variables: `((( key )))`, nested access `((( paper.title )))`
//! - Filters: `((( key | t )))` (`t` escapes LaTeX special characters)
//! - Loops: `((* for item in items *)) ... ((* endfor *))`
//! - Conditionals: `((* if key *)) ... ((* else *)) ... ((* endif *))`
//! - Comments: `((= ignored =))`
//!
//! Delimiters are configurable through [`crate::config::Syntax`] so that they
//! never collide with the markup being generated.

pub mod engine;
pub mod error;
pub mod escape;
pub mod filters;
pub mod loader;

pub use engine::{render, TemplateContext, TemplateEngine};
pub use error::TemplateError;
pub use escape::{escape_tex, escape_value};
pub use filters::{FilterFn, Filters};
pub use loader::{FileSystemLoader, MemoryLoader, TemplateSource};
