// Core modules
pub mod config;
pub mod error;
pub mod template;

// Re-export commonly used types
pub use config::{Config, EngineConfig, Syntax, TemplatesConfig};
pub use error::{LatexlabError, Result};
pub use template::{TemplateContext, TemplateEngine, TemplateError};
