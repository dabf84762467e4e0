//! Configuration model (`latexlab.toml`)

pub mod consts;
mod model;

pub use model::{infer_output_extension, Config, EngineConfig, Syntax, TemplatesConfig};
