//! Constants shared across the workspace

/// Configuration file looked up in the working directory
pub const CONFIG_FILE: &str = "latexlab.toml";

/// Engine defaults
pub mod engine {
    /// Engine invoked when neither the caller nor the config names one
    pub const DEFAULT_ENGINE: &str = "pdflatex";

    /// Upper bound on compiler passes before giving up on convergence
    pub const DEFAULT_MAX_PASSES: u32 = 10;

    /// Extension of the artifact produced by PDF-emitting engines
    pub const PDF_EXTENSION: &str = "pdf";

    /// Engines that emit DVI rather than PDF
    pub const DVI_ENGINES: &[&str] = &["latex", "platex", "uplatex"];
}

/// Default template delimiters, chosen to stay clear of LaTeX's own `{}` and `%`
pub mod syntax {
    pub const BLOCK_START: &str = "((*";
    pub const BLOCK_END: &str = "*))";
    pub const VARIABLE_START: &str = "(((";
    pub const VARIABLE_END: &str = ")))";
    pub const COMMENT_START: &str = "((=";
    pub const COMMENT_END: &str = "=))";
}

/// Fixed file names inside a compile workspace
pub mod workspace {
    /// Stem shared by the source, log and artifact files
    pub const JOB_NAME: &str = "temp";

    /// Prefix of the per-compile temporary directory
    pub const DIR_PREFIX: &str = "latexlab-";
}
