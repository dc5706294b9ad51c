use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error(transparent)]
    /// An I/O error occurred while assembling a content stream
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsingError(#[from] owned_ttf_parser::FaceParsingError),

    #[error("ran out of columns while placing content")]
    /// A content block needed another column but the column sequence ended
    ColumnsExhausted,

    #[error("the page template produced no page for page index {0}")]
    /// The caller's page template stopped producing pages before all content
    /// was placed. Templates are expected to be infinite.
    TemplateExhausted(usize),

    #[error("the page template produced {count} pages without columns, ending at page index {index}")]
    /// Too many consecutive pages had no columns to place content in, so
    /// content could never be placed
    NoColumns { index: usize, count: usize },

    #[error("no feasible line breaks, even at infinite tolerance")]
    /// Optimal line breaking failed even with unbounded tolerance. This always
    /// indicates a bug in the line breaker.
    Infeasible,
}
