//! Error types for the layout and rasterization engine

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Structural problems found while resolving geometry.
///
/// These are precondition violations: the editing side is expected to prune
/// empty rows and lists before asking for a render.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// A list has no rows to divide its height between
    #[error("list {list} has no rows")]
    EmptyList { list: usize },

    /// A row has no sections to divide its width between
    #[error("row {row} of list {list} has no sections")]
    EmptyRow { list: usize, row: usize },

    /// Scale factor is zero, negative or not finite
    #[error("invalid scale factor {0}")]
    InvalidScale(f64),
}

/// Errors that can occur while building or rendering a composition
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry could not be resolved
    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    /// Failed to render content
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Scene description could not be parsed
    #[error("Invalid scene: {0}")]
    SceneError(#[from] serde_json::Error),

    /// Image encoding or decoding failed
    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_errors_name_the_offending_indices() {
        let err = Error::from(LayoutError::EmptyRow { list: 2, row: 1 });
        assert_eq!(err.to_string(), "Layout failed: row 1 of list 2 has no sections");

        let err = LayoutError::EmptyList { list: 0 };
        assert_eq!(err.to_string(), "list 0 has no rows");
    }
}
