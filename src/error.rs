//! Error types for natter

use thiserror::Error;

/// Result type alias for rendering operations
pub type Result<T> = std::result::Result<T, RenderError>;

/// Rendering error types
///
/// The formatter and the canvas placement rules never fail: malformed
/// markup degrades to literal passthrough and layout is total. Errors
/// only arise at the edges - constructing a canvas with an impossible
/// width, or talking to the real terminal.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("canvas width must be positive, got {0}")]
    InvalidWidth(i32),
}
