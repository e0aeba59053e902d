//! Figure Encoder Port (Driven Port)
//!
//! Turns the renderer-independent figure model into a document.

use crate::domain::charting::{Figure, RenderError};

/// Port for encoding a figure.
pub trait FigureEncoderPort: Send + Sync {
    /// MIME type of the produced document.
    fn content_type(&self) -> &'static str;

    /// Encode `figure`.
    fn encode(&self, figure: &Figure) -> Result<String, RenderError>;
}
