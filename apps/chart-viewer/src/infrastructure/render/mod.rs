//! Render Adapters
//!
//! Implementations of `FigureEncoderPort`.

mod svg;

pub use svg::{SvgFigureEncoder, escape};
