use thiserror::Error;

/// Errors raised by direct grid access and construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    /// Width or height was negative.
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimension { width: i32, height: i32 },
    /// Coordinates fall outside the grid extent.
    #[error("cell ({x}, {y}) is outside a {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
}
