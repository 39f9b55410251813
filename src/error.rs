//! Modem error types

use thiserror::Error;

use crate::Symbol;

/// Result type for bit stream and modulator operations
pub type ModemResult<T> = Result<T, ModemError>;

/// Precondition violations raised by the bit stream and the modulator.
///
/// None of these are retried internally. Dropping trailing bits that do not
/// fill a whole chunk is normal behavior and never shows up here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModemError {
    /// Chunk width cannot be represented in a `u64` word, or is zero where a
    /// chunk count is needed
    #[error("Invalid bit width: {width}")]
    InvalidWidth { width: usize },

    /// Symbol index outside the constellation
    #[error("Invalid symbol {symbol} for a {order}-QAM constellation")]
    InvalidSymbol { symbol: Symbol, order: usize },

    /// De-rotated sample falls outside the decision region
    #[error("Sample ({re}, {im}) lies outside the constellation")]
    OutOfRange { re: f64, im: f64 },

    /// QAM order is not a supported perfect square
    #[error("Invalid QAM order {0}: must be a perfect square between 4 and 4096")]
    InvalidOrder(usize),
}
