// Error taxonomy for the conversion engine.
//
// Conversions are pure functions over bits, so every failure is local and
// synchronous: there is no retry and nothing to roll back. All three kinds
// are surfaced to the caller as values rather than panics.

use thiserror::Error;

pub type ConvertResult<T> = Result<T, ConvertError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    // A caller-supplied field does not fit its declared shape: a sign
    // outside {0, 1}, a field wider than the format declares, or format
    // widths that cannot describe a coherent encoding.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // The input bits were not produced by this encoding scheme, e.g. a
    // recoded NaN with a zero payload or an exponent below the subnormal
    // band.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    // The conversion would silently discard set bits.
    #[error("lossy conversion: {0}")]
    LossyConversion(String),
}
