use thiserror::Error;

/**
 * The only defined failure at this layer: a correction vector whose row count
 * does not match the operation it was passed to. Detected before any field is
 * written, so a rejected update leaves the state untouched.
 */
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    #[error("correction vector has {actual} rows, expected {expected}")]
    InvalidCorrectionSize { expected: usize, actual: usize },
}
