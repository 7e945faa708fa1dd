//! Error types for the collection

use thiserror::Error;

/// Errors that can occur while mutating the collection or managing
/// transactions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StepVecError {
    /// An index-based operation referenced a position outside the live
    /// sequence
    #[error("index {index} out of range for length {len}")]
    OutOfRange {
        /// The offending index
        index: usize,
        /// The sequence length at the time of the call
        len: usize,
    },

    /// A transaction was opened while one was already open, or closed while
    /// none was open
    #[error("invalid transaction state: {0}")]
    InvalidTransactionState(String),
}

impl StepVecError {
    /// Create a new OutOfRange error for the given index and length
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::OutOfRange { index, len }
    }

    /// Create a new InvalidTransactionState error with context
    pub fn invalid_transaction(msg: impl Into<String>) -> Self {
        Self::InvalidTransactionState(msg.into())
    }
}
