//! Error type shared by all analysis operations

use thiserror::Error;

/// Failure raised by an analysis operation.
///
/// Every variant carries the offending value. `NoPrimerFound` is the one
/// non-error outcome in here: the input was fine, the scan simply came up
/// empty. Use [`AnalysisError::is_terminal_outcome`] to tell it apart.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A symbol outside the expected alphabet (0-based position)
    #[error("invalid symbol '{symbol}' at position {}", position + 1)]
    InvalidSymbol { symbol: char, position: usize },

    /// Out-of-range numeric input (non-positive charge, concentration, ...)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("sequence is empty")]
    EmptySequence,

    #[error("sequence too short for primer design: {length} bp, need at least {required} bp")]
    SequenceTooShort { length: usize, required: usize },

    #[error("no suitable primers found meeting all constraints ({offsets_scanned} offsets scanned)")]
    NoPrimerFound { offsets_scanned: usize },

    #[error("unknown amino acid: {0}")]
    UnknownResidue(char),

    #[error("reagent volumes ({required:.3} µL) exceed the final volume ({available:.3} µL)")]
    VolumeExceeded { required: f64, available: f64 },

    #[error("invalid parameters: {0}")]
    Config(#[from] serde_json::Error),
}

impl AnalysisError {
    /// True when the operation ran to completion and found nothing,
    /// as opposed to rejecting its input.
    pub fn is_terminal_outcome(&self) -> bool {
        matches!(self, Self::NoPrimerFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
