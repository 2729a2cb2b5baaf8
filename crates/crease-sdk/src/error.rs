use thiserror::Error;

use crease_engine::{CorrectionError, SequenceViolation};
use crease_ledger::{StoreError, ValidationError};

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("invalid delivery: {0}")]
    Validation(#[from] ValidationError),

    #[error("delivery illegal in context: {0}")]
    Sequence(#[from] SequenceViolation),

    #[error("correction failed: {0}")]
    Correction(#[from] CorrectionError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub type SdkResult<T> = Result<T, SdkError>;
