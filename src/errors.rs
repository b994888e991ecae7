use thiserror::Error;

use crate::operations::{RegistrationError, ReviewError, SubmissionError};
use crate::services::identity::IdentityError;
use crate::services::persistence::StoreError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Registration(#[from] RegistrationError),
    #[error("{0}")]
    Review(#[from] ReviewError),
    #[error("{0}")]
    Submission(#[from] SubmissionError),
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("{0}")]
    Identity(#[from] IdentityError),
}
