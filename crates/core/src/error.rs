use thiserror::Error;

use crate::model::EmptyIdError;
use crate::model::content::{LessonContentError, MediaValidationError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    MediaValidation(#[from] MediaValidationError),
    #[error(transparent)]
    LessonContent(#[from] LessonContentError),
    #[error(transparent)]
    Id(#[from] EmptyIdError),
}
