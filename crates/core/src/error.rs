use thiserror::Error;

use crate::model::{AccountError, CatalogError, LessonError, PercentError, QuizError};
use crate::password::PasswordError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Account(#[from] AccountError),
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Percent(#[from] PercentError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Password(#[from] PasswordError),
}
