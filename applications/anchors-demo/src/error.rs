use std::process::ExitCode;

use engine_anchors::LoadError;
use thiserror::Error;

pub(crate) type ApplicationResult<T> = Result<T, ApplicationError>;

#[derive(Debug, Error)]
pub(crate) enum ApplicationError {
    #[error("invalid command line: {0}")]
    Arguments(#[from] pico_args::Error),
    #[error("unexpected command line arguments: {0:?}")]
    UnexpectedArguments(Vec<std::ffi::OsString>),
    #[error(transparent)]
    Load(#[from] LoadError),
}

impl From<ApplicationError> for ExitCode {
    fn from(value: ApplicationError) -> Self {
        match value {
            ApplicationError::Arguments(_) | ApplicationError::UnexpectedArguments(_) => {
                ExitCode::from(2)
            }
            ApplicationError::Load(_) => ExitCode::FAILURE,
        }
    }
}
