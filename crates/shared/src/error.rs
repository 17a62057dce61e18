use thiserror::Error;

/// Form checks run before any exchange. Evaluated in declaration order; the
/// first failing check is the one reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("job description is empty")]
    EmptyJobDescription,
    #[error("no resume file selected")]
    NoFileSelected,
    #[error("selected file is not a PDF")]
    WrongFileType,
}
