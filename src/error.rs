use thiserror::Error;

#[derive(Error, Debug)]
pub enum PomupError {
    #[error("Project validation failed: {0}")]
    ProjectValidation(String),

    #[error("POM parsing failed: {0}")]
    PomParsing(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PomupError>;
