use crate::error::{PomupError, Result};
use crate::utils::path_validator::PathValidator;
use std::path::{Path, PathBuf};

/// ProjectScannerAgent validates the project structure
pub struct ProjectScannerAgent {
    project_path: PathBuf,
}

impl ProjectScannerAgent {
    pub fn new<P: AsRef<Path>>(project_path: P) -> Self {
        Self {
            project_path: project_path.as_ref().to_path_buf(),
        }
    }

    /// Validates the project structure
    pub fn validate(&self) -> Result<ProjectInfo> {
        let project_path = PathValidator::validate_project_path(&self.project_path)?;

        let pom_path = project_path.join("pom.xml");
        if !pom_path.exists() {
            return Err(PomupError::ProjectValidation(
                "pom.xml not found in the project directory".to_string(),
            ));
        }

        Ok(ProjectInfo {
            project_path,
            pom_path,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ProjectInfo {
    pub project_path: PathBuf,
    pub pom_path: PathBuf,
}
