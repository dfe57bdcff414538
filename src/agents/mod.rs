pub mod pom_updater;
pub mod project_scanner;

pub use pom_updater::{OUTPUT_FILE_NAME, PomUpdater, UpdateReport};
pub use project_scanner::ProjectScannerAgent;
