pub mod dependencies;
pub mod document;

/// XML namespace of the Maven POM 4.0.0 schema. Elements outside this
/// namespace are ignored by extraction and update passes.
pub const POM_NAMESPACE: &str = "http://maven.apache.org/POM/4.0.0";

pub use dependencies::{Dependency, UNKNOWN_VERSION, extract_dependencies};
pub use document::{XmlDocument, XmlElement};
