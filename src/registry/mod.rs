use crate::error::Result;
use std::fmt;

/// A `groupId`/`artifactId` pair identifying a library, independent of
/// version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinate {
    pub group: String,
    pub artifact: String,
}

impl Coordinate {
    pub fn new(group: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.artifact)
    }
}

pub trait RegistryClient: Send + Sync {
    /// Latest published version for the coordinate, or `None` when the
    /// registry has no answer (missing artifact, network failure, malformed
    /// metadata). `None` is never fatal to a run.
    fn fetch_latest_version(&self, coordinate: &Coordinate) -> Result<Option<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_displays_as_group_colon_artifact() {
        let coordinate = Coordinate::new("org.example", "lib");
        assert_eq!(coordinate.to_string(), "org.example:lib");
    }
}
