use crate::error::{PomupError, Result};
use crate::maven::MavenRepository;
use crate::pom::{POM_NAMESPACE, UNKNOWN_VERSION, XmlDocument, XmlElement, extract_dependencies};
use crate::registry::{Coordinate, RegistryClient};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;
use std::path::Path;
use std::sync::Arc;

/// Name of the manifest written next to the input POM.
pub const OUTPUT_FILE_NAME: &str = "updated_pom.xml";

/// PomUpdater resolves every declared dependency against the registry and
/// rewrites `<version>` fields in place.
///
/// Lookups are strictly sequential; the mutated document is serialized once,
/// after the whole pass. Repeated coordinates trigger repeated lookups —
/// results are not cached within a run.
pub struct PomUpdater {
    registry: Arc<dyn RegistryClient>,
}

impl PomUpdater {
    pub fn new(repository_url: Option<&str>) -> Result<Self> {
        let repository = match repository_url {
            Some(url) => MavenRepository::with_base_url(url)?,
            None => MavenRepository::new()?,
        };
        Ok(Self::with_client(Arc::new(repository)))
    }

    pub fn with_client(registry: Arc<dyn RegistryClient>) -> Self {
        Self { registry }
    }

    /// Rewrite dependency versions and serialize the manifest to
    /// `output_path`.
    ///
    /// A failed lookup leaves that dependency's version untouched; the output
    /// file is written regardless, once, at the end of the pass. A parse
    /// failure aborts before anything is written.
    pub fn update_manifest(
        &self,
        pom_path: &Path,
        output_path: &Path,
        filter: Option<&str>,
    ) -> Result<UpdateReport> {
        let mut document = XmlDocument::load(pom_path)?;
        let report = self.resolve_dependencies(&mut document, true, filter)?;
        document.write_to_file(output_path)?;
        Ok(report)
    }

    /// The same resolution pass as [`Self::update_manifest`], without
    /// touching the tree or the filesystem.
    pub fn check_for_updates(&self, pom_path: &Path, filter: Option<&str>) -> Result<UpdateReport> {
        let mut document = XmlDocument::load(pom_path)?;
        self.resolve_dependencies(&mut document, false, filter)
    }

    fn resolve_dependencies(
        &self,
        document: &mut XmlDocument,
        apply: bool,
        filter: Option<&str>,
    ) -> Result<UpdateReport> {
        let matcher = filter.map(PatternMatcher::new).transpose()?;
        let mut report = UpdateReport::new();

        // The extracted records only size the progress bar; coordinate values
        // are re-read from the tree below.
        let declared = extract_dependencies(document.root());
        if declared.is_empty() {
            println!("{}", "No dependencies declared in the POM".yellow());
            return Ok(report);
        }

        let pb = ProgressBar::new(declared.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  [{bar:40}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );

        for dependency in document.root_mut().descendants_mut(POM_NAMESPACE, "dependency") {
            let Some(coordinate) = read_coordinate(dependency) else {
                // Same skip policy as extraction: incomplete declarations are
                // left alone.
                pb.inc(1);
                continue;
            };

            if let Some(matcher) = &matcher {
                if !matcher.matches(&coordinate.to_string()) {
                    pb.inc(1);
                    continue;
                }
            }

            pb.set_message(format!("Checking {}", coordinate));

            let current = dependency
                .child(POM_NAMESPACE, "version")
                .and_then(XmlElement::text)
                .unwrap_or(UNKNOWN_VERSION)
                .to_string();

            match self.registry.fetch_latest_version(&coordinate)? {
                Some(latest) => {
                    let mut applied = true;
                    if apply {
                        match dependency.child_mut(POM_NAMESPACE, "version") {
                            Some(version) => version.set_text(&latest),
                            None => {
                                applied = false;
                                pb.println(format!(
                                    "  {} {} declares no <version> element, leaving it managed elsewhere",
                                    "⚠".yellow(),
                                    coordinate
                                ));
                            }
                        }
                    }

                    if applied {
                        if latest == current {
                            report.up_to_date += 1;
                        } else {
                            report.add_change(coordinate.to_string(), current, latest);
                        }
                    }
                }
                None => {
                    pb.println(format!(
                        "  {} Could not determine the latest version for {}",
                        "⚠".yellow(),
                        coordinate
                    ));
                    report.add_failure(coordinate.to_string());
                }
            }

            pb.inc(1);
        }
        pb.finish_and_clear();

        Ok(report)
    }
}

fn read_coordinate(dependency: &XmlElement) -> Option<Coordinate> {
    let group = dependency.child(POM_NAMESPACE, "groupId")?.text()?;
    let artifact = dependency.child(POM_NAMESPACE, "artifactId")?.text()?;
    Some(Coordinate::new(group, artifact))
}

/// Tracks what a resolution pass did, in document order.
#[derive(Debug, Clone, Default)]
pub struct UpdateReport {
    /// Applied (or, for check runs, available) version changes.
    pub changes: Vec<VersionChange>,
    /// Dependencies already at the registry's latest version.
    pub up_to_date: usize,
    /// Coordinates the registry could not answer for.
    pub failures: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionChange {
    pub coordinate: String,
    pub old: String,
    pub new: String,
}

impl UpdateReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_change(&mut self, coordinate: String, old: String, new: String) {
        self.changes.push(VersionChange { coordinate, old, new });
    }

    pub fn add_failure(&mut self, coordinate: String) {
        self.failures.push(coordinate);
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn total_changes(&self) -> usize {
        self.changes.len()
    }
}

/// Glob-style matcher for `--filter` patterns (`*` and `?` wildcards,
/// case-insensitive). A pattern without wildcards matches as a substring.
pub struct PatternMatcher {
    regex: Regex,
}

impl PatternMatcher {
    pub fn new(pattern: &str) -> Result<Self> {
        let trimmed = pattern.trim();
        if trimmed.is_empty() {
            return Err(PomupError::ProjectValidation(
                "Filter pattern cannot be empty".to_string(),
            ));
        }

        let adjusted = if trimmed.contains(['*', '?']) {
            trimmed.to_string()
        } else {
            format!("*{}*", trimmed)
        };

        let regex = Self::compile_glob(&adjusted)?;
        Ok(Self { regex })
    }

    pub fn matches(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    fn compile_glob(pattern: &str) -> Result<Regex> {
        let mut regex = String::from("(?i)^");
        for ch in pattern.chars() {
            match ch {
                '*' => regex.push_str(".*"),
                '?' => regex.push('.'),
                '.' | '+' | '(' | ')' | '|' | '^' | '$' | '{' | '}' | '[' | ']' | '\\' => {
                    regex.push('\\');
                    regex.push(ch);
                }
                _ => regex.push(ch),
            }
        }
        regex.push('$');

        Regex::new(&regex).map_err(|e| {
            PomupError::ProjectValidation(format!("Invalid filter pattern '{}': {}", pattern, e))
        })
    }
}
