use crate::agents::{OUTPUT_FILE_NAME, PomUpdater, ProjectScannerAgent, UpdateReport};
use crate::error::Result;
use crate::maven::{Version, VersionComparator};
use crate::pom::{UNKNOWN_VERSION, XmlDocument, extract_dependencies};
use colored::Colorize;
use std::path::Path;

/// Execute the update workflow
pub fn execute_update<P: AsRef<Path>>(
    project_path: P,
    filter: Option<String>,
    repository: Option<String>,
) -> Result<()> {
    let project_path = project_path.as_ref();
    println!("{}", "Starting dependency update process...".cyan().bold());

    println!("\n{}", "1. Validating project structure...".yellow());
    let scanner = ProjectScannerAgent::new(project_path);
    let project_info = scanner.validate()?;
    println!("{}", "✓ Project structure is valid".green());

    println!("\n{}", "2. Updating dependencies...".yellow());
    let updater = PomUpdater::new(repository.as_deref())?;
    let output_path = project_info.project_path.join(OUTPUT_FILE_NAME);
    let report = updater.update_manifest(&project_info.pom_path, &output_path, filter.as_deref())?;
    println!("{}", "✓ Update completed".green());

    print_update_report(&report);

    println!(
        "\n{}",
        format!("✨ '{}' generated successfully!", OUTPUT_FILE_NAME)
            .green()
            .bold()
    );
    Ok(())
}

/// Execute the check workflow (dry-run)
pub fn execute_check<P: AsRef<Path>>(
    project_path: P,
    filter: Option<String>,
    repository: Option<String>,
) -> Result<()> {
    let project_path = project_path.as_ref();
    println!("{}", "Checking for available updates...".cyan().bold());

    println!("\n{}", "1. Validating project structure...".yellow());
    let scanner = ProjectScannerAgent::new(project_path);
    let project_info = scanner.validate()?;
    println!("{}", "✓ Project structure is valid".green());

    println!("\n{}", "2. Checking dependencies...".yellow());
    let updater = PomUpdater::new(repository.as_deref())?;
    let report = updater.check_for_updates(&project_info.pom_path, filter.as_deref())?;
    println!("{}", "✓ Check completed".green());

    print_available_updates(&report);

    Ok(())
}

/// Execute the list workflow - display all declared dependencies
pub fn execute_list<P: AsRef<Path>>(project_path: P) -> Result<()> {
    let project_path = project_path.as_ref();
    println!("{}", "Listing declared dependencies...".cyan().bold());

    println!("\n{}", "1. Validating project structure...".yellow());
    let scanner = ProjectScannerAgent::new(project_path);
    let project_info = scanner.validate()?;
    println!("{}", "✓ Project structure is valid".green());

    println!("\n{}", "2. Reading POM manifest...".yellow());
    let document = XmlDocument::load(&project_info.pom_path)?;
    let dependencies = extract_dependencies(document.root());
    println!("{}", "✓ Manifest loaded".green());

    println!("\n{}", "📦 Dependencies:".cyan().bold());
    if dependencies.is_empty() {
        println!("  {}", "(none declared)".dimmed());
    }
    for dependency in &dependencies {
        let coordinate = format!("{}:{}", dependency.group_id, dependency.artifact_id);
        if dependency.version == UNKNOWN_VERSION {
            println!("  {} {}", coordinate.cyan(), "(version unknown)".dimmed());
        } else {
            println!(
                "  {}",
                format!("{}:{}", coordinate, dependency.version).cyan()
            );
        }
    }

    println!("\n{}", "Summary:".cyan().bold());
    println!(
        "  {} dependencies",
        dependencies.len().to_string().yellow()
    );

    Ok(())
}

fn print_update_report(report: &UpdateReport) {
    if report.is_empty() {
        println!("\n{}", "No version changes were applied".yellow());
    } else {
        println!("\n{}", "Update Summary:".cyan().bold());
        println!(
            "{}",
            format!("Total updates: {}", report.total_changes()).green()
        );

        for change in &report.changes {
            println!(
                "  • {} {} → {}{}",
                change.coordinate.white().bold(),
                change.old.red(),
                change.new.green(),
                downgrade_note(&change.old, &change.new)
            );
        }
    }

    if report.up_to_date > 0 {
        println!(
            "{}",
            format!("{} dependencies already up to date", report.up_to_date).dimmed()
        );
    }

    print_failures(report);
}

fn print_available_updates(report: &UpdateReport) {
    if report.is_empty() && report.failures.is_empty() {
        println!("\n{}", "✨ All dependencies are up to date!".green().bold());
        return;
    }

    if !report.is_empty() {
        println!("\n{}", "📦 Available Updates:".cyan().bold());
        println!(
            "{}",
            format!("Found {} update(s)", report.total_changes()).yellow()
        );

        for change in &report.changes {
            let stability = if Version::parse(&change.new).is_stable() {
                "stable".green()
            } else {
                "pre-release".yellow()
            };
            println!(
                "  • {} {} → {} ({}){}",
                change.coordinate.white().bold(),
                change.old.dimmed(),
                change.new.green().bold(),
                stability,
                downgrade_note(&change.old, &change.new)
            );
        }

        println!("\n{}", "To apply these updates, run:".dimmed());
        println!("  {}", "pomup update".cyan());
    } else {
        println!("\n{}", "No version changes available".yellow());
    }

    print_failures(report);
}

fn print_failures(report: &UpdateReport) {
    if report.failures.is_empty() {
        return;
    }

    println!("\n{}:", "Unresolved lookups".yellow().bold());
    for coordinate in &report.failures {
        println!("  • {}", coordinate.yellow());
    }
}

/// Annotation for changes where the registry's `latest` is not actually newer
/// than the declared version (the registry value is applied either way).
fn downgrade_note(old: &str, new: &str) -> String {
    if old == UNKNOWN_VERSION || VersionComparator::is_newer(new, old) {
        String::new()
    } else {
        format!(" {}", "(not newer than declared)".dimmed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PomupError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn list_reads_the_manifest() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("pom.xml"),
            r#"<project xmlns="http://maven.apache.org/POM/4.0.0">
    <dependencies>
        <dependency>
            <groupId>org.example</groupId>
            <artifactId>lib</artifactId>
            <version>1.0.0</version>
        </dependency>
    </dependencies>
</project>"#,
        )
        .unwrap();

        assert!(execute_list(dir.path()).is_ok());
    }

    #[test]
    fn update_fails_on_missing_pom() {
        let dir = tempdir().unwrap();
        let err = execute_update(dir.path(), None, None).unwrap_err();
        assert!(matches!(err, PomupError::ProjectValidation(_)));
    }

    #[test]
    fn update_fails_on_malformed_pom_without_writing_output() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("pom.xml"), "<project><dependencies>").unwrap();

        let err = execute_update(dir.path(), None, None).unwrap_err();
        assert!(matches!(err, PomupError::PomParsing(_)));
        assert!(!dir.path().join(OUTPUT_FILE_NAME).exists());
    }

    #[test]
    fn check_rejects_invalid_repository_override() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("pom.xml"), "<project/>").unwrap();

        let err = execute_check(
            dir.path(),
            None,
            Some("ftp://repo.example.com".to_string()),
        )
        .unwrap_err();
        assert!(matches!(err, PomupError::ProjectValidation(_)));
    }

    #[test]
    fn downgrade_note_is_silent_for_upgrades_and_unknowns() {
        assert!(downgrade_note("1.0.0", "2.0.0").is_empty());
        assert!(downgrade_note(UNKNOWN_VERSION, "2.0.0").is_empty());
        assert!(!downgrade_note("2.0.0", "1.0.0").is_empty());
    }
}
