use super::POM_NAMESPACE;
use super::document::XmlElement;

/// Placeholder recorded when a dependency declares no `<version>` element.
pub const UNKNOWN_VERSION: &str = "unknown";

/// A dependency declaration read out of the manifest tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

/// Collect every `<dependency>` declaration under `root`, in document order.
///
/// Declarations missing `groupId` or `artifactId` are skipped; duplicates are
/// kept as-is. Version text is taken verbatim, without trimming.
pub fn extract_dependencies(root: &XmlElement) -> Vec<Dependency> {
    root.descendants(POM_NAMESPACE, "dependency")
        .into_iter()
        .filter_map(|dependency| {
            let group_id = dependency.child(POM_NAMESPACE, "groupId")?.text()?;
            let artifact_id = dependency.child(POM_NAMESPACE, "artifactId")?.text()?;
            let version = dependency
                .child(POM_NAMESPACE, "version")
                .and_then(XmlElement::text)
                .unwrap_or(UNKNOWN_VERSION);

            Some(Dependency {
                group_id: group_id.to_string(),
                artifact_id: artifact_id.to_string(),
                version: version.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pom::document::XmlDocument;

    fn extract(xml: &str) -> Vec<Dependency> {
        let document = XmlDocument::parse(xml).unwrap();
        extract_dependencies(document.root())
    }

    #[test]
    fn extracts_one_record_per_complete_dependency() {
        let deps = extract(
            r#"<project xmlns="http://maven.apache.org/POM/4.0.0">
    <dependencies>
        <dependency>
            <groupId>org.example</groupId>
            <artifactId>lib</artifactId>
            <version>1.0.0</version>
        </dependency>
        <dependency>
            <groupId>com.acme</groupId>
            <artifactId>widget</artifactId>
            <version>2.3</version>
        </dependency>
    </dependencies>
</project>"#,
        );

        assert_eq!(deps.len(), 2);
        assert_eq!(deps[0].group_id, "org.example");
        assert_eq!(deps[0].artifact_id, "lib");
        assert_eq!(deps[0].version, "1.0.0");
        assert_eq!(deps[1].group_id, "com.acme");
    }

    #[test]
    fn missing_version_defaults_to_unknown() {
        let deps = extract(
            r#"<project xmlns="http://maven.apache.org/POM/4.0.0">
    <dependencies>
        <dependency>
            <groupId>org.example</groupId>
            <artifactId>lib</artifactId>
        </dependency>
    </dependencies>
</project>"#,
        );

        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].version, UNKNOWN_VERSION);
    }

    #[test]
    fn version_text_is_kept_verbatim() {
        let deps = extract(
            r#"<project xmlns="http://maven.apache.org/POM/4.0.0">
    <dependencies>
        <dependency>
            <groupId>org.example</groupId>
            <artifactId>lib</artifactId>
            <version> 1.0.0 </version>
        </dependency>
    </dependencies>
</project>"#,
        );

        assert_eq!(deps[0].version, " 1.0.0 ");
    }

    #[test]
    fn dependencies_missing_group_or_artifact_are_skipped() {
        let deps = extract(
            r#"<project xmlns="http://maven.apache.org/POM/4.0.0">
    <dependencies>
        <dependency>
            <artifactId>orphan</artifactId>
            <version>1.0</version>
        </dependency>
        <dependency>
            <groupId>org.example</groupId>
            <version>1.0</version>
        </dependency>
        <dependency>
            <groupId>org.example</groupId>
            <artifactId>kept</artifactId>
        </dependency>
    </dependencies>
</project>"#,
        );

        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].artifact_id, "kept");
    }

    #[test]
    fn duplicates_are_preserved_in_document_order() {
        let deps = extract(
            r#"<project xmlns="http://maven.apache.org/POM/4.0.0">
    <dependencies>
        <dependency>
            <groupId>org.example</groupId>
            <artifactId>lib</artifactId>
            <version>1.0.0</version>
        </dependency>
        <dependency>
            <groupId>org.example</groupId>
            <artifactId>lib</artifactId>
            <version>1.0.0</version>
        </dependency>
    </dependencies>
</project>"#,
        );

        assert_eq!(deps.len(), 2);
        assert_eq!(deps[0], deps[1]);
    }

    #[test]
    fn dependencies_are_found_at_any_depth() {
        let deps = extract(
            r#"<project xmlns="http://maven.apache.org/POM/4.0.0">
    <profiles>
        <profile>
            <dependencies>
                <dependency>
                    <groupId>org.example</groupId>
                    <artifactId>profiled</artifactId>
                    <version>0.9</version>
                </dependency>
            </dependencies>
        </profile>
    </profiles>
</project>"#,
        );

        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].artifact_id, "profiled");
    }

    #[test]
    fn unnamespaced_manifests_yield_nothing() {
        let deps = extract(
            "<project><dependencies><dependency>\
                <groupId>g</groupId><artifactId>a</artifactId>\
            </dependency></dependencies></project>",
        );
        assert!(deps.is_empty());
    }
}
