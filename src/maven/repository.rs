use crate::error::{PomupError, Result};
use crate::registry::{Coordinate, RegistryClient};
use colored::Colorize;
use quick_xml::de::from_str;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;
use url::Url;

const DEFAULT_MAVEN_CENTRAL: &str = "https://repo1.maven.org/maven2";
const MAX_METADATA_BYTES: usize = 10 * 1024 * 1024;

/// Maven repository client.
///
/// Resolves the latest published version of a coordinate from the
/// repository's `maven-metadata.xml`. One synchronous request per lookup,
/// no caching, no retries.
pub struct MavenRepository {
    client: Client,
    base_url: String,
}

impl MavenRepository {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_MAVEN_CENTRAL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Self::validate_repository_url(base_url)?;
        Ok(Self {
            client: Self::build_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the `versioning/latest` field for a dependency.
    ///
    /// Any failure along the way (unreachable host, non-2xx status,
    /// unparseable body, missing field) yields `Ok(None)`; lookups never
    /// abort the surrounding run.
    pub fn fetch_latest_version(&self, group: &str, artifact: &str) -> Result<Option<String>> {
        let metadata_url = self.metadata_url(group, artifact);

        if std::env::var("POMUP_VERBOSE").is_ok() {
            eprintln!("[VERBOSE] Fetching: {}", metadata_url);
        }

        let response = match self.client.get(&metadata_url).send() {
            Ok(resp) => resp,
            Err(e) => {
                if std::env::var("POMUP_VERBOSE").is_ok() {
                    eprintln!("[VERBOSE] Request failed: {}", e);
                }
                return Ok(None);
            }
        };

        if !response.status().is_success() {
            if std::env::var("POMUP_VERBOSE").is_ok() {
                eprintln!("[VERBOSE] HTTP {}: {}", response.status(), metadata_url);
            }
            return Ok(None);
        }

        let text = match response.text() {
            Ok(text) => text,
            Err(e) => {
                if std::env::var("POMUP_VERBOSE").is_ok() {
                    eprintln!("[VERBOSE] Failed to read response body: {}", e);
                }
                return Ok(None);
            }
        };

        if text.len() > MAX_METADATA_BYTES {
            if std::env::var("POMUP_VERBOSE").is_ok() {
                eprintln!("[VERBOSE] Metadata response exceeded 10MB limit: {}", metadata_url);
            }
            return Ok(None);
        }

        Ok(Self::parse_latest(&text, artifact))
    }

    fn metadata_url(&self, group: &str, artifact: &str) -> String {
        let group_path = group.replace('.', "/");
        format!(
            "{}/{}/{}/maven-metadata.xml",
            self.base_url, group_path, artifact
        )
    }

    /// Pull the `latest` version out of a `maven-metadata.xml` body.
    fn parse_latest(body: &str, artifact: &str) -> Option<String> {
        match from_str::<MavenMetadata>(body) {
            Ok(metadata) => metadata.versioning.latest,
            Err(e) => {
                println!(
                    "{}",
                    format!("⚠ Failed to parse Maven metadata for {}: {}", artifact, e)
                        .yellow()
                );
                None
            }
        }
    }

    fn build_client() -> Result<Client> {
        Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent("pomup")
            .danger_accept_invalid_certs(false)
            .build()
            .map_err(|e| PomupError::Io(std::io::Error::other(e)))
    }

    fn validate_repository_url(url: &str) -> Result<()> {
        let parsed = Url::parse(url)
            .map_err(|_| PomupError::ProjectValidation(format!("Invalid repository URL: {url}")))?;

        match parsed.scheme() {
            "https" | "http" => {}
            scheme => {
                return Err(PomupError::ProjectValidation(format!(
                    "Unsupported repository scheme: {scheme}"
                )));
            }
        }

        if let Some(host) = parsed.host_str() {
            if Self::is_private_host(host) {
                return Err(PomupError::ProjectValidation(format!(
                    "Repository host '{host}' is not allowed"
                )));
            }
        }

        Ok(())
    }

    fn is_private_host(host: &str) -> bool {
        if host.eq_ignore_ascii_case("localhost") {
            return true;
        }

        if let Ok(ip) = host.parse::<IpAddr>() {
            match ip {
                IpAddr::V4(v4) => v4.is_private() || v4.is_loopback(),
                IpAddr::V6(v6) => v6.is_loopback() || v6.is_unique_local(),
            }
        } else {
            false
        }
    }
}

impl RegistryClient for MavenRepository {
    fn fetch_latest_version(&self, coordinate: &Coordinate) -> Result<Option<String>> {
        MavenRepository::fetch_latest_version(self, &coordinate.group, &coordinate.artifact)
    }
}

#[derive(Debug, Deserialize)]
struct MavenMetadata {
    versioning: Versioning,
}

#[derive(Debug, Deserialize)]
struct Versioning {
    latest: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_METADATA: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata>
  <groupId>org.example</groupId>
  <artifactId>lib</artifactId>
  <versioning>
    <latest>2.0.0</latest>
    <release>2.0.0</release>
    <versions>
      <version>1.0.0</version>
      <version>2.0.0</version>
    </versions>
    <lastUpdated>20240101000000</lastUpdated>
  </versioning>
</metadata>"#;

    #[test]
    fn metadata_url_replaces_group_dots_with_slashes() {
        let repo = MavenRepository::new().unwrap();
        assert_eq!(
            repo.metadata_url("org.apache.commons", "commons-lang3"),
            "https://repo1.maven.org/maven2/org/apache/commons/commons-lang3/maven-metadata.xml"
        );
    }

    #[test]
    fn with_base_url_strips_trailing_slash() {
        let repo = MavenRepository::with_base_url("https://repo.example.com/maven2/").unwrap();
        assert_eq!(
            repo.metadata_url("org.example", "lib"),
            "https://repo.example.com/maven2/org/example/lib/maven-metadata.xml"
        );
    }

    #[test]
    fn parse_latest_returns_the_exact_latest_text() {
        assert_eq!(
            MavenRepository::parse_latest(SAMPLE_METADATA, "lib"),
            Some("2.0.0".to_string())
        );
    }

    #[test]
    fn parse_latest_without_latest_field_returns_none() {
        let body = "<metadata><versioning><release>1.0</release></versioning></metadata>";
        assert_eq!(MavenRepository::parse_latest(body, "lib"), None);
    }

    #[test]
    fn parse_latest_on_unparseable_body_returns_none() {
        assert_eq!(MavenRepository::parse_latest("<html>404</html>", "lib"), None);
        assert_eq!(MavenRepository::parse_latest("not xml at all", "lib"), None);
    }

    #[test]
    fn accepts_https_repository() {
        assert!(
            MavenRepository::validate_repository_url("https://repo.maven.apache.org/maven2")
                .is_ok()
        );
    }

    #[test]
    fn rejects_invalid_scheme() {
        let err = MavenRepository::validate_repository_url("ftp://example.com").unwrap_err();
        assert!(matches!(err, PomupError::ProjectValidation(_)));
    }

    #[test]
    fn rejects_private_host() {
        let err = MavenRepository::validate_repository_url("https://127.0.0.1/repo").unwrap_err();
        assert!(matches!(err, PomupError::ProjectValidation(_)));
    }

    #[test]
    #[ignore] // Requires network access
    fn fetches_latest_junit_version() {
        let repo = MavenRepository::new().unwrap();
        let latest = repo.fetch_latest_version("junit", "junit").unwrap();
        assert!(latest.is_some());
    }
}
