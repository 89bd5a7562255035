//! Source file access for local paths and `gs://` objects
//!
//! Supports `*` wildcards (within a path segment, never `**`) and reads just
//! the leading bytes of a VCF, which is all the schema updater needs.

use crate::api::client::ApiClient;
use crate::api::endpoints;
use crate::api::types::ObjectList;
use crate::error::{CliError, Result};
use async_trait::async_trait;
use regex::Regex;
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::debug;
use walkdir::WalkDir;

/// Upper bound on bytes fetched when reading a VCF header.
pub const HEADER_FETCH_BYTES: u64 = 32 * 1024 * 1024;

const GCS_SCHEME: &str = "gs://";

/// Read access to VCF sources
#[async_trait]
pub trait SourceStore: Send + Sync {
    /// Expand wildcards; returns matches sorted. Patterns without wildcards
    /// come back unchanged when the source exists.
    async fn expand(&self, pattern: &str) -> Result<Vec<String>>;

    /// Read at most `max_bytes` from the start of a source
    async fn read_head(&self, path: &str, max_bytes: u64) -> Result<Vec<u8>>;
}

/// Whether a path contains a wildcard
pub fn has_wildcard(path: &str) -> bool {
    path.contains('*')
}

/// Split `gs://bucket/object` into its bucket and object name
pub fn parse_gcs_path(path: &str) -> Result<(&str, &str)> {
    let rest = path
        .strip_prefix(GCS_SCHEME)
        .ok_or_else(|| CliError::InvalidSourcePath(path.to_string(), "not a gs:// path".to_string()))?;

    match rest.split_once('/') {
        Some((bucket, object)) if !bucket.is_empty() && !object.is_empty() => Ok((bucket, object)),
        _ => Err(CliError::InvalidSourcePath(
            path.to_string(),
            "expected gs://BUCKET/OBJECT".to_string(),
        )),
    }
}

/// Compile a `*` pattern into an anchored regex where `*` stays within one
/// path segment
pub fn wildcard_regex(pattern: &str) -> Result<Regex> {
    if pattern.contains("**") {
        return Err(CliError::InvalidSourcePath(
            pattern.to_string(),
            "'**' wildcards are not supported".to_string(),
        ));
    }

    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("[^/]*");

    Regex::new(&format!("^{}$", body)).map_err(|e| CliError::Other(e.into()))
}

/// Part of the pattern before its first wildcard
fn literal_prefix(pattern: &str) -> &str {
    pattern.split('*').next().unwrap_or(pattern)
}

/// Local filesystem plus Cloud Storage
pub struct CloudStorage {
    http: ApiClient,
    base_url: String,
}

impl CloudStorage {
    pub fn new(http: ApiClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    async fn expand_gcs(&self, pattern: &str) -> Result<Vec<String>> {
        let (bucket, object_pattern) = parse_gcs_path(pattern)?;
        let matcher = wildcard_regex(object_pattern)?;
        let prefix = literal_prefix(object_pattern);

        let mut matches = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let url = endpoints::list_objects_url(&self.base_url, bucket, prefix, page_token.as_deref());
            let page: ObjectList = self.http.get_json(&url).await?;

            matches.extend(
                page.items
                    .into_iter()
                    .filter(|object| matcher.is_match(&object.name))
                    .map(|object| format!("{}{}/{}", GCS_SCHEME, object.bucket, object.name)),
            );

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        matches.sort();
        Ok(matches)
    }
}

#[async_trait]
impl SourceStore for CloudStorage {
    async fn expand(&self, pattern: &str) -> Result<Vec<String>> {
        let matches = if pattern.starts_with(GCS_SCHEME) {
            self.expand_gcs(pattern).await?
        } else {
            expand_local(pattern)?
        };

        debug!(pattern, matches = matches.len(), "Expanded source pattern");

        if matches.is_empty() {
            return Err(CliError::SourceNotFound(pattern.to_string()));
        }

        Ok(matches)
    }

    async fn read_head(&self, path: &str, max_bytes: u64) -> Result<Vec<u8>> {
        if path.starts_with(GCS_SCHEME) {
            let (bucket, object) = parse_gcs_path(path)?;
            let url = endpoints::object_media_url(&self.base_url, bucket, object);
            return self.http.get_range(&url, max_bytes).await;
        }

        let file = tokio::fs::File::open(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CliError::SourceNotFound(path.to_string()),
            _ => CliError::Io(e),
        })?;

        let mut bytes = Vec::new();
        file.take(max_bytes).read_to_end(&mut bytes).await?;
        Ok(bytes)
    }
}

/// Expand a local wildcard pattern by walking from its literal directory
fn expand_local(pattern: &str) -> Result<Vec<String>> {
    if !has_wildcard(pattern) {
        return Ok(if Path::new(pattern).is_file() {
            vec![pattern.to_string()]
        } else {
            Vec::new()
        });
    }

    let matcher = wildcard_regex(pattern)?;
    let prefix = literal_prefix(pattern);

    // "*.vcf" walks "." and yields "./x.vcf"; strip that back off
    let (root, strip_dot) = match prefix.rfind('/') {
        Some(i) => (&pattern[..=i], false),
        None => ("./", true),
    };
    let depth = pattern.matches('/').count() + usize::from(strip_dot) + 1 - root.matches('/').count();

    let mut matches: Vec<String> = WalkDir::new(root)
        .max_depth(depth)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let path = entry.path().to_string_lossy().into_owned();
            let path = match (strip_dot, path.strip_prefix("./")) {
                (true, Some(stripped)) => stripped.to_string(),
                _ => path,
            };
            matcher.is_match(&path).then_some(path)
        })
        .collect();

    matches.sort();
    Ok(matches)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn storage(base_url: &str) -> CloudStorage {
        let http = ApiClient::new(&Config::default(), "token").unwrap();
        CloudStorage::new(http, base_url)
    }

    #[test]
    fn test_parse_gcs_path() {
        assert_eq!(
            parse_gcs_path("gs://bucket/dir/chr1.vcf").unwrap(),
            ("bucket", "dir/chr1.vcf")
        );
        assert!(parse_gcs_path("gs://bucket").is_err());
        assert!(parse_gcs_path("gs:///object").is_err());
        assert!(parse_gcs_path("/local/file.vcf").is_err());
    }

    #[test]
    fn test_wildcard_regex_stays_in_segment() {
        let re = wildcard_regex("vcf/chr*.vcf.gz").unwrap();
        assert!(re.is_match("vcf/chr1.vcf.gz"));
        assert!(re.is_match("vcf/chrX.vcf.gz"));
        assert!(!re.is_match("vcf/sub/chr1.vcf.gz"));
        assert!(!re.is_match("vcf/chr1.vcf.gz.tbi"));
        assert!(wildcard_regex("vcf/**/x.vcf").is_err());
    }

    #[tokio::test]
    async fn test_expand_local_wildcard() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["chr2.vcf", "chr1.vcf", "notes.txt"] {
            std::fs::write(dir.path().join(name), "##fileformat=VCFv4.2\n").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/chr3.vcf"), "").unwrap();

        let pattern = format!("{}/chr*.vcf", dir.path().display());
        let matches = storage("http://unused").expand(&pattern).await.unwrap();

        assert_eq!(
            matches,
            vec![
                format!("{}/chr1.vcf", dir.path().display()),
                format!("{}/chr2.vcf", dir.path().display()),
            ]
        );
    }

    #[tokio::test]
    async fn test_expand_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.vcf", dir.path().display());
        let err = storage("http://unused").expand(&pattern).await.unwrap_err();
        assert!(matches!(err, CliError::SourceNotFound(_)));
    }

    #[tokio::test]
    async fn test_expand_gcs_wildcard() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/b/bucket/o"))
            .and(query_param("prefix", "vcf/chr"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"name": "vcf/chr2.vcf", "bucket": "bucket"},
                    {"name": "vcf/chr1.vcf", "bucket": "bucket"},
                    {"name": "vcf/chr1.vcf.tbi", "bucket": "bucket"}
                ]
            })))
            .mount(&server)
            .await;

        let matches = storage(&server.uri()).expand("gs://bucket/vcf/chr*.vcf").await.unwrap();
        assert_eq!(matches, vec!["gs://bucket/vcf/chr1.vcf", "gs://bucket/vcf/chr2.vcf"]);
    }

    #[tokio::test]
    async fn test_read_head_local_is_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("big.vcf");
        std::fs::write(&file, "x".repeat(100)).unwrap();

        let bytes = storage("http://unused")
            .read_head(file.to_str().unwrap(), 10)
            .await
            .unwrap();
        assert_eq!(bytes.len(), 10);
    }
}
