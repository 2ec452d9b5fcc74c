//! Repository Contents API
//!
//! Directory listings and raw downloads from a hosted repository.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AssetError, Result};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_OWNER: &str = "ricarvy";
pub const DEFAULT_REPO: &str = "tarot_source";
pub const DEFAULT_REF: &str = "main";

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "webp", "gif"];

/// Kind of a listing entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    #[serde(other)]
    Other,
}

/// One entry of a directory listing
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContentEntry {
    pub name: String,

    #[serde(default)]
    pub path: String,

    #[serde(rename = "type")]
    pub kind: EntryKind,

    #[serde(default)]
    pub download_url: Option<String>,
}

impl ContentEntry {
    /// Regular file with a download URL and an image extension
    pub fn is_image(&self) -> bool {
        self.kind == EntryKind::File
            && self.download_url.is_some()
            && has_image_extension(&self.name)
    }

    /// File name without its extension
    pub fn stem(&self) -> &str {
        self.name.rsplit_once('.').map_or(self.name.as_str(), |(stem, _)| stem)
    }
}

fn has_image_extension(name: &str) -> bool {
    name.rsplit_once('.').is_some_and(|(_, ext)| {
        IMAGE_EXTENSIONS
            .iter()
            .any(|candidate| ext.eq_ignore_ascii_case(candidate))
    })
}

/// Contents client trait (Strategy pattern)
#[async_trait]
pub trait ContentsClient: Send + Sync {
    /// List the entries of a repository directory
    async fn list(&self, path: &str) -> Result<Vec<ContentEntry>>;

    /// Fetch a file's bytes
    async fn download(&self, url: &str) -> Result<Vec<u8>>;
}

/// Repository coordinates
#[derive(Clone, Debug)]
pub struct RepoConfig {
    pub api_base: String,
    pub owner: String,
    pub repo: String,
    pub reference: String,
    pub timeout: Duration,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.into(),
            owner: DEFAULT_OWNER.into(),
            repo: DEFAULT_REPO.into(),
            reference: DEFAULT_REF.into(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// GitHub contents API client
pub struct GithubContentsClient {
    http: reqwest::Client,
    config: RepoConfig,
}

impl GithubContentsClient {
    pub fn new(config: RepoConfig) -> Result<Self> {
        // GitHub rejects requests without a User-Agent
        let http = reqwest::Client::builder()
            .user_agent(concat!("tarot-assets/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| AssetError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    fn listing_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.owner,
            self.config.repo,
            path.trim_matches('/'),
        )
    }
}

#[async_trait]
impl ContentsClient for GithubContentsClient {
    async fn list(&self, path: &str) -> Result<Vec<ContentEntry>> {
        let url = self.listing_url(path);
        tracing::debug!(url = %url, "Listing directory");

        let response = self
            .http
            .get(&url)
            .query(&[("ref", self.config.reference.as_str())])
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or(body);
            return Err(AssetError::Listing {
                path: path.to_string(),
                message: format!("{status}: {message}"),
            });
        }

        // A file path answers with a single object instead of an array
        match response.json::<Value>().await? {
            Value::Array(items) => items
                .into_iter()
                .map(|item| serde_json::from_value(item).map_err(AssetError::from))
                .collect(),
            _ => Ok(Vec::new()),
        }
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, kind: EntryKind, url: Option<&str>) -> ContentEntry {
        ContentEntry {
            name: name.into(),
            path: format!("result/Major/{name}"),
            kind,
            download_url: url.map(str::to_string),
        }
    }

    #[test]
    fn test_image_filter() {
        let url = Some("https://raw.example.com/x");
        assert!(entry("The_Fool.png", EntryKind::File, url).is_image());
        assert!(entry("The_Fool.JPG", EntryKind::File, url).is_image());
        assert!(!entry("README.md", EntryKind::File, url).is_image());
        assert!(!entry("Major", EntryKind::Dir, None).is_image());
        assert!(!entry("no_url.png", EntryKind::File, None).is_image());
        assert!(!entry("png", EntryKind::File, url).is_image());
    }

    #[test]
    fn test_stem() {
        assert_eq!(
            entry("The_Fool_New_beginnings.png", EntryKind::File, None).stem(),
            "The_Fool_New_beginnings"
        );
        assert_eq!(entry("LICENSE", EntryKind::File, None).stem(), "LICENSE");
    }

    #[test]
    fn test_unknown_kind_deserializes() {
        let parsed: ContentEntry = serde_json::from_value(serde_json::json!({
            "name": "link",
            "type": "symlink",
        }))
        .unwrap();
        assert_eq!(parsed.kind, EntryKind::Other);
        assert!(parsed.download_url.is_none());
    }

    #[test]
    fn test_listing_url() {
        let client = GithubContentsClient::new(RepoConfig::default()).unwrap();
        assert_eq!(
            client.listing_url("/result/Major/"),
            "https://api.github.com/repos/ricarvy/tarot_source/contents/result/Major"
        );
    }
}
