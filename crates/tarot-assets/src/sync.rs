//! Asset Sync
//!
//! Walks the remote image folders and either mirrors them to disk or writes a
//! name → URL manifest. A failed listing or download is logged and counted,
//! then the run moves on to the next item.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;

use crate::contents::{ContentEntry, ContentsClient};
use crate::error::Result;

/// Pause between downloads, keeps us clear of rate limits
pub const DEFAULT_PAUSE: Duration = Duration::from_millis(200);

/// What a sync run produces
#[derive(Clone, Debug)]
pub enum SyncMode {
    /// Write `{ name: download_url }` as JSON
    Manifest { output: PathBuf },

    /// Mirror images under `target_dir/<folder>/`
    Download { target_dir: PathBuf, pause: Duration },
}

/// Remote layout
#[derive(Clone, Debug)]
pub struct SyncOptions {
    /// Remote directory holding the folders
    pub root: String,

    /// Folders to process, in order
    pub folders: Vec<String>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            root: "result".into(),
            folders: vec!["Major".into(), "Minor".into()],
        }
    }
}

/// Counters for a run
#[derive(Clone, Debug, Default, Serialize)]
pub struct SyncReport {
    pub listed: usize,
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub failed_listings: Vec<String>,
    #[serde(skip)]
    pub manifest: BTreeMap<String, String>,
}

pub struct AssetSync<C> {
    client: C,
    options: SyncOptions,
}

impl<C: ContentsClient> AssetSync<C> {
    pub fn new(client: C, options: SyncOptions) -> Self {
        Self { client, options }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn run(&self, mode: &SyncMode) -> Result<SyncReport> {
        match mode {
            SyncMode::Manifest { output } => self.write_manifest(output).await,
            SyncMode::Download { target_dir, pause } => self.download_all(target_dir, *pause).await,
        }
    }

    async fn write_manifest(&self, output: &Path) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        for folder in &self.options.folders {
            let Some(images) = self.list_images(folder, &mut report).await else {
                continue;
            };
            tracing::info!(folder = %folder, count = images.len(), "Found images");

            for image in images {
                if let Some(url) = image.download_url.as_deref() {
                    report.manifest.insert(image.stem().to_string(), url.to_string());
                }
            }
        }

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(&report.manifest)?;
        tokio::fs::write(output, json).await?;

        tracing::info!(path = %output.display(), total = report.manifest.len(), "Image URLs saved");

        Ok(report)
    }

    async fn download_all(&self, target_dir: &Path, pause: Duration) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        for folder in &self.options.folders {
            tracing::info!(folder = %folder, "Processing folder");
            let dir = target_dir.join(folder);
            tokio::fs::create_dir_all(&dir).await?;

            let Some(images) = self.list_images(folder, &mut report).await else {
                continue;
            };

            for image in images {
                let Some(url) = image.download_url.as_deref() else {
                    continue;
                };
                let path = dir.join(&image.name);

                if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                    tracing::debug!(path = %path.display(), "Skipping existing");
                    report.skipped += 1;
                    continue;
                }

                match self.fetch_to(url, &path).await {
                    Ok(bytes) => {
                        tracing::info!(path = %path.display(), bytes, "Downloaded");
                        report.downloaded += 1;
                    }
                    Err(e) => {
                        tracing::warn!(
                            url = %url,
                            path = %path.display(),
                            error = %e,
                            "Download failed"
                        );
                        report.failed += 1;
                    }
                }

                if !pause.is_zero() {
                    tokio::time::sleep(pause).await;
                }
            }
        }

        tracing::info!(
            downloaded = report.downloaded,
            skipped = report.skipped,
            failed = report.failed,
            "Sync finished"
        );

        Ok(report)
    }

    async fn fetch_to(&self, url: &str, path: &Path) -> Result<usize> {
        let bytes = self.client.download(url).await?;
        tokio::fs::write(path, &bytes).await?;
        Ok(bytes.len())
    }

    /// Image entries of one folder; `None` when the listing failed
    async fn list_images(
        &self,
        folder: &str,
        report: &mut SyncReport,
    ) -> Option<Vec<ContentEntry>> {
        let remote = format!("{}/{}", self.options.root.trim_matches('/'), folder);

        match self.client.list(&remote).await {
            Ok(entries) => {
                let images: Vec<_> = entries
                    .into_iter()
                    .filter(|entry| entry.is_image() && is_plain_name(&entry.name))
                    .collect();
                report.listed += images.len();
                Some(images)
            }
            Err(e) => {
                tracing::warn!(folder = %remote, error = %e, "Listing failed");
                report.failed_listings.push(folder.to_string());
                None
            }
        }
    }
}

/// Entry names end up as file names; refuse anything that could escape the folder
fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name != ".." && !name.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::contents::EntryKind;
    use crate::error::AssetError;

    /// In-memory contents source counting every request
    #[derive(Default)]
    struct FakeContents {
        listings: HashMap<String, Vec<ContentEntry>>,
        broken_downloads: HashSet<String>,
        list_calls: AtomicUsize,
        downloads: Mutex<Vec<String>>,
    }

    impl FakeContents {
        fn with_folder(mut self, path: &str, names: &[&str]) -> Self {
            let entries = names
                .iter()
                .map(|name| ContentEntry {
                    name: (*name).to_string(),
                    path: format!("{path}/{name}"),
                    kind: EntryKind::File,
                    download_url: Some(format!("https://raw.example.com/{path}/{name}")),
                })
                .collect();
            self.listings.insert(path.to_string(), entries);
            self
        }

        fn download_count(&self) -> usize {
            self.downloads.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ContentsClient for FakeContents {
        async fn list(&self, path: &str) -> Result<Vec<ContentEntry>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            self.listings.get(path).cloned().ok_or_else(|| AssetError::Listing {
                path: path.to_string(),
                message: "404 Not Found".into(),
            })
        }

        async fn download(&self, url: &str) -> Result<Vec<u8>> {
            self.downloads.lock().unwrap().push(url.to_string());
            if self.broken_downloads.contains(url) {
                return Err(AssetError::Config("connection reset".into()));
            }
            Ok(url.as_bytes().to_vec())
        }
    }

    fn download_mode(dir: &Path) -> SyncMode {
        SyncMode::Download {
            target_dir: dir.to_path_buf(),
            pause: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_download_skips_existing_files() {
        let fake = FakeContents::default()
            .with_folder("result/Major", &["The_Fool.png", "The_Magician.png"])
            .with_folder("result/Minor", &["Ace_of_Cups.png"]);
        let dir = tempfile::tempdir().unwrap();

        std::fs::create_dir_all(dir.path().join("Major")).unwrap();
        std::fs::write(dir.path().join("Major/The_Fool.png"), b"already here").unwrap();

        let sync = AssetSync::new(fake, SyncOptions::default());
        let report = sync.run(&download_mode(dir.path())).await.unwrap();

        assert_eq!(report.listed, 3);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.downloaded, 2);
        assert_eq!(sync.client().download_count(), 2);
        assert!(!sync
            .client()
            .downloads
            .lock()
            .unwrap()
            .iter()
            .any(|url| url.ends_with("The_Fool.png")));
        assert_eq!(std::fs::read(dir.path().join("Major/The_Fool.png")).unwrap(), b"already here");
    }

    #[tokio::test]
    async fn test_missing_file_is_downloaded_exactly_once() {
        let fake = FakeContents::default().with_folder("result/Major", &["The_Star.png"]);
        let dir = tempfile::tempdir().unwrap();
        let options = SyncOptions {
            folders: vec!["Major".into()],
            ..Default::default()
        };

        let sync = AssetSync::new(fake, options);
        sync.run(&download_mode(dir.path())).await.unwrap();

        assert_eq!(sync.client().download_count(), 1);
        let written = std::fs::read(dir.path().join("Major/The_Star.png")).unwrap();
        assert_eq!(written, b"https://raw.example.com/result/Major/The_Star.png");
    }

    #[tokio::test]
    async fn test_non_images_are_ignored() {
        let fake =
            FakeContents::default().with_folder("result/Major", &["notes.txt", "The_Sun.png"]);
        let dir = tempfile::tempdir().unwrap();
        let options = SyncOptions {
            folders: vec!["Major".into()],
            ..Default::default()
        };

        let report = AssetSync::new(fake, options)
            .run(&download_mode(dir.path()))
            .await
            .unwrap();

        assert_eq!(report.listed, 1);
        assert!(!dir.path().join("Major/notes.txt").exists());
    }

    #[tokio::test]
    async fn test_failed_listing_does_not_stop_other_folders() {
        let fake = FakeContents::default().with_folder("result/Minor", &["Ace_of_Swords.png"]);
        let dir = tempfile::tempdir().unwrap();

        let sync = AssetSync::new(fake, SyncOptions::default());
        let report = sync.run(&download_mode(dir.path())).await.unwrap();

        assert_eq!(sync.client().list_calls.load(Ordering::SeqCst), 2);
        assert_eq!(report.failed_listings, vec!["Major".to_string()]);
        assert_eq!(report.downloaded, 1);
        // Directories are created before listing
        assert!(dir.path().join("Major").is_dir());
        assert!(dir.path().join("Minor/Ace_of_Swords.png").is_file());
    }

    #[tokio::test]
    async fn test_failed_download_does_not_stop_the_folder() {
        let mut fake =
            FakeContents::default().with_folder("result/Major", &["Death.png", "Justice.png"]);
        fake.broken_downloads
            .insert("https://raw.example.com/result/Major/Death.png".into());
        let dir = tempfile::tempdir().unwrap();
        let options = SyncOptions {
            folders: vec!["Major".into()],
            ..Default::default()
        };

        let report = AssetSync::new(fake, options)
            .run(&download_mode(dir.path()))
            .await
            .unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(report.downloaded, 1);
        assert!(!dir.path().join("Major/Death.png").exists());
        assert!(dir.path().join("Major/Justice.png").exists());
    }

    #[tokio::test]
    async fn test_manifest_mode_writes_urls_without_downloading() {
        let fake = FakeContents::default()
            .with_folder("result/Major", &["The_Fool_New_beginnings.png"])
            .with_folder("result/Minor", &["Ace_of_Cups_New_feelings.png"]);
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out/tarot-image-urls.json");

        let sync = AssetSync::new(fake, SyncOptions::default());
        let report = sync
            .run(&SyncMode::Manifest { output: output.clone() })
            .await
            .unwrap();

        assert_eq!(sync.client().download_count(), 0);
        assert_eq!(report.manifest.len(), 2);

        let written: BTreeMap<String, String> =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(
            written.get("The_Fool_New_beginnings").map(String::as_str),
            Some("https://raw.example.com/result/Major/The_Fool_New_beginnings.png")
        );
        assert!(written.contains_key("Ace_of_Cups_New_feelings"));
    }

    #[test]
    fn test_plain_names() {
        assert!(is_plain_name("The_Fool.png"));
        assert!(!is_plain_name("../escape.png"));
        assert!(!is_plain_name(".."));
        assert!(!is_plain_name(""));
    }
}
