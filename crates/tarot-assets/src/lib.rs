//! # tarot-assets
//!
//! One-off tooling for the tarot card images.
//!
//! - [`cards`]: the fixed card id → image path table
//! - [`rewrite`]: points `imageUrl` literals in a source file at the image host
//! - [`contents`] + [`sync`]: lists the image repository through the GitHub
//!   contents API and either mirrors it to disk or writes a URL manifest
//!
//! ```rust,ignore
//! use tarot_assets::{AssetSync, GithubContentsClient, RepoConfig, SyncMode, SyncOptions};
//!
//! let client = GithubContentsClient::new(RepoConfig::default())?;
//! let report = AssetSync::new(client, SyncOptions::default())
//!     .run(&SyncMode::Download {
//!         target_dir: "public/tarot-cards/result".into(),
//!         pause: tarot_assets::sync::DEFAULT_PAUSE,
//!     })
//!     .await?;
//! ```

pub mod cards;
pub mod contents;
pub mod error;
pub mod rewrite;
pub mod sync;

pub use contents::{ContentEntry, ContentsClient, EntryKind, GithubContentsClient, RepoConfig};
pub use error::{AssetError, Result};
pub use rewrite::{Replacement, RewriteReport, UrlRewriter};
pub use sync::{AssetSync, SyncMode, SyncOptions, SyncReport};
