//! Image URL Rewriter
//!
//! Points every card's `imageUrl` literal in a source file at the image host.
//! For each card the first `id: <N>, ... imageUrl: "<old>"` is located and
//! every occurrence of `<old>` in the file is replaced by `base_url + path`.

use std::path::Path;

use regex::Regex;
use serde::Serialize;

use crate::error::Result;

/// One applied substitution
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Replacement {
    pub card_id: u8,
    pub old_url: String,
    pub new_url: String,
}

/// Outcome of a rewrite pass
#[derive(Clone, Debug, Default, Serialize)]
pub struct RewriteReport {
    /// Rewritten text
    #[serde(skip)]
    pub content: String,

    /// Cards whose URL changed
    pub updated: Vec<Replacement>,

    /// Cards already pointing at the new URL
    pub unchanged: Vec<u8>,

    /// Cards with no `imageUrl` in the text
    pub missing: Vec<u8>,
}

impl RewriteReport {
    pub fn is_noop(&self) -> bool {
        self.updated.is_empty()
    }
}

/// Rewrites card image URLs against a fixed base
pub struct UrlRewriter {
    base_url: String,
}

impl UrlRewriter {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Target URL for an image path
    pub fn new_url(&self, image_path: &str) -> String {
        format!("{}{}", self.base_url, image_path.trim_start_matches('/'))
    }

    /// Rewrite `content` for every `(id, path)` in `mapping`
    pub fn rewrite<'a>(
        &self,
        content: &str,
        mapping: impl IntoIterator<Item = (u8, &'a str)>,
    ) -> Result<RewriteReport> {
        let mut report = RewriteReport {
            content: content.to_string(),
            ..Default::default()
        };

        for (card_id, image_path) in mapping {
            let new_url = self.new_url(image_path);
            let pattern = card_pattern(card_id)?;

            let Some(old_url) = pattern
                .captures(&report.content)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
            else {
                tracing::warn!(card_id, "Could not find imageUrl for card");
                report.missing.push(card_id);
                continue;
            };

            if old_url == new_url {
                tracing::debug!(card_id, url = %new_url, "Card already up to date");
                report.unchanged.push(card_id);
                continue;
            }

            report.content = report.content.replace(&old_url, &new_url);
            tracing::info!(card_id, old = %old_url, new = %new_url, "Updated card");
            report.updated.push(Replacement {
                card_id,
                old_url,
                new_url,
            });
        }

        Ok(report)
    }

    /// Rewrite a file in place; the file is only written when something changed
    pub fn rewrite_file<'a>(
        &self,
        path: &Path,
        mapping: impl IntoIterator<Item = (u8, &'a str)>,
    ) -> Result<RewriteReport> {
        let content = std::fs::read_to_string(path)?;
        let report = self.rewrite(&content, mapping)?;

        if report.content != content {
            std::fs::write(path, &report.content)?;
            tracing::info!(
                path = %path.display(),
                updated = report.updated.len(),
                "Image URLs updated"
            );
        } else {
            tracing::info!(path = %path.display(), "No changes");
        }

        Ok(report)
    }
}

/// `id: <N>,` then, lazily across lines, the next quoted `imageUrl` value
fn card_pattern(card_id: u8) -> Result<Regex> {
    Ok(Regex::new(&format!(
        r#"(?s)id: {card_id},.*?imageUrl:\s*['"]([^'"]+)['"]"#
    ))?)
}
