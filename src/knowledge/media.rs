//! Media listing for a country's encyclopedia article

use super::{KnowledgeError, KnowledgeResult, MediaSource};
use crate::upstream;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Media kind as reported by the media endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MediaKind {
    Bitmap,
    Drawing,
    #[serde(other)]
    Other,
}

/// One rendition of a media file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rendition {
    pub mediatype: MediaKind,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// An image or drawing linked from the country's article
///
/// Passed through unfiltered; kind and size filtering is a presentation
/// concern, so every field that filter needs is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaAsset {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_description_url: Option<String>,
    pub preferred: Rendition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<Rendition>,
}

impl MediaAsset {
    pub fn kind(&self) -> MediaKind {
        self.preferred.mediatype
    }

    /// Rewrite protocol-relative URLs (`//upload.wikimedia.org/...`) to https
    fn normalized(mut self) -> Self {
        self.preferred.url = absolute_url(&self.preferred.url);
        if let Some(original) = self.original.as_mut() {
            original.url = absolute_url(&original.url);
        }
        self.file_description_url = self.file_description_url.map(|u| absolute_url(&u));
        self
    }
}

fn absolute_url(url: &str) -> String {
    match url.strip_prefix("//") {
        Some(rest) => format!("https://{}", rest),
        None => url.to_string(),
    }
}

/// Entries are kept raw so one malformed file does not discard the rest
#[derive(Deserialize)]
struct MediaListing {
    #[serde(default)]
    files: Vec<serde_json::Value>,
}

/// Wikimedia core REST `page/{title}/links/media` client
pub struct WikimediaMediaSource {
    client: Client,
    base_url: String,
}

impl WikimediaMediaSource {
    /// `base_url` is the page collection, e.g.
    /// `https://api.wikimedia.org/core/v1/wikipedia/en/page`
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: upstream::trim_base(base_url),
        }
    }

    /// Decode a listing document
    pub fn parse_listing(bytes: &[u8]) -> KnowledgeResult<Vec<MediaAsset>> {
        let listing: MediaListing = serde_json::from_slice(bytes)
            .map_err(|e| KnowledgeError::Parse(e.to_string()))?;
        Ok(listing
            .files
            .into_iter()
            .filter_map(|file| match serde_json::from_value::<MediaAsset>(file) {
                Ok(asset) => Some(asset.normalized()),
                Err(e) => {
                    debug!("Skipping unreadable media entry: {}", e);
                    None
                }
            })
            .collect())
    }
}

#[async_trait]
impl MediaSource for WikimediaMediaSource {
    async fn list_media(&self, title: &str) -> KnowledgeResult<Vec<MediaAsset>> {
        let url = format!("{}/{}/links/media", self.base_url, upstream::path_segment(title));
        debug!("Listing media for article {:?}", title);

        let resp = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| KnowledgeError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(KnowledgeError::Status(resp.status().as_u16()));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| KnowledgeError::Network(e.to_string()))?;
        Self::parse_listing(&bytes)
    }
}
