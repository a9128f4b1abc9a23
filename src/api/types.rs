//! Resource library API response types.

use serde::Deserialize;

/// Kind of library resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Ebook,
    Audio,
}

impl ResourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Ebook => "ebook",
            ResourceKind::Audio => "audio",
        }
    }
}

/// One entry in the resource library.
#[derive(Debug, Clone, Deserialize)]
pub struct Resource {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    /// Remote location of the ebook file.
    #[serde(default)]
    pub file_path: Option<String>,
    /// Remote location of the audio asset.
    #[serde(default)]
    pub audio_url: Option<String>,
}

impl Resource {
    /// The URL to download, picked by resource kind.
    pub fn download_url(&self) -> Option<&str> {
        match self.kind {
            ResourceKind::Ebook => self.file_path.as_deref(),
            ResourceKind::Audio => self.audio_url.as_deref(),
        }
    }
}

/// Resource list responses arrive either bare or wrapped in a data envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ResourceListResponse {
    Wrapped { data: Vec<Resource> },
    Plain(Vec<Resource>),
}

impl ResourceListResponse {
    pub(crate) fn into_resources(self) -> Vec<Resource> {
        match self {
            ResourceListResponse::Wrapped { data } => data,
            ResourceListResponse::Plain(resources) => resources,
        }
    }
}
