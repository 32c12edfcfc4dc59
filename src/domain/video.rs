//! Video descriptors.
//!
//! A descriptor either carries explicit URLs, or the per-resolution asset
//! keys that a hosting provider turns into URLs. Authored descriptors are
//! parsed through [`VideoRecord`] so that a partial asset set, or one that
//! mixes both shapes, is rejected while loading instead of surfacing later.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors for malformed video descriptors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VideoError {
    #[error("Video descriptor has no source (expected download_url/streaming_source or hosted assets)")]
    NoSource,

    #[error("Video descriptor mixes direct URLs with hosted assets")]
    AmbiguousSource,

    #[error("Incomplete {kind} video descriptor, missing: {}", .missing.join(", "))]
    MissingFields {
        kind: VideoKind,
        missing: Vec<&'static str>,
    },
}

/// Playback resolution of a hosted asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Hd1080,
    Hd720,
    Sd540,
}

impl Resolution {
    pub const ALL: [Resolution; 3] = [Resolution::Hd1080, Resolution::Hd720, Resolution::Sd540];

    /// Short label, e.g. `1080p`
    pub fn label(&self) -> &'static str {
        match self {
            Resolution::Hd1080 => "1080p",
            Resolution::Hd720 => "720p",
            Resolution::Sd540 => "540p",
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Asset keys for a provider-hosted video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedAssets {
    pub hd1080: String,
    pub hd720: String,
    pub sd540: String,

    /// Provider-side video identifier
    pub host_id: String,

    /// Access secret the provider expects alongside the identifier
    pub secret: String,
}

impl HostedAssets {
    pub fn asset(&self, resolution: Resolution) -> &str {
        match resolution {
            Resolution::Hd1080 => &self.hd1080,
            Resolution::Hd720 => &self.hd720,
            Resolution::Sd540 => &self.sd540,
        }
    }
}

/// Where a video can be fetched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    Direct {
        download_url: String,
        streaming_source: String,
    },
    Hosted(HostedAssets),
}

impl VideoSource {
    pub fn kind(&self) -> VideoKind {
        match self {
            VideoSource::Direct { .. } => VideoKind::Direct,
            VideoSource::Hosted(_) => VideoKind::Hosted,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoKind {
    Direct,
    Hosted,
}

impl std::fmt::Display for VideoKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VideoKind::Direct => write!(f, "direct"),
            VideoKind::Hosted => write!(f, "hosted"),
        }
    }
}

/// A trailer or full-episode video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "VideoRecord", into = "VideoRecord")]
pub struct Video {
    pub bytes_length: u64,
    pub source: VideoSource,
}

impl Video {
    pub fn new(bytes_length: u64, source: VideoSource) -> Self {
        Self {
            bytes_length,
            source,
        }
    }

    pub fn direct(
        bytes_length: u64,
        download_url: impl Into<String>,
        streaming_source: impl Into<String>,
    ) -> Self {
        Self::new(
            bytes_length,
            VideoSource::Direct {
                download_url: download_url.into(),
                streaming_source: streaming_source.into(),
            },
        )
    }

    pub fn hosted(bytes_length: u64, assets: HostedAssets) -> Self {
        Self::new(bytes_length, VideoSource::Hosted(assets))
    }

    pub fn kind(&self) -> VideoKind {
        self.source.kind()
    }
}

/// Flat, as-authored shape of a video descriptor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VideoRecord {
    pub bytes_length: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<VideoKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streaming_source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hd1080: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hd720: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sd540: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

impl VideoRecord {
    fn has_direct_fields(&self) -> bool {
        self.download_url.is_some() || self.streaming_source.is_some()
    }

    fn has_hosted_fields(&self) -> bool {
        self.hd1080.is_some()
            || self.hd720.is_some()
            || self.sd540.is_some()
            || self.host_id.is_some()
            || self.secret.is_some()
    }

    fn into_direct(self) -> Result<VideoSource, VideoError> {
        if self.has_hosted_fields() {
            return Err(VideoError::AmbiguousSource);
        }

        match (self.download_url, self.streaming_source) {
            (Some(download_url), Some(streaming_source)) => Ok(VideoSource::Direct {
                download_url,
                streaming_source,
            }),
            (download_url, streaming_source) => {
                let mut missing = Vec::new();
                if download_url.is_none() {
                    missing.push("download_url");
                }
                if streaming_source.is_none() {
                    missing.push("streaming_source");
                }
                Err(VideoError::MissingFields {
                    kind: VideoKind::Direct,
                    missing,
                })
            }
        }
    }

    fn into_hosted(self) -> Result<VideoSource, VideoError> {
        if self.has_direct_fields() {
            return Err(VideoError::AmbiguousSource);
        }

        let missing: Vec<&'static str> = [
            ("hd1080", self.hd1080.is_none()),
            ("hd720", self.hd720.is_none()),
            ("sd540", self.sd540.is_none()),
            ("host_id", self.host_id.is_none()),
            ("secret", self.secret.is_none()),
        ]
        .into_iter()
        .filter(|(_, absent)| *absent)
        .map(|(name, _)| name)
        .collect();

        match (self.hd1080, self.hd720, self.sd540, self.host_id, self.secret) {
            (Some(hd1080), Some(hd720), Some(sd540), Some(host_id), Some(secret)) => {
                Ok(VideoSource::Hosted(HostedAssets {
                    hd1080,
                    hd720,
                    sd540,
                    host_id,
                    secret,
                }))
            }
            _ => Err(VideoError::MissingFields {
                kind: VideoKind::Hosted,
                missing,
            }),
        }
    }
}

impl TryFrom<VideoRecord> for Video {
    type Error = VideoError;

    fn try_from(record: VideoRecord) -> Result<Self, Self::Error> {
        let bytes_length = record.bytes_length;

        let source = match record.kind {
            Some(VideoKind::Direct) => record.into_direct()?,
            Some(VideoKind::Hosted) => record.into_hosted()?,
            None => match (record.has_direct_fields(), record.has_hosted_fields()) {
                (true, true) => return Err(VideoError::AmbiguousSource),
                (true, false) => record.into_direct()?,
                (false, true) => record.into_hosted()?,
                (false, false) => return Err(VideoError::NoSource),
            },
        };

        Ok(Video::new(bytes_length, source))
    }
}

impl From<Video> for VideoRecord {
    fn from(video: Video) -> Self {
        let mut record = VideoRecord {
            bytes_length: video.bytes_length,
            kind: Some(video.kind()),
            ..Default::default()
        };

        match video.source {
            VideoSource::Direct {
                download_url,
                streaming_source,
            } => {
                record.download_url = Some(download_url);
                record.streaming_source = Some(streaming_source);
            }
            VideoSource::Hosted(assets) => {
                record.hd1080 = Some(assets.hd1080);
                record.hd720 = Some(assets.hd720);
                record.sd540 = Some(assets.sd540);
                record.host_id = Some(assets.host_id);
                record.secret = Some(assets.secret);
            }
        }

        record
    }
}
