//! Adapter interfaces for external systems.
//!
//! The only external system the catalog talks to is the video host, which
//! decides how asset keys turn into playable URLs.

pub mod hosting;

use thiserror::Error;

use crate::domain::{HostedAssets, Resolution, Video, VideoSource};

// Re-export the template-based host
pub use hosting::TemplateHost;

/// Errors resolving a video to URLs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostingError {
    #[error("Hosting is not configured: missing {0}")]
    NotConfigured(&'static str),

    #[error("Unknown placeholder {{{placeholder}}} in template: {template}")]
    UnknownPlaceholder {
        placeholder: String,
        template: String,
    },

    #[error("Unbalanced braces in template: {0}")]
    MalformedTemplate(String),

    #[error("No {0} asset key for this video")]
    MissingAsset(Resolution),
}

/// URLs for one playable rendition of a video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVideo {
    /// URL the file can be downloaded from
    pub download_url: String,

    /// URL handed to a player
    pub streaming_url: String,

    /// Resolution picked, `None` for direct descriptors
    pub resolution: Option<Resolution>,

    pub bytes_length: u64,
}

/// Trait for video hosting providers
pub trait VideoHost: Send + Sync {
    /// Human-readable host name
    fn name(&self) -> &str;

    /// Download URL for one resolution of a hosted video
    fn asset_url(&self, assets: &HostedAssets, resolution: Resolution) -> Result<String, HostingError>;

    /// Player URL for a hosted video
    fn streaming_url(&self, assets: &HostedAssets) -> Result<String, HostingError>;
}

impl Video {
    /// Resolve this descriptor to URLs.
    ///
    /// Direct descriptors carry their URLs already and ignore `resolution`.
    pub fn resolve(
        &self,
        resolution: Resolution,
        host: &dyn VideoHost,
    ) -> Result<ResolvedVideo, HostingError> {
        match &self.source {
            VideoSource::Direct {
                download_url,
                streaming_source,
            } => Ok(ResolvedVideo {
                download_url: download_url.clone(),
                streaming_url: streaming_source.clone(),
                resolution: None,
                bytes_length: self.bytes_length,
            }),
            VideoSource::Hosted(assets) => {
                if assets.asset(resolution).trim().is_empty() {
                    return Err(HostingError::MissingAsset(resolution));
                }

                Ok(ResolvedVideo {
                    download_url: host.asset_url(assets, resolution)?,
                    streaming_url: host.streaming_url(assets)?,
                    resolution: Some(resolution),
                    bytes_length: self.bytes_length,
                })
            }
        }
    }
}
