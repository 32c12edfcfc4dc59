//! URL-template video host.
//!
//! Templates use `{name}` placeholders:
//! - `{asset}`: asset key for the requested resolution
//! - `{resolution}`: resolution label (`1080p`, `720p`, `540p`)
//! - `{host_id}`: provider-side video identifier
//! - `{secret}`: access secret
//!
//! `{{` and `}}` produce literal braces.

use serde::{Deserialize, Serialize};

use super::{HostingError, VideoHost};
use crate::domain::{HostedAssets, Resolution};

/// Video host driven by configured URL templates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateHost {
    /// Template for per-resolution download URLs
    #[serde(default)]
    pub asset_url_template: Option<String>,

    /// Template for player URLs
    #[serde(default)]
    pub streaming_url_template: Option<String>,
}

impl TemplateHost {
    pub fn new(
        asset_url_template: impl Into<String>,
        streaming_url_template: impl Into<String>,
    ) -> Self {
        Self {
            asset_url_template: Some(asset_url_template.into()),
            streaming_url_template: Some(streaming_url_template.into()),
        }
    }
}

impl VideoHost for TemplateHost {
    fn name(&self) -> &str {
        "template"
    }

    fn asset_url(&self, assets: &HostedAssets, resolution: Resolution) -> Result<String, HostingError> {
        let template = self
            .asset_url_template
            .as_deref()
            .ok_or(HostingError::NotConfigured("asset_url_template"))?;

        render(template, |name| match name {
            "asset" => Some(assets.asset(resolution)),
            "resolution" => Some(resolution.label()),
            "host_id" => Some(assets.host_id.as_str()),
            "secret" => Some(assets.secret.as_str()),
            _ => None,
        })
    }

    fn streaming_url(&self, assets: &HostedAssets) -> Result<String, HostingError> {
        let template = self
            .streaming_url_template
            .as_deref()
            .ok_or(HostingError::NotConfigured("streaming_url_template"))?;

        render(template, |name| match name {
            "host_id" => Some(assets.host_id.as_str()),
            "secret" => Some(assets.secret.as_str()),
            _ => None,
        })
    }
}

/// Substitute `{name}` placeholders using `lookup`
fn render<'a>(
    template: &str,
    lookup: impl Fn(&str) -> Option<&'a str>,
) -> Result<String, HostingError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }

                if !closed {
                    return Err(HostingError::MalformedTemplate(template.to_string()));
                }

                let value = lookup(&name).ok_or_else(|| HostingError::UnknownPlaceholder {
                    placeholder: name.clone(),
                    template: template.to_string(),
                })?;
                out.push_str(value);
            }
            '}' => return Err(HostingError::MalformedTemplate(template.to_string())),
            c => out.push(c),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assets() -> HostedAssets {
        HostedAssets {
            hd1080: "ep6-1080".to_string(),
            hd720: "ep6-720".to_string(),
            sd540: "ep6-540".to_string(),
            host_id: "354215017".to_string(),
            secret: "f00d".to_string(),
        }
    }

    #[test]
    fn test_asset_url() {
        let host = TemplateHost::new(
            "https://cdn.example.com/{host_id}/{resolution}/{asset}.mp4",
            "https://player.example.com/video/{host_id}?h={secret}",
        );

        assert_eq!(
            host.asset_url(&assets(), Resolution::Hd720).unwrap(),
            "https://cdn.example.com/354215017/720p/ep6-720.mp4"
        );
        assert_eq!(
            host.streaming_url(&assets()).unwrap(),
            "https://player.example.com/video/354215017?h=f00d"
        );
    }

    #[test]
    fn test_escaped_braces() {
        let out = render("{{literal}}-{x}", |n| (n == "x").then_some("1")).unwrap();
        assert_eq!(out, "{literal}-1");
    }

    #[test]
    fn test_unknown_placeholder() {
        let host = TemplateHost::new("https://cdn.example.com/{bucket}/{asset}", "x");
        let err = host.asset_url(&assets(), Resolution::Hd1080).unwrap_err();
        assert!(matches!(
            err,
            HostingError::UnknownPlaceholder { ref placeholder, .. } if placeholder == "bucket"
        ));
    }

    #[test]
    fn test_streaming_template_has_no_asset() {
        let host = TemplateHost::new("x", "https://player.example.com/{asset}");
        assert!(matches!(
            host.streaming_url(&assets()),
            Err(HostingError::UnknownPlaceholder { .. })
        ));
    }

    #[test]
    fn test_malformed_template() {
        assert!(matches!(
            render("https://x/{asset", |_| Some("a")),
            Err(HostingError::MalformedTemplate(_))
        ));
        assert!(matches!(
            render("https://x/asset}", |_| Some("a")),
            Err(HostingError::MalformedTemplate(_))
        ));
    }

    #[test]
    fn test_not_configured() {
        let host = TemplateHost::default();
        assert_eq!(
            host.asset_url(&assets(), Resolution::Sd540).unwrap_err(),
            HostingError::NotConfigured("asset_url_template")
        );
        assert_eq!(
            host.streaming_url(&assets()).unwrap_err(),
            HostingError::NotConfigured("streaming_url_template")
        );
    }
}
