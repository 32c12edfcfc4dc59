//! Video Resolution Integration Tests
//!
//! Resolves bundled trailers through the template host.

use std::path::PathBuf;

use episode_catalog::{Catalog, HostingError, Resolution, Sequence, TemplateHost};

fn host() -> TemplateHost {
    TemplateHost::new(
        "https://assets.example.com/videos/{host_id}/{asset}.mp4",
        "https://player.example.com/video/{host_id}?h={secret}",
    )
}

async fn catalog() -> Catalog {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("content");
    Catalog::load(&root).await.unwrap()
}

#[tokio::test]
async fn test_hosted_trailer_per_resolution() {
    let catalog = catalog().await;
    let episode = catalog.episode_by_sequence(Sequence(6)).unwrap();

    let resolved = episode
        .trailer_video
        .resolve(Resolution::Sd540, &host())
        .unwrap();

    assert_eq!(
        resolved.download_url,
        "https://assets.example.com/videos/356112843/0006-trailer-540p.mp4"
    );
    assert_eq!(
        resolved.streaming_url,
        "https://player.example.com/video/356112843?h=3c7d90ab15"
    );
    assert_eq!(resolved.resolution, Some(Resolution::Sd540));
    assert_eq!(resolved.bytes_length, episode.trailer_video.bytes_length);
}

#[tokio::test]
async fn test_direct_trailer_ignores_resolution() {
    let catalog = catalog().await;
    let episode = catalog.episode_by_sequence(Sequence(1)).unwrap();

    // direct descriptors never consult the host
    let resolved = episode
        .trailer_video
        .resolve(Resolution::Hd720, &TemplateHost::default())
        .unwrap();

    assert_eq!(
        resolved.download_url,
        "https://videos.example.com/0001-trailer/0001-trailer.mp4"
    );
    assert_eq!(resolved.resolution, None);
}

#[tokio::test]
async fn test_hosted_without_configuration() {
    let catalog = catalog().await;
    let episode = catalog.episode_by_sequence(Sequence(3)).unwrap();

    let err = episode
        .trailer_video
        .resolve(Resolution::Hd1080, &TemplateHost::default())
        .unwrap_err();
    assert_eq!(err, HostingError::NotConfigured("asset_url_template"));
}

#[tokio::test]
async fn test_full_video_resolves_through_method() {
    let catalog = catalog().await;
    let episode = catalog.episode_by_sequence(Sequence(6)).unwrap();
    let full = episode.full_video.as_ref().unwrap();

    let resolved = full.resolve(Resolution::Hd1080, &host()).unwrap();
    assert_eq!(resolved.resolution, Some(Resolution::Hd1080));
    assert_eq!(resolved.bytes_length, full.bytes_length);
    assert!(resolved.download_url.starts_with("https://assets.example.com/videos/"));
}
