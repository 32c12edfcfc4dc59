//! Catalog Integration Tests
//!
//! Loads the bundled content directory and exercises the read-only API.

use std::path::PathBuf;

use episode_catalog::{Catalog, CatalogError, EpisodeId, EpisodeKey, Permission, Sequence};

fn content_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("content")
}

#[tokio::test]
async fn test_functional_setters_by_sequence_and_id() {
    let catalog = Catalog::load(&content_dir()).await.unwrap();

    let by_seq = catalog
        .get_episode(&EpisodeKey::Sequence(Sequence(6)))
        .unwrap();
    let by_id = catalog.get_episode(&EpisodeKey::Id(EpisodeId(6))).unwrap();

    assert_eq!(by_seq, by_id);
    assert_eq!(by_seq.title, "Functional Setters");
    assert_eq!(by_seq.exercises.len(), 7);
    assert_eq!(by_seq.permission, Permission::SubscriberOnly);
    assert!(by_seq.full_video.is_some());
}

#[tokio::test]
async fn test_lookup_by_slug_and_bare_number() {
    let catalog = Catalog::load(&content_dir()).await.unwrap();

    let key: EpisodeKey = "ep6-functional-setters".parse().unwrap();
    assert_eq!(catalog.get_episode(&key).unwrap().sequence, Sequence(6));

    let key: EpisodeKey = "3".parse().unwrap();
    assert_eq!(
        catalog.get_episode(&key).unwrap().title,
        "UIKit Styling with Functions"
    );

    let key: EpisodeKey = "999".parse().unwrap();
    assert!(matches!(
        catalog.get_episode(&key),
        Err(CatalogError::EpisodeNotFound(_))
    ));
}

#[tokio::test]
async fn test_list_episodes_in_sequence_order() {
    let catalog = Catalog::load(&content_dir()).await.unwrap();

    let sequences: Vec<u32> = catalog
        .list_episodes()
        .iter()
        .map(|e| e.sequence.0)
        .collect();
    assert_eq!(sequences, vec![1, 2, 3, 4, 5, 6]);

    let first = &catalog.list_episodes()[0];
    assert_eq!(first.title, "Functions");
    assert!(first.is_free());
}

#[tokio::test]
async fn test_shared_reference_blurb_override() {
    let catalog = Catalog::load(&content_dir()).await.unwrap();

    let ep5 = catalog.episode_by_sequence(Sequence(5)).unwrap();
    let ep6 = catalog.episode_by_sequence(Sequence(6)).unwrap();

    let canonical = &ep5.references[0];
    let overridden = &ep6.references[1];

    assert_eq!(canonical.title, "Semantic editor combinators");
    assert_eq!(overridden.title, canonical.title);
    assert_eq!(overridden.link, canonical.link);
    assert_eq!(overridden.author, canonical.author);
    assert_ne!(overridden.blurb, canonical.blurb);
    assert!(overridden
        .blurb
        .as_deref()
        .unwrap()
        .starts_with("Setters in this episode"));
}

#[tokio::test]
async fn test_list_references_for_collection_and_section() {
    let catalog = Catalog::load(&content_dir()).await.unwrap();

    let all = catalog.list_references("functional-foundations").unwrap();
    let titles: Vec<&str> = all.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Why Functional Programming Matters",
            "Composable Setters",
            "Semantic editor combinators",
        ]
    );

    let section = catalog
        .list_references("functional-foundations/data-and-transformation")
        .unwrap();
    assert_eq!(section.len(), 2);
    assert_eq!(
        section[1].blurb.as_deref(),
        Some("Where composable editing of nested data comes from.")
    );

    let episodes = catalog
        .section_episodes("functional-foundations", "composition")
        .unwrap();
    assert_eq!(episodes.len(), 3);

    assert!(matches!(
        catalog.list_references("missing"),
        Err(CatalogError::CollectionNotFound(_))
    ));
}

#[tokio::test]
async fn test_fingerprint_present_and_stable() {
    let a = Catalog::load(&content_dir()).await.unwrap();
    let b = Catalog::load(&content_dir()).await.unwrap();

    let fingerprint = a.fingerprint.clone().unwrap();
    assert!(fingerprint.starts_with("sha256:"));
    assert_eq!(a.fingerprint, b.fingerprint);
}

#[tokio::test]
async fn test_export_round_trip() {
    let catalog = Catalog::load(&content_dir()).await.unwrap();

    let json = serde_json::to_string(&catalog).unwrap();
    let parsed: Catalog = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.len(), catalog.len());
    assert_eq!(parsed.fingerprint, catalog.fingerprint);
    assert_eq!(parsed.list_episodes(), catalog.list_episodes());
    assert_eq!(parsed.collections(), catalog.collections());
}
