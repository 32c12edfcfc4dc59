//! Loading authored content from disk.
//!
//! Each episode and collection lives in its own YAML file. Shared references
//! are resolved while loading, so the resulting catalog holds only concrete
//! values.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::{debug, info};

use super::catalog::Catalog;
use crate::domain::{
    Collection, Episode, EpisodeId, Exercise, Permission, Reference, ReferenceEntry, Section,
    Sequence, SharedReferences, Video,
};

/// File holding the canonical shared references
pub const REFERENCES_FILE: &str = "references.yaml";

/// Directory of episode files
pub const EPISODES_DIR: &str = "episodes";

/// Directory of collection files
pub const COLLECTIONS_DIR: &str = "collections";

/// Episode file schema
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EpisodeFile {
    id: EpisodeId,
    sequence: Sequence,
    title: String,
    #[serde(default)]
    subtitle: Option<String>,
    blurb: String,
    permission: Permission,
    published_at: DateTime<Utc>,
    length: u32,
    #[serde(default)]
    code_sample_directory: Option<String>,
    #[serde(default)]
    exercises: Vec<Exercise>,
    #[serde(default)]
    references: Vec<ReferenceEntry>,
    trailer_video: Video,
    #[serde(default)]
    full_video: Option<Video>,
}

impl EpisodeFile {
    fn into_episode(self, shared: &SharedReferences) -> Result<Episode> {
        Ok(Episode {
            id: self.id,
            sequence: self.sequence,
            title: self.title,
            subtitle: self.subtitle,
            blurb: self.blurb,
            permission: self.permission,
            published_at: self.published_at,
            length: self.length,
            code_sample_directory: self.code_sample_directory,
            exercises: self.exercises,
            references: resolve_all(self.references, shared)?,
            trailer_video: self.trailer_video,
            full_video: self.full_video,
        })
    }
}

/// Collection file schema
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CollectionFile {
    slug: String,
    title: String,
    #[serde(default)]
    blurb: Option<String>,
    #[serde(default)]
    sections: Vec<SectionFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SectionFile {
    slug: String,
    title: String,
    #[serde(default)]
    blurb: Option<String>,
    #[serde(default)]
    episodes: Vec<Sequence>,
    #[serde(default)]
    references: Vec<ReferenceEntry>,
}

impl CollectionFile {
    fn into_collection(self, shared: &SharedReferences) -> Result<Collection> {
        let sections = self
            .sections
            .into_iter()
            .map(|s| {
                Ok(Section {
                    slug: s.slug,
                    title: s.title,
                    blurb: s.blurb,
                    episodes: s.episodes,
                    references: resolve_all(s.references, shared)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Collection {
            slug: self.slug,
            title: self.title,
            blurb: self.blurb,
            sections,
        })
    }
}

fn resolve_all(entries: Vec<ReferenceEntry>, shared: &SharedReferences) -> Result<Vec<Reference>> {
    entries
        .into_iter()
        .map(|entry| entry.resolve(shared).map_err(anyhow::Error::from))
        .collect()
}

/// Running `sha256` over the files that make up a catalog
struct Fingerprint {
    hasher: Sha256,
}

impl Fingerprint {
    fn new() -> Self {
        Self {
            hasher: Sha256::new(),
        }
    }

    fn update(&mut self, name: &str, content: &str) {
        self.hasher.update(name.as_bytes());
        self.hasher.update([0u8]);
        self.hasher.update(content.as_bytes());
        self.hasher.update([0u8]);
    }

    fn finish(self) -> String {
        format!("sha256:{}", hex::encode(self.hasher.finalize()))
    }
}

/// Loads a content directory into a [`Catalog`]
#[derive(Debug, Clone)]
pub struct ContentLoader {
    root: PathBuf,
}

impl ContentLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load every record under the content root
    pub async fn load(&self) -> Result<Catalog> {
        if !self.root.is_dir() {
            anyhow::bail!("Content directory not found: {}", self.root.display());
        }

        let mut fingerprint = Fingerprint::new();

        let shared = self.load_shared_references(&mut fingerprint).await?;
        let episodes = self.load_episodes(&shared, &mut fingerprint).await?;
        let collections = self.load_collections(&shared, &mut fingerprint).await?;

        info!(
            episodes = episodes.len(),
            collections = collections.len(),
            shared_references = shared.len(),
            "Loaded content from {}",
            self.root.display()
        );

        Ok(Catalog::new(episodes, collections).with_fingerprint(fingerprint.finish()))
    }

    async fn load_shared_references(&self, fingerprint: &mut Fingerprint) -> Result<SharedReferences> {
        let path = self.root.join(REFERENCES_FILE);

        if !path.exists() {
            debug!("No shared references at {}", path.display());
            return Ok(SharedReferences::new());
        }

        let content = read_file(&path).await?;
        fingerprint.update(REFERENCES_FILE, &content);

        if content.trim().is_empty() {
            return Ok(SharedReferences::new());
        }

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse shared references: {}", path.display()))
    }

    async fn load_episodes(
        &self,
        shared: &SharedReferences,
        fingerprint: &mut Fingerprint,
    ) -> Result<Vec<Episode>> {
        let dir = self.root.join(EPISODES_DIR);
        if !dir.is_dir() {
            anyhow::bail!("Episodes directory not found: {}", dir.display());
        }

        let mut episodes = Vec::new();

        for path in yaml_files(&dir)? {
            let content = read_file(&path).await?;
            fingerprint.update(&relative_name(&self.root, &path), &content);

            let file: EpisodeFile = serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse episode: {}", path.display()))?;
            let episode = file
                .into_episode(shared)
                .with_context(|| format!("Failed to resolve references in {}", path.display()))?;

            debug!(
                sequence = episode.sequence.0,
                exercises = episode.exercises.len(),
                "Loaded episode {}",
                episode.title
            );
            episodes.push(episode);
        }

        Ok(episodes)
    }

    async fn load_collections(
        &self,
        shared: &SharedReferences,
        fingerprint: &mut Fingerprint,
    ) -> Result<Vec<Collection>> {
        let dir = self.root.join(COLLECTIONS_DIR);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut collections = Vec::new();

        for path in yaml_files(&dir)? {
            let content = read_file(&path).await?;
            fingerprint.update(&relative_name(&self.root, &path), &content);

            let file: CollectionFile = serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse collection: {}", path.display()))?;
            let collection = file
                .into_collection(shared)
                .with_context(|| format!("Failed to resolve references in {}", path.display()))?;

            debug!(sections = collection.sections.len(), "Loaded collection {}", collection.slug);
            collections.push(collection);
        }

        Ok(collections)
    }
}

async fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read content file: {}", path.display()))
}

/// `*.yaml` and `*.yml` files directly under `dir`, sorted by path
fn yaml_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for ext in ["yaml", "yml"] {
        let pattern = format!(
            "{}/*.{}",
            glob::Pattern::escape(&dir.to_string_lossy()),
            ext
        );

        for entry in glob::glob(&pattern)
            .with_context(|| format!("Invalid content glob: {}", pattern))?
        {
            files.push(entry.context("Failed to read content directory entry")?);
        }
    }

    files.sort();
    Ok(files)
}

/// Path relative to the content root, with `/` separators
fn relative_name(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
