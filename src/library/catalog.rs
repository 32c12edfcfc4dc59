//! Read-only catalog over the loaded content.
//!
//! Episodes are kept in sequence order; lookups never mutate.

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Collection, Episode, EpisodeId, Reference, Sequence};

/// Lookup failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Episode not found: {0}")]
    EpisodeNotFound(EpisodeKey),

    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Section not found: {collection}/{section}")]
    SectionNotFound { collection: String, section: String },
}

/// How an episode is addressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpisodeKey {
    Id(EpisodeId),
    Sequence(Sequence),
    /// Bare number: tried as a sequence first, then as an id
    Number(u32),
    Slug(String),
}

impl std::fmt::Display for EpisodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EpisodeKey::Id(id) => write!(f, "id:{}", id),
            EpisodeKey::Sequence(seq) => write!(f, "seq:{}", seq),
            EpisodeKey::Number(n) => write!(f, "{}", n),
            EpisodeKey::Slug(slug) => write!(f, "{}", slug),
        }
    }
}

impl std::str::FromStr for EpisodeKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            anyhow::bail!("Episode key cannot be empty");
        }

        if let Some(rest) = s.strip_prefix("id:") {
            let id = rest
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid episode id: {}", rest))?;
            return Ok(EpisodeKey::Id(EpisodeId(id)));
        }

        if let Some(rest) = s.strip_prefix("seq:") {
            let seq = rest
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid episode sequence: {}", rest))?;
            return Ok(EpisodeKey::Sequence(Sequence(seq)));
        }

        if let Ok(n) = s.parse::<u32>() {
            return Ok(EpisodeKey::Number(n));
        }

        Ok(EpisodeKey::Slug(s.to_lowercase()))
    }
}

/// All episodes and collections of the series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    /// Catalog format version
    pub version: u32,

    /// `sha256:<hex>` over the authored files, when loaded from disk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    episodes: Vec<Episode>,

    #[serde(default)]
    collections: Vec<Collection>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

impl Catalog {
    /// Build a catalog, ordering episodes by sequence number
    pub fn new(mut episodes: Vec<Episode>, collections: Vec<Collection>) -> Self {
        episodes.sort_by_key(|e| e.sequence);

        Self {
            version: 1,
            fingerprint: None,
            episodes,
            collections,
        }
    }

    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = Some(fingerprint.into());
        self
    }

    /// Load a catalog from a content directory
    pub async fn load(root: &Path) -> Result<Self> {
        super::loader::ContentLoader::new(root).load().await
    }

    /// Get an episode by id, sequence, or slug
    pub fn get_episode(&self, key: &EpisodeKey) -> Result<&Episode, CatalogError> {
        let found = match key {
            EpisodeKey::Id(id) => self.episode_by_id(*id),
            EpisodeKey::Sequence(seq) => self.episode_by_sequence(*seq),
            EpisodeKey::Number(n) => self
                .episode_by_sequence(Sequence(*n))
                .or_else(|| self.episode_by_id(EpisodeId(*n))),
            EpisodeKey::Slug(slug) => self.episode_by_slug(slug),
        };

        found.ok_or_else(|| CatalogError::EpisodeNotFound(key.clone()))
    }

    pub fn episode_by_id(&self, id: EpisodeId) -> Option<&Episode> {
        self.episodes.iter().find(|e| e.id == id)
    }

    pub fn episode_by_sequence(&self, sequence: Sequence) -> Option<&Episode> {
        self.episodes.iter().find(|e| e.sequence == sequence)
    }

    pub fn episode_by_slug(&self, slug: &str) -> Option<&Episode> {
        self.episodes.iter().find(|e| e.slug() == slug)
    }

    /// All episodes ordered by sequence number
    pub fn list_episodes(&self) -> &[Episode] {
        &self.episodes
    }

    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn get_collection(&self, slug: &str) -> Result<&Collection, CatalogError> {
        self.collections
            .iter()
            .find(|c| c.slug == slug)
            .ok_or_else(|| CatalogError::CollectionNotFound(slug.to_string()))
    }

    /// References of a collection (`<collection>`) or one of its sections
    /// (`<collection>/<section>`), in display order
    pub fn list_references(&self, path: &str) -> Result<Vec<&Reference>, CatalogError> {
        match path.split_once('/') {
            Some((collection, section)) => {
                let section = self.get_section(collection, section)?;
                Ok(section.references.iter().collect())
            }
            None => Ok(self.get_collection(path)?.references().collect()),
        }
    }

    /// Episodes listed by a section, skipping sequences the catalog lacks
    pub fn section_episodes(
        &self,
        collection: &str,
        section: &str,
    ) -> Result<Vec<&Episode>, CatalogError> {
        let section = self.get_section(collection, section)?;

        Ok(section
            .episodes
            .iter()
            .filter_map(|seq| self.episode_by_sequence(*seq))
            .collect())
    }

    fn get_section(
        &self,
        collection: &str,
        section: &str,
    ) -> Result<&crate::domain::Section, CatalogError> {
        self.get_collection(collection)?
            .section(section)
            .ok_or_else(|| CatalogError::SectionNotFound {
                collection: collection.to_string(),
                section: section.to_string(),
            })
    }

    /// Get the number of episodes
    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    /// Check if the catalog has no episodes
    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }
}
