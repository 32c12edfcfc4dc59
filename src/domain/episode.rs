//! Episodes and their exercises.
//!
//! An episode is one published video with its metadata, the exercises
//! attached to it, and the references it cites.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::reference::Reference;
use super::video::Video;

/// Stable episode identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpisodeId(pub u32);

impl std::fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of an episode in the series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sequence(pub u32);

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who may watch an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Available to everyone
    Free,

    /// Requires an active subscription
    SubscriberOnly,
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Permission::Free => write!(f, "free"),
            Permission::SubscriberOnly => write!(f, "subscriber_only"),
        }
    }
}

/// A practice problem attached to an episode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Exercise {
    /// Problem statement, may embed code samples
    pub problem: String,

    /// Worked solution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
}

impl Exercise {
    pub fn new(problem: impl Into<String>) -> Self {
        Self {
            problem: problem.into(),
            solution: None,
        }
    }

    pub fn with_solution(mut self, solution: impl Into<String>) -> Self {
        self.solution = Some(solution.into());
        self
    }
}

/// One published episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: EpisodeId,

    pub sequence: Sequence,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    pub blurb: String,

    pub permission: Permission,

    pub published_at: DateTime<Utc>,

    /// Runtime in seconds
    pub length: u32,

    /// Directory holding the episode's sample code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_sample_directory: Option<String>,

    #[serde(default)]
    pub exercises: Vec<Exercise>,

    #[serde(default)]
    pub references: Vec<Reference>,

    pub trailer_video: Video,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_video: Option<Video>,
}

impl Episode {
    /// Create an episode with the required fields; the rest start empty
    pub fn new(
        id: u32,
        sequence: u32,
        title: impl Into<String>,
        published_at: DateTime<Utc>,
        trailer_video: Video,
    ) -> Self {
        Self {
            id: EpisodeId(id),
            sequence: Sequence(sequence),
            title: title.into(),
            subtitle: None,
            blurb: String::new(),
            permission: Permission::SubscriberOnly,
            published_at,
            length: 0,
            code_sample_directory: None,
            exercises: Vec::new(),
            references: Vec::new(),
            trailer_video,
            full_video: None,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_blurb(mut self, blurb: impl Into<String>) -> Self {
        self.blurb = blurb.into();
        self
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permission = permission;
        self
    }

    pub fn with_length(mut self, seconds: u32) -> Self {
        self.length = seconds;
        self
    }

    pub fn with_exercise(mut self, exercise: Exercise) -> Self {
        self.exercises.push(exercise);
        self
    }

    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.references.push(reference);
        self
    }

    pub fn with_full_video(mut self, video: Video) -> Self {
        self.full_video = Some(video);
        self
    }

    /// URL slug, e.g. `ep6-functional-setters`
    pub fn slug(&self) -> String {
        format!("ep{}-{}", self.sequence, kebab_case(&self.title))
    }

    /// Title with the subtitle appended when present
    pub fn full_title(&self) -> String {
        match &self.subtitle {
            Some(subtitle) => format!("{}: {}", self.title, subtitle),
            None => self.title.clone(),
        }
    }

    pub fn is_free(&self) -> bool {
        self.permission == Permission::Free
    }
}

/// Lowercase, alphanumerics only, runs of anything else collapse to one `-`
fn kebab_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_dash = false;

    for c in s.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    out
}
