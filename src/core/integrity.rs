//! Data-integrity checks over a loaded catalog.
//!
//! Findings come in two strengths:
//! - Violations: broken data (duplicate ids, empty exercises, dangling
//!   section entries). These always fail validation.
//! - Flags: placeholder or suspicious data (zeroed lengths, empty secrets,
//!   sentinel dates, TODO markers, backfilled publication dates). These are
//!   reported but only fail validation in strict mode.
//!
//! Publication dates must be non-decreasing in sequence order. Each dated
//! episode is compared with the latest date seen so far, so one early
//! outlier flags every later episode published before it. Equal dates pass.
//!
//! `TODO` markers match only as a whole word, case-sensitively.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{Episode, EpisodeId, Reference, Resolution, Sequence, Video, VideoSource};
use crate::library::Catalog;

/// Text marker for unfinished content
const TODO_MARKER: &str = "TODO";

/// Publication dates from this year on are placeholders
const SENTINEL_YEAR: i32 = 4000;

/// Options for an integrity run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntegrityOptions {
    /// Treat flags as failures
    #[serde(default)]
    pub strict: bool,
}

/// Which of an episode's videos a finding is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoSlot {
    Trailer,
    Full,
}

impl std::fmt::Display for VideoSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VideoSlot::Trailer => write!(f, "trailer"),
            VideoSlot::Full => write!(f, "full"),
        }
    }
}

/// Data that breaks a catalog invariant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityViolation {
    #[error("Sequence {sequence} is used by {count} episodes")]
    DuplicateSequence { sequence: Sequence, count: usize },

    #[error("Id {id} is used by {count} episodes")]
    DuplicateId { id: EpisodeId, count: usize },

    #[error("Episode {sequence} has an empty title")]
    EmptyTitle { sequence: Sequence },

    #[error("Episode {sequence}, exercise {exercise}: empty problem")]
    EmptyProblem { sequence: Sequence, exercise: usize },

    #[error("Episode {sequence}, exercise {exercise}: empty solution")]
    EmptySolution { sequence: Sequence, exercise: usize },

    #[error("Collection {collection}/{section} lists missing episode {sequence}")]
    DanglingEpisode {
        collection: String,
        section: String,
        sequence: Sequence,
    },
}

/// Placeholder or suspicious data, reported without failing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityFlag {
    #[error("Episode {sequence} published {published_at} before episode {previous} ({previous_published_at})")]
    PublishedOutOfOrder {
        sequence: Sequence,
        published_at: DateTime<Utc>,
        previous: Sequence,
        previous_published_at: DateTime<Utc>,
    },

    #[error("Episode {sequence} has a sentinel publication date {published_at}")]
    SentinelDate {
        sequence: Sequence,
        published_at: DateTime<Utc>,
    },

    #[error("Episode {sequence} has zero length")]
    ZeroLength { sequence: Sequence },

    #[error("Episode {sequence} {slot} video has zero bytes_length")]
    ZeroBytesLength { sequence: Sequence, slot: VideoSlot },

    #[error("Episode {sequence} {slot} video has an empty secret")]
    EmptySecret { sequence: Sequence, slot: VideoSlot },

    #[error("Episode {sequence} {slot} video has an empty host_id")]
    EmptyHostId { sequence: Sequence, slot: VideoSlot },

    #[error("Episode {sequence} {slot} video has an empty {resolution} asset key")]
    EmptyAssetKey {
        sequence: Sequence,
        slot: VideoSlot,
        resolution: Resolution,
    },

    #[error("Episode {sequence} {slot} video has an empty {field}")]
    EmptyUrl {
        sequence: Sequence,
        slot: VideoSlot,
        field: &'static str,
    },

    #[error("Episode {sequence} has a TODO marker in {field}")]
    TodoMarker { sequence: Sequence, field: String },

    #[error("Collection {collection}/{section} has a TODO marker in {field}")]
    SectionTodoMarker {
        collection: String,
        section: String,
        field: String,
    },
}

/// Outcome of an integrity run
#[derive(Debug, Clone, Default)]
pub struct IntegrityReport {
    pub episodes_checked: usize,
    pub violations: Vec<IntegrityViolation>,
    pub flags: Vec<IntegrityFlag>,
    pub strict: bool,
}

impl IntegrityReport {
    /// Whether the catalog passes under the options it was checked with
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty() && (!self.strict || self.flags.is_empty())
    }

    /// One-line summary
    pub fn summary(&self) -> String {
        format!(
            "{} episodes checked: {} violation(s), {} flag(s){}",
            self.episodes_checked,
            self.violations.len(),
            self.flags.len(),
            if self.strict { " [strict]" } else { "" }
        )
    }
}

/// Run every check over the catalog
pub fn check(catalog: &Catalog, options: &IntegrityOptions) -> IntegrityReport {
    let episodes = catalog.list_episodes();
    let mut report = IntegrityReport {
        episodes_checked: episodes.len(),
        strict: options.strict,
        ..Default::default()
    };

    check_uniqueness(episodes, &mut report);
    check_publication_order(episodes, &mut report);

    for episode in episodes {
        debug!(sequence = episode.sequence.0, "Checking episode {}", episode.title);
        check_episode(episode, &mut report);
    }

    check_collections(catalog, &mut report);

    for violation in &report.violations {
        warn!("{}", violation);
    }
    info!("{}", report.summary());

    report
}

fn check_uniqueness(episodes: &[Episode], report: &mut IntegrityReport) {
    let mut sequences: BTreeMap<Sequence, usize> = BTreeMap::new();
    let mut ids: BTreeMap<EpisodeId, usize> = BTreeMap::new();

    for episode in episodes {
        *sequences.entry(episode.sequence).or_default() += 1;
        *ids.entry(episode.id).or_default() += 1;
    }

    for (sequence, count) in sequences.into_iter().filter(|(_, n)| *n > 1) {
        report
            .violations
            .push(IntegrityViolation::DuplicateSequence { sequence, count });
    }

    for (id, count) in ids.into_iter().filter(|(_, n)| *n > 1) {
        report.violations.push(IntegrityViolation::DuplicateId { id, count });
    }
}

fn is_sentinel(date: &DateTime<Utc>) -> bool {
    date.timestamp() <= 0 || date.year() >= SENTINEL_YEAR
}

/// `text` contains `TODO` not embedded in a longer word
fn has_todo_marker(text: &str) -> bool {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';

    text.match_indices(TODO_MARKER).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let after = text[start + TODO_MARKER.len()..].chars().next();
        !before.is_some_and(is_word) && !after.is_some_and(is_word)
    })
}

/// Text fields of a reference that may carry markers, labelled for findings
fn reference_texts(index: usize, reference: &Reference) -> Vec<(String, &str)> {
    let mut texts = vec![(format!("reference {} title", index), reference.title.as_str())];
    if let Some(blurb) = &reference.blurb {
        texts.push((format!("reference {} blurb", index), blurb.as_str()));
    }
    texts
}

/// Episodes arrive in sequence order; each dated episode is compared with
/// the latest dated one before it
fn check_publication_order(episodes: &[Episode], report: &mut IntegrityReport) {
    let mut latest: Option<&Episode> = None;

    for episode in episodes {
        if is_sentinel(&episode.published_at) {
            report.flags.push(IntegrityFlag::SentinelDate {
                sequence: episode.sequence,
                published_at: episode.published_at,
            });
            continue;
        }

        match latest {
            Some(prev) if episode.published_at < prev.published_at => {
                report.flags.push(IntegrityFlag::PublishedOutOfOrder {
                    sequence: episode.sequence,
                    published_at: episode.published_at,
                    previous: prev.sequence,
                    previous_published_at: prev.published_at,
                });
            }
            _ => latest = Some(episode),
        }
    }
}

fn check_episode(episode: &Episode, report: &mut IntegrityReport) {
    let sequence = episode.sequence;

    if episode.title.trim().is_empty() {
        report.violations.push(IntegrityViolation::EmptyTitle { sequence });
    }

    if episode.length == 0 {
        report.flags.push(IntegrityFlag::ZeroLength { sequence });
    }

    // exercises are numbered from 1 in findings
    for (i, exercise) in episode.exercises.iter().enumerate() {
        let n = i + 1;

        if exercise.problem.trim().is_empty() {
            report
                .violations
                .push(IntegrityViolation::EmptyProblem { sequence, exercise: n });
        } else if has_todo_marker(&exercise.problem) {
            report.flags.push(IntegrityFlag::TodoMarker {
                sequence,
                field: format!("exercise {} problem", n),
            });
        }

        match &exercise.solution {
            Some(solution) if solution.trim().is_empty() => {
                report
                    .violations
                    .push(IntegrityViolation::EmptySolution { sequence, exercise: n });
            }
            Some(solution) if has_todo_marker(solution) => {
                report.flags.push(IntegrityFlag::TodoMarker {
                    sequence,
                    field: format!("exercise {} solution", n),
                });
            }
            _ => {}
        }
    }

    let mut texts = vec![
        ("title".to_string(), episode.title.as_str()),
        ("blurb".to_string(), episode.blurb.as_str()),
    ];
    if let Some(subtitle) = &episode.subtitle {
        texts.push(("subtitle".to_string(), subtitle.as_str()));
    }
    for (i, reference) in episode.references.iter().enumerate() {
        texts.extend(reference_texts(i + 1, reference));
    }

    for (field, text) in texts {
        if has_todo_marker(text) {
            report.flags.push(IntegrityFlag::TodoMarker { sequence, field });
        }
    }

    check_video(sequence, VideoSlot::Trailer, &episode.trailer_video, report);
    if let Some(full) = &episode.full_video {
        check_video(sequence, VideoSlot::Full, full, report);
    }
}

fn check_video(sequence: Sequence, slot: VideoSlot, video: &Video, report: &mut IntegrityReport) {
    if video.bytes_length == 0 {
        report
            .flags
            .push(IntegrityFlag::ZeroBytesLength { sequence, slot });
    }

    match &video.source {
        VideoSource::Direct {
            download_url,
            streaming_source,
        } => {
            for (field, value) in [
                ("download_url", download_url),
                ("streaming_source", streaming_source),
            ] {
                if value.trim().is_empty() {
                    report.flags.push(IntegrityFlag::EmptyUrl {
                        sequence,
                        slot,
                        field,
                    });
                }
            }
        }
        VideoSource::Hosted(assets) => {
            for resolution in Resolution::ALL {
                if assets.asset(resolution).trim().is_empty() {
                    report.flags.push(IntegrityFlag::EmptyAssetKey {
                        sequence,
                        slot,
                        resolution,
                    });
                }
            }
            if assets.host_id.trim().is_empty() {
                report.flags.push(IntegrityFlag::EmptyHostId { sequence, slot });
            }
            if assets.secret.trim().is_empty() {
                report.flags.push(IntegrityFlag::EmptySecret { sequence, slot });
            }
        }
    }
}

fn check_collections(catalog: &Catalog, report: &mut IntegrityReport) {
    for collection in catalog.collections() {
        for section in &collection.sections {
            for (i, reference) in section.references.iter().enumerate() {
                for (field, text) in reference_texts(i + 1, reference) {
                    if has_todo_marker(text) {
                        report.flags.push(IntegrityFlag::SectionTodoMarker {
                            collection: collection.slug.clone(),
                            section: section.slug.clone(),
                            field,
                        });
                    }
                }
            }

            for sequence in &section.episodes {
                if catalog.episode_by_sequence(*sequence).is_none() {
                    report.violations.push(IntegrityViolation::DanglingEpisode {
                        collection: collection.slug.clone(),
                        section: section.slug.clone(),
                        sequence: *sequence,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Exercise, HostedAssets};
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn video() -> Video {
        Video::direct(10, "https://example.com/a.mp4", "https://example.com/a.m3u8")
    }

    fn episode(id: u32, sequence: u32, published_at: DateTime<Utc>) -> Episode {
        Episode::new(id, sequence, format!("Episode {}", sequence), published_at, video())
            .with_blurb("A blurb.")
            .with_length(600)
    }

    #[test]
    fn test_clean_catalog_passes_strict() {
        let catalog = Catalog::new(
            vec![
                episode(1, 1, date(2018, 1, 29)),
                episode(2, 2, date(2018, 2, 5)),
            ],
            Vec::new(),
        );

        let report = check(&catalog, &IntegrityOptions { strict: true });
        assert!(report.is_ok(), "{:?}", report);
        assert_eq!(report.episodes_checked, 2);
    }

    #[test]
    fn test_duplicates_are_violations() {
        let catalog = Catalog::new(
            vec![
                episode(1, 1, date(2018, 1, 1)),
                episode(1, 2, date(2018, 1, 2)),
                episode(3, 2, date(2018, 1, 3)),
            ],
            Vec::new(),
        );

        let report = check(&catalog, &IntegrityOptions::default());
        assert!(!report.is_ok());
        assert!(report.violations.contains(&IntegrityViolation::DuplicateSequence {
            sequence: Sequence(2),
            count: 2
        }));
        assert!(report.violations.contains(&IntegrityViolation::DuplicateId {
            id: EpisodeId(1),
            count: 2
        }));
    }

    #[test]
    fn test_backfilled_date_is_flagged_not_rejected() {
        let catalog = Catalog::new(
            vec![
                episode(1, 1, date(2018, 1, 1)),
                episode(2, 2, date(2018, 3, 1)),
                episode(3, 3, date(2018, 2, 1)),
                episode(4, 4, date(2018, 4, 1)),
            ],
            Vec::new(),
        );

        let report = check(&catalog, &IntegrityOptions::default());
        assert!(report.is_ok());
        assert_eq!(report.flags.len(), 1);
        assert!(matches!(
            report.flags[0],
            IntegrityFlag::PublishedOutOfOrder {
                sequence: Sequence(3),
                previous: Sequence(2),
                ..
            }
        ));

        let strict = check(&catalog, &IntegrityOptions { strict: true });
        assert!(!strict.is_ok());
    }

    #[test]
    fn test_early_outlier_flags_every_later_backfill() {
        let catalog = Catalog::new(
            vec![
                episode(1, 1, date(2018, 3, 1)),
                episode(2, 2, date(2018, 1, 1)),
                episode(3, 3, date(2018, 2, 1)),
            ],
            Vec::new(),
        );

        let report = check(&catalog, &IntegrityOptions::default());
        let flagged: Vec<(Sequence, Sequence)> = report
            .flags
            .iter()
            .filter_map(|flag| match flag {
                IntegrityFlag::PublishedOutOfOrder {
                    sequence, previous, ..
                } => Some((*sequence, *previous)),
                _ => None,
            })
            .collect();

        assert_eq!(
            flagged,
            vec![(Sequence(2), Sequence(1)), (Sequence(3), Sequence(1))]
        );
    }

    #[test]
    fn test_equal_dates_are_in_order() {
        let catalog = Catalog::new(
            vec![
                episode(1, 1, date(2018, 2, 5)),
                episode(2, 2, date(2018, 2, 5)),
                episode(3, 3, date(2018, 2, 5)),
            ],
            Vec::new(),
        );

        let report = check(&catalog, &IntegrityOptions { strict: true });
        assert!(report.flags.is_empty(), "{:?}", report.flags);
        assert!(report.is_ok());
    }

    #[test]
    fn test_todo_marker_matches_whole_word() {
        assert!(has_todo_marker("TODO"));
        assert!(has_todo_marker("TODO: write this"));
        assert!(has_todo_marker("Fill in (TODO)."));
        assert!(!has_todo_marker("Posted on MASTODON"));
        assert!(!has_todo_marker("TODOS"));
        assert!(!has_todo_marker("MY_TODO"));
        assert!(!has_todo_marker("a todo list"));
    }

    #[test]
    fn test_todo_marker_in_subtitle_and_references() {
        use crate::domain::{Collection, Reference, Section};

        let ep = episode(1, 1, date(2018, 1, 1))
            .with_subtitle("TODO")
            .with_blurb("As discussed on MASTODON.")
            .with_reference(Reference::new("Lenses", "https://example.com/lenses"))
            .with_reference(
                Reference::new("Setters", "https://example.com/setters").with_blurb("TODO: summary"),
            );
        let catalog = Catalog::new(
            vec![ep],
            vec![Collection::new("basics", "Basics").with_section(
                Section::new("intro", "Intro")
                    .with_episode(1)
                    .with_reference(Reference::new("TODO", "https://example.com/todo")),
            )],
        );

        let report = check(&catalog, &IntegrityOptions::default());
        assert_eq!(
            report.flags,
            vec![
                IntegrityFlag::TodoMarker {
                    sequence: Sequence(1),
                    field: "subtitle".to_string()
                },
                IntegrityFlag::TodoMarker {
                    sequence: Sequence(1),
                    field: "reference 2 blurb".to_string()
                },
                IntegrityFlag::SectionTodoMarker {
                    collection: "basics".to_string(),
                    section: "intro".to_string(),
                    field: "reference 1 title".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_sentinel_date_skips_ordering() {
        let catalog = Catalog::new(
            vec![
                episode(1, 1, date(2018, 1, 1)),
                episode(2, 2, date(4001, 1, 1)),
                episode(3, 3, date(2018, 2, 1)),
            ],
            Vec::new(),
        );

        let report = check(&catalog, &IntegrityOptions::default());
        assert_eq!(
            report.flags,
            vec![IntegrityFlag::SentinelDate {
                sequence: Sequence(2),
                published_at: date(4001, 1, 1),
            }]
        );
    }

    #[test]
    fn test_exercise_checks() {
        let ep = episode(1, 1, date(2018, 1, 1))
            .with_exercise(Exercise::new("Fine."))
            .with_exercise(Exercise::new("   "))
            .with_exercise(Exercise::new("Has solution.").with_solution(""))
            .with_exercise(Exercise::new("TODO: write this"));

        let report = check(&Catalog::new(vec![ep], Vec::new()), &IntegrityOptions::default());

        assert_eq!(
            report.violations,
            vec![
                IntegrityViolation::EmptyProblem {
                    sequence: Sequence(1),
                    exercise: 2
                },
                IntegrityViolation::EmptySolution {
                    sequence: Sequence(1),
                    exercise: 3
                },
            ]
        );
        assert_eq!(
            report.flags,
            vec![IntegrityFlag::TodoMarker {
                sequence: Sequence(1),
                field: "exercise 4 problem".to_string()
            }]
        );
    }

    #[test]
    fn test_placeholder_video_flags() {
        let hosted = Video::hosted(
            0,
            HostedAssets {
                hd1080: "a".into(),
                hd720: "".into(),
                sd540: "c".into(),
                host_id: "1".into(),
                secret: "".into(),
            },
        );
        let ep = episode(1, 1, date(2018, 1, 1))
            .with_length(0)
            .with_full_video(hosted);

        let report = check(&Catalog::new(vec![ep], Vec::new()), &IntegrityOptions::default());
        let slot = VideoSlot::Full;
        let sequence = Sequence(1);

        assert!(report.violations.is_empty());
        assert_eq!(
            report.flags,
            vec![
                IntegrityFlag::ZeroLength { sequence },
                IntegrityFlag::ZeroBytesLength { sequence, slot },
                IntegrityFlag::EmptyAssetKey {
                    sequence,
                    slot,
                    resolution: Resolution::Hd720
                },
                IntegrityFlag::EmptySecret { sequence, slot },
            ]
        );
    }

    #[test]
    fn test_dangling_section_episode() {
        use crate::domain::{Collection, Section};

        let catalog = Catalog::new(
            vec![episode(1, 1, date(2018, 1, 1))],
            vec![Collection::new("basics", "Basics")
                .with_section(Section::new("intro", "Intro").with_episode(1).with_episode(7))],
        );

        let report = check(&catalog, &IntegrityOptions::default());
        assert_eq!(
            report.violations,
            vec![IntegrityViolation::DanglingEpisode {
                collection: "basics".to_string(),
                section: "intro".to_string(),
                sequence: Sequence(7),
            }]
        );
    }
}
