//! Command-line interface for the episode catalog.
//!
//! Provides commands for listing and showing episodes, listing collection
//! references, resolving video URLs, validating content and exporting the
//! catalog as JSON.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

use crate::adapters::VideoHost;
use crate::config;
use crate::core::{self, IntegrityOptions};
use crate::domain::{Episode, Resolution};
use crate::library::{Catalog, EpisodeKey};

/// episode-catalog - Typed content catalog for a video series
#[derive(Parser, Debug)]
#[command(name = "episode-catalog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Content directory (overrides config and CATALOG_CONTENT)
    #[arg(long, global = true)]
    pub content: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List episodes in sequence order
    List,

    /// Show one episode
    Show {
        /// Sequence, id, `id:<n>`, `seq:<n>`, or slug
        key: String,

        /// Print exercises and solutions
        #[arg(short, long)]
        exercises: bool,
    },

    /// List references of a collection or `<collection>/<section>`
    References {
        /// Collection slug, optionally followed by `/<section>`
        path: String,
    },

    /// Resolve the URLs of an episode's video
    Video {
        /// Sequence, id, `id:<n>`, `seq:<n>`, or slug
        key: String,

        /// Resolution for hosted videos
        #[arg(short, long, value_enum, default_value = "1080")]
        resolution: ResolutionArg,

        /// Resolve the full video instead of the trailer
        #[arg(long)]
        full: bool,
    },

    /// Check content integrity
    Validate {
        /// Fail on placeholder flags as well as violations
        #[arg(long)]
        strict: bool,
    },

    /// Write the catalog as JSON
    Export {
        /// Output file (stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Resolution for CLI (maps to Resolution)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ResolutionArg {
    #[value(name = "1080")]
    Hd1080,

    #[value(name = "720")]
    Hd720,

    #[value(name = "540")]
    Sd540,
}

impl From<ResolutionArg> for Resolution {
    fn from(r: ResolutionArg) -> Self {
        match r {
            ResolutionArg::Hd1080 => Resolution::Hd1080,
            ResolutionArg::Hd720 => Resolution::Hd720,
            ResolutionArg::Sd540 => Resolution::Sd540,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        if let Commands::Config = self.command {
            return show_config();
        }

        let catalog = load_catalog(self.content.as_deref()).await?;

        match self.command {
            Commands::List => list_episodes(&catalog),
            Commands::Show { key, exercises } => show_episode(&catalog, &key, exercises),
            Commands::References { path } => list_references(&catalog, &path),
            Commands::Video {
                key,
                resolution,
                full,
            } => show_video(&catalog, &key, resolution.into(), full),
            Commands::Validate { strict } => validate(&catalog, strict),
            Commands::Export { output } => export(&catalog, output).await,
            Commands::Config => show_config(),
        }
    }
}

/// Load the catalog from the flag, or from the configured content root
async fn load_catalog(content: Option<&Path>) -> Result<Catalog> {
    let root = match content {
        Some(dir) => dir.to_path_buf(),
        None => config::content_dir()?,
    };

    debug!("Loading catalog from {}", root.display());
    Catalog::load(&root)
        .await
        .with_context(|| format!("Failed to load catalog from {}", root.display()))
}

fn find_episode<'a>(catalog: &'a Catalog, key: &str) -> Result<&'a Episode> {
    let key: EpisodeKey = key.parse()?;
    Ok(catalog.get_episode(&key)?)
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let cut: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        s.to_string()
    }
}

/// List episodes in sequence order
fn list_episodes(catalog: &Catalog) -> Result<()> {
    if catalog.is_empty() {
        println!("Catalog is empty.");
        return Ok(());
    }

    println!(
        "{:<5} {:<5} {:<11} {:<11} {:<50}",
        "SEQ", "ID", "ACCESS", "PUBLISHED", "TITLE"
    );
    println!("{}", "-".repeat(85));

    for episode in catalog.list_episodes() {
        println!(
            "{:<5} {:<5} {:<11} {:<11} {:<50}",
            episode.sequence.to_string(),
            episode.id.to_string(),
            episode.permission.to_string(),
            episode.published_at.format("%Y-%m-%d").to_string(),
            truncate(&episode.full_title(), 50)
        );
    }

    println!("\nTotal: {} episodes", catalog.len());

    Ok(())
}

/// Show one episode
fn show_episode(catalog: &Catalog, key: &str, with_exercises: bool) -> Result<()> {
    let episode = find_episode(catalog, key)?;

    println!("#{} {}", episode.sequence, episode.full_title());
    println!("  ID: {}", episode.id);
    println!("  Slug: {}", episode.slug());
    println!("  Access: {}", episode.permission);
    println!("  Published: {}", episode.published_at.format("%Y-%m-%d"));
    println!("  Length: {}m{:02}s", episode.length / 60, episode.length % 60);
    if let Some(dir) = &episode.code_sample_directory {
        println!("  Code samples: {}", dir);
    }
    println!("  Trailer: {} ({} bytes)", episode.trailer_video.kind(), episode.trailer_video.bytes_length);
    if let Some(full) = &episode.full_video {
        println!("  Full video: {} ({} bytes)", full.kind(), full.bytes_length);
    }
    println!();
    println!("{}", episode.blurb.trim());

    if !episode.references.is_empty() {
        println!("\nReferences:");
        for reference in &episode.references {
            print_reference(reference);
        }
    }

    println!("\nExercises: {}", episode.exercises.len());
    if with_exercises {
        for (i, exercise) in episode.exercises.iter().enumerate() {
            println!("\n=== Exercise {} ===\n", i + 1);
            println!("{}", exercise.problem.trim());
            if let Some(solution) = &exercise.solution {
                println!("\n--- Solution ---\n");
                println!("{}", solution.trim());
            }
        }
    }

    Ok(())
}

fn print_reference(reference: &crate::domain::Reference) {
    match &reference.author {
        Some(author) => println!("  - {} ({})", reference.title, author),
        None => println!("  - {}", reference.title),
    }
    println!("    {}", reference.link);
    if let Some(blurb) = &reference.blurb {
        println!("    {}", truncate(blurb.trim(), 100));
    }
}

/// List references of a collection or section
fn list_references(catalog: &Catalog, path: &str) -> Result<()> {
    let references = catalog.list_references(path)?;

    if references.is_empty() {
        println!("No references for: {}", path);
        return Ok(());
    }

    println!("{} reference(s) for \"{}\":\n", references.len(), path);
    for reference in references {
        print_reference(reference);
    }

    Ok(())
}

/// Resolve video URLs for an episode
fn show_video(catalog: &Catalog, key: &str, resolution: Resolution, full: bool) -> Result<()> {
    let episode = find_episode(catalog, key)?;

    let video = if full {
        episode
            .full_video
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Episode {} has no full video", episode.sequence))?
    } else {
        &episode.trailer_video
    };

    let host = &config::config()?.hosting;
    let resolved = video
        .resolve(resolution, host)
        .with_context(|| format!("Failed to resolve video via {} host", host.name()))?;

    println!("Episode: #{} {}", episode.sequence, episode.title);
    println!("Source: {}", video.kind());
    match resolved.resolution {
        Some(r) => println!("Resolution: {}", r),
        None => println!("Resolution: (direct)"),
    }
    println!("Download: {}", resolved.download_url);
    println!("Stream: {}", resolved.streaming_url);
    println!("Size: {} bytes", resolved.bytes_length);

    Ok(())
}

/// `--strict` wins; otherwise the configured options apply, and a config
/// that fails to load is an error
fn integrity_options(
    strict_flag: bool,
    configured: impl FnOnce() -> Result<IntegrityOptions>,
) -> Result<IntegrityOptions> {
    if strict_flag {
        return Ok(IntegrityOptions { strict: true });
    }
    configured()
}

/// Run integrity checks, exiting non-zero on failure
fn validate(catalog: &Catalog, strict_flag: bool) -> Result<()> {
    let options = integrity_options(strict_flag, || Ok(config::config()?.integrity.clone()))?;

    let report = core::check(catalog, &options);

    if let Some(fingerprint) = &catalog.fingerprint {
        println!("Content: {}", fingerprint);
    }

    if !report.violations.is_empty() {
        println!("\nViolations:");
        for violation in &report.violations {
            println!("  x {}", violation);
        }
    }

    if !report.flags.is_empty() {
        println!("\nFlags:");
        for flag in &report.flags {
            println!("  ! {}", flag);
        }
    }

    println!("\n{}", report.summary());

    if !report.is_ok() {
        eprintln!("\n[Validation failed]");
        std::process::exit(1);
    }

    Ok(())
}

/// Export the catalog as JSON
async fn export(catalog: &Catalog, output: Option<PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(catalog)?;

    match output {
        Some(path) => {
            tokio::fs::write(&path, json)
                .await
                .with_context(|| format!("Failed to write export: {}", path.display()))?;
            eprintln!("Exported {} episodes to {}", catalog.len(), path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("Episode catalog configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Home:    {}", cfg.home.display());
    println!("  Content: {}", cfg.content.display());
    println!();
    println!("Hosting:");
    println!(
        "  Asset URL template:     {}",
        cfg.hosting.asset_url_template.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  Streaming URL template: {}",
        cfg.hosting.streaming_url_template.as_deref().unwrap_or("(not set)")
    );
    println!();
    println!("Integrity:");
    println!("  Strict: {}", cfg.integrity.strict);

    Ok(())
}
