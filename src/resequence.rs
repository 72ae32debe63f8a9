//! One pass over the stories directory: classify, validate, and fix.
use crate::fix::{fix_content, write_atomic};
use crate::header::parse_header;
use crate::schedule::{Placement, Schedule};
use crate::validate::{validate_header, Discrepancy};
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const STORY_PREFIX: &str = "STORY-";
pub const STORY_EXTENSION: &str = "md";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Fix,
    DryRun,
    ValidateOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Skipped,
    Correct,
    Incorrect {
        discrepancies: Vec<Discrepancy>,
    },
    Fixed {
        discrepancies: Vec<Discrepancy>,
        unresolved: Vec<Discrepancy>,
    },
    WouldFix {
        discrepancies: Vec<Discrepancy>,
        unresolved: Vec<Discrepancy>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct StoryReport {
    pub story: String,
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint: Option<u32>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Counts {
    pub correct: usize,
    pub incorrect: usize,
    pub fixed: usize,
    pub would_fix: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub mode: Mode,
    pub total: usize,
    pub counts: Counts,
    pub stories: Vec<StoryReport>,
    /// Scheduled stories with no document in the directory.
    pub missing: Vec<String>,
}

impl RunSummary {
    pub fn success(&self) -> bool {
        !(self.mode == Mode::ValidateOnly && self.counts.incorrect > 0)
    }
}

pub fn run(stories_dir: &Path, schedule: &Schedule, mode: Mode) -> Result<RunSummary> {
    let files = list_story_files(stories_dir)?;
    tracing::debug!(
        dir = %stories_dir.display(),
        candidates = files.len(),
        ?mode,
        "enumerated stories"
    );

    let mut counts = Counts::default();
    let mut stories = Vec::with_capacity(files.len());
    let mut seen = BTreeSet::new();

    for path in files {
        let story = story_id(&path)?;
        let Some(placement) = schedule.placement(&story) else {
            tracing::debug!(story = %story, "not in schedule; skipping");
            counts.skipped += 1;
            stories.push(StoryReport {
                story,
                path,
                position: None,
                sprint: None,
                outcome: Outcome::Skipped,
            });
            continue;
        };
        seen.insert(placement.id);

        let outcome = process_story(&path, &placement, mode)?;
        match &outcome {
            Outcome::Skipped => counts.skipped += 1,
            Outcome::Correct => counts.correct += 1,
            Outcome::Incorrect { .. } => counts.incorrect += 1,
            Outcome::Fixed { .. } => counts.fixed += 1,
            Outcome::WouldFix { .. } => counts.would_fix += 1,
        }
        stories.push(StoryReport {
            story,
            path,
            position: Some(placement.position),
            sprint: Some(placement.sprint),
            outcome,
        });
    }

    let missing: Vec<String> = schedule
        .placements()
        .filter(|placement| !seen.contains(placement.id))
        .map(|placement| placement.id.to_string())
        .collect();
    if !missing.is_empty() {
        tracing::warn!(
            count = missing.len(),
            "scheduled stories have no document: {}",
            missing.join(", ")
        );
    }

    Ok(RunSummary {
        mode,
        total: schedule.total(),
        counts,
        stories,
        missing,
    })
}

fn process_story(path: &Path, placement: &Placement<'_>, mode: Mode) -> Result<Outcome> {
    let content =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let discrepancies = validate_header(&parse_header(&content), placement);
    if discrepancies.is_empty() {
        tracing::debug!(story = placement.id, "header matches schedule");
        return Ok(Outcome::Correct);
    }
    tracing::debug!(
        story = placement.id,
        discrepancies = discrepancies.len(),
        "header differs from schedule"
    );

    if mode == Mode::ValidateOnly {
        return Ok(Outcome::Incorrect { discrepancies });
    }

    let fixed = fix_content(&content, placement);
    let unresolved = validate_header(&parse_header(&fixed), placement);
    if !unresolved.is_empty() {
        tracing::warn!(
            story = placement.id,
            unresolved = unresolved.len(),
            "fix cannot resolve every field; header lines may be missing"
        );
    }

    if mode == Mode::DryRun {
        return Ok(Outcome::WouldFix {
            discrepancies,
            unresolved,
        });
    }

    write_atomic(path, &fixed)?;
    tracing::info!(story = placement.id, path = %path.display(), "rewrote header");
    Ok(Outcome::Fixed {
        discrepancies,
        unresolved,
    })
}

/// Story files directly under `dir`, sorted by file name.
pub fn list_story_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(anyhow!("stories directory not found: {}", dir.display()));
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let entry = entry.with_context(|| format!("read {}", dir.display()))?;
        let path = entry.path();
        if path.is_file() && is_story_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn is_story_file(path: &Path) -> bool {
    let has_prefix = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(STORY_PREFIX));
    let has_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == STORY_EXTENSION);
    has_prefix && has_extension
}

fn story_id(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("story file name is not valid UTF-8: {}", path.display()))
}
