//! Canonical story order and the per-story placement derived from it.
//!
//! The schedule is data, not code: an ordered list of `{id, sprint, lane}`
//! records. Position and prev/next links come purely from list order, so the
//! only way to move a story is to move its record.
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

pub const SCHEDULE_SCHEMA_VERSION: u32 = 1;

const EMBEDDED_SCHEDULE: &str = include_str!("../data/greenfield_schedule.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryRecord {
    pub id: String,
    pub sprint: u32,
    pub lane: String,
}

#[derive(Debug, Deserialize)]
struct ScheduleFile {
    schema_version: u32,
    stories: Vec<StoryRecord>,
}

/// Immutable, validated story order.
#[derive(Debug, Clone)]
pub struct Schedule {
    stories: Vec<StoryRecord>,
}

/// Where one story sits in the schedule and what its header should say.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement<'a> {
    pub id: &'a str,
    pub position: usize,
    pub total: usize,
    pub prev: Option<&'a str>,
    pub next: Option<&'a str>,
    pub sprint: u32,
    pub lane: &'a str,
}

impl Schedule {
    /// The greenfield schedule compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_SCHEDULE).context("parse embedded greenfield schedule")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read schedule {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parse schedule {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let file: ScheduleFile = serde_json::from_str(text)?;
        if file.schema_version != SCHEDULE_SCHEMA_VERSION {
            return Err(anyhow!(
                "unsupported schedule schema_version {} (expected {})",
                file.schema_version,
                SCHEDULE_SCHEMA_VERSION
            ));
        }
        Self::from_records(file.stories)
    }

    pub fn from_records(stories: Vec<StoryRecord>) -> Result<Self> {
        if stories.is_empty() {
            return Err(anyhow!("schedule lists no stories"));
        }
        let mut seen = BTreeSet::new();
        for (idx, story) in stories.iter().enumerate() {
            if story.id.trim().is_empty() {
                return Err(anyhow!("schedule entry {} has an empty id", idx + 1));
            }
            if !seen.insert(story.id.as_str()) {
                return Err(anyhow!("duplicate story id in schedule: {}", story.id));
            }
            if story.sprint == 0 {
                return Err(anyhow!("story {} has sprint 0", story.id));
            }
            if story.lane.trim().is_empty() {
                return Err(anyhow!("story {} has no lane", story.id));
            }
        }
        Ok(Self { stories })
    }

    pub fn total(&self) -> usize {
        self.stories.len()
    }

    pub fn placement(&self, id: &str) -> Option<Placement<'_>> {
        self.index_of(id).map(|idx| self.placement_at(idx))
    }

    pub fn placements(&self) -> impl Iterator<Item = Placement<'_>> + '_ {
        (0..self.stories.len()).map(|idx| self.placement_at(idx))
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.stories.iter().position(|story| story.id == id)
    }

    fn placement_at(&self, idx: usize) -> Placement<'_> {
        let story = &self.stories[idx];
        Placement {
            id: &story.id,
            position: idx + 1,
            total: self.stories.len(),
            prev: idx
                .checked_sub(1)
                .map(|prev| self.stories[prev].id.as_str()),
            next: self.stories.get(idx + 1).map(|next| next.id.as_str()),
            sprint: story.sprint,
            lane: &story.lane,
        }
    }
}

#[cfg(test)]
pub(crate) fn schedule_of(records: &[(&str, u32, &str)]) -> Schedule {
    let stories = records
        .iter()
        .map(|(id, sprint, lane)| StoryRecord {
            id: id.to_string(),
            sprint: *sprint,
            lane: lane.to_string(),
        })
        .collect();
    Schedule::from_records(stories).expect("valid schedule")
}
