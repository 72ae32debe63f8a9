//! Shared test infrastructure for integration tests.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A scratch repository with a `docs/stories` directory and a small schedule.
pub struct StoryFixture {
    pub root: TempDir,
    pub schedule_path: PathBuf,
    stories: Vec<(String, u32, String)>,
}

impl StoryFixture {
    /// Stories named `STORY-01`..`STORY-{count}`, three per sprint, all in lane "Platform".
    pub fn with_stories(count: usize) -> Self {
        let stories = (1..=count)
            .map(|n| {
                (
                    format!("STORY-{n:02}"),
                    ((n - 1) / 3 + 1) as u32,
                    "Platform".to_string(),
                )
            })
            .collect();
        Self::new(stories)
    }

    pub fn new(stories: Vec<(String, u32, String)>) -> Self {
        let root = TempDir::new().expect("create temp dir");
        std::fs::create_dir_all(root.path().join("docs/stories")).expect("create stories dir");
        let schedule_path = root.path().join("schedule.json");
        let records: Vec<serde_json::Value> = stories
            .iter()
            .map(|(id, sprint, lane)| serde_json::json!({"id": id, "sprint": sprint, "lane": lane}))
            .collect();
        let schedule = serde_json::json!({"schema_version": 1, "stories": records});
        std::fs::write(
            &schedule_path,
            serde_json::to_string_pretty(&schedule).expect("serialize schedule"),
        )
        .expect("write schedule");
        Self {
            root,
            schedule_path,
            stories,
        }
    }

    pub fn stories_dir(&self) -> PathBuf {
        self.root.path().join("docs/stories")
    }

    pub fn story_path(&self, id: &str) -> PathBuf {
        self.stories_dir().join(format!("{id}.md"))
    }

    /// The header every scheduled story should carry, followed by a body whose
    /// `Sprint:` line sits past the header window.
    pub fn expected_story(&self, id: &str) -> String {
        let total = self.stories.len();
        let idx = self
            .stories
            .iter()
            .position(|(story, _, _)| story == id)
            .expect("story in fixture schedule");
        let (_, sprint, lane) = &self.stories[idx];
        let mut sequence = format!("Sequence: {:02}/{total}", idx + 1);
        if idx > 0 {
            sequence.push_str(&format!(" | Prev: {}.md", self.stories[idx - 1].0));
        }
        if let Some((next, _, _)) = self.stories.get(idx + 1) {
            sequence.push_str(&format!(" | Next: {next}.md"));
        }
        format!(
            "# {:02} — {id}: Title\n\n{sequence}\nSprint: {sprint} | Lane: {lane}\nGlobal Sequence: {}/{total}\n\n## Body\n\n{}Sprint: planning notes live here.\n",
            idx + 1,
            idx + 1,
            "Details.\n".repeat(4)
        )
    }

    pub fn write_story(&self, id: &str, content: &str) {
        std::fs::write(self.story_path(id), content).expect("write story");
    }

    pub fn read_story(&self, id: &str) -> String {
        std::fs::read_to_string(self.story_path(id)).expect("read story")
    }

    pub fn seed_correct(&self) {
        for (id, _, _) in &self.stories {
            self.write_story(id, &self.expected_story(id));
        }
    }

    /// Runs the binary from the fixture root so the default `docs/stories` resolves.
    pub fn run(&self, args: &[&str]) -> Output {
        run_in(self.root.path(), &self.schedule_path, args)
    }
}

pub fn run_in(cwd: &Path, schedule: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_resequence-stories"))
        .current_dir(cwd)
        .arg("--schedule")
        .arg(schedule)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run resequence-stories")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}
