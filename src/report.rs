//! Human-readable and JSON renderings of a run summary.
use crate::resequence::{Mode, Outcome, RunSummary, StoryReport};
use anyhow::{Context, Result};
use std::fmt::Write as _;

const RULE: &str = "============================================================";
const DETAIL_INDENT: &str = "        ";

pub fn render_json(summary: &RunSummary) -> Result<String> {
    serde_json::to_string_pretty(summary).context("serialize run summary")
}

pub fn render_text(summary: &RunSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}\nStory Sequence Tool\n{RULE}");
    match summary.mode {
        Mode::DryRun => out.push_str("DRY RUN MODE - No files will be modified\n"),
        Mode::ValidateOnly => out.push_str("VALIDATION ONLY\n"),
        Mode::Fix => {}
    }
    out.push('\n');

    for story in &summary.stories {
        render_story(&mut out, story, summary.total);
    }

    let _ = writeln!(out, "\n{RULE}\nSummary\n{RULE}");
    let counts = &summary.counts;
    match summary.mode {
        Mode::ValidateOnly => {
            let _ = writeln!(out, "Correct: {}", counts.correct);
            let _ = writeln!(out, "Incorrect: {}", counts.incorrect);
            let _ = writeln!(out, "Skipped: {}", counts.skipped);
        }
        Mode::DryRun => {
            let _ = writeln!(out, "Would fix: {}", counts.would_fix);
            let _ = writeln!(out, "Skipped: {}", counts.skipped);
            let _ = writeln!(out, "Already correct: {}", counts.correct);
        }
        Mode::Fix => {
            let _ = writeln!(out, "Fixed: {}", counts.fixed);
            let _ = writeln!(out, "Skipped: {}", counts.skipped);
            let _ = writeln!(out, "Already correct: {}", counts.correct);
        }
    }
    if !summary.missing.is_empty() {
        let _ = writeln!(out, "Missing: {}", summary.missing.len());
        for story in &summary.missing {
            let _ = writeln!(out, "{DETAIL_INDENT}{story}");
        }
    }
    out.push('\n');

    match summary.mode {
        Mode::ValidateOnly if counts.incorrect > 0 => {
            let _ = writeln!(out, "{} stories need correction", counts.incorrect);
            out.push_str("Run: resequence-stories  (without --validate-only)\n");
        }
        Mode::ValidateOnly => out.push_str("All stories are correctly sequenced!\n"),
        Mode::DryRun => {
            out.push_str("DRY RUN completed. No files were modified.\n");
            out.push_str("Run without --dry-run to apply changes.\n");
        }
        Mode::Fix => {
            let unresolved = unresolved_story_count(summary);
            if unresolved > 0 {
                let _ = writeln!(
                    out,
                    "{unresolved} stories still have unresolved header fields; add the missing lines by hand.\n"
                );
            } else {
                out.push_str("All story sequences have been fixed!\n\n");
            }
            out.push_str("Next steps:\n");
            out.push_str("  1. Review changes: git diff docs/stories/\n");
            out.push_str("  2. Validate: resequence-stories --validate-only\n");
            out.push_str(
                "  3. Commit: git add docs/stories/ && git commit -m 'fix: align story sequences with greenfield schedule'\n",
            );
        }
    }
    out
}

fn unresolved_story_count(summary: &RunSummary) -> usize {
    summary
        .stories
        .iter()
        .filter(|story| match &story.outcome {
            Outcome::Fixed { unresolved, .. } | Outcome::WouldFix { unresolved, .. } => {
                !unresolved.is_empty()
            }
            _ => false,
        })
        .count()
}

fn render_story(out: &mut String, story: &StoryReport, total: usize) {
    let seq = story
        .position
        .map(|position| format!("{position:02}/{total}"))
        .unwrap_or_default();
    let sprint = story.sprint.unwrap_or_default();
    match &story.outcome {
        Outcome::Skipped => {
            let _ = writeln!(out, "SKIP      {} (not in schedule)", story.story);
        }
        Outcome::Correct => {
            let _ = writeln!(out, "PASS      {} (seq {seq})", story.story);
        }
        Outcome::Incorrect { discrepancies } => {
            let _ = writeln!(out, "FAIL      {} (seq {seq})", story.story);
            for discrepancy in discrepancies {
                let _ = writeln!(out, "{DETAIL_INDENT}{discrepancy}");
            }
        }
        Outcome::WouldFix { unresolved, .. } => {
            let _ = writeln!(
                out,
                "DRY-RUN   {} → seq {seq}, sprint {sprint}",
                story.story
            );
            for discrepancy in unresolved {
                let _ = writeln!(out, "{DETAIL_INDENT}unresolved {discrepancy}");
            }
        }
        Outcome::Fixed { unresolved, .. } => {
            let _ = writeln!(
                out,
                "FIXED     {} → seq {seq}, sprint {sprint}",
                story.story
            );
            for discrepancy in unresolved {
                let _ = writeln!(out, "{DETAIL_INDENT}unresolved {discrepancy}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resequence::Counts;
    use crate::validate::{Discrepancy, HeaderField};
    use std::path::PathBuf;

    fn report(story: &str, position: Option<usize>, outcome: Outcome) -> StoryReport {
        StoryReport {
            story: story.to_string(),
            path: PathBuf::from(format!("docs/stories/{story}.md")),
            position,
            sprint: position.map(|_| 1),
            outcome,
        }
    }

    fn summary(mode: Mode, stories: Vec<StoryReport>, counts: Counts) -> RunSummary {
        RunSummary {
            mode,
            total: 41,
            counts,
            stories,
            missing: Vec::new(),
        }
    }

    #[test]
    fn validate_only_lists_discrepancies_and_failure_hint() {
        let stories = vec![
            report("STORY-A", Some(1), Outcome::Correct),
            report(
                "STORY-B",
                Some(2),
                Outcome::Incorrect {
                    discrepancies: vec![Discrepancy {
                        field: HeaderField::Title,
                        found: Some("1".to_string()),
                        expected: "2".to_string(),
                    }],
                },
            ),
            report("STORY-OLD", None, Outcome::Skipped),
        ];
        let counts = Counts {
            correct: 1,
            incorrect: 1,
            skipped: 1,
            ..Counts::default()
        };
        let text = render_text(&summary(Mode::ValidateOnly, stories, counts));
        assert!(text.contains("VALIDATION ONLY"));
        assert!(text.contains("PASS      STORY-A (seq 01/41)"));
        assert!(text.contains("FAIL      STORY-B (seq 02/41)\n        Title seq: 1 → 2\n"));
        assert!(text.contains("SKIP      STORY-OLD (not in schedule)"));
        assert!(text.contains("Correct: 1\nIncorrect: 1\nSkipped: 1\n"));
        assert!(text.contains("1 stories need correction"));
    }

    #[test]
    fn dry_run_summary_says_nothing_was_written() {
        let stories = vec![report(
            "STORY-C",
            Some(3),
            Outcome::WouldFix {
                discrepancies: Vec::new(),
                unresolved: Vec::new(),
            },
        )];
        let counts = Counts {
            would_fix: 1,
            ..Counts::default()
        };
        let mut summary = summary(Mode::DryRun, stories, counts);
        summary.missing = vec!["STORY-A".to_string()];
        let text = render_text(&summary);
        assert!(text.contains("DRY RUN MODE - No files will be modified"));
        assert!(text.contains("DRY-RUN   STORY-C → seq 03/41, sprint 1"));
        assert!(text.contains("Would fix: 1"));
        assert!(text.contains("Missing: 1\n        STORY-A\n"));
        assert!(text.contains("No files were modified."));
    }

    #[test]
    fn fix_summary_closes_with_next_steps() {
        let stories = vec![report(
            "STORY-B",
            Some(2),
            Outcome::Fixed {
                discrepancies: Vec::new(),
                unresolved: Vec::new(),
            },
        )];
        let counts = Counts {
            fixed: 1,
            ..Counts::default()
        };
        let text = render_text(&summary(Mode::Fix, stories, counts));
        assert!(text.contains("All story sequences have been fixed!"));
        assert!(text.contains("  1. Review changes: git diff docs/stories/\n"));
        assert!(text.contains("  3. Commit: git add docs/stories/ && git commit"));
    }

    #[test]
    fn fix_summary_does_not_claim_success_with_unresolved_fields() {
        let stories = vec![report(
            "STORY-A",
            Some(1),
            Outcome::Fixed {
                discrepancies: Vec::new(),
                unresolved: vec![Discrepancy {
                    field: HeaderField::Sprint,
                    found: None,
                    expected: "1".to_string(),
                }],
            },
        )];
        let counts = Counts {
            fixed: 1,
            ..Counts::default()
        };
        let text = render_text(&summary(Mode::Fix, stories, counts));
        assert!(text.contains("        unresolved Sprint: missing → 1\n"));
        assert!(text.contains("1 stories still have unresolved header fields"));
        assert!(!text.contains("All story sequences have been fixed!"));
    }

    #[test]
    fn json_output_tags_outcomes() {
        let stories = vec![report(
            "STORY-B",
            Some(2),
            Outcome::Fixed {
                discrepancies: vec![Discrepancy {
                    field: HeaderField::Prev,
                    found: None,
                    expected: "STORY-A.md".to_string(),
                }],
                unresolved: Vec::new(),
            },
        )];
        let counts = Counts {
            fixed: 1,
            ..Counts::default()
        };
        let json = render_json(&summary(Mode::Fix, stories, counts)).expect("render json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse json");
        assert_eq!(value["mode"], "fix");
        assert_eq!(value["counts"]["fixed"], 1);
        assert_eq!(value["stories"][0]["status"], "fixed");
        assert_eq!(value["stories"][0]["discrepancies"][0]["field"], "prev");
        assert!(value["stories"][0]["discrepancies"][0]["found"].is_null());
    }
}
