//! Header rewriting for stories that drifted from the schedule.
use crate::header::HEADER_WINDOW;
use crate::schedule::Placement;
use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

fn title_prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#\s+\d+\s+—").expect("title prefix regex"))
}

fn title_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#\s+\d+\s+—\s+").expect("title line regex"))
}

/// Rewrites the metadata lines inside the header window; every other line,
/// including body lines that happen to start with a metadata prefix, is kept
/// byte for byte.
pub fn fix_content(content: &str, placement: &Placement<'_>) -> String {
    let mut out = Vec::new();
    for (idx, raw) in content.split('\n').enumerate() {
        if idx >= HEADER_WINDOW {
            out.push(raw.to_string());
            continue;
        }
        let (line, ending) = match raw.strip_suffix('\r') {
            Some(line) => (line, "\r"),
            None => (raw, ""),
        };
        let fixed = match fix_line(idx, line, placement) {
            Some(fixed) => format!("{fixed}{ending}"),
            None => raw.to_string(),
        };
        out.push(fixed);
    }
    out.join("\n")
}

fn fix_line(idx: usize, line: &str, placement: &Placement<'_>) -> Option<String> {
    if idx == 0 && title_line_regex().is_match(line) {
        let replacement = format!("# {:02} —", placement.position);
        return Some(
            title_prefix_regex()
                .replace(line, regex::NoExpand(&replacement))
                .into_owned(),
        );
    }
    if line.starts_with("Sequence:") {
        return Some(sequence_line(placement));
    }
    if line.starts_with("Sprint:") {
        return Some(format!(
            "Sprint: {} | Lane: {}",
            placement.sprint, placement.lane
        ));
    }
    if line.starts_with("Global Sequence:") {
        return Some(format!(
            "Global Sequence: {}/{}",
            placement.position, placement.total
        ));
    }
    None
}

fn sequence_line(placement: &Placement<'_>) -> String {
    let mut parts = vec![format!(
        "Sequence: {:02}/{}",
        placement.position, placement.total
    )];
    if let Some(prev) = placement.prev {
        parts.push(format!("Prev: {prev}.md"));
    }
    if let Some(next) = placement.next {
        parts.push(format!("Next: {next}.md"));
    }
    parts.join(" | ")
}

/// Replaces the document behind `dest` through a sibling temp file so readers
/// never see a half-written story. Symlinks are written through and the
/// existing file mode is kept.
pub fn write_atomic(dest: &Path, content: &str) -> Result<()> {
    let target = fs::canonicalize(dest).with_context(|| format!("resolve {}", dest.display()))?;
    let permissions = fs::metadata(&target)
        .with_context(|| format!("stat {}", target.display()))?
        .permissions();
    let file_name = target
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("story");
    let tmp_path = target
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(format!(".{file_name}.tmp"));
    fs::write(&tmp_path, content).with_context(|| format!("write {}", tmp_path.display()))?;
    let published = fs::set_permissions(&tmp_path, permissions)
        .with_context(|| format!("set permissions on {}", tmp_path.display()))
        .and_then(|()| {
            fs::rename(&tmp_path, &target)
                .with_context(|| format!("replace {}", target.display()))
        });
    if published.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    published
}
