//! Story header extraction.
//!
//! Only the first [`HEADER_WINDOW`] lines are inspected. Each field has its own
//! line pattern; a later matching line overwrites an earlier one.
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

pub const HEADER_WINDOW: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedHeader {
    pub title_seq: Option<u32>,
    pub seq: Option<u32>,
    pub prev: Option<String>,
    pub next: Option<String>,
    pub sprint: Option<u32>,
    pub global_seq: Option<u32>,
}

fn title_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#\s+(\d+)\s+—\s+STORY-").expect("title regex"))
}

fn sequence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^Sequence:\s+(\d+)/(\d+)").expect("sequence regex"))
}

fn sprint_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^Sprint:\s+(\d+)").expect("sprint regex"))
}

fn global_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^Global\s+Sequence:\s+(\d+)/(\d+)$").expect("global regex"))
}

pub fn parse_header(content: &str) -> ParsedHeader {
    let mut header = ParsedHeader::default();
    for raw in content.split('\n').take(HEADER_WINDOW) {
        let line = raw.strip_suffix('\r').unwrap_or(raw);

        if let Some(caps) = title_regex().captures(line) {
            header.title_seq = parse_number(&caps[1]);
        }

        if let Some(caps) = sequence_regex().captures(line) {
            header.seq = parse_number(&caps[1]);
            let (prev, next) = parse_links(&line[caps[0].len()..]);
            if prev.is_some() {
                header.prev = prev;
            }
            if next.is_some() {
                header.next = next;
            }
        }

        if let Some(caps) = sprint_regex().captures(line) {
            header.sprint = parse_number(&caps[1]);
        }

        if let Some(caps) = global_regex().captures(line) {
            header.global_seq = parse_number(&caps[1]);
        }
    }
    header
}

/// Pulls `Prev:` and `Next:` targets out of the `| ...` segments that follow
/// `Sequence: NN/N`.
fn parse_links(rest: &str) -> (Option<String>, Option<String>) {
    let mut prev = None;
    let mut next = None;
    for segment in rest.split('|') {
        let segment = segment.trim();
        if let Some(target) = segment.strip_prefix("Prev:") {
            prev = non_empty(target);
        } else if let Some(target) = segment.strip_prefix("Next:") {
            next = non_empty(target);
        }
    }
    (prev, next)
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

// Oversized digit runs parse as absent rather than aborting the run.
fn parse_number(digits: &str) -> Option<u32> {
    digits.parse().ok()
}
