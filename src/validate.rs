//! Header checks against a story's schedule placement.
use crate::header::ParsedHeader;
use crate::schedule::Placement;
use serde::Serialize;
use std::fmt;

/// Link value a boundary story carries where it has no neighbour.
pub const NO_LINK: &str = "—";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderField {
    Title,
    Sequence,
    Prev,
    Next,
    Sprint,
    Global,
}

impl HeaderField {
    pub fn label(self) -> &'static str {
        match self {
            HeaderField::Title => "Title seq",
            HeaderField::Sequence => "Seq",
            HeaderField::Prev => "Prev",
            HeaderField::Next => "Next",
            HeaderField::Sprint => "Sprint",
            HeaderField::Global => "Global",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discrepancy {
    pub field: HeaderField,
    pub found: Option<String>,
    pub expected: String,
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let found = self.found.as_deref().unwrap_or("missing");
        write!(f, "{}: {} → {}", self.field.label(), found, self.expected)
    }
}

pub fn link_target(neighbour: Option<&str>) -> String {
    match neighbour {
        Some(id) => format!("{id}.md"),
        None => NO_LINK.to_string(),
    }
}

/// Runs every field check; an empty result means the header is correct.
pub fn validate_header(header: &ParsedHeader, placement: &Placement<'_>) -> Vec<Discrepancy> {
    let position = placement.position as u32;
    let mut discrepancies = Vec::new();

    check_number(
        &mut discrepancies,
        HeaderField::Title,
        header.title_seq,
        position,
        position.to_string(),
    );
    check_number(
        &mut discrepancies,
        HeaderField::Sequence,
        header.seq,
        position,
        format!("{position}/{}", placement.total),
    );
    check_link(
        &mut discrepancies,
        HeaderField::Prev,
        header.prev.as_deref(),
        placement.prev,
    );
    check_link(
        &mut discrepancies,
        HeaderField::Next,
        header.next.as_deref(),
        placement.next,
    );
    check_number(
        &mut discrepancies,
        HeaderField::Sprint,
        header.sprint,
        placement.sprint,
        placement.sprint.to_string(),
    );
    check_number(
        &mut discrepancies,
        HeaderField::Global,
        header.global_seq,
        position,
        format!("{position}/{}", placement.total),
    );

    discrepancies
}

fn check_number(
    out: &mut Vec<Discrepancy>,
    field: HeaderField,
    found: Option<u32>,
    expected: u32,
    expected_text: String,
) {
    if found == Some(expected) {
        return;
    }
    out.push(Discrepancy {
        field,
        found: found.map(|value| value.to_string()),
        expected: expected_text,
    });
}

// An omitted Prev/Next segment reads as the no-link sentinel.
fn check_link(
    out: &mut Vec<Discrepancy>,
    field: HeaderField,
    found: Option<&str>,
    neighbour: Option<&str>,
) {
    let expected = link_target(neighbour);
    if found.unwrap_or(NO_LINK) == expected {
        return;
    }
    out.push(Discrepancy {
        field,
        found: found.map(str::to_string),
        expected,
    });
}
