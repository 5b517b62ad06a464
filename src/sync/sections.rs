//! Section-level parsing and reconstruction of journal documents.
//!
//! A journal entry is an ordered sequence of sections delimited by level-2
//! markdown headings. The grammar is deliberately narrow:
//!
//! - A line starting with `## ` opens a new section named by the trimmed
//!   remainder of that line.
//! - Every line, including the heading line itself, belongs to the current
//!   section until the next heading line.
//! - Content before the first heading belongs to the `__header__` section.
//! - If the same heading text recurs, its blocks accumulate into the one
//!   entry, in order of first appearance. No line is ever dropped.
//!
//! Parsing and reconstruction are the two halves of the merge pipeline:
//! both sides of a sync are parsed into section maps, merged per section,
//! and reassembled into canonical document text.

use indexmap::IndexMap;

/// Sentinel name for content preceding the first heading.
pub const HEADER_KEY: &str = "__header__";

/// Heading prefix that opens a new section.
const HEADING_MARKER: &str = "## ";

/// Well-known section names, in canonical output order. Matched by prefix
/// so decorated headings ("Completed ✅") sort with their base name.
const SECTION_PRIORITY: [&str; 7] = [
    "Completed",
    "In Progress",
    "Backlog",
    "Notes",
    "Inbox",
    "Timestamps",
    "Lessons Learned",
];

/// Ordered map from section name to section body.
///
/// Bodies contain the full block text including the heading line. Insertion
/// order is the order of first appearance in the source document.
pub type SectionMap = IndexMap<String, String>;

/// Split a document into named sections.
///
/// The `__header__` entry is always present, even for an empty document,
/// so merge and reconstruction never need to special-case its absence.
#[must_use]
pub fn parse_sections(doc: &str) -> SectionMap {
    let mut sections = SectionMap::new();
    sections.insert(HEADER_KEY.to_string(), String::new());
    let mut current = HEADER_KEY.to_string();

    // split_inclusive keeps each line's terminator, so concatenating the
    // bodies reproduces the document byte for byte.
    for line in doc.split_inclusive('\n') {
        if let Some(rest) = line.strip_prefix(HEADING_MARKER) {
            current = rest.trim().to_string();
            sections.entry(current.clone()).or_default();
        }
        let body = sections
            .get_mut(&current)
            .expect("current section was just inserted");
        body.push_str(line);
    }

    sections
}

/// Reassemble a section map into canonical document text.
///
/// Order: `__header__` first, then the well-known sections in priority
/// order, then any remaining sections in first-seen order. Section bodies
/// are emitted unaltered; a newline is inserted between sections only when
/// the preceding body did not end with one.
#[must_use]
pub fn reconstruct(sections: &SectionMap) -> String {
    let mut out = String::new();
    for name in canonical_order(sections) {
        let body = &sections[name];
        if body.is_empty() {
            continue;
        }
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(body);
    }
    out
}

/// Section names in canonical output order.
fn canonical_order(sections: &SectionMap) -> Vec<&String> {
    let mut ordered: Vec<&String> = Vec::with_capacity(sections.len());

    if let Some((header, _)) = sections.get_key_value(HEADER_KEY) {
        ordered.push(header);
    }

    for priority in SECTION_PRIORITY {
        for name in sections.keys() {
            if name != HEADER_KEY && !ordered.contains(&name) && matches_priority(name, priority) {
                ordered.push(name);
            }
        }
    }

    for name in sections.keys() {
        if !ordered.contains(&name) {
            ordered.push(name);
        }
    }

    ordered
}

fn matches_priority(name: &str, priority: &str) -> bool {
    name == priority || name.starts_with(priority)
}
