//! Two-level table of contents derived from section content.
//!
//! Every section contributes a level-2 entry. Level-3 headings become its
//! children and level-4 headings attach to the most recent level-3 entry of
//! the same section. Headings found inside a level-3 heading's own children
//! are always treated as level 4, so the outline never grows deeper than two
//! levels below the section whatever the source nesting.
use serde::{Deserialize, Serialize};

use crate::{
  search::{Query, Searchable},
  types::{Element, Node, Section},
};

/// Outline level of a section entry.
pub const SECTION_LEVEL: u8 = 2;
/// Outline level of a primary heading within a section.
pub const PRIMARY_LEVEL: u8 = 3;
/// Outline level of a sub-heading.
pub const SECONDARY_LEVEL: u8 = 4;

/// A navigation item derived from a section or a heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
  /// Outline level (2, 3 or 4).
  pub level:    u8,
  pub title:    String,
  /// Target identifier for in-page navigation.
  pub id:       String,
  #[serde(default)]
  pub children: Vec<OutlineEntry>,
}

impl OutlineEntry {
  pub fn new(
    level: u8,
    title: impl Into<String>,
    id: impl Into<String>,
  ) -> Self {
    Self {
      level,
      title: title.into(),
      id: id.into(),
      children: Vec::new(),
    }
  }

  /// Ids of this entry and its descendants, in document order.
  #[must_use]
  pub fn ids(&self) -> Vec<&str> {
    let mut ids = Vec::new();
    self.collect_ids(&mut ids);
    ids
  }

  fn collect_ids<'a>(&'a self, out: &mut Vec<&'a str>) {
    out.push(&self.id);
    for child in &self.children {
      child.collect_ids(out);
    }
  }
}

/// Ids of a whole outline, in document order.
#[must_use]
pub fn outline_ids(outline: &[OutlineEntry]) -> Vec<&str> {
  outline.iter().flat_map(OutlineEntry::ids).collect()
}

/// Build the outline for `sections`, filtered by `query`.
///
/// A heading is listed when the query is empty or its title contains the
/// query. A section is listed when the query is empty, when the section
/// itself matches (title or content), or when at least one of its headings
/// was kept.
#[must_use]
pub fn build_outline(
  sections: &[Section],
  query: &Query,
) -> Vec<OutlineEntry> {
  sections
    .iter()
    .filter_map(|section| section_entry(section, query))
    .collect()
}

/// Outline entry for a single section, or `None` if it is filtered out.
#[must_use]
pub fn section_entry(
  section: &Section,
  query: &Query,
) -> Option<OutlineEntry> {
  let mut headings = Vec::new();
  collect_headings(section.content(), query, false, &mut headings);

  let visible = query.is_empty()
    || !headings.is_empty()
    || section.contains_match(query);
  if !visible {
    return None;
  }

  let mut entry =
    OutlineEntry::new(SECTION_LEVEL, section.title(), section.id());
  entry.children = headings;
  Some(entry)
}

fn collect_headings(
  nodes: &[Node],
  query: &Query,
  nested: bool,
  out: &mut Vec<OutlineEntry>,
) {
  for node in nodes {
    let Node::Element(element) = node else {
      continue;
    };

    match outline_level(element, nested) {
      Some(level) => {
        push_heading(element, level, query, out);
        // Anything below a heading is at most a sub-heading.
        collect_headings(&element.children, query, true, out);
      },
      None => collect_headings(&element.children, query, nested, out),
    }
  }
}

/// Effective outline level of a heading that carries an id.
fn outline_level(element: &Element, nested: bool) -> Option<u8> {
  element.id.as_ref()?;
  match element.tag.heading_level()? {
    PRIMARY_LEVEL if nested => Some(SECONDARY_LEVEL),
    level @ (PRIMARY_LEVEL | SECONDARY_LEVEL) => Some(level),
    _ => None,
  }
}

fn push_heading(
  element: &Element,
  level: u8,
  query: &Query,
  out: &mut Vec<OutlineEntry>,
) {
  let title = element.direct_text();
  if !query.matches(&title) {
    return;
  }

  let id = element.id.clone().unwrap_or_default();
  let entry = OutlineEntry::new(level, title.trim(), id);

  // A sub-heading goes under the last primary heading kept in the outline,
  // which under a query need not be its own.
  if level == PRIMARY_LEVEL {
    out.push(entry);
  } else if let Some(parent) = out.last_mut() {
    parent.children.push(entry);
  } else {
    log::debug!(
      "Dropping sub-heading {:?} with no preceding primary heading",
      entry.id
    );
  }
}
