//! Case-insensitive substring search over content trees and sections.
use std::collections::BTreeSet;

use log::trace;

use crate::types::{Node, Section};

/// A search query as typed by the reader.
///
/// Matching is a case-insensitive substring test. A query that is empty or
/// only whitespace means "no filter" and matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
  raw:    String,
  needle: String,
}

impl Query {
  pub fn new(raw: impl Into<String>) -> Self {
    let raw = raw.into();
    let needle = raw.to_lowercase();
    Self { raw, needle }
  }

  /// The query exactly as given.
  #[must_use]
  pub fn as_str(&self) -> &str {
    &self.raw
  }

  /// Whether this query means "no filter".
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.raw.trim().is_empty()
  }

  /// Case-insensitive substring test. Always true for an empty query.
  #[must_use]
  pub fn matches(&self, text: &str) -> bool {
    self.is_empty() || text.to_lowercase().contains(&self.needle)
  }
}

impl From<&str> for Query {
  fn from(raw: &str) -> Self {
    Self::new(raw)
  }
}

impl From<String> for Query {
  fn from(raw: String) -> Self {
    Self::new(raw)
  }
}

/// Anything that can be tested for a query match.
pub trait Searchable {
  /// Whether the content contains a match for `query`.
  ///
  /// Hyperlinks never match, whatever their text.
  fn contains_match(&self, query: &Query) -> bool;
}

impl Searchable for Node {
  fn contains_match(&self, query: &Query) -> bool {
    if query.is_empty() {
      return true;
    }
    match self {
      Self::Text(text) => query.matches(text),
      Self::Element(_) if self.is_link() => false,
      Self::Element(element) => element.children.contains_match(query),
    }
  }
}

impl Searchable for [Node] {
  fn contains_match(&self, query: &Query) -> bool {
    query.is_empty() || self.iter().any(|node| node.contains_match(query))
  }
}

impl Searchable for Vec<Node> {
  fn contains_match(&self, query: &Query) -> bool {
    self.as_slice().contains_match(query)
  }
}

impl Searchable for Section {
  fn contains_match(&self, query: &Query) -> bool {
    query.matches(self.title()) || self.content().contains_match(query)
  }
}

/// Free-function form of [`Searchable::contains_match`].
#[must_use]
pub fn contains_match<T: Searchable + ?Sized>(
  content: &T,
  query: &Query,
) -> bool {
  content.contains_match(query)
}

/// Result of filtering sections by a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome<'a> {
  /// Visible sections, in document order.
  pub sections: Vec<&'a Section>,

  /// Section ids the view should expand. `None` when no filter is active, in
  /// which case the reader's own expand/collapse state must be left alone.
  pub expand: Option<BTreeSet<String>>,
}

impl FilterOutcome<'_> {
  /// Whether a filter is active and nothing matched.
  #[must_use]
  pub fn is_no_results(&self) -> bool {
    self.expand.is_some() && self.sections.is_empty()
  }
}

/// Select the sections visible for `query`.
///
/// An empty query keeps every section. Otherwise a section is kept when its
/// title or its content matches.
#[must_use]
pub fn filter_sections<'a>(
  sections: &'a [Section],
  query: &Query,
) -> FilterOutcome<'a> {
  if query.is_empty() {
    return FilterOutcome {
      sections: sections.iter().collect(),
      expand:   None,
    };
  }

  let visible: Vec<&Section> = sections
    .iter()
    .filter(|section| section.contains_match(query))
    .collect();

  trace!(
    "Query {:?} matched {} of {} sections",
    query.as_str(),
    visible.len(),
    sections.len()
  );

  let expand = visible
    .iter()
    .map(|section| section.id().to_string())
    .collect();

  FilterOutcome {
    sections: visible,
    expand:   Some(expand),
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]

  use super::*;
  use crate::types::Tag;

  fn paragraph(text: &str) -> Node {
    Node::element(Tag::Generic("p".into()), vec![Node::text(text)])
  }

  #[test]
  fn test_blank_query_matches_everything() {
    let node = paragraph("nada aqui");
    assert!(node.contains_match(&Query::new("")));
    assert!(node.contains_match(&Query::new("   ")));
    assert!(Query::new("\t").is_empty());
  }

  #[test]
  fn test_text_match_is_case_insensitive() {
    let node = Node::text("Camada de dados do CDE");
    assert!(node.contains_match(&Query::new("cde")));
    assert!(node.contains_match(&Query::new("CAMADA")));
    assert!(!node.contains_match(&Query::new("ledger")));
  }

  #[test]
  fn test_match_handles_unicode_case() {
    let node = Node::text("GOVERNANÇA");
    assert!(node.contains_match(&Query::new("governança")));
  }

  #[test]
  fn test_deep_nesting() {
    let mut node = Node::text("profundo");
    for _ in 0..200 {
      node = Node::element(Tag::Generic("div".into()), vec![node]);
    }
    assert!(node.contains_match(&Query::new("PROFUNDO")));
    assert!(!node.contains_match(&Query::new("raso")));
  }

  #[test]
  fn test_links_never_match() {
    let link = Node::link("https://example.com/cde", "Portal CDE");
    assert!(!link.contains_match(&Query::new("CDE")));

    let wrapper = Node::element(Tag::Generic("p".into()), vec![link]);
    assert!(!wrapper.contains_match(&Query::new("portal")));
  }

  #[test]
  fn test_childless_element_does_not_match() {
    let node = Node::element(Tag::Generic("hr".into()), Vec::new());
    assert!(!node.contains_match(&Query::new("hr")));
  }

  #[test]
  fn test_filter_empty_query_is_identity() {
    let sections = vec![
      Section::new("Relatório", vec![paragraph("a")]),
      Section::new("Anexo I", vec![paragraph("b")]),
    ];
    let outcome = filter_sections(&sections, &Query::new(""));
    assert_eq!(outcome.sections.len(), 2);
    assert_eq!(outcome.sections[0].title(), "Relatório");
    assert_eq!(outcome.sections[1].title(), "Anexo I");
    assert!(outcome.expand.is_none());
    assert!(!outcome.is_no_results());
  }

  #[test]
  fn test_filter_by_title_or_content() {
    let sections = vec![
      Section::new("Otimização do Fluxo Transacional", vec![paragraph(
        "O CDE concentra os registros.",
      )]),
      Section::new("Anexo CDE", vec![paragraph("sem menção")]),
      Section::new("Anexo II", vec![paragraph("nada")]),
    ];
    let outcome = filter_sections(&sections, &Query::new("cde"));
    let titles: Vec<_> = outcome.sections.iter().map(|s| s.title()).collect();
    assert_eq!(titles, ["Otimização do Fluxo Transacional", "Anexo CDE"]);

    let expand = outcome.expand.expect("expand set for active query");
    assert!(expand.contains("otimizacao-do-fluxo-transacional"));
    assert!(expand.contains("anexo-cde"));
    assert!(!expand.contains("anexo-ii"));
  }

  #[test]
  fn test_filter_no_results() {
    let sections = vec![Section::new("Anexo II", vec![paragraph("nada")])];
    let outcome = filter_sections(&sections, &Query::new("blockchain"));
    assert!(outcome.sections.is_empty());
    assert!(outcome.is_no_results());
  }
}
