//! Caller-owned navigation state: expanded sections and the active outline
//! target.
//!
//! Nothing here is computed by the engine itself. The filter recommends which
//! sections to expand and the view reports which headings are on screen; these
//! types hold the resulting state for the caller.
use std::collections::BTreeSet;

use log::trace;

use crate::{
  outline::{OutlineEntry, outline_ids},
  search::FilterOutcome,
};

/// Set of section ids the reader has expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandState {
  expanded: BTreeSet<String>,
}

impl ExpandState {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  #[must_use]
  pub fn is_expanded(&self, id: &str) -> bool {
    self.expanded.contains(id)
  }

  pub fn expand(&mut self, id: impl Into<String>) {
    self.expanded.insert(id.into());
  }

  pub fn collapse(&mut self, id: &str) {
    self.expanded.remove(id);
  }

  /// Flip a section and return its new state.
  pub fn toggle(&mut self, id: &str) -> bool {
    if self.expanded.remove(id) {
      false
    } else {
      self.expanded.insert(id.to_string());
      true
    }
  }

  /// Synchronise with a filter result.
  ///
  /// With an active filter the expanded set becomes exactly the matching
  /// sections. Without one the reader's manual state is kept.
  pub fn apply(&mut self, outcome: &FilterOutcome<'_>) {
    if let Some(expand) = &outcome.expand {
      self.expanded.clone_from(expand);
    }
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.expanded.iter().map(String::as_str)
  }
}

/// Receives active-target changes from a [`ScrollSpy`].
pub trait TargetObserver {
  fn on_target_changed(&mut self, id: &str);
}

impl<F: FnMut(&str)> TargetObserver for F {
  fn on_target_changed(&mut self, id: &str) {
    self(id);
  }
}

/// Tracks which outline entry is currently in view.
///
/// The view reports the ids of the headings intersecting the viewport; the
/// active target is the first of them in document order. When nothing is
/// visible the previous target is kept.
#[derive(Debug, Clone, Default)]
pub struct ScrollSpy {
  order:  Vec<String>,
  active: Option<String>,
}

impl ScrollSpy {
  /// Track the entries of `outline`.
  #[must_use]
  pub fn new(outline: &[OutlineEntry]) -> Self {
    Self {
      order:  outline_ids(outline).into_iter().map(String::from).collect(),
      active: None,
    }
  }

  #[must_use]
  pub fn active(&self) -> Option<&str> {
    self.active.as_deref()
  }

  /// Replace the tracked outline, e.g. after the query changed. The active
  /// target is dropped if it is no longer part of the outline.
  pub fn reset(&mut self, outline: &[OutlineEntry]) {
    self.order = outline_ids(outline).into_iter().map(String::from).collect();
    if let Some(active) = &self.active
      && !self.order.contains(active)
    {
      self.active = None;
    }
  }

  /// Report the ids currently visible and notify `observer` if the active
  /// target changed. Unknown ids are ignored.
  pub fn update<'a, I, O>(&mut self, visible: I, observer: &mut O)
  where
    I: IntoIterator<Item = &'a str>,
    O: TargetObserver + ?Sized,
  {
    let visible: BTreeSet<&str> = visible.into_iter().collect();
    let Some(next) = self.order.iter().find(|id| visible.contains(id.as_str()))
    else {
      return;
    };

    if self.active.as_deref() == Some(next.as_str()) {
      return;
    }

    trace!("Active navigation target is now {next:?}");
    self.active = Some(next.clone());
    observer.on_target_changed(next);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    outline::build_outline,
    search::{Query, filter_sections},
    types::{Node, Section},
  };

  fn sections() -> Vec<Section> {
    vec![
      Section::new("Relatório", vec![
        Node::heading(3, "objetivo", "Objetivo"),
        Node::heading(4, "detalhes", "Detalhes"),
      ]),
      Section::new("Anexo I", vec![Node::text("CDE")]),
    ]
  }

  #[test]
  fn test_apply_replaces_state_for_active_query() {
    let sections = sections();
    let mut state = ExpandState::new();
    state.expand("relatorio");

    state.apply(&filter_sections(&sections, &Query::new("cde")));
    assert!(!state.is_expanded("relatorio"));
    assert!(state.is_expanded("anexo-i"));
  }

  #[test]
  fn test_apply_keeps_manual_state_without_query() {
    let sections = sections();
    let mut state = ExpandState::new();
    state.expand("relatorio");

    state.apply(&filter_sections(&sections, &Query::new("")));
    assert!(state.is_expanded("relatorio"));
    assert!(!state.is_expanded("anexo-i"));
  }

  #[test]
  fn test_toggle() {
    let mut state = ExpandState::new();
    assert!(state.toggle("anexo-i"));
    assert!(!state.toggle("anexo-i"));
    assert_eq!(state.iter().count(), 0);
  }

  #[test]
  fn test_scroll_spy_picks_first_visible_in_document_order() {
    let outline = build_outline(&sections(), &Query::new(""));
    let mut spy = ScrollSpy::new(&outline);
    let mut seen = Vec::new();
    let mut observer = |id: &str| seen.push(id.to_string());

    spy.update(["detalhes", "objetivo"], &mut observer);
    assert_eq!(spy.active(), Some("objetivo"));

    // Same target again: no notification.
    spy.update(["objetivo"], &mut observer);

    // Nothing visible keeps the previous target.
    spy.update(Vec::<&str>::new(), &mut observer);
    assert_eq!(spy.active(), Some("objetivo"));

    spy.update(["anexo-i", "unknown"], &mut observer);
    assert_eq!(spy.active(), Some("anexo-i"));

    assert_eq!(seen, ["objetivo", "anexo-i"]);
  }

  #[test]
  fn test_scroll_spy_reset_drops_stale_target() {
    let sections = sections();
    let mut spy = ScrollSpy::new(&build_outline(&sections, &Query::new("")));
    spy.update(["detalhes"], &mut |_: &str| {});
    assert_eq!(spy.active(), Some("detalhes"));

    spy.reset(&build_outline(&sections, &Query::new("cde")));
    assert_eq!(spy.active(), None);
  }
}
