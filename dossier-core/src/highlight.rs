//! Search highlighting and domain-term emphasis.
//!
//! Both transforms rewrite text leaves by wrapping matched runs in a marker
//! element ([`Tag::Mark`] for search hits, [`Tag::Strong`] for vocabulary
//! terms) and rebuild every element around its rewritten children. Elements
//! without children pass through unchanged, and so do hyperlinks with their
//! whole subtree. Emphasis additionally leaves inline code and pre-formatted
//! blocks alone.
use std::sync::OnceLock;

use log::warn;
use regex::{Regex, RegexBuilder};

use crate::{
  search::Query,
  types::{Node, Tag},
};

/// Domain terms emphasised throughout the dossier unless configured
/// otherwise.
pub const DEFAULT_VOCABULARY: &[&str] = &[
  "Governança",
  "Automação",
  "Rastreabilidade",
  "Conformidade",
  "Auditoria",
  "Transparência",
  "Integridade",
  "Segurança",
  "Interoperabilidade",
  "Blockchain",
];

struct Rewriter<'a> {
  pattern: &'a Regex,
  marker:  Tag,
  skip:    fn(&Tag) -> bool,
}

impl Rewriter<'_> {
  fn rewrite(&self, node: &Node) -> Node {
    let mut out = Vec::with_capacity(1);
    self.rewrite_into(node, &mut out);
    if out.len() == 1
      && let Some(single) = out.pop()
    {
      return single;
    }
    Node::element(Tag::Fragment, out)
  }

  fn rewrite_all(&self, nodes: &[Node]) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
      self.rewrite_into(node, &mut out);
    }
    out
  }

  fn rewrite_into(&self, node: &Node, out: &mut Vec<Node>) {
    match node {
      Node::Text(text) => self.split_text(text, out),
      Node::Element(element)
        if element.children.is_empty() || (self.skip)(&element.tag) =>
      {
        out.push(node.clone());
      },
      Node::Element(element) => {
        let children = self.rewrite_all(&element.children);
        out.push(Node::Element(element.rebuild(children)));
      },
    }
  }

  /// Split `text` into verbatim runs and marked matches, preserving order.
  fn split_text(&self, text: &str, out: &mut Vec<Node>) {
    let mut last = 0;
    for found in self.pattern.find_iter(text) {
      if found.as_str().is_empty() {
        continue;
      }
      if found.start() > last {
        out.push(Node::text(&text[last..found.start()]));
      }
      out.push(Node::element(self.marker.clone(), vec![Node::text(
        found.as_str(),
      )]));
      last = found.end();
    }

    if last == 0 {
      out.push(Node::text(text));
    } else if last < text.len() {
      out.push(Node::text(&text[last..]));
    }
  }
}

const fn skip_links(tag: &Tag) -> bool {
  matches!(tag, Tag::Link)
}

const fn skip_literal(tag: &Tag) -> bool {
  matches!(tag, Tag::Link | Tag::Code | Tag::Pre)
}

/// Wraps case-insensitive occurrences of a search query in highlight
/// markers.
///
/// The query is matched literally: regex metacharacters are escaped before
/// compilation. If compilation still fails the highlighter is inert and
/// returns content unchanged.
#[derive(Debug, Clone, Default)]
pub struct Highlighter {
  pattern: Option<Regex>,
}

impl Highlighter {
  #[must_use]
  pub fn new(query: &Query) -> Self {
    if query.is_empty() {
      return Self::default();
    }

    let pattern = RegexBuilder::new(&regex::escape(query.as_str()))
      .case_insensitive(true)
      .build()
      .map_err(|e| {
        warn!(
          "Could not build highlight pattern for {:?}, highlighting \
           disabled: {e}",
          query.as_str()
        );
      })
      .ok();

    Self { pattern }
  }

  /// Whether this highlighter will change anything.
  #[must_use]
  pub const fn is_active(&self) -> bool {
    self.pattern.is_some()
  }

  #[must_use]
  pub fn apply(&self, node: &Node) -> Node {
    self
      .rewriter()
      .map_or_else(|| node.clone(), |rewriter| rewriter.rewrite(node))
  }

  /// Rewrite a sequence of siblings. Split text leaves are spliced into the
  /// sequence instead of being grouped.
  #[must_use]
  pub fn apply_all(&self, nodes: &[Node]) -> Vec<Node> {
    self
      .rewriter()
      .map_or_else(|| nodes.to_vec(), |rewriter| rewriter.rewrite_all(nodes))
  }

  fn rewriter(&self) -> Option<Rewriter<'_>> {
    self.pattern.as_ref().map(|pattern| {
      Rewriter {
        pattern,
        marker: Tag::Mark,
        skip: skip_links,
      }
    })
  }
}

/// Wraps whole-word, case-insensitive occurrences of vocabulary terms in
/// strong-emphasis markers.
#[derive(Debug, Clone)]
pub struct Emphasizer {
  pattern: Option<Regex>,
}

impl Emphasizer {
  /// Build an emphasizer for the given terms. Blank terms are ignored; an
  /// empty vocabulary yields an inert emphasizer.
  pub fn new<I, S>(terms: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut terms: Vec<String> = terms
      .into_iter()
      .map(|term| term.as_ref().trim().to_string())
      .filter(|term| !term.is_empty())
      .collect();
    if terms.is_empty() {
      return Self { pattern: None };
    }

    // Longest first so overlapping terms prefer the longer one.
    terms.sort_by(|a, b| {
      b.chars()
        .count()
        .cmp(&a.chars().count())
        .then_with(|| a.cmp(b))
    });
    terms.dedup();

    let alternation = terms
      .iter()
      .map(|term| regex::escape(term))
      .collect::<Vec<_>>()
      .join("|");

    let pattern = RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
      .case_insensitive(true)
      .build()
      .map_err(|e| warn!("Could not build emphasis pattern: {e}"))
      .ok();

    Self { pattern }
  }

  #[must_use]
  pub fn apply(&self, node: &Node) -> Node {
    self
      .rewriter()
      .map_or_else(|| node.clone(), |rewriter| rewriter.rewrite(node))
  }

  #[must_use]
  pub fn apply_all(&self, nodes: &[Node]) -> Vec<Node> {
    self
      .rewriter()
      .map_or_else(|| nodes.to_vec(), |rewriter| rewriter.rewrite_all(nodes))
  }

  fn rewriter(&self) -> Option<Rewriter<'_>> {
    self.pattern.as_ref().map(|pattern| {
      Rewriter {
        pattern,
        marker: Tag::Strong,
        skip: skip_literal,
      }
    })
  }
}

impl Default for Emphasizer {
  fn default() -> Self {
    Self::new(DEFAULT_VOCABULARY)
  }
}

/// Highlight `query` in `node`. An empty query returns the node unchanged.
#[must_use]
pub fn apply_highlight(node: &Node, query: &Query) -> Node {
  Highlighter::new(query).apply(node)
}

/// Emphasise the default vocabulary in `node`.
#[must_use]
pub fn apply_emphasis(node: &Node) -> Node {
  static DEFAULT: OnceLock<Emphasizer> = OnceLock::new();
  DEFAULT.get_or_init(Emphasizer::default).apply(node)
}

/// Combined transform the view layer runs over section content: vocabulary
/// emphasis first, then search highlighting.
#[derive(Debug, Clone, Default)]
pub struct RenderTransform {
  emphasizer:  Option<Emphasizer>,
  highlighter: Highlighter,
}

impl RenderTransform {
  /// Build a transform for `query`, optionally emphasising vocabulary terms.
  #[must_use]
  pub fn new(query: &Query, emphasizer: Option<Emphasizer>) -> Self {
    Self {
      emphasizer,
      highlighter: Highlighter::new(query),
    }
  }

  #[must_use]
  pub fn apply(&self, node: &Node) -> Node {
    match &self.emphasizer {
      Some(emphasizer) => self.highlighter.apply(&emphasizer.apply(node)),
      None => self.highlighter.apply(node),
    }
  }

  #[must_use]
  pub fn apply_all(&self, nodes: &[Node]) -> Vec<Node> {
    match &self.emphasizer {
      Some(emphasizer) => {
        self.highlighter.apply_all(&emphasizer.apply_all(nodes))
      },
      None => self.highlighter.apply_all(nodes),
    }
  }
}

/// Run emphasis and highlighting over `node` in one go.
#[must_use]
pub fn render_transform(
  node: &Node,
  query: &Query,
  emphasizer: &Emphasizer,
) -> Node {
  Highlighter::new(query).apply(&emphasizer.apply(node))
}
