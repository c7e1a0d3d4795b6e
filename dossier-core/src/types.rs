//! Content model shared by every stage of the engine.
//!
//! Documents are adapted once into this neutral tree (from Markdown, HTML or
//! JSON) and every algorithm operates on it afterwards. Text leaves serialise
//! as plain JSON strings and elements as objects keyed by their HTML tag name,
//! so a hand-written JSON corpus reads close to the markup it describes:
//!
//! ```json
//! { "tag": "h3", "id": "objetivo", "children": ["Objetivo"] }
//! ```
use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::utils;

/// Element type tag.
///
/// Only the variants the engine reasons about are distinguished; anything
/// else is carried as [`Tag::Generic`] with its element name so it can be
/// rendered back faithfully.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Tag {
  /// Heading of the given level (1-6).
  Heading(u8),
  /// Hyperlink. Never searched, highlighted or emphasised.
  Link,
  /// Inline code.
  Code,
  /// Pre-formatted block.
  Pre,
  /// Search highlight marker.
  Mark,
  /// Strong emphasis marker.
  Strong,
  /// Transparent grouping of sibling nodes, rendered without a wrapper.
  Fragment,
  /// Any other element, identified by its element name.
  Generic(String),
}

impl Tag {
  /// Element name used in markup and in the JSON corpus format.
  #[must_use]
  pub fn name(&self) -> &str {
    match self {
      Self::Heading(1) => "h1",
      Self::Heading(2) => "h2",
      Self::Heading(3) => "h3",
      Self::Heading(4) => "h4",
      Self::Heading(5) => "h5",
      Self::Heading(_) => "h6",
      Self::Link => "a",
      Self::Code => "code",
      Self::Pre => "pre",
      Self::Mark => "mark",
      Self::Strong => "strong",
      Self::Fragment => "fragment",
      Self::Generic(name) => name,
    }
  }

  /// Heading level, if this is a heading.
  #[must_use]
  pub const fn heading_level(&self) -> Option<u8> {
    match self {
      Self::Heading(level) => Some(*level),
      _ => None,
    }
  }
}

impl From<&str> for Tag {
  fn from(name: &str) -> Self {
    match name.to_ascii_lowercase().as_str() {
      "h1" => Self::Heading(1),
      "h2" => Self::Heading(2),
      "h3" => Self::Heading(3),
      "h4" => Self::Heading(4),
      "h5" => Self::Heading(5),
      "h6" => Self::Heading(6),
      "a" => Self::Link,
      "code" => Self::Code,
      "pre" => Self::Pre,
      "mark" => Self::Mark,
      "strong" | "b" => Self::Strong,
      "fragment" => Self::Fragment,
      other => Self::Generic(other.to_string()),
    }
  }
}

impl From<String> for Tag {
  fn from(name: String) -> Self {
    Self::from(name.as_str())
  }
}

impl From<Tag> for String {
  fn from(tag: Tag) -> Self {
    tag.name().to_string()
  }
}

impl fmt::Display for Tag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// A node of the content tree: a text leaf or a typed element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
  Text(String),
  Element(Element),
}

/// A typed element with an optional stable identifier and ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
  pub tag: Tag,

  /// Stable identifier used for in-page navigation.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,

  /// Remaining attributes (`href`, `class`, ...).
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub attrs: BTreeMap<String, String>,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub children: Vec<Node>,
}

impl Element {
  #[must_use]
  pub const fn new(tag: Tag) -> Self {
    Self {
      tag,
      id: None,
      attrs: BTreeMap::new(),
      children: Vec::new(),
    }
  }

  #[must_use]
  pub fn with_id(mut self, id: impl Into<String>) -> Self {
    self.id = Some(id.into());
    self
  }

  #[must_use]
  pub fn with_attr(
    mut self,
    name: impl Into<String>,
    value: impl Into<String>,
  ) -> Self {
    self.attrs.insert(name.into(), value.into());
    self
  }

  #[must_use]
  pub fn with_children(mut self, children: Vec<Node>) -> Self {
    self.children = children;
    self
  }

  /// Concatenation of the direct text children only.
  ///
  /// Nested elements contribute nothing, so a heading made purely of nested
  /// markup has an empty title.
  #[must_use]
  pub fn direct_text(&self) -> String {
    self
      .children
      .iter()
      .filter_map(|child| {
        match child {
          Node::Text(text) => Some(text.as_str()),
          Node::Element(_) => None,
        }
      })
      .collect()
  }

  /// Copy of this element with the same tag, id and attributes but new
  /// children.
  #[must_use]
  pub fn rebuild(&self, children: Vec<Node>) -> Self {
    Self {
      tag: self.tag.clone(),
      id: self.id.clone(),
      attrs: self.attrs.clone(),
      children,
    }
  }
}

impl Node {
  /// Create a text leaf.
  pub fn text(text: impl Into<String>) -> Self {
    Self::Text(text.into())
  }

  /// Create an element node from a tag and its children.
  #[must_use]
  pub fn element(tag: Tag, children: Vec<Self>) -> Self {
    Self::Element(Element::new(tag).with_children(children))
  }

  /// Create a heading carrying a navigation id and a plain text title.
  pub fn heading(level: u8, id: impl Into<String>, title: &str) -> Self {
    Self::Element(
      Element::new(Tag::Heading(level))
        .with_id(id)
        .with_children(vec![Self::text(title)]),
    )
  }

  /// Create a hyperlink with a text label.
  pub fn link(href: impl Into<String>, label: &str) -> Self {
    Self::Element(
      Element::new(Tag::Link)
        .with_attr("href", href)
        .with_children(vec![Self::text(label)]),
    )
  }

  #[must_use]
  pub const fn as_element(&self) -> Option<&Element> {
    match self {
      Self::Element(element) => Some(element),
      Self::Text(_) => None,
    }
  }

  #[must_use]
  pub fn is_link(&self) -> bool {
    matches!(self, Self::Element(element) if element.tag == Tag::Link)
  }

  /// All text in this subtree, in document order.
  #[must_use]
  pub fn plain_text(&self) -> String {
    let mut out = String::new();
    self.collect_text(&mut out);
    out
  }

  fn collect_text(&self, out: &mut String) {
    match self {
      Self::Text(text) => out.push_str(text),
      Self::Element(element) => {
        for child in &element.children {
          child.collect_text(out);
        }
      },
    }
  }
}

impl From<&str> for Node {
  fn from(text: &str) -> Self {
    Self::text(text)
  }
}

impl From<Element> for Node {
  fn from(element: Element) -> Self {
    Self::Element(element)
  }
}

#[derive(Deserialize)]
struct RawSection {
  title:   String,
  #[serde(default)]
  content: Vec<Node>,
}

/// A top-level titled division of the document.
///
/// The identifier is always the slug of the title, so it is derived here and
/// never read from input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSection")]
pub struct Section {
  id:      String,
  title:   String,
  content: Vec<Node>,
}

impl Section {
  #[must_use]
  pub fn new(title: impl Into<String>, content: Vec<Node>) -> Self {
    let title = title.into();
    Self {
      id: utils::slugify(&title),
      title,
      content,
    }
  }

  #[must_use]
  pub fn id(&self) -> &str {
    &self.id
  }

  #[must_use]
  pub fn title(&self) -> &str {
    &self.title
  }

  #[must_use]
  pub fn content(&self) -> &[Node] {
    &self.content
  }
}

impl From<RawSection> for Section {
  fn from(raw: RawSection) -> Self {
    Self::new(raw.title, raw.content)
  }
}
