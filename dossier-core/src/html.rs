//! HTML ingestion.
//!
//! Section files written as HTML fragments are parsed with kuchikikiki and
//! adapted into [`Node`]s. The first `<h1>` is the section title. Headings
//! keep an existing `id` attribute and otherwise get the slug of their text.
use kuchikikiki::NodeRef;
use log::trace;
use tendril::TendrilSink;

use crate::{
  types::{Element, Node, Section, Tag},
  utils,
};

/// Elements whose content is never part of the document text.
const SKIPPED_ELEMENTS: &[&str] =
  &["script", "style", "template", "noscript", "head"];

/// Parse an HTML section file.
#[must_use]
pub fn parse_section(html: &str, fallback_title: &str) -> Section {
  let document = kuchikikiki::parse_html().one(html);

  let title = document.select_first("h1").ok().and_then(|h1| {
    let text = h1.as_node().text_contents();
    h1.as_node().detach();
    let (title, _) = utils::split_explicit_anchor(&text);
    Some(title).filter(|t| !t.is_empty())
  });

  let nodes = convert_document(&document);
  let title = title.unwrap_or_else(|| fallback_title.to_string());
  trace!("Parsed HTML section {title:?} ({} nodes)", nodes.len());
  Section::new(title, nodes)
}

/// Parse an HTML fragment into content nodes without extracting a title.
#[must_use]
pub fn parse_nodes(html: &str) -> Vec<Node> {
  let document = kuchikikiki::parse_html().one(html);
  convert_document(&document)
}

fn convert_document(document: &NodeRef) -> Vec<Node> {
  let root = document
    .select_first("body")
    .map_or_else(|()| document.clone(), |body| body.as_node().clone());

  let mut nodes = Vec::new();
  for child in root.children() {
    convert(&child, &mut nodes);
  }
  nodes
}

fn convert(node: &NodeRef, out: &mut Vec<Node>) {
  if let Some(text) = node.as_text() {
    let text = text.borrow();
    // Whitespace spanning lines is layout between block elements.
    if !(text.trim().is_empty() && text.contains('\n')) {
      out.push(Node::text(text.as_str()));
    }
    return;
  }

  let Some(data) = node.as_element() else {
    // Comments, doctypes and processing instructions carry no content.
    return;
  };

  let name = data.name.local.to_ascii_lowercase();
  if SKIPPED_ELEMENTS.contains(&&*name) {
    return;
  }

  let tag = Tag::from(&*name);
  let mut element = Element::new(tag.clone());
  for (attr_name, attr) in &data.attributes.borrow().map {
    let key = attr_name.local.to_string();
    if key == "id" {
      element.id = Some(attr.value.clone());
    } else {
      element.attrs.insert(key, attr.value.clone());
    }
  }

  if tag.heading_level().is_some() && element.id.is_none() {
    let (_, id) = utils::heading_id(&node.text_contents());
    element.id = Some(id);
  }

  for child in node.children() {
    convert(&child, &mut element.children);
  }

  out.push(Node::from(element));
}
