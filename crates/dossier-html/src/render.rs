//! Serialisation of content nodes and outlines to HTML.
use std::fmt::Write;

use dossier_core::{Node, OutlineEntry, Tag};
use html_escape::{encode_double_quoted_attribute, encode_text};
use log::warn;

/// Elements without content or closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "wbr"];

/// Elements that are never emitted, content included.
const DROPPED_ELEMENTS: &[&str] =
  &["script", "style", "iframe", "object", "embed"];

fn is_plain_name(name: &str) -> bool {
  !name.is_empty()
    && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Render a single node.
#[must_use]
pub fn render_node(node: &Node) -> String {
  let mut html = String::new();
  write_node(&mut html, node);
  html
}

/// Render a list of sibling nodes.
#[must_use]
pub fn render_nodes(nodes: &[Node]) -> String {
  let mut html = String::new();
  for node in nodes {
    write_node(&mut html, node);
  }
  html
}

fn write_node(html: &mut String, node: &Node) {
  let element = match node {
    Node::Text(text) => {
      html.push_str(&encode_text(text));
      return;
    },
    Node::Element(element) => element,
  };

  let name = element.tag.name();
  if element.tag == Tag::Fragment || !is_plain_name(name) {
    for child in &element.children {
      write_node(html, child);
    }
    return;
  }
  if DROPPED_ELEMENTS.contains(&name) {
    warn!("Dropping <{name}> element from rendered content");
    return;
  }

  html.push('<');
  html.push_str(name);
  if let Some(id) = &element.id {
    // Writing to String is infallible
    let _ = write!(html, " id=\"{}\"", encode_double_quoted_attribute(id));
  }
  if element.tag == Tag::Mark {
    html.push_str(" class=\"search-hit\"");
  }
  for (key, value) in &element.attrs {
    if !is_plain_name(key) || key.starts_with("on") {
      continue;
    }
    let _ = write!(
      html,
      " {key}=\"{}\"",
      encode_double_quoted_attribute(value)
    );
  }

  if VOID_ELEMENTS.contains(&name) {
    html.push_str(" />");
    return;
  }
  html.push('>');

  for child in &element.children {
    write_node(html, child);
  }

  let _ = write!(html, "</{name}>");
}

/// Render an outline as nested `<ul class="outline">` lists.
#[must_use]
pub fn render_outline(outline: &[OutlineEntry]) -> String {
  let mut html = String::new();
  write_outline(&mut html, outline);
  html
}

fn write_outline(html: &mut String, entries: &[OutlineEntry]) {
  if entries.is_empty() {
    return;
  }

  html.push_str("<ul class=\"outline\">");
  for entry in entries {
    let _ = write!(
      html,
      "<li><a href=\"#{}\" data-level=\"{}\">{}</a>",
      encode_double_quoted_attribute(&entry.id),
      entry.level,
      encode_text(&entry.title)
    );
    write_outline(html, &entry.children);
    html.push_str("</li>");
  }
  html.push_str("</ul>");
}

#[cfg(test)]
mod tests {
  use dossier_core::{Element, Query, Section, build_outline};

  use super::*;

  fn paragraph(children: Vec<Node>) -> Node {
    Node::element(Tag::Generic("p".to_string()), children)
  }

  #[test]
  fn test_text_is_escaped() {
    let node = paragraph(vec![Node::text("a < b & \"c\"")]);
    assert_eq!(render_node(&node), "<p>a &lt; b &amp; \"c\"</p>");
  }

  #[test]
  fn test_markers_and_fragments() {
    let node = Node::element(Tag::Fragment, vec![
      Node::text("o "),
      Node::element(Tag::Mark, vec![Node::text("CDE")]),
      Node::text(" e a "),
      Node::element(Tag::Strong, vec![Node::text("Governança")]),
    ]);
    assert_eq!(
      render_node(&node),
      "o <mark class=\"search-hit\">CDE</mark> e a \
       <strong>Governança</strong>"
    );
  }

  #[test]
  fn test_attributes_and_void_elements() {
    let link = Node::from(
      Element::new(Tag::Link)
        .with_attr("href", "https://example.com/?a=1&b=\"2\"")
        .with_attr("onclick", "alert(1)")
        .with_children(vec![Node::text("portal")]),
    );
    assert_eq!(
      render_node(&link),
      "<a href=\"https://example.com/?a=1&amp;b=&quot;2&quot;\">portal</a>"
    );

    let image = Node::from(
      Element::new(Tag::Generic("img".to_string())).with_attr("src", "a.png"),
    );
    assert_eq!(render_node(&image), "<img src=\"a.png\" />");
  }

  #[test]
  fn test_headings_keep_ids() {
    let heading = Node::heading(3, "objetivo", "Objetivo");
    assert_eq!(render_node(&heading), "<h3 id=\"objetivo\">Objetivo</h3>");
  }

  #[test]
  fn test_scripts_are_dropped() {
    let nodes = vec![
      Node::element(Tag::Generic("script".to_string()), vec![Node::text(
        "alert(1)",
      )]),
      paragraph(vec![Node::text("ok")]),
    ];
    assert_eq!(render_nodes(&nodes), "<p>ok</p>");
  }

  #[test]
  fn test_outline_markup() {
    let sections = vec![Section::new("Relatório", vec![
      Node::heading(3, "objetivo", "Objetivo"),
      Node::heading(4, "detalhes", "Detalhes"),
    ])];
    let html = render_outline(&build_outline(&sections, &Query::new("")));
    assert_eq!(
      html,
      "<ul class=\"outline\"><li><a href=\"#relatorio\" \
       data-level=\"2\">Relatório</a><ul class=\"outline\"><li><a \
       href=\"#objetivo\" data-level=\"3\">Objetivo</a><ul \
       class=\"outline\"><li><a href=\"#detalhes\" \
       data-level=\"4\">Detalhes</a></li></ul></li></ul></li></ul>"
    );
    assert_eq!(render_outline(&[]), "");
  }
}
