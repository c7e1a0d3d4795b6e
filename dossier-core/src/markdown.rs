//! Markdown ingestion.
//!
//! Section files are parsed with comrak and the AST is converted once into
//! [`Node`]s. The first level-1 heading becomes the section title and is not
//! part of the content; every other heading gets an id, either an explicit
//! trailing `{#id}` or the slug of its text.
use comrak::{
  Arena,
  nodes::{AstNode, ListType, NodeHeading, NodeValue},
  options::Options,
  parse_document,
};
use log::trace;

use crate::{
  types::{Element, Node, Section, Tag},
  utils,
};

fn comrak_options() -> Options<'static> {
  let mut options = Options::default();
  options.extension.table = true;
  options.extension.footnotes = true;
  options.extension.strikethrough = true;
  options.extension.tasklist = true;
  options.extension.autolink = true;
  options
}

/// Parse a Markdown section file.
///
/// `fallback_title` is used when the file has no level-1 heading, usually the
/// file stem.
#[must_use]
pub fn parse_section(content: &str, fallback_title: &str) -> Section {
  let arena = Arena::new();
  let options = comrak_options();
  let root = parse_document(&arena, content, &options);

  let mut title = None;
  let mut nodes = Vec::new();

  for child in root.children() {
    let is_title = title.is_none()
      && matches!(
        child.data.borrow().value,
        NodeValue::Heading(NodeHeading { level: 1, .. })
      );
    if is_title {
      let (text, _) = utils::split_explicit_anchor(&extract_inline_text(child));
      title = Some(text);
      continue;
    }
    convert(child, &mut nodes);
  }

  let title = title
    .filter(|t| !t.is_empty())
    .unwrap_or_else(|| fallback_title.to_string());
  trace!("Parsed Markdown section {title:?} ({} nodes)", nodes.len());
  Section::new(title, nodes)
}

/// Parse Markdown into content nodes without extracting a title.
#[must_use]
pub fn parse_nodes(content: &str) -> Vec<Node> {
  let arena = Arena::new();
  let options = comrak_options();
  let root = parse_document(&arena, content, &options);

  let mut nodes = Vec::new();
  for child in root.children() {
    convert(child, &mut nodes);
  }
  nodes
}

/// Extract all inline text from a node.
pub fn extract_inline_text<'a>(node: &'a AstNode<'a>) -> String {
  let mut text = String::new();
  for child in node.children() {
    match &child.data.borrow().value {
      NodeValue::Text(t) => text.push_str(t),
      NodeValue::Code(t) => text.push_str(&t.literal),
      NodeValue::SoftBreak | NodeValue::LineBreak => text.push(' '),
      NodeValue::HtmlInline(_) | NodeValue::Image(..) => {},
      _ => text.push_str(&extract_inline_text(child)),
    }
  }
  text
}

fn generic(name: &str) -> Element {
  Element::new(Tag::Generic(name.to_string()))
}

fn convert_children<'a>(node: &'a AstNode<'a>) -> Vec<Node> {
  let mut children = Vec::new();
  for child in node.children() {
    convert(child, &mut children);
  }
  children
}

fn convert<'a>(node: &'a AstNode<'a>, out: &mut Vec<Node>) {
  let element = match &node.data.borrow().value {
    NodeValue::Text(t) => {
      out.push(Node::text(t.to_string()));
      return;
    },
    NodeValue::SoftBreak => {
      out.push(Node::text(" "));
      return;
    },
    NodeValue::Code(code) => {
      Element::new(Tag::Code).with_children(vec![Node::text(&code.literal)])
    },
    NodeValue::CodeBlock(block) => {
      let mut code =
        Element::new(Tag::Code).with_children(vec![Node::text(&block.literal)]);
      let language = block.info.split_whitespace().next().unwrap_or_default();
      if !language.is_empty() {
        code = code.with_attr("class", format!("language-{language}"));
      }
      out.push(Node::from(
        Element::new(Tag::Pre).with_children(vec![Node::from(code)]),
      ));
      return;
    },
    NodeValue::HtmlInline(_) | NodeValue::HtmlBlock(_) => {
      trace!("Skipping raw HTML in Markdown section");
      return;
    },
    NodeValue::Heading(NodeHeading { level, .. }) => {
      out.push(convert_heading(node, *level));
      return;
    },
    NodeValue::Link(link) => {
      let mut element = Element::new(Tag::Link).with_attr("href", &link.url);
      if !link.title.is_empty() {
        element = element.with_attr("title", &link.title);
      }
      element
    },
    NodeValue::Image(link) => {
      out.push(Node::from(
        generic("img")
          .with_attr("src", &link.url)
          .with_attr("alt", extract_inline_text(node)),
      ));
      return;
    },
    NodeValue::Paragraph => generic("p"),
    NodeValue::BlockQuote => generic("blockquote"),
    NodeValue::List(list) if list.list_type == ListType::Ordered => {
      generic("ol")
    },
    NodeValue::List(_) => generic("ul"),
    NodeValue::Item(_) | NodeValue::TaskItem(..) => generic("li"),
    NodeValue::Table(..) => generic("table"),
    NodeValue::TableRow(..) => generic("tr"),
    NodeValue::TableCell => generic("td"),
    NodeValue::Emph => generic("em"),
    NodeValue::Strong => Element::new(Tag::Strong),
    NodeValue::Strikethrough => generic("del"),
    NodeValue::LineBreak => {
      out.push(Node::from(generic("br")));
      return;
    },
    NodeValue::ThematicBreak => {
      out.push(Node::from(generic("hr")));
      return;
    },
    _ => {
      // Containers without a dedicated mapping contribute their children.
      out.extend(convert_children(node));
      return;
    },
  };

  out.push(Node::from(element.with_children(convert_children(node))));
}

fn convert_heading<'a>(node: &'a AstNode<'a>, level: u8) -> Node {
  let (_, id) = utils::heading_id(&extract_inline_text(node));
  let mut children = convert_children(node);

  // Drop a trailing `{#id}` marker from the visible text.
  if let Some(Node::Text(last)) = children.last_mut() {
    let (clean, explicit) = utils::split_explicit_anchor(last);
    if explicit.is_some() {
      if clean.is_empty() {
        children.pop();
      } else {
        *last = clean;
      }
    }
  }

  Node::from(
    Element::new(Tag::Heading(level))
      .with_id(id)
      .with_children(children),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_title_comes_from_first_h1() {
    let section = parse_section("# Anexo I\n\nTexto.", "anexo-1");
    assert_eq!(section.title(), "Anexo I");
    assert_eq!(section.id(), "anexo-i");
    assert_eq!(section.content().len(), 1);
  }

  #[test]
  fn test_fallback_title() {
    let section = parse_section("Só texto.", "anexo-2");
    assert_eq!(section.title(), "anexo-2");
  }

  #[test]
  fn test_headings_get_slug_ids() {
    let nodes = parse_nodes("### Visão Geral\n\n#### Detalhes {#det}\n");
    let first = nodes[0].as_element().map(|e| (&e.tag, e.id.as_deref()));
    assert_eq!(first, Some((&Tag::Heading(3), Some("visao-geral"))));

    let second = nodes[1].as_element().map(|e| {
      (e.id.as_deref().map(str::to_string), e.direct_text())
    });
    assert_eq!(
      second,
      Some((Some("det".to_string()), "Detalhes".to_string()))
    );
  }

  #[test]
  fn test_links_and_code_blocks() {
    let nodes =
      parse_nodes("Veja [o portal](https://example.com).\n\n```rust\nfn main() {}\n```\n");
    let paragraph = nodes[0].as_element().map(|e| e.children.clone());
    let link = paragraph
      .as_ref()
      .and_then(|children| children.iter().find(|c| c.is_link()))
      .and_then(Node::as_element)
      .map(|e| e.attrs.get("href").cloned());
    assert_eq!(link, Some(Some("https://example.com".to_string())));

    let pre = nodes[1].as_element().map(|e| e.tag.clone());
    assert_eq!(pre, Some(Tag::Pre));
    assert!(nodes[1].plain_text().contains("fn main()"));
  }
}
