use std::sync::OnceLock;

use regex::Regex;

/// Slugify a string for use as an anchor ID.
///
/// Lowercases, transliterates non-ASCII characters (so diacritics are
/// stripped), collapses every run of non-alphanumeric characters into a single
/// dash and trims leading/trailing dashes. The same title always yields the
/// same id.
#[must_use]
pub fn slugify(text: &str) -> String {
  slug::slugify(text)
}

/// Split a trailing explicit anchor (`Title {#custom-id}`) off a heading.
///
/// Returns the cleaned title and the anchor id, if one was present.
#[must_use]
pub fn split_explicit_anchor(text: &str) -> (String, Option<String>) {
  static ANCHOR_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
  let pattern = ANCHOR_PATTERN
    .get_or_init(|| Regex::new(r"\s*\{#([A-Za-z0-9_.:-]+)\}\s*$").ok());

  let trimmed = text.trim();
  if let Some(pattern) = pattern
    && let Some(captures) = pattern.captures(trimmed)
    && let (Some(whole), Some(id)) = (captures.get(0), captures.get(1))
  {
    return (
      trimmed[..whole.start()].trim_end().to_string(),
      Some(id.as_str().to_string()),
    );
  }

  (trimmed.to_string(), None)
}

/// Build the heading id for a title: an explicit anchor wins, otherwise the
/// slug of the cleaned title.
#[must_use]
pub fn heading_id(text: &str) -> (String, String) {
  let (title, explicit) = split_explicit_anchor(text);
  let id = explicit.unwrap_or_else(|| slugify(&title));
  (title, id)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_slugify_strips_diacritics() {
    assert_eq!(
      slugify("Otimização do Fluxo Transacional"),
      "otimizacao-do-fluxo-transacional"
    );
    assert_eq!(
      slugify("Governança & Conformidade"),
      "governanca-conformidade"
    );
  }

  #[test]
  fn test_slugify_collapses_and_trims_separators() {
    assert_eq!(
      slugify("  --Anexo   I: Visão Geral--  "),
      "anexo-i-visao-geral"
    );
    assert_eq!(slugify("Relatório (2024)"), "relatorio-2024");
  }

  #[test]
  fn test_slugify_is_stable() {
    let title = "Relatório de Avaliação Técnica";
    assert_eq!(slugify(title), slugify(title));
  }

  #[test]
  fn test_split_explicit_anchor() {
    assert_eq!(
      split_explicit_anchor("Objetivo {#obj-principal}"),
      ("Objetivo".to_string(), Some("obj-principal".to_string()))
    );
    assert_eq!(
      split_explicit_anchor("Sem âncora"),
      ("Sem âncora".to_string(), None)
    );
  }

  #[test]
  fn test_heading_id_falls_back_to_slug() {
    assert_eq!(
      heading_id("Metodologia Aplicada"),
      ("Metodologia Aplicada".to_string(), "metodologia-aplicada".to_string())
    );
  }
}
