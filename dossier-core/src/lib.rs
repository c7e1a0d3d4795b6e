//! # dossier-core - the content engine behind the dossier viewer
//!
//! A dossier is a long evaluation report made of titled sections (the report
//! itself and its annexes). This crate holds the document model and the
//! pure, in-memory operations a viewer needs: search filtering, an outline
//! of the headings, search highlighting and emphasis of domain terms.
//!
//! ## Quick Start
//!
//! ```rust
//! use dossier_core::{Dossier, Node, Query, Section};
//!
//! let dossier = Dossier::new("Dossiê", vec![
//!   Section::new("Relatório", vec![
//!     Node::heading(3, "objetivo", "Objetivo"),
//!     Node::heading(4, "detalhes", "Detalhes"),
//!   ]),
//!   Section::new("Anexo I", vec![Node::text("CDE")]),
//! ])
//! .expect("valid dossier");
//!
//! let query = Query::new("cde");
//! let outcome = dossier.filter(&query);
//! assert_eq!(outcome.sections.len(), 1);
//!
//! let outline = dossier.outline(&query);
//! assert_eq!(outline[0].id, "anexo-i");
//! ```
//!
//! ## Features
//!
//! - **Search** that is case-insensitive and never looks inside hyperlinks
//! - **Outline** of sections and their level-3 and level-4 headings
//! - **Highlighting** of search hits with literal matching of the query
//! - **Emphasis** of a fixed vocabulary of whole words
//! - **Ingestion** of Markdown (comrak), HTML (kuchikikiki) and JSON corpora
//! - **Navigation state** for expanded sections and the active outline entry

pub mod corpus;
pub mod error;
pub mod highlight;
pub mod html;
pub mod markdown;
pub mod navigation;
pub mod outline;
pub mod search;
pub mod types;
pub mod utils;

pub use crate::{
  corpus::Dossier,
  error::{CorpusError, CorpusResult},
  highlight::{
    DEFAULT_VOCABULARY,
    Emphasizer,
    Highlighter,
    RenderTransform,
    apply_emphasis,
    apply_highlight,
    render_transform,
  },
  navigation::{ExpandState, ScrollSpy, TargetObserver},
  outline::{OutlineEntry, build_outline},
  search::{FilterOutcome, Query, Searchable, contains_match, filter_sections},
  types::{Element, Node, Section, Tag},
  utils::slugify,
};
