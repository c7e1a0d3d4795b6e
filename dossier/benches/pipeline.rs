#![allow(
  clippy::expect_used,
  clippy::unwrap_used,
  reason = "Fine in benchmarks"
)]
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use dossier_core::{
  Dossier,
  Emphasizer,
  Node,
  Query,
  Section,
  Tag,
  build_outline,
  filter_sections,
  render_transform,
};

// Synthetic dossier: every section carries a few headings, paragraphs with
// vocabulary terms and a link, which is roughly what real annexes look like.
fn synthetic_dossier(sections: usize) -> Dossier {
  let sections = (0..sections)
    .map(|i| {
      let content = vec![
        Node::heading(3, format!("objetivo-{i}"), "Objetivo"),
        Node::element(Tag::from("p"), vec![Node::text(
          format!(
            "O anexo {i} descreve a governança do CDE e a interoperabilidade \
             dos modelos federados com foco em transparência."
          ),
        )]),
        Node::heading(4, format!("detalhes-{i}"), "Detalhes"),
        Node::element(Tag::from("p"), vec![
          Node::text("Consulte "),
          Node::link(format!("https://example.com/{i}"), "o portal do CDE"),
          Node::text(" para o fluxo transacional completo."),
        ]),
        Node::heading(3, format!("riscos-{i}"), "Riscos"),
      ];
      Section::new(format!("Anexo {i}"), content)
    })
    .collect();
  Dossier::new("Dossiê", sections).expect("valid synthetic dossier")
}

fn bench_filter(c: &mut Criterion) {
  let mut group = c.benchmark_group("filter_sections");

  for size in [10, 100] {
    let dossier = synthetic_dossier(size);
    for raw in ["", "modelos", "inexistente"] {
      let query = Query::new(raw);
      group.bench_with_input(
        BenchmarkId::new(if raw.is_empty() { "empty" } else { raw }, size),
        &dossier,
        |b, dossier| {
          b.iter(|| filter_sections(black_box(dossier.sections()), &query));
        },
      );
    }
  }

  group.finish();
}

fn bench_outline(c: &mut Criterion) {
  let mut group = c.benchmark_group("build_outline");

  for size in [10, 100] {
    let dossier = synthetic_dossier(size);
    let query = Query::new("riscos");
    group.bench_with_input(
      BenchmarkId::from_parameter(size),
      &dossier,
      |b, dossier| {
        b.iter(|| build_outline(black_box(dossier.sections()), &query));
      },
    );
  }

  group.finish();
}

fn bench_transform(c: &mut Criterion) {
  let mut group = c.benchmark_group("render_transform");

  let dossier = synthetic_dossier(100);
  let emphasizer = Emphasizer::default();
  let query = Query::new("cde");

  group.bench_function("emphasis_and_highlight", |b| {
    b.iter(|| {
      for section in dossier.sections() {
        for node in section.content() {
          black_box(render_transform(node, &query, &emphasizer));
        }
      }
    });
  });

  group.finish();
}

criterion_group!(benches, bench_filter, bench_outline, bench_transform);
criterion_main!(benches);
