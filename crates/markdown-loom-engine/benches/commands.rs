use criterion::{Criterion, criterion_group, criterion_main};
use markdown_loom_engine::{Cmd, Document, Selection, SelectionRange};
mod common;

fn bench_command_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("commands");
    group.sample_size(10);

    let content = common::generate_list(500);
    let doc = Document::from_bytes(content.as_bytes()).unwrap();
    let all = Selection::single(SelectionRange::new(0, doc.len()));

    group.bench_function("toggle_checkbox_all_lines", |b| {
        let mut d = doc.clone();
        d.set_selection(all.clone()).unwrap();
        b.iter(|| {
            let patch = d.execute(std::hint::black_box(&Cmd::ToggleCheckbox));
            std::hint::black_box(patch).unwrap();
        });
    });

    group.bench_function("indent_then_unindent_all_lines", |b| {
        let mut d = doc.clone();
        d.set_selection(all.clone()).unwrap();
        b.iter(|| {
            d.execute(&Cmd::Indent).unwrap();
            d.execute(&Cmd::Unindent).unwrap();
        });
    });

    group.bench_function("renumber_long_block", |b| {
        let numbered: String = (0..2_000).map(|i| format!("{}. item\n", i * 3)).collect();
        let snapshot = Document::from_text(&numbered).snapshot();
        b.iter(|| std::hint::black_box(Cmd::Renumber { line: 1_000 }.compile(&snapshot, &Selection::none())));
    });

    group.finish();
}

criterion_group!(benches, bench_command_operations);
criterion_main!(benches);
