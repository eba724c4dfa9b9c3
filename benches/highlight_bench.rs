use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rowdoc::{Buffer, EditOperations, EngineConfig, SyntaxRegistry};
use std::time::Duration;

fn sample_source(rows: usize) -> String {
    (0..rows)
        .map(|i| format!("int value_{} = {}; // row {}", i, i * 7, i))
        .collect::<Vec<_>>()
        .join("\n")
}

/// 読み込み時の全行ハイライト
fn bench_full_highlight(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_highlight");
    group.measurement_time(Duration::from_secs(5));
    let registry = SyntaxRegistry::builtin();
    let config = EngineConfig::default();
    let text = sample_source(5_000);

    group.bench_function("load_5000_rows", |b| {
        b.iter(|| {
            let mut buffer = Buffer::from_text("bench.c", black_box(&text), &config);
            buffer.select_syntax("bench.c", &registry);
            buffer
        })
    });
    group.finish();
}

/// 1文字入力ごとの増分ハイライト
fn bench_incremental_edit(c: &mut Criterion) {
    let registry = SyntaxRegistry::builtin();
    let config = EngineConfig::default();
    let text = sample_source(5_000);
    let mut template = Buffer::from_text("bench.c", &text, &config);
    template.select_syntax("bench.c", &registry);

    c.bench_function("insert_char_mid_buffer", |b| {
        b.iter_batched(
            || template.clone(),
            |mut buffer| {
                buffer.set_cursor(rowdoc::CursorPosition::at(2_500, 4));
                for _ in 0..50 {
                    let _ = buffer.insert_char(black_box(b'x'));
                }
            },
            BatchSize::LargeInput,
        )
    });

    // コメント開始で後続行すべてに伝播する場合
    c.bench_function("open_block_comment_cascade", |b| {
        b.iter_batched(
            || template.clone(),
            |mut buffer| {
                buffer.set_cursor(rowdoc::CursorPosition::at(0, 0));
                let _ = buffer.insert_char(b'/');
                let _ = buffer.insert_char(b'*');
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_full_highlight, bench_incremental_edit);
criterion_main!(benches);
