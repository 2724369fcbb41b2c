use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use session_explorer::parsers::{parse_jsonl_transcript, parse_text_transcript};

/// Assistant text with a couple of tool calls and, every fifth turn, a delegation
fn assistant_text(i: usize) -> String {
    let mut text = format!(
        "Step {}: checking the module layout.\n[Tool call] Read\n  path: src/module_{}.rs\n  limit: 200\n[Tool call] Grep\n  pattern: fn handler_{}\n",
        i, i, i
    );
    if i % 5 == 0 {
        text.push_str("[Tool call] Task\n  subagent_type: explore\n  description: Map callers\n");
    }
    text
}

/// Generate a synthetic JSONL transcript with N records
fn generate_jsonl(num_records: usize) -> String {
    (0..num_records)
        .map(|i| {
            let (role, text) = if i % 2 == 0 {
                ("user", format!("Please look into issue number {} in the tracker", i))
            } else {
                ("assistant", assistant_text(i))
            };
            serde_json::json!({
                "role": role,
                "timestamp": 1_700_000_000_000_i64 + i as i64 * 1000,
                "message": { "content": [{ "type": "text", "text": text }] },
            })
            .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Generate a synthetic plain-text transcript with N turns
fn generate_text(num_turns: usize) -> String {
    (0..num_turns)
        .map(|i| {
            if i % 2 == 0 {
                format!("user: Please look into issue number {} in the tracker\n", i)
            } else {
                format!("A: {}", assistant_text(i))
            }
        })
        .collect()
}

fn bench_parse_jsonl(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_jsonl_transcript");

    for size in [100, 1_000, 10_000].iter() {
        let content = generate_jsonl(*size);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| parse_jsonl_transcript(black_box(&content)));
        });
    }

    group.finish();
}

fn bench_parse_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_text_transcript");

    for size in [100, 1_000, 10_000].iter() {
        let content = generate_text(*size);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| parse_text_transcript(black_box(&content)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse_jsonl, bench_parse_text);
criterion_main!(benches);
