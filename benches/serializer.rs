//! Benchmarks for payload serializers
//!
//! Measures encode and decode of a typical embedding response in every
//! compiled format.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use relevai::types::EmbedResponse;
use relevai::{Codec, Serializer};

fn sample_response(inputs: usize, dims: usize) -> EmbedResponse {
    EmbedResponse {
        model: "nomic-embed-text".to_string(),
        embeddings: (0..inputs)
            .map(|i| (0..dims).map(|d| ((i * dims + d) as f32).sin()).collect())
            .collect(),
        total_duration: Some(123_456),
        load_duration: None,
        prompt_eval_count: Some(inputs as u64),
    }
}

fn serializers() -> Vec<Serializer> {
    [Serializer::compressed(1), Serializer::compact()]
        .into_iter()
        .filter_map(Result::ok)
        .chain(std::iter::once(Serializer::json()))
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    let value = sample_response(16, 768);
    for s in serializers() {
        let size = s.encode(&value).unwrap().len();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(s.name()), &value, |b, v| {
            b.iter(|| s.encode(black_box(v)).unwrap())
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    let value = sample_response(16, 768);
    for s in serializers() {
        let bytes = s.encode(&value).unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(s.name()), &bytes, |b, bytes| {
            b.iter(|| s.decode::<EmbedResponse>(black_box(bytes)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
