//! Bulk Request Rendering Benchmarks
//!
//! Measures rendering of bulk requests into action/document lines, the
//! cost of reusing cached lines, and assembly of full payloads.
//!
//! Run benchmarks:
//!   cargo bench --bench source_benchmarks

use bulkwire::{BulkBody, BulkIndexRequest, BulkUpdateRequest, BulkableRequest, Script};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use serde::Serialize;
use serde_json::json;
use std::hint::black_box;

// ============================================================================
// Test Data
// ============================================================================

#[derive(Debug, Clone, Serialize)]
struct Tweet {
    user: String,
    message: String,
    retweets: u32,
    tags: Vec<String>,
}

fn create_tweet(n: u32) -> Tweet {
    Tweet {
        user: format!("user{}", n),
        message: format!(
            "Tweet number {}. Bulk indexing keeps many documents moving in one request.",
            n
        ),
        retweets: n,
        tags: vec!["rust".to_string(), "search".to_string()],
    }
}

fn create_index_request(n: u32) -> BulkIndexRequest<Tweet> {
    let mut request = BulkIndexRequest::new();
    request
        .index("tweets")
        .doc_type("tweet")
        .id(n.to_string())
        .routing("user")
        .version(3)
        .version_type("external")
        .refresh(false)
        .doc(create_tweet(n));
    request
}

// ============================================================================
// Single Request Rendering
// ============================================================================

fn bench_index_source(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_source");

    let size = create_index_request(1).estimated_size_in_bytes().unwrap_or(0);
    group.throughput(Throughput::Bytes(size as u64));

    group.bench_function("cold", |b| {
        b.iter_batched(
            || create_index_request(1),
            |mut request| {
                black_box(request.source().map(|lines| lines.len()).ok());
            },
            BatchSize::SmallInput,
        )
    });

    let mut cached = create_index_request(1);
    let _ = cached.source();
    group.bench_function("cached", |b| {
        b.iter(|| black_box(cached.source().map(|lines| lines.len()).ok()))
    });

    group.bench_function("pre_encoded", |b| {
        let encoded = serde_json::to_string(&create_tweet(1)).unwrap_or_default();
        b.iter_batched(
            || {
                let mut request: BulkIndexRequest = BulkIndexRequest::new();
                request.index("tweets").id("1").doc_text(encoded.clone());
                request
            },
            |mut request| {
                black_box(request.source().map(|lines| lines.len()).ok());
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_update_source(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_source");

    group.bench_function("script_with_upsert", |b| {
        b.iter_batched(
            || {
                let mut request: BulkUpdateRequest = BulkUpdateRequest::new();
                request
                    .index("tweets")
                    .id("1")
                    .retry_on_conflict(3)
                    .script(Script::new("ctx._source.retweets += params.n").param("n", 1))
                    .upsert(json!({"retweets": 1}));
                request
            },
            |mut request| {
                black_box(request.source().map(|lines| lines.len()).ok());
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

// ============================================================================
// Payload Assembly
// ============================================================================

fn bench_bulk_body(c: &mut Criterion) {
    let mut group = c.benchmark_group("bulk_body");

    for count in [10u32, 100, 1000] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("index_{}", count), |b| {
            b.iter_batched(
                || (0..count).map(create_index_request).collect::<Vec<_>>(),
                |mut requests| {
                    let mut body = BulkBody::new();
                    for request in requests.iter_mut() {
                        let _ = body.add(request);
                    }
                    black_box(body.estimated_size_in_bytes())
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

criterion_group!(
    source_benches,
    bench_index_source,
    bench_update_source,
    bench_bulk_body,
);

criterion_main!(source_benches);
