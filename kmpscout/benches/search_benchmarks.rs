use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kmpscout::search::{scan, ParallelMatcher};
use kmpscout::{build_lps, search, SearchMode};

fn create_corpus(bytes: usize) -> Vec<u8> {
    let line = b"Line TODO: fix bug FIXME: optimize line NOTE: important task\n";
    line.iter().copied().cycle().take(bytes).collect()
}

fn bench_lps_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("LPS Construction");
    for len in [8, 64, 1024] {
        let pattern: Vec<u8> = b"ABABCABAB".iter().copied().cycle().take(len).collect();
        group.bench_with_input(BenchmarkId::from_parameter(len), &pattern, |b, pattern| {
            b.iter(|| black_box(build_lps(pattern).unwrap()));
        });
    }
    group.finish();
}

fn bench_sequential_scan(c: &mut Criterion) {
    let corpus = create_corpus(4 * 1024 * 1024);
    let pattern = b"not in corpus";
    let lps = build_lps(pattern).unwrap();

    c.bench_function("sequential_scan_4mb_miss", |b| {
        b.iter(|| black_box(scan(pattern, &lps, &corpus)));
    });
}

fn bench_parallel_scaling(c: &mut Criterion) {
    let corpus = create_corpus(16 * 1024 * 1024);
    let pattern = b"not in corpus";
    let lps = build_lps(pattern).unwrap();

    let mut group = c.benchmark_group("Parallel Scaling");
    for workers in [1, 2, 4, 8] {
        let matcher = ParallelMatcher::new(workers).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, _| {
            b.iter(|| black_box(matcher.search(pattern, &lps, &corpus)));
        });
    }
    group.finish();
}

fn bench_one_shot_search(c: &mut Criterion) {
    let corpus = create_corpus(1024 * 1024);
    let mut group = c.benchmark_group("One Shot Search");
    for mode in [SearchMode::Sequential, SearchMode::Parallel(4)] {
        group.bench_function(mode.to_string(), |b| {
            b.iter(|| black_box(search(b"important task", &corpus, mode).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_lps_construction,
    bench_sequential_scan,
    bench_parallel_scaling,
    bench_one_shot_search
);
criterion_main!(benches);
