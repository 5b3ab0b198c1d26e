use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bwt_search::index::{bwt, fm, locate, rank};

fn make_reference(len: usize) -> Vec<u8> {
    let bases = [b'A', b'C', b'G', b'T'];
    let mut seq = Vec::with_capacity(len);
    let mut x: u32 = 42;
    for _ in 0..len {
        x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        seq.push(bases[(x >> 16) as usize % 4]);
    }
    seq
}

fn bench_transform(c: &mut Criterion) {
    let reference = make_reference(10_000);
    c.bench_function("transform_10k", |b| {
        b.iter(|| {
            black_box(bwt::transform(black_box(&reference)));
        })
    });
}

fn bench_build_rank(c: &mut Criterion) {
    let text = bwt::transform(&make_reference(10_000));
    for jump in [1usize, 64] {
        c.bench_function(&format!("build_rank_10k_jump{}", jump), |b| {
            b.iter(|| {
                black_box(rank::build_rank_index(black_box(&text), jump).ok());
            })
        });
    }
}

fn bench_backward_search(c: &mut Criterion) {
    let reference = make_reference(10_000);
    let idx = fm::build_index(&bwt::transform(&reference));
    let pattern = reference[100..120].to_vec();

    c.bench_function("backward_search_20bp", |b| {
        b.iter(|| {
            black_box(idx.backward_search(black_box(&pattern)));
        })
    });
}

fn bench_locate(c: &mut Criterion) {
    let reference = make_reference(10_000);
    let idx = fm::build_index(&bwt::transform(&reference));
    let positions = match locate::PositionMap::build(&idx, 32) {
        Ok(p) => p,
        Err(e) => panic!("cannot sample positions: {}", e),
    };
    let (l, r) = idx.backward_search(b"ACGT").unwrap_or((0, 0));

    c.bench_function("locate_acgt_rate32", |b| {
        b.iter(|| {
            black_box(positions.locate_range(&idx, l, r).ok());
        })
    });
}

criterion_group!(benches, bench_transform, bench_build_rank, bench_backward_search, bench_locate);
criterion_main!(benches);
