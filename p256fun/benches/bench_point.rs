use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use p256fun::{
    AffinePoint, GENERATOR_TABLE, GeneratorTable, JacobianPoint, Scalar, double_mul, mul,
    mul_base, subtle::Choice,
};
use rand::RngCore;

fn random_scalar() -> Scalar {
    let mut rng = rand::thread_rng();
    Scalar::from_uint_reduced([rng.next_u64(), rng.next_u64(), rng.next_u64(), rng.next_u64()])
}

fn random_point() -> JacobianPoint {
    mul_base(GENERATOR_TABLE.get(), &random_scalar())
}

fn point_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("point_ops");

    group.bench_function("double", |b| {
        b.iter_batched(random_point, |p| p.double(), BatchSize::SmallInput)
    });

    group.bench_function("add_mixed", |b| {
        let set = Choice::from(1);
        b.iter_batched(
            || (random_point(), random_point().to_affine().unwrap()),
            |(lhs, rhs)| lhs.add_mixed(&rhs, Choice::from(0), set, set),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("add", |b| {
        b.iter_batched(
            || (random_point(), random_point()),
            |(lhs, rhs)| lhs.add(&rhs),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("to_affine", |b| {
        b.iter_batched(random_point, |p| p.to_affine(), BatchSize::SmallInput)
    });
}

fn ecmult(c: &mut Criterion) {
    let mut group = c.benchmark_group("ecmult");
    let table = GENERATOR_TABLE.get();

    group.bench_function("mul_base", |b| {
        b.iter_batched(random_scalar, |k| mul_base(table, &k), BatchSize::SmallInput)
    });

    group.bench_function("mul", |b| {
        b.iter_batched(
            || (random_scalar(), random_point().to_affine().unwrap()),
            |(k, p)| mul(&p, &k),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("double_mul", |b| {
        b.iter_batched(
            || (random_scalar(), random_scalar(), random_point().to_affine().unwrap()),
            |(k1, k2, p)| double_mul(table, &k1, &p, &k2),
            BatchSize::SmallInput,
        )
    });

    group.sample_size(10);
    group.bench_function("build_generator_table", |b| b.iter(GeneratorTable::new));
    group.bench_function("build_local_table", |b| {
        b.iter(|| p256fun::LocalTable::new(&AffinePoint::GENERATOR))
    });
}

criterion_group!(benches, point_ops, ecmult);
criterion_main!(benches);
