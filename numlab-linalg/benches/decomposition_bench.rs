use criterion::{black_box, criterion_group, criterion_main, Criterion};
use numlab_linalg::decomposition::{CholeskyDecomposition, LuDecomposition, QrDecomposition};
use numlab_linalg::Matrix;

fn spd(n: usize) -> Matrix {
    let base = Matrix::from_row_major(n, n, (0..n * n).map(|i| (i as f64 * 0.017).cos()).collect()).unwrap();
    let gram = base.times(&base.transpose()).unwrap();
    let mut shifted = gram;
    for i in 0..n {
        shifted.set(i, i, shifted.get(i, i) + n as f64);
    }
    shifted
}

fn bench_lu(c: &mut Criterion) {
    let a = spd(64);
    c.bench_function("lu_64x64", |bencher| bencher.iter(|| LuDecomposition::compute(black_box(&a)).unwrap()));
}

fn bench_qr(c: &mut Criterion) {
    let a = spd(64);
    c.bench_function("qr_64x64", |bencher| bencher.iter(|| QrDecomposition::compute(black_box(&a)).unwrap()));
}

fn bench_cholesky(c: &mut Criterion) {
    let a = spd(64);
    c.bench_function("cholesky_64x64", |bencher| {
        bencher.iter(|| CholeskyDecomposition::compute(black_box(&a)).unwrap())
    });
}

criterion_group!(benches, bench_lu, bench_qr, bench_cholesky);
criterion_main!(benches);
