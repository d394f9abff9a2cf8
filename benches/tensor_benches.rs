use RustedPolyTensor::Utils::poly_parser::parse_expression;
use RustedPolyTensor::functions::poly_function::PolynomialFunction;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn dense(dims: &[usize]) -> PolynomialFunction {
    let size: usize = dims.iter().product();
    let values: Vec<f64> = (0..size).map(|i| (i % 7) as f64 - 3.0).collect();
    PolynomialFunction::from_reals(dims, &values).unwrap()
}

fn bench_convolution(c: &mut Criterion) {
    let f = dense(&[6, 6, 6]);
    let g = dense(&[5, 4, 3]);
    c.bench_function("convolve 6x6x6 by 5x4x3", |b| {
        b.iter(|| black_box(&f).multiply(black_box(&g)))
    });
}

fn bench_composition(c: &mut Criterion) {
    let f = dense(&[6, 4]);
    let g = dense(&[3, 3, 2]);
    c.bench_function("compose degree 5 into mode 0", |b| {
        b.iter(|| black_box(&f).compose(black_box(&g), 0).unwrap())
    });
}

fn bench_total_differ(c: &mut Criterion) {
    let names = ["x", "y", "z", "t"];
    let w = parse_expression(&names, "x^2 y t + x z^2 + y z t").unwrap();
    let x = parse_expression(&names, "y z + y^2").unwrap();
    let y = parse_expression(&names, "t^2 + 1").unwrap();
    let z = parse_expression(&names, "3t").unwrap();
    let inner = [Some(x), Some(y), Some(z)];
    c.bench_function("total derivative along t", |b| {
        b.iter(|| black_box(&w).total_differ(3, black_box(&inner)).unwrap())
    });
}

criterion_group!(benches, bench_convolution, bench_composition, bench_total_differ);
criterion_main!(benches);
