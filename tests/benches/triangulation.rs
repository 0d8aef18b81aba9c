#[macro_use]
extern crate criterion;

use criterion::{BenchmarkId, Criterion};
use vecmesh::math::{point, Box2D, Point};
use vecmesh::tessellation::batch::{triangulate_all, Shape};
use vecmesh::tessellation::curve::fill_cubic;
use vecmesh::tessellation::{CdtOptions, DelaunayTessellator, VertexBuffers};
use vecmesh_tests::*;

static GRID_SIZES: [u32; 4] = [4, 8, 16, 32];

fn point_sets(c: &mut Criterion) {
    let mut g = c.benchmark_group("points");
    let mut tess = DelaunayTessellator::new();
    let mut buffers: VertexBuffers<Point, u32> = VertexBuffers::new();
    for n in &GRID_SIZES {
        let points = grid(*n);
        let max = (*n - 1) as f32;
        let bounds = Box2D {
            min: point(0.0, 0.0),
            max: point(max, max),
        };
        g.bench_with_input(BenchmarkId::new("grid", n), n, |b, _| {
            b.iter(|| {
                buffers.clear();
                tess.triangulate(&bounds, &points, &CdtOptions::default(), &mut buffers)
                    .unwrap();
            })
        });
    }
}

fn outlines(c: &mut Criterion) {
    let mut g = c.benchmark_group("outlines");
    let mut tess = DelaunayTessellator::new();
    let mut buffers: VertexBuffers<Point, u32> = VertexBuffers::new();

    let shapes = [
        ("letter_e", letter_e()),
        ("letter_a", letter_a()),
        ("comb", comb(20)),
        ("ring", ring(100.0, 128)),
    ];

    for (name, outline) in &shapes {
        g.bench_function(*name, |b| {
            b.iter(|| {
                buffers.clear();
                outline
                    .triangulate(&mut tess, &CdtOptions::default(), &mut buffers)
                    .unwrap();
            })
        });
    }
}

fn batch(c: &mut Criterion) {
    let shapes: Vec<Shape> = (0..64)
        .map(|i| {
            if i % 2 == 0 {
                Shape::from(comb(10 + i % 7))
            } else {
                Shape::from(ring(10.0, 32 + 2 * i as usize))
            }
        })
        .collect();

    c.bench_function("batch", |b| {
        b.iter(|| {
            let results = triangulate_all(&shapes, &CdtOptions::default());
            std::hint::black_box(results);
        })
    });
}

fn curve_hulls(c: &mut Criterion) {
    let curves = curves();
    let mut vertices = Vec::with_capacity(curves.len() * 12);
    c.bench_function("curve hulls", |b| {
        b.iter(|| {
            vertices.clear();
            for curve in &curves {
                fill_cubic(curve, &mut vertices);
            }
        })
    });
}

criterion_group!(triangulation, point_sets, outlines, batch, curve_hulls);

criterion_main!(triangulation);
