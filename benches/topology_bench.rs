use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use simplex_mesh::prelude::*;

/// Strip of `n` triangles over `n + 2` vertices, inserted into a mesh.
fn triangle_strip(topology: &mut Topology, n: usize) -> (Vec<Simplex<Vertex>>, Mesh<Triangle>) {
    let vertices: Vec<_> = (0..n + 2).map(|_| topology.vertex()).collect();
    let mut mesh = Mesh::new();
    for (i, w) in vertices.windows(3).enumerate() {
        // alternate the winding so neighbours share edges in opposite directions
        let order = if i % 2 == 0 {
            [w[0], w[1], w[2]]
        } else {
            [w[1], w[0], w[2]]
        };
        let cell = topology.triangle_from_vertices(order).expect("strip triangle");
        mesh.insert(topology, cell).expect("insert");
    }
    (vertices, mesh)
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for &n in &[1_000usize, 10_000usize] {
        group.bench_with_input(BenchmarkId::new("triangle_strip", n), &n, |b, &n| {
            b.iter(|| {
                let mut topology = Topology::new();
                let out = triangle_strip(&mut topology, n);
                black_box(out.1.boundary_size());
            });
        });

        group.bench_with_input(BenchmarkId::new("erase_cascade", n), &n, |b, &n| {
            b.iter(|| {
                let mut topology = Topology::new();
                let (vertices, mut mesh) = triangle_strip(&mut topology, n);
                for v in vertices {
                    topology.erase(v).expect("release vertex");
                }
                let removed = mesh.clear(&mut topology).expect("clear");
                black_box(removed);
            });
        });
    }

    group.finish();
}

fn bench_flip(c: &mut Criterion) {
    let mut group = c.benchmark_group("flip_diagonal");

    for &n in &[100usize, 1_000usize] {
        group.bench_with_input(BenchmarkId::new("strip_pairs", n), &n, |b, &n| {
            let mut topology = Topology::new();
            let (_, mut mesh) = triangle_strip(&mut topology, n);
            let cells: Vec<_> = mesh.cells().collect();
            // disjoint quads; each flip result is flipped back on the next pass
            let mut pairs: Vec<_> = cells.chunks_exact(2).map(|p| (p[0], p[1])).collect();
            b.iter(|| {
                for pair in pairs.iter_mut() {
                    *pair = flip_diagonal_in_mesh(&mut mesh, &mut topology, *pair).expect("flip");
                }
                black_box(mesh.n_cells());
            });
        });
    }

    group.finish();
}

fn bench_refine(c: &mut Criterion) {
    let mut group = c.benchmark_group("refine");

    for &levels in &[2usize, 4usize] {
        group.bench_with_input(BenchmarkId::new("triangle", levels), &levels, |b, &levels| {
            b.iter(|| {
                let mut topology = Topology::new();
                let (_, mesh) = triangle_strip(&mut topology, 8);
                let fine = subdivide_triangles(&mesh, &mut topology, levels).expect("refine");
                black_box(fine.n_cells());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_flip, bench_refine);
criterion_main!(benches);
