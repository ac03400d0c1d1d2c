#![allow(dead_code)]
use simplex_mesh::prelude::*;
use simplex_mesh::topology::relative_parity;

/// `N` fresh vertices, each held once by the caller.
pub fn vertices<const N: usize>(topology: &mut Topology) -> [Simplex<Vertex>; N] {
    std::array::from_fn(|_| topology.vertex())
}

/// Unit square split into four triangles around a centre vertex.
///
/// ```text
///   v4 ------- v2
///   | \   t2  / |
///   |  \     /  |
///   | t3  v3  t1|
///   |  /     \  |
///   | /   t0  \ |
///   v0 ------- v1
/// ```
pub struct Square {
    pub topology: Topology,
    pub v: [Simplex<Vertex>; 5],
    pub cells: [Simplex<Triangle>; 4],
    pub mesh: Mesh<Triangle>,
}

pub fn square() -> Square {
    let mut topology = Topology::new();
    let v = vertices::<5>(&mut topology);
    let cells = [
        [v[0], v[1], v[3]],
        [v[1], v[2], v[3]],
        [v[2], v[4], v[3]],
        [v[4], v[0], v[3]],
    ]
    .map(|c| topology.triangle_from_vertices(c).unwrap());
    let mut mesh = Mesh::new();
    for cell in cells {
        mesh.insert(&topology, cell).unwrap();
    }
    Square {
        topology,
        v,
        cells,
        mesh,
    }
}

/// Whether `got` is an even permutation of `want`.
pub fn is_even_permutation<T: Ord + Clone>(got: &[T], want: &[T]) -> bool {
    relative_parity(got, want) == Some(Orientation::Positive)
}

/// Assert vec is a permutation of another vec (order-agnostic).
pub fn assert_permutation<T: Ord + Copy + std::fmt::Debug>(got: &[T], want: &[T]) {
    let mut a = got.to_vec();
    a.sort_unstable();
    let mut b = want.to_vec();
    b.sort_unstable();
    assert_eq!(a, b, "not a permutation\n got={:?}\nwant={:?}", got, want);
}
