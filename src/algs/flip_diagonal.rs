//! Edge flip of two adjacent triangles.
//!
//! Two triangles sharing one edge form a quadrilateral. The flip replaces
//! the shared edge by the diagonal joining the two opposite vertices and
//! rebuilds the pair of triangles around it, keeping their orientation.
//!
//! Adjacency is checked and reported as [`MeshError::NoSharedEdge`]. Once
//! a shared edge is found the triangles are assumed to be consistently
//! oriented; a malformed quadrilateral panics.

use std::collections::BTreeSet;

use crate::debug_invariants::DebugInvariants;
use crate::mesh::Mesh;
use crate::mesh_error::MeshError;
use crate::topology::order::{Segment, Triangle, Vertex};
use crate::topology::registry::Topology;
use crate::topology::simplex::{FootprintId, Simplex};

/// The edge footprint used by both triangles.
pub fn find_shared_simplex(
    topology: &Topology,
    first: Simplex<Triangle>,
    second: Simplex<Triangle>,
) -> Result<FootprintId<Segment>, MeshError> {
    let a = topology.composition(first)?;
    let b = topology.composition(second)?;
    a.iter()
        .map(|e| e.footprint())
        .find(|&fp| b.iter().any(|e| e.footprint() == fp))
        .ok_or(MeshError::NoSharedEdge)
}

/// The two vertices of the quadrilateral not on `shared`.
pub fn opposite_vertices(
    topology: &Topology,
    first: Simplex<Triangle>,
    second: Simplex<Triangle>,
    shared: FootprintId<Segment>,
) -> Result<[Simplex<Vertex>; 2], MeshError> {
    let mut union = topology.vertex_set(first)?;
    union.extend(topology.vertex_set(second)?);
    let diagonal = topology.vertex_set(Simplex::new(shared, Default::default()))?;
    let opposite: Vec<_> = union.difference(&diagonal).copied().collect();
    assert_eq!(
        opposite.len(),
        2,
        "quadrilateral has {} vertices off the shared edge",
        opposite.len()
    );
    Ok([opposite[0], opposite[1]])
}

/// Close a head-to-tail cycle of three edges starting at `start`, taking the
/// other two from `candidates`.
fn close_cycle(
    topology: &Topology,
    start: Simplex<Segment>,
    candidates: &mut BTreeSet<Simplex<Segment>>,
) -> Result<[Simplex<Segment>; 3], MeshError> {
    let mut cycle = vec![start];
    for _ in 0..2 {
        let last = cycle[cycle.len() - 1];
        let mut next = None;
        for &edge in candidates.iter() {
            if topology.head_tail_connected(last, edge)? {
                next = Some(edge);
                break;
            }
        }
        let Some(edge) = next else {
            panic!("no boundary edge leaves the head of {last:?}");
        };
        candidates.remove(&edge);
        cycle.push(edge);
    }
    assert!(
        topology.head_tail_connected(cycle[2], start)?,
        "edge cycle from {start:?} does not close"
    );
    Ok([cycle[0], cycle[1], cycle[2]])
}

/// Build the two triangles of the flipped quadrilateral.
///
/// The originals are untouched and the caller receives one hold on each
/// new triangle; releasing the originals is up to the caller.
pub fn flip_diagonal(
    topology: &mut Topology,
    pair: (Simplex<Triangle>, Simplex<Triangle>),
) -> Result<(Simplex<Triangle>, Simplex<Triangle>), MeshError> {
    let (first, second) = pair;
    let shared = find_shared_simplex(topology, first, second)?;
    let [o0, o1] = opposite_vertices(topology, first, second, shared)?;

    let diagonal = topology.segment([o0, o1])?;
    let opposite_diagonal = topology.segment([o1, o0])?;

    let mut boundary: BTreeSet<Simplex<Segment>> = topology
        .composition(first)?
        .into_iter()
        .chain(topology.composition(second)?)
        .filter(|e| e.footprint() != shared)
        .collect();
    assert_eq!(boundary.len(), 4, "quadrilateral boundary has {} edges", boundary.len());

    let left = close_cycle(topology, diagonal, &mut boundary)?;
    let right = close_cycle(topology, opposite_diagonal, &mut boundary)?;
    assert!(boundary.is_empty(), "unused boundary edges {boundary:?}");

    let new_first = topology.triangle(left)?;
    let new_second = topology.triangle(right)?;
    topology.erase(diagonal)?;
    topology.erase(opposite_diagonal)?;
    log::debug!("flipped {first:?}/{second:?} into {new_first:?}/{new_second:?}");
    Ok((new_first, new_second))
}

/// Flip the shared edge of two cells of `mesh`: the new triangles replace
/// the old ones, whose now-unused diagonal is destroyed with them.
pub fn flip_diagonal_in_mesh(
    mesh: &mut Mesh<Triangle>,
    topology: &mut Topology,
    pair: (Simplex<Triangle>, Simplex<Triangle>),
) -> Result<(Simplex<Triangle>, Simplex<Triangle>), MeshError> {
    for cell in [pair.0, pair.1] {
        if !mesh.contains(cell) {
            return Err(MeshError::CellNotInMesh(format!("{cell:?}")));
        }
    }
    let (new_first, new_second) = flip_diagonal(topology, pair)?;
    mesh.insert(topology, new_first)?;
    mesh.insert(topology, new_second)?;
    mesh.erase(topology, pair.0)?;
    mesh.erase(topology, pair.1)?;
    mesh.debug_assert_invariants();
    Ok((new_first, new_second))
}
