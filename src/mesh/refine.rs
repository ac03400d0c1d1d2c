//! Uniform topological refinement.
//!
//! Each level splits every triangle into 4 and every tetrahedron into 8 by
//! inserting one new vertex per edge. Midpoints are shared through an
//! edge-keyed map, so neighbouring cells stay conforming. Only topology is
//! produced; callers that track coordinates place the new vertices.

use hashbrown::HashMap;

use super::mesh::Mesh;
use crate::mesh_error::MeshError;
use crate::topology::order::{Composite, Tetrahedron, Triangle, Vertex};
use crate::topology::registry::Topology;
use crate::topology::simplex::Simplex;

/// Splits one cell, given by its vertices, into its children.
type Split<O, const N: usize> =
    fn(&mut Topology, &mut Midpoints, [Simplex<Vertex>; N]) -> Result<Vec<Simplex<O>>, MeshError>;

/// New vertices created for the edges of one refinement level.
#[derive(Default)]
struct Midpoints {
    by_edge: HashMap<(Simplex<Vertex>, Simplex<Vertex>), Simplex<Vertex>>,
}

impl Midpoints {
    fn between(
        &mut self,
        topology: &mut Topology,
        a: Simplex<Vertex>,
        b: Simplex<Vertex>,
    ) -> Simplex<Vertex> {
        let edge = if a <= b { (a, b) } else { (b, a) };
        *self.by_edge.entry(edge).or_insert_with(|| topology.vertex())
    }

    /// Drop the creation holds; the new cells keep the vertices alive.
    fn release(self, topology: &mut Topology) -> Result<(), MeshError> {
        for vertex in self.by_edge.into_values() {
            topology.erase(vertex)?;
        }
        Ok(())
    }
}

fn split_triangle(
    topology: &mut Topology,
    mids: &mut Midpoints,
    [v0, v1, v2]: [Simplex<Vertex>; 3],
) -> Result<Vec<Simplex<Triangle>>, MeshError> {
    let m01 = mids.between(topology, v0, v1);
    let m12 = mids.between(topology, v1, v2);
    let m20 = mids.between(topology, v2, v0);
    [
        [v0, m01, m20],
        [m01, v1, m12],
        [m12, v2, m20],
        [m20, m01, m12],
    ]
    .into_iter()
    .map(|child| topology.triangle_from_vertices(child))
    .collect()
}

fn split_tetrahedron(
    topology: &mut Topology,
    mids: &mut Midpoints,
    [v0, v1, v2, v3]: [Simplex<Vertex>; 4],
) -> Result<Vec<Simplex<Tetrahedron>>, MeshError> {
    let m01 = mids.between(topology, v0, v1);
    let m02 = mids.between(topology, v0, v2);
    let m03 = mids.between(topology, v0, v3);
    let m12 = mids.between(topology, v1, v2);
    let m13 = mids.between(topology, v1, v3);
    let m23 = mids.between(topology, v2, v3);
    [
        // corners
        [v0, m01, m02, m03],
        [m01, v1, m12, m13],
        [m02, m12, v2, m23],
        [m03, m13, m23, v3],
        // inner octahedron around the m13-m02 diagonal
        [m13, m02, m01, m03],
        [m13, m02, m03, m23],
        [m13, m02, m23, m12],
        [m13, m02, m12, m01],
    ]
    .into_iter()
    .map(|child| topology.tetrahedron_from_vertices(child))
    .collect()
}

fn refine<O, const N: usize>(
    mesh: &Mesh<O>,
    topology: &mut Topology,
    levels: usize,
    split: Split<O, N>,
) -> Result<Mesh<O>, MeshError>
where
    O: Composite,
{
    let mut current: Option<Mesh<O>> = None;
    for level in 0..levels {
        let source = current.as_ref().unwrap_or(mesh);
        let cells: Vec<Simplex<O>> = source.cells().collect();
        let mut next = source.sibling::<O>();
        let mut mids = Midpoints::default();
        for cell in cells {
            let vertices: [Simplex<Vertex>; N] =
                topology.vertices(cell)?.try_into().map_err(|v: Vec<_>| {
                    MeshError::InvariantViolation(format!(
                        "{cell:?} has {} vertices, expected {N}",
                        v.len()
                    ))
                })?;
            for child in split(topology, &mut mids, vertices)? {
                next.insert(topology, child)?;
            }
        }
        mids.release(topology)?;
        log::debug!(
            "refinement level {}: {} -> {} {}(s)",
            level + 1,
            source.n_cells(),
            next.n_cells(),
            O::NAME
        );
        if let Some(mut previous) = current.replace(next) {
            previous.clear(topology)?;
        }
    }
    match current {
        Some(refined) => Ok(refined),
        None => {
            let mut copy = mesh.sibling::<O>();
            for cell in mesh.cells() {
                topology.retain(cell)?;
                copy.insert(topology, cell)?;
            }
            Ok(copy)
        }
    }
}

/// Split every triangle of `mesh` into four, `levels` times. The input mesh
/// is left untouched; the result holds its own cells.
pub fn subdivide_triangles(
    mesh: &Mesh<Triangle>,
    topology: &mut Topology,
    levels: usize,
) -> Result<Mesh<Triangle>, MeshError> {
    refine::<Triangle, 3>(mesh, topology, levels, split_triangle)
}

/// Split every tetrahedron of `mesh` into eight, `levels` times.
pub fn subdivide_tetrahedra(
    mesh: &Mesh<Tetrahedron>,
    topology: &mut Topology,
    levels: usize,
) -> Result<Mesh<Tetrahedron>, MeshError> {
    refine::<Tetrahedron, 4>(mesh, topology, levels, split_tetrahedron)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug_invariants::DebugInvariants;

    #[test]
    fn midpoints_are_shared_between_orders() {
        let mut topo = Topology::new();
        let [a, b] = [topo.vertex(), topo.vertex()];
        let mut mids = Midpoints::default();
        let m = mids.between(&mut topo, a, b);
        assert_eq!(mids.between(&mut topo, b, a), m);
        assert_eq!(topo.n_simplices::<Vertex>(), 3);
        mids.release(&mut topo).unwrap();
        assert_eq!(topo.n_simplices::<Vertex>(), 2);
    }

    #[test]
    fn zero_levels_copies_the_mesh() {
        let mut topo = Topology::new();
        let v = [topo.vertex(), topo.vertex(), topo.vertex()];
        let t = topo.triangle_from_vertices(v).unwrap();
        let mut mesh = Mesh::new();
        mesh.insert(&topo, t).unwrap();

        let mut copy = subdivide_triangles(&mesh, &mut topo, 0).unwrap();
        assert_eq!(copy.n_cells(), 1);
        assert_eq!(topo.incidence(t), 2);
        copy.clear(&mut topo).unwrap();
        assert!(topo.is_live(t));
        topo.validate_invariants().unwrap();
    }
}
