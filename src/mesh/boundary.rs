//! Boundary extraction as a standalone mesh one dimension down.

use super::mesh::{CellId, Mesh};
use super::points::PointSet;
use crate::mesh_error::MeshError;
use crate::topology::order::{Composite, Segment, Tetrahedron, Triangle};
use crate::topology::registry::Topology;
use crate::topology::simplex::Simplex;

impl<O: Composite> Mesh<O> {
    /// Move every boundary face of `self` into `out`, taking a fresh hold on
    /// each so the result outlives the cells it was extracted from.
    fn extract_boundary<M>(
        &self,
        topology: &mut Topology,
        mut out: M,
        insert: fn(&mut M, &Topology, Simplex<O::Face>) -> Result<CellId, MeshError>,
    ) -> Result<M, MeshError> {
        let mut extracted = 0;
        for &face in self.boundary_cells() {
            topology.retain(face)?;
            insert(&mut out, topology, face)?;
            extracted += 1;
        }
        log::debug!(
            "extracted boundary of {} {}(s): {extracted} face(s)",
            self.n_cells(),
            O::NAME,
        );
        Ok(out)
    }
}

impl Mesh<Segment> {
    /// The endpoints of open chains, as a point set holding one hold per
    /// point. A closed polyline has an empty boundary.
    pub fn boundary(&self, topology: &mut Topology) -> Result<PointSet, MeshError> {
        let out = PointSet::with_segment(self.arena_segment());
        self.extract_boundary(topology, out, PointSet::insert)
    }
}

impl Mesh<Triangle> {
    /// A new segment mesh holding every boundary edge, oriented as the
    /// triangle that uses it.
    pub fn boundary(&self, topology: &mut Topology) -> Result<Mesh<Segment>, MeshError> {
        let out = self.sibling::<Segment>();
        self.extract_boundary(topology, out, Mesh::<Segment>::insert)
    }
}

impl Mesh<Tetrahedron> {
    /// A new triangle mesh holding every boundary face, oriented as the
    /// tetrahedron that uses it.
    pub fn boundary(&self, topology: &mut Topology) -> Result<Mesh<Triangle>, MeshError> {
        let out = self.sibling::<Triangle>();
        self.extract_boundary(topology, out, Mesh::<Triangle>::insert)
    }
}
