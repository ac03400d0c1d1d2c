//! Lower-dimensional views of a mesh.

use hashbrown::HashSet;

use super::mesh::Mesh;
use crate::mesh_error::MeshError;
use crate::topology::order::Composite;
use crate::topology::registry::Topology;

/// Mesh of every distinct face of `mesh`, each oriented as its first
/// occurrence. Interior faces appear once, not once per adjacent cell.
pub fn filter_faces<O>(mesh: &Mesh<O>, topology: &mut Topology) -> Result<Mesh<O::Face>, MeshError>
where
    O: Composite,
    O::Face: Composite,
{
    let mut out = mesh.sibling::<O::Face>();
    let mut seen = HashSet::new();
    for face in mesh.faces() {
        if seen.insert(face.footprint()) {
            topology.retain(face)?;
            out.insert(topology, face)?;
        }
    }
    Ok(out)
}
