//! Zero-dimensional meshes.

use std::num::NonZeroUsize;

use hashbrown::HashMap;

use super::mesh::CellId;
use crate::arena::SegmentedAllocator;
use crate::config::{DEFAULT_SEGMENT, TopologyConfig};
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshError;
use crate::topology::order::{Order, Vertex};
use crate::topology::registry::Topology;
use crate::topology::simplex::Simplex;

/// A multiset of vertices, each carrying one hold on the topology.
///
/// Vertices have no faces, so a point set has no boundary. The boundary of
/// a segment mesh is extracted into one.
#[derive(Debug)]
pub struct PointSet {
    points: SegmentedAllocator<Simplex<Vertex>>,
    members: HashMap<Simplex<Vertex>, Vec<CellId>>,
}

impl Default for PointSet {
    fn default() -> Self {
        Self::new()
    }
}

impl PointSet {
    pub fn new() -> Self {
        Self::with_segment(DEFAULT_SEGMENT)
    }

    pub fn with_segment_size(segment_size: usize) -> Result<Self, MeshError> {
        NonZeroUsize::new(segment_size)
            .map(Self::with_segment)
            .ok_or(MeshError::InvalidSegmentSize)
    }

    pub fn with_config(config: &TopologyConfig) -> Result<Self, MeshError> {
        config.validate()?;
        Self::with_segment_size(config.mesh_segment_size)
    }

    pub(crate) fn with_segment(segment: NonZeroUsize) -> Self {
        Self {
            points: SegmentedAllocator::with_segment_size(segment),
            members: HashMap::new(),
        }
    }

    /// Add a vertex, taking over one of the caller's holds on it.
    pub fn insert(
        &mut self,
        topology: &Topology,
        point: Simplex<Vertex>,
    ) -> Result<CellId, MeshError> {
        if !topology.is_live(point) {
            return Err(MeshError::StaleSimplex {
                order: Vertex::NAME,
                index: point.footprint().index(),
            });
        }
        if topology.uses(point) <= self.multiplicity(point) {
            return Err(MeshError::OrientationNotHeld {
                order: Vertex::NAME,
                index: point.footprint().index(),
                orientation: point.orientation(),
            });
        }
        let id = self.points.emplace(point);
        self.members.entry(point).or_default().push(id);
        log::trace!("point set inserted {point:?} as {id}");
        Ok(id)
    }

    /// Remove one occurrence of `point` and release the hold on it.
    pub fn erase(
        &mut self,
        topology: &mut Topology,
        point: Simplex<Vertex>,
    ) -> Result<(), MeshError> {
        let id = self
            .members
            .get(&point)
            .and_then(|ids| ids.last().copied())
            .ok_or_else(|| MeshError::CellNotInMesh(format!("{point:?}")))?;
        topology.erase(point)?;
        self.detach(id);
        Ok(())
    }

    pub fn erase_id(
        &mut self,
        topology: &mut Topology,
        id: CellId,
    ) -> Result<Simplex<Vertex>, MeshError> {
        let point = self
            .get(id)
            .ok_or_else(|| MeshError::CellNotInMesh(id.to_string()))?;
        topology.erase(point)?;
        self.detach(id);
        Ok(point)
    }

    fn detach(&mut self, id: CellId) {
        let point = self.points.erase(id);
        if let Some(ids) = self.members.get_mut(&point) {
            ids.retain(|&other| other != id);
            if ids.is_empty() {
                self.members.remove(&point);
            }
        }
    }

    /// Release every point. Returns how many were removed.
    pub fn clear(&mut self, topology: &mut Topology) -> Result<usize, MeshError> {
        let ids: Vec<CellId> = self.points.keys().collect();
        for &id in &ids {
            self.erase_id(topology, id)?;
        }
        Ok(ids.len())
    }

    pub fn get(&self, id: CellId) -> Option<Simplex<Vertex>> {
        self.points.get(id).copied()
    }

    /// Points in arena order.
    pub fn cells(&self) -> impl Iterator<Item = Simplex<Vertex>> + '_ {
        self.points.iter().map(|(_, &point)| point)
    }

    #[inline]
    pub fn n_cells(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn contains(&self, point: Simplex<Vertex>) -> bool {
        self.members.contains_key(&point)
    }

    pub fn multiplicity(&self, point: Simplex<Vertex>) -> usize {
        self.members.get(&point).map_or(0, Vec::len)
    }
}

impl DebugInvariants for PointSet {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "PointSet");
    }

    fn validate_invariants(&self) -> Result<(), MeshError> {
        self.points.validate_invariants()?;
        let members: usize = self.members.values().map(Vec::len).sum();
        crate::ensure_invariant!(
            members == self.points.len(),
            "{members} member entries for {} points",
            self.points.len()
        );
        for (point, ids) in &self.members {
            for &id in ids {
                crate::ensure_invariant!(
                    self.get(id) == Some(*point),
                    "member {point:?} points at {id} holding {:?}",
                    self.get(id)
                );
            }
        }
        Ok(())
    }
}
