//! A multiset of top-dimensional cells over a shared [`Topology`].
//!
//! The mesh owns one topology hold per inserted cell and keeps its own face
//! usage counters (independent of the registry's), which is what makes the
//! boundary a local notion: a face is on the boundary of *this* mesh when
//! exactly one of its cells uses it.

use std::collections::BTreeSet;
use std::num::NonZeroUsize;

use hashbrown::{HashMap, HashSet};
use once_cell::unsync::OnceCell;

use crate::arena::{SegmentedAllocator, SlotKey};
use crate::config::{DEFAULT_SEGMENT, TopologyConfig};
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshError;
use crate::topology::cache::InvalidateCache;
use crate::topology::order::{Composite, Vertex};
use crate::topology::registry::Topology;
use crate::topology::simplex::{FootprintId, Simplex};

/// Position of a cell in its mesh's arena.
pub type CellId = SlotKey;

#[derive(Clone, Debug)]
struct MeshCell<O: Composite> {
    simplex: Simplex<O>,
    faces: Vec<Simplex<O::Face>>,
}

/// Cells of dimension `O`, each carrying one hold on the topology.
#[derive(Debug)]
pub struct Mesh<O: Composite> {
    cells: SegmentedAllocator<MeshCell<O>>,
    members: HashMap<Simplex<O>, Vec<CellId>>,
    face_uses: HashMap<FootprintId<O::Face>, [u32; 2]>,
    boundary: OnceCell<Vec<Simplex<O::Face>>>,
}

impl<O: Composite> Default for Mesh<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Composite> Mesh<O> {
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
            cells: SegmentedAllocator::with_segment_size(segment),
            members: HashMap::new(),
            face_uses: HashMap::new(),
            boundary: OnceCell::new(),
        }
    }

    pub(crate) fn arena_segment(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.cells.segment_size()).unwrap_or(DEFAULT_SEGMENT)
    }

    /// Empty mesh of any dimension with this mesh's arena sizing.
    pub(crate) fn sibling<P: Composite>(&self) -> Mesh<P> {
        Mesh::with_segment(self.arena_segment())
    }

    /// Add a cell. The caller's hold on `cell` is transferred to the mesh;
    /// inserting the same cell twice requires two holds.
    ///
    /// Fails with `OrientationNotHeld` when the topology has no use of this
    /// orientation left beyond the ones the mesh already owns.
    pub fn insert(&mut self, topology: &Topology, cell: Simplex<O>) -> Result<CellId, MeshError> {
        let faces = topology.composition(cell)?;
        if topology.uses(cell) <= self.multiplicity(cell) {
            return Err(MeshError::OrientationNotHeld {
                order: O::NAME,
                index: cell.footprint().index(),
                orientation: cell.orientation(),
            });
        }
        for face in &faces {
            self.face_uses.entry(face.footprint()).or_default()[face.orientation().index()] += 1;
        }
        let id = self.cells.emplace(MeshCell {
            simplex: cell,
            faces,
        });
        self.members.entry(cell).or_default().push(id);
        self.invalidate_cache();
        log::trace!("mesh inserted {cell:?} as {id}");
        Ok(id)
    }

    /// Remove one occurrence of `cell` and release the mesh's hold on it.
    pub fn erase(&mut self, topology: &mut Topology, cell: Simplex<O>) -> Result<(), MeshError> {
        let id = self
            .members
            .get(&cell)
            .and_then(|ids| ids.last().copied())
            .ok_or_else(|| MeshError::CellNotInMesh(format!("{cell:?}")))?;
        topology.erase(cell)?;
        self.detach(id);
        Ok(())
    }

    /// Remove the cell stored at `id` and release the mesh's hold on it.
    pub fn erase_id(
        &mut self,
        topology: &mut Topology,
        id: CellId,
    ) -> Result<Simplex<O>, MeshError> {
        let cell = self
            .get(id)
            .ok_or_else(|| MeshError::CellNotInMesh(id.to_string()))?;
        topology.erase(cell)?;
        self.detach(id);
        Ok(cell)
    }

    fn detach(&mut self, id: CellId) {
        let removed = self.cells.erase(id);
        if let Some(ids) = self.members.get_mut(&removed.simplex) {
            ids.retain(|&other| other != id);
            if ids.is_empty() {
                self.members.remove(&removed.simplex);
            }
        }
        for face in &removed.faces {
            if let Some(uses) = self.face_uses.get_mut(&face.footprint()) {
                uses[face.orientation().index()] -= 1;
                if *uses == [0, 0] {
                    self.face_uses.remove(&face.footprint());
                }
            }
        }
        self.invalidate_cache();
        log::trace!("mesh erased {:?} from {id}", removed.simplex);
    }

    /// Release every cell. Returns how many were removed.
    pub fn clear(&mut self, topology: &mut Topology) -> Result<usize, MeshError> {
        let ids: Vec<CellId> = self.cells.keys().collect();
        for &id in &ids {
            self.erase_id(topology, id)?;
        }
        Ok(ids.len())
    }

    /// Drop every cell whose footprint already occurs earlier in the mesh
    /// (in either orientation). Returns how many were removed.
    pub fn erase_duplicates(&mut self, topology: &mut Topology) -> Result<usize, MeshError> {
        let mut seen = HashSet::new();
        let duplicates: Vec<CellId> = self
            .cells
            .iter()
            .filter(|(_, cell)| !seen.insert(cell.simplex.footprint()))
            .map(|(id, _)| id)
            .collect();
        self.erase_all(topology, duplicates)
    }

    /// Drop repeated insertions of the same oriented cell, keeping cells
    /// that only share a footprint with opposite orientation.
    pub fn erase_oriented_duplicates(
        &mut self,
        topology: &mut Topology,
    ) -> Result<usize, MeshError> {
        let duplicates: Vec<CellId> = self
            .members
            .values()
            .flat_map(|ids| ids.iter().skip(1).copied())
            .collect();
        self.erase_all(topology, duplicates)
    }

    fn erase_all(
        &mut self,
        topology: &mut Topology,
        duplicates: Vec<CellId>,
    ) -> Result<usize, MeshError> {
        for &id in &duplicates {
            self.erase_id(topology, id)?;
        }
        if !duplicates.is_empty() {
            log::warn!("removed {} duplicate cell(s) from mesh", duplicates.len());
        }
        Ok(duplicates.len())
    }

    pub fn get(&self, id: CellId) -> Option<Simplex<O>> {
        self.cells.get(id).map(|cell| cell.simplex)
    }

    /// Cells in arena order.
    pub fn cells(&self) -> impl Iterator<Item = Simplex<O>> + '_ {
        self.cells.iter().map(|(_, cell)| cell.simplex)
    }

    /// Cells with their ids, in arena order.
    pub fn cell_ids(&self) -> impl Iterator<Item = (CellId, Simplex<O>)> + '_ {
        self.cells.iter().map(|(id, cell)| (id, cell.simplex))
    }

    /// Every face occurrence, cell by cell, in composition order.
    pub fn faces(&self) -> impl Iterator<Item = Simplex<O::Face>> + '_ {
        self.cells
            .iter()
            .flat_map(|(_, cell)| cell.faces.iter().copied())
    }

    #[inline]
    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: Simplex<O>) -> bool {
        self.members.contains_key(&cell)
    }

    /// How many times `cell` (this exact orientation) was inserted.
    pub fn multiplicity(&self, cell: Simplex<O>) -> usize {
        self.members.get(&cell).map_or(0, Vec::len)
    }

    /// Number of cells of this mesh using the footprint of `face`, in
    /// either orientation.
    pub fn face_uses(&self, face: Simplex<O::Face>) -> usize {
        self.face_uses
            .get(&face.footprint())
            .map_or(0, |uses| (uses[0] + uses[1]) as usize)
    }

    pub fn is_on_boundary(&self, face: Simplex<O::Face>) -> bool {
        self.face_uses(face) == 1
    }

    /// Faces used by exactly one cell, oriented as that cell uses them.
    /// Cached until the next mutation.
    pub fn boundary_cells(&self) -> &[Simplex<O::Face>] {
        self.boundary.get_or_init(|| {
            self.faces()
                .filter(|&face| self.is_on_boundary(face))
                .collect()
        })
    }

    /// Same as [`boundary_cells`](Self::boundary_cells) but recounted from the
    /// cells, ignoring both the cache and the incremental counters.
    pub fn recompute_boundary_cells(&self) -> Vec<Simplex<O::Face>> {
        let mut counts: HashMap<FootprintId<O::Face>, usize> = HashMap::new();
        for face in self.faces() {
            *counts.entry(face.footprint()).or_default() += 1;
        }
        self.faces()
            .filter(|face| counts.get(&face.footprint()) == Some(&1))
            .collect()
    }

    pub fn boundary_size(&self) -> usize {
        self.boundary_cells().len()
    }

    /// Distinct vertices of all cells.
    pub fn vertices(&self, topology: &Topology) -> Result<BTreeSet<Simplex<Vertex>>, MeshError> {
        let mut out = BTreeSet::new();
        for cell in self.cells() {
            out.extend(topology.vertices(cell)?);
        }
        Ok(out)
    }
}

impl<O: Composite> InvalidateCache for Mesh<O> {
    #[inline]
    fn invalidate_cache(&mut self) {
        self.boundary.take();
    }
}

impl<O: Composite> DebugInvariants for Mesh<O> {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "Mesh");
    }

    fn validate_invariants(&self) -> Result<(), MeshError> {
        self.cells.validate_invariants()?;
        let members: usize = self.members.values().map(Vec::len).sum();
        crate::ensure_invariant!(
            members == self.cells.len(),
            "{members} member entries for {} cells",
            self.cells.len()
        );
        for (cell, ids) in &self.members {
            for &id in ids {
                crate::ensure_invariant!(
                    self.get(id) == Some(*cell),
                    "member {cell:?} points at {id} holding {:?}",
                    self.get(id)
                );
            }
        }
        let mut recount: HashMap<FootprintId<O::Face>, [u32; 2]> = HashMap::new();
        for face in self.faces() {
            recount.entry(face.footprint()).or_default()[face.orientation().index()] += 1;
        }
        crate::ensure_invariant!(
            recount == self.face_uses,
            "incremental face counters diverged from the cells"
        );
        Ok(())
    }
}
