//! The topology registry: interning, reference counting and cascading
//! destruction of oriented simplices of dimension 0..=3.
//!
//! A [`Topology`] owns one [`SimplexFactory`] per dimension. Handles returned
//! by the constructors are *holds*: every constructor call must eventually be
//! balanced by one [`Topology::erase`] of a handle with the same orientation.
//! When the last use of a footprint goes away it is destroyed, and the
//! release propagates to its faces with an explicit worklist.
//!
//! # Canonical form
//! Vertex identity is ordered by arena key. A composition induces a vertex
//! order (segment: tail, head; triangle: the tails of its edges chained
//! head→tail; tetrahedron: the vertex opposite face 0 followed by the cycle
//! of face 0). The orientation of a request is the parity of that order
//! against ascending keys. A footprint keeps the traversal it was first
//! built from together with that traversal's parity, and holds one use on
//! each of those faces in the orientation they were given.

use std::collections::BTreeSet;
use std::num::NonZeroUsize;

use hashbrown::HashMap;
use itertools::Itertools;

use super::factory::{SimplexFactory, representative};
use super::footprint::{Footprint, chain_head_to_tail};
use super::orientation::{Orientation, permutation_parity};
use super::order::{Composite, MAX_DIM, Order, Segment, Tetrahedron, Triangle, Vertex};
use super::simplex::{Face, FootprintId, Simplex};
use crate::arena::SlotKey;
use crate::config::{DEFAULT_SEGMENT, TopologyConfig};
use crate::debug_invariants::{DebugInvariants, inv_assert};
use crate::mesh_error::MeshError;

/// Registry of every live simplex, one interning factory per dimension.
#[derive(Debug)]
pub struct Topology {
    factories: [SimplexFactory; MAX_DIM + 1],
    config: TopologyConfig,
}

impl Default for Topology {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn stale<O: Order>(s: Simplex<O>) -> MeshError {
    MeshError::StaleSimplex {
        order: O::NAME,
        index: s.footprint().index(),
    }
}

fn invalid<O: Order>(reason: String) -> MeshError {
    MeshError::InvalidComposition {
        order: O::NAME,
        reason,
    }
}

impl Topology {
    /// Empty registry with the default segment size.
    pub fn new() -> Self {
        Self::with_segment(DEFAULT_SEGMENT, TopologyConfig::default())
    }

    /// Empty registry sized by `config`.
    pub fn with_config(config: TopologyConfig) -> Result<Self, MeshError> {
        config.validate()?;
        let segment =
            NonZeroUsize::new(config.segment_size).ok_or(MeshError::InvalidSegmentSize)?;
        Ok(Self::with_segment(segment, config))
    }

    fn with_segment(segment: NonZeroUsize, config: TopologyConfig) -> Self {
        log::debug!(
            "creating topology registry (segment size {})",
            segment.get()
        );
        Self {
            factories: std::array::from_fn(|dim| SimplexFactory::new(dim, segment)),
            config,
        }
    }

    pub fn config(&self) -> &TopologyConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // construction
    // ------------------------------------------------------------------

    /// A fresh vertex, held once by the caller.
    pub fn vertex(&mut self) -> Simplex<Vertex> {
        let key = self.factories[Vertex::DIM].create(Vec::new(), Orientation::Positive);
        self.acquire(Vertex::DIM, Face {
            key,
            orientation: Orientation::Positive,
        });
        Simplex::new(FootprintId::new(key), Orientation::Positive)
    }

    /// The segment `tail → head`.
    pub fn segment(
        &mut self,
        vertices: [Simplex<Vertex>; 2],
    ) -> Result<Simplex<Segment>, MeshError> {
        self.simplex::<Segment>(&vertices)
    }

    /// The triangle bounded by three edges that chain head to tail, in any
    /// rotation or order.
    pub fn triangle(
        &mut self,
        edges: [Simplex<Segment>; 3],
    ) -> Result<Simplex<Triangle>, MeshError> {
        self.simplex::<Triangle>(&edges)
    }

    /// The tetrahedron bounded by four consistently oriented triangles.
    pub fn tetrahedron(
        &mut self,
        faces: [Simplex<Triangle>; 4],
    ) -> Result<Simplex<Tetrahedron>, MeshError> {
        self.simplex::<Tetrahedron>(&faces)
    }

    /// Intern the simplex bounded by `composition` and take one hold on it.
    ///
    /// If the footprint already exists only the hold is added; otherwise it
    /// is created and each face gains one use in the orientation it appears
    /// with.
    pub fn simplex<O: Composite>(
        &mut self,
        composition: &[Simplex<O::Face>],
    ) -> Result<Simplex<O>, MeshError> {
        for &face in composition {
            self.live(face)?;
        }
        let request: Vec<Face> = composition.iter().map(|&f| f.into()).collect();
        let (orientation, ordered) =
            self.canonicalize(O::DIM, &request).map_err(invalid::<O>)?;
        let key = match self.factories[O::DIM].find(&representative(&ordered)) {
            Some(key) => key,
            None => {
                for &face in &ordered {
                    self.acquire(O::DIM - 1, face);
                }
                self.factories[O::DIM].create(ordered, orientation)
            }
        };
        self.acquire(O::DIM, Face { key, orientation });
        Ok(Simplex::new(FootprintId::new(key), orientation))
    }

    /// Triangle `a → b → c`, building its edges as needed. The edges end up
    /// owned by the triangle alone (plus whoever else already used them).
    pub fn triangle_from_vertices(
        &mut self,
        vertices: [Simplex<Vertex>; 3],
    ) -> Result<Simplex<Triangle>, MeshError> {
        self.check_distinct::<Triangle>(&vertices)?;
        let [a, b, c] = vertices;
        let edges = [
            self.segment([a, b])?,
            self.segment([b, c])?,
            self.segment([c, a])?,
        ];
        let cell = self.triangle(edges);
        for edge in edges {
            self.erase(edge)?;
        }
        cell
    }

    /// Tetrahedron with vertex order `v0, v1, v2, v3`, building its faces
    /// and edges as needed.
    pub fn tetrahedron_from_vertices(
        &mut self,
        vertices: [Simplex<Vertex>; 4],
    ) -> Result<Simplex<Tetrahedron>, MeshError> {
        self.check_distinct::<Tetrahedron>(&vertices)?;
        let [v0, v1, v2, v3] = vertices;
        let faces = [
            self.triangle_from_vertices([v1, v2, v3])?,
            self.triangle_from_vertices([v0, v3, v2])?,
            self.triangle_from_vertices([v0, v1, v3])?,
            self.triangle_from_vertices([v0, v2, v1])?,
        ];
        let cell = self.tetrahedron(faces);
        for face in faces {
            self.erase(face)?;
        }
        cell
    }

    fn check_distinct<O: Order>(&self, vertices: &[Simplex<Vertex>]) -> Result<(), MeshError> {
        for &v in vertices {
            self.live(v)?;
        }
        if !vertices.iter().map(|v| v.footprint()).all_unique() {
            return Err(invalid::<O>("repeated vertex".into()));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // holds
    // ------------------------------------------------------------------

    /// Take one more hold on an existing simplex.
    pub fn retain<O: Order>(&mut self, s: Simplex<O>) -> Result<(), MeshError> {
        let footprint = self.factories[O::DIM]
            .get_mut(s.footprint().key())
            .ok_or_else(|| stale(s))?;
        footprint.acquire(s.orientation());
        Ok(())
    }

    /// Release one hold on `s`. Returns how many footprints (of any
    /// dimension) were destroyed as a consequence.
    pub fn erase<O: Order>(&mut self, s: Simplex<O>) -> Result<usize, MeshError> {
        let root = s.footprint().key();
        let footprint = self.factories[O::DIM]
            .get_mut(root)
            .ok_or_else(|| stale(s))?;
        if !footprint.release(s.orientation()) {
            return Err(MeshError::OrientationNotHeld {
                order: O::NAME,
                index: s.footprint().index(),
                orientation: s.orientation(),
            });
        }
        if footprint.incidence() > 0 {
            return Ok(0);
        }

        let mut destroyed = 0;
        let mut worklist = vec![(O::DIM, root)];
        while let Some((dim, key)) = worklist.pop() {
            let footprint = self.factories[dim].destroy(key);
            destroyed += 1;
            if dim == 0 {
                continue;
            }
            for face in footprint.composition {
                let Some(sub) = self.factories[dim - 1].get_mut(face.key) else {
                    inv_assert!(false, "{dim}-footprint {key} referenced a dead face");
                    continue;
                };
                if !sub.release(face.orientation) {
                    inv_assert!(false, "face {} had no {} use", face.key, face.orientation);
                }
                if sub.incidence() == 0 {
                    worklist.push((dim - 1, face.key));
                }
            }
        }
        log::debug!("erasing {s:?} destroyed {destroyed} footprint(s)");
        Ok(destroyed)
    }

    fn acquire(&mut self, dim: usize, face: Face) {
        match self.factories[dim].get_mut(face.key) {
            Some(footprint) => footprint.acquire(face.orientation),
            None => {
                inv_assert!(false, "acquiring dead {dim}-footprint {}", face.key);
            }
        }
    }

    // ------------------------------------------------------------------
    // queries
    // ------------------------------------------------------------------

    /// The oppositely oriented handle; never touches use counts.
    #[inline]
    pub fn flip<O: Order>(&self, s: Simplex<O>) -> Simplex<O> {
        s.flip()
    }

    /// Handle for the simplex bounded by `composition` if its footprint is
    /// live, oriented as requested. Creates nothing.
    pub fn lookup<O: Composite>(&self, composition: &[Simplex<O::Face>]) -> Option<Simplex<O>> {
        if !composition.iter().all(|&f| self.is_live(f)) {
            return None;
        }
        let request: Vec<Face> = composition.iter().map(|&f| f.into()).collect();
        let (orientation, ordered) = self.canonicalize(O::DIM, &request).ok()?;
        let key = self.factories[O::DIM].find(&representative(&ordered))?;
        Some(Simplex::new(FootprintId::new(key), orientation))
    }

    /// Whether the simplex bounded by `composition` is live *and* in use
    /// with the orientation the composition describes.
    pub fn exists<O: Composite>(&self, composition: &[Simplex<O::Face>]) -> bool {
        self.lookup::<O>(composition)
            .is_some_and(|s| self.uses(s) > 0)
    }

    /// Whether the opposite orientation of `s` is in use.
    pub fn exists_flipped<O: Order>(&self, s: Simplex<O>) -> bool {
        self.uses(s.flip()) > 0
    }

    #[inline]
    pub fn is_live<O: Order>(&self, s: Simplex<O>) -> bool {
        self.get(s).is_some()
    }

    /// Total uses of the footprint over both orientations; 0 when unknown.
    pub fn incidence<O: Order>(&self, s: Simplex<O>) -> usize {
        self.get(s).map_or(0, |fp| fp.incidence() as usize)
    }

    /// Uses of exactly the orientation of `s`; 0 when unknown.
    pub fn uses<O: Order>(&self, s: Simplex<O>) -> usize {
        self.get(s).map_or(0, |fp| fp.uses(s.orientation()) as usize)
    }

    /// Number of live footprints of dimension `O`.
    pub fn n_simplices<O: Order>(&self) -> usize {
        self.factories[O::DIM].len()
    }

    /// Positive handles of every live footprint of dimension `O`, in arena
    /// slot order.
    pub fn simplices<O: Order>(&self) -> impl Iterator<Item = Simplex<O>> + '_ {
        self.factories[O::DIM]
            .footprints()
            .keys()
            .map(|key| Simplex::new(FootprintId::new(key), Orientation::Positive))
    }

    /// Faces of `s` in traversal order. The opposite handle sees them
    /// reversed, and flipped from triangles up.
    pub fn composition<O: Composite>(
        &self,
        s: Simplex<O>,
    ) -> Result<Vec<Simplex<O::Face>>, MeshError> {
        let footprint = self.live(s)?;
        Ok(footprint
            .oriented(O::DIM, s.orientation())
            .into_iter()
            .map(Simplex::from)
            .collect())
    }

    /// Vertices of `s` in the order its orientation induces; flipping `s`
    /// yields an odd permutation of this list.
    pub fn vertices<O: Order>(&self, s: Simplex<O>) -> Result<Vec<Simplex<Vertex>>, MeshError> {
        self.live(s)?;
        let keys = self
            .vertex_keys(O::DIM, s.into())
            .ok_or_else(|| stale(s))?;
        Ok(keys
            .into_iter()
            .map(|key| Simplex::new(FootprintId::new(key), Orientation::Positive))
            .collect())
    }

    /// Distinct vertices of `s`.
    pub fn vertex_set<O: Order>(
        &self,
        s: Simplex<O>,
    ) -> Result<BTreeSet<Simplex<Vertex>>, MeshError> {
        Ok(self.vertices(s)?.into_iter().collect())
    }

    /// Oriented edges of `s`. A tetrahedron reports each of its six edges in
    /// both orientations, once per adjacent face.
    pub fn edges<O: Order>(&self, s: Simplex<O>) -> Result<BTreeSet<Simplex<Segment>>, MeshError> {
        self.live(s)?;
        let mut out = BTreeSet::new();
        let mut stack: Vec<(usize, Face)> = vec![(O::DIM, s.into())];
        while let Some((dim, face)) = stack.pop() {
            match dim {
                0 => {}
                1 => {
                    out.insert(Simplex::from(face));
                }
                _ => {
                    let composition = self
                        .oriented_composition(dim, face)
                        .ok_or_else(|| stale(s))?;
                    stack.extend(composition.into_iter().map(|f| (dim - 1, f)));
                }
            }
        }
        Ok(out)
    }

    /// First vertex of an oriented segment.
    pub fn tail(&self, edge: Simplex<Segment>) -> Result<Simplex<Vertex>, MeshError> {
        Ok(self.composition(edge)?[0])
    }

    /// Last vertex of an oriented segment.
    pub fn head(&self, edge: Simplex<Segment>) -> Result<Simplex<Vertex>, MeshError> {
        Ok(self.composition(edge)?[1])
    }

    /// Whether `a` ends where `b` starts.
    pub fn head_tail_connected(
        &self,
        a: Simplex<Segment>,
        b: Simplex<Segment>,
    ) -> Result<bool, MeshError> {
        Ok(self.head(a)?.footprint() == self.tail(b)?.footprint())
    }

    /// A D-simplex is sane when it is live and has D + 1 distinct vertices.
    pub fn sanity_check<O: Order>(&self, s: Simplex<O>) -> bool {
        self.vertices(s)
            .is_ok_and(|v| v.len() == O::N_VERTICES && v.iter().all_unique())
    }

    // ------------------------------------------------------------------
    // internals
    // ------------------------------------------------------------------

    #[inline]
    fn get<O: Order>(&self, s: Simplex<O>) -> Option<&Footprint> {
        self.factories[O::DIM].get(s.footprint().key())
    }

    #[inline]
    fn live<O: Order>(&self, s: Simplex<O>) -> Result<&Footprint, MeshError> {
        self.get(s).ok_or_else(|| stale(s))
    }

    fn oriented_composition(&self, dim: usize, face: Face) -> Option<Vec<Face>> {
        self.factories[dim]
            .get(face.key)
            .map(|fp| fp.oriented(dim, face.orientation))
    }

    fn vertex_keys(&self, dim: usize, face: Face) -> Option<Vec<SlotKey>> {
        if dim == 0 {
            return self.factories[0].get(face.key).map(|_| vec![face.key]);
        }
        let composition = self.oriented_composition(dim, face)?;
        self.vertex_order(dim, &composition)
    }

    /// Vertex order induced by a composition (see module docs).
    fn vertex_order(&self, dim: usize, composition: &[Face]) -> Option<Vec<SlotKey>> {
        match dim {
            0 => None,
            1 => Some(composition.iter().map(|f| f.key).collect()),
            2 => composition
                .iter()
                .map(|&edge| self.vertex_keys(1, edge).map(|v| v[0]))
                .collect(),
            _ => {
                let (first, rest) = composition.split_first()?;
                let base = self.vertex_keys(dim - 1, *first)?;
                let mut apex = None;
                for &face in rest {
                    let vertices = self.vertex_keys(dim - 1, face)?;
                    apex = apex.or_else(|| vertices.into_iter().find(|v| !base.contains(v)));
                }
                let mut order = Vec::with_capacity(dim + 1);
                order.push(apex?);
                order.extend(base);
                Some(order)
            }
        }
    }

    /// Validate a requested composition and return its orientation together
    /// with its faces in traversal order.
    fn canonicalize(
        &self,
        dim: usize,
        request: &[Face],
    ) -> Result<(Orientation, Vec<Face>), String> {
        if request.len() != dim + 1 {
            return Err(format!("expected {} faces, got {}", dim + 1, request.len()));
        }
        if !request.iter().map(|f| f.key).all_unique() {
            return Err("repeated face".into());
        }
        let ordered: Vec<Face> = match dim {
            1 => request
                .iter()
                .map(|f| Face {
                    key: f.key,
                    orientation: Orientation::Positive,
                })
                .collect(),
            2 => {
                let ends = request
                    .iter()
                    .map(|&edge| self.vertex_keys(1, edge).map(|v| (v[0], v[1])))
                    .collect::<Option<Vec<_>>>()
                    .ok_or("edge is not live")?;
                let order = chain_head_to_tail(&ends)
                    .ok_or("edges do not chain head to tail into a closed cycle")?;
                order.into_iter().map(|i| request[i]).collect()
            }
            3 => {
                self.check_closed_surface(request)?;
                request.to_vec()
            }
            _ => return Err(format!("dimension {dim} is not supported")),
        };
        let vertices = self
            .vertex_order(dim, &ordered)
            .ok_or("composition does not span a simplex")?;
        let orientation = permutation_parity(&vertices).ok_or("repeated vertex")?;
        Ok((orientation, ordered))
    }

    /// Four triangles bound a tetrahedron when they span six edges and every
    /// edge is used once in each direction.
    fn check_closed_surface(&self, faces: &[Face]) -> Result<(), String> {
        let mut net: HashMap<SlotKey, i32> = HashMap::new();
        for &face in faces {
            let edges = self.oriented_composition(2, face).ok_or("face is not live")?;
            for edge in edges {
                *net.entry(edge.key).or_insert(0) += edge.orientation.sign();
            }
        }
        if net.len() != 6 {
            return Err(format!("faces span {} edges instead of 6", net.len()));
        }
        if net.values().any(|&n| n != 0) {
            return Err("faces are not consistently oriented".into());
        }
        Ok(())
    }
}

impl DebugInvariants for Topology {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "Topology");
    }

    fn validate_invariants(&self) -> Result<(), MeshError> {
        for (dim, factory) in self.factories.iter().enumerate() {
            factory.footprints().validate_invariants()?;
            crate::ensure_invariant!(factory.dim() == dim, "factory {dim} misplaced");
            if dim > 0 {
                crate::ensure_invariant!(
                    factory.representatives().len() == factory.len(),
                    "{dim}: {} representatives for {} footprints",
                    factory.representatives().len(),
                    factory.len()
                );
            }

            let mut referenced: HashMap<SlotKey, [u32; 2]> = HashMap::new();
            if dim < MAX_DIM {
                for (_, upper) in self.factories[dim + 1].footprints() {
                    for face in &upper.composition {
                        referenced.entry(face.key).or_default()[face.orientation.index()] += 1;
                    }
                }
            }

            for (key, fp) in factory.footprints() {
                crate::ensure_invariant!(
                    fp.incidence() > 0,
                    "{dim}-footprint {key} is live without uses"
                );
                let arity = if dim == 0 { 0 } else { dim + 1 };
                crate::ensure_invariant!(
                    fp.composition.len() == arity,
                    "{dim}-footprint {key} has {} faces",
                    fp.composition.len()
                );
                if dim > 0 {
                    crate::ensure_invariant!(
                        factory.find(&representative(&fp.composition)) == Some(key),
                        "{dim}-footprint {key} is not interned under its representative"
                    );
                    for face in &fp.composition {
                        crate::ensure_invariant!(
                            self.factories[dim - 1].get(face.key).is_some(),
                            "{dim}-footprint {key} references dead face {}",
                            face.key
                        );
                    }
                    let parity = self
                        .vertex_order(dim, &fp.composition)
                        .and_then(|order| permutation_parity(&order));
                    crate::ensure_invariant!(
                        parity == Some(fp.orientation),
                        "{dim}-footprint {key} records the wrong parity"
                    );
                }
                let refs = referenced.get(&key).copied().unwrap_or_default();
                for o in Orientation::ALL {
                    crate::ensure_invariant!(
                        fp.uses(o) >= refs[o.index()],
                        "{dim}-footprint {key}: {} {o} uses but {} references",
                        fp.uses(o),
                        refs[o.index()]
                    );
                }
            }
        }
        Ok(())
    }
}
