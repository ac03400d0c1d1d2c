mod util;
use simplex_mesh::prelude::*;
use util::*;

#[test]
fn use_counts_follow_cells_riding_on_segments() {
    let mut topo = Topology::new();
    let [v0, v1, v2, v3] = vertices::<4>(&mut topo);

    let segment0 = topo.segment([v0, v1]).unwrap();
    assert!(!topo.exists_flipped(segment0));
    assert_eq!(topo.incidence(segment0), 1);

    let segment1 = topo.segment([v1, v3]).unwrap();
    let segment1m = topo.flip(segment1);
    // flipping a handle does not use the flipped orientation yet
    assert!(!topo.exists_flipped(segment1));
    assert_eq!(topo.incidence(segment1m), 1);

    let segment2 = topo.segment([v3, v0]).unwrap();
    let segment3 = topo.segment([v1, v2]).unwrap();
    let segment4 = topo.segment([v2, v3]).unwrap();

    let cell0 = topo.triangle([segment0, segment1, segment2]).unwrap();
    assert_eq!(topo.incidence(segment0), 2);
    assert_eq!(topo.incidence(segment1), 2);
    assert_eq!(topo.incidence(segment2), 2);
    assert!(!topo.exists_flipped(cell0));
    assert_eq!(topo.incidence(cell0), 1);

    let cell1 = topo.triangle([segment3, segment4, segment1m]).unwrap();
    assert_eq!(topo.incidence(segment3), 2);
    assert_eq!(topo.incidence(segment4), 2);
    assert_eq!(topo.uses(segment1m), 1);
    assert_eq!(topo.uses(segment1), 2);
    assert!(topo.exists_flipped(segment1));
    assert!(topo.exists_flipped(segment1m));
    assert!(!topo.exists_flipped(cell1));

    for cell in [cell0, cell1] {
        assert!(topo.sanity_check(cell), "failed sanity check for {cell:?}");
    }
    topo.validate_invariants().unwrap();
}

#[test]
fn triangle_is_interned_up_to_rotation() {
    let mut topo = Topology::new();
    let [v0, v1, v2] = vertices::<3>(&mut topo);
    let a = topo.segment([v0, v1]).unwrap();
    let b = topo.segment([v1, v2]).unwrap();
    let c = topo.segment([v2, v0]).unwrap();

    let cell0 = topo.triangle([a, b, c]).unwrap();
    let cell1 = topo.triangle([b, c, a]).unwrap();
    assert_eq!(cell0, cell1);

    // the flipped edges traversed backwards bound the flipped triangle
    let cell2 = topo.triangle([a.flip(), c.flip(), b.flip()]).unwrap();
    assert_ne!(cell0, cell2);
    assert_eq!(cell0.footprint(), cell2.footprint());
    assert_eq!(topo.flip(cell0), cell2);

    assert_eq!(topo.n_simplices::<Triangle>(), 1);
    assert_eq!(topo.incidence(cell0), 3);
    assert_eq!(topo.uses(cell0), 2);
    topo.validate_invariants().unwrap();
}

#[test]
fn repeated_make_adds_holds_to_one_footprint() {
    let mut topo = Topology::new();
    let [a, b] = vertices::<2>(&mut topo);
    let first = topo.segment([a, b]).unwrap();
    for k in 2..6 {
        let again = topo.segment([a, b]).unwrap();
        assert_eq!(again, first);
        assert_eq!(topo.incidence(first), k);
    }
    assert_eq!(topo.n_simplices::<Segment>(), 1);
}

#[test]
fn triangle_construction_and_erase_balance_edge_counts() {
    let mut topo = Topology::new();
    let [v0, v1, v2] = vertices::<3>(&mut topo);
    let edges = [
        topo.segment([v0, v1]).unwrap(),
        topo.segment([v1, v2]).unwrap(),
        topo.segment([v2, v0]).unwrap(),
    ];
    let cell = topo.triangle(edges).unwrap();
    for e in edges {
        assert_eq!(topo.incidence(e), 2);
    }
    assert_eq!(topo.erase(cell).unwrap(), 1);
    for e in edges {
        assert_eq!(topo.incidence(e), 1);
    }
    assert_eq!(topo.erase(edges[0]).unwrap(), 1);
    assert!(!topo.exists::<Segment>(&[v0, v1]));
    assert!(topo.exists::<Segment>(&[v1, v2]));
}

#[test]
fn lookup_never_creates() {
    let mut topo = Topology::new();
    let [a, b, c] = vertices::<3>(&mut topo);
    assert!(topo.lookup::<Segment>(&[a, b]).is_none());
    assert!(!topo.exists::<Segment>(&[a, b]));
    assert_eq!(topo.n_simplices::<Segment>(), 0);

    let ab = topo.segment([a, b]).unwrap();
    assert_eq!(topo.lookup::<Segment>(&[b, a]), Some(ab.flip()));
    assert!(topo.exists::<Segment>(&[a, b]));
    assert!(!topo.exists::<Segment>(&[b, a]));
    assert!(topo.lookup::<Segment>(&[a, c]).is_none());
}

#[test]
fn composition_and_vertices_follow_orientation() {
    let mut topo = Topology::new();
    let [v0, v1, v2] = vertices::<3>(&mut topo);
    let cell = topo.triangle_from_vertices([v0, v1, v2]).unwrap();

    assert_eq!(topo.vertices(cell).unwrap(), vec![v0, v1, v2]);
    assert_eq!(topo.vertices(cell.flip()).unwrap(), vec![v0, v2, v1]);

    let edges = topo.composition(cell).unwrap();
    for pair in [(0, 1), (1, 2), (2, 0)] {
        assert!(topo.head_tail_connected(edges[pair.0], edges[pair.1]).unwrap());
    }
    let flipped = topo.composition(cell.flip()).unwrap();
    assert_eq!(flipped, vec![edges[2].flip(), edges[1].flip(), edges[0].flip()]);

    let set = topo.vertex_set(cell).unwrap();
    assert_eq!(set.len(), 3);
    assert_permutation(&set.into_iter().collect::<Vec<_>>(), &[v0, v1, v2]);
}

#[test]
fn tetrahedron_from_faces_requires_a_closed_surface() {
    let mut topo = Topology::new();
    let [v0, v1, v2, v3] = vertices::<4>(&mut topo);
    let f0 = topo.triangle_from_vertices([v1, v2, v3]).unwrap();
    let f1 = topo.triangle_from_vertices([v0, v3, v2]).unwrap();
    let f2 = topo.triangle_from_vertices([v0, v1, v3]).unwrap();
    let f3 = topo.triangle_from_vertices([v0, v2, v1]).unwrap();

    let err = topo.tetrahedron([f0, f1, f2, f3.flip()]).unwrap_err();
    assert!(matches!(err, MeshError::InvalidComposition { order: "Tetrahedron", .. }));

    let tet = topo.tetrahedron([f0, f1, f2, f3]).unwrap();
    let same = topo.tetrahedron([f2, f0, f3, f1]).unwrap();
    assert_eq!(tet, same);
    let flipped = topo
        .tetrahedron([f0.flip(), f1.flip(), f2.flip(), f3.flip()])
        .unwrap();
    assert_eq!(flipped, tet.flip());
    assert!(topo.sanity_check(tet));
    assert_eq!(topo.vertex_set(tet).unwrap().len(), 4);
    topo.validate_invariants().unwrap();
}

#[test]
fn repeated_vertices_are_rejected() {
    let mut topo = Topology::new();
    let [a, b] = vertices::<2>(&mut topo);
    let err = topo.triangle_from_vertices([a, b, a]).unwrap_err();
    assert!(matches!(err, MeshError::InvalidComposition { order: "Triangle", .. }));
    assert_eq!(topo.n_simplices::<Segment>(), 0);
}

#[test]
fn simplices_iterate_live_footprints() {
    let mut topo = Topology::new();
    let v = vertices::<4>(&mut topo);
    let t0 = topo.triangle_from_vertices([v[0], v[1], v[2]]).unwrap();
    let t1 = topo.triangle_from_vertices([v[0], v[2], v[3]]).unwrap();
    assert_eq!(topo.simplices::<Segment>().count(), 5);
    let triangles: Vec<_> = topo.simplices::<Triangle>().map(|t| t.footprint()).collect();
    assert_eq!(triangles, vec![t0.footprint(), t1.footprint()]);
    assert!(topo.simplices::<Tetrahedron>().next().is_none());
}

#[test]
fn configured_registry_behaves_like_default() {
    let cfg: TopologyConfig = serde_json::from_str(r#"{ "segment_size": 3 }"#).unwrap();
    let mut topo = Topology::with_config(cfg.clone()).unwrap();
    assert_eq!(topo.config(), &cfg);
    let v = vertices::<6>(&mut topo);
    for w in v.windows(3) {
        topo.triangle_from_vertices([w[0], w[1], w[2]]).unwrap();
    }
    assert_eq!(topo.n_simplices::<Triangle>(), 4);
    topo.validate_invariants().unwrap();
}
