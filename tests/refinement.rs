mod util;
use simplex_mesh::prelude::*;
use util::*;

fn single_triangle(topology: &mut Topology) -> ([Simplex<Vertex>; 3], Mesh<Triangle>) {
    let v = vertices::<3>(topology);
    let cell = topology.triangle_from_vertices(v).unwrap();
    let mut mesh = Mesh::new();
    mesh.insert(topology, cell).unwrap();
    (v, mesh)
}

#[test]
fn one_level_splits_a_triangle_into_four() {
    let mut topo = Topology::new();
    let (v, mesh) = single_triangle(&mut topo);
    let fine = subdivide_triangles(&mesh, &mut topo, 1).unwrap();
    assert_eq!(fine.n_cells(), 4);
    assert_eq!(fine.boundary_size(), 6);
    assert_eq!(fine.vertices(&topo).unwrap().len(), 6);
    for corner in v {
        assert!(fine.vertices(&topo).unwrap().contains(&corner));
    }
    // the coarse mesh is untouched
    assert_eq!(mesh.n_cells(), 1);
    assert_eq!(mesh.boundary_size(), 3);
    fine.validate_invariants().unwrap();
    topo.validate_invariants().unwrap();
}

#[test]
fn two_levels_split_a_triangle_into_sixteen() {
    let mut topo = Topology::new();
    let (_, mesh) = single_triangle(&mut topo);
    let fine = subdivide_triangles(&mesh, &mut topo, 2).unwrap();
    assert_eq!(fine.n_cells(), 16);
    assert_eq!(fine.boundary_size(), 12);
    assert_eq!(fine.vertices(&topo).unwrap().len(), 15);
    // coarse triangle plus the sixteen children
    assert_eq!(topo.n_simplices::<Triangle>(), 17);
    // 3 coarse edges, 30 fine ones
    assert_eq!(topo.n_simplices::<Segment>(), 33);
    topo.validate_invariants().unwrap();
}

#[test]
fn refined_cells_are_consistently_oriented() {
    let mut topo = Topology::new();
    let (_, mesh) = single_triangle(&mut topo);
    let fine = subdivide_triangles(&mesh, &mut topo, 2).unwrap();
    // every interior edge is traversed once in each direction
    for face in fine.faces() {
        if !fine.is_on_boundary(face) {
            let twins = fine.faces().filter(|&f| f == face.flip()).count();
            assert_eq!(twins, 1, "{face:?}");
        }
    }
}

#[test]
fn refining_the_square_keeps_it_conforming() {
    let Square {
        mut topology,
        mesh,
        ..
    } = square();
    let fine = subdivide_triangles(&mesh, &mut topology, 1).unwrap();
    assert_eq!(fine.n_cells(), 16);
    assert_eq!(fine.boundary_size(), 8);
    // 5 corners plus one midpoint per coarse edge
    assert_eq!(fine.vertices(&topology).unwrap().len(), 13);
    let recount = fine.recompute_boundary_cells();
    assert_eq!(fine.boundary_cells(), recount.as_slice());
}

#[test]
fn releasing_the_refined_mesh_restores_the_topology() {
    let mut topo = Topology::new();
    let (_, mesh) = single_triangle(&mut topo);
    let before = (
        topo.n_simplices::<Vertex>(),
        topo.n_simplices::<Segment>(),
        topo.n_simplices::<Triangle>(),
    );
    let mut fine = subdivide_triangles(&mesh, &mut topo, 2).unwrap();
    fine.clear(&mut topo).unwrap();
    let after = (
        topo.n_simplices::<Vertex>(),
        topo.n_simplices::<Segment>(),
        topo.n_simplices::<Triangle>(),
    );
    assert_eq!(before, after);
    topo.validate_invariants().unwrap();
}

#[test]
fn one_level_splits_a_tetrahedron_into_eight() {
    let mut topo = Topology::new();
    let v = vertices::<4>(&mut topo);
    let cell = topo.tetrahedron_from_vertices(v).unwrap();
    let mut mesh = Mesh::new();
    mesh.insert(&topo, cell).unwrap();

    let fine = subdivide_tetrahedra(&mesh, &mut topo, 1).unwrap();
    assert_eq!(fine.n_cells(), 8);
    assert_eq!(fine.boundary_size(), 16);
    assert_eq!(fine.vertices(&topo).unwrap().len(), 10);
    for child in fine.cells() {
        assert!(topo.sanity_check(child));
    }

    let surface = fine.boundary(&mut topo).unwrap();
    assert_eq!(surface.n_cells(), 16);
    // a closed surface has no boundary of its own
    assert!(surface.boundary_cells().is_empty());

    let mut fine = fine;
    fine.clear(&mut topo).unwrap();
    let mut surface = surface;
    surface.clear(&mut topo).unwrap();
    assert_eq!(topo.n_simplices::<Tetrahedron>(), 1);
    assert_eq!(topo.n_simplices::<Vertex>(), 4);
    topo.validate_invariants().unwrap();
}
