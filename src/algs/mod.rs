//! Re-export public algorithms.

pub mod flip_diagonal;

pub use flip_diagonal::{
    find_shared_simplex, flip_diagonal, flip_diagonal_in_mesh, opposite_vertices,
};
