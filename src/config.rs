//! Construction parameters for topology registries and meshes.
//!
//! The configuration is plain data so it can be loaded from any serde
//! format; missing fields fall back to [`TopologyConfig::default`].

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::mesh_error::MeshError;

/// Slots per arena segment used when no configuration is given.
pub const DEFAULT_SEGMENT_SIZE: usize = 100;

pub(crate) const DEFAULT_SEGMENT: NonZeroUsize = match NonZeroUsize::new(DEFAULT_SEGMENT_SIZE) {
    Some(n) => n,
    None => panic!("default segment size must be positive"),
};

/// Sizing knobs for the arenas behind a [`Topology`](crate::topology::Topology)
/// and its meshes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
    /// Slots per segment in each per-dimension footprint arena.
    pub segment_size: usize,
    /// Slots per segment in a mesh's cell arena.
    pub mesh_segment_size: usize,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            segment_size: DEFAULT_SEGMENT_SIZE,
            mesh_segment_size: DEFAULT_SEGMENT_SIZE,
        }
    }
}

impl TopologyConfig {
    /// Configuration with the same segment size for footprints and cells.
    pub fn with_segment_size(segment_size: usize) -> Self {
        Self {
            segment_size,
            mesh_segment_size: segment_size,
        }
    }

    /// Reject sizes an arena cannot be built with.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.segment_size == 0 || self.mesh_segment_size == 0 {
            return Err(MeshError::InvalidSegmentSize);
        }
        Ok(())
    }
}
