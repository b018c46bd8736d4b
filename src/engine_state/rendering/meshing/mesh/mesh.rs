//! Mesh data structures for chunk rendering.
//!
//! A `ChunkMesh` is immutable once built. Rebuilding a chunk produces a new
//! `ChunkMesh` which replaces the old one in the mesh store as a whole, so the
//! render step never sees a half-built mesh. The only mutable part is the
//! `bound` flag, which the render step flips after uploading.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::engine_state::rendering::meshing::block_geometry::AtlasRect;
use crate::engine_state::rendering::Vertex;
use crate::engine_state::voxels::chunk::ChunkPosition;

use super::face::Face;

/// The vertices and indices of one render pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshPass {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshPass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one textured quad.
    pub fn push_face(&mut self, face: &Face, texture: AtlasRect) {
        let base = self.vertices.len() as u32;
        let normal = face.side.normal();
        let uvs = [
            [texture.u0, texture.v1],
            [texture.u1, texture.v1],
            [texture.u0, texture.v0],
            [texture.u1, texture.v0],
        ];

        for (corner, uv) in face.corners().into_iter().zip(uvs) {
            self.vertices.push(Vertex::new(corner, uv, normal));
        }
        self.indices.extend(Face::INDICES.iter().map(|i| base + i));
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn quad_count(&self) -> usize {
        self.indices.len() / Face::INDICES.len()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }
}

/// The renderable geometry of one chunk.
#[derive(Debug)]
pub struct ChunkMesh {
    pub position: ChunkPosition,
    /// Opaque solids.
    pub opaque: MeshPass,
    /// Liquids and see-through solids, drawn after the opaque pass.
    pub transparent: MeshPass,
    /// Revision of the chunk column this mesh was built from.
    pub source_revision: u64,
    /// Which neighbors had data at build time, in `BlockSide::horizontal()` order.
    pub neighbors_present: [bool; 4],
    bound: AtomicBool,
}

impl ChunkMesh {
    pub fn new(
        position: ChunkPosition,
        opaque: MeshPass,
        transparent: MeshPass,
        source_revision: u64,
        neighbors_present: [bool; 4],
    ) -> Self {
        ChunkMesh {
            position,
            opaque,
            transparent,
            source_revision,
            neighbors_present,
            bound: AtomicBool::new(false),
        }
    }

    /// Whether the renderer has uploaded this mesh.
    pub fn is_bound(&self) -> bool {
        self.bound.load(Ordering::Acquire)
    }

    pub fn mark_bound(&self) {
        self.bound.store(true, Ordering::Release);
    }

    /// Whether the chunk changed, or a neighbor appeared or vanished, since this mesh was built.
    ///
    /// Edits inside a neighbor are not tracked here: boundary edits requeue
    /// the neighbors directly.
    pub fn is_stale(&self, source_revision: Option<u64>, neighbors_present: [bool; 4]) -> bool {
        source_revision != Some(self.source_revision) || neighbors_present != self.neighbors_present
    }

    pub fn quad_count(&self) -> usize {
        self.opaque.quad_count() + self.transparent.quad_count()
    }
}
