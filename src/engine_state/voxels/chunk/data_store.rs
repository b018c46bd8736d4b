//! # Chunk Data Store
//!
//! The single owner of every resident `ChunkData`. One `RwLock` guards the whole
//! map; every operation takes it once, does one map operation and releases it,
//! so inserts, edits and erasures are atomic with respect to each other.
//!
//! Callers never get a reference that outlives the lock. Reads either copy out
//! what they need (`get`, `mesh_input`, `block_at`) or run a short closure under
//! the guard (`with_chunk`, `update_chunk`).
//!
//! ## Revisions
//!
//! Each insert and each successful edit stamps the column with a fresh value
//! from a monotonic counter. A mesh remembers the revision it was built from and
//! which neighbors were present, which is how the mesh refill loop spots stale
//! geometry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::core::MtResource;
use crate::engine_state::voxels::block::{BlockSide, BlockType};

use super::{ChunkData, ChunkPosition, NeighborEdges};

/// Everything the mesh builder needs for one chunk, copied out under one lock.
#[derive(Clone, Debug)]
pub struct MeshInput {
    pub data: ChunkData,
    pub neighbors: NeighborEdges,
}

impl MeshInput {
    /// Which neighbors had data, in `BlockSide::horizontal()` order.
    pub fn neighbors_present(&self) -> [bool; 4] {
        std::array::from_fn(|slot| self.neighbors.edges[slot].is_some())
    }
}

/// Concurrent map from chunk position to voxel column.
#[derive(Clone, Default)]
pub struct ChunkDataStore {
    chunks: MtResource<HashMap<ChunkPosition, ChunkData>>,
    revision_counter: Arc<AtomicU64>,
}

impl ChunkDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_revision(&self) -> u64 {
        self.revision_counter.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Returns a copy of the column at `position`.
    pub fn get(&self, position: ChunkPosition) -> Option<ChunkData> {
        self.chunks.get().get(&position).cloned()
    }

    pub fn contains(&self, position: ChunkPosition) -> bool {
        self.chunks.get().contains_key(&position)
    }

    /// Runs `f` on the column under the read lock.
    pub fn with_chunk<R>(&self, position: ChunkPosition, f: impl FnOnce(&ChunkData) -> R) -> Option<R> {
        self.chunks.get().get(&position).map(f)
    }

    /// Inserts a column, replacing any previous one, and stamps its revision.
    pub fn insert(&self, mut data: ChunkData) -> u64 {
        let revision = self.next_revision();
        data.set_revision(revision);
        self.chunks.get_mut().insert(data.position, data);
        revision
    }

    /// Writes one block. Returns `false` if the chunk is not resident.
    ///
    /// The write and the revision bump happen under the same guard.
    pub fn set_block(&self, position: ChunkPosition, index: usize, block: BlockType) -> bool {
        self.update_chunk(position, |data| data.set_index(index, block))
            .is_some()
    }

    /// Runs `f` on the column under the write lock and bumps its revision.
    ///
    /// Returns `None` without calling `f` if the chunk is not resident.
    pub fn update_chunk<R>(
        &self,
        position: ChunkPosition,
        f: impl FnOnce(&mut ChunkData) -> R,
    ) -> Option<R> {
        let mut chunks = self.chunks.get_mut();
        let data = chunks.get_mut(&position)?;
        let result = f(data);
        data.set_revision(self.next_revision());
        Some(result)
    }

    pub fn remove(&self, position: ChunkPosition) -> Option<ChunkData> {
        self.chunks.get_mut().remove(&position)
    }

    /// Reads one block. Absent chunks read as `None`.
    pub fn block_at(&self, position: ChunkPosition, index: usize) -> Option<BlockType> {
        self.with_chunk(position, |data| data.get_index(index))
    }

    pub fn revision(&self, position: ChunkPosition) -> Option<u64> {
        self.with_chunk(position, ChunkData::revision)
    }

    /// The chunk's current revision and which of its four neighbors are resident.
    pub fn mesh_state(&self, position: ChunkPosition) -> (Option<u64>, [bool; 4]) {
        let chunks = self.chunks.get();
        let own = chunks.get(&position).map(ChunkData::revision);
        let present = position
            .neighbors()
            .map(|neighbor| chunks.contains_key(&neighbor));
        (own, present)
    }

    /// Copies out a column and the facing planes of its neighbors.
    ///
    /// Everything is read under a single guard, so the column and its edges are
    /// mutually consistent.
    pub fn mesh_input(&self, position: ChunkPosition) -> Option<MeshInput> {
        let chunks = self.chunks.get();
        let data = chunks.get(&position)?.clone();

        let mut neighbors = NeighborEdges::default();
        for (slot, side) in BlockSide::horizontal().into_iter().enumerate() {
            if let Some(neighbor) = chunks.get(&position.neighbor(side)) {
                neighbors.edges[slot] = neighbor.edge(side.opposite());
            }
        }

        Some(MeshInput { data, neighbors })
    }

    /// Drops every column farther than `radius` from `center`.
    ///
    /// Returns the evicted positions.
    pub fn retain_within(&self, center: ChunkPosition, radius: i32) -> Vec<ChunkPosition> {
        let mut evicted = Vec::new();
        self.chunks.get_mut().retain(|position, _| {
            let keep = position.chebyshev_distance(center) <= radius;
            if !keep {
                evicted.push(*position);
            }
            keep
        });
        evicted
    }

    pub fn positions(&self) -> Vec<ChunkPosition> {
        self.chunks.get().keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.chunks.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.get().is_empty()
    }
}
