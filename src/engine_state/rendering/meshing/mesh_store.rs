//! # Chunk Mesh Store
//!
//! Concurrent map from chunk position to its current `ChunkMesh`.
//!
//! Meshes are stored as `Arc<ChunkMesh>`, so replacing a chunk's mesh swaps the
//! pointer and readers holding the old `Arc` keep a complete, consistent mesh.
//! The render step takes a snapshot of the `Arc`s and draws without holding the
//! lock, so mesh workers are never blocked for a whole frame.
//!
//! ## Renderer bindings
//!
//! A binding belongs to a position, not to a mesh: uploading a rebuilt mesh
//! replaces whatever the renderer already held there. The store remembers which
//! positions hold a binding, and evicting one of them parks the position in
//! `pending_releases` until the render step frees it on the render thread.
//! Bindings, meshes and pending releases share one lock, so an eviction can
//! never slip between an upload and its bookkeeping.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::core::MtResource;
use crate::engine_state::voxels::chunk::ChunkPosition;

use super::mesh::ChunkMesh;

#[derive(Default)]
struct MeshTable {
    meshes: HashMap<ChunkPosition, Arc<ChunkMesh>>,
    /// Positions the renderer holds a binding for.
    bound: HashSet<ChunkPosition>,
    pending_releases: Vec<ChunkPosition>,
}

impl MeshTable {
    fn evict(&mut self, position: ChunkPosition) -> Option<Arc<ChunkMesh>> {
        let removed = self.meshes.remove(&position);
        if self.bound.remove(&position) {
            self.pending_releases.push(position);
        }
        removed
    }
}

#[derive(Clone, Default)]
pub struct ChunkMeshStore {
    table: MtResource<MeshTable>,
}

impl ChunkMeshStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, position: ChunkPosition) -> Option<Arc<ChunkMesh>> {
        self.table.get().meshes.get(&position).cloned()
    }

    pub fn contains(&self, position: ChunkPosition) -> bool {
        self.table.get().meshes.contains_key(&position)
    }

    /// Inserts or replaces a chunk's mesh as a whole.
    ///
    /// The replacement starts unbound. Any binding held for the position stays
    /// until the replacement is uploaded over it or the position is evicted.
    pub fn insert(&self, mesh: ChunkMesh) -> Option<Arc<ChunkMesh>> {
        self.table
            .get_mut()
            .meshes
            .insert(mesh.position, Arc::new(mesh))
    }

    pub fn remove(&self, position: ChunkPosition) -> Option<Arc<ChunkMesh>> {
        self.table.get_mut().evict(position)
    }

    /// Records that the renderer uploaded `mesh`.
    ///
    /// If the mesh was evicted while the upload ran, the fresh binding is
    /// queued for release straight away.
    pub fn mark_uploaded(&self, mesh: &ChunkMesh) {
        let mut table = self.table.get_mut();
        mesh.mark_bound();
        if table.meshes.contains_key(&mesh.position) {
            table.bound.insert(mesh.position);
        } else {
            table.pending_releases.push(mesh.position);
        }
    }

    /// Whether the renderer holds a binding for `position`.
    pub fn has_binding(&self, position: ChunkPosition) -> bool {
        self.table.get().bound.contains(&position)
    }

    /// Copies out every resident mesh, in no particular order.
    pub fn snapshot(&self) -> Vec<Arc<ChunkMesh>> {
        self.table.get().meshes.values().cloned().collect()
    }

    /// Calls `f` for every resident mesh, outside the store lock.
    ///
    /// Returns the number of meshes visited.
    pub fn for_each_resident(&self, mut f: impl FnMut(&ChunkMesh)) -> usize {
        let meshes = self.snapshot();
        for mesh in &meshes {
            f(mesh);
        }
        meshes.len()
    }

    /// Drops every mesh farther than `radius` from `center`.
    ///
    /// Returns the evicted positions.
    pub fn retain_within(&self, center: ChunkPosition, radius: i32) -> Vec<ChunkPosition> {
        let mut table = self.table.get_mut();
        let evicted: Vec<ChunkPosition> = table
            .meshes
            .keys()
            .filter(|position| position.chebyshev_distance(center) > radius)
            .copied()
            .collect();

        for position in &evicted {
            table.evict(*position);
        }
        evicted
    }

    /// Takes the positions whose renderer bindings must be freed.
    ///
    /// A position that was evicted and then uploaded again is skipped: the new
    /// upload already replaced the old binding.
    pub fn take_pending_releases(&self) -> Vec<ChunkPosition> {
        let mut table = self.table.get_mut();
        let mut releases = std::mem::take(&mut table.pending_releases);
        releases.retain(|position| !table.bound.contains(position));
        releases.dedup();
        releases
    }

    pub fn positions(&self) -> Vec<ChunkPosition> {
        self.table.get().meshes.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.table.get().meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.get().meshes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::rendering::meshing::MeshPass;

    fn mesh_at(position: ChunkPosition, revision: u64) -> ChunkMesh {
        ChunkMesh::new(position, MeshPass::new(), MeshPass::new(), revision, [false; 4])
    }

    fn upload(store: &ChunkMeshStore, position: ChunkPosition) {
        let mesh = store.get(position).unwrap();
        store.mark_uploaded(&mesh);
    }

    #[test]
    fn replacement_is_a_full_swap() {
        let store = ChunkMeshStore::new();
        store.insert(mesh_at(ChunkPosition::ORIGIN, 1));
        let held = store.get(ChunkPosition::ORIGIN).unwrap();

        store.insert(mesh_at(ChunkPosition::ORIGIN, 2));

        assert_eq!(held.source_revision, 1);
        assert_eq!(store.get(ChunkPosition::ORIGIN).unwrap().source_revision, 2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn evicting_bound_meshes_queues_releases() {
        let store = ChunkMeshStore::new();
        for position in ChunkPosition::ORIGIN.square_around(2) {
            store.insert(mesh_at(position, 1));
        }
        upload(&store, ChunkPosition::new(2, 2));

        let evicted = store.retain_within(ChunkPosition::ORIGIN, 1);

        assert_eq!(evicted.len(), 16);
        assert_eq!(store.len(), 9);
        assert!(!store.has_binding(ChunkPosition::new(2, 2)));
        assert_eq!(store.take_pending_releases(), vec![ChunkPosition::new(2, 2)]);
        assert!(store.take_pending_releases().is_empty());
    }

    #[test]
    fn binding_outlives_an_unuploaded_replacement() {
        let store = ChunkMeshStore::new();
        store.insert(mesh_at(ChunkPosition::ORIGIN, 1));
        upload(&store, ChunkPosition::ORIGIN);
        store.insert(mesh_at(ChunkPosition::ORIGIN, 2));

        assert!(store.take_pending_releases().is_empty());
        assert!(!store.get(ChunkPosition::ORIGIN).unwrap().is_bound());
        assert!(store.has_binding(ChunkPosition::ORIGIN));

        // Evicted before the rebuild was ever uploaded: the old binding still goes.
        assert!(store.remove(ChunkPosition::ORIGIN).is_some());
        assert_eq!(store.take_pending_releases(), vec![ChunkPosition::ORIGIN]);
    }

    #[test]
    fn upload_racing_eviction_is_released() {
        let store = ChunkMeshStore::new();
        store.insert(mesh_at(ChunkPosition::ORIGIN, 1));
        let in_flight = store.get(ChunkPosition::ORIGIN).unwrap();

        store.remove(ChunkPosition::ORIGIN);
        assert!(store.take_pending_releases().is_empty());

        store.mark_uploaded(&in_flight);
        assert!(!store.has_binding(ChunkPosition::ORIGIN));
        assert_eq!(store.take_pending_releases(), vec![ChunkPosition::ORIGIN]);
    }

    #[test]
    fn reupload_cancels_pending_release() {
        let store = ChunkMeshStore::new();
        store.insert(mesh_at(ChunkPosition::ORIGIN, 1));
        upload(&store, ChunkPosition::ORIGIN);
        store.remove(ChunkPosition::ORIGIN);

        store.insert(mesh_at(ChunkPosition::ORIGIN, 2));
        upload(&store, ChunkPosition::ORIGIN);

        assert!(store.take_pending_releases().is_empty());
        assert!(store.has_binding(ChunkPosition::ORIGIN));
    }
}
