//! # World Module
//!
//! This module provides the `World` struct, the streaming controller that keeps
//! chunk data and chunk meshes resident around a moving observer.
//!
//! ## Architecture
//!
//! The world owns two stores and three queues, each behind its own lock:
//!
//! - `ChunkDataStore`: resident voxel columns
//! - `ChunkMeshStore`: resident meshes, read by the render step
//! - data queue: chunks waiting for terrain generation
//! - mesh queue: chunks waiting for (re)meshing
//! - structure ledger: structure blocks emitted into neighboring chunks,
//!   kept until their target drifts well beyond retention
//!
//! Background loops (see `start_streaming`) move work through these; the
//! foreground thread edits blocks, moves the observer and renders.
//!
//! ## Locking discipline
//!
//! No lock is held across terrain generation or mesh building. Work follows
//! lock, copy, unlock, compute, lock, commit, unlock. Where two locks must be
//! held together the order is always structure ledger, then data store; the
//! data and mesh queues only ever nest a data-store read inside.
//!
//! ## Chunk lifecycle
//!
//! 1. The chunk enters the data queue when it falls inside the render square
//! 2. A data worker generates it, merges any recorded structure blocks into it,
//!    and only then inserts it into the data store
//! 3. The chunk (and any meshed neighbors) enter the mesh queue
//! 4. A mesh worker builds the mesh and swaps it into the mesh store
//! 5. Edits and late-arriving structure blocks requeue the chunk for meshing
//! 6. Once outside the retention radius, the eviction loops drop data and mesh

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cgmath::{Point3, Vector3};
use crossbeam_channel::{Receiver, Sender};
use log::{debug, info, trace};
use web_time::Instant;

use crate::config::StreamingConfig;
use crate::core::MtResource;
use crate::engine_state::rendering::meshing::{
    build_chunk_mesh, build_focus_mesh, BlockGeometryTable, ChunkMeshStore, MeshPass,
};
use crate::engine_state::rendering::renderer::ChunkRenderer;
use crate::engine_state::rendering::tasks::{
    ChunkMeshGenerationTask, MeshEvictionTask, MeshRefillTask,
};
use crate::engine_state::task_management::{ShutdownSignal, WorkQueue, WorkerPool};
use crate::engine_state::voxels::block::BlockType;
use crate::engine_state::voxels::chunk::{BlockLocation, ChunkDataStore, ChunkPosition};
use crate::engine_state::voxels::generation::{StructureBlock, TerrainGenerator};
use crate::engine_state::voxels::tasks::{ChunkEvictionTask, ChunkGenerationTask};

/// The chunk streaming controller.
pub struct World {
    config: StreamingConfig,
    generator: Arc<dyn TerrainGenerator>,
    geometry: Arc<BlockGeometryTable>,
    data_store: ChunkDataStore,
    mesh_store: ChunkMeshStore,
    data_queue: WorkQueue<ChunkPosition>,
    mesh_queue: WorkQueue<ChunkPosition>,
    structure_ledger: WorkQueue<StructureBlock>,
    observer: MtResource<ChunkPosition>,
    observer_waker: Sender<()>,
    observer_wake_receiver: Receiver<()>,
    focus_mesh: MtResource<MeshPass>,
    initial_data_generated: AtomicBool,
}

impl World {
    pub fn new(config: StreamingConfig, generator: Arc<dyn TerrainGenerator>) -> Self {
        Self::with_geometry(config, generator, Arc::new(BlockGeometryTable::standard()))
    }

    pub fn with_geometry(
        config: StreamingConfig,
        generator: Arc<dyn TerrainGenerator>,
        geometry: Arc<BlockGeometryTable>,
    ) -> Self {
        let (observer_waker, observer_wake_receiver) = crossbeam_channel::bounded(1);
        World {
            config,
            generator,
            geometry,
            data_store: ChunkDataStore::new(),
            mesh_store: ChunkMeshStore::new(),
            data_queue: WorkQueue::new(),
            mesh_queue: WorkQueue::new(),
            structure_ledger: WorkQueue::new(),
            observer: MtResource::new(ChunkPosition::ORIGIN),
            observer_waker,
            observer_wake_receiver,
            focus_mesh: MtResource::new(MeshPass::new()),
            initial_data_generated: AtomicBool::new(false),
        }
    }

    /// Generates the render square around the observer before anything else runs.
    ///
    /// Blocks until every chunk of the square, the origin chunk included, has data.
    pub fn init(&self) {
        let start = Instant::now();
        self.generate_chunk_data_from_pos(self.observer(), true);
        self.initial_data_generated.store(true, Ordering::Release);
        info!(
            "Initial world data generated: {} chunks in {:?}",
            self.data_store.len(),
            start.elapsed()
        );
    }

    /// Whether `init` has completed.
    pub fn is_ready(&self) -> bool {
        self.initial_data_generated.load(Ordering::Acquire)
    }

    /// Spawns the data and mesh pools with every long-lived loop.
    ///
    /// Streaming continues until the returned handle is shut down or dropped.
    pub fn start_streaming(self: &Arc<Self>) -> StreamingHandle {
        let signal = ShutdownSignal::new();

        let mut data_pool = WorkerPool::new("data", self.config.data_workers, signal.listener());
        data_pool.publish_task(Box::new(ChunkGenerationTask::new(self.clone())));
        data_pool.publish_task(Box::new(ChunkEvictionTask::new(self.clone())));

        let mut mesh_pool = WorkerPool::new("mesh", self.config.mesh_workers, signal.listener());
        mesh_pool.publish_task(Box::new(MeshRefillTask::new(self.clone())));
        mesh_pool.publish_task(Box::new(ChunkMeshGenerationTask::new(self.clone())));
        mesh_pool.publish_task(Box::new(MeshEvictionTask::new(self.clone())));

        StreamingHandle {
            signal,
            pools: vec![data_pool, mesh_pool],
        }
    }

    // ---------------------------------------------------------------------
    // Observer
    // ---------------------------------------------------------------------

    /// The chunk the observer is currently in.
    pub fn observer(&self) -> ChunkPosition {
        self.observer.snapshot()
    }

    /// Records the observer's world-space position.
    ///
    /// Returns `true` if the observer entered a new chunk, in which case the
    /// data generation loop is woken.
    pub fn update_observer(&self, position: Point3<f32>) -> bool {
        let chunk = ChunkPosition::containing(position);
        let changed = {
            let mut observer = self.observer.get_mut();
            let changed = *observer != chunk;
            *observer = chunk;
            changed
        };

        if changed {
            debug!("Observer entered chunk {}", chunk);
            let _ = self.observer_waker.try_send(());
        }
        changed
    }

    /// Fires whenever the observer changes chunk.
    pub fn observer_wake_receiver(&self) -> Receiver<()> {
        self.observer_wake_receiver.clone()
    }

    // ---------------------------------------------------------------------
    // Data generation
    // ---------------------------------------------------------------------

    /// Brings the render square around `center` into the data store.
    ///
    /// With `initial` the missing chunks are generated on the calling thread
    /// before returning. Otherwise they are queued, nearest first, for the data
    /// generation loop; chunks already resident or queued are skipped.
    pub fn generate_chunk_data_from_pos(&self, center: ChunkPosition, initial: bool) {
        let radius = self.config.render_distance;

        if initial {
            for position in center.square_around(radius) {
                if !self.data_store.contains(position) {
                    self.generate_chunk_data(position);
                }
            }
            return;
        }

        // Requests left over from an older observer position are no longer wanted.
        self.data_queue
            .retain(|position| position.chebyshev_distance(center) <= radius);

        for position in center.square_around(radius) {
            self.data_queue
                .push_back_if(position, |position| !self.data_store.contains(*position));
        }
    }

    /// Generates the next queued chunk. Returns `false` if the queue was empty.
    pub fn generate_next_queued_chunk(&self) -> bool {
        let Some(position) = self.data_queue.pop_front() else {
            return false;
        };

        if position.chebyshev_distance(self.observer()) <= self.config.retention_distance {
            self.generate_chunk_data(position);
        }
        true
    }

    /// Generates one chunk and commits it.
    ///
    /// Returns `false` if the chunk was already resident, in which case nothing
    /// changes.
    pub fn generate_chunk_data(&self, position: ChunkPosition) -> bool {
        if self.data_store.contains(position) {
            return false;
        }

        let start = Instant::now();
        let generated = self.generator.generate(position);
        let mut data = generated.data;

        {
            let structures = self.structure_ledger.lock();
            if self.data_store.contains(position) {
                return false;
            }

            // Recorded structure blocks land before the chunk becomes visible to
            // meshing. They stay recorded so a regenerated chunk gets them again.
            let pending: Vec<StructureBlock> = structures
                .iter()
                .filter(|block| block.target == position)
                .copied()
                .collect();
            let applied = pending.iter().filter(|block| block.apply(&mut data)).count();
            if !pending.is_empty() {
                trace!(
                    "Applied {}/{} recorded structure blocks to chunk {}",
                    applied,
                    pending.len(),
                    position
                );
            }

            self.data_store.insert(data);
        }

        for block in generated.overflow {
            self.place_structure_block(block);
        }

        self.mesh_queue.push_back_if_absent(position);
        for neighbor in position.neighbors() {
            if self.mesh_store.contains(neighbor) {
                self.mesh_queue.push_back_if_absent(neighbor);
            }
        }

        debug!("Generated chunk {} in {:?}", position, start.elapsed());
        true
    }

    /// Records a structure block for its target chunk and merges it in if the
    /// target is resident.
    ///
    /// The record outlives the merge: if the target is evicted while the source
    /// chunk stays resident, regenerating the target replays it.
    pub fn place_structure_block(&self, block: StructureBlock) {
        let changed = {
            let mut structures = self.structure_ledger.lock();
            if !structures.contains(&block) {
                structures.push_back(block);
            }
            match self.data_store.update_chunk(block.target, |data| block.apply(data)) {
                Some(changed) => changed,
                None => {
                    trace!("Deferred structure block for chunk {}", block.target);
                    false
                }
            }
        };

        if changed {
            self.mesh_queue.push_back_if_absent(block.target);
        }
    }

    /// Evicts chunk data outside the retention radius.
    ///
    /// Recorded structure blocks for chunks more than one step beyond the radius
    /// are dropped as well. Every source of such a block is a neighbor of its
    /// target and so already evicted; it emits the block again if regenerated.
    pub fn evict_chunk_data(&self) -> usize {
        let center = self.observer();
        let retention = self.config.retention_distance;

        let evicted = self.data_store.retain_within(center, retention);
        let pruned = self
            .structure_ledger
            .retain(|block| block.target.chebyshev_distance(center) <= retention + 1);

        if !evicted.is_empty() || pruned > 0 {
            debug!(
                "Evicted {} chunk columns and {} structure blocks around {}",
                evicted.len(),
                pruned,
                center
            );
        }
        evicted.len()
    }

    // ---------------------------------------------------------------------
    // Meshing
    // ---------------------------------------------------------------------

    /// Builds and commits the mesh for one chunk.
    ///
    /// Returns `false` if the chunk has no data or is outside the retention radius.
    pub fn generate_mesh(&self, position: ChunkPosition) -> bool {
        let retention = self.config.retention_distance;
        if position.chebyshev_distance(self.observer()) > retention {
            return false;
        }

        let Some(input) = self.data_store.mesh_input(position) else {
            return false;
        };
        let mesh = build_chunk_mesh(&input, &self.geometry);

        // The chunk may have been evicted while we were building.
        if !self.data_store.contains(position)
            || position.chebyshev_distance(self.observer()) > retention
        {
            return false;
        }

        self.mesh_store.insert(mesh);
        true
    }

    /// Meshes the next queued chunk. Returns `false` if the queue was empty.
    pub fn generate_next_queued_mesh(&self) -> bool {
        match self.mesh_queue.pop_front() {
            Some(position) => {
                self.generate_mesh(position);
                true
            }
            None => false,
        }
    }

    /// Requeues chunks around the observer whose mesh is missing or stale.
    ///
    /// Only runs when the mesh queue is empty, so it never competes with edits.
    /// Returns how many chunks were queued.
    pub fn refill_mesh_queue(&self) -> usize {
        if !self.mesh_queue.is_empty() {
            return 0;
        }

        let mut queued = 0;
        for position in self.observer().square_around(self.config.render_distance) {
            let (revision, neighbors_present) = self.data_store.mesh_state(position);
            if revision.is_none() {
                continue;
            }

            let needs_mesh = match self.mesh_store.get(position) {
                Some(mesh) => mesh.is_stale(revision, neighbors_present),
                None => true,
            };
            if needs_mesh && self.mesh_queue.push_back_if_absent(position) {
                queued += 1;
            }
        }

        if queued > 0 {
            trace!("Mesh refill queued {} chunks", queued);
        }
        queued
    }

    /// Evicts meshes outside the retention radius.
    pub fn evict_chunk_meshes(&self) -> usize {
        let center = self.observer();
        let evicted = self
            .mesh_store
            .retain_within(center, self.config.retention_distance);
        if !evicted.is_empty() {
            debug!("Evicted {} chunk meshes around {}", evicted.len(), center);
        }
        evicted.len()
    }

    // ---------------------------------------------------------------------
    // Gameplay access
    // ---------------------------------------------------------------------

    /// Reads a block. Chunks without data, and heights outside the column, read as air.
    pub fn get_block(&self, position: Point3<i32>) -> BlockType {
        BlockLocation::from_world(position)
            .and_then(|location| self.data_store.block_at(location.chunk, location.index()))
            .unwrap_or(BlockType::AIR)
    }

    /// Replaces a block with air. Returns `false` if the chunk has no data.
    pub fn remove_block(&self, position: Point3<i32>) -> bool {
        self.write_block(position, BlockType::AIR)
    }

    /// Writes a block. Returns `false` if the chunk has no data.
    pub fn create_block(&self, position: Point3<i32>, block: BlockType) -> bool {
        self.write_block(position, block)
    }

    fn write_block(&self, position: Point3<i32>, block: BlockType) -> bool {
        let Some(location) = BlockLocation::from_world(position) else {
            return false;
        };
        if !self.data_store.set_block(location.chunk, location.index(), block) {
            return false;
        }

        // Neighbors first, so the edited chunk ends up at the very front.
        for side in location.boundary_sides() {
            self.mesh_queue.promote_front(location.chunk.neighbor(side));
        }
        self.mesh_queue.promote_front(location.chunk);
        true
    }

    /// Rebuilds the highlight for the aimed-at block.
    ///
    /// `face_mask` is the set of `BlockSide` bits to highlight.
    pub fn update_focus_block(&self, position: Point3<i32>, face_mask: u8) {
        let focus = build_focus_mesh(position, face_mask, &self.geometry);
        self.focus_mesh.replace(focus);
    }

    // ---------------------------------------------------------------------
    // Rendering
    // ---------------------------------------------------------------------

    /// Runs one render step against `renderer`.
    ///
    /// Frees bindings of evicted meshes, uploads meshes not yet bound, draws
    /// every resident mesh, then draws and clears the focus highlight. Returns
    /// the number of chunk meshes drawn.
    pub fn render(&self, renderer: &mut dyn ChunkRenderer) -> usize {
        for position in self.mesh_store.take_pending_releases() {
            renderer.release(position);
        }

        let drawn = self.mesh_store.for_each_resident(|mesh| {
            if !mesh.is_bound() {
                renderer.upload(mesh.position, mesh);
                self.mesh_store.mark_uploaded(mesh);
            }
            renderer.draw(mesh.position, mesh);
        });

        let focus = self.focus_mesh.replace(MeshPass::new());
        renderer.draw_focus(&focus);

        drawn
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    pub fn config(&self) -> &StreamingConfig {
        &self.config
    }

    pub fn geometry(&self) -> &BlockGeometryTable {
        &self.geometry
    }

    pub fn data_store(&self) -> &ChunkDataStore {
        &self.data_store
    }

    pub fn mesh_store(&self) -> &ChunkMeshStore {
        &self.mesh_store
    }

    pub fn data_queue(&self) -> &WorkQueue<ChunkPosition> {
        &self.data_queue
    }

    pub fn mesh_queue(&self) -> &WorkQueue<ChunkPosition> {
        &self.mesh_queue
    }

    pub fn structure_ledger(&self) -> &WorkQueue<StructureBlock> {
        &self.structure_ledger
    }

    /// World-space centre of the observer's chunk at the given height.
    pub fn observer_anchor(&self, height: f32) -> Point3<f32> {
        let origin = self.observer().world_origin();
        let half = crate::engine_state::voxels::chunk::CHUNK_WIDTH as f32 / 2.0;
        Point3::new(origin.x as f32, height, origin.z as f32) + Vector3::new(half, 0.0, half)
    }
}

/// The running worker pools of a streaming world.
///
/// Dropping the handle shuts streaming down.
pub struct StreamingHandle {
    signal: ShutdownSignal,
    pools: Vec<WorkerPool>,
}

impl StreamingHandle {
    /// Signals every loop to stop and waits for all workers. Idempotent.
    pub fn shutdown(&mut self) {
        if self.pools.is_empty() {
            return;
        }

        info!("Shutting down streaming");
        self.signal.trigger();
        for pool in self.pools.drain(..) {
            pool.join();
        }
    }

    pub fn is_running(&self) -> bool {
        !self.pools.is_empty()
    }
}

impl Drop for StreamingHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::chunk::{ChunkData, CHUNK_WIDTH};
    use crate::engine_state::voxels::generation::{FlatTerrainGenerator, GeneratedChunk};

    fn small_config() -> StreamingConfig {
        StreamingConfig {
            render_distance: 1,
            retention_distance: 2,
            ..StreamingConfig::default()
        }
    }

    fn flat_world() -> World {
        World::new(small_config(), Arc::new(FlatTerrainGenerator::new(10)))
    }

    /// Puts one tree-like structure block into the east neighbor of the origin.
    struct SpillingGenerator;

    const SPILL_TARGET: Point3<i32> = Point3::new(CHUNK_WIDTH, 20, 3);

    impl TerrainGenerator for SpillingGenerator {
        fn generate(&self, position: ChunkPosition) -> GeneratedChunk {
            let mut overflow = Vec::new();
            if position == ChunkPosition::ORIGIN {
                overflow.extend(StructureBlock::at(SPILL_TARGET, BlockType::OAK_LEAVES));
            }
            GeneratedChunk {
                data: ChunkData::new(position),
                overflow,
            }
        }
    }

    #[test]
    fn init_generates_the_render_square() {
        let world = flat_world();
        assert!(!world.is_ready());
        world.init();

        assert!(world.is_ready());
        assert_eq!(world.data_store().len(), 9);
        assert_eq!(world.get_block(Point3::new(0, 5, 0)), BlockType::STONE);
        assert_eq!(world.get_block(Point3::new(0, 11, 0)), BlockType::AIR);
    }

    #[test]
    fn unrequested_chunks_read_as_air() {
        let world = flat_world();
        assert_eq!(world.get_block(Point3::new(0, 5, 0)), BlockType::AIR);
        assert!(!world.remove_block(Point3::new(0, 5, 0)));
        assert!(world.mesh_queue().is_empty());
    }

    #[test]
    fn out_of_column_heights_are_ignored() {
        let world = flat_world();
        world.init();
        assert_eq!(world.get_block(Point3::new(0, -1, 0)), BlockType::AIR);
        assert!(!world.create_block(Point3::new(0, -1, 0), BlockType::STONE));
        assert!(!world.create_block(Point3::new(0, 500, 0), BlockType::STONE));
        assert_eq!(world.get_block(Point3::new(0, 127, 0)), BlockType::AIR);
    }

    #[test]
    fn created_blocks_read_back() {
        let world = flat_world();
        world.init();
        let position = Point3::new(-5, 40, 13);
        assert!(world.create_block(position, BlockType::SNOW));
        assert_eq!(world.get_block(position), BlockType::SNOW);
    }

    #[test]
    fn interior_edits_remesh_only_their_chunk() {
        let world = flat_world();
        world.init();
        world.mesh_queue().drain();

        assert!(world.remove_block(Point3::new(7, 5, 7)));
        assert_eq!(world.mesh_queue().snapshot(), vec![ChunkPosition::ORIGIN]);
    }

    #[test]
    fn boundary_edits_remesh_the_neighbor() {
        let world = flat_world();
        world.init();

        world.mesh_queue().drain();
        world.remove_block(Point3::new(0, 5, 7));
        assert_eq!(
            world.mesh_queue().snapshot(),
            vec![ChunkPosition::ORIGIN, ChunkPosition::new(-1, 0)]
        );

        world.mesh_queue().drain();
        world.remove_block(Point3::new(CHUNK_WIDTH - 1, 5, 7));
        assert_eq!(
            world.mesh_queue().snapshot(),
            vec![ChunkPosition::ORIGIN, ChunkPosition::new(1, 0)]
        );

        world.mesh_queue().drain();
        world.remove_block(Point3::new(-1, 5, -16));
        let mut queued = world.mesh_queue().snapshot();
        assert_eq!(queued.remove(0), ChunkPosition::new(-1, -1));
        queued.sort();
        assert_eq!(queued, vec![ChunkPosition::new(-1, -2), ChunkPosition::new(0, -1)]);
    }

    #[test]
    fn edits_jump_ahead_of_refill_work() {
        let world = flat_world();
        world.init();
        assert!(world.mesh_queue().len() >= 9);

        world.remove_block(Point3::new(7, 5, 7));
        assert_eq!(world.mesh_queue().pop_front(), Some(ChunkPosition::ORIGIN));
        assert!(!world.mesh_queue().contains(&ChunkPosition::ORIGIN));
    }

    #[test]
    fn structure_blocks_wait_for_their_target() {
        let world = World::new(small_config(), Arc::new(SpillingGenerator));
        let east = ChunkPosition::new(1, 0);

        assert!(world.generate_chunk_data(ChunkPosition::ORIGIN));
        assert_eq!(world.structure_ledger().len(), 1);
        assert_eq!(world.get_block(SPILL_TARGET), BlockType::AIR);

        assert!(world.generate_chunk_data(east));
        assert_eq!(world.structure_ledger().len(), 1);
        assert_eq!(world.get_block(SPILL_TARGET), BlockType::OAK_LEAVES);
    }

    #[test]
    fn structure_blocks_apply_to_resident_targets() {
        let world = World::new(small_config(), Arc::new(SpillingGenerator));
        let east = ChunkPosition::new(1, 0);

        assert!(world.generate_chunk_data(east));
        world.mesh_queue().drain();
        let revision = world.data_store().revision(east).unwrap();

        assert!(world.generate_chunk_data(ChunkPosition::ORIGIN));
        assert_eq!(world.structure_ledger().len(), 1);
        assert_eq!(world.get_block(SPILL_TARGET), BlockType::OAK_LEAVES);
        assert!(world.data_store().revision(east).unwrap() > revision);
        assert!(world.mesh_queue().contains(&east));
    }

    #[test]
    fn structure_blocks_survive_target_eviction() {
        let world = World::new(small_config(), Arc::new(SpillingGenerator));
        let east = ChunkPosition::new(1, 0);
        assert!(world.generate_chunk_data(east));
        assert!(world.generate_chunk_data(ChunkPosition::ORIGIN));
        assert_eq!(world.get_block(SPILL_TARGET), BlockType::OAK_LEAVES);

        // The target leaves retention while its source stays resident.
        world.update_observer(Point3::new(-24.0, 70.0, 8.0));
        assert_eq!(world.evict_chunk_data(), 1);
        assert!(world.data_store().contains(ChunkPosition::ORIGIN));
        assert!(!world.data_store().contains(east));
        assert_eq!(world.structure_ledger().len(), 1);

        world.update_observer(Point3::new(8.0, 70.0, 8.0));
        assert!(world.generate_chunk_data(east));
        assert_eq!(world.get_block(SPILL_TARGET), BlockType::OAK_LEAVES);
    }

    #[test]
    fn distant_structure_blocks_are_pruned() {
        let world = World::new(small_config(), Arc::new(SpillingGenerator));
        assert!(world.generate_chunk_data(ChunkPosition::ORIGIN));
        assert_eq!(world.structure_ledger().len(), 1);

        // The east target is three chunks away: one step past retention is kept.
        world.update_observer(Point3::new(-24.0, 70.0, 8.0));
        world.evict_chunk_data();
        assert_eq!(world.structure_ledger().len(), 1);

        world.update_observer(Point3::new(-60.0, 70.0, 8.0));
        assert_eq!(world.evict_chunk_data(), 1);
        assert!(world.structure_ledger().is_empty());
    }

    #[test]
    fn regenerating_a_resident_chunk_is_a_no_op() {
        let world = flat_world();
        world.init();
        world.create_block(Point3::new(1, 30, 1), BlockType::SAND);

        assert!(!world.generate_chunk_data(ChunkPosition::ORIGIN));
        assert_eq!(world.get_block(Point3::new(1, 30, 1)), BlockType::SAND);
    }

    #[test]
    fn incremental_generation_queues_missing_chunks_nearest_first() {
        let world = flat_world();
        world.init();
        world.update_observer(Point3::new(40.0, 70.0, 8.0));
        assert_eq!(world.observer(), ChunkPosition::new(2, 0));

        world.generate_chunk_data_from_pos(world.observer(), false);
        world.generate_chunk_data_from_pos(world.observer(), false);

        let queued = world.data_queue().snapshot();
        assert_eq!(queued.len(), 6);
        assert_eq!(queued[0], ChunkPosition::new(2, 0));
        assert!(queued.iter().all(|p| !world.data_store().contains(*p)));

        while world.generate_next_queued_chunk() {}
        assert_eq!(world.data_store().len(), 15);
    }

    #[test]
    fn meshes_track_their_source_revisions() {
        let world = flat_world();
        world.init();
        world.mesh_queue().drain();

        assert!(world.generate_mesh(ChunkPosition::ORIGIN));
        let mesh = world.mesh_store().get(ChunkPosition::ORIGIN).unwrap();
        assert!(mesh.quad_count() > 0);

        assert_eq!(world.refill_mesh_queue(), 8);
        world.mesh_queue().drain();
        while let Some(position) = ChunkPosition::ORIGIN
            .square_around(1)
            .into_iter()
            .find(|p| !world.mesh_store().contains(*p))
        {
            world.generate_mesh(position);
        }
        assert_eq!(world.refill_mesh_queue(), 0);

        world.remove_block(Point3::new(3, 10, 3));
        world.mesh_queue().drain();
        assert_eq!(world.refill_mesh_queue(), 1);
        assert_eq!(world.mesh_queue().snapshot(), vec![ChunkPosition::ORIGIN]);
    }

    #[test]
    fn eviction_respects_retention() {
        let world = flat_world();
        world.init();
        for position in ChunkPosition::ORIGIN.square_around(1) {
            world.generate_mesh(position);
        }

        // The far column sits two chunks away, still inside retention.
        world.update_observer(Point3::new(-8.0, 70.0, 8.0));
        assert_eq!(world.observer(), ChunkPosition::new(-1, 0));
        assert_eq!(world.evict_chunk_data(), 0);
        assert_eq!(world.evict_chunk_meshes(), 0);

        world.update_observer(Point3::new(-24.0, 70.0, 8.0));
        assert_eq!(world.observer(), ChunkPosition::new(-2, 0));
        assert_eq!(world.evict_chunk_data(), 3);
        assert_eq!(world.evict_chunk_meshes(), 3);
        assert!(!world.data_store().contains(ChunkPosition::new(1, 0)));
        assert!(!world.mesh_store().contains(ChunkPosition::new(1, 1)));
        assert!(world.data_store().contains(ChunkPosition::new(0, 0)));
    }

    #[test]
    fn observer_changes_wake_the_generator() {
        let world = flat_world();
        let wake = world.observer_wake_receiver();

        assert!(!world.update_observer(Point3::new(3.0, 70.0, 3.0)));
        assert!(wake.try_recv().is_err());

        assert!(world.update_observer(Point3::new(-0.5, 70.0, 3.0)));
        assert_eq!(world.observer(), ChunkPosition::new(-1, 0));
        assert!(wake.try_recv().is_ok());
    }

    #[derive(Default)]
    struct RecordingRenderer {
        uploads: Vec<ChunkPosition>,
        draws: usize,
        releases: Vec<ChunkPosition>,
        focus_quads: Vec<usize>,
    }

    impl ChunkRenderer for RecordingRenderer {
        fn upload(&mut self, position: ChunkPosition, _mesh: &crate::engine_state::rendering::meshing::ChunkMesh) {
            self.uploads.push(position);
        }

        fn draw(&mut self, _position: ChunkPosition, _mesh: &crate::engine_state::rendering::meshing::ChunkMesh) {
            self.draws += 1;
        }

        fn release(&mut self, position: ChunkPosition) {
            self.releases.push(position);
        }

        fn draw_focus(&mut self, focus: &MeshPass) {
            self.focus_quads.push(focus.quad_count());
        }
    }

    #[test]
    fn render_uploads_once_and_releases_evicted_meshes() {
        let world = flat_world();
        world.init();
        world.generate_mesh(ChunkPosition::ORIGIN);
        world.generate_mesh(ChunkPosition::new(1, 0));
        world.update_focus_block(Point3::new(0, 10, 0), 0b11_1111);

        let mut renderer = RecordingRenderer::default();
        assert_eq!(world.render(&mut renderer), 2);
        assert_eq!(world.render(&mut renderer), 2);

        assert_eq!(renderer.uploads.len(), 2);
        assert_eq!(renderer.draws, 4);
        // The focus highlight lasts a single frame.
        assert_eq!(renderer.focus_quads, vec![6, 0]);

        world.update_observer(Point3::new(-24.0, 70.0, 8.0));
        world.evict_chunk_meshes();
        assert_eq!(world.render(&mut renderer), 1);
        assert_eq!(renderer.releases, vec![ChunkPosition::new(1, 0)]);
    }
}
