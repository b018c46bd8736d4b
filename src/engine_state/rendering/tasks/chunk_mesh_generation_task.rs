//! Task for generating mesh data for chunks in a background thread.
//!
//! The `ChunkMeshGenerationTask` pops one position from the mesh queue per
//! iteration, builds its mesh from a consistent copy of the column and its
//! neighbor edges, and swaps the result into the mesh store. It sleeps on the
//! mesh queue's waker, so edits are picked up as soon as they are queued.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Receiver;

use crate::engine_state::task_management::{Task, TaskStatus};
use crate::engine_state::voxels::world::World;

/// Builds meshes for queued chunks.
pub struct ChunkMeshGenerationTask {
    world: Arc<World>,
}

impl ChunkMeshGenerationTask {
    pub fn new(world: Arc<World>) -> Self {
        ChunkMeshGenerationTask { world }
    }
}

impl Task for ChunkMeshGenerationTask {
    fn name(&self) -> &'static str {
        "chunk-mesh-generation"
    }

    fn process(&mut self) -> TaskStatus {
        if self.world.generate_next_queued_mesh() {
            TaskStatus::Busy
        } else {
            TaskStatus::Idle
        }
    }

    fn poll_interval(&self) -> Duration {
        self.world.config().mesh_poll_interval()
    }

    fn wake_receiver(&self) -> Option<Receiver<()>> {
        Some(self.world.mesh_queue().wake_receiver())
    }
}
