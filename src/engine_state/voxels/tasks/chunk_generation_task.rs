//! # Chunk Generation Task
//!
//! This module defines the `ChunkGenerationTask`, the data pool loop that
//! follows the observer. Each iteration it re-plans the render square when the
//! observer has moved (or the queue has run dry) and then generates at most one
//! queued chunk, so a move is noticed between any two generated chunks.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Receiver;

use crate::engine_state::task_management::{Task, TaskStatus};
use crate::engine_state::voxels::chunk::ChunkPosition;
use crate::engine_state::voxels::world::World;

/// Generates chunk data around the observer.
pub struct ChunkGenerationTask {
    world: Arc<World>,
    /// Observer chunk the data queue was last planned around.
    planned_center: Option<ChunkPosition>,
}

impl ChunkGenerationTask {
    pub fn new(world: Arc<World>) -> Self {
        ChunkGenerationTask {
            world,
            planned_center: None,
        }
    }
}

impl Task for ChunkGenerationTask {
    fn name(&self) -> &'static str {
        "chunk-generation"
    }

    fn process(&mut self) -> TaskStatus {
        // The initial square is generated synchronously by `World::init`.
        if !self.world.is_ready() {
            return TaskStatus::Idle;
        }

        let center = self.world.observer();
        if self.planned_center != Some(center) || self.world.data_queue().is_empty() {
            self.world.generate_chunk_data_from_pos(center, false);
            self.planned_center = Some(center);
        }

        if self.world.generate_next_queued_chunk() {
            TaskStatus::Busy
        } else {
            TaskStatus::Idle
        }
    }

    fn poll_interval(&self) -> Duration {
        self.world.config().data_poll_interval()
    }

    fn wake_receiver(&self) -> Option<Receiver<()>> {
        Some(self.world.observer_wake_receiver())
    }
}
