use std::sync::Arc;
use std::time::Duration;

use crate::engine_state::task_management::{Task, TaskStatus};
use crate::engine_state::voxels::world::World;

/// Periodically drops chunk data outside the retention radius.
pub struct ChunkEvictionTask {
    world: Arc<World>,
}

impl ChunkEvictionTask {
    pub fn new(world: Arc<World>) -> Self {
        ChunkEvictionTask { world }
    }
}

impl Task for ChunkEvictionTask {
    fn name(&self) -> &'static str {
        "chunk-eviction"
    }

    fn process(&mut self) -> TaskStatus {
        self.world.evict_chunk_data();
        TaskStatus::Idle
    }

    fn poll_interval(&self) -> Duration {
        self.world.config().eviction_interval()
    }
}
