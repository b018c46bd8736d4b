use std::sync::Arc;
use std::time::Duration;

use crate::engine_state::task_management::{Task, TaskStatus};
use crate::engine_state::voxels::world::World;

/// Periodically drops meshes outside the retention radius.
///
/// Bound meshes leave a pending release behind, which the next render step
/// hands to the renderer.
pub struct MeshEvictionTask {
    world: Arc<World>,
}

impl MeshEvictionTask {
    pub fn new(world: Arc<World>) -> Self {
        MeshEvictionTask { world }
    }
}

impl Task for MeshEvictionTask {
    fn name(&self) -> &'static str {
        "mesh-eviction"
    }

    fn process(&mut self) -> TaskStatus {
        self.world.evict_chunk_meshes();
        TaskStatus::Idle
    }

    fn poll_interval(&self) -> Duration {
        self.world.config().eviction_interval()
    }
}
