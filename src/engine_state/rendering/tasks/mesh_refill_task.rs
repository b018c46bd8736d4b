use std::sync::Arc;
use std::time::Duration;

use crate::engine_state::task_management::{Task, TaskStatus};
use crate::engine_state::voxels::world::World;

/// Recovery loop: when the mesh queue is empty, requeues every chunk near the
/// observer whose mesh is missing or stale.
pub struct MeshRefillTask {
    world: Arc<World>,
}

impl MeshRefillTask {
    pub fn new(world: Arc<World>) -> Self {
        MeshRefillTask { world }
    }
}

impl Task for MeshRefillTask {
    fn name(&self) -> &'static str {
        "mesh-refill"
    }

    fn process(&mut self) -> TaskStatus {
        self.world.refill_mesh_queue();
        TaskStatus::Idle
    }

    fn poll_interval(&self) -> Duration {
        self.world.config().mesh_refill_interval()
    }
}
