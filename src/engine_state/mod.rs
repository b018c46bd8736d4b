//! # Engine State Module
//!
//! The foreground side of the streaming engine.
//!
//! ## Key Components
//!
//! * `EngineState` - Owns the world and its running worker pools
//! * `rendering` - Mesh building, the mesh store and the renderer seam
//! * `task_management` - Worker pools, work queues and the shutdown signal
//! * `voxels` - Voxel data, terrain generation and the `World` controller
//!
//! ## Architecture
//!
//! The foreground thread drives the engine one frame at a time: it reports the
//! observer's position with `tick`, applies any edits, and calls `render`.
//! Everything else (generation, meshing, eviction) happens on the worker pools
//! started by `start_streaming`, which only ever communicate with the
//! foreground through the world's stores and queues.

use std::sync::Arc;

use cgmath::Point3;
use log::info;

use crate::config::StreamingConfig;

use rendering::ChunkRenderer;
use voxels::generation::TerrainGenerator;
use voxels::world::{StreamingHandle, World};

pub mod rendering;
pub mod task_management;
pub mod voxels;

/// The main state container for the streaming engine
///
/// # Examples
///
/// ```rust,ignore
/// let mut engine = EngineState::new(config, Arc::new(PerlinTerrainGenerator::new(7)));
/// engine.init();
/// engine.start_streaming();
///
/// // Main game loop
/// loop {
///     engine.tick(camera_position);
///     engine.render(&mut renderer);
/// }
/// ```
pub struct EngineState {
    /// The voxel world, shared with every background loop
    pub world: Arc<World>,
    /// The running worker pools, if streaming has been started
    streaming: Option<StreamingHandle>,
}

impl EngineState {
    /// Creates an engine around a fresh, empty world.
    pub fn new(config: StreamingConfig, generator: Arc<dyn TerrainGenerator>) -> Self {
        EngineState {
            world: Arc::new(World::new(config, generator)),
            streaming: None,
        }
    }

    /// Synchronously generates the render square around the origin.
    ///
    /// Must run before the first frame; the data loop waits for it.
    pub fn init(&self) {
        self.world.init();
    }

    /// Starts the data and mesh pools. Does nothing if they are already running.
    pub fn start_streaming(&mut self) {
        if self.is_streaming() {
            return;
        }
        info!(
            "Starting streaming with {} data and {} mesh workers",
            self.world.config().data_workers,
            self.world.config().mesh_workers
        );
        self.streaming = Some(self.world.start_streaming());
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
            .as_ref()
            .is_some_and(StreamingHandle::is_running)
    }

    /// Reports the observer's world-space position for this frame.
    ///
    /// # Returns
    ///
    /// `true` if the observer crossed into another chunk
    pub fn tick(&self, observer: Point3<f32>) -> bool {
        self.world.update_observer(observer)
    }

    /// Runs one render step. Returns the number of chunk meshes drawn.
    pub fn render(&self, renderer: &mut dyn ChunkRenderer) -> usize {
        self.world.render(renderer)
    }

    /// Stops every background loop and waits for the workers. Idempotent.
    pub fn shutdown(&mut self) {
        if let Some(mut streaming) = self.streaming.take() {
            streaming.shutdown();
        }
    }
}

impl Drop for EngineState {
    fn drop(&mut self) {
        self.shutdown();
    }
}
