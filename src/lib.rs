//! # Voxel Streaming
//!
//! Streams an unbounded voxel world around a moving observer: generates terrain
//! for nearby chunks, turns it into renderable meshes, evicts what falls out of
//! range, and keeps all of it consistent while background workers, live block
//! edits and the render step touch the same state.
//!
//! ## Key Modules
//!
//! * `config` - JSON-loadable tuning parameters
//! * `core` - Shared-state primitives used throughout the engine
//! * `engine_state` - The world, its worker pools, meshing and the renderer seam
//!
//! ## Architecture
//!
//! The engine follows a modular architecture with clear separation between:
//! * Voxel data and terrain generation (data pool)
//! * Mesh building and eviction (mesh pool)
//! * The foreground frame loop, which moves the observer, edits blocks and
//!   drives a `ChunkRenderer`
//!
//! No graphics API is linked in. A backend implements `ChunkRenderer` and
//! receives upload, draw and release calls from `World::render`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use voxel_streaming::config::StreamingConfig;
//! use voxel_streaming::engine_state::voxels::generation::PerlinTerrainGenerator;
//! use voxel_streaming::engine_state::EngineState;
//!
//! let mut engine = EngineState::new(
//!     StreamingConfig::default(),
//!     Arc::new(PerlinTerrainGenerator::new(42)),
//! );
//! engine.init();
//! engine.start_streaming();
//! engine.tick(cgmath::Point3::new(40.0, 70.0, 8.0));
//! engine.shutdown();
//! ```

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use cgmath::{Point3, Vector3};
use log::info;
use web_time::Instant;

pub mod config;
pub mod core;
pub mod engine_state;

use config::StreamingConfig;
use engine_state::rendering::meshing::{ChunkMesh, MeshPass};
use engine_state::rendering::ChunkRenderer;
use engine_state::voxels::block::{BlockSide, BlockType};
use engine_state::voxels::chunk::ChunkPosition;
use engine_state::voxels::generation::PerlinTerrainGenerator;
use engine_state::EngineState;

/// Frames simulated by `run`.
const DEMO_FRAMES: u32 = 240;
const FRAME_TIME: Duration = Duration::from_millis(16);
/// Observer speed in blocks per frame.
const WALK_SPEED: f32 = 0.5;

/// Counts what the render step asks of the backend.
#[derive(Default)]
struct FrameStatsRenderer {
    uploads: usize,
    draws: usize,
    releases: usize,
    uploaded_quads: usize,
}

impl ChunkRenderer for FrameStatsRenderer {
    fn upload(&mut self, _position: ChunkPosition, mesh: &ChunkMesh) {
        self.uploads += 1;
        self.uploaded_quads += mesh.quad_count();
    }

    fn draw(&mut self, _position: ChunkPosition, _mesh: &ChunkMesh) {
        self.draws += 1;
    }

    fn release(&mut self, _position: ChunkPosition) {
        self.releases += 1;
    }

    fn draw_focus(&mut self, _focus: &MeshPass) {}
}

/// Runs a headless walk through a generated world.
///
/// Loads the config named by `VOXEL_STREAMING_CONFIG` (or the defaults), walks
/// the observer east while editing the ground beneath it, and logs what the
/// render step would have sent to a graphics backend.
pub fn run() -> anyhow::Result<()> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = StreamingConfig::from_env()?;
    let seed = config.seed;

    let start = Instant::now();
    let mut engine = EngineState::new(config, Arc::new(PerlinTerrainGenerator::new(seed)));
    engine.init();
    engine.start_streaming();
    info!("Application Initialization: {:?}", start.elapsed());

    let mut renderer = FrameStatsRenderer::default();
    let mut observer = engine.world.observer_anchor(80.0);

    for frame in 0..DEMO_FRAMES {
        observer += Vector3::new(WALK_SPEED, 0.0, 0.0);
        if engine.tick(observer) {
            info!("Observer entered chunk {}", engine.world.observer());
        }

        if let Some(ground) = ground_below(&engine, observer) {
            engine.world.update_focus_block(ground, BlockSide::TOP.bit());
            // Dig a trench along the walk, with a post every 64 frames.
            if frame % 64 == 0 {
                engine
                    .world
                    .create_block(ground + Vector3::new(0, 1, 0), BlockType::OAK_WOOD);
            } else if frame % 8 == 0 {
                engine.world.remove_block(ground);
            }
        }

        engine.render(&mut renderer);
        thread::sleep(FRAME_TIME);
    }

    info!(
        "Walk finished: {} chunks resident, {} meshes, {} uploads ({} quads), {} draws, {} releases",
        engine.world.data_store().len(),
        engine.world.mesh_store().len(),
        renderer.uploads,
        renderer.uploaded_quads,
        renderer.draws,
        renderer.releases
    );

    engine.shutdown();
    Ok(())
}

/// The highest non-air block under the observer, if its chunk is resident.
fn ground_below(engine: &EngineState, observer: Point3<f32>) -> Option<Point3<i32>> {
    let column = Point3::new(observer.x.floor() as i32, 0, observer.z.floor() as i32);
    let location = engine_state::voxels::chunk::BlockLocation::from_world(column)?;
    let height = engine
        .world
        .data_store()
        .with_chunk(location.chunk, |data| {
            data.surface_height(location.local_x, location.local_z)
        })??;
    Some(Point3::new(column.x, height as i32, column.z))
}
