//! # Voxel Tasks
//!
//! The data pool's long-lived loops.
//!
//! - `ChunkGenerationTask`: keeps the render square around the observer generated
//! - `ChunkEvictionTask`: drops columns outside the retention radius

pub mod chunk_eviction_task;
pub mod chunk_generation_task;

pub use chunk_eviction_task::ChunkEvictionTask;
pub use chunk_generation_task::ChunkGenerationTask;
