//! Background tasks for the rendering system.
//!
//! These are the mesh pool's long-lived loops. They build geometry off the
//! foreground thread so the render step only ever swaps finished meshes in.
//!
//! # Available Tasks
//! - `ChunkMeshGenerationTask`: drains the mesh queue one chunk at a time
//! - `MeshRefillTask`: repopulates an empty mesh queue with missing or stale meshes
//! - `MeshEvictionTask`: drops meshes outside the retention radius

pub mod chunk_mesh_generation_task;
pub mod mesh_eviction_task;
pub mod mesh_refill_task;

pub use chunk_mesh_generation_task::ChunkMeshGenerationTask;
pub use mesh_eviction_task::MeshEvictionTask;
pub use mesh_refill_task::MeshRefillTask;
