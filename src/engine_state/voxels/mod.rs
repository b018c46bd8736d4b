//! # Voxel World
//!
//! This module holds the voxel side of the streaming pipeline: what the world
//! is made of, how it is generated, and the `World` controller that keeps it
//! resident around the observer.
//!
//! ## Architecture
//!
//! The voxel system is organized into several key components:
//!
//! * **Block**: Block kinds and faces
//! * **Chunk**: 16 x 128 x 16 columns of blocks, their coordinates and the shared data store
//! * **Generation**: Pluggable terrain generators and structures that spill across chunks
//! * **World**: Queues, stores and observer; the single entry point for reads, edits and rendering
//! * **Tasks**: The data pool's generation and eviction loops
//!
//! ## Data Flow
//!
//! 1. The observer moves; the generation loop queues the missing render square
//! 2. Generated columns land in the data store and queue themselves for meshing
//! 3. Edits write through the data store and push the affected chunks to the
//!    front of the mesh queue
//! 4. Completed meshes are swapped into the mesh store and picked up by `World::render`
//!
//! ## Thread Safety
//!
//! The voxel system is designed to be thread-safe:
//!
//! * Every store and queue has its own lock; none is held across generation or meshing
//! * Readers copy data out rather than holding references into a store
//! * The only nested locks are structure ledger, then data store

pub mod block;
pub mod chunk;
pub mod generation;
pub mod tasks;
pub mod world;
