//! Rendering side of the streaming pipeline.
//!
//! This module turns chunk data into renderable geometry and hands finished
//! geometry to the graphics backend. It contains the mesh builder and mesh
//! store, the mesh pool's background tasks, and the `ChunkRenderer` trait the
//! backend implements. No graphics API is called from here.

pub mod meshing;
pub mod renderer;
pub mod tasks;
mod vertex;

// Re-export commonly used types
pub use renderer::ChunkRenderer;
pub use vertex::Vertex;
