//! Mesh generation and storage for chunk rendering.
//!
//! # Architecture
//! - `block_geometry`: the capability table mapping block types to render strategies
//! - `mesh/`: the mesh builder and the `ChunkMesh`/`MeshPass` data types
//! - `mesh_store`: the shared map of resident meshes read by the render step

pub mod block_geometry;
pub mod mesh;
pub mod mesh_store;

pub use block_geometry::{AtlasRect, BlockGeometryTable, RenderStrategy};
pub use mesh::{build_chunk_mesh, build_focus_mesh, ChunkMesh, Face, MeshPass, LIQUID_SURFACE_HEIGHT};
pub use mesh_store::ChunkMeshStore;
