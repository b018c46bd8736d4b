use crate::engine_state::rendering::meshing::{ChunkMesh, MeshPass};
use crate::engine_state::voxels::chunk::ChunkPosition;

/// The graphics backend, as seen by the streaming core.
///
/// The core never calls a graphics API itself. During `World::render` it tells
/// the renderer which chunk meshes to upload, draw and release, all on the
/// thread that owns the renderer.
pub trait ChunkRenderer {
    /// Uploads a mesh's geometry, replacing any binding already held for `position`.
    fn upload(&mut self, position: ChunkPosition, mesh: &ChunkMesh);

    /// Draws a previously uploaded mesh.
    fn draw(&mut self, position: ChunkPosition, mesh: &ChunkMesh);

    /// Frees the binding held for an evicted chunk.
    fn release(&mut self, position: ChunkPosition);

    /// Draws the focus highlight. Called every frame, even when empty.
    fn draw_focus(&mut self, focus: &MeshPass);
}
