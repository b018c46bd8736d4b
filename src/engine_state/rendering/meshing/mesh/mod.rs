//! Mesh generation for voxel chunks.
//!
//! This module converts a chunk column into a `ChunkMesh`. Building is a pure
//! function of a `MeshInput` (the column plus copies of its neighbors' facing
//! planes) and the `BlockGeometryTable`; it takes no locks and touches no
//! shared state.
//!
//! # Face rules
//! - Solid faces are emitted unless the adjacent block is opaque. Two
//!   transparent solids of the same type also hide each other.
//! - Liquid faces are emitted only toward air. A liquid with no liquid above
//!   it has its top lowered to `LIQUID_SURFACE_HEIGHT`.
//! - Below the column counts as opaque, above it counts as air, and a missing
//!   neighbor chunk counts as air.

mod face;
#[allow(clippy::module_inception)]
mod mesh;

use cgmath::Point3;

pub use face::Face;
pub use mesh::{ChunkMesh, MeshPass};

use crate::engine_state::voxels::block::{BlockSide, BlockType};
use crate::engine_state::voxels::chunk::{MeshInput, CHUNK_HEIGHT, CHUNK_WIDTH};

use super::block_geometry::{BlockGeometryTable, RenderStrategy};

/// Height of a liquid's top face when nothing liquid sits above it.
pub const LIQUID_SURFACE_HEIGHT: f32 = 0.875;

/// What lies across one face of a block.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Adjacent {
    Block(BlockType),
    BelowWorld,
    AboveWorld,
}

fn adjacent(input: &MeshInput, x: usize, y: usize, z: usize, side: BlockSide) -> Adjacent {
    let last = CHUNK_WIDTH as usize - 1;
    let data = &input.data;
    match side {
        BlockSide::BOTTOM if y == 0 => Adjacent::BelowWorld,
        BlockSide::BOTTOM => Adjacent::Block(data.get(x, y - 1, z)),
        BlockSide::TOP if y + 1 == CHUNK_HEIGHT as usize => Adjacent::AboveWorld,
        BlockSide::TOP => Adjacent::Block(data.get(x, y + 1, z)),
        BlockSide::NORTH if z == 0 => Adjacent::Block(input.neighbors.block_across(side, x, y)),
        BlockSide::NORTH => Adjacent::Block(data.get(x, y, z - 1)),
        BlockSide::SOUTH if z == last => Adjacent::Block(input.neighbors.block_across(side, x, y)),
        BlockSide::SOUTH => Adjacent::Block(data.get(x, y, z + 1)),
        BlockSide::WEST if x == 0 => Adjacent::Block(input.neighbors.block_across(side, z, y)),
        BlockSide::WEST => Adjacent::Block(data.get(x - 1, y, z)),
        BlockSide::EAST if x == last => Adjacent::Block(input.neighbors.block_across(side, z, y)),
        BlockSide::EAST => Adjacent::Block(data.get(x + 1, y, z)),
    }
}

/// Builds the mesh for one chunk.
pub fn build_chunk_mesh(input: &MeshInput, table: &BlockGeometryTable) -> ChunkMesh {
    let mut opaque = MeshPass::new();
    let mut transparent = MeshPass::new();
    let origin = input.data.position.world_origin();

    for z in 0..CHUNK_WIDTH as usize {
        for y in 0..CHUNK_HEIGHT as usize {
            for x in 0..CHUNK_WIDTH as usize {
                let block = input.data.get(x, y, z);
                let strategy = table.strategy(block);
                let block_origin = Point3::new(
                    (origin.x + x as i32) as f32,
                    y as f32,
                    (origin.z + z as i32) as f32,
                );

                match strategy {
                    RenderStrategy::Empty => {}
                    RenderStrategy::Solid { transparent: see_through, .. } => {
                        let pass = if see_through { &mut transparent } else { &mut opaque };
                        for side in BlockSide::all() {
                            let visible = match adjacent(input, x, y, z, side) {
                                Adjacent::BelowWorld => false,
                                Adjacent::AboveWorld => true,
                                Adjacent::Block(other) => {
                                    !table.is_opaque(other) && !(see_through && other == block)
                                }
                            };
                            if let (true, Some(texture)) = (visible, strategy.texture(side)) {
                                pass.push_face(&Face::new(block_origin, side, 1.0), texture);
                            }
                        }
                    }
                    RenderStrategy::Liquid { surface } => {
                        let liquid_above = matches!(
                            adjacent(input, x, y, z, BlockSide::TOP),
                            Adjacent::Block(above) if matches!(table.strategy(above), RenderStrategy::Liquid { .. })
                        );
                        let height = if liquid_above { 1.0 } else { LIQUID_SURFACE_HEIGHT };

                        for side in BlockSide::all() {
                            let visible = match adjacent(input, x, y, z, side) {
                                Adjacent::BelowWorld => false,
                                Adjacent::AboveWorld => true,
                                Adjacent::Block(other) => other.is_air(),
                            };
                            if visible {
                                transparent.push_face(&Face::new(block_origin, side, height), surface);
                            }
                        }
                    }
                }
            }
        }
    }

    log::trace!(
        "Built mesh for chunk {}: {} opaque / {} transparent quads",
        input.data.position,
        opaque.quad_count(),
        transparent.quad_count()
    );

    ChunkMesh::new(
        input.data.position,
        opaque,
        transparent,
        input.data.revision(),
        input.neighbors_present(),
    )
}

/// Builds the highlight drawn over the aimed-at block.
///
/// `face_mask` is a set of `BlockSide` bits; one quad is emitted per set bit.
pub fn build_focus_mesh(position: Point3<i32>, face_mask: u8, table: &BlockGeometryTable) -> MeshPass {
    let mut pass = MeshPass::new();
    let strategy = table.strategy(BlockType::FOCUS);
    let origin = position.cast::<f32>().unwrap_or(Point3::new(0.0, 0.0, 0.0));

    for side in BlockSide::from_mask(face_mask) {
        if let Some(texture) = strategy.texture(side) {
            pass.push_face(&Face::new(origin, side, 1.0), texture);
        }
    }

    pass
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::chunk::{ChunkData, ChunkPosition, NeighborEdges};

    fn input_for(data: ChunkData) -> MeshInput {
        MeshInput {
            data,
            neighbors: NeighborEdges::default(),
        }
    }

    fn table() -> BlockGeometryTable {
        BlockGeometryTable::standard()
    }

    #[test]
    fn empty_chunk_has_no_geometry() {
        let mesh = build_chunk_mesh(&input_for(ChunkData::new(ChunkPosition::ORIGIN)), &table());
        assert_eq!(mesh.quad_count(), 0);
    }

    #[test]
    fn lone_block_shows_all_six_faces() {
        let mut data = ChunkData::new(ChunkPosition::new(2, -1));
        data.set(5, 10, 5, BlockType::STONE);
        let mesh = build_chunk_mesh(&input_for(data), &table());

        assert_eq!(mesh.opaque.quad_count(), 6);
        assert_eq!(mesh.opaque.vertices.len(), 24);
        assert_eq!(mesh.opaque.indices.len(), 36);
        assert!(mesh.transparent.is_empty());
        // Vertices are in world space.
        assert!(mesh.opaque.vertices.iter().all(|v| v.position[0] >= 37.0 && v.position[0] <= 38.0));
        assert!(mesh.opaque.vertices.iter().all(|v| v.position[2] >= -11.0 && v.position[2] <= -10.0));
    }

    #[test]
    fn touching_solids_hide_shared_faces() {
        let mut data = ChunkData::new(ChunkPosition::ORIGIN);
        data.set(5, 10, 5, BlockType::STONE);
        data.set(6, 10, 5, BlockType::DIRT);
        let mesh = build_chunk_mesh(&input_for(data), &table());
        assert_eq!(mesh.opaque.quad_count(), 10);
    }

    #[test]
    fn floor_of_the_world_is_never_drawn() {
        let mut data = ChunkData::new(ChunkPosition::ORIGIN);
        data.set(5, 0, 5, BlockType::BEDROCK);
        let mesh = build_chunk_mesh(&input_for(data), &table());
        assert_eq!(mesh.opaque.quad_count(), 5);
        assert!(mesh.opaque.vertices.iter().all(|v| v.normal != [0.0, -1.0, 0.0]));
    }

    #[test]
    fn leaves_cull_each_other_but_not_stone() {
        let mut data = ChunkData::new(ChunkPosition::ORIGIN);
        data.set(5, 10, 5, BlockType::OAK_LEAVES);
        data.set(6, 10, 5, BlockType::OAK_LEAVES);
        data.set(5, 11, 5, BlockType::STONE);
        let mesh = build_chunk_mesh(&input_for(data), &table());

        // Two leaves: 12 faces, minus the shared pair, minus the top hidden by stone.
        assert_eq!(mesh.transparent.quad_count(), 9);
        // Stone keeps its bottom face over the leaves.
        assert_eq!(mesh.opaque.quad_count(), 6);
    }

    #[test]
    fn liquid_surface_is_lowered_unless_covered_by_liquid() {
        let mut data = ChunkData::new(ChunkPosition::ORIGIN);
        data.set(5, 10, 5, BlockType::WATER);
        data.set(5, 11, 5, BlockType::WATER);
        data.set(5, 9, 5, BlockType::SAND);
        let mesh = build_chunk_mesh(&input_for(data), &table());

        let top_heights: Vec<f32> = mesh
            .transparent
            .vertices
            .iter()
            .filter(|v| v.normal == [0.0, 1.0, 0.0])
            .map(|v| v.position[1])
            .collect();
        assert_eq!(top_heights, vec![11.875; 4]);

        // Lower water: 4 sides. Upper water: 4 sides and a top. No water face toward the sand.
        assert_eq!(mesh.transparent.quad_count(), 9);
        // The sand top stays visible through the water.
        assert_eq!(mesh.opaque.quad_count(), 6);
    }

    #[test]
    fn neighbor_edges_cull_boundary_faces() {
        let mut data = ChunkData::new(ChunkPosition::ORIGIN);
        data.set(15, 10, 3, BlockType::STONE);

        let mut east = ChunkData::new(ChunkPosition::new(1, 0));
        east.set(0, 10, 3, BlockType::STONE);

        let mut input = input_for(data);
        assert_eq!(build_chunk_mesh(&input, &table()).opaque.quad_count(), 6);

        input.neighbors.edges[3] = east.edge(BlockSide::WEST);
        let mesh = build_chunk_mesh(&input, &table());
        assert_eq!(mesh.opaque.quad_count(), 5);
        assert_eq!(mesh.neighbors_present, [false, false, false, true]);
    }

    #[test]
    fn focus_mesh_emits_one_quad_per_face_bit() {
        let pass = build_focus_mesh(Point3::new(-3, 40, 7), BlockSide::TOP.bit() | BlockSide::NORTH.bit(), &table());
        assert_eq!(pass.quad_count(), 2);
        assert!(build_focus_mesh(Point3::new(0, 0, 0), 0, &table()).is_empty());
    }
}
