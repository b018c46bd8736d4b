//! # Terrain Generation
//!
//! Terrain generators turn a chunk position into a voxel column. They are pure
//! functions of the position and their own seed, so a chunk that is evicted and
//! later regenerated comes back identical, structure overflow included.
//!
//! ## Available generators
//! - `PerlinTerrainGenerator`: heightmap terrain with water, beaches, snow caps and trees
//! - `FlatTerrainGenerator`: constant-height layers, used for tests and benchmarks

use crate::engine_state::voxels::block::BlockType;
use crate::engine_state::voxels::chunk::{ChunkData, ChunkPosition, CHUNK_HEIGHT, CHUNK_WIDTH};

pub mod perlin;
pub mod structures;

pub use perlin::PerlinTerrainGenerator;
pub use structures::StructureBlock;

/// The output of generating one chunk.
#[derive(Clone, Debug)]
pub struct GeneratedChunk {
    pub data: ChunkData,
    /// Structure blocks that belong to other chunks.
    pub overflow: Vec<StructureBlock>,
}

/// Produces voxel data for a chunk.
///
/// Implementations are called concurrently from every data worker and must be
/// deterministic for a given position.
pub trait TerrainGenerator: Send + Sync {
    fn generate(&self, position: ChunkPosition) -> GeneratedChunk;
}

/// Flat layered terrain: bedrock, stone, three layers of dirt and a grass top.
#[derive(Copy, Clone, Debug)]
pub struct FlatTerrainGenerator {
    /// Height of the grass layer.
    pub surface: usize,
}

impl FlatTerrainGenerator {
    pub fn new(surface: usize) -> Self {
        FlatTerrainGenerator {
            surface: surface.clamp(1, CHUNK_HEIGHT as usize - 1),
        }
    }

    fn block_at_height(&self, y: usize) -> BlockType {
        match y {
            0 => BlockType::BEDROCK,
            y if y == self.surface => BlockType::GRASS,
            y if y + 3 >= self.surface && y < self.surface => BlockType::DIRT,
            y if y < self.surface => BlockType::STONE,
            _ => BlockType::AIR,
        }
    }
}

impl Default for FlatTerrainGenerator {
    fn default() -> Self {
        FlatTerrainGenerator::new(16)
    }
}

impl TerrainGenerator for FlatTerrainGenerator {
    fn generate(&self, position: ChunkPosition) -> GeneratedChunk {
        let mut data = ChunkData::new(position);
        for y in 0..=self.surface {
            let block = self.block_at_height(y);
            for z in 0..CHUNK_WIDTH as usize {
                for x in 0..CHUNK_WIDTH as usize {
                    data.set(x, y, z, block);
                }
            }
        }

        GeneratedChunk {
            data,
            overflow: Vec::new(),
        }
    }
}
