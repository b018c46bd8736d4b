use cgmath::Point3;
use noise::{NoiseFn, Perlin};

use crate::engine_state::voxels::block::BlockType;
use crate::engine_state::voxels::chunk::{ChunkData, ChunkPosition, CHUNK_HEIGHT, CHUNK_WIDTH};

use super::structures::{oak_tree, place_blocks};
use super::{GeneratedChunk, TerrainGenerator};

/// Average surface height.
const BASE_HEIGHT: f64 = 48.0;
/// Height swing of the broad hills.
const HILL_AMPLITUDE: f64 = 28.0;
/// Height swing of the small bumps layered on top.
const DETAIL_AMPLITUDE: f64 = 4.0;
const HILL_SCALE: f64 = 0.008;
const DETAIL_SCALE: f64 = 0.05;

/// Everything at or below this height that is not terrain is water.
pub const SEA_LEVEL: usize = 44;
/// Surfaces above this height are snow.
pub const SNOW_LINE: usize = 78;
/// Lowest possible surface; keeps a solid floor under every column.
const MIN_SURFACE: usize = 8;
/// Room left above the highest surface for trees.
const SKY_MARGIN: usize = 12;
/// Chance that a grass column grows a tree.
const TREE_CHANCE: f32 = 0.01;

/// Heightmap terrain driven by two octaves of Perlin noise.
pub struct PerlinTerrainGenerator {
    seed: u32,
    perlin: Perlin,
}

impl PerlinTerrainGenerator {
    pub fn new(seed: u32) -> Self {
        PerlinTerrainGenerator {
            seed,
            perlin: Perlin::new(seed),
        }
    }

    /// Height of the top terrain block of the column at world (x, z).
    pub fn surface_height(&self, wx: i32, wz: i32) -> usize {
        let (x, z) = (wx as f64, wz as f64);
        let hills = self.perlin.get([x * HILL_SCALE, z * HILL_SCALE]);
        let detail = self.perlin.get([x * DETAIL_SCALE, z * DETAIL_SCALE]);
        let height = BASE_HEIGHT + hills * HILL_AMPLITUDE + detail * DETAIL_AMPLITUDE;

        (height.round().max(0.0) as usize).clamp(MIN_SURFACE, CHUNK_HEIGHT as usize - SKY_MARGIN)
    }

    fn surface_block(height: usize) -> BlockType {
        if height <= SEA_LEVEL + 1 {
            BlockType::SAND
        } else if height > SNOW_LINE {
            BlockType::SNOW
        } else {
            BlockType::GRASS
        }
    }

    /// Per-column RNG, so a tree decision never depends on generation order.
    fn column_rng(&self, wx: i32, wz: i32) -> fastrand::Rng {
        let seed = (self.seed as u64)
            ^ (wx as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ (wz as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
        fastrand::Rng::with_seed(seed)
    }
}

impl Default for PerlinTerrainGenerator {
    fn default() -> Self {
        PerlinTerrainGenerator::new(0)
    }
}

impl TerrainGenerator for PerlinTerrainGenerator {
    fn generate(&self, position: ChunkPosition) -> GeneratedChunk {
        let mut data = ChunkData::new(position);
        let mut overflow = Vec::new();
        let origin = position.world_origin();
        let mut tree_roots = Vec::new();

        for z in 0..CHUNK_WIDTH as usize {
            for x in 0..CHUNK_WIDTH as usize {
                let wx = origin.x + x as i32;
                let wz = origin.z + z as i32;
                let height = self.surface_height(wx, wz);
                let top = Self::surface_block(height);

                data.set(x, 0, z, BlockType::BEDROCK);
                for y in 1..height {
                    let block = if y + 3 >= height { BlockType::DIRT } else { BlockType::STONE };
                    data.set(x, y, z, block);
                }
                data.set(x, height, z, top);

                for y in height + 1..=SEA_LEVEL {
                    data.set(x, y, z, BlockType::WATER);
                }

                if top == BlockType::GRASS && self.column_rng(wx, wz).f32() < TREE_CHANCE {
                    tree_roots.push(Point3::new(wx, height as i32 + 1, wz));
                }
            }
        }

        for root in tree_roots {
            let mut rng = self.column_rng(root.x, root.z);
            // Skip the draw already spent on the planting decision.
            rng.f32();
            place_blocks(&mut data, oak_tree(root, &mut rng), &mut overflow);
        }

        GeneratedChunk { data, overflow }
    }
}
