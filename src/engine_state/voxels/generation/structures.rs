//! Multi-block features planted on top of the terrain.
//!
//! A structure is expanded into a list of world-space blocks. Blocks landing in
//! the chunk being generated are written straight into it; the rest become
//! [`StructureBlock`] requests for the chunk that owns them.

use cgmath::Point3;

use crate::engine_state::voxels::block::BlockType;
use crate::engine_state::voxels::chunk::{BlockLocation, ChunkData, ChunkPosition};

/// A structure block waiting to be merged into another chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct StructureBlock {
    /// The chunk that owns `world_position`.
    pub target: ChunkPosition,
    pub world_position: Point3<i32>,
    pub block: BlockType,
}

impl StructureBlock {
    /// Builds a request for a world position. Returns `None` outside the column height.
    pub fn at(world_position: Point3<i32>, block: BlockType) -> Option<Self> {
        let location = BlockLocation::from_world(world_position)?;
        Some(StructureBlock {
            target: location.chunk,
            world_position,
            block,
        })
    }

    pub fn location(&self) -> Option<BlockLocation> {
        BlockLocation::from_world(self.world_position)
    }

    /// Merges this block into its target column.
    ///
    /// Structures never replace terrain: only air is overwritten. Returns whether
    /// the column changed.
    pub fn apply(&self, data: &mut ChunkData) -> bool {
        debug_assert_eq!(data.position, self.target);
        match self.location() {
            Some(location) if data.get_index(location.index()).is_air() => {
                data.set_index(location.index(), self.block);
                true
            }
            _ => false,
        }
    }
}

/// Expands an oak tree rooted at `base` (the first air block above the grass).
///
/// Trunk blocks come first so that the canopy never replaces wood.
pub fn oak_tree(base: Point3<i32>, rng: &mut fastrand::Rng) -> Vec<(Point3<i32>, BlockType)> {
    let trunk_height = 4 + rng.i32(0..2);
    let mut blocks = Vec::new();

    for dy in 0..trunk_height {
        blocks.push((Point3::new(base.x, base.y + dy, base.z), BlockType::OAK_WOOD));
    }

    let crown = base.y + trunk_height;
    for y in crown - 2..=crown + 1 {
        let radius: i32 = if y >= crown { 1 } else { 2 };
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                // Round off the canopy corners.
                if dx.abs() == radius && dz.abs() == radius && radius > 1 {
                    continue;
                }
                blocks.push((Point3::new(base.x + dx, y, base.z + dz), BlockType::OAK_LEAVES));
            }
        }
    }

    blocks
}

/// Places structure blocks into `data` or collects them for other chunks.
pub fn place_blocks(
    data: &mut ChunkData,
    blocks: impl IntoIterator<Item = (Point3<i32>, BlockType)>,
    overflow: &mut Vec<StructureBlock>,
) {
    for (world_position, block) in blocks {
        let Some(request) = StructureBlock::at(world_position, block) else {
            continue;
        };
        if request.target == data.position {
            request.apply(data);
        } else if !overflow.contains(&request) {
            overflow.push(request);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure_blocks_only_replace_air() {
        let mut data = ChunkData::new(ChunkPosition::ORIGIN);
        data.set(1, 10, 1, BlockType::STONE);

        let onto_stone = StructureBlock::at(Point3::new(1, 10, 1), BlockType::OAK_LEAVES).unwrap();
        let onto_air = StructureBlock::at(Point3::new(1, 11, 1), BlockType::OAK_LEAVES).unwrap();

        assert!(!onto_stone.apply(&mut data));
        assert!(onto_air.apply(&mut data));
        assert_eq!(data.get(1, 10, 1), BlockType::STONE);
        assert_eq!(data.get(1, 11, 1), BlockType::OAK_LEAVES);
    }

    #[test]
    fn tree_at_chunk_corner_spills_into_neighbors() {
        let mut data = ChunkData::new(ChunkPosition::ORIGIN);
        let mut overflow = Vec::new();
        let mut rng = fastrand::Rng::with_seed(7);

        place_blocks(&mut data, oak_tree(Point3::new(0, 40, 0), &mut rng), &mut overflow);

        assert_eq!(data.get(0, 40, 0), BlockType::OAK_WOOD);
        assert!(!overflow.is_empty());
        assert!(overflow.iter().all(|b| b.target != ChunkPosition::ORIGIN));
        assert!(overflow.iter().any(|b| b.target == ChunkPosition::new(-1, -1)));
        assert!(overflow
            .iter()
            .all(|b| b.location().map(|l| l.chunk) == Some(b.target)));
    }

    #[test]
    fn oak_canopy_rounds_only_the_wide_layers() {
        let base = Point3::new(0, 40, 0);
        let blocks = oak_tree(base, &mut fastrand::Rng::with_seed(3));

        let trunk = blocks.iter().filter(|(_, b)| *b == BlockType::OAK_WOOD).count() as i32;
        assert!((4..=5).contains(&trunk));
        let leaves: Vec<_> = blocks
            .iter()
            .filter(|(_, b)| *b == BlockType::OAK_LEAVES)
            .map(|(p, _)| *p)
            .collect();
        assert_eq!(leaves.len(), 2 * 21 + 2 * 9);

        let crown = base.y + trunk;
        assert!(!leaves.contains(&Point3::new(2, crown - 2, 2)));
        assert!(leaves.contains(&Point3::new(2, crown - 2, 1)));
        assert!(leaves.contains(&Point3::new(-1, crown + 1, -1)));
        assert!(leaves.iter().all(|p| (crown - 2..=crown + 1).contains(&p.y)));
    }

    #[test]
    fn blocks_above_the_column_are_dropped() {
        assert!(StructureBlock::at(Point3::new(0, 500, 0), BlockType::OAK_LEAVES).is_none());
    }
}
