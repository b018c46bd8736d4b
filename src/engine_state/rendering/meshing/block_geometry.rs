//! How each block type is drawn.
//!
//! `BlockGeometryTable` is built once at startup and handed to the mesh builder
//! by the world. It maps every `BlockType` to a `RenderStrategy` and is never
//! mutated afterwards, so workers share it through an `Arc` without locking.

use std::collections::HashMap;

use crate::engine_state::voxels::block::{BlockSide, BlockType};

/// Number of cells along each side of the texture atlas.
pub const ATLAS_GRID: u32 = 16;

/// A rectangle of the texture atlas in normalized UV space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AtlasRect {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

impl AtlasRect {
    /// The atlas cell at `row`, `col` of the grid.
    pub fn cell(row: u32, col: u32) -> Self {
        debug_assert!(row < ATLAS_GRID && col < ATLAS_GRID);
        let size = 1.0 / ATLAS_GRID as f32;
        AtlasRect {
            u0: col as f32 * size,
            v0: row as f32 * size,
            u1: (col + 1) as f32 * size,
            v1: (row + 1) as f32 * size,
        }
    }
}

/// The drawing strategy for one block type.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RenderStrategy {
    /// Never drawn.
    Empty,
    /// A full cube with one texture for the bottom, one for the four sides and one for the top.
    Solid {
        bottom: AtlasRect,
        side: AtlasRect,
        top: AtlasRect,
        /// Drawn in the transparent pass and does not hide its neighbors.
        transparent: bool,
    },
    /// A liquid cube; only faces toward air are drawn.
    Liquid { surface: AtlasRect },
}

impl RenderStrategy {
    fn solid(bottom: u32, side: u32, top: u32) -> Self {
        RenderStrategy::Solid {
            bottom: AtlasRect::cell(0, bottom),
            side: AtlasRect::cell(0, side),
            top: AtlasRect::cell(0, top),
            transparent: false,
        }
    }

    fn uniform(cell: u32) -> Self {
        Self::solid(cell, cell, cell)
    }

    /// Whether this block hides the faces of the blocks around it.
    pub fn is_opaque(&self) -> bool {
        matches!(self, RenderStrategy::Solid { transparent: false, .. })
    }

    /// The atlas rectangle for one face.
    pub fn texture(&self, side: BlockSide) -> Option<AtlasRect> {
        match *self {
            RenderStrategy::Empty => None,
            RenderStrategy::Solid { bottom, side: sides, top, .. } => Some(match side {
                BlockSide::BOTTOM => bottom,
                BlockSide::TOP => top,
                _ => sides,
            }),
            RenderStrategy::Liquid { surface } => Some(surface),
        }
    }
}

/// Capability table from block type to render strategy.
#[derive(Clone, Debug)]
pub struct BlockGeometryTable {
    strategies: HashMap<BlockType, RenderStrategy>,
}

impl BlockGeometryTable {
    /// The table for the standard block atlas.
    pub fn standard() -> Self {
        let mut strategies = HashMap::new();
        for block in BlockType::ALL {
            let strategy = match block {
                BlockType::AIR => RenderStrategy::Empty,
                BlockType::GRASS => RenderStrategy::solid(0, 1, 2),
                BlockType::DIRT => RenderStrategy::uniform(0),
                BlockType::STONE => RenderStrategy::uniform(3),
                BlockType::FOCUS => RenderStrategy::uniform(4),
                BlockType::BEDROCK => RenderStrategy::uniform(5),
                BlockType::SNOW => RenderStrategy::uniform(6),
                BlockType::WATER => RenderStrategy::Liquid {
                    surface: AtlasRect::cell(0, 7),
                },
                BlockType::SAND => RenderStrategy::uniform(8),
                BlockType::OAK_WOOD => RenderStrategy::solid(11, 9, 11),
                BlockType::OAK_LEAVES => RenderStrategy::Solid {
                    bottom: AtlasRect::cell(0, 10),
                    side: AtlasRect::cell(0, 10),
                    top: AtlasRect::cell(0, 10),
                    transparent: true,
                },
            };
            strategies.insert(block, strategy);
        }

        BlockGeometryTable { strategies }
    }

    /// Overrides the strategy for one block type.
    pub fn with_strategy(mut self, block: BlockType, strategy: RenderStrategy) -> Self {
        self.strategies.insert(block, strategy);
        self
    }

    /// Unknown entries fall back to `Empty`.
    pub fn strategy(&self, block: BlockType) -> RenderStrategy {
        self.strategies
            .get(&block)
            .copied()
            .unwrap_or(RenderStrategy::Empty)
    }

    pub fn is_opaque(&self, block: BlockType) -> bool {
        self.strategy(block).is_opaque()
    }
}

impl Default for BlockGeometryTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_covers_every_block() {
        let table = BlockGeometryTable::standard();
        assert_eq!(table.strategy(BlockType::AIR), RenderStrategy::Empty);
        assert!(matches!(table.strategy(BlockType::WATER), RenderStrategy::Liquid { .. }));
        assert!(table.is_opaque(BlockType::STONE));
        assert!(!table.is_opaque(BlockType::OAK_LEAVES));
        assert!(!table.is_opaque(BlockType::WATER));
        for block in BlockType::ALL {
            assert_eq!(table.is_opaque(block), block.is_opaque(), "{block}");
        }
    }

    #[test]
    fn grass_uses_separate_top_side_and_bottom_cells() {
        let grass = BlockGeometryTable::standard().strategy(BlockType::GRASS);
        assert_eq!(grass.texture(BlockSide::BOTTOM), Some(AtlasRect::cell(0, 0)));
        assert_eq!(grass.texture(BlockSide::EAST), Some(AtlasRect::cell(0, 1)));
        assert_eq!(grass.texture(BlockSide::TOP), Some(AtlasRect::cell(0, 2)));
    }

    #[test]
    fn atlas_cells_tile_the_unit_square() {
        let cell = AtlasRect::cell(15, 15);
        assert_eq!(cell.u1, 1.0);
        assert_eq!(cell.v1, 1.0);
        assert_eq!(AtlasRect::cell(0, 1).u0, AtlasRect::cell(0, 0).u1);
    }
}
