//! # Chunk Module
//!
//! This module provides `ChunkData`, the dense voxel column that is the unit of
//! generation, meshing and eviction, together with the coordinate types used to
//! address it and the shared store that owns every resident column.
//!
//! ## Layout
//!
//! A chunk is `CHUNK_WIDTH` blocks wide on x and z and spans the whole world
//! height (`CHUNK_HEIGHT`). Blocks are stored one `BlockType` per cell in a
//! single `Vec`, indexed as
//!
//! ```text
//! index = x + y * CHUNK_WIDTH + z * CHUNK_WIDTH * CHUNK_HEIGHT
//! ```
//!
//! Every reader and writer (terrain generation, structure placement, edits and
//! the mesh builder) goes through [`block_index`], so the formula lives in one
//! place.
//!
//! ## Neighbor edges
//!
//! Meshing a chunk needs to know what lies just across each horizontal face.
//! Rather than holding four neighbor columns locked for the whole build, the
//! store copies out each neighbor's boundary plane as a [`ChunkEdge`]
//! (`CHUNK_WIDTH * CHUNK_HEIGHT` blocks) and the build runs on those copies.

use crate::engine_state::voxels::block::{BlockSide, BlockType};

pub mod chunk_position;
pub mod coords;
pub mod data_store;

pub use chunk_position::ChunkPosition;
pub use coords::BlockLocation;
pub use data_store::{ChunkDataStore, MeshInput};

/// Width and depth of a chunk in blocks.
pub const CHUNK_WIDTH: i32 = 16;
/// Height of every chunk column in blocks.
pub const CHUNK_HEIGHT: i32 = 128;
/// Number of blocks in one horizontal slice of a chunk.
pub const CHUNK_PLANE_SIZE: usize = (CHUNK_WIDTH * CHUNK_WIDTH) as usize;
/// Total number of blocks in a chunk.
pub const CHUNK_SIZE: usize = CHUNK_PLANE_SIZE * CHUNK_HEIGHT as usize;
/// Number of blocks in one vertical boundary plane of a chunk.
pub const CHUNK_EDGE_SIZE: usize = (CHUNK_WIDTH * CHUNK_HEIGHT) as usize;

/// Maps chunk-local coordinates to the index into `ChunkData::blocks`.
#[inline]
pub fn block_index(x: usize, y: usize, z: usize) -> usize {
    debug_assert!(x < CHUNK_WIDTH as usize && z < CHUNK_WIDTH as usize);
    debug_assert!(y < CHUNK_HEIGHT as usize);
    x + y * CHUNK_WIDTH as usize + z * CHUNK_WIDTH as usize * CHUNK_HEIGHT as usize
}

/// The voxel column for one chunk.
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkData {
    /// The chunk coordinates of this column.
    pub position: ChunkPosition,
    /// Dense block storage, always exactly `CHUNK_SIZE` long.
    blocks: Vec<BlockType>,
    /// Stamp of the last insert or edit, assigned by the store.
    revision: u64,
}

impl ChunkData {
    /// Creates a column filled with air.
    pub fn new(position: ChunkPosition) -> Self {
        ChunkData {
            position,
            blocks: vec![BlockType::AIR; CHUNK_SIZE],
            revision: 0,
        }
    }

    pub fn get(&self, x: usize, y: usize, z: usize) -> BlockType {
        self.blocks[block_index(x, y, z)]
    }

    pub fn set(&mut self, x: usize, y: usize, z: usize, block: BlockType) {
        self.blocks[block_index(x, y, z)] = block;
    }

    pub fn get_index(&self, index: usize) -> BlockType {
        self.blocks[index]
    }

    pub fn set_index(&mut self, index: usize, block: BlockType) {
        self.blocks[index] = block;
    }

    /// Like `get`, but heights outside the column read as `None`.
    pub fn get_checked(&self, x: usize, y: i32, z: usize) -> Option<BlockType> {
        if (0..CHUNK_HEIGHT).contains(&y) {
            Some(self.get(x, y as usize, z))
        } else {
            None
        }
    }

    pub fn blocks(&self) -> &[BlockType] {
        &self.blocks
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn set_revision(&mut self, revision: u64) {
        self.revision = revision;
    }

    /// Height of the highest non-air block in the given column, if any.
    pub fn surface_height(&self, x: usize, z: usize) -> Option<usize> {
        (0..CHUNK_HEIGHT as usize)
            .rev()
            .find(|&y| !self.get(x, y, z).is_air())
    }

    /// Copies out the boundary plane on the given horizontal face.
    ///
    /// Returns `None` for `TOP`/`BOTTOM`, which never border another chunk.
    pub fn edge(&self, side: BlockSide) -> Option<ChunkEdge> {
        let last = CHUNK_WIDTH as usize - 1;
        let (fixed_x, fixed_z) = match side {
            BlockSide::NORTH => (None, Some(0)),
            BlockSide::SOUTH => (None, Some(last)),
            BlockSide::WEST => (Some(0), None),
            BlockSide::EAST => (Some(last), None),
            BlockSide::BOTTOM | BlockSide::TOP => return None,
        };

        let mut blocks = Vec::with_capacity(CHUNK_EDGE_SIZE);
        for y in 0..CHUNK_HEIGHT as usize {
            for u in 0..CHUNK_WIDTH as usize {
                let x = fixed_x.unwrap_or(u);
                let z = fixed_z.unwrap_or(u);
                blocks.push(self.get(x, y, z));
            }
        }

        Some(ChunkEdge { side, blocks })
    }
}

/// A copy of one boundary plane of a chunk.
///
/// `u` runs along the face: x for `NORTH`/`SOUTH` faces, z for `WEST`/`EAST`.
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkEdge {
    /// The face of the source chunk this plane was taken from.
    pub side: BlockSide,
    blocks: Vec<BlockType>,
}

impl ChunkEdge {
    pub fn get(&self, u: usize, y: usize) -> BlockType {
        debug_assert!(u < CHUNK_WIDTH as usize && y < CHUNK_HEIGHT as usize);
        self.blocks[u + y * CHUNK_WIDTH as usize]
    }
}

/// The boundary planes facing a chunk, one per horizontal side.
///
/// Slot order follows `BlockSide::horizontal()`. Each slot holds the plane of
/// the neighbor across that side (its opposite face), or `None` when the
/// neighbor has no data yet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NeighborEdges {
    pub edges: [Option<ChunkEdge>; 4],
}

impl NeighborEdges {
    /// The neighbor block just across `side`, at offset `u` along the face.
    ///
    /// Missing neighbors read as air.
    pub fn block_across(&self, side: BlockSide, u: usize, y: usize) -> BlockType {
        horizontal_slot(side)
            .and_then(|slot| self.edges[slot].as_ref())
            .map(|edge| edge.get(u, y))
            .unwrap_or(BlockType::AIR)
    }

    pub fn is_missing(&self, side: BlockSide) -> bool {
        horizontal_slot(side).is_some_and(|slot| self.edges[slot].is_none())
    }
}

/// Index of a horizontal side in `BlockSide::horizontal()` order.
pub fn horizontal_slot(side: BlockSide) -> Option<usize> {
    BlockSide::horizontal().iter().position(|&s| s == side)
}
