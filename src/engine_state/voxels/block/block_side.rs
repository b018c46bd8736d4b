//! # Block Side Module
//!
//! This module defines the six faces of a voxel block and the bit flags the
//! input layer uses to report which face a ray hit.

use cgmath::{Point3, Vector3};

/// Represents the six possible faces of a voxel block.
///
/// The discriminants are the face bits reported by ray casting, so a set of
/// faces fits in a single `u8` mask.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// Facing negative Z
    NORTH = 1,
    /// Facing positive Z
    SOUTH = 2,
    /// Facing negative X
    WEST = 4,
    /// Facing positive X
    EAST = 8,
    /// Facing negative Y
    BOTTOM = 16,
    /// Facing positive Y
    TOP = 32,
}

impl BlockSide {
    /// Returns all six faces.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::NORTH,
            BlockSide::SOUTH,
            BlockSide::WEST,
            BlockSide::EAST,
            BlockSide::BOTTOM,
            BlockSide::TOP,
        ]
    }

    /// The four faces that touch a horizontal neighbor chunk.
    pub fn horizontal() -> [BlockSide; 4] {
        [
            BlockSide::NORTH,
            BlockSide::SOUTH,
            BlockSide::WEST,
            BlockSide::EAST,
        ]
    }

    pub fn bit(self) -> u8 {
        self as u8
    }

    /// Decodes a single face bit. Returns `None` for zero or multi-bit masks.
    pub fn from_bit(bit: u8) -> Option<Self> {
        BlockSide::all().into_iter().find(|side| side.bit() == bit)
    }

    /// All faces present in `mask`.
    pub fn from_mask(mask: u8) -> Vec<BlockSide> {
        BlockSide::all()
            .into_iter()
            .filter(|side| mask & side.bit() != 0)
            .collect()
    }

    /// Unit offset toward the block this face touches.
    pub fn normal(self) -> Vector3<i32> {
        match self {
            BlockSide::NORTH => Vector3::new(0, 0, -1),
            BlockSide::SOUTH => Vector3::new(0, 0, 1),
            BlockSide::WEST => Vector3::new(-1, 0, 0),
            BlockSide::EAST => Vector3::new(1, 0, 0),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
        }
    }

    pub fn opposite(self) -> BlockSide {
        match self {
            BlockSide::NORTH => BlockSide::SOUTH,
            BlockSide::SOUTH => BlockSide::NORTH,
            BlockSide::WEST => BlockSide::EAST,
            BlockSide::EAST => BlockSide::WEST,
            BlockSide::BOTTOM => BlockSide::TOP,
            BlockSide::TOP => BlockSide::BOTTOM,
        }
    }

    /// The block position touching this face of `pos`.
    ///
    /// This is where a block is placed when the player clicks this face.
    pub fn adjacent(self, pos: Point3<i32>) -> Point3<i32> {
        pos + self.normal()
    }
}
