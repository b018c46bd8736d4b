//! # Block Type Module
//!
//! This module defines the closed set of block kinds stored in chunk data.
//! The discriminants are the storage values and never change.

use std::fmt;

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// `FromPrimitive` allows conversion from the compact storage integer.
#[repr(u8)]
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Empty space. Unresolved regions read as this.
    #[default]
    AIR = 0,
    /// Grass on top, dirt underneath.
    GRASS = 1,
    DIRT = 2,
    STONE = 3,
    /// The highlight drawn over the block the player is aiming at.
    /// Never generated by terrain.
    FOCUS = 4,
    /// Floor of every column.
    BEDROCK = 5,
    SNOW = 6,
    /// The only liquid.
    WATER = 7,
    SAND = 8,
    OAK_WOOD = 9,
    OAK_LEAVES = 10,
}

impl BlockType {
    /// Every block type, in storage order.
    pub const ALL: [BlockType; 11] = [
        BlockType::AIR,
        BlockType::GRASS,
        BlockType::DIRT,
        BlockType::STONE,
        BlockType::FOCUS,
        BlockType::BEDROCK,
        BlockType::SNOW,
        BlockType::WATER,
        BlockType::SAND,
        BlockType::OAK_WOOD,
        BlockType::OAK_LEAVES,
    ];

    /// Converts a storage integer back to a `BlockType`.
    ///
    /// Returns `None` for values outside the catalogue.
    pub fn from_int(btype: BlockTypeSize) -> Option<Self> {
        FromPrimitive::from_u8(btype)
    }

    /// Human-readable name, as shown by the block picker.
    pub fn name(self) -> &'static str {
        match self {
            BlockType::AIR => "Air",
            BlockType::GRASS => "Grass",
            BlockType::DIRT => "Dirt",
            BlockType::STONE => "Stone",
            BlockType::FOCUS => "Focus",
            BlockType::BEDROCK => "Bedrock",
            BlockType::SNOW => "Snow",
            BlockType::WATER => "Water",
            BlockType::SAND => "Sand",
            BlockType::OAK_WOOD => "Oak Wood",
            BlockType::OAK_LEAVES => "Oak Leaves",
        }
    }

    pub fn is_air(self) -> bool {
        self == BlockType::AIR
    }

    pub fn is_liquid(self) -> bool {
        self == BlockType::WATER
    }

    /// Whether light (and the camera) can see through this block.
    pub fn is_transparent(self) -> bool {
        matches!(
            self,
            BlockType::AIR | BlockType::WATER | BlockType::OAK_LEAVES
        )
    }

    /// Whether this block fully hides the faces of the blocks around it.
    pub fn is_opaque(self) -> bool {
        !self.is_transparent()
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
