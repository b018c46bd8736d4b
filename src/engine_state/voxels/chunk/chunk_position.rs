use std::fmt;

use cgmath::Point3;

use crate::engine_state::voxels::block::BlockSide;

use super::CHUNK_WIDTH;

/// Identifies one vertical column of the world by its chunk coordinates.
///
/// Height is not part of the key: every column spans the full world height.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkPosition {
    pub x: i32,
    pub z: i32,
}

impl ChunkPosition {
    pub const ORIGIN: ChunkPosition = ChunkPosition { x: 0, z: 0 };

    pub const fn new(x: i32, z: i32) -> Self {
        ChunkPosition { x, z }
    }

    /// The chunk containing a world-space point (the observer's eye, for example).
    pub fn containing(point: Point3<f32>) -> Self {
        ChunkPosition {
            x: (point.x / CHUNK_WIDTH as f32).floor() as i32,
            z: (point.z / CHUNK_WIDTH as f32).floor() as i32,
        }
    }

    /// The chunk across the given horizontal face.
    ///
    /// `TOP` and `BOTTOM` return `self`; there is no vertical chunking.
    pub fn neighbor(self, side: BlockSide) -> Self {
        let normal = side.normal();
        ChunkPosition {
            x: self.x + normal.x,
            z: self.z + normal.z,
        }
    }

    /// The four horizontal neighbors, in `BlockSide::horizontal()` order.
    pub fn neighbors(self) -> [ChunkPosition; 4] {
        BlockSide::horizontal().map(|side| self.neighbor(side))
    }

    /// Chessboard distance in chunks; the streaming square is a ball of this metric.
    pub fn chebyshev_distance(self, other: ChunkPosition) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }

    /// World-space coordinates of this chunk's (0, 0, 0) block.
    pub fn world_origin(self) -> Point3<i32> {
        Point3::new(self.x * CHUNK_WIDTH, 0, self.z * CHUNK_WIDTH)
    }

    /// Every chunk within `radius` of `self`, nearest rings first.
    pub fn square_around(self, radius: i32) -> Vec<ChunkPosition> {
        let mut positions = Vec::with_capacity(((2 * radius + 1) * (2 * radius + 1)) as usize);
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                positions.push(ChunkPosition::new(self.x + dx, self.z + dz));
            }
        }
        positions.sort_by_key(|pos| (pos.chebyshev_distance(self), pos.x, pos.z));
        positions
    }
}

impl fmt::Display for ChunkPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}
