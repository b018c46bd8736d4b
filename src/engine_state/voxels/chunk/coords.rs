//! World-space to chunk-space conversion.
//!
//! Horizontal coordinates floor-divide into a chunk and a local offset in
//! `[0, CHUNK_WIDTH)`, including for negative inputs (`x = -1` lands in chunk
//! `-1` at local `15`). Vertical coordinates are not chunked: a `y` outside
//! `[0, CHUNK_HEIGHT)` has no location at all.

use cgmath::Point3;

use crate::engine_state::voxels::block::BlockSide;

use super::{ChunkPosition, CHUNK_HEIGHT, CHUNK_WIDTH};

/// A block address split into its chunk and its offset inside that chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlockLocation {
    pub chunk: ChunkPosition,
    pub local_x: usize,
    pub local_y: usize,
    pub local_z: usize,
}

impl BlockLocation {
    /// Splits a world position into chunk and local coordinates.
    ///
    /// Returns `None` when `y` falls outside the column.
    pub fn from_world(pos: Point3<i32>) -> Option<Self> {
        if !(0..CHUNK_HEIGHT).contains(&pos.y) {
            return None;
        }

        Some(BlockLocation {
            chunk: ChunkPosition::new(pos.x.div_euclid(CHUNK_WIDTH), pos.z.div_euclid(CHUNK_WIDTH)),
            local_x: pos.x.rem_euclid(CHUNK_WIDTH) as usize,
            local_y: pos.y as usize,
            local_z: pos.z.rem_euclid(CHUNK_WIDTH) as usize,
        })
    }

    /// Builds a location from chunk-local coordinates.
    ///
    /// Panics in debug builds if the coordinates are outside the chunk.
    pub fn new(chunk: ChunkPosition, local_x: usize, local_y: usize, local_z: usize) -> Self {
        debug_assert!(local_x < CHUNK_WIDTH as usize);
        debug_assert!(local_y < CHUNK_HEIGHT as usize);
        debug_assert!(local_z < CHUNK_WIDTH as usize);
        BlockLocation {
            chunk,
            local_x,
            local_y,
            local_z,
        }
    }

    /// Reassembles the world position this location was split from.
    pub fn to_world(self) -> Point3<i32> {
        let origin = self.chunk.world_origin();
        Point3::new(
            origin.x + self.local_x as i32,
            self.local_y as i32,
            origin.z + self.local_z as i32,
        )
    }

    /// Index into the chunk's dense block array.
    pub fn index(self) -> usize {
        super::block_index(self.local_x, self.local_y, self.local_z)
    }

    /// The horizontal faces of the chunk this block touches.
    ///
    /// A block on such a face affects the neighbor's face culling, so editing it
    /// must remesh the neighbor as well.
    pub fn boundary_sides(self) -> Vec<BlockSide> {
        let last = CHUNK_WIDTH as usize - 1;
        let mut sides = Vec::new();
        if self.local_z == 0 {
            sides.push(BlockSide::NORTH);
        }
        if self.local_z == last {
            sides.push(BlockSide::SOUTH);
        }
        if self.local_x == 0 {
            sides.push(BlockSide::WEST);
        }
        if self.local_x == last {
            sides.push(BlockSide::EAST);
        }
        sides
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_coordinates_wrap_into_previous_chunk() {
        let location = BlockLocation::from_world(Point3::new(-1, 5, -1)).unwrap();
        assert_eq!(location.chunk, ChunkPosition::new(-1, -1));
        assert_eq!((location.local_x, location.local_z), (15, 15));

        let location = BlockLocation::from_world(Point3::new(-16, 0, -17)).unwrap();
        assert_eq!(location.chunk, ChunkPosition::new(-1, -2));
        assert_eq!((location.local_x, location.local_z), (0, 15));

        let location = BlockLocation::from_world(Point3::new(16, 127, 15)).unwrap();
        assert_eq!(location.chunk, ChunkPosition::new(1, 0));
        assert_eq!((location.local_x, location.local_y, location.local_z), (0, 127, 15));
    }

    #[test]
    fn conversion_round_trips() {
        for wx in -70..70 {
            for wz in [-33, -16, -1, 0, 1, 15, 16, 40] {
                let pos = Point3::new(wx, 12, wz);
                let location = BlockLocation::from_world(pos).unwrap();
                assert!(location.local_x < CHUNK_WIDTH as usize);
                assert!(location.local_z < CHUNK_WIDTH as usize);
                assert_eq!(location.to_world(), pos);
            }
        }
    }

    #[test]
    fn out_of_column_heights_have_no_location() {
        assert_eq!(BlockLocation::from_world(Point3::new(0, -1, 0)), None);
        assert_eq!(BlockLocation::from_world(Point3::new(0, CHUNK_HEIGHT, 0)), None);
    }

    #[test]
    fn boundary_sides_cover_edges_and_corners() {
        let chunk = ChunkPosition::ORIGIN;
        assert!(BlockLocation::new(chunk, 7, 3, 7).boundary_sides().is_empty());
        assert_eq!(BlockLocation::new(chunk, 0, 3, 7).boundary_sides(), vec![BlockSide::WEST]);
        assert_eq!(BlockLocation::new(chunk, 15, 3, 7).boundary_sides(), vec![BlockSide::EAST]);
        assert_eq!(
            BlockLocation::new(chunk, 0, 3, 15).boundary_sides(),
            vec![BlockSide::SOUTH, BlockSide::WEST]
        );
    }
}
