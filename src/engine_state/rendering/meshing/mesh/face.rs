use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::block::BlockSide;

/// The four corners of one block face, in world space.
///
/// Corners are named as seen from outside the block: lower-left, lower-right,
/// upper-left, upper-right. Triangles `(ll, lr, ur)` and `(ll, ur, ul)` are
/// counter-clockwise when viewed from the face normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub ll: Point3<f32>,
    pub lr: Point3<f32>,
    pub ul: Point3<f32>,
    pub ur: Point3<f32>,
    pub side: BlockSide,
}

impl Face {
    /// Index pattern for one quad, relative to its first vertex.
    pub const INDICES: [u32; 6] = [0, 1, 3, 0, 3, 2];

    /// Builds the face of the block whose minimum corner is `origin`.
    ///
    /// `height` is the block's top in block units: 1.0 for full blocks, less
    /// for a lowered liquid surface.
    pub fn new(origin: Point3<f32>, side: BlockSide, height: f32) -> Self {
        let h = height;
        let corner = |x: f32, y: f32, z: f32| origin + Vector3::new(x, y, z);

        let (ll, lr, ul, ur) = match side {
            BlockSide::TOP => (corner(0.0, h, 1.0), corner(1.0, h, 1.0), corner(0.0, h, 0.0), corner(1.0, h, 0.0)),
            BlockSide::BOTTOM => (corner(0.0, 0.0, 0.0), corner(1.0, 0.0, 0.0), corner(0.0, 0.0, 1.0), corner(1.0, 0.0, 1.0)),
            BlockSide::NORTH => (corner(1.0, 0.0, 0.0), corner(0.0, 0.0, 0.0), corner(1.0, h, 0.0), corner(0.0, h, 0.0)),
            BlockSide::SOUTH => (corner(0.0, 0.0, 1.0), corner(1.0, 0.0, 1.0), corner(0.0, h, 1.0), corner(1.0, h, 1.0)),
            BlockSide::WEST => (corner(0.0, 0.0, 0.0), corner(0.0, 0.0, 1.0), corner(0.0, h, 0.0), corner(0.0, h, 1.0)),
            BlockSide::EAST => (corner(1.0, 0.0, 1.0), corner(1.0, 0.0, 0.0), corner(1.0, h, 1.0), corner(1.0, h, 0.0)),
        };

        Face { ll, lr, ul, ur, side }
    }

    /// Corners in vertex order, matching `Face::INDICES`.
    pub fn corners(&self) -> [Point3<f32>; 4] {
        [self.ll, self.lr, self.ul, self.ur]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    #[test]
    fn faces_wind_counter_clockwise_around_their_normal() {
        for side in BlockSide::all() {
            let face = Face::new(Point3::new(3.0, 4.0, 5.0), side, 1.0);
            let normal = (face.lr - face.ll).cross(face.ur - face.ll).normalize();
            let expected = side.normal().cast::<f32>().unwrap();
            assert!((normal - expected).magnitude() < 1e-5, "{side:?}");
        }
    }

    #[test]
    fn lowered_faces_only_move_upper_corners() {
        let face = Face::new(Point3::new(0.0, 0.0, 0.0), BlockSide::SOUTH, 0.875);
        assert_eq!(face.ll.y, 0.0);
        assert_eq!(face.ul.y, 0.875);
        assert_eq!(face.ur.y, 0.875);
    }
}
