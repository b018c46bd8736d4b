//! Vertex data produced by the mesh builder.
//!
//! Vertices are plain old data so the renderer can upload a mesh pass with a
//! single `bytemuck::cast_slice`.

use cgmath::{Point3, Vector3};

/// A vertex of a chunk or focus mesh.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
/// - Normal: [f32; 3] (12 bytes)
///
/// Total size: 32 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in world space
    pub position: [f32; 3],
    /// Atlas UV coordinates (normalized 0.0-1.0)
    pub tex_coords: [f32; 2],
    /// Unit normal of the face this vertex belongs to
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn new(position: Point3<f32>, tex_coords: [f32; 2], normal: Vector3<i32>) -> Self {
        Vertex {
            position: position.into(),
            tex_coords,
            normal: [normal.x as f32, normal.y as f32, normal.z as f32],
        }
    }

    /// Raw bytes of a vertex slice, ready for upload.
    pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
        bytemuck::cast_slice(vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertices_are_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
        let vertices = [Vertex::new(Point3::new(1.0, 2.0, 3.0), [0.5, 0.25], Vector3::new(0, 1, 0)); 2];
        assert_eq!(Vertex::as_bytes(&vertices).len(), 64);
    }
}
