//! Mesh generation for the planet, atmosphere shell, and halo ring.

use celestia_render::VertexPositionNormalUv;
use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// CPU-side indexed triangle mesh. Counter-clockwise faces point outward.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<VertexPositionNormalUv>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Latitude/longitude sphere.
///
/// `width_segments` runs around the Y axis, `height_segments` from pole to
/// pole. UV `u` follows longitude and `v` runs from the north pole (0) to
/// the south pole (1), matching a top-down raster.
pub fn sphere_mesh(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let row = width_segments + 1;

    let mut vertices = Vec::with_capacity((row * (height_segments + 1)) as usize);
    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let polar = v * PI;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let azimuth = u * TAU;
            let normal = Vec3::new(
                -azimuth.cos() * polar.sin(),
                polar.cos(),
                azimuth.sin() * polar.sin(),
            );
            vertices.push(VertexPositionNormalUv {
                position: (normal * radius).to_array(),
                normal: normal.to_array(),
                uv: [u, v],
            });
        }
    }

    let mut indices = Vec::with_capacity((width_segments * (height_segments - 1) * 6) as usize);
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            // Pole rows collapse to a single triangle per segment.
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    MeshData { vertices, indices }
}

/// Flat annulus in the XY plane facing +Z.
pub fn ring_mesh(inner_radius: f32, outer_radius: f32, segments: u32) -> MeshData {
    let segments = segments.max(3);
    let row = segments + 1;
    let normal = Vec3::Z.to_array();

    let mut vertices = Vec::with_capacity((row * 2) as usize);
    for radius in [inner_radius, outer_radius] {
        for i in 0..=segments {
            let angle = i as f32 / segments as f32 * TAU;
            let (x, y) = (radius * angle.cos(), radius * angle.sin());
            vertices.push(VertexPositionNormalUv {
                position: [x, y, 0.0],
                normal,
                uv: [
                    (x / outer_radius + 1.0) / 2.0,
                    (y / outer_radius + 1.0) / 2.0,
                ],
            });
        }
    }

    let mut indices = Vec::with_capacity((segments * 6) as usize);
    for i in 0..segments {
        let (a, b, c, d) = (i, i + row, i + row + 1, i + 1);
        indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    MeshData { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face_normal(mesh: &MeshData, tri: &[u32]) -> (Vec3, Vec3) {
        let p = |i: u32| Vec3::from_array(mesh.vertices[i as usize].position);
        let (a, b, c) = (p(tri[0]), p(tri[1]), p(tri[2]));
        ((b - a).cross(c - a), (a + b + c) / 3.0)
    }

    #[test]
    fn test_sphere_vertices_on_radius() {
        let mesh = sphere_mesh(5.2, 48, 48);
        assert_eq!(mesh.vertices.len(), 49 * 49);
        for v in &mesh.vertices {
            let len = Vec3::from_array(v.position).length();
            assert!((len - 5.2).abs() < 1e-4, "vertex at radius {len}");
        }
    }

    #[test]
    fn test_sphere_triangle_count() {
        let mesh = sphere_mesh(1.0, 48, 48);
        assert_eq!(mesh.triangle_count(), 2 * 48 * 47);
    }

    #[test]
    fn test_sphere_indices_valid() {
        let mesh = sphere_mesh(5.38, 60, 60);
        let n = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
    }

    #[test]
    fn test_sphere_faces_point_outward() {
        let mesh = sphere_mesh(1.0, 16, 12);
        for tri in mesh.indices.chunks(3) {
            let (normal, centroid) = face_normal(&mesh, tri);
            assert!(normal.dot(centroid) > 0.0, "inward face {tri:?}");
        }
    }

    #[test]
    fn test_sphere_uvs_in_range() {
        let mesh = sphere_mesh(1.0, 24, 24);
        for v in &mesh.vertices {
            assert!((0.0..=1.0).contains(&v.uv[0]));
            assert!((0.0..=1.0).contains(&v.uv[1]));
        }
        // North pole samples the top of the raster.
        assert_eq!(mesh.vertices[0].uv[1], 0.0);
        assert!(mesh.vertices[0].position[1] > 0.99);
    }

    #[test]
    fn test_ring_radii_and_normals() {
        let mesh = ring_mesh(7.0, 12.2, 64);
        assert_eq!(mesh.vertices.len(), 2 * 65);
        assert_eq!(mesh.triangle_count(), 128);
        for v in &mesh.vertices {
            let r = Vec3::from_array(v.position).length();
            assert!((r - 7.0).abs() < 1e-4 || (r - 12.2).abs() < 1e-4);
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_ring_faces_point_along_z() {
        let mesh = ring_mesh(7.0, 12.2, 32);
        for tri in mesh.indices.chunks(3) {
            let (normal, _) = face_normal(&mesh, tri);
            assert!(normal.z > 0.0);
        }
    }
}
