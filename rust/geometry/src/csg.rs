// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CSG (Constructive Solid Geometry) Operations
//!
//! Box solids and box subtraction. The subtraction itself is delegated to
//! csgrs and only exists with the `csg` feature.

use crate::mesh::Mesh;
use nalgebra::{Point3, Vector3};

#[cfg(feature = "csg")]
use crate::error::{Error, Result};
#[cfg(feature = "csg")]
use crate::triangulation::{calculate_polygon_normal, project_to_2d, triangulate_polygon};

/// Triangle definition
#[derive(Debug, Clone)]
pub struct Triangle {
    pub v0: Point3<f64>,
    pub v1: Point3<f64>,
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Create a new triangle
    pub fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Calculate triangle normal
    pub fn normal(&self) -> Vector3<f64> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        edge1.cross(&edge2).normalize()
    }
}

/// Create a box mesh from AABB min/max bounds
/// Returns a closed mesh with 12 triangles (2 per face, 6 faces), wound outward
pub fn aabb_to_mesh(min: Point3<f64>, max: Point3<f64>) -> Mesh {
    let mut mesh = Mesh::with_capacity(36, 36);

    let v0 = Point3::new(min.x, min.y, min.z); // 0: front-bottom-left
    let v1 = Point3::new(max.x, min.y, min.z); // 1: front-bottom-right
    let v2 = Point3::new(max.x, max.y, min.z); // 2: front-top-right
    let v3 = Point3::new(min.x, max.y, min.z); // 3: front-top-left
    let v4 = Point3::new(min.x, min.y, max.z); // 4: back-bottom-left
    let v5 = Point3::new(max.x, min.y, max.z); // 5: back-bottom-right
    let v6 = Point3::new(max.x, max.y, max.z); // 6: back-top-right
    let v7 = Point3::new(min.x, max.y, max.z); // 7: back-top-left

    // Front face (z = min.z) - normal points toward -Z
    add_triangle_to_mesh(&mut mesh, &Triangle::new(v0, v2, v1));
    add_triangle_to_mesh(&mut mesh, &Triangle::new(v0, v3, v2));

    // Back face (z = max.z) - normal points toward +Z
    add_triangle_to_mesh(&mut mesh, &Triangle::new(v4, v5, v6));
    add_triangle_to_mesh(&mut mesh, &Triangle::new(v4, v6, v7));

    // Left face (x = min.x) - normal points toward -X
    add_triangle_to_mesh(&mut mesh, &Triangle::new(v0, v4, v7));
    add_triangle_to_mesh(&mut mesh, &Triangle::new(v0, v7, v3));

    // Right face (x = max.x) - normal points toward +X
    add_triangle_to_mesh(&mut mesh, &Triangle::new(v1, v2, v6));
    add_triangle_to_mesh(&mut mesh, &Triangle::new(v1, v6, v5));

    // Bottom face (y = min.y) - normal points toward -Y
    add_triangle_to_mesh(&mut mesh, &Triangle::new(v0, v1, v5));
    add_triangle_to_mesh(&mut mesh, &Triangle::new(v0, v5, v4));

    // Top face (y = max.y) - normal points toward +Y
    add_triangle_to_mesh(&mut mesh, &Triangle::new(v3, v7, v6));
    add_triangle_to_mesh(&mut mesh, &Triangle::new(v3, v6, v2));

    mesh
}

/// Add a triangle to a mesh
fn add_triangle_to_mesh(mesh: &mut Mesh, triangle: &Triangle) {
    let base_idx = mesh.vertex_count() as u32;
    let normal = triangle.normal();

    mesh.add_vertex(triangle.v0, normal);
    mesh.add_vertex(triangle.v1, normal);
    mesh.add_vertex(triangle.v2, normal);

    mesh.add_triangle(base_idx, base_idx + 1, base_idx + 2);
}

/// Box subtraction through csgrs
#[cfg(feature = "csg")]
pub struct CsgProcessor;

#[cfg(feature = "csg")]
impl CsgProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Subtract every box in `cutters` from `host`
    ///
    /// All cutters are subtracted in one pass over the host BSP. An empty or
    /// non-finite result is reported as an error so callers can fall back.
    pub fn subtract_boxes(
        &self,
        host: &Mesh,
        cutters: &[(Point3<f64>, Point3<f64>)],
    ) -> Result<Mesh> {
        use csgrs::traits::CSG;

        if host.is_empty() {
            return Err(Error::EmptyMesh("host solid has no triangles".to_string()));
        }
        if cutters.is_empty() {
            return Ok(host.clone());
        }

        let mut result = Self::mesh_to_csgrs(host);
        for (min, max) in cutters {
            let cutter = Self::mesh_to_csgrs(&aabb_to_mesh(*min, *max));
            result = result.difference(&cutter);
        }

        let mesh = Self::csgrs_to_mesh(&result);
        if mesh.is_empty() {
            return Err(Error::Subtraction(
                "subtraction removed the whole solid".to_string(),
            ));
        }
        if !mesh.is_finite() {
            return Err(Error::Subtraction(
                "subtraction produced non-finite vertices".to_string(),
            ));
        }
        Ok(mesh)
    }

    /// Convert our Mesh format to csgrs Mesh format
    fn mesh_to_csgrs(mesh: &Mesh) -> csgrs::mesh::Mesh<()> {
        use csgrs::mesh::{polygon::Polygon, vertex::Vertex, Mesh as CSGMesh};

        let mut polygons = Vec::with_capacity(mesh.triangle_count());

        for t in 0..mesh.triangle_count() {
            let [v0, v1, v2] = mesh.triangle_vertices(t);

            // Skip degenerate triangles to avoid NaN propagation
            let face_normal = match mesh.triangle_normal(t) {
                Some(n) => n,
                None => continue,
            };

            let vertices = vec![
                Vertex::new(v0, face_normal),
                Vertex::new(v1, face_normal),
                Vertex::new(v2, face_normal),
            ];

            polygons.push(Polygon::new(vertices, None));
        }

        CSGMesh::from_polygons(&polygons, None)
    }

    /// Convert csgrs Mesh format back to our Mesh format
    fn csgrs_to_mesh(csg_mesh: &csgrs::mesh::Mesh<()>) -> Mesh {
        let mut mesh = Mesh::new();

        for polygon in &csg_mesh.polygons {
            let vertices = &polygon.vertices;
            if vertices.len() < 3 {
                continue;
            }

            let points_3d: Vec<Point3<f64>> = vertices
                .iter()
                .map(|v| Point3::new(v.pos[0], v.pos[1], v.pos[2]))
                .collect();

            let raw_normal = Vector3::new(
                vertices[0].normal[0],
                vertices[0].normal[1],
                vertices[0].normal[2],
            );

            // Fall back to the polygon's own normal if the CSG normal is unusable
            let csg_normal = match raw_normal.try_normalize(1e-10) {
                Some(n) if n.x.is_finite() && n.y.is_finite() && n.z.is_finite() => n,
                _ => match calculate_polygon_normal(&points_3d).try_normalize(1e-10) {
                    Some(n) => n,
                    None => continue,
                },
            };

            let indices = if points_3d.len() == 3 {
                vec![0, 1, 2]
            } else {
                match triangulate_polygon(&project_to_2d(&points_3d, &csg_normal)) {
                    Ok(indices) => indices,
                    Err(_) => continue,
                }
            };

            let base = mesh.vertex_count() as u32;
            for p in &points_3d {
                mesh.add_vertex(*p, csg_normal);
            }
            for tri in indices.chunks_exact(3) {
                let (a, mut b, mut c) = (tri[0], tri[1], tri[2]);
                // Winding must agree with the polygon normal
                let winding = (points_3d[b] - points_3d[a]).cross(&(points_3d[c] - points_3d[a]));
                if winding.dot(&csg_normal) < 0.0 {
                    std::mem::swap(&mut b, &mut c);
                }
                mesh.add_triangle(base + a as u32, base + b as u32, base + c as u32);
            }
        }

        mesh
    }
}

#[cfg(feature = "csg")]
impl Default for CsgProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_normal() {
        let triangle = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );

        let normal = triangle.normal();
        assert!((normal.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_aabb_mesh_is_closed() {
        let mesh = aabb_to_mesh(Point3::new(0.0, 0.0, 0.0), Point3::new(4.0, 3.0, 0.2));
        assert_eq!(mesh.triangle_count(), 12);
        assert!(mesh.is_watertight());

        let (min, max) = mesh.bounds();
        assert_eq!((min.x, min.y, min.z), (0.0, 0.0, 0.0));
        assert!((max.x - 4.0).abs() < 1e-6);
        assert!((max.z - 0.2).abs() < 1e-6);
    }

    #[cfg(feature = "csg")]
    #[test]
    fn test_subtract_box_through_wall() {
        let processor = CsgProcessor::new();
        let wall = aabb_to_mesh(Point3::new(0.0, 0.0, -0.1), Point3::new(4.0, 3.0, 0.1));
        let cutter = (Point3::new(1.5, -0.05, -0.2), Point3::new(2.5, 2.1, 0.2));

        let result = processor.subtract_boxes(&wall, &[cutter]).unwrap();
        assert!(result.triangle_count() > 12);

        // The hole never enlarges the solid
        let (min, max) = result.bounds();
        assert!(min.x >= -1e-4 && max.x <= 4.0 + 1e-4);
        assert!(min.y >= -1e-4 && max.y <= 3.0 + 1e-4);
    }

    #[cfg(feature = "csg")]
    #[test]
    fn test_subtracted_winding_matches_normals() {
        let processor = CsgProcessor::new();
        let wall = aabb_to_mesh(Point3::new(0.0, 0.0, -0.1), Point3::new(4.0, 3.0, 0.1));
        let cutters = [
            (Point3::new(0.5, -0.05, -0.2), Point3::new(1.4, 2.1, 0.2)),
            (Point3::new(2.2, 0.9, -0.2), Point3::new(3.4, 2.1, 0.2)),
        ];
        let result = processor.subtract_boxes(&wall, &cutters).unwrap();

        for t in 0..result.triangle_count() {
            let Some(geometric) = result.triangle_normal(t) else {
                continue;
            };
            let i = result.indices[t * 3] as usize * 3;
            let stored = Vector3::new(
                result.normals[i] as f64,
                result.normals[i + 1] as f64,
                result.normals[i + 2] as f64,
            );
            assert!(geometric.dot(&stored) > 0.0, "triangle {} is wound inward", t);
        }
    }

    #[cfg(feature = "csg")]
    #[test]
    fn test_subtract_nothing_returns_host() {
        let processor = CsgProcessor::new();
        let wall = aabb_to_mesh(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let result = processor.subtract_boxes(&wall, &[]).unwrap();
        assert_eq!(result, wall);
    }

    #[cfg(feature = "csg")]
    #[test]
    fn test_subtract_everything_is_an_error() {
        let processor = CsgProcessor::new();
        let wall = aabb_to_mesh(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let cutter = (Point3::new(-1.0, -1.0, -1.0), Point3::new(2.0, 2.0, 2.0));
        assert!(processor.subtract_boxes(&wall, &[cutter]).is_err());
    }
}
