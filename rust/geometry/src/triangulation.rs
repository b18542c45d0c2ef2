// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Triangulation of the planar polygons returned by boolean subtraction

use crate::{Error, Point2, Point3, Result, Vector3};

/// Triangle indices into `points` for a simple polygon without holes
pub fn triangulate_polygon(points: &[Point2<f64>]) -> Result<Vec<usize>> {
    match points.len() {
        0..=2 => Err(Error::TriangulationError(format!(
            "polygon has {} points",
            points.len()
        ))),
        3 => Ok(vec![0, 1, 2]),
        _ => {
            let flat: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y]).collect();
            earcutr::earcut(&flat, &[], 2)
                .map_err(|e| Error::TriangulationError(format!("{:?}", e)))
        }
    }
}

/// Coordinates of `points` in a right-handed basis of the plane with `normal`
///
/// Counter-clockwise around `normal` in 3D stays counter-clockwise in 2D.
pub fn project_to_2d(points: &[Point3<f64>], normal: &Vector3<f64>) -> Vec<Point2<f64>> {
    let Some(origin) = points.first() else {
        return Vec::new();
    };

    // Cross with the axis least aligned to the normal
    let (ax, ay, az) = (normal.x.abs(), normal.y.abs(), normal.z.abs());
    let reference = if ax <= ay && ax <= az {
        Vector3::x()
    } else if ay <= az {
        Vector3::y()
    } else {
        Vector3::z()
    };
    let u = normal.cross(&reference).normalize();
    let v = normal.cross(&u).normalize();

    points
        .iter()
        .map(|p| {
            let d = p - origin;
            Point2::new(d.dot(&u), d.dot(&v))
        })
        .collect()
}

/// Unit normal by Newell's method, `+Z` for degenerate input
pub fn calculate_polygon_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let mut normal = Vector3::zeros();
    for (i, a) in points.iter().enumerate() {
        let b = &points[(i + 1) % points.len()];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    normal.try_normalize(1e-10).unwrap_or_else(Vector3::z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_few_points() {
        let points = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        assert!(triangulate_polygon(&points).is_err());
    }

    #[test]
    fn test_concave_face_around_door() {
        // Wall face with a door cut reaching the floor
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 2.0),
            Point2::new(2.0, 2.0),
            Point2::new(2.0, 0.0),
            Point2::new(3.0, 0.0),
            Point2::new(3.0, 3.0),
            Point2::new(0.0, 3.0),
        ];
        let indices = triangulate_polygon(&points).unwrap();
        assert_eq!(indices.len(), (points.len() - 2) * 3);
        assert!(indices.iter().all(|&i| i < points.len()));
    }

    #[test]
    fn test_newell_normal_follows_winding() {
        let ccw = vec![
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(1.0, 0.0, 2.0),
            Point3::new(1.0, 1.0, 2.0),
            Point3::new(0.0, 1.0, 2.0),
        ];
        assert!((calculate_polygon_normal(&ccw).z - 1.0).abs() < 1e-9);

        let cw: Vec<_> = ccw.iter().rev().copied().collect();
        assert!((calculate_polygon_normal(&cw).z + 1.0).abs() < 1e-9);

        let degenerate = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)];
        assert_eq!(calculate_polygon_normal(&degenerate), Vector3::z());
    }

    #[test]
    fn test_projection_keeps_orientation() {
        let normal = Vector3::new(0.0, 1.0, 0.0);
        // Counter-clockwise seen from +Y
        let points = vec![
            Point3::new(0.0, 5.0, 0.0),
            Point3::new(0.0, 5.0, 1.0),
            Point3::new(1.0, 5.0, 1.0),
            Point3::new(1.0, 5.0, 0.0),
        ];
        let projected = project_to_2d(&points, &normal);
        assert_eq!(projected.len(), 4);

        let signed_area: f64 = (0..4)
            .map(|i| {
                let (a, b) = (projected[i], projected[(i + 1) % 4]);
                a.x * b.y - b.x * a.y
            })
            .sum::<f64>()
            * 0.5;
        assert!((signed_area - 1.0).abs() < 1e-9);
    }
}
