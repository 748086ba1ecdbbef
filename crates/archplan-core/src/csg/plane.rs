//! 分割平面

use crate::math::{Point3, Vector3};

/// 点与平面距离的判定容差（英寸）
pub(crate) const PLANE_EPSILON: f64 = 1e-5;

/// 点相对平面的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Coplanar,
    Front,
    Back,
}

/// 平面 `normal · p = w`
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Plane {
    pub normal: Vector3,
    pub w: f64,
}

impl Plane {
    /// 用 Newell 法从多边形顶点计算平面，面积为零时返回 None
    pub fn from_points(points: &[Point3]) -> Option<Self> {
        if points.len() < 3 {
            return None;
        }

        let mut normal = Vector3::zeros();
        let mut centroid = Vector3::zeros();
        for (i, current) in points.iter().enumerate() {
            let next = &points[(i + 1) % points.len()];
            normal.x += (current.y - next.y) * (current.z + next.z);
            normal.y += (current.z - next.z) * (current.x + next.x);
            normal.z += (current.x - next.x) * (current.y + next.y);
            centroid += current.coords;
        }
        centroid /= points.len() as f64;

        let normal = normal.try_normalize(1e-12)?;
        Some(Self {
            normal,
            w: normal.dot(&centroid),
        })
    }

    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    pub fn signed_distance(&self, point: &Point3) -> f64 {
        self.normal.dot(&point.coords) - self.w
    }

    pub fn side_of(&self, point: &Point3) -> Side {
        let t = self.signed_distance(point);
        if t < -PLANE_EPSILON {
            Side::Back
        } else if t > PLANE_EPSILON {
            Side::Front
        } else {
            Side::Coplanar
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq;

    #[test]
    fn test_plane_from_points() {
        let plane = Plane::from_points(&[
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(1.0, 0.0, 2.0),
            Point3::new(1.0, 1.0, 2.0),
            Point3::new(0.0, 1.0, 2.0),
        ])
        .unwrap();

        assert!(approx_eq(plane.normal.z, 1.0));
        assert!(approx_eq(plane.w, 2.0));
        assert_eq!(plane.side_of(&Point3::new(0.0, 0.0, 3.0)), Side::Front);
        assert_eq!(plane.side_of(&Point3::new(5.0, 5.0, 2.0)), Side::Coplanar);
    }

    #[test]
    fn test_degenerate_plane() {
        let collinear = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        assert!(Plane::from_points(&collinear).is_none());
    }
}
