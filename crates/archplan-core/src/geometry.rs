//! 2D几何图元
//!
//! 平面图只需要两种可绘制的图元：
//! - 线段 (Line)
//! - 圆弧 (Arc)，门的开启弧线即为 90° 圆弧

use crate::math::{BoundingBox2, Point2, Vector2};
use crate::transform::{AffineTransform, Transform2D};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// 路径：2D中最小的可绘制单元
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Path {
    Line(Line),
    Arc(Arc),
}

impl Path {
    /// 获取几何的包围盒
    pub fn bounding_box(&self) -> BoundingBox2 {
        match self {
            Path::Line(l) => l.bounding_box(),
            Path::Arc(a) => a.bounding_box(),
        }
    }

    /// 返回变换后的副本
    pub fn transformed(&self, transform: &Transform2D) -> Path {
        match self {
            Path::Line(l) => Path::Line(l.transformed(transform)),
            Path::Arc(a) => Path::Arc(a.transformed(transform)),
        }
    }

    /// 起点
    pub fn start_point(&self) -> Point2 {
        match self {
            Path::Line(l) => l.start,
            Path::Arc(a) => a.start_point(),
        }
    }

    /// 终点
    pub fn end_point(&self) -> Point2 {
        match self {
            Path::Line(l) => l.end,
            Path::Arc(a) => a.end_point(),
        }
    }
}

impl From<Line> for Path {
    fn from(line: Line) -> Self {
        Path::Line(line)
    }
}

impl From<Arc> for Path {
    fn from(arc: Arc) -> Self {
        Path::Arc(arc)
    }
}

/// 线段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point2,
    pub end: Point2,
}

impl Line {
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    /// 计算线段长度
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    pub fn transformed(&self, transform: &Transform2D) -> Line {
        Line::new(
            transform.transform_point(&self.start),
            transform.transform_point(&self.end),
        )
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::from_points([self.start, self.end])
    }
}

/// 圆弧，从起始角逆时针扫到终止角
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub center: Point2,
    pub radius: f64,
    /// 起始角度（弧度）
    pub start_angle: f64,
    /// 终止角度（弧度）
    pub end_angle: f64,
}

impl Arc {
    pub fn new(center: Point2, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            center,
            radius,
            start_angle,
            end_angle,
        }
    }

    /// 以角度创建圆弧
    pub fn from_degrees(center: Point2, radius: f64, start_degrees: f64, end_degrees: f64) -> Self {
        Self::new(center, radius, start_degrees.to_radians(), end_degrees.to_radians())
    }

    /// 计算弧长
    pub fn length(&self) -> f64 {
        self.sweep_angle() * self.radius
    }

    /// 计算扫过的角度，范围 [0, 2π)
    pub fn sweep_angle(&self) -> f64 {
        (self.end_angle - self.start_angle).rem_euclid(TAU)
    }

    /// 获取起点
    pub fn start_point(&self) -> Point2 {
        self.point_at_angle(self.start_angle)
    }

    /// 获取终点
    pub fn end_point(&self) -> Point2 {
        self.point_at_angle(self.end_angle)
    }

    fn point_at_angle(&self, angle: f64) -> Point2 {
        Point2::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }

    /// 返回变换后的副本
    ///
    /// 只支持刚体变换与镜像。镜像会颠倒方向，因此交换起止角以保持逆时针扫掠。
    pub fn transformed(&self, transform: &Transform2D) -> Arc {
        let map_angle = |angle: f64| {
            let dir = transform.transform_vector(&Vector2::new(angle.cos(), angle.sin()));
            dir.y.atan2(dir.x).rem_euclid(TAU)
        };
        let (start, end) = if transform.is_mirroring() {
            (map_angle(self.end_angle), map_angle(self.start_angle))
        } else {
            (map_angle(self.start_angle), map_angle(self.end_angle))
        };
        let radius = transform.transform_vector(&Vector2::new(self.radius, 0.0)).norm();
        Arc::new(transform.transform_point(&self.center), radius, start, end)
    }

    /// 检查角度是否在弧的范围内
    fn contains_angle(&self, angle: f64) -> bool {
        let offset = (angle - self.start_angle).rem_euclid(TAU);
        offset <= self.sweep_angle()
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        let mut bbox = BoundingBox2::from_points([self.start_point(), self.end_point()]);

        // 检查象限点
        for angle in [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2] {
            if self.contains_angle(angle) {
                bbox.expand_to_include(&self.point_at_angle(angle));
            }
        }

        bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq, points_approx_eq, EPSILON};

    #[test]
    fn test_line_length() {
        let line = Line::new(Point2::new(0.0, 0.0), Point2::new(3.0, 4.0));
        assert!((line.length() - 5.0).abs() < EPSILON);
    }

    #[test]
    fn test_quarter_arc() {
        let arc = Arc::from_degrees(Point2::origin(), 34.0, 0.0, 90.0);
        assert!(approx_eq(arc.sweep_angle(), FRAC_PI_2));
        assert!(points_approx_eq(&arc.start_point(), &Point2::new(34.0, 0.0)));
        assert!(points_approx_eq(&arc.end_point(), &Point2::new(0.0, 34.0)));

        let bbox = arc.bounding_box();
        assert!(approx_eq(bbox.width(), 34.0));
        assert!(approx_eq(bbox.height(), 34.0));
    }

    #[test]
    fn test_arc_transform_keeps_sweep() {
        let arc = Arc::from_degrees(Point2::origin(), 24.0, 0.0, 90.0);
        for degrees in [0.0, 90.0, 180.0, 270.0, 33.0] {
            let t = Transform2D::translation(5.0, -7.0).after(&Transform2D::rotation_degrees(degrees));
            let moved = arc.transformed(&t);
            assert!(approx_eq(moved.sweep_angle(), FRAC_PI_2), "rotation {degrees}");
            assert!(approx_eq(moved.radius, 24.0));
            assert!(points_approx_eq(&moved.center, &Point2::new(5.0, -7.0)));
        }
    }

    #[test]
    fn test_arc_mirror_keeps_endpoints() {
        let arc = Arc::from_degrees(Point2::origin(), 10.0, 0.0, 90.0);
        let mirrored = arc.transformed(&Transform2D::mirror_y());

        assert!(approx_eq(mirrored.sweep_angle(), FRAC_PI_2));
        // 起止端点作为集合保持不变
        assert!(points_approx_eq(&mirrored.start_point(), &Point2::new(0.0, 10.0)));
        assert!(points_approx_eq(&mirrored.end_point(), &Point2::new(-10.0, 0.0)));
    }

    #[test]
    fn test_path_transform() {
        let path = Path::from(Line::new(Point2::new(0.0, 0.0), Point2::new(0.0, 34.0)));
        let moved = path.transformed(&Transform2D::translation(0.0, 161.0));
        assert!(points_approx_eq(&moved.start_point(), &Point2::new(0.0, 161.0)));
        assert!(points_approx_eq(&moved.end_point(), &Point2::new(0.0, 195.0)));
        assert!(matches!(moved, Path::Line(_)));
    }
}
