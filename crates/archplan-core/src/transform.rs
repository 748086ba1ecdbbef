//! 2D/3D 仿射变换
//!
//! 支持平移、旋转、镜像。子模型相对父坐标系的放置就是一个变换，
//! 从根到叶子依次组合即可得到叶子在根坐标系下的几何。

use crate::math::{Matrix3, Matrix4, Point2, Point3, Vector2, Vector3, EPSILON};
use serde::{Deserialize, Serialize};

/// 可组合的仿射变换
///
/// 模型树对维度泛型，只依赖单位变换与组合这两个操作。
pub trait AffineTransform: Copy + std::fmt::Debug + PartialEq {
    /// 单位变换
    fn identity() -> Self;

    /// 组合：先 other 后 self
    fn after(&self, other: &Self) -> Self;

    /// 是否包含镜像（行列式为负）
    fn is_mirroring(&self) -> bool;
}

/// 2D仿射变换
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    matrix: Matrix3,
}

impl Transform2D {
    /// 创建单位变换
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    /// 创建平移变换
    pub fn translation(dx: f64, dy: f64) -> Self {
        Self {
            matrix: Matrix3::new(
                1.0, 0.0, dx,
                0.0, 1.0, dy,
                0.0, 0.0, 1.0,
            ),
        }
    }

    /// 创建旋转变换（绕原点，弧度，逆时针）
    pub fn rotation(angle: f64) -> Self {
        let cos = angle.cos();
        let sin = angle.sin();
        Self {
            matrix: Matrix3::new(
                cos, -sin, 0.0,
                sin, cos, 0.0,
                0.0, 0.0, 1.0,
            ),
        }
    }

    /// 创建旋转变换（绕原点，角度）
    ///
    /// 90° 的整数倍使用精确的正余弦，避免门洞坐标出现 1e-15 级别的噪声。
    pub fn rotation_degrees(degrees: f64) -> Self {
        let quarter = degrees / 90.0;
        if (quarter - quarter.round()).abs() < EPSILON {
            let (cos, sin) = match (quarter.round() as i64).rem_euclid(4) {
                0 => (1.0, 0.0),
                1 => (0.0, 1.0),
                2 => (-1.0, 0.0),
                _ => (0.0, -1.0),
            };
            return Self {
                matrix: Matrix3::new(
                    cos, -sin, 0.0,
                    sin, cos, 0.0,
                    0.0, 0.0, 1.0,
                ),
            };
        }
        Self::rotation(degrees.to_radians())
    }

    /// 创建镜像变换（相对于X轴）
    pub fn mirror_x() -> Self {
        Self {
            matrix: Matrix3::new(
                1.0, 0.0, 0.0,
                0.0, -1.0, 0.0,
                0.0, 0.0, 1.0,
            ),
        }
    }

    /// 创建镜像变换（相对于Y轴）
    pub fn mirror_y() -> Self {
        Self {
            matrix: Matrix3::new(
                -1.0, 0.0, 0.0,
                0.0, 1.0, 0.0,
                0.0, 0.0, 1.0,
            ),
        }
    }

    /// 组合：先 other 后 self
    pub fn after(&self, other: &Transform2D) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// 变换一个点
    pub fn transform_point(&self, point: &Point2) -> Point2 {
        let v = self.matrix * nalgebra::Vector3::new(point.x, point.y, 1.0);
        Point2::new(v.x, v.y)
    }

    /// 变换一个向量（不受平移影响）
    pub fn transform_vector(&self, vector: &Vector2) -> Vector2 {
        let v = self.matrix * nalgebra::Vector3::new(vector.x, vector.y, 0.0);
        Vector2::new(v.x, v.y)
    }
}

impl AffineTransform for Transform2D {
    fn identity() -> Self {
        Transform2D::identity()
    }

    fn after(&self, other: &Self) -> Self {
        Transform2D::after(self, other)
    }

    fn is_mirroring(&self) -> bool {
        let m = &self.matrix;
        m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)] < 0.0
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

/// 3D仿射变换
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    matrix: Matrix4,
}

impl Transform3D {
    /// 创建单位变换
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// 创建平移变换
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            matrix: Matrix4::new_translation(&Vector3::new(dx, dy, dz)),
        }
    }

    /// 绕X轴旋转（弧度）
    pub fn rotation_x(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            matrix: Matrix4::new(
                1.0, 0.0, 0.0, 0.0,
                0.0, cos, -sin, 0.0,
                0.0, sin, cos, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ),
        }
    }

    /// 绕Y轴旋转（弧度）
    pub fn rotation_y(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            matrix: Matrix4::new(
                cos, 0.0, sin, 0.0,
                0.0, 1.0, 0.0, 0.0,
                -sin, 0.0, cos, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ),
        }
    }

    /// 绕Z轴旋转（弧度）
    pub fn rotation_z(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            matrix: Matrix4::new(
                cos, -sin, 0.0, 0.0,
                sin, cos, 0.0, 0.0,
                0.0, 0.0, 1.0, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ),
        }
    }

    /// 欧拉角旋转：先绕X，再绕Y，最后绕Z
    pub fn rotation_euler(angles: [f64; 3]) -> Self {
        Self::rotation_z(angles[2])
            .after(&Self::rotation_y(angles[1]))
            .after(&Self::rotation_x(angles[0]))
    }

    /// 相对过原点、法向为 `normal` 的平面镜像
    ///
    /// 法向为零向量时返回单位变换。
    pub fn mirror(normal: Vector3) -> Self {
        let Some(n) = normal.try_normalize(EPSILON) else {
            return Self::identity();
        };
        let reflection = nalgebra::Matrix3::identity() - 2.0 * n * n.transpose();
        Self {
            matrix: reflection.to_homogeneous(),
        }
    }

    /// 组合：先 other 后 self
    pub fn after(&self, other: &Transform3D) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// 变换一个点
    pub fn transform_point(&self, point: &Point3) -> Point3 {
        self.matrix.transform_point(point)
    }
}

impl AffineTransform for Transform3D {
    fn identity() -> Self {
        Transform3D::identity()
    }

    fn after(&self, other: &Self) -> Self {
        Transform3D::after(self, other)
    }

    fn is_mirroring(&self) -> bool {
        self.matrix.fixed_view::<3, 3>(0, 0).clone_owned().determinant() < 0.0
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}
