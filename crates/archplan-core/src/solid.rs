//! 3D实体
//!
//! 实体是一棵不可变的构造树：
//! - 拉伸 (Extrusion)：2D轮廓沿局部Z轴拉伸
//! - 多面体 (Polyhedron)：直接给出的朝外平面
//! - 并集 (Union) / 差集 (Subtract)
//!
//! 变换不会修改已有实体，而是返回新的树，变换被下推到叶子。
//! 求值（`polygons`）时才执行布尔运算。

use crate::csg::{self, CsgPolygon};
use crate::error::ModelError;
use crate::math::{BoundingBox3, Point2, Point3, Vector3, EPSILON};
use crate::transform::{AffineTransform, Transform3D};
use crate::units::{check_dimension, check_finite, Measurement};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// 3D平面多边形（顶点逆时针，法向朝外）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon3 {
    pub vertices: Vec<Point3>,
}

impl Polygon3 {
    pub fn new(vertices: Vec<Point3>) -> Self {
        Self { vertices }
    }

    /// 扇形三角化（凸多边形）
    pub fn triangles(&self) -> Vec<[Point3; 3]> {
        if self.vertices.len() < 3 {
            return Vec::new();
        }
        let first = self.vertices[0];
        self.vertices
            .windows(2)
            .skip(1)
            .map(|pair| [first, pair[0], pair[1]])
            .collect()
    }

    fn transformed(&self, transform: &Transform3D) -> Polygon3 {
        let mut vertices: Vec<Point3> = self
            .vertices
            .iter()
            .map(|v| transform.transform_point(v))
            .collect();
        if transform.is_mirroring() {
            vertices.reverse();
        }
        Polygon3 { vertices }
    }
}

/// 2D轮廓：已校验的简单多边形，逆时针，无重复点与共线点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    points: Vec<Point2>,
}

impl Profile {
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// 有向面积（逆时针为正）
    fn signed_area(points: &[Point2]) -> f64 {
        let n = points.len();
        (0..n)
            .map(|i| {
                let (a, b) = (points[i], points[(i + 1) % n]);
                a.x * b.y - b.x * a.y
            })
            .sum::<f64>()
            / 2.0
    }

    /// 面积
    pub fn area(&self) -> f64 {
        Self::signed_area(&self.points)
    }

    /// 耳切法三角化，返回顶点索引
    pub fn triangulate(&self) -> Vec<[usize; 3]> {
        let pts = &self.points;
        let mut remaining: Vec<usize> = (0..pts.len()).collect();
        let mut triangles = Vec::with_capacity(pts.len().saturating_sub(2));

        while remaining.len() > 3 {
            let m = remaining.len();
            let ear = (0..m).find(|&k| {
                let (ia, ib, ic) = (remaining[(k + m - 1) % m], remaining[k], remaining[(k + 1) % m]);
                let (a, b, c) = (pts[ia], pts[ib], pts[ic]);
                if cross(&a, &b, &c) <= EPSILON {
                    return false;
                }
                !remaining
                    .iter()
                    .filter(|&&j| j != ia && j != ib && j != ic)
                    .any(|&j| point_in_triangle(&pts[j], &a, &b, &c))
            });

            match ear {
                Some(k) => {
                    triangles.push([remaining[(k + m - 1) % m], remaining[k], remaining[(k + 1) % m]]);
                    remaining.remove(k);
                }
                None => {
                    // 自相交轮廓找不到耳朵，退化为扇形
                    warn!(vertices = m, "profile is not simple, falling back to fan triangulation");
                    for k in 1..m - 1 {
                        triangles.push([remaining[0], remaining[k], remaining[k + 1]]);
                    }
                    return triangles;
                }
            }
        }

        if remaining.len() == 3 {
            triangles.push([remaining[0], remaining[1], remaining[2]]);
        }
        triangles
    }
}

fn cross(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x)
}

fn point_in_triangle(p: &Point2, a: &Point2, b: &Point2, c: &Point2) -> bool {
    let d1 = cross(a, b, p);
    let d2 = cross(b, c, p);
    let d3 = cross(c, a, p);
    d1 >= -EPSILON && d2 >= -EPSILON && d3 >= -EPSILON
}

/// 从点列创建轮廓
///
/// 去掉重复点与共线点，统一为逆时针。有效点少于3个或面积为零时报错。
pub fn polygon(points: &[Point2]) -> Result<Profile, ModelError> {
    let mut cleaned: Vec<Point2> = Vec::with_capacity(points.len());
    for p in points {
        check_finite("point", p.x)?;
        check_finite("point", p.y)?;
        if cleaned.last().is_none_or(|last| (last - p).norm() > EPSILON) {
            cleaned.push(*p);
        }
    }
    while cleaned.len() > 1 && (cleaned[0] - cleaned[cleaned.len() - 1]).norm() <= EPSILON {
        cleaned.pop();
    }

    // 去掉共线点
    let mut changed = true;
    while changed && cleaned.len() >= 3 {
        changed = false;
        let n = cleaned.len();
        for i in 0..n {
            let (a, b, c) = (cleaned[(i + n - 1) % n], cleaned[i], cleaned[(i + 1) % n]);
            if cross(&a, &b, &c).abs() <= EPSILON {
                cleaned.remove(i);
                changed = true;
                break;
            }
        }
    }

    if cleaned.len() < 3 {
        return Err(ModelError::DegeneratePolygon(format!(
            "{} distinct points, need at least 3",
            cleaned.len()
        )));
    }
    if Profile::signed_area(&cleaned) < 0.0 {
        cleaned.reverse();
    }
    Ok(Profile { points: cleaned })
}

/// 以原点为一角的矩形轮廓
pub fn rectangle_profile(length: Measurement, width: Measurement) -> Result<Profile, ModelError> {
    let l = check_dimension("length", length)?;
    let w = check_dimension("width", width)?;
    polygon(&[
        Point2::new(0.0, 0.0),
        Point2::new(l, 0.0),
        Point2::new(l, w),
        Point2::new(0.0, w),
    ])
}

/// 直角三角形：给定斜边与底角，直角顶点落在斜边对面
pub fn right_triangle_hyp(hyp: Measurement, angle: f64) -> Result<Profile, ModelError> {
    let hyp = check_dimension("hypotenuse", hyp)?;
    let angle = check_finite("angle", angle)?;
    let cos = angle.cos();
    polygon(&[
        Point2::new(0.0, 0.0),
        Point2::new(hyp, 0.0),
        Point2::new(hyp * cos * cos, hyp * angle.sin() * cos),
    ])
}

/// 直角三角形：给定水平直角边与对面的锐角
pub fn right_triangle_leg(leg: Measurement, angle: f64) -> Result<Profile, ModelError> {
    let leg = check_dimension("leg", leg)?;
    let angle = check_finite("angle", angle)?;
    polygon(&[
        Point2::new(0.0, 0.0),
        Point2::new(leg, 0.0),
        Point2::new(0.0, leg / angle.tan()),
    ])
}

/// 拉伸体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extrusion {
    pub profile: Profile,
    pub height: Measurement,
    pub transform: Transform3D,
}

impl Extrusion {
    /// 局部坐标下的面：底面、顶面和侧面
    fn local_faces(&self) -> Vec<Vec<Point3>> {
        let pts = self.profile.points();
        let h = self.height;
        let n = pts.len();
        let mut faces = Vec::with_capacity(2 * n);

        for [a, b, c] in self.profile.triangulate() {
            let top = [pts[a], pts[b], pts[c]].map(|p| Point3::new(p.x, p.y, h));
            faces.push(top.to_vec());
            let bottom = [pts[c], pts[b], pts[a]].map(|p| Point3::new(p.x, p.y, 0.0));
            faces.push(bottom.to_vec());
        }

        for i in 0..n {
            let (p, q) = (pts[i], pts[(i + 1) % n]);
            faces.push(vec![
                Point3::new(p.x, p.y, 0.0),
                Point3::new(q.x, q.y, 0.0),
                Point3::new(q.x, q.y, h),
                Point3::new(p.x, p.y, h),
            ]);
        }
        faces
    }
}

/// 3D实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Solid {
    Extrusion(Extrusion),
    Polyhedron(Vec<Polygon3>),
    Union(Vec<Solid>),
    Subtract { base: Box<Solid>, tools: Vec<Solid> },
}

/// 沿Z轴拉伸轮廓
pub fn extrude_linear(height: Measurement, profile: Profile) -> Result<Solid, ModelError> {
    let height = check_dimension("height", height)?;
    Ok(Solid::Extrusion(Extrusion {
        profile,
        height,
        transform: Transform3D::identity(),
    }))
}

/// 长方体，一角位于原点，沿 +X/+Y/+Z 延伸
pub fn cuboid(length: Measurement, width: Measurement, height: Measurement) -> Result<Solid, ModelError> {
    extrude_linear(height, rectangle_profile(length, width)?)
}

/// 两个四边形之间的凸多面体
///
/// 相当于两块平行矩形的凸包，用于窗洞外侧的喇叭口。
pub fn loft(bottom: [Point3; 4], top: [Point3; 4]) -> Result<Solid, ModelError> {
    for p in bottom.iter().chain(top.iter()) {
        for value in [p.x, p.y, p.z] {
            check_finite("point", value)?;
        }
    }

    let mut faces = vec![bottom.to_vec(), top.to_vec()];
    for i in 0..4 {
        let j = (i + 1) % 4;
        faces.push(vec![bottom[i], bottom[j], top[j], top[i]]);
    }

    let all: Vec<Point3> = bottom.iter().chain(top.iter()).copied().collect();
    let centroid = all.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords) / all.len() as f64;

    let mut oriented = Vec::with_capacity(faces.len());
    for mut face in faces {
        let plane = CsgPolygon::new(face.clone())
            .ok_or_else(|| ModelError::DegeneratePolygon("loft face has zero area".to_string()))?
            .plane;
        let face_center = face.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords) / face.len() as f64;
        if plane.normal.dot(&(face_center - centroid)) < 0.0 {
            face.reverse();
        }
        oriented.push(Polygon3::new(face));
    }
    Ok(Solid::Polyhedron(oriented))
}

impl Solid {
    /// 并集
    pub fn union(solids: impl IntoIterator<Item = Solid>) -> Solid {
        Solid::Union(solids.into_iter().collect())
    }

    /// 差集：base 减去所有 tools
    pub fn subtract(base: Solid, tools: impl IntoIterator<Item = Solid>) -> Solid {
        Solid::Subtract {
            base: Box::new(base),
            tools: tools.into_iter().collect(),
        }
    }

    /// 返回变换后的副本
    pub fn transformed(&self, transform: &Transform3D) -> Solid {
        match self {
            Solid::Extrusion(e) => Solid::Extrusion(Extrusion {
                profile: e.profile.clone(),
                height: e.height,
                transform: transform.after(&e.transform),
            }),
            Solid::Polyhedron(faces) => {
                Solid::Polyhedron(faces.iter().map(|f| f.transformed(transform)).collect())
            }
            Solid::Union(solids) => {
                Solid::Union(solids.iter().map(|s| s.transformed(transform)).collect())
            }
            Solid::Subtract { base, tools } => Solid::Subtract {
                base: Box::new(base.transformed(transform)),
                tools: tools.iter().map(|s| s.transformed(transform)).collect(),
            },
        }
    }

    pub fn translate(self, dx: f64, dy: f64, dz: f64) -> Solid {
        self.transformed(&Transform3D::translation(dx, dy, dz))
    }

    pub fn rotate(self, angles: [f64; 3]) -> Solid {
        self.transformed(&Transform3D::rotation_euler(angles))
    }

    pub fn rotate_z(self, angle: f64) -> Solid {
        self.transformed(&Transform3D::rotation_z(angle))
    }

    pub fn mirror(self, normal: Vector3) -> Solid {
        self.transformed(&Transform3D::mirror(normal))
    }

    /// 求值为朝外的平面多边形
    pub fn polygons(&self) -> Vec<Polygon3> {
        let polygons: Vec<Polygon3> = self
            .evaluate()
            .into_iter()
            .map(|p| Polygon3::new(p.vertices))
            .collect();
        debug!(polygons = polygons.len(), "solid evaluated");
        polygons
    }

    /// 三角面列表（供3D查看器使用）
    pub fn triangles(&self) -> Vec<[Point3; 3]> {
        self.polygons().iter().flat_map(|p| p.triangles()).collect()
    }

    /// 包围盒
    pub fn bounding_box(&self) -> BoundingBox3 {
        let polygons = self.evaluate();
        BoundingBox3::from_points(polygons.iter().flat_map(|p| p.vertices.iter()))
    }

    fn evaluate(&self) -> Vec<CsgPolygon> {
        match self {
            Solid::Extrusion(e) => {
                let mirroring = e.transform.is_mirroring();
                e.local_faces()
                    .into_iter()
                    .filter_map(|face| {
                        let mut vertices: Vec<Point3> =
                            face.iter().map(|v| e.transform.transform_point(v)).collect();
                        if mirroring {
                            vertices.reverse();
                        }
                        CsgPolygon::new(vertices)
                    })
                    .collect()
            }
            Solid::Polyhedron(faces) => faces
                .iter()
                .filter_map(|f| CsgPolygon::new(f.vertices.clone()))
                .collect(),
            Solid::Union(solids) => solids
                .iter()
                .map(Solid::evaluate)
                .reduce(union_polygons)
                .unwrap_or_default(),
            Solid::Subtract { base, tools } => tools
                .iter()
                .map(Solid::evaluate)
                .fold(base.evaluate(), |acc, tool| {
                    if overlapping(&acc, &tool) {
                        csg::subtract(acc, tool)
                    } else {
                        acc
                    }
                }),
        }
    }
}

/// 包围盒不相交时直接拼接，省去 BSP
fn union_polygons(a: Vec<CsgPolygon>, b: Vec<CsgPolygon>) -> Vec<CsgPolygon> {
    if overlapping(&a, &b) {
        csg::union(a, b)
    } else {
        let mut a = a;
        a.extend(b);
        a
    }
}

fn overlapping(a: &[CsgPolygon], b: &[CsgPolygon]) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    let bbox_a = BoundingBox3::from_points(a.iter().flat_map(|p| p.vertices.iter()));
    let bbox_b = BoundingBox3::from_points(b.iter().flat_map(|p| p.vertices.iter()));
    bbox_a.intersects(&bbox_b, 1e-5)
}
