//! 带平面的凸多边形，支持按平面切分

use super::plane::{Plane, Side};
use crate::math::Point3;

#[derive(Debug, Clone)]
pub(crate) struct CsgPolygon {
    pub vertices: Vec<Point3>,
    pub plane: Plane,
}

/// 多边形被平面切分的结果
pub(crate) enum Split {
    CoplanarFront(CsgPolygon),
    CoplanarBack(CsgPolygon),
    Front(CsgPolygon),
    Back(CsgPolygon),
    Spanning {
        front: Option<CsgPolygon>,
        back: Option<CsgPolygon>,
    },
}

impl CsgPolygon {
    /// 退化（少于3个顶点或面积为零）时返回 None
    pub fn new(vertices: Vec<Point3>) -> Option<Self> {
        let plane = Plane::from_points(&vertices)?;
        Some(Self { vertices, plane })
    }

    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.plane.flip();
    }

    pub fn split(self, plane: &Plane) -> Split {
        let sides: Vec<Side> = self.vertices.iter().map(|v| plane.side_of(v)).collect();
        let has_front = sides.contains(&Side::Front);
        let has_back = sides.contains(&Side::Back);

        match (has_front, has_back) {
            (false, false) => {
                if plane.normal.dot(&self.plane.normal) > 0.0 {
                    Split::CoplanarFront(self)
                } else {
                    Split::CoplanarBack(self)
                }
            }
            (true, false) => Split::Front(self),
            (false, true) => Split::Back(self),
            (true, true) => {
                let n = self.vertices.len();
                let mut front = Vec::with_capacity(n + 1);
                let mut back = Vec::with_capacity(n + 1);

                for i in 0..n {
                    let j = (i + 1) % n;
                    let (si, sj) = (sides[i], sides[j]);
                    let (vi, vj) = (self.vertices[i], self.vertices[j]);

                    if si != Side::Back {
                        front.push(vi);
                    }
                    if si != Side::Front {
                        back.push(vi);
                    }

                    let crosses = matches!(
                        (si, sj),
                        (Side::Front, Side::Back) | (Side::Back, Side::Front)
                    );
                    if crosses {
                        let t = (plane.w - plane.normal.dot(&vi.coords))
                            / plane.normal.dot(&(vj - vi));
                        let v = vi + (vj - vi) * t;
                        front.push(v);
                        back.push(v);
                    }
                }

                let plane = self.plane;
                let make = |vertices: Vec<Point3>| {
                    (vertices.len() >= 3).then_some(CsgPolygon { vertices, plane })
                };
                Split::Spanning {
                    front: make(front),
                    back: make(back),
                }
            }
        }
    }
}
