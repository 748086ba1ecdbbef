//! BSP树
//!
//! 经典 csg.js 算法：每个节点保存一个分割平面、与之共面的多边形，
//! 以及前/后子树。布尔运算由 `clip_to` 与 `invert` 组合而成。
//!
//! 住宅体块只有几百个面，递归深度很浅，这里直接用递归实现。

use super::plane::Plane;
use super::polygon::{CsgPolygon, Split};

#[derive(Debug, Clone, Default)]
pub(crate) struct BspNode {
    plane: Option<Plane>,
    front: Option<Box<BspNode>>,
    back: Option<Box<BspNode>>,
    polygons: Vec<CsgPolygon>,
}

impl BspNode {
    pub fn new(polygons: Vec<CsgPolygon>) -> Self {
        let mut node = Self::default();
        node.build(polygons);
        node
    }

    /// 把多边形插入树中，必要时切分
    pub fn build(&mut self, polygons: Vec<CsgPolygon>) {
        let Some(first) = polygons.first() else {
            return;
        };
        let plane = *self.plane.get_or_insert(first.plane);

        let mut front = Vec::new();
        let mut back = Vec::new();
        for polygon in polygons {
            match polygon.split(&plane) {
                Split::CoplanarFront(p) | Split::CoplanarBack(p) => self.polygons.push(p),
                Split::Front(p) => front.push(p),
                Split::Back(p) => back.push(p),
                Split::Spanning { front: f, back: b } => {
                    front.extend(f);
                    back.extend(b);
                }
            }
        }

        if !front.is_empty() {
            self.front.get_or_insert_with(Box::default).build(front);
        }
        if !back.is_empty() {
            self.back.get_or_insert_with(Box::default).build(back);
        }
    }

    /// 实体内外翻转
    pub fn invert(&mut self) {
        for polygon in &mut self.polygons {
            polygon.flip();
        }
        if let Some(plane) = &mut self.plane {
            plane.flip();
        }
        if let Some(front) = &mut self.front {
            front.invert();
        }
        if let Some(back) = &mut self.back {
            back.invert();
        }
        std::mem::swap(&mut self.front, &mut self.back);
    }

    /// 去掉多边形落在本树实体内部的部分
    pub fn clip_polygons(&self, polygons: Vec<CsgPolygon>) -> Vec<CsgPolygon> {
        let Some(plane) = self.plane else {
            return polygons;
        };

        let mut front = Vec::new();
        let mut back = Vec::new();
        for polygon in polygons {
            match polygon.split(&plane) {
                Split::CoplanarFront(p) | Split::Front(p) => front.push(p),
                Split::CoplanarBack(p) | Split::Back(p) => back.push(p),
                Split::Spanning { front: f, back: b } => {
                    front.extend(f);
                    back.extend(b);
                }
            }
        }

        let mut result = match &self.front {
            Some(node) => node.clip_polygons(front),
            None => front,
        };
        // 没有后子树时，后方的多边形位于实体内部，直接丢弃
        if let Some(node) = &self.back {
            result.extend(node.clip_polygons(back));
        }
        result
    }

    /// 去掉本树中落在另一棵树实体内部的多边形
    pub fn clip_to(&mut self, other: &BspNode) {
        self.polygons = other.clip_polygons(std::mem::take(&mut self.polygons));
        if let Some(front) = &mut self.front {
            front.clip_to(other);
        }
        if let Some(back) = &mut self.back {
            back.clip_to(other);
        }
    }

    pub fn all_polygons(&self) -> Vec<CsgPolygon> {
        let mut result = self.polygons.clone();
        if let Some(front) = &self.front {
            result.extend(front.all_polygons());
        }
        if let Some(back) = &self.back {
            result.extend(back.all_polygons());
        }
        result
    }
}

/// 并集
pub(crate) fn union(a: Vec<CsgPolygon>, b: Vec<CsgPolygon>) -> Vec<CsgPolygon> {
    let mut a = BspNode::new(a);
    let mut b = BspNode::new(b);
    a.clip_to(&b);
    b.clip_to(&a);
    b.invert();
    b.clip_to(&a);
    b.invert();
    a.build(b.all_polygons());
    a.all_polygons()
}

/// 差集 a - b
pub(crate) fn subtract(a: Vec<CsgPolygon>, b: Vec<CsgPolygon>) -> Vec<CsgPolygon> {
    let mut a = BspNode::new(a);
    let mut b = BspNode::new(b);
    a.invert();
    a.clip_to(&b);
    b.clip_to(&a);
    b.invert();
    b.clip_to(&a);
    b.invert();
    a.build(b.all_polygons());
    a.invert();
    a.all_polygons()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point3;

    fn triangle(z: f64) -> CsgPolygon {
        CsgPolygon::new(vec![
            Point3::new(0.0, 0.0, z),
            Point3::new(1.0, 0.0, z),
            Point3::new(0.0, 1.0, z),
        ])
        .unwrap()
    }

    #[test]
    fn test_bsp_new_empty() {
        let tree = BspNode::new(vec![]);
        assert!(tree.all_polygons().is_empty());
    }

    #[test]
    fn test_bsp_all_polygons() {
        let tree = BspNode::new(vec![triangle(0.0), triangle(1.0), triangle(-1.0)]);
        assert_eq!(tree.all_polygons().len(), 3);
    }

    #[test]
    fn test_bsp_clip_polygons() {
        let tree = BspNode::new(vec![triangle(0.0)]);

        // 平面前方的保留
        assert_eq!(tree.clip_polygons(vec![triangle(1.0)]).len(), 1);
        // 平面后方的被裁掉
        assert!(tree.clip_polygons(vec![triangle(-1.0)]).is_empty());
    }

    #[test]
    fn test_bsp_invert() {
        let mut tree = BspNode::new(vec![triangle(0.0)]);
        tree.invert();
        let normal = tree.all_polygons()[0].plane.normal;
        assert!((normal.z + 1.0).abs() < 1e-12);
    }
}
