//! 层级模型
//!
//! 模型是不可变的命名容器：自身持有若干图元，并以仿射变换放置若干命名子模型。
//! 所有构建操作都消耗旧值、返回新值，同一个构建结果可以在多处放置而互不影响。
//!
//! # 示例
//!
//! ```rust
//! use archplan_core::prelude::*;
//!
//! let room = Model::new("room")
//!     .with_primitive("wall", Line::new(Point2::origin(), Point2::new(120.0, 0.0)).into())?
//!     .attach("door", door(ftin(2.0, 10.0))?.rotate_degrees(270.0).translate(0.0, 161.0))?;
//!
//! for item in room.resolve() {
//!     println!("{} {:?}", item.path, item.primitive.bounding_box());
//! }
//! # Ok::<(), ModelError>(())
//! ```

use crate::error::ModelError;
use crate::geometry::Path;
use crate::math::{BoundingBox2, Point2, Vector3};
use crate::solid::Solid;
use crate::transform::{AffineTransform, Transform2D, Transform3D};
use crate::units::{format_ft_in, Unit};
use std::collections::BTreeMap;
use std::fmt::Debug;
use tracing::debug;

/// 可放入模型的图元
pub trait Primitive: Clone + Debug + PartialEq {
    /// 该维度下的放置变换
    type Transform: AffineTransform;

    /// 返回变换后的副本
    fn transformed(&self, transform: &Self::Transform) -> Self;
}

impl Primitive for Path {
    type Transform = Transform2D;

    fn transformed(&self, transform: &Transform2D) -> Self {
        Path::transformed(self, transform)
    }
}

impl Primitive for Solid {
    type Transform = Transform3D;

    fn transformed(&self, transform: &Transform3D) -> Self {
        Solid::transformed(self, transform)
    }
}

/// 模型内的图元及其图层
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<P> {
    pub primitive: P,
    pub layer: Option<String>,
}

/// 命名模型
#[derive(Debug, Clone)]
pub struct Model<P: Primitive> {
    name: String,
    primitives: BTreeMap<String, Entry<P>>,
    children: BTreeMap<String, Placed<P>>,
    layer: Option<String>,
    caption: Option<String>,
    units: Unit,
}

/// 放置后的模型：模型加上相对父坐标系的变换
#[derive(Debug, Clone)]
pub struct Placed<P: Primitive> {
    model: Model<P>,
    transform: P::Transform,
}

/// 解析到根坐标系的图元
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<P> {
    /// 点分路径，如 `bedroom.entrydoor.swing`
    pub path: String,
    /// 生效图层：图元自身的，否则取最近祖先的
    pub layer: Option<String>,
    pub primitive: P,
}

/// 平面图（2D）
pub type PlanModel = Model<Path>;

/// 体块模型（3D）
pub type MassModel = Model<Solid>;

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

impl<P: Primitive> Model<P> {
    /// 创建空模型
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primitives: BTreeMap::new(),
            children: BTreeMap::new(),
            layer: None,
            caption: None,
            units: Unit::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    /// 绘图单位，导出时写入 SVG 尺寸与 DXF 文件头
    pub fn units(&self) -> Unit {
        self.units
    }

    pub fn primitive(&self, name: &str) -> Option<&Entry<P>> {
        self.primitives.get(name)
    }

    pub fn primitives(&self) -> impl Iterator<Item = (&str, &Entry<P>)> {
        self.primitives.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &Placed<P>)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn check_name(&self, name: &str) -> Result<(), ModelError> {
        if self.primitives.contains_key(name) || self.children.contains_key(name) {
            return Err(ModelError::DuplicateName {
                parent: self.name.clone(),
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// 添加图元
    pub fn with_primitive(self, name: impl Into<String>, primitive: P) -> Result<Self, ModelError> {
        self.insert_primitive(name.into(), primitive, None)
    }

    /// 添加带图层的图元
    pub fn with_layered_primitive(
        self,
        name: impl Into<String>,
        primitive: P,
        layer: impl Into<String>,
    ) -> Result<Self, ModelError> {
        self.insert_primitive(name.into(), primitive, Some(layer.into()))
    }

    fn insert_primitive(
        mut self,
        name: String,
        primitive: P,
        layer: Option<String>,
    ) -> Result<Self, ModelError> {
        self.check_name(&name)?;
        self.primitives.insert(name, Entry { primitive, layer });
        Ok(self)
    }

    /// 设置模型图层，子孙中没有图层的图元继承它
    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = Some(layer.into());
        self
    }

    pub fn with_caption(mut self, text: impl Into<String>) -> Self {
        self.caption = Some(text.into());
        self
    }

    pub fn with_units(mut self, units: Unit) -> Self {
        self.units = units;
        self
    }

    /// 挂接子模型，名称在兄弟（含图元）之间必须唯一
    pub fn attach(mut self, name: impl Into<String>, child: impl Into<Placed<P>>) -> Result<Self, ModelError> {
        let name = name.into();
        self.check_name(&name)?;
        let child = child.into();
        debug!(parent = %self.name, child = %name, "model attached");
        self.children.insert(name, child);
        Ok(self)
    }

    /// 以给定变换放置
    pub fn place(self, transform: P::Transform) -> Placed<P> {
        Placed {
            model: self,
            transform,
        }
    }

    /// 展开整棵树，返回根坐标系下的所有图元
    pub fn resolve(&self) -> Vec<Resolved<P>> {
        let mut out = Vec::new();
        self.resolve_into(&P::Transform::identity(), "", None, &mut out);
        debug!(model = %self.name, primitives = out.len(), "model resolved");
        out
    }

    fn resolve_into(
        &self,
        transform: &P::Transform,
        prefix: &str,
        inherited: Option<&str>,
        out: &mut Vec<Resolved<P>>,
    ) {
        let layer = self.layer.as_deref().or(inherited);
        for (name, entry) in &self.primitives {
            out.push(Resolved {
                path: join(prefix, name),
                layer: entry.layer.as_deref().or(layer).map(str::to_string),
                primitive: entry.primitive.transformed(transform),
            });
        }
        for (name, child) in &self.children {
            let composed = transform.after(&child.transform);
            child
                .model
                .resolve_into(&composed, &join(prefix, name), layer, out);
        }
    }

    /// 按点分路径查找图元，返回其根坐标系下的几何
    pub fn find(&self, path: &str) -> Result<Resolved<P>, ModelError> {
        let mut model = self;
        let mut transform = P::Transform::identity();
        let mut layer = self.layer.as_deref();
        let mut segments = path.split('.').peekable();

        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                let entry = model
                    .primitives
                    .get(segment)
                    .ok_or_else(|| ModelError::NotFound(path.to_string()))?;
                return Ok(Resolved {
                    path: path.to_string(),
                    layer: entry.layer.as_deref().or(layer).map(str::to_string),
                    primitive: entry.primitive.transformed(&transform),
                });
            }
            let child = model
                .children
                .get(segment)
                .ok_or_else(|| ModelError::NotFound(path.to_string()))?;
            transform = transform.after(&child.transform);
            model = &child.model;
            layer = model.layer.as_deref().or(layer);
        }
        Err(ModelError::NotFound(path.to_string()))
    }

    /// 子模型到根坐标系的组合变换
    pub fn composed_transform(&self, path: &str) -> Result<P::Transform, ModelError> {
        let mut model = self;
        let mut transform = P::Transform::identity();
        for segment in path.split('.') {
            let child = model
                .children
                .get(segment)
                .ok_or_else(|| ModelError::NotFound(path.to_string()))?;
            transform = transform.after(&child.transform);
            model = &child.model;
        }
        Ok(transform)
    }
}

impl<P: Primitive> Placed<P> {
    /// 在当前放置之后再施加一个变换
    pub fn then(self, transform: P::Transform) -> Self {
        Placed {
            transform: transform.after(&self.transform),
            model: self.model,
        }
    }

    pub fn model(&self) -> &Model<P> {
        &self.model
    }

    pub fn transform(&self) -> &P::Transform {
        &self.transform
    }
}

impl<P: Primitive> From<Model<P>> for Placed<P> {
    fn from(model: Model<P>) -> Self {
        model.place(P::Transform::identity())
    }
}

/// 根坐标系下的标注
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub path: String,
    pub text: String,
    pub anchor: Point2,
}

impl Model<Path> {
    /// 整棵树在根坐标系下的范围
    pub fn extents(&self) -> BoundingBox2 {
        self.resolve()
            .iter()
            .fold(BoundingBox2::empty(), |acc, r| acc.union(&r.primitive.bounding_box()))
    }

    /// 所有带标注的模型
    ///
    /// 锚点为该模型自身范围的中心，随放置变换一起映射到根坐标系。
    pub fn captions(&self) -> Vec<Caption> {
        let mut out = Vec::new();
        self.collect_captions(&Transform2D::identity(), "", &mut out);
        out
    }

    fn collect_captions(&self, transform: &Transform2D, prefix: &str, out: &mut Vec<Caption>) {
        if let Some(text) = &self.caption {
            let extents = self.extents();
            if !extents.is_empty() {
                out.push(Caption {
                    path: prefix.to_string(),
                    text: text.clone(),
                    anchor: transform.transform_point(&extents.center()),
                });
            }
        }
        for (name, child) in &self.children {
            let composed = transform.after(&child.transform);
            child
                .model
                .collect_captions(&composed, &join(prefix, name), out);
        }
    }

    /// 以尺寸作标注：`LABEL: W'I" x H'I"`
    pub fn with_size_caption(self, label: &str) -> Self {
        let extents = self.extents();
        let text = format!(
            "{label}: {} x {}",
            format_ft_in(extents.width()),
            format_ft_in(extents.height())
        );
        self.with_caption(text)
    }

    pub fn rotate_degrees(self, degrees: f64) -> Placed<Path> {
        self.place(Transform2D::rotation_degrees(degrees))
    }

    pub fn translate(self, dx: f64, dy: f64) -> Placed<Path> {
        self.place(Transform2D::translation(dx, dy))
    }

    pub fn mirror_x(self) -> Placed<Path> {
        self.place(Transform2D::mirror_x())
    }

    pub fn mirror_y(self) -> Placed<Path> {
        self.place(Transform2D::mirror_y())
    }
}

impl Placed<Path> {
    pub fn rotate_degrees(self, degrees: f64) -> Self {
        self.then(Transform2D::rotation_degrees(degrees))
    }

    pub fn translate(self, dx: f64, dy: f64) -> Self {
        self.then(Transform2D::translation(dx, dy))
    }

    pub fn mirror_x(self) -> Self {
        self.then(Transform2D::mirror_x())
    }

    pub fn mirror_y(self) -> Self {
        self.then(Transform2D::mirror_y())
    }
}

impl Model<Solid> {
    /// 把整棵树合并为一个实体
    pub fn to_solid(&self) -> Solid {
        Solid::union(self.resolve().into_iter().map(|r| r.primitive))
    }

    pub fn translate(self, dx: f64, dy: f64, dz: f64) -> Placed<Solid> {
        self.place(Transform3D::translation(dx, dy, dz))
    }

    pub fn rotate(self, angles: [f64; 3]) -> Placed<Solid> {
        self.place(Transform3D::rotation_euler(angles))
    }

    pub fn mirror(self, normal: Vector3) -> Placed<Solid> {
        self.place(Transform3D::mirror(normal))
    }
}

impl Placed<Solid> {
    pub fn translate(self, dx: f64, dy: f64, dz: f64) -> Self {
        self.then(Transform3D::translation(dx, dy, dz))
    }

    pub fn rotate(self, angles: [f64; 3]) -> Self {
        self.then(Transform3D::rotation_euler(angles))
    }

    pub fn mirror(self, normal: Vector3) -> Self {
        self.then(Transform3D::mirror(normal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Arc, Line};
    use crate::math::{approx_eq, points_approx_eq};
    use crate::solid::cuboid;

    fn segment(x1: f64, y1: f64, x2: f64, y2: f64) -> Path {
        Line::new(Point2::new(x1, y1), Point2::new(x2, y2)).into()
    }

    fn unit_square() -> PlanModel {
        Model::new("square")
            .with_primitive("bottom", segment(0.0, 0.0, 1.0, 0.0))
            .and_then(|m| m.with_primitive("right", segment(1.0, 0.0, 1.0, 1.0)))
            .and_then(|m| m.with_primitive("top", segment(1.0, 1.0, 0.0, 1.0)))
            .and_then(|m| m.with_primitive("left", segment(0.0, 1.0, 0.0, 0.0)))
            .unwrap()
    }

    #[test]
    fn test_duplicate_primitive_name() {
        let result = Model::new("room")
            .with_primitive("wall", segment(0.0, 0.0, 1.0, 0.0))
            .unwrap()
            .with_primitive("wall", segment(0.0, 0.0, 0.0, 1.0));
        assert_eq!(
            result.unwrap_err(),
            ModelError::DuplicateName {
                parent: "room".to_string(),
                name: "wall".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_child_name() {
        let result = Model::new("apartment")
            .attach("bath", unit_square())
            .unwrap()
            .attach("bath", unit_square().translate(5.0, 0.0));
        assert!(matches!(result, Err(ModelError::DuplicateName { .. })));

        // 子模型与图元也不能同名
        let result = Model::new("apartment")
            .with_primitive("bath", segment(0.0, 0.0, 1.0, 0.0))
            .unwrap()
            .attach("bath", unit_square());
        assert!(matches!(result, Err(ModelError::DuplicateName { .. })));
    }

    #[test]
    fn test_resolve_paths_and_offsets() {
        let root = Model::new("root")
            .attach("a", unit_square().translate(10.0, 0.0))
            .unwrap();
        let resolved = root.resolve();
        assert_eq!(resolved.len(), 4);

        let bottom = root.find("a.bottom").unwrap();
        match bottom.primitive {
            Path::Line(line) => {
                assert!(points_approx_eq(&line.start, &Point2::new(10.0, 0.0)));
                assert!(points_approx_eq(&line.end, &Point2::new(11.0, 0.0)));
            }
            _ => panic!("expected line"),
        }
    }

    #[test]
    fn test_nested_offsets_compose() {
        // 子模型偏移 A，父模型偏移 B，等价于直接偏移 A + B
        let nested = Model::new("root")
            .attach(
                "parent",
                Model::new("parent")
                    .attach("child", unit_square().translate(3.0, 4.0))
                    .unwrap()
                    .translate(10.0, 20.0),
            )
            .unwrap();
        let direct = Model::new("root")
            .attach("child", unit_square().translate(13.0, 24.0))
            .unwrap();

        let a = nested.resolve();
        let b = direct.resolve();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!(points_approx_eq(&x.primitive.start_point(), &y.primitive.start_point()));
            assert!(points_approx_eq(&x.primitive.end_point(), &y.primitive.end_point()));
        }
    }

    #[test]
    fn test_identity_placement_is_idempotent() {
        let placed = unit_square().rotate_degrees(90.0).translate(5.0, 5.0);
        let once = Model::new("root").attach("sq", placed.clone()).unwrap();
        let twice = Model::new("root")
            .attach("sq", placed.then(Transform2D::identity()))
            .unwrap();
        assert_eq!(once.resolve(), twice.resolve());
    }

    #[test]
    fn test_rotate_then_translate_order() {
        let root = Model::new("root")
            .attach("sq", unit_square().rotate_degrees(90.0).translate(5.0, 0.0))
            .unwrap();
        let ext = root.extents();
        assert!(points_approx_eq(&ext.min, &Point2::new(4.0, 0.0)));
        assert!(points_approx_eq(&ext.max, &Point2::new(5.0, 1.0)));
    }

    #[test]
    fn test_layer_inheritance() {
        let root = Model::new("root")
            .with_layer("walls")
            .with_layered_primitive("bounds", segment(0.0, 0.0, 0.0, 1.0), "outline")
            .unwrap()
            .attach("sq", unit_square())
            .unwrap();

        assert_eq!(root.find("bounds").unwrap().layer.as_deref(), Some("outline"));
        assert_eq!(root.find("sq.top").unwrap().layer.as_deref(), Some("walls"));
        assert!(matches!(root.find("sq.missing"), Err(ModelError::NotFound(_))));
    }

    #[test]
    fn test_placement_does_not_alias() {
        let square = unit_square();
        let root = Model::new("root")
            .attach("a", square.clone().translate(0.0, 0.0))
            .unwrap()
            .attach("b", square.clone().translate(100.0, 0.0))
            .unwrap();
        assert!(approx_eq(root.extents().width(), 101.0));
        assert!(approx_eq(square.extents().width(), 1.0));
    }

    #[test]
    fn test_size_caption() {
        let room = Model::new("room")
            .with_primitive("a", segment(0.0, 0.0, 240.0, 0.0))
            .unwrap()
            .with_primitive("b", segment(0.0, 0.0, 0.0, 26.5))
            .unwrap()
            .with_size_caption("BED");
        assert_eq!(room.caption(), Some("BED: 20'0\" x 2'2.5\""));

        let root = Model::new("root").attach("bed", room.translate(10.0, 10.0)).unwrap();
        let captions = root.captions();
        assert_eq!(captions.len(), 1);
        assert_eq!(captions[0].path, "bed");
        assert!(points_approx_eq(&captions[0].anchor, &Point2::new(130.0, 23.25)));
    }

    #[test]
    fn test_arc_resolve() {
        let root = Model::new("root")
            .with_primitive("swing", Arc::from_degrees(Point2::origin(), 10.0, 0.0, 90.0).into())
            .unwrap();
        let ext = root.extents();
        assert!(approx_eq(ext.width(), 10.0));
        assert!(approx_eq(ext.height(), 10.0));
    }

    #[test]
    fn test_composed_transform() {
        let root = Model::new("root")
            .attach(
                "outer",
                Model::new("outer")
                    .attach("inner", unit_square().translate(1.0, 2.0))
                    .unwrap()
                    .translate(10.0, 0.0),
            )
            .unwrap();
        let t = root.composed_transform("outer.inner").unwrap();
        assert!(points_approx_eq(
            &t.transform_point(&Point2::origin()),
            &Point2::new(11.0, 2.0)
        ));
        assert!(root.composed_transform("nope").is_err());
    }

    #[test]
    fn test_to_solid() {
        let mass = Model::new("mass")
            .with_primitive("a", cuboid(1.0, 1.0, 1.0).unwrap())
            .unwrap()
            .attach(
                "b",
                Model::new("b")
                    .with_primitive("box", cuboid(1.0, 1.0, 1.0).unwrap())
                    .unwrap()
                    .translate(5.0, 0.0, 0.0),
            )
            .unwrap();
        let bbox = mass.to_solid().bounding_box();
        assert!(approx_eq(bbox.min.x, 0.0));
        assert!(approx_eq(bbox.max.x, 6.0));
    }
}
