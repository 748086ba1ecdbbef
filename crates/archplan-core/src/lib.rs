//! ArchPlan 核心几何
//!
//! 参数化建筑制图的核心：单位换算、2D/3D仿射变换、图元和不可变的层级模型。
//!
//! # 架构设计
//!
//! 数据流单向无环：
//! - `units`: 英尺/英寸换算到统一的英寸
//! - `builders` / `solid`: 图元构建器，返回局部坐标系下的模型或实体
//! - `model`: 命名子模型按变换放置，组成一棵树
//! - 导出层（`archplan-file`）只读取 `Model::resolve` 的结果
//!
//! # 示例
//!
//! ```rust
//! use archplan_core::prelude::*;
//!
//! let plan = Model::new("plan")
//!     .attach("door", door(ft(3.0))?.rotate_degrees(90.0).translate(ft(10.0), 0.0))?;
//!
//! let swing = plan.find("door.swing")?;
//! println!("{:?}", swing.primitive.bounding_box());
//! # Ok::<(), ModelError>(())
//! ```

pub mod builders;
mod csg;
pub mod error;
pub mod geometry;
pub mod math;
pub mod model;
pub mod solid;
pub mod transform;
pub mod units;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::builders::{connect_the_dots, door, rectangle};
    pub use crate::error::ModelError;
    pub use crate::geometry::{Arc, Line, Path};
    pub use crate::math::{BoundingBox2, BoundingBox3, Point2, Point3, Vector2, Vector3};
    pub use crate::model::{Caption, MassModel, Model, PlanModel, Placed, Primitive, Resolved};
    pub use crate::solid::{
        cuboid, extrude_linear, loft, polygon, rectangle_profile, right_triangle_hyp,
        right_triangle_leg, Polygon3, Profile, Solid,
    };
    pub use crate::transform::{AffineTransform, Transform2D, Transform3D};
    pub use crate::units::{format_ft_in, ft, ftin, inch, to_ft_in, Measurement, Unit};
}
