//! 构造实体几何（CSG）求值
//!
//! 实体最终表示为一组朝外的平面凸多边形。并集与差集基于 BSP 树，
//! 不是鲁棒的几何内核：共面与退化情况按 BSP 算法本身的行为处理。

mod bsp;
mod plane;
mod polygon;

pub(crate) use bsp::{subtract, union};
pub(crate) use polygon::CsgPolygon;
