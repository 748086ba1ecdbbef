//! 平面图元构建器
//!
//! 每个构建器都是参数的纯函数，返回以自身原点为基准的局部模型。

use crate::error::ModelError;
use crate::geometry::{Arc, Line};
use crate::math::Point2;
use crate::model::PlanModel;
use crate::units::{check_dimension, check_finite, Measurement};

/// 门：铰点在原点，两条门扇边加一段 90° 开启弧
///
/// - `leg1`：(0,0) → (0,width)
/// - `leg2`：(0,0) → (width,0)
/// - `swing`：圆心在铰点、半径为门宽、0°~90° 的圆弧
///
/// 开启方向由调用方旋转或镜像决定。
pub fn door(width: Measurement) -> Result<PlanModel, ModelError> {
    let width = check_dimension("width", width)?;
    let hinge = Point2::origin();

    PlanModel::new("door")
        .with_primitive("leg1", Line::new(hinge, Point2::new(0.0, width)).into())?
        .with_primitive("leg2", Line::new(hinge, Point2::new(width, 0.0)).into())?
        .with_primitive("swing", Arc::from_degrees(hinge, width, 0.0, 90.0).into())
}

/// 依次连接各点；`closed` 时首尾相连
///
/// 线段命名为 `line1`、`line2`……
pub fn connect_the_dots(closed: bool, points: &[Point2]) -> Result<PlanModel, ModelError> {
    for value in points.iter().flat_map(|p| [p.x, p.y]) {
        check_finite("point", value)?;
    }

    let mut segments: Vec<(Point2, Point2)> = points.windows(2).map(|w| (w[0], w[1])).collect();
    if closed && points.len() > 2 {
        if let (Some(first), Some(last)) = (points.first(), points.last()) {
            segments.push((*last, *first));
        }
    }

    segments
        .into_iter()
        .enumerate()
        .try_fold(PlanModel::new("dots"), |model, (i, (start, end))| {
            model.with_primitive(format!("line{}", i + 1), Line::new(start, end).into())
        })
}

/// 矩形，左下角在原点
pub fn rectangle(width: Measurement, height: Measurement) -> Result<PlanModel, ModelError> {
    let w = check_dimension("width", width)?;
    let h = check_dimension("height", height)?;
    connect_the_dots(
        true,
        &[
            Point2::new(0.0, 0.0),
            Point2::new(w, 0.0),
            Point2::new(w, h),
            Point2::new(0.0, h),
        ],
    )
}
