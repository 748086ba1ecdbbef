//! 梦想住宅
//!
//! - `plan`：以黄金比例划分的平面草图，`Dn = D0 / PHI^n`
//! - `house`：3D体块，前后墙、侧墙、前侧楔形扩展、后侧扩展与屋面椽条，
//!   前墙开两扇带外八字窗洞的窗

use archplan_core::builders::{connect_the_dots, rectangle};
use archplan_core::error::ModelError;
use archplan_core::geometry::Line;
use archplan_core::math::{Point2, Point3, Vector3};
use archplan_core::model::{MassModel, PlanModel};
use archplan_core::solid::{
    cuboid, extrude_linear, loft, polygon, right_triangle_hyp, right_triangle_leg, Solid,
};
use archplan_core::transform::Transform3D;
use archplan_core::units::{check_dimension, ft, Measurement, Unit};
use std::f64::consts::{FRAC_PI_2, PI};
use tracing::debug;

/// 黄金比例
pub const PHI: f64 = 1.618_033_988_749_895;

/// 基准尺寸
pub const D0: f64 = 44.0;

/// 第 n 级黄金分割尺寸
pub fn d(n: i32) -> f64 {
    D0 / PHI.powi(n)
}

/// 厨房：L 形台面，左侧边界线画在虚线图层 `outline` 上
fn kitchen() -> Result<PlanModel, ModelError> {
    let (d3, d6) = (d(3), d(6));
    let counter: Vec<Point2> = [
        [0.0, 0.0],
        [0.0, d6],
        [d3 - d6, d6],
        [d3 - d6, d3 - d6],
        [0.0, d3 - d6],
        [0.0, d3],
        [d3, d3],
        [d3, 0.0],
        [0.0, 0.0],
    ]
    .iter()
    .map(|[x, y]| Point2::new(*x, *y))
    .collect();

    Ok(PlanModel::new("kitchen")
        .with_layered_primitive(
            "bounds",
            Line::new(Point2::new(0.0, d6), Point2::new(0.0, d3 - d6)).into(),
            "outline",
        )?
        .attach("counter", connect_the_dots(false, &counter)?)?
        .with_size_caption("KT"))
}

/// 黄金比例平面草图
pub fn plan() -> Result<PlanModel, ModelError> {
    PlanModel::new("dream")
        .with_units(Unit::Inch)
        .attach("outline", rectangle(D0, d(1))?)?
        .attach("kitchen", kitchen()?.translate(d(4), d(2)))
}

/// 墙厚
const WALL: Measurement = 4.0;

/// 椽条截面（2×6 实际尺寸 1.5"×5.5"，外侧斜切面按 3.5" 计）
const RAFTER_DEPTH: Measurement = 5.5;
const RAFTER_BEVEL: Measurement = 3.5;

/// 住宅参数
#[derive(Debug, Clone, PartialEq)]
pub struct HouseParams {
    /// 核心体量：长、宽、高
    pub core_size: [Measurement; 3],
    /// 屋面坡角（弧度）
    pub pitch: f64,
}

impl Default for HouseParams {
    fn default() -> Self {
        Self {
            core_size: [ft(44.0), ft(28.0), ft(9.0)],
            pitch: 12f64.atan2(3.0),
        }
    }
}

/// 竖直矩形（位于 y 平面内）
fn vertical_rect(y: f64, x: f64, z: f64, width: f64, height: f64) -> [Point3; 4] {
    [
        Point3::new(x, y, z),
        Point3::new(x + width, y, z),
        Point3::new(x + width, y, z + height),
        Point3::new(x, y, z + height),
    ]
}

/// 前墙上的一扇窗：穿墙窗洞加向外放大的八字口
fn front_window(x: Measurement) -> Result<Solid, ModelError> {
    let (width, height) = (ft(6.0), ft(4.0));
    let sill = ft(2.5);
    let flare = ft(3.0);

    let opening = cuboid(width, WALL, height)?;
    let splay = loft(
        vertical_rect(0.0, 0.0, 0.0, width, height),
        vertical_rect(-ft(1.0), -flare / 2.0, -flare / 2.0, width + flare, height + flare),
    )?;
    Ok(Solid::union([opening, splay]).translate(x, 0.0, sill))
}

/// 屋面：前后两根椽条
fn roof(params: &HouseParams) -> Result<MassModel, ModelError> {
    let [cl, cw, ch] = params.core_size;
    let pitch = params.pitch;
    let (sin, cos) = pitch.sin_cos();
    let span = cw + 2.0 * WALL;
    let length = cl - 2.0 * WALL;

    let front_length = span * cos - RAFTER_DEPTH;
    let dip_below = (RAFTER_DEPTH - RAFTER_BEVEL / sin) * pitch.tan();
    let profile = polygon(&[
        Point2::new(0.0, 0.0),
        Point2::new(RAFTER_BEVEL * sin * sin, RAFTER_BEVEL * sin * cos),
        Point2::new(RAFTER_DEPTH, -dip_below),
        Point2::new(RAFTER_DEPTH, front_length),
        Point2::new(0.0, front_length),
    ])?;
    let front_rafter = MassModel::new("front_rafter")
        .with_primitive("rafter", extrude_linear(length, profile)?)?
        .rotate([FRAC_PI_2, 0.0, FRAC_PI_2])
        .then(Transform3D::rotation_x(pitch - FRAC_PI_2))
        .translate(WALL, 0.0, ch);

    // 后椽条在支撑墙处开槽
    let back_length = span * sin;
    let notch = cuboid(WALL, ch, length)?
        .rotate_z(PI - pitch)
        .mirror(Vector3::x());
    let back = Solid::subtract(cuboid(RAFTER_DEPTH, back_length, length)?, [notch]);
    let back_rafter = MassModel::new("back_rafter")
        .with_primitive("rafter", back)?
        .rotate([0.0, FRAC_PI_2, 0.0])
        .then(Transform3D::rotation_z(PI))
        .then(Transform3D::rotation_x(pitch - FRAC_PI_2))
        .translate(cl - WALL, cw + 2.0 * WALL, ch);

    MassModel::new("roof")
        .attach("front_rafter", front_rafter)?
        .attach("back_rafter", back_rafter)
}

/// 3D住宅体块
pub fn house(params: &HouseParams) -> Result<MassModel, ModelError> {
    let [cl, cw, ch] = params.core_size;
    check_dimension("core length", cl)?;
    check_dimension("core width", cw)?;
    check_dimension("core height", ch)?;

    // 前侧楔形：直角三角形绕 x=z 平面翻到竖直方向，再翻到墙外侧
    let front_ext = extrude_linear(cl, right_triangle_leg(ch, params.pitch)?)?
        .mirror(Vector3::new(1.0, 0.0, -1.0))
        .mirror(Vector3::y());
    let windows = Solid::union([front_window(ft(3.0))?, front_window(ft(3.0) + ft(8.0))?]);
    let front = Solid::subtract(Solid::union([cuboid(cl, WALL, ch)?, front_ext]), [windows]);

    let back_ext = extrude_linear(cl, right_triangle_hyp(ch, params.pitch)?)?
        .rotate([0.0, FRAC_PI_2, 0.0]);

    let model = MassModel::new("house")
        .with_units(Unit::Inch)
        .with_primitive("front", front)?
        .attach(
            "left_wall",
            MassModel::new("left_wall")
                .with_primitive("wall", cuboid(WALL, cw, ch)?)?
                .translate(0.0, WALL, 0.0),
        )?
        .attach(
            "back_wall",
            MassModel::new("back_wall")
                .with_primitive("wall", cuboid(cl, WALL, ch)?)?
                .translate(0.0, cw + WALL, 0.0),
        )?
        .attach(
            "back_ext",
            MassModel::new("back_ext")
                .with_primitive("wedge", back_ext)?
                .translate(0.0, cw + 2.0 * WALL, ch),
        )?
        .attach("roof", roof(params)?)?;

    debug!(parts = model.resolve().len(), "house composed");
    Ok(model)
}
