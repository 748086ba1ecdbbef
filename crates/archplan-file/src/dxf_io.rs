//! DXF文件导入/导出
//!
//! 平面图中的每条路径写为一个 LINE 或 ARC 实体，图层取路径的生效图层，
//! 没有图层的路径落在 DXF 默认图层 `0`。标注写为 TEXT 实体。

use crate::error::ExportError;
use archplan_core::geometry::{Arc, Line, Path};
use archplan_core::math::Point2;
use archplan_core::model::PlanModel;
use archplan_core::units::Unit;
use std::collections::BTreeSet;
use tracing::{info, warn};

/// DXF 默认图层
pub const DEFAULT_LAYER: &str = "0";

/// 标注文字高度（英寸）
const CAPTION_HEIGHT: f64 = 6.0;

/// 导出到DXF文件
pub fn export(model: &PlanModel, path: &std::path::Path) -> Result<(), ExportError> {
    let drawing = to_drawing(model);
    drawing
        .save_file(path)
        .map_err(|e| ExportError::Dxf(e.to_string()))?;

    info!(path = %path.display(), "DXF written");
    Ok(())
}

/// 构建内存中的 DXF 图纸
pub fn to_drawing(model: &PlanModel) -> dxf::Drawing {
    let mut drawing = dxf::Drawing::new();
    // $INSUNITS 从 R2000 起才写入
    drawing.header.version = dxf::enums::AcadVersion::R2000;
    drawing.header.default_drawing_units = to_dxf_units(model.units());
    let resolved = model.resolve();

    // 导出图层
    let layers: BTreeSet<&str> = resolved
        .iter()
        .filter_map(|r| r.layer.as_deref())
        .filter(|name| *name != DEFAULT_LAYER)
        .collect();
    for name in layers {
        let mut dxf_layer = dxf::tables::Layer::default();
        dxf_layer.name = name.to_string();
        drawing.add_layer(dxf_layer);
    }

    for item in &resolved {
        let mut entity = dxf::entities::Entity::new(convert_path(&item.primitive));
        entity.common.layer = item.layer.clone().unwrap_or_else(|| DEFAULT_LAYER.to_string());
        drawing.add_entity(entity);
    }

    for caption in model.captions() {
        let mut text = dxf::entities::Text::default();
        text.location = dxf::Point::new(caption.anchor.x, caption.anchor.y, 0.0);
        text.text_height = CAPTION_HEIGHT;
        text.value = caption.text;
        drawing.add_entity(dxf::entities::Entity::new(dxf::entities::EntityType::Text(text)));
    }

    drawing
}

/// 模型单位对应的 `$INSUNITS`
fn to_dxf_units(unit: Unit) -> dxf::enums::Units {
    match unit {
        Unit::Inch => dxf::enums::Units::Inches,
        Unit::Foot => dxf::enums::Units::Feet,
        Unit::Millimeter => dxf::enums::Units::Millimeters,
        Unit::Centimeter => dxf::enums::Units::Centimeters,
        Unit::Meter => dxf::enums::Units::Meters,
    }
}

/// 未识别或无单位时按英寸处理
fn from_dxf_units(units: dxf::enums::Units) -> Unit {
    match units {
        dxf::enums::Units::Feet => Unit::Foot,
        dxf::enums::Units::Millimeters => Unit::Millimeter,
        dxf::enums::Units::Centimeters => Unit::Centimeter,
        dxf::enums::Units::Meters => Unit::Meter,
        _ => Unit::Inch,
    }
}

fn convert_path(path: &Path) -> dxf::entities::EntityType {
    match path {
        Path::Line(line) => {
            let mut dxf_line = dxf::entities::Line::default();
            dxf_line.p1 = dxf::Point::new(line.start.x, line.start.y, 0.0);
            dxf_line.p2 = dxf::Point::new(line.end.x, line.end.y, 0.0);
            dxf::entities::EntityType::Line(dxf_line)
        }
        Path::Arc(arc) => {
            let mut dxf_arc = dxf::entities::Arc::default();
            dxf_arc.center = dxf::Point::new(arc.center.x, arc.center.y, 0.0);
            dxf_arc.radius = arc.radius;
            dxf_arc.start_angle = arc.start_angle.to_degrees();
            dxf_arc.end_angle = arc.end_angle.to_degrees();
            dxf::entities::EntityType::Arc(dxf_arc)
        }
    }
}

/// 从DXF文件导入平面图
///
/// 只读取 LINE 与 ARC，按出现顺序命名为 `line1`、`arc1`……，其余实体跳过。
pub fn import(path: &std::path::Path) -> Result<PlanModel, ExportError> {
    let drawing = dxf::Drawing::load_file(path).map_err(|e| ExportError::Dxf(e.to_string()))?;

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dxf".to_string());
    let mut model = PlanModel::new(name).with_units(from_dxf_units(drawing.header.default_drawing_units));
    let (mut lines, mut arcs, mut skipped) = (0usize, 0usize, 0usize);

    for entity in drawing.entities() {
        let (primitive_name, primitive): (String, Path) = match &entity.specific {
            dxf::entities::EntityType::Line(line) => {
                lines += 1;
                let start = Point2::new(line.p1.x, line.p1.y);
                let end = Point2::new(line.p2.x, line.p2.y);
                (format!("line{lines}"), Line::new(start, end).into())
            }
            dxf::entities::EntityType::Arc(arc) => {
                arcs += 1;
                let center = Point2::new(arc.center.x, arc.center.y);
                (
                    format!("arc{arcs}"),
                    Arc::from_degrees(center, arc.radius, arc.start_angle, arc.end_angle).into(),
                )
            }
            _ => {
                skipped += 1;
                continue;
            }
        };

        let layer = &entity.common.layer;
        model = if layer.is_empty() || layer == DEFAULT_LAYER {
            model.with_primitive(primitive_name, primitive)?
        } else {
            model.with_layered_primitive(primitive_name, primitive, layer.clone())?
        };
    }

    if skipped > 0 {
        warn!(skipped, "unsupported DXF entities skipped");
    }
    info!(path = %path.display(), lines, arcs, "DXF loaded");
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use archplan_core::builders::door;
    use archplan_core::math::approx_eq;

    #[test]
    fn test_drawing_layers_and_entities() {
        let plan = PlanModel::new("plan")
            .with_layered_primitive(
                "bounds",
                Line::new(Point2::new(0.0, 0.0), Point2::new(0.0, 10.0)).into(),
                "outline",
            )
            .unwrap()
            .attach("door", door(34.0).unwrap().translate(10.0, 0.0))
            .unwrap();

        let drawing = to_drawing(&plan);
        assert_eq!(drawing.header.default_drawing_units, dxf::enums::Units::Inches);
        assert_eq!(drawing.entities().count(), 4);
        assert!(drawing.layers().any(|l| l.name == "outline"));

        let arc = drawing
            .entities()
            .find_map(|e| match &e.specific {
                dxf::entities::EntityType::Arc(arc) => Some(arc.clone()),
                _ => None,
            })
            .unwrap();
        assert!(approx_eq(arc.radius, 34.0));
        assert!(approx_eq(arc.center.x, 10.0));
        assert!(approx_eq(arc.end_angle - arc.start_angle, 90.0));
    }

    #[test]
    fn test_dxf_round_trip() {
        let plan = PlanModel::new("plan")
            .attach("door", door(24.0).unwrap().rotate_degrees(90.0).translate(5.0, 5.0))
            .unwrap()
            .with_layer("doors");

        let path = std::env::temp_dir().join("archplan_test_round_trip.dxf");
        export(&plan, &path).unwrap();
        let loaded = import(&path).unwrap();

        assert_eq!(loaded.primitives().count(), 3);
        assert_eq!(loaded.units(), Unit::Inch);
        assert_eq!(loaded.find("line1").unwrap().layer.as_deref(), Some("doors"));

        let before = plan.extents();
        let after = loaded.extents();
        assert!((before.min - after.min).norm() < 1e-6);
        assert!((before.max - after.max).norm() < 1e-6);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_units_survive_round_trip() {
        let plan = PlanModel::new("site")
            .with_primitive("edge", Line::new(Point2::origin(), Point2::new(1.0, 0.0)).into())
            .unwrap()
            .with_units(Unit::Meter);
        assert_eq!(to_drawing(&plan).header.default_drawing_units, dxf::enums::Units::Meters);

        let path = std::env::temp_dir().join("archplan_test_units.dxf");
        export(&plan, &path).unwrap();
        assert_eq!(import(&path).unwrap().units(), Unit::Meter);
        std::fs::remove_file(&path).ok();
    }
}
