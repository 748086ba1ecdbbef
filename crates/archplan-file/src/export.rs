//! 导出模块
//!
//! 平面图可导出为 SVG 或 DXF。SVG 把所有路径按生效图层分组写成 `<path>`。
//! 平面图坐标 +y 向上，SVG 坐标 +y 向下，导出时翻转 y 轴并平移到左上角，
//! 画面保持与平面图一致。

use crate::error::ExportError;
use archplan_core::geometry::Path;
use archplan_core::math::{BoundingBox2, Point2};
use archplan_core::model::PlanModel;
use std::collections::BTreeMap;
use std::f64::consts::PI;
use tracing::{info, warn};

/// 单个图层的样式
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerOptions {
    /// 内联 CSS，如 `stroke-dasharray: 5;`
    pub css_style: Option<String>,
    /// 描边颜色
    pub stroke: Option<String>,
}

impl LayerOptions {
    pub fn css(style: impl Into<String>) -> Self {
        Self {
            css_style: Some(style.into()),
            stroke: None,
        }
    }
}

/// SVG 导出选项
#[derive(Debug, Clone, PartialEq)]
pub struct SvgOptions {
    /// 线宽（英寸）
    pub stroke_width: f64,
    /// 四周留白（英寸）
    pub margin: f64,
    /// 是否输出标注文字
    pub show_captions: bool,
    /// 标注字号（英寸）
    pub font_size: f64,
    /// 按图层名配置的样式
    pub layer_options: BTreeMap<String, LayerOptions>,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            stroke_width: 0.5,
            margin: 12.0,
            show_captions: true,
            font_size: 8.0,
            layer_options: BTreeMap::new(),
        }
    }
}

impl SvgOptions {
    pub fn with_layer(mut self, layer: impl Into<String>, options: LayerOptions) -> Self {
        self.layer_options.insert(layer.into(), options);
        self
    }
}

/// SVG 导出器
pub struct SvgExporter {
    options: SvgOptions,
}

/// 平面图坐标到 SVG 坐标的映射
struct Viewport {
    min_x: f64,
    max_y: f64,
    margin: f64,
}

impl Viewport {
    fn map(&self, p: &Point2) -> (f64, f64) {
        (p.x - self.min_x + self.margin, self.max_y - p.y + self.margin)
    }
}

impl SvgExporter {
    pub fn new(options: SvgOptions) -> Self {
        Self { options }
    }

    /// 导出平面图为 SVG 字符串
    pub fn export(&self, model: &PlanModel) -> String {
        let resolved = model.resolve();
        let extents = resolved
            .iter()
            .fold(BoundingBox2::empty(), |acc, r| acc.union(&r.primitive.bounding_box()));
        let extents = if extents.is_empty() {
            warn!(model = %model.name(), "exporting empty model");
            BoundingBox2::new(Point2::origin(), Point2::origin())
        } else {
            extents
        };

        let margin = self.options.margin;
        let viewport = Viewport {
            min_x: extents.min.x,
            max_y: extents.max.y,
            margin,
        };
        let width = extents.width() + 2.0 * margin;
        let height = extents.height() + 2.0 * margin;

        // 按图层分组，无图层的路径放在最前
        let mut groups: BTreeMap<Option<&str>, Vec<String>> = BTreeMap::new();
        for item in &resolved {
            if let Some(data) = path_data(&item.primitive, &viewport) {
                groups
                    .entry(item.layer.as_deref())
                    .or_default()
                    .push(format!(r#"<path id="{}" d="{}"/>"#, escape(&item.path), data));
            }
        }

        // 物理尺寸带单位，viewBox 保持模型单位
        let unit = model.units().symbol();
        let mut svg = String::new();
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}{unit}" height="{h}{unit}" viewBox="0 0 {w} {h}">
<g fill="none" stroke="black" stroke-width="{sw}" stroke-linecap="round">
"#,
            w = num(width),
            h = num(height),
            sw = num(self.options.stroke_width),
        ));

        for (layer, paths) in &groups {
            match layer {
                Some(name) => {
                    let mut attrs = format!(r#" id="{}""#, escape(name));
                    if let Some(options) = self.options.layer_options.get(*name) {
                        if let Some(stroke) = &options.stroke {
                            attrs.push_str(&format!(r#" stroke="{}""#, escape(stroke)));
                        }
                        if let Some(css) = &options.css_style {
                            attrs.push_str(&format!(r#" style="{}""#, escape(css)));
                        }
                    }
                    svg.push_str(&format!("<g{attrs}>\n"));
                    for p in paths {
                        svg.push_str(&format!("{p}\n"));
                    }
                    svg.push_str("</g>\n");
                }
                None => {
                    for p in paths {
                        svg.push_str(&format!("{p}\n"));
                    }
                }
            }
        }
        svg.push_str("</g>\n");

        if self.options.show_captions {
            let captions = model.captions();
            if !captions.is_empty() {
                svg.push_str(&format!(
                    r#"<g id="captions" font-size="{}" text-anchor="middle" alignment-baseline="middle">
"#,
                    num(self.options.font_size)
                ));
                for caption in captions {
                    let (x, y) = viewport.map(&caption.anchor);
                    svg.push_str(&format!(
                        r#"<text x="{}" y="{}">{}</text>
"#,
                        num(x),
                        num(y),
                        escape(&caption.text)
                    ));
                }
                svg.push_str("</g>\n");
            }
        }

        svg.push_str("</svg>\n");
        svg
    }

    /// 导出到文件
    pub fn export_to_file(&self, model: &PlanModel, path: &std::path::Path) -> Result<(), ExportError> {
        let svg = self.export(model);
        std::fs::write(path, svg)?;
        info!(path = %path.display(), "SVG written");
        Ok(())
    }
}

/// 路径数据；零长度的弧返回 None
fn path_data(path: &Path, viewport: &Viewport) -> Option<String> {
    match path {
        Path::Line(line) => {
            let (x1, y1) = viewport.map(&line.start);
            let (x2, y2) = viewport.map(&line.end);
            Some(format!("M {} {} L {} {}", num(x1), num(y1), num(x2), num(y2)))
        }
        Path::Arc(arc) => {
            let sweep = arc.sweep_angle();
            if sweep <= 0.0 || arc.radius <= 0.0 {
                return None;
            }
            let (x1, y1) = viewport.map(&arc.start_point());
            let (x2, y2) = viewport.map(&arc.end_point());
            let large_arc = u8::from(sweep > PI);
            // y 轴翻转后逆时针变为 SVG 的负角方向
            Some(format!(
                "M {} {} A {r} {r} 0 {} 0 {} {}",
                num(x1),
                num(y1),
                large_arc,
                num(x2),
                num(y2),
                r = num(arc.radius),
            ))
        }
    }
}

/// 保留4位小数并去掉多余的零
fn num(value: f64) -> String {
    let rounded = (value * 1e4).round() / 1e4;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let s = format!("{rounded:.4}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// 平面图导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanFormat {
    Svg,
    Dxf,
}

impl PlanFormat {
    /// 按扩展名推断格式
    pub fn from_path(path: &std::path::Path) -> Result<Self, ExportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("svg") => Ok(PlanFormat::Svg),
            Some("dxf") => Ok(PlanFormat::Dxf),
            _ => Err(ExportError::InvalidFormat(format!(
                "cannot infer plan format from `{}`",
                path.display()
            ))),
        }
    }
}

/// 通用导出函数，SVG 使用默认选项
pub fn export_plan(model: &PlanModel, format: PlanFormat, path: &std::path::Path) -> Result<(), ExportError> {
    match format {
        PlanFormat::Svg => SvgExporter::new(SvgOptions::default()).export_to_file(model, path),
        PlanFormat::Dxf => crate::dxf_io::export(model, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archplan_core::builders::{door, rectangle};
    use archplan_core::geometry::Line;
    use archplan_core::units::{ftin, Unit};

    #[test]
    fn test_num_format() {
        assert_eq!(num(12.0), "12");
        assert_eq!(num(2.25), "2.25");
        assert_eq!(num(-0.00001), "0");
        assert_eq!(num(1.0 / 3.0), "0.3333");
    }

    #[test]
    fn test_y_axis_flipped() {
        let plan = PlanModel::new("plan")
            .with_primitive("wall", Line::new(Point2::new(0.0, 0.0), Point2::new(0.0, 10.0)).into())
            .unwrap();
        let options = SvgOptions {
            margin: 0.0,
            ..Default::default()
        };
        let svg = SvgExporter::new(options).export(&plan);

        // (0,0) 在底部，(0,10) 在顶部
        assert!(svg.contains(r#"d="M 0 10 L 0 0""#));
        assert!(svg.contains(r#"viewBox="0 0 0 10""#));
    }

    #[test]
    fn test_physical_size_carries_model_units() {
        let plan = rectangle(30.0, 20.0).unwrap();
        let options = SvgOptions {
            margin: 0.0,
            ..Default::default()
        };
        let svg = SvgExporter::new(options.clone()).export(&plan);
        assert!(svg.contains(r#"width="30in" height="20in" viewBox="0 0 30 20""#));

        let metric = rectangle(30.0, 20.0).unwrap().with_units(Unit::Millimeter);
        let svg = SvgExporter::new(options).export(&metric);
        assert!(svg.contains(r#"width="30mm" height="20mm""#));
    }

    #[test]
    fn test_layer_style() {
        let plan = PlanModel::new("plan")
            .with_layered_primitive(
                "bounds",
                Line::new(Point2::new(0.0, 0.0), Point2::new(5.0, 0.0)).into(),
                "outline",
            )
            .unwrap()
            .attach("room", rectangle(10.0, 10.0).unwrap())
            .unwrap();
        let options = SvgOptions::default().with_layer("outline", LayerOptions::css("stroke-dasharray: 5;"));
        let svg = SvgExporter::new(options).export(&plan);

        assert!(svg.contains(r#"<g id="outline" style="stroke-dasharray: 5;">"#));
        assert_eq!(svg.matches("<path ").count(), 5);
    }

    #[test]
    fn test_door_arc_and_caption() {
        let plan = PlanModel::new("plan")
            .attach("bath", door(34.0).unwrap().with_caption("BTH"))
            .unwrap();
        let options = SvgOptions {
            margin: 0.0,
            ..Default::default()
        };
        let svg = SvgExporter::new(options).export(&plan);

        // 从 (34,0) 到 (0,34) 的四分之一圆弧
        assert!(svg.contains(r#"d="M 34 34 A 34 34 0 0 0 0 0""#));
        assert!(svg.contains(r#"<text x="17" y="17">BTH</text>"#));
    }

    #[test]
    fn test_export_to_file() {
        let plan = rectangle(ftin(1.0, 6.0), 20.0).unwrap();
        let path = std::env::temp_dir().join("archplan_test_export.svg");
        SvgExporter::new(SvgOptions::default())
            .export_to_file(&plan, &path)
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("<svg"));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let plan = rectangle(10.0, 10.0).unwrap();
        let path = std::env::temp_dir()
            .join("archplan_missing_dir")
            .join("nested")
            .join("plan.svg");
        let result = SvgExporter::new(SvgOptions::default()).export_to_file(&plan, &path);
        assert!(matches!(result, Err(ExportError::ExportFailed(_))));
    }

    #[test]
    fn test_format_from_path() {
        use std::path::Path;
        assert_eq!(PlanFormat::from_path(Path::new("a/plan.SVG")).unwrap(), PlanFormat::Svg);
        assert_eq!(PlanFormat::from_path(Path::new("plan.dxf")).unwrap(), PlanFormat::Dxf);
        assert!(matches!(
            PlanFormat::from_path(Path::new("plan.pdf")),
            Err(ExportError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_export_plan_dispatch() {
        let plan = rectangle(10.0, 10.0).unwrap();
        let path = std::env::temp_dir().join("archplan_test_dispatch.dxf");
        export_plan(&plan, PlanFormat::Dxf, &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
        std::fs::remove_file(&path).ok();
    }
}
