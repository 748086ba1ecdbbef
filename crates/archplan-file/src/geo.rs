//! gmsh 几何脚本（.geo）
//!
//! 每个多边形写成一组 `Point`、相邻顶点之间的 `Line`，
//! 以及一个 `Curve Loop` 与对应的 `Plane Surface`。编号从 1 开始全局递增。

use crate::error::ExportError;
use archplan_core::solid::Polygon3;
use std::path::Path;
use tracing::{info, warn};

/// 点的网格特征尺寸
const CHARACTERISTIC_LENGTH: &str = "1e-02";

/// 生成 .geo 脚本文本
pub fn write_geo(polygons: &[Polygon3]) -> String {
    let mut out = String::new();
    let mut next_point = 1usize;
    let mut next_line = 1usize;
    let mut next_surface = 1usize;

    for polygon in polygons {
        let vertices = &polygon.vertices;
        if vertices.len() < 3 {
            warn!(vertices = vertices.len(), "degenerate polygon skipped");
            continue;
        }
        let n = vertices.len();

        for (i, v) in vertices.iter().enumerate() {
            out.push_str(&format!(
                "Point({}) = {{{}, {}, {}, {CHARACTERISTIC_LENGTH}}};\n",
                next_point + i,
                v.x,
                v.y,
                v.z
            ));
        }
        out.push('\n');

        // 闭合：最后一条线回到第一个点
        for i in 0..n {
            out.push_str(&format!(
                "Line({}) = {{{}, {}}};\n",
                next_line + i,
                next_point + i,
                next_point + (i + 1) % n
            ));
        }
        out.push('\n');

        let lines: Vec<String> = (0..n).map(|i| (next_line + i).to_string()).collect();
        out.push_str(&format!("Curve Loop({next_surface}) = {{{}}};\n", lines.join(", ")));
        out.push_str(&format!("Plane Surface({next_surface}) = {{{next_surface}}};\n"));
        out.push('\n');

        next_point += n;
        next_line += n;
        next_surface += 1;
    }

    out
}

/// 写入 .geo 文件
pub fn save_geo(polygons: &[Polygon3], path: &Path) -> Result<(), ExportError> {
    std::fs::write(path, write_geo(polygons))?;
    info!(path = %path.display(), polygons = polygons.len(), "gmsh script written");
    Ok(())
}
